//! A software model of the OpenGL calls the crate issues.
//!
//! [`Driver`] keeps the object tables and binding points of an OpenGL 3.3
//! core context in memory, without rasterizing anything. It follows the
//! driver rules that matter to the wrappers: attribute descriptions attach to
//! whichever buffer is bound when they are recorded, index buffers attach to
//! the bound vertex array, uploads to location `-1` are ignored, and misuse
//! raises the same error codes `glGetError` would report.
//!
//! The shader "compiler" parses GLSL with the `glsl` crate, so syntax errors
//! fail compilation with the parser's message in the info log. Linking reads
//! the parsed `uniform` declarations, including the fields of uniform
//! structs, to serve location queries.
//!
//! [`Driver`]: struct.Driver.html

use crate::driver;
use crate::gl;
use crate::handle::{Id, Kind};
use glsl::parser::Parse as _;
use glsl::syntax;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::ffi;
use vec_map::VecMap;

/// Number of texture units modelled.
const TEXTURE_UNITS: usize = 16;

/// A recorded uniform value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// `glUniform1i`.
    Int(i32),

    /// `glUniform1f`.
    Float(f32),

    /// `glUniform3f`.
    Vec3([f32; 3]),

    /// `glUniform4f`.
    Vec4([f32; 4]),

    /// `glUniformMatrix4fv`.
    Mat4([f32; 16]),
}

/// A recorded vertex attribute description.
#[derive(Clone, Debug, PartialEq)]
pub struct Attrib {
    /// The buffer bound to `GL_ARRAY_BUFFER` when the attribute was described.
    pub buffer: Id,

    /// Component count.
    pub size: i32,

    /// Element type.
    pub ty: u32,

    /// Normalize flag.
    pub norm: bool,

    /// Byte stride.
    pub stride: i32,

    /// Byte offset.
    pub offset: usize,
}

/// A recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct Draw {
    /// The program in use.
    pub program: Id,

    /// The bound vertex array.
    pub vertex_array: Id,

    /// Primitive mode.
    pub mode: u32,

    /// First vertex, or byte offset into the index buffer.
    pub first: usize,

    /// Vertex or index count.
    pub count: usize,

    /// Index element type for indexed draws.
    pub index_type: Option<u32>,

    /// Textures bound per unit at draw time.
    pub textures: Vec<(u32, Id)>,
}

struct ShaderRecord {
    ty: u32,
    source: String,
    compiled: bool,
    log: String,
    interface: Interface,
}

#[derive(Default)]
struct ProgramRecord {
    attached: Vec<Id>,
    linked: bool,
    log: String,
    locations: HashMap<String, i32>,
    values: HashMap<i32, Value>,
}

#[derive(Default)]
struct VertexArrayRecord {
    attribs: VecMap<Attrib>,
    enabled: BTreeSet<u32>,
    elements: Id,
}

#[derive(Default)]
struct TextureRecord {
    width: u32,
    height: u32,
    internal_format: u32,
    rgba: Vec<u8>,
    params: HashMap<u32, u32>,
    mipmaps: bool,
}

struct State {
    next_id: Id,
    error: u32,
    fail_allocation: Option<Kind>,

    shaders: HashMap<Id, ShaderRecord>,
    programs: HashMap<Id, ProgramRecord>,
    buffers: HashMap<Id, Vec<u8>>,
    vertex_arrays: HashMap<Id, VertexArrayRecord>,
    textures: HashMap<Id, TextureRecord>,

    array_buffer: Id,
    element_buffer: Id,
    vertex_array: Id,
    program: Id,
    active_unit: usize,
    units: [Id; TEXTURE_UNITS],

    clear_color: [f32; 4],
    clears: Vec<u32>,
    viewport: [i32; 4],
    caps: HashSet<u32>,
    point_size: f32,
    unpack_alignment: i32,

    draws: Vec<Draw>,
    deleted: Vec<(Kind, Id)>,
}

impl State {
    fn new() -> Self {
        Self {
            next_id: 1,
            error: gl::NO_ERROR,
            fail_allocation: None,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            textures: HashMap::new(),
            array_buffer: 0,
            element_buffer: 0,
            vertex_array: 0,
            program: 0,
            active_unit: 0,
            units: [0; TEXTURE_UNITS],
            clear_color: [0.0; 4],
            clears: Vec::new(),
            viewport: [0; 4],
            caps: HashSet::new(),
            point_size: 1.0,
            unpack_alignment: 4,
            draws: Vec::new(),
            deleted: Vec::new(),
        }
    }

    /// Records the first error since the last `glGetError`.
    fn raise(&mut self, error: u32) {
        if self.error == gl::NO_ERROR {
            self.error = error;
        }
    }

    fn allocate(&mut self, kind: Kind) -> Id {
        if self.fail_allocation == Some(kind) {
            return 0;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn bound_buffer(&self, target: u32) -> Option<Id> {
        match target {
            gl::ARRAY_BUFFER => Some(self.array_buffer),
            gl::ELEMENT_ARRAY_BUFFER => Some(self.bound_elements()),
            _ => None,
        }
    }

    fn bound_elements(&self) -> Id {
        match self.vertex_arrays.get(&self.vertex_array) {
            Some(vao) => vao.elements,
            None => self.element_buffer,
        }
    }

    fn bound_texture(&self) -> Id {
        self.units[self.active_unit]
    }
}

/// In-memory OpenGL 3.3 core driver.
pub struct Driver {
    state: RefCell<State>,
}

impl Driver {
    /// Creates a fresh context with no objects.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::new()),
        }
    }

    /// Makes every following allocation of `kind` return the zero handle.
    pub fn fail_allocations(&self, kind: Option<Kind>) {
        self.state.borrow_mut().fail_allocation = kind;
    }

    /// Returns the number of live objects of the given kind.
    pub fn live(&self, kind: Kind) -> usize {
        let state = self.state.borrow();
        match kind {
            Kind::Shader => state.shaders.len(),
            Kind::Program => state.programs.len(),
            Kind::Buffer => state.buffers.len(),
            Kind::VertexArray => state.vertex_arrays.len(),
            Kind::Texture => state.textures.len(),
        }
    }

    /// Returns the number of live objects of every kind.
    pub fn live_objects(&self) -> usize {
        [
            Kind::Shader,
            Kind::Program,
            Kind::Buffer,
            Kind::VertexArray,
            Kind::Texture,
        ]
            .iter()
            .map(|kind| self.live(*kind))
            .sum()
    }

    /// Returns every deletion issued so far, in order.
    pub fn deleted(&self) -> Vec<(Kind, Id)> {
        self.state.borrow().deleted.clone()
    }

    /// Returns every draw call issued so far, in order.
    pub fn draws(&self) -> Vec<Draw> {
        self.state.borrow().draws.clone()
    }

    /// Returns the clear masks issued so far, in order.
    pub fn clears(&self) -> Vec<u32> {
        self.state.borrow().clears.clone()
    }

    /// Returns the current clear color.
    pub fn clear_color_value(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }

    /// Returns the current viewport.
    pub fn viewport_value(&self) -> [i32; 4] {
        self.state.borrow().viewport
    }

    /// Returns the current point size.
    pub fn point_size_value(&self) -> f32 {
        self.state.borrow().point_size
    }

    /// Returns `true` if a capability is enabled.
    pub fn is_enabled(&self, cap: u32) -> bool {
        self.state.borrow().caps.contains(&cap)
    }

    /// Returns the program currently in use.
    pub fn program_in_use(&self) -> Id {
        self.state.borrow().program
    }

    /// Returns the bound vertex array.
    pub fn vertex_array_bound(&self) -> Id {
        self.state.borrow().vertex_array
    }

    /// Returns the value last uploaded to a named uniform of a program.
    pub fn uniform(&self, program: Id, name: &str) -> Option<Value> {
        let state = self.state.borrow();
        let record = state.programs.get(&program)?;
        let location = record.locations.get(name)?;
        record.values.get(location).cloned()
    }

    /// Returns the number of uniform values recorded on a program.
    pub fn uniform_count(&self, program: Id) -> usize {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|record| record.values.len())
            .unwrap_or(0)
    }

    /// Returns the attribute description recorded on a vertex array slot.
    pub fn attribute(&self, vertex_array: Id, slot: u32) -> Option<Attrib> {
        let state = self.state.borrow();
        let vao = state.vertex_arrays.get(&vertex_array)?;
        vao.attribs.get(slot as usize).cloned()
    }

    /// Returns `true` if an attribute slot is enabled on a vertex array.
    pub fn attribute_enabled(&self, vertex_array: Id, slot: u32) -> bool {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .map(|vao| vao.enabled.contains(&slot))
            .unwrap_or(false)
    }

    /// Returns the index buffer attached to a vertex array.
    pub fn element_buffer(&self, vertex_array: Id) -> Id {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .map(|vao| vao.elements)
            .unwrap_or(0)
    }

    /// Returns the contents of a buffer.
    pub fn buffer_contents(&self, id: Id) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&id).cloned()
    }

    /// Returns the dimensions of a texture.
    pub fn texture_size(&self, id: Id) -> Option<(u32, u32)> {
        let state = self.state.borrow();
        state.textures.get(&id).map(|tex| (tex.width, tex.height))
    }

    /// Returns the internal format of a texture.
    pub fn texture_format(&self, id: Id) -> Option<u32> {
        self.state.borrow().textures.get(&id).map(|tex| tex.internal_format)
    }

    /// Returns a texture parameter.
    pub fn texture_param(&self, id: Id, param: u32) -> Option<u32> {
        let state = self.state.borrow();
        state.textures.get(&id)?.params.get(&param).cloned()
    }

    /// Returns `true` if mip levels were generated for a texture.
    pub fn has_mipmaps(&self, id: Id) -> bool {
        self.state
            .borrow()
            .textures
            .get(&id)
            .map(|tex| tex.mipmaps)
            .unwrap_or(false)
    }

    /// Samples a texture at normalized coordinates with nearest filtering,
    /// honouring the texture's wrap parameters.
    pub fn sample(&self, id: Id, u: f32, v: f32) -> Option<[u8; 4]> {
        let state = self.state.borrow();
        let tex = state.textures.get(&id)?;
        if tex.width == 0 || tex.height == 0 {
            return None;
        }
        let wrap_s = tex.params.get(&gl::TEXTURE_WRAP_S).cloned().unwrap_or(gl::REPEAT);
        let wrap_t = tex.params.get(&gl::TEXTURE_WRAP_T).cloned().unwrap_or(gl::REPEAT);
        let x = texel(u, tex.width, wrap_s);
        let y = texel(v, tex.height, wrap_t);
        let i = ((y * tex.width + x) * 4) as usize;
        let mut texel = [0; 4];
        texel.copy_from_slice(&tex.rgba[i .. i + 4]);
        Some(texel)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a normalized coordinate onto a texel index.
fn texel(coord: f32, size: u32, wrap: u32) -> u32 {
    let coord = match wrap {
        gl::REPEAT => coord - coord.floor(),
        gl::MIRRORED_REPEAT => {
            let period = coord.rem_euclid(2.0);
            if period > 1.0 { 2.0 - period } else { period }
        }
        _ => coord.max(0.0).min(1.0),
    };
    ((coord * size as f32) as u32).min(size - 1)
}

/// Returns the channel count of a client pixel format.
fn channels(format: u32) -> Option<usize> {
    match format {
        gl::RED => Some(1),
        gl::RG => Some(2),
        gl::RGB => Some(3),
        gl::RGBA => Some(4),
        _ => None,
    }
}

/// Returns the channels an internal format keeps, missing ones read as
/// zero color and full alpha.
fn stored_channels(internal_format: u32) -> usize {
    match internal_format {
        gl::RED | gl::R8 => 1,
        gl::RG | gl::RG8 => 2,
        gl::RGB | gl::RGB8 => 3,
        _ => 4,
    }
}

/// What linking needs from a compiled shader.
#[derive(Debug, Default)]
struct Interface {
    uniforms: Vec<String>,
    entry: bool,
}

/// Parses a shader, returning its interface or the compile log on failure.
fn compile(source: &str) -> Result<Interface, String> {
    let unit = syntax::TranslationUnit::parse(source)
        .map_err(|err| format!("0:0(0): error: {}\n", err.info.trim_end()))?;
    match unit.0 .0.first() {
        Some(syntax::ExternalDeclaration::Preprocessor(syntax::Preprocessor::Version(_))) => {}
        _ => return Err("0:1(1): error: #version directive required\n".to_string()),
    }

    let mut structs: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut interface = Interface::default();
    for declaration in &unit.0 .0 {
        let list = match declaration {
            syntax::ExternalDeclaration::FunctionDefinition(function) => {
                interface.entry |= function.prototype.name.0 == "main";
                continue;
            }
            syntax::ExternalDeclaration::Declaration(
                syntax::Declaration::InitDeclaratorList(list),
            ) => list,
            _ => continue,
        };
        let ty = &list.head.ty;
        if let syntax::TypeSpecifierNonArray::Struct(ref specifier) = ty.ty.ty {
            if let Some(ref name) = specifier.name {
                let fields = specifier
                    .fields
                    .0
                    .iter()
                    .flat_map(|field| field.identifiers.0.iter())
                    .map(|field| field.ident.0.as_str())
                    .collect();
                structs.insert(name.0.as_str(), fields);
            }
        }
        let uniform = ty.qualifier.as_ref().map_or(false, |qualifier| {
            qualifier.qualifiers.0.iter().any(|item| {
                *item == syntax::TypeQualifierSpec::Storage(syntax::StorageQualifier::Uniform)
            })
        });
        if !uniform {
            continue;
        }
        let fields = match ty.ty.ty {
            syntax::TypeSpecifierNonArray::TypeName(ref name) => structs.get(name.0.as_str()),
            _ => None,
        };
        let names = list
            .head
            .name
            .iter()
            .chain(list.tail.iter().map(|declarator| &declarator.ident.ident));
        for name in names {
            match fields {
                Some(fields) => {
                    for field in fields {
                        interface.uniforms.push(format!("{}.{}", name.0, field));
                    }
                }
                None => interface.uniforms.push(name.0.clone()),
            }
        }
    }
    Ok(interface)
}

fn stage_name(ty: u32) -> &'static str {
    match ty {
        gl::VERTEX_SHADER => "vertex",
        gl::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

impl driver::Driver for Driver {
    // Diagnostics

    fn get_error(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let error = state.error;
        state.error = gl::NO_ERROR;
        error
    }

    fn version(&self) -> String {
        "3.3 (headless)".to_string()
    }

    // Pipeline state

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state.borrow_mut().clear_color = [r, g, b, a];
    }

    fn clear_depth(&self, _z: f64) {}

    fn clear(&self, mask: u32) {
        self.state.borrow_mut().clears.push(mask);
    }

    fn enable(&self, cap: u32) {
        self.state.borrow_mut().caps.insert(cap);
    }

    fn disable(&self, cap: u32) {
        self.state.borrow_mut().caps.remove(&cap);
    }

    fn cull_face(&self, _face: u32) {}

    fn depth_func(&self, _func: u32) {}

    fn polygon_mode(&self, _face: u32, _mode: u32) {}

    fn point_size(&self, size: f32) {
        self.state.borrow_mut().point_size = size;
    }

    fn viewport(&self, x: i32, y: i32, w: i32, h: i32) {
        let mut state = self.state.borrow_mut();
        if w < 0 || h < 0 {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        state.viewport = [x, y, w, h];
    }

    // Shaders and programs

    fn create_shader(&self, ty: u32) -> Id {
        let mut state = self.state.borrow_mut();
        if ty != gl::VERTEX_SHADER && ty != gl::FRAGMENT_SHADER {
            state.raise(gl::INVALID_ENUM);
            return 0;
        }
        let id = state.allocate(Kind::Shader);
        if id != 0 {
            state.shaders.insert(id, ShaderRecord {
                ty,
                source: String::new(),
                compiled: false,
                log: String::new(),
                interface: Interface::default(),
            });
        }
        id
    }

    fn shader_source(&self, id: Id, source: &str) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&id) {
            Some(shader) => shader.source = source.to_string(),
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, id: Id) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&id) {
            Some(shader) => match compile(&shader.source) {
                Ok(interface) => {
                    shader.compiled = true;
                    shader.log.clear();
                    shader.interface = interface;
                }
                Err(log) => {
                    shader.compiled = false;
                    shader.log = log;
                    shader.interface = Interface::default();
                }
            },
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    fn shader_compile_status(&self, id: Id) -> bool {
        let state = self.state.borrow();
        state.shaders.get(&id).map(|shader| shader.compiled).unwrap_or(false)
    }

    fn shader_info_log(&self, id: Id) -> String {
        let state = self.state.borrow();
        state.shaders.get(&id).map(|shader| shader.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, id: Id) {
        if id == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&id).is_some() {
            state.deleted.push((Kind::Shader, id));
        } else {
            state.raise(gl::INVALID_VALUE);
        }
    }

    fn create_program(&self) -> Id {
        let mut state = self.state.borrow_mut();
        let id = state.allocate(Kind::Program);
        if id != 0 {
            state.programs.insert(id, ProgramRecord::default());
        }
        id
    }

    fn attach_shader(&self, program: Id, shader: Id) {
        let mut state = self.state.borrow_mut();
        if !state.shaders.contains_key(&shader) {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        match state.programs.get_mut(&program) {
            Some(record) if record.attached.contains(&shader) => {
                state.raise(gl::INVALID_OPERATION);
            }
            Some(record) => record.attached.push(shader),
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    fn link_program(&self, id: Id) {
        let mut state = self.state.borrow_mut();
        let attached = match state.programs.get(&id) {
            Some(record) => record.attached.clone(),
            None => {
                state.raise(gl::INVALID_VALUE);
                return;
            }
        };

        let mut log = String::new();
        let mut stages = HashSet::new();
        let mut names = Vec::new();
        for shader in attached.iter().filter_map(|id| state.shaders.get(id)) {
            if !shader.compiled {
                log.push_str("error: linking with uncompiled/unspecialized shader\n");
                continue;
            }
            stages.insert(shader.ty);
            if !shader.interface.entry {
                log.push_str(&format!(
                    "error: {} shader lacks `main'\n",
                    stage_name(shader.ty),
                ));
            }
            for name in &shader.interface.uniforms {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        for ty in &[gl::VERTEX_SHADER, gl::FRAGMENT_SHADER] {
            if !stages.contains(ty) {
                log.push_str(&format!("error: no {} shader attached\n", stage_name(*ty)));
            }
        }

        if let Some(record) = state.programs.get_mut(&id) {
            record.values.clear();
            if log.is_empty() {
                record.linked = true;
                record.log.clear();
                record.locations = names
                    .into_iter()
                    .enumerate()
                    .map(|(location, name)| (name, location as i32))
                    .collect();
            } else {
                record.linked = false;
                record.log = log;
                record.locations.clear();
            }
        }
    }

    fn program_link_status(&self, id: Id) -> bool {
        let state = self.state.borrow();
        state.programs.get(&id).map(|record| record.linked).unwrap_or(false)
    }

    fn program_info_log(&self, id: Id) -> String {
        let state = self.state.borrow();
        state.programs.get(&id).map(|record| record.log.clone()).unwrap_or_default()
    }

    fn delete_program(&self, id: Id) {
        if id == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&id).is_some() {
            state.deleted.push((Kind::Program, id));
            if state.program == id {
                state.program = 0;
            }
        } else {
            state.raise(gl::INVALID_VALUE);
        }
    }

    fn use_program(&self, id: Id) {
        let mut state = self.state.borrow_mut();
        if id != 0 {
            let linked = state.programs.get(&id).map(|record| record.linked);
            if linked != Some(true) {
                state.raise(gl::INVALID_OPERATION);
                return;
            }
        }
        state.program = id;
    }

    fn get_uniform_location(&self, program: Id, name: &ffi::CStr) -> i32 {
        let state = self.state.borrow();
        let name = name.to_string_lossy();
        state
            .programs
            .get(&program)
            .filter(|record| record.linked)
            .and_then(|record| record.locations.get(&*name).cloned())
            .unwrap_or(-1)
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        self.upload(location, Value::Int(value));
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        self.upload(location, Value::Float(value));
    }

    fn uniform_3f(&self, location: i32, x: f32, y: f32, z: f32) {
        self.upload(location, Value::Vec3([x, y, z]));
    }

    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        self.upload(location, Value::Vec4([x, y, z, w]));
    }

    fn uniform_matrix_4fv(&self, location: i32, value: &[f32; 16]) {
        self.upload(location, Value::Mat4(*value));
    }

    // Buffers

    fn gen_buffer(&self) -> Id {
        let mut state = self.state.borrow_mut();
        let id = state.allocate(Kind::Buffer);
        if id != 0 {
            state.buffers.insert(id, Vec::new());
        }
        id
    }

    fn bind_buffer(&self, target: u32, id: Id) {
        let mut state = self.state.borrow_mut();
        if id != 0 && !state.buffers.contains_key(&id) {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        match target {
            gl::ARRAY_BUFFER => state.array_buffer = id,
            gl::ELEMENT_ARRAY_BUFFER => {
                let vertex_array = state.vertex_array;
                match state.vertex_arrays.get_mut(&vertex_array) {
                    Some(vao) => vao.elements = id,
                    None => state.element_buffer = id,
                }
            }
            _ => state.raise(gl::INVALID_ENUM),
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], _usage: u32) {
        let mut state = self.state.borrow_mut();
        let id = match state.bound_buffer(target) {
            Some(0) => {
                state.raise(gl::INVALID_OPERATION);
                return;
            }
            Some(id) => id,
            None => {
                state.raise(gl::INVALID_ENUM);
                return;
            }
        };
        if let Some(contents) = state.buffers.get_mut(&id) {
            *contents = data.to_vec();
        }
    }

    fn buffer_size(&self, target: u32) -> usize {
        let mut state = self.state.borrow_mut();
        match state.bound_buffer(target) {
            Some(id) if id != 0 => state.buffers.get(&id).map(Vec::len).unwrap_or(0),
            _ => {
                state.raise(gl::INVALID_OPERATION);
                0
            }
        }
    }

    fn delete_buffer(&self, id: Id) {
        if id == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.buffers.remove(&id).is_some() {
            state.deleted.push((Kind::Buffer, id));
            if state.array_buffer == id {
                state.array_buffer = 0;
            }
            if state.element_buffer == id {
                state.element_buffer = 0;
            }
            for vao in state.vertex_arrays.values_mut() {
                if vao.elements == id {
                    vao.elements = 0;
                }
            }
        }
    }

    // Vertex arrays

    fn gen_vertex_array(&self) -> Id {
        let mut state = self.state.borrow_mut();
        let id = state.allocate(Kind::VertexArray);
        if id != 0 {
            state.vertex_arrays.insert(id, VertexArrayRecord::default());
        }
        id
    }

    fn bind_vertex_array(&self, id: Id) {
        let mut state = self.state.borrow_mut();
        if id != 0 && !state.vertex_arrays.contains_key(&id) {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        state.vertex_array = id;
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.borrow_mut();
        let vertex_array = state.vertex_array;
        match state.vertex_arrays.get_mut(&vertex_array) {
            Some(vao) => {
                vao.enabled.insert(index);
            }
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        norm: bool,
        stride: i32,
        offset: usize,
    ) {
        let mut state = self.state.borrow_mut();
        if !(1 ..= 4).contains(&size) || stride < 0 {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        let buffer = state.array_buffer;
        if buffer == 0 && offset != 0 {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        let vertex_array = state.vertex_array;
        match state.vertex_arrays.get_mut(&vertex_array) {
            Some(vao) => {
                vao.attribs.insert(index as usize, Attrib {
                    buffer,
                    size,
                    ty,
                    norm,
                    stride,
                    offset,
                });
            }
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn delete_vertex_array(&self, id: Id) {
        if id == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.vertex_arrays.remove(&id).is_some() {
            state.deleted.push((Kind::VertexArray, id));
            if state.vertex_array == id {
                state.vertex_array = 0;
            }
        }
    }

    // Textures

    fn gen_texture(&self) -> Id {
        let mut state = self.state.borrow_mut();
        let id = state.allocate(Kind::Texture);
        if id != 0 {
            state.textures.insert(id, TextureRecord::default());
        }
        id
    }

    fn active_texture(&self, unit: u32) {
        let mut state = self.state.borrow_mut();
        let index = unit.wrapping_sub(gl::TEXTURE0) as usize;
        if index >= TEXTURE_UNITS {
            state.raise(gl::INVALID_ENUM);
            return;
        }
        state.active_unit = index;
    }

    fn bind_texture(&self, target: u32, id: Id) {
        let mut state = self.state.borrow_mut();
        if target != gl::TEXTURE_2D {
            state.raise(gl::INVALID_ENUM);
            return;
        }
        if id != 0 && !state.textures.contains_key(&id) {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        let unit = state.active_unit;
        state.units[unit] = id;
    }

    fn tex_parameteri(&self, _target: u32, param: u32, value: u32) {
        let mut state = self.state.borrow_mut();
        let id = state.bound_texture();
        match state.textures.get_mut(&id) {
            Some(tex) => {
                tex.params.insert(param, value);
            }
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn pixel_store(&self, param: u32, value: i32) {
        let mut state = self.state.borrow_mut();
        if param == gl::UNPACK_ALIGNMENT {
            state.unpack_alignment = value;
        }
    }

    fn tex_image_2d(
        &self,
        _target: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        let mut state = self.state.borrow_mut();
        let src_channels = match channels(format) {
            Some(n) if ty == gl::UNSIGNED_BYTE => n,
            _ => {
                state.raise(gl::INVALID_ENUM);
                return;
            }
        };
        let row = width as usize * src_channels;
        let alignment = state.unpack_alignment.max(1) as usize;
        let pitch = (row + alignment - 1) / alignment * alignment;
        let required = if height == 0 { 0 } else { pitch * (height as usize - 1) + row };
        if !data.is_empty() && data.len() < required {
            state.raise(gl::INVALID_OPERATION);
            return;
        }

        let keep = stored_channels(internal_format);
        let mut rgba = vec![0u8; width as usize * height as usize * 4];
        for y in 0 .. height as usize {
            for x in 0 .. width as usize {
                let dst = (y * width as usize + x) * 4;
                rgba[dst + 3] = 255;
                if data.is_empty() {
                    continue;
                }
                let src = y * pitch + x * src_channels;
                for c in 0 .. src_channels.min(keep) {
                    rgba[dst + c] = data[src + c];
                }
            }
        }

        let id = state.bound_texture();
        match state.textures.get_mut(&id) {
            Some(tex) => {
                tex.width = width;
                tex.height = height;
                tex.internal_format = internal_format;
                tex.rgba = rgba;
                tex.mipmaps = false;
            }
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn get_tex_image(&self, _target: u32, format: u32, ty: u32, out: &mut [u8]) {
        let mut state = self.state.borrow_mut();
        let dst_channels = match channels(format) {
            Some(n) if ty == gl::UNSIGNED_BYTE => n,
            _ => {
                state.raise(gl::INVALID_ENUM);
                return;
            }
        };
        let id = state.bound_texture();
        let tex = match state.textures.get(&id) {
            Some(tex) => tex,
            None => {
                state.raise(gl::INVALID_OPERATION);
                return;
            }
        };
        for (texel, dst) in tex.rgba.chunks(4).zip(out.chunks_mut(dst_channels)) {
            let n = dst.len();
            dst.copy_from_slice(&texel[.. n]);
        }
    }

    fn generate_mipmap(&self, _target: u32) {
        let mut state = self.state.borrow_mut();
        let id = state.bound_texture();
        match state.textures.get_mut(&id) {
            Some(tex) => tex.mipmaps = true,
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn delete_texture(&self, id: Id) {
        if id == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.textures.remove(&id).is_some() {
            state.deleted.push((Kind::Texture, id));
            for unit in state.units.iter_mut() {
                if *unit == id {
                    *unit = 0;
                }
            }
        }
    }

    // Draw calls

    fn draw_arrays(&self, mode: u32, first: usize, count: usize) {
        self.record_draw(mode, first, count, None);
    }

    fn draw_elements(&self, mode: u32, count: usize, ty: u32, offset: usize) {
        self.record_draw(mode, offset, count, Some(ty));
    }
}

impl Driver {
    fn upload(&self, location: i32, value: Value) {
        if location == -1 {
            return;
        }
        let mut state = self.state.borrow_mut();
        let program = state.program;
        let known = state
            .programs
            .get(&program)
            .map(|record| record.locations.values().any(|l| *l == location));
        match known {
            Some(true) => {
                if let Some(record) = state.programs.get_mut(&program) {
                    record.values.insert(location, value);
                }
            }
            _ => state.raise(gl::INVALID_OPERATION),
        }
    }

    fn record_draw(&self, mode: u32, first: usize, count: usize, index_type: Option<u32>) {
        let mut state = self.state.borrow_mut();
        if state.program == 0 || state.vertex_array == 0 {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        if index_type.is_some() && state.bound_elements() == 0 {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        let textures = state
            .units
            .iter()
            .enumerate()
            .filter(|&(_, id)| *id != 0)
            .map(|(unit, id)| (unit as u32, *id))
            .collect();
        let draw = Draw {
            program: state.program,
            vertex_array: state.vertex_array,
            mode,
            first,
            count,
            index_type,
            textures,
        };
        state.draws.push(draw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver as _;

    #[test]
    fn uniform_structs_expand_to_fields() {
        let source = "#version 330 core\n\
            struct Light { vec3 position; vec3 ambient, diffuse; };\n\
            uniform Light light;\n\
            uniform mat4 transform; // model-view-projection\n\
            uniform sampler2D tex[2];\n\
            in vec3 aPos;\n\
            void main() {}\n";
        let interface = compile(source).unwrap();
        assert!(interface.entry);
        assert_eq!(
            interface.uniforms,
            vec![
                "light.position".to_string(),
                "light.ambient".to_string(),
                "light.diffuse".to_string(),
                "transform".to_string(),
                "tex".to_string(),
            ],
        );
    }

    #[test]
    fn malformed_source_fails_to_compile() {
        assert!(compile("#version 330 core\nvoid main() {\n").is_err());
        assert!(compile("#version 330 core\nvoid main() { gl_Position = vec4(1.0) }\n").is_err());
        let log = compile("void main() {}\n").unwrap_err();
        assert!(log.contains("#version"));
        assert!(!compile("#version 330 core\nvoid other() {}\n").unwrap().entry);
    }

    #[test]
    fn attribute_without_vertex_array_is_an_error() {
        let driver = Driver::new();
        driver.vertex_attrib_pointer(0, 3, gl::FLOAT, false, 12, 0);
        assert_eq!(driver.get_error(), gl::INVALID_OPERATION);
        assert_eq!(driver.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn index_buffer_follows_the_bound_vertex_array() {
        let driver = Driver::new();
        let vao = driver.gen_vertex_array();
        let ebo = driver.gen_buffer();
        driver.bind_vertex_array(vao);
        driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
        driver.bind_vertex_array(0);
        assert_eq!(driver.element_buffer(vao), ebo);

        driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, 0);
        assert_eq!(driver.element_buffer(vao), ebo);
    }

    #[test]
    fn wrap_modes_pick_texels() {
        assert_eq!(texel(1.25, 4, gl::REPEAT), 1);
        assert_eq!(texel(1.25, 4, gl::CLAMP_TO_EDGE), 3);
        assert_eq!(texel(-0.5, 4, gl::CLAMP_TO_EDGE), 0);
        assert_eq!(texel(1.25, 4, gl::MIRRORED_REPEAT), 3);
    }
}
