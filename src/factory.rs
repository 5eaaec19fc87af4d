//! Factory.

use crate::buffer::{self, Attribute, Buffer};
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::gl;
use crate::handle::{kind, Destroyed, Handle, Id, Kind};
use crate::image::Image;
use crate::pipeline::{ClearColor, ClearDepth, ClearOp, Pass, State, Viewport};
use crate::program::{self, Program};
use crate::queue::Queue;
use crate::sampler::Sampler;
use crate::shader::{Shader, Stage};
use crate::texture::{self, Texture};
use crate::util;
use crate::vertex_array::{self, Binding, VertexLayout};
use std::{path, rc::Rc};

/// OpenGL memory manager and explicit pipeline state context.
///
/// Every resource is created through the factory and every render call goes
/// through it. Released resources are deleted by [`collect_garbage`].
///
/// [`collect_garbage`]: #method.collect_garbage
pub struct Factory<D: Driver = gl::Backend> {
    /// The driver all calls go through.
    driver: D,

    /// Released objects arrive here to be deleted.
    queue: Queue<Destroyed>,
}

impl Factory<gl::Backend> {
    /// Loads the OpenGL function table of the current context.
    pub fn load<F>(query_proc_address: F) -> Result<Self>
        where F: FnMut(&str) -> *const std::os::raw::c_void
    {
        Ok(Self::new(gl::Backend::load(query_proc_address)?))
    }
}

impl<D: Driver> Factory<D> {
    /// Constructor.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            queue: Queue::new(),
        }
    }

    /// Returns the underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Returns the `GL_VERSION` string of the context.
    pub fn version(&self) -> String {
        self.driver.version()
    }

    /// Deletes every object released since the last collection.
    ///
    /// Returns the number of objects deleted.
    pub fn collect_garbage(&self) -> usize {
        let pending = self.queue.len();
        if pending > 0 {
            debug!("collecting {} released objects", pending);
        }
        let mut count = 0;
        while let Some(Destroyed { kind, id }) = self.queue.next() {
            debug!("deleting {:?} {}", kind, id);
            match kind {
                Kind::Shader => self.driver.delete_shader(id),
                Kind::Program => self.driver.delete_program(id),
                Kind::Buffer => self.driver.delete_buffer(id),
                Kind::VertexArray => self.driver.delete_vertex_array(id),
                Kind::Texture => self.driver.delete_texture(id),
            }
            count += 1;
        }
        count
    }

    /// Wraps a freshly allocated object name, failing on the zero name.
    fn handle<K: kind::Object>(&self, id: Id) -> Result<Handle<K>> {
        if id == 0 {
            error!("failed to allocate {:?} object", K::KIND);
            return Err(Error::Allocation(K::KIND));
        }
        debug!("created {:?} {}", K::KIND, id);
        Ok(Handle::new(id, self.queue.tx()))
    }

    /// Compile GLSL source into a shader object.
    ///
    /// On failure the compiler log is logged and returned in the error; the
    /// shader object is released either way.
    pub fn shader<N: Into<String>>(
        &self,
        stage: Stage,
        name: N,
        source: &str,
    ) -> Result<Rc<Shader>> {
        let name = name.into();
        let handle = self.handle::<kind::Shader>(self.driver.create_shader(stage.as_gl_enum()))?;
        self.driver.shader_source(handle.id(), source);
        self.driver.compile_shader(handle.id());
        if !self.driver.shader_compile_status(handle.id()) {
            let log = self.driver.shader_info_log(handle.id());
            error!("failed to compile shader: \"{}\"", name);
            error!("reason: {}", log);
            return Err(Error::ShaderCompile { name, log });
        }
        Ok(Rc::new(Shader::new(handle, stage, name)))
    }

    /// Read a GLSL source file in full and compile it.
    ///
    /// The shader is named after the file.
    pub fn shader_from_file<P: AsRef<path::Path>>(
        &self,
        stage: Stage,
        path: P,
    ) -> Result<Rc<Shader>> {
        let path = path.as_ref();
        let source = util::load_text_file(path)?;
        self.shader(stage, path.display().to_string(), &source)
    }

    /// Link compiled shaders into a GLSL program.
    ///
    /// The program keeps a reference to every shader it links.
    pub fn program(&self, shaders: &[Rc<Shader>]) -> Result<Program> {
        let mut linked = program::Shaders::new();
        for shader in shaders {
            if linked.try_push(shader.clone()).is_err() {
                let log = format!("at most {} shaders per program", program::MAX_SHADERS);
                error!("failed to link program: {}", log);
                return Err(Error::ProgramLink { log });
            }
        }

        let handle = self.handle::<kind::Program>(self.driver.create_program())?;
        for shader in &linked {
            debug!(
                "attach {:?} shader \"{}\" to program {}",
                shader.stage(),
                shader.name(),
                handle.id(),
            );
            self.driver.attach_shader(handle.id(), shader.id());
        }
        self.driver.link_program(handle.id());
        if !self.driver.program_link_status(handle.id()) {
            let log = self.driver.program_info_log(handle.id());
            error!("failed to link program: {}", log);
            return Err(Error::ProgramLink { log });
        }
        Ok(Program::new(handle, linked))
    }

    /// Compile a vertex and a fragment shader file and link them.
    pub fn program_from_files<P, Q>(&self, vertex: P, fragment: Q) -> Result<Program>
        where P: AsRef<path::Path>, Q: AsRef<path::Path>
    {
        let vs = self.shader_from_file(Stage::Vertex, vertex)?;
        let fs = self.shader_from_file(Stage::Fragment, fragment)?;
        self.program(&[vs, fs])
    }

    /// Makes `program` current until the returned pass is dropped.
    pub fn use_program<'a>(&'a mut self, program: &'a Program) -> Pass<'a, D> {
        Pass::new(self, program)
    }

    /// Create an uninitialized GPU buffer.
    pub fn buffer(&self, kind: buffer::Kind, usage: buffer::Usage) -> Result<Buffer> {
        let handle = self.handle(self.driver.gen_buffer())?;
        Ok(Buffer::new(handle, kind, usage))
    }

    /// (Re)-initialize the contents of a [`Buffer`].
    ///
    /// [`Buffer`]: ../buffer/struct.Buffer.html
    pub fn initialize_buffer<T: bytemuck::Pod>(&self, buffer: &mut Buffer, data: &[T]) {
        let target = buffer.kind().as_gl_enum();
        let bytes: &[u8] = bytemuck::cast_slice(data);
        // Index buffer binds attach to the bound vertex array.
        self.driver.bind_vertex_array(0);
        self.driver.bind_buffer(target, buffer.id());
        self.driver.buffer_data(target, bytes, buffer.usage().as_gl_enum());
        self.driver.bind_buffer(target, 0);
        buffer.set_size(bytes.len());
    }

    /// Create a GPU buffer holding `data`.
    pub fn buffer_with_data<T: bytemuck::Pod>(
        &self,
        kind: buffer::Kind,
        usage: buffer::Usage,
        data: &[T],
    ) -> Result<Buffer> {
        let mut buffer = self.buffer(kind, usage)?;
        self.initialize_buffer(&mut buffer, data);
        Ok(buffer)
    }

    /// Queries the driver for the byte size of a buffer.
    pub fn buffer_size(&self, buffer: &Buffer) -> usize {
        let target = buffer.kind().as_gl_enum();
        self.driver.bind_vertex_array(0);
        self.driver.bind_buffer(target, buffer.id());
        let size = self.driver.buffer_size(target);
        self.driver.bind_buffer(target, 0);
        size
    }

    /// Create an empty vertex layout.
    pub fn vertex_layout(&self) -> Result<VertexLayout> {
        let handle = self.handle(self.driver.gen_vertex_array())?;
        Ok(VertexLayout::new(handle))
    }

    /// Describes one vertex attribute of `layout`, read from `buffer`.
    pub fn set_attrib(
        &self,
        layout: &mut VertexLayout,
        buffer: &Buffer,
        slot: u32,
        attribute: Attribute,
    ) -> Result<()> {
        if slot >= vertex_array::MAX_ATTRIBUTES {
            return Err(Error::AttributeSlot(slot));
        }
        let size = attribute.format.size().ok_or(Error::AttributeFormat(attribute.format))?;

        // Vertex array, then buffer, then the attribute itself.
        self.driver.bind_vertex_array(layout.id());
        self.driver.bind_buffer(gl::ARRAY_BUFFER, buffer.id());
        self.driver.enable_vertex_attrib_array(slot);
        self.driver.vertex_attrib_pointer(
            slot,
            size as i32,
            attribute.format.gl_data_type(),
            attribute.format.norm(),
            attribute.stride as i32,
            attribute.offset,
        );
        self.driver.bind_vertex_array(0);
        self.driver.bind_buffer(gl::ARRAY_BUFFER, 0);

        layout.record_attribute(slot, Binding { buffer: buffer.id(), attribute });
        Ok(())
    }

    /// Attaches an index buffer to `layout`.
    ///
    /// `format` must be a single-component `U8`, `U16` or `U32`.
    pub fn set_indices(
        &self,
        layout: &mut VertexLayout,
        buffer: &Buffer,
        format: buffer::Format,
    ) -> Result<()> {
        match format {
            buffer::Format::U8(1) | buffer::Format::U16(1) | buffer::Format::U32(1) => {}
            _ => return Err(Error::AttributeFormat(format)),
        }
        self.driver.bind_vertex_array(layout.id());
        self.driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, buffer.id());
        self.driver.bind_vertex_array(0);
        layout.record_indices(buffer.id(), format);
        Ok(())
    }

    /// Uploads decoded pixels into a new mipmapped 2D texture with the
    /// default sampler.
    pub fn texture_from_image(&self, image: &Image) -> Result<Texture> {
        let format = texture::Format::from_channels(image.channels())?;
        let handle = self.handle::<kind::Texture>(self.driver.gen_texture())?;
        let sampler = Sampler::default();
        let (ty, pixel_format) = image.format().as_gl_enums();

        self.driver.bind_texture(gl::TEXTURE_2D, handle.id());
        self.driver.pixel_store(gl::UNPACK_ALIGNMENT, 1);
        self.driver.tex_image_2d(
            gl::TEXTURE_2D,
            format.as_gl_enum(),
            image.width(),
            image.height(),
            pixel_format,
            ty,
            image.data(),
        );
        self.driver.generate_mipmap(gl::TEXTURE_2D);
        self.apply_sampler(&sampler);
        self.driver.bind_texture(gl::TEXTURE_2D, 0);

        Ok(Texture::new(handle, image.width(), image.height(), true, format, sampler))
    }

    /// Replaces the filter and wrap parameters of a texture.
    pub fn set_sampler(&self, texture: &mut Texture, sampler: Sampler) {
        if sampler.min_filter.uses_mipmaps() && !texture.mipmap() {
            warn!("texture {} has no mipmaps for {:?}", texture.id(), sampler.min_filter);
        }
        if sampler.mag_filter.uses_mipmaps() {
            warn!("{:?} is not a magnification filter", sampler.mag_filter);
        }
        self.driver.bind_texture(gl::TEXTURE_2D, texture.id());
        self.apply_sampler(&sampler);
        self.driver.bind_texture(gl::TEXTURE_2D, 0);
        texture.set_sampler(sampler);
    }

    fn apply_sampler(&self, sampler: &Sampler) {
        let params = [
            (gl::TEXTURE_MIN_FILTER, sampler.min_filter.as_gl_enum()),
            (gl::TEXTURE_MAG_FILTER, sampler.mag_filter.as_gl_enum()),
            (gl::TEXTURE_WRAP_S, sampler.wrap_s.as_gl_enum()),
            (gl::TEXTURE_WRAP_T, sampler.wrap_t.as_gl_enum()),
        ];
        for (param, value) in params.iter() {
            self.driver.tex_parameteri(gl::TEXTURE_2D, *param, *value);
        }
    }

    /// Read back the contents of a [`Texture`] as RGBA8, bottom row first.
    ///
    /// [`Texture`]: ../texture/struct.Texture.html
    pub fn read_texture(&self, texture: &Texture) -> Vec<u8> {
        let mut contents = vec![0; texture.width() as usize * texture.height() as usize * 4];
        self.driver.bind_texture(gl::TEXTURE_2D, texture.id());
        self.driver.get_tex_image(gl::TEXTURE_2D, gl::RGBA, gl::UNSIGNED_BYTE, &mut contents);
        self.driver.bind_texture(gl::TEXTURE_2D, 0);
        contents
    }

    /// Clear the default framebuffer.
    pub fn clear(&self, op: ClearOp) {
        let mut ops = 0;
        match op.color {
            ClearColor::Yes { r, g, b, a } => {
                self.driver.clear_color(r, g, b, a);
                ops |= gl::COLOR_BUFFER_BIT;
            }
            ClearColor::No => {}
        }
        match op.depth {
            ClearDepth::Yes { z } => {
                self.driver.clear_depth(z);
                ops |= gl::DEPTH_BUFFER_BIT;
            }
            ClearDepth::No => {}
        }
        self.driver.clear(ops);
    }

    /// Applies fixed-function state for the draws that follow.
    pub fn set_state(&self, state: &State) {
        if let Some(face) = state.culling.as_gl_enum_if_enabled() {
            self.driver.enable(gl::CULL_FACE);
            self.driver.cull_face(face);
        } else {
            self.driver.disable(gl::CULL_FACE);
        }
        if let Some(func) = state.depth_test.as_gl_enum_if_enabled() {
            self.driver.enable(gl::DEPTH_TEST);
            self.driver.depth_func(func);
        } else {
            self.driver.disable(gl::DEPTH_TEST);
        }
        self.driver.polygon_mode(gl::FRONT_AND_BACK, state.polygon_mode.as_gl_enum());
        self.driver.point_size(state.point_size);
    }

    /// Sets the region of the framebuffer to render to.
    pub fn viewport(&self, viewport: Viewport) {
        self.driver.viewport(
            viewport.x as i32,
            viewport.y as i32,
            viewport.w as i32,
            viewport.h as i32,
        );
    }
}

impl<D: Driver> Drop for Factory<D> {
    fn drop(&mut self) {
        let count = self.collect_garbage();
        if count > 0 {
            debug!("deleted {} objects on shutdown", count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless;

    const VS: &str = "#version 330 core\nlayout (location = 0) in vec3 aPos;\nvoid main() { gl_Position = vec4(aPos, 1.0); }\n";
    const FS: &str = "#version 330 core\nout vec4 fragColor;\nuniform vec4 color;\nvoid main() { fragColor = color; }\n";

    fn factory() -> Factory<headless::Driver> {
        Factory::new(headless::Driver::new())
    }

    #[test]
    fn shaders_are_shared_between_programs() {
        let factory = factory();
        let vs = factory.shader(Stage::Vertex, "vs", VS).unwrap();
        let fs = factory.shader(Stage::Fragment, "fs", FS).unwrap();
        let a = factory.program(&[vs.clone(), fs.clone()]).unwrap();
        let b = factory.program(&[vs.clone(), fs.clone()]).unwrap();
        assert_eq!(Rc::strong_count(&vs), 3);
        assert_ne!(a, b);
        let stages: Vec<_> = a.shaders().iter().map(|shader| shader.stage()).collect();
        assert_eq!(stages, [Stage::Vertex, Stage::Fragment]);

        drop((a, b));
        assert_eq!(Rc::strong_count(&vs), 1);
    }

    #[test]
    fn debug_output_lists_the_fields() {
        let factory = factory();
        let vs = factory.shader(Stage::Vertex, "vs", VS).unwrap();
        let fs = factory.shader(Stage::Fragment, "fs", FS).unwrap();
        let program = factory.program(&[vs.clone(), fs]).unwrap();
        assert_eq!(
            format!("{:?}", program),
            format!("Program {{ id: {}, shaders: [\"vs\", \"fs\"] }}", program.id()),
        );
        assert!(format!("{:?}", vs).contains("stage: Vertex"));

        let buffer = factory.buffer(buffer::Kind::Array, buffer::Usage::StaticDraw).unwrap();
        assert!(format!("{:?}", buffer).starts_with(&format!("Buffer {{ id: {}", buffer.id())));
        let layout = factory.vertex_layout().unwrap();
        assert!(format!("{:?}", layout).contains("indices: None"));
    }

    #[test]
    fn zero_allocation_is_an_error() {
        let factory = factory();
        factory.driver().fail_allocations(Some(Kind::Buffer));
        match factory.buffer(buffer::Kind::Array, buffer::Usage::StaticDraw) {
            Err(Error::Allocation(Kind::Buffer)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn set_attrib_binds_the_vertex_array_first() {
        let factory = factory();
        let vertices = [0.0f32; 12];
        let vbo = factory
            .buffer_with_data(buffer::Kind::Array, buffer::Usage::StaticDraw, &vertices)
            .unwrap();
        let mut layout = factory.vertex_layout().unwrap();
        let attribute = Attribute::new(buffer::Format::F32(3), 0, 12);
        factory.set_attrib(&mut layout, &vbo, 0, attribute).unwrap();

        let recorded = factory.driver().attribute(layout.id(), 0).unwrap();
        assert_eq!(recorded.buffer, vbo.id());
        assert_eq!(recorded.size, 3);
        assert_eq!(recorded.stride, 12);
        assert!(factory.driver().attribute_enabled(layout.id(), 0));
        assert_eq!(factory.driver().vertex_array_bound(), 0);
        assert_eq!(layout.attribute(0).map(|b| b.buffer), Some(vbo.id()));
        assert_eq!(factory.driver().get_error(), gl::NO_ERROR);
    }

    #[test]
    fn attribute_slots_are_bounded() {
        let factory = factory();
        let vbo = factory.buffer(buffer::Kind::Array, buffer::Usage::StaticDraw).unwrap();
        let mut layout = factory.vertex_layout().unwrap();
        let attribute = Attribute::new(buffer::Format::F32(3), 0, 12);
        match factory.set_attrib(&mut layout, &vbo, vertex_array::MAX_ATTRIBUTES, attribute) {
            Err(Error::AttributeSlot(8)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        let bad = Attribute::new(buffer::Format::F32(5), 0, 20);
        match factory.set_attrib(&mut layout, &vbo, 0, bad) {
            Err(Error::AttributeFormat(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn uploading_a_buffer_keeps_the_layout_indices() {
        let factory = factory();
        let indices = [0u32, 1, 2];
        let ebo = factory
            .buffer_with_data(buffer::Kind::Index, buffer::Usage::StaticDraw, &indices)
            .unwrap();
        let mut layout = factory.vertex_layout().unwrap();
        factory.set_indices(&mut layout, &ebo, buffer::Format::U32(1)).unwrap();

        let mut other = factory.buffer(buffer::Kind::Index, buffer::Usage::StaticDraw).unwrap();
        factory.initialize_buffer(&mut other, &[3u32, 4, 5]);
        assert_eq!(factory.driver().element_buffer(layout.id()), ebo.id());
        assert_eq!(layout.index_format(), Some(buffer::Format::U32(1)));
    }

    #[test]
    fn pass_restores_no_program() {
        let mut factory = factory();
        let program = {
            let vs = factory.shader(Stage::Vertex, "vs", VS).unwrap();
            let fs = factory.shader(Stage::Fragment, "fs", FS).unwrap();
            factory.program(&[vs, fs]).unwrap()
        };
        {
            let pass = factory.use_program(&program);
            assert_eq!(pass.program(), &program);
            pass.set_uniform("color", glam::Vec4::new(1.0, 0.0, 0.0, 1.0));
        }
        assert_eq!(factory.driver().program_in_use(), 0);
        assert_eq!(
            factory.driver().uniform(program.id(), "color"),
            Some(headless::Value::Vec4([1.0, 0.0, 0.0, 1.0])),
        );
    }

    #[test]
    fn clear_sets_color_and_mask() {
        let factory = factory();
        factory.clear(ClearOp::color_and_depth([0.0, 0.1, 0.2, 0.3]));
        assert_eq!(factory.driver().clear_color_value(), [0.0, 0.1, 0.2, 0.3]);
        assert_eq!(
            factory.driver().clears(),
            vec![gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT],
        );
    }

    #[test]
    fn garbage_is_deleted_once() {
        let factory = factory();
        let buffer = factory.buffer(buffer::Kind::Array, buffer::Usage::StaticDraw).unwrap();
        let texture = factory.texture_from_image(&Image::checker(2, 2, 1)).unwrap();
        drop((buffer, texture));
        assert_eq!(factory.collect_garbage(), 2);
        assert_eq!(factory.collect_garbage(), 0);
        assert_eq!(factory.driver().live_objects(), 0);
    }
}
