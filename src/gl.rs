use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::handle::Id;
use std::{ffi, os, ptr, rc};

// Import OpenGL bindings.
include!(concat!(env!("OUT_DIR"), "/gl.rs"));

/// Entry points that must resolve for any scene to run.
const REQUIRED: &[&str] = &[
    "glCreateShader",
    "glCreateProgram",
    "glGenBuffers",
    "glGenVertexArrays",
    "glGenTextures",
    "glVertexAttribPointer",
    "glUniformMatrix4fv",
    "glDrawElements",
];

/// OpenGL function table for the current context.
#[derive(Clone)]
pub struct Backend {
    gl: rc::Rc<Gl>,
}

impl Backend {
    /// Load the function table through the context's symbol lookup.
    ///
    /// Fails if any entry point the crate depends on does not resolve.
    pub fn load<F>(mut func: F) -> Result<Self>
        where F: FnMut(&str) -> *const os::raw::c_void
    {
        let mut missing = None;
        let gl = Gl::load_with(|sym| {
            let addr = func(sym);
            if addr.is_null() && missing.is_none() {
                missing = REQUIRED.iter().find(|name| **name == sym).cloned();
            }
            addr as *const _
        });
        match missing {
            Some(name) => Err(Error::FunctionTable(name)),
            None => Ok(Backend { gl: rc::Rc::new(gl) }),
        }
    }

    /// Corresponds to `glGetError` plus an error check.
    fn check_error(&self) {
        let error = unsafe { self.gl.GetError() };
        if error != 0 {
            error!(target: "gl", "0x{:x}", error);
        }
    }
}

impl Driver for Backend {
    // Diagnostics

    fn get_error(&self) -> u32 {
        unsafe { self.gl.GetError() }
    }

    fn version(&self) -> String {
        unsafe {
            let ptr = self.gl.GetString(VERSION);
            if ptr.is_null() {
                String::new()
            } else {
                ffi::CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
            }
        }
    }

    // Pipeline state

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        trace!(target: "gl", "glClearColor{:?}", (r, g, b, a));
        unsafe {
            self.gl.ClearColor(r, g, b, a);
        }
        self.check_error();
    }

    fn clear_depth(&self, z: f64) {
        trace!(target: "gl", "glClearDepth{:?}", (z,));
        unsafe {
            self.gl.ClearDepth(z);
        }
        self.check_error();
    }

    fn clear(&self, mask: u32) {
        trace!(target: "gl", "glClear{:?}", (mask,));
        unsafe {
            self.gl.Clear(mask);
        }
        self.check_error();
    }

    fn enable(&self, cap: u32) {
        trace!(target: "gl", "glEnable{:?}", (cap,));
        unsafe {
            self.gl.Enable(cap);
        }
        self.check_error();
    }

    fn disable(&self, cap: u32) {
        trace!(target: "gl", "glDisable{:?}", (cap,));
        unsafe {
            self.gl.Disable(cap);
        }
        self.check_error();
    }

    fn cull_face(&self, face: u32) {
        trace!(target: "gl", "glCullFace{:?}", (face,));
        unsafe {
            self.gl.CullFace(face);
        }
        self.check_error();
    }

    fn depth_func(&self, func: u32) {
        trace!(target: "gl", "glDepthFunc{:?}", (func,));
        unsafe {
            self.gl.DepthFunc(func);
        }
        self.check_error();
    }

    fn polygon_mode(&self, face: u32, mode: u32) {
        trace!(target: "gl", "glPolygonMode{:?}", (face, mode));
        unsafe {
            self.gl.PolygonMode(face, mode);
        }
        self.check_error();
    }

    fn point_size(&self, size: f32) {
        trace!(target: "gl", "glPointSize{:?}", (size,));
        unsafe {
            self.gl.PointSize(size);
        }
        self.check_error();
    }

    fn viewport(&self, x: i32, y: i32, w: i32, h: i32) {
        trace!(target: "gl", "glViewport{:?}", (x, y, w, h));
        unsafe {
            self.gl.Viewport(x, y, w, h);
        }
        self.check_error();
    }

    // Shaders and programs

    fn create_shader(&self, ty: u32) -> Id {
        trace!(target: "gl", "glCreateShader{:?}", (ty,));
        let id = unsafe { self.gl.CreateShader(ty) };
        self.check_error();
        id
    }

    fn shader_source(&self, id: Id, source: &str) {
        trace!(target: "gl", "glShaderSource{:?}", (id, source.len()));
        let ptr = source.as_ptr() as *const types::GLchar;
        let len = source.len() as types::GLint;
        unsafe {
            self.gl.ShaderSource(id, 1, &ptr, &len);
        }
        self.check_error();
    }

    fn compile_shader(&self, id: Id) {
        trace!(target: "gl", "glCompileShader{:?}", (id,));
        unsafe {
            self.gl.CompileShader(id);
        }
        self.check_error();
    }

    fn shader_compile_status(&self, id: Id) -> bool {
        let mut status = 0;
        unsafe {
            self.gl.GetShaderiv(id, COMPILE_STATUS, &mut status);
        }
        self.check_error();
        status != 0
    }

    fn shader_info_log(&self, id: Id) -> String {
        let mut len = 0;
        unsafe {
            self.gl.GetShaderiv(id, INFO_LOG_LENGTH, &mut len);
        }
        let mut log = vec![0u8; len.max(1) as usize];
        let mut written = 0;
        unsafe {
            self.gl.GetShaderInfoLog(
                id,
                log.len() as _,
                &mut written,
                log.as_mut_ptr() as *mut _,
            );
        }
        self.check_error();
        log.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&log).into_owned()
    }

    fn delete_shader(&self, id: Id) {
        trace!(target: "gl", "glDeleteShader{:?}", (id,));
        unsafe {
            self.gl.DeleteShader(id);
        }
        self.check_error();
    }

    fn create_program(&self) -> Id {
        trace!(target: "gl", "glCreateProgram()");
        let id = unsafe { self.gl.CreateProgram() };
        self.check_error();
        id
    }

    fn attach_shader(&self, program: Id, shader: Id) {
        trace!(target: "gl", "glAttachShader{:?}", (program, shader));
        unsafe {
            self.gl.AttachShader(program, shader);
        }
        self.check_error();
    }

    fn link_program(&self, id: Id) {
        trace!(target: "gl", "glLinkProgram{:?}", (id,));
        unsafe {
            self.gl.LinkProgram(id);
        }
        self.check_error();
    }

    fn program_link_status(&self, id: Id) -> bool {
        let mut status = 0;
        unsafe {
            self.gl.GetProgramiv(id, LINK_STATUS, &mut status);
        }
        self.check_error();
        status != 0
    }

    fn program_info_log(&self, id: Id) -> String {
        let mut len = 0;
        unsafe {
            self.gl.GetProgramiv(id, INFO_LOG_LENGTH, &mut len);
        }
        let mut log = vec![0u8; len.max(1) as usize];
        let mut written = 0;
        unsafe {
            self.gl.GetProgramInfoLog(
                id,
                log.len() as _,
                &mut written,
                log.as_mut_ptr() as *mut _,
            );
        }
        self.check_error();
        log.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&log).into_owned()
    }

    fn delete_program(&self, id: Id) {
        trace!(target: "gl", "glDeleteProgram{:?}", (id,));
        unsafe {
            self.gl.DeleteProgram(id);
        }
        self.check_error();
    }

    fn use_program(&self, id: Id) {
        trace!(target: "gl", "glUseProgram{:?}", (id,));
        unsafe {
            self.gl.UseProgram(id);
        }
        self.check_error();
    }

    fn get_uniform_location(&self, program: Id, name: &ffi::CStr) -> i32 {
        trace!(target: "gl", "glGetUniformLocation{:?}", (program, name));
        let location = unsafe {
            self.gl.GetUniformLocation(program, name.as_ptr())
        };
        self.check_error();
        location
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        trace!(target: "gl", "glUniform1i{:?}", (location, value));
        unsafe {
            self.gl.Uniform1i(location, value);
        }
        self.check_error();
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        trace!(target: "gl", "glUniform1f{:?}", (location, value));
        unsafe {
            self.gl.Uniform1f(location, value);
        }
        self.check_error();
    }

    fn uniform_3f(&self, location: i32, x: f32, y: f32, z: f32) {
        trace!(target: "gl", "glUniform3f{:?}", (location, x, y, z));
        unsafe {
            self.gl.Uniform3f(location, x, y, z);
        }
        self.check_error();
    }

    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        trace!(target: "gl", "glUniform4f{:?}", (location, x, y, z, w));
        unsafe {
            self.gl.Uniform4f(location, x, y, z, w);
        }
        self.check_error();
    }

    fn uniform_matrix_4fv(&self, location: i32, value: &[f32; 16]) {
        trace!(target: "gl", "glUniformMatrix4fv{:?}", (location,));
        unsafe {
            self.gl.UniformMatrix4fv(location, 1, FALSE, value.as_ptr());
        }
        self.check_error();
    }

    // Buffers

    fn gen_buffer(&self) -> Id {
        let mut id: u32 = 0;
        unsafe {
            self.gl.GenBuffers(1, &mut id as *mut _);
        }
        trace!(target: "gl", "glGenBuffers(1) => {}", id);
        self.check_error();
        id
    }

    fn bind_buffer(&self, target: u32, id: Id) {
        trace!(target: "gl", "glBindBuffer{:?}", (target, id));
        unsafe {
            self.gl.BindBuffer(target, id);
        }
        self.check_error();
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        trace!(target: "gl", "glBufferData{:?}", (target, data.len(), usage));
        unsafe {
            self.gl.BufferData(
                target,
                data.len() as types::GLsizeiptr,
                data.as_ptr() as *const _,
                usage,
            );
        }
        self.check_error();
    }

    fn buffer_size(&self, target: u32) -> usize {
        let mut size = 0;
        unsafe {
            self.gl.GetBufferParameteriv(target, BUFFER_SIZE, &mut size);
        }
        self.check_error();
        size.max(0) as usize
    }

    fn delete_buffer(&self, id: Id) {
        trace!(target: "gl", "glDeleteBuffers{:?}", (1, id));
        unsafe {
            self.gl.DeleteBuffers(1, &id as *const _);
        }
        self.check_error();
    }

    // Vertex arrays

    fn gen_vertex_array(&self) -> Id {
        let mut id: u32 = 0;
        unsafe {
            self.gl.GenVertexArrays(1, &mut id as *mut _);
        }
        trace!(target: "gl", "glGenVertexArrays(1) => {}", id);
        self.check_error();
        id
    }

    fn bind_vertex_array(&self, id: Id) {
        trace!(target: "gl", "glBindVertexArray{:?}", (id,));
        unsafe {
            self.gl.BindVertexArray(id);
        }
        self.check_error();
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        trace!(target: "gl", "glEnableVertexAttribArray{:?}", (index,));
        unsafe {
            self.gl.EnableVertexAttribArray(index);
        }
        self.check_error();
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
        trace!(
            target: "gl",
            "glVertexAttribPointer{:?}",
            (index, size, ty, norm, stride, offset),
        );
        unsafe {
            self.gl.VertexAttribPointer(
                index,
                size,
                ty,
                if norm { TRUE } else { FALSE },
                stride,
                offset as *const _,
            );
        }
        self.check_error();
    }

    fn delete_vertex_array(&self, id: Id) {
        trace!(target: "gl", "glDeleteVertexArrays{:?}", (1, id));
        unsafe {
            self.gl.DeleteVertexArrays(1, &id as *const _);
        }
        self.check_error();
    }

    // Textures

    fn gen_texture(&self) -> Id {
        let mut id: u32 = 0;
        unsafe {
            self.gl.GenTextures(1, &mut id as *mut _);
        }
        trace!(target: "gl", "glGenTextures(1) => {}", id);
        self.check_error();
        id
    }

    fn active_texture(&self, unit: u32) {
        trace!(target: "gl", "glActiveTexture{:?}", (unit,));
        unsafe {
            self.gl.ActiveTexture(unit);
        }
        self.check_error();
    }

    fn bind_texture(&self, target: u32, id: Id) {
        trace!(target: "gl", "glBindTexture{:?}", (target, id));
        unsafe {
            self.gl.BindTexture(target, id);
        }
        self.check_error();
    }

    fn tex_parameteri(&self, target: u32, param: u32, value: u32) {
        trace!(target: "gl", "glTexParameteri{:?}", (target, param, value));
        unsafe {
            self.gl.TexParameteri(target, param, value as i32);
        }
        self.check_error();
    }

    fn pixel_store(&self, param: u32, value: i32) {
        trace!(target: "gl", "glPixelStorei{:?}", (param, value));
        unsafe {
            self.gl.PixelStorei(param, value);
        }
        self.check_error();
    }

    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        trace!(
            target: "gl",
            "glTexImage2D{:?}",
            (target, internal_format, width, height, format, ty, data.len()),
        );
        let pixels = if data.is_empty() {
            ptr::null()
        } else {
            data.as_ptr() as *const _
        };
        unsafe {
            self.gl.TexImage2D(
                target,
                0,
                internal_format as i32,
                width as i32,
                height as i32,
                0,
                format,
                ty,
                pixels,
            );
        }
        self.check_error();
    }

    fn get_tex_image(&self, target: u32, format: u32, ty: u32, out: &mut [u8]) {
        trace!(target: "gl", "glGetTexImage{:?}", (target, format, ty, out.len()));
        unsafe {
            self.gl.GetTexImage(target, 0, format, ty, out.as_mut_ptr() as *mut _);
        }
        self.check_error();
    }

    fn generate_mipmap(&self, target: u32) {
        trace!(target: "gl", "glGenerateMipmap{:?}", (target,));
        unsafe {
            self.gl.GenerateMipmap(target);
        }
        self.check_error();
    }

    fn delete_texture(&self, id: Id) {
        trace!(target: "gl", "glDeleteTextures{:?}", (1, id));
        unsafe {
            self.gl.DeleteTextures(1, &id as *const _);
        }
        self.check_error();
    }

    // Draw calls

    fn draw_arrays(&self, mode: u32, first: usize, count: usize) {
        trace!(target: "gl", "glDrawArrays{:?}", (mode, first, count));
        unsafe {
            self.gl.DrawArrays(mode, first as _, count as _);
        }
        self.check_error();
    }

    fn draw_elements(&self, mode: u32, count: usize, ty: u32, offset: usize) {
        trace!(target: "gl", "glDrawElements{:?}", (mode, count, ty, offset));
        unsafe {
            self.gl.DrawElements(mode, count as _, ty, offset as *const _);
        }
        self.check_error();
    }
}
