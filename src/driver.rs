//! The graphics driver seam.
//!
//! Every raw call the crate issues goes through [`Driver`]. Enumerations are
//! passed as the OpenGL constants from [`gl`]. Two implementations exist:
//! [`gl::Backend`], which calls the real function table, and
//! [`headless::Driver`], a software model of the same state machine.
//!
//! [`Driver`]: trait.Driver.html
//! [`gl`]: ../gl/index.html
//! [`gl::Backend`]: ../gl/struct.Backend.html
//! [`headless::Driver`]: ../headless/struct.Driver.html

use crate::handle::Id;
use std::ffi;

/// Raw OpenGL 3.3 core calls used by the crate.
pub trait Driver {
    // Diagnostics

    /// Corresponds to `glGetError`.
    fn get_error(&self) -> u32;

    /// Corresponds to `glGetString(GL_VERSION)`.
    fn version(&self) -> String;

    // Pipeline state

    /// Corresponds to `glClearColor`.
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);

    /// Corresponds to `glClearDepth`.
    fn clear_depth(&self, z: f64);

    /// Corresponds to `glClear`.
    fn clear(&self, mask: u32);

    /// Corresponds to `glEnable`.
    fn enable(&self, cap: u32);

    /// Corresponds to `glDisable`.
    fn disable(&self, cap: u32);

    /// Corresponds to `glCullFace`.
    fn cull_face(&self, face: u32);

    /// Corresponds to `glDepthFunc`.
    fn depth_func(&self, func: u32);

    /// Corresponds to `glPolygonMode`.
    fn polygon_mode(&self, face: u32, mode: u32);

    /// Corresponds to `glPointSize`.
    fn point_size(&self, size: f32);

    /// Corresponds to `glViewport`.
    fn viewport(&self, x: i32, y: i32, w: i32, h: i32);

    // Shaders and programs

    /// Corresponds to `glCreateShader`.
    fn create_shader(&self, ty: u32) -> Id;

    /// Corresponds to `glShaderSource` with a single string.
    fn shader_source(&self, id: Id, source: &str);

    /// Corresponds to `glCompileShader`.
    fn compile_shader(&self, id: Id);

    /// Corresponds to `glGetShaderiv(GL_COMPILE_STATUS)`.
    fn shader_compile_status(&self, id: Id) -> bool;

    /// Corresponds to `glGetShaderInfoLog`.
    fn shader_info_log(&self, id: Id) -> String;

    /// Corresponds to `glDeleteShader`.
    fn delete_shader(&self, id: Id);

    /// Corresponds to `glCreateProgram`.
    fn create_program(&self) -> Id;

    /// Corresponds to `glAttachShader`.
    fn attach_shader(&self, program: Id, shader: Id);

    /// Corresponds to `glLinkProgram`.
    fn link_program(&self, id: Id);

    /// Corresponds to `glGetProgramiv(GL_LINK_STATUS)`.
    fn program_link_status(&self, id: Id) -> bool;

    /// Corresponds to `glGetProgramInfoLog`.
    fn program_info_log(&self, id: Id) -> String;

    /// Corresponds to `glDeleteProgram`.
    fn delete_program(&self, id: Id);

    /// Corresponds to `glUseProgram`.
    fn use_program(&self, id: Id);

    /// Corresponds to `glGetUniformLocation`. Returns `-1` for unknown names.
    fn get_uniform_location(&self, program: Id, name: &ffi::CStr) -> i32;

    /// Corresponds to `glUniform1i`.
    fn uniform_1i(&self, location: i32, value: i32);

    /// Corresponds to `glUniform1f`.
    fn uniform_1f(&self, location: i32, value: f32);

    /// Corresponds to `glUniform3f`.
    fn uniform_3f(&self, location: i32, x: f32, y: f32, z: f32);

    /// Corresponds to `glUniform4f`.
    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32);

    /// Corresponds to `glUniformMatrix4fv` for one column-major matrix.
    fn uniform_matrix_4fv(&self, location: i32, value: &[f32; 16]);

    // Buffers

    /// Corresponds to `glGenBuffers` for one buffer.
    fn gen_buffer(&self) -> Id;

    /// Corresponds to `glBindBuffer`.
    fn bind_buffer(&self, target: u32, id: Id);

    /// Corresponds to `glBufferData`.
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);

    /// Corresponds to `glGetBufferParameteriv(GL_BUFFER_SIZE)`.
    fn buffer_size(&self, target: u32) -> usize;

    /// Corresponds to `glDeleteBuffers` for one buffer.
    fn delete_buffer(&self, id: Id);

    // Vertex arrays

    /// Corresponds to `glGenVertexArrays` for one vertex array.
    fn gen_vertex_array(&self) -> Id;

    /// Corresponds to `glBindVertexArray`.
    fn bind_vertex_array(&self, id: Id);

    /// Corresponds to `glEnableVertexAttribArray`.
    fn enable_vertex_attrib_array(&self, index: u32);

    /// Corresponds to `glVertexAttribPointer`.
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        norm: bool,
        stride: i32,
        offset: usize,
    );

    /// Corresponds to `glDeleteVertexArrays` for one vertex array.
    fn delete_vertex_array(&self, id: Id);

    // Textures

    /// Corresponds to `glGenTextures` for one texture.
    fn gen_texture(&self) -> Id;

    /// Corresponds to `glActiveTexture`.
    fn active_texture(&self, unit: u32);

    /// Corresponds to `glBindTexture`.
    fn bind_texture(&self, target: u32, id: Id);

    /// Corresponds to `glTexParameteri`.
    fn tex_parameteri(&self, target: u32, param: u32, value: u32);

    /// Corresponds to `glPixelStorei`.
    fn pixel_store(&self, param: u32, value: i32);

    /// Corresponds to `glTexImage2D` at mip level zero.
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        data: &[u8],
    );

    /// Corresponds to `glGetTexImage` at mip level zero.
    fn get_tex_image(&self, target: u32, format: u32, ty: u32, out: &mut [u8]);

    /// Corresponds to `glGenerateMipmap`.
    fn generate_mipmap(&self, target: u32);

    /// Corresponds to `glDeleteTextures` for one texture.
    fn delete_texture(&self, id: Id);

    // Draw calls

    /// Corresponds to `glDrawArrays`.
    fn draw_arrays(&self, mode: u32, first: usize, count: usize);

    /// Corresponds to `glDrawElements` with a byte offset into the bound
    /// index buffer.
    fn draw_elements(&self, mode: u32, count: usize, ty: u32, offset: usize);
}
