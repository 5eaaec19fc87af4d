//! GLSL programs.

use crate::driver::Driver;
use crate::handle::{kind, Handle, Id};
use crate::shader::Shader;
use std::{cmp, fmt, hash, rc};

/// Specifies the maximum number of shader stages a program may link.
pub const MAX_SHADERS: usize = 4;

/// Linked shader stages, shared with any other program that links them.
pub type Shaders = arrayvec::ArrayVec<rc::Rc<Shader>, MAX_SHADERS>;

/// A value that can be uploaded to a named uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    /// `int`, `bool` and sampler uniforms.
    Int(i32),

    /// `float` uniforms.
    Float(f32),

    /// `vec3` uniforms.
    Vec3(glam::Vec3),

    /// `vec4` uniforms.
    Vec4(glam::Vec4),

    /// `mat4` uniforms.
    Mat4(glam::Mat4),
}

impl Uniform {
    /// Uploads the value to a location of the program in use.
    ///
    /// Location `-1` is passed through; the driver ignores it.
    pub(crate) fn upload<D: Driver>(&self, driver: &D, location: i32) {
        match *self {
            Uniform::Int(x) => driver.uniform_1i(location, x),
            Uniform::Float(x) => driver.uniform_1f(location, x),
            Uniform::Vec3(v) => driver.uniform_3f(location, v.x, v.y, v.z),
            Uniform::Vec4(v) => driver.uniform_4f(location, v.x, v.y, v.z, v.w),
            Uniform::Mat4(m) => driver.uniform_matrix_4fv(location, &m.to_cols_array()),
        }
    }
}

impl From<i32> for Uniform {
    fn from(x: i32) -> Self {
        Uniform::Int(x)
    }
}

impl From<bool> for Uniform {
    fn from(x: bool) -> Self {
        Uniform::Int(x as i32)
    }
}

impl From<f32> for Uniform {
    fn from(x: f32) -> Self {
        Uniform::Float(x)
    }
}

impl From<glam::Vec3> for Uniform {
    fn from(v: glam::Vec3) -> Self {
        Uniform::Vec3(v)
    }
}

impl From<glam::Vec4> for Uniform {
    fn from(v: glam::Vec4) -> Self {
        Uniform::Vec4(v)
    }
}

impl From<glam::Mat4> for Uniform {
    fn from(m: glam::Mat4) -> Self {
        Uniform::Mat4(m)
    }
}

/// A compiled and linked shader program.
pub struct Program {
    /// The OpenGL program object.
    handle: Handle<kind::Program>,

    /// The stages linked into the program, in attachment order.
    shaders: Shaders,
}

impl Program {
    /// Constructor.
    pub(crate) fn new(handle: Handle<kind::Program>, shaders: Shaders) -> Self {
        Self { handle, shaders }
    }

    /// Returns the GLSL program ID.
    pub fn id(&self) -> Id {
        self.handle.id()
    }

    /// Returns the linked stages in attachment order.
    pub fn shaders(&self) -> &[rc::Rc<Shader>] {
        &self.shaders
    }
}

impl cmp::Eq for Program {}

impl cmp::PartialEq<Self> for Program {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shaders: Vec<&str> = self.shaders.iter().map(|shader| shader.name()).collect();
        f.debug_struct("Program")
            .field("id", &self.id())
            .field("shaders", &shaders)
            .finish()
    }
}

impl hash::Hash for Program {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_uniforms_upload_as_ints() {
        assert_eq!(Uniform::from(true), Uniform::Int(1));
        assert_eq!(Uniform::from(false), Uniform::Int(0));
    }

    #[test]
    fn matrices_upload_column_major() {
        use crate::headless;
        use crate::driver::Driver as _;

        let driver = headless::Driver::new();
        let vs = driver.create_shader(crate::gl::VERTEX_SHADER);
        driver.shader_source(vs, "#version 330 core\nuniform mat4 transform;\nvoid main() {}\n");
        driver.compile_shader(vs);
        let fs = driver.create_shader(crate::gl::FRAGMENT_SHADER);
        driver.shader_source(fs, "#version 330 core\nvoid main() {}\n");
        driver.compile_shader(fs);
        let program = driver.create_program();
        driver.attach_shader(program, vs);
        driver.attach_shader(program, fs);
        driver.link_program(program);
        driver.use_program(program);

        let m = glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let name = std::ffi::CString::new("transform").unwrap();
        let location = driver.get_uniform_location(program, &name);
        Uniform::from(m).upload(&driver, location);

        match driver.uniform(program, "transform") {
            Some(headless::Value::Mat4(cols)) => assert_eq!(&cols[12 .. 15], &[1.0, 2.0, 3.0]),
            other => panic!("unexpected uniform value: {:?}", other),
        }
    }
}
