//! Small instructional OpenGL scenes on top of a thin resource-handle
//! wrapper.
//!
//! Every driver object is owned by exactly one [`Handle`] minted by the
//! [`Factory`], which is also the explicit pipeline state context threaded
//! through every render call.
//!
//! [`Handle`]: handle/struct.Handle.html
//! [`Factory`]: factory/struct.Factory.html

#[macro_use]
extern crate log;

mod overlay;
mod queue;

pub mod app;
pub mod buffer;
pub mod camera;
pub mod config;
pub mod draw_call;
pub mod driver;
pub mod error;
pub mod factory;
pub mod gl;
pub mod handle;
pub mod headless;
pub mod image;
pub mod input;
pub mod pipeline;
pub mod program;
pub mod sampler;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod util;
pub mod vertex_array;
pub mod window;

#[doc(inline)]
pub use app::App;

#[doc(inline)]
pub use buffer::Buffer;

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use draw_call::DrawCall;

#[doc(inline)]
pub use draw_call::Primitive;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use factory::Factory;

#[doc(inline)]
pub use handle::Handle;

#[doc(inline)]
pub use image::Image;

#[doc(inline)]
pub use pipeline::Pass;

#[doc(inline)]
pub use pipeline::State;

#[doc(inline)]
pub use program::{Program, Uniform};

#[doc(inline)]
pub use sampler::Sampler;

#[doc(inline)]
pub use scene::{Scene, SceneKind};

#[doc(inline)]
pub use shader::{Shader, Stage};

#[doc(inline)]
pub use texture::Texture;

#[doc(inline)]
pub use vertex_array::VertexLayout;
