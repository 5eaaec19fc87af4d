use super::{Frame, Mesh, Scene};
use crate::camera::Camera;
use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::image::Image;
use crate::input::{Action, Key, KeyState, Modifiers, MouseButton};
use crate::pipeline::{ClearOp, DepthTest, State};
use crate::program::Program;
use crate::sampler::{Filter, Sampler, Wrap};
use crate::texture::Texture;
use crate::util::Assets;
use glam::{Mat4, Vec3};

/// A spinning cube blending an image texture with a checkerboard.
///
/// The scroll wheel zooms and `R` resets the camera.
pub struct TexturedCube {
    program: Program,
    cube: Mesh,
    image: Texture,
    checker: Texture,
    camera: Camera,
}

/// Degrees per second about the spin axis.
const SPIN_RATE: f32 = 50.0;

impl TexturedCube {
    /// Returns the camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

impl Scene for TexturedCube {
    const NAME: &'static str = "textured-cube";

    fn init<D: Driver>(factory: &Factory<D>, assets: &Assets) -> Result<Self> {
        let cube = Mesh::cube(factory)?;
        let program = factory.program_from_files(
            assets.shader("texture.vs"),
            assets.shader("texture.fs"),
        )?;

        let image = Image::load(assets.image("container.png"))?;
        let image = factory.texture_from_image(&image)?;

        let mut checker = factory.texture_from_image(&Image::checker(512, 512, 32))?;
        factory.set_sampler(
            &mut checker,
            Sampler::filter(Filter::NearestMipmapNearest, Filter::Nearest)
                .with_wrap(Wrap::Repeat, Wrap::Repeat),
        );

        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        camera.invert_pitch = true;

        Ok(Self { program, cube, image, checker, camera })
    }

    fn render<D: Driver>(&mut self, factory: &mut Factory<D>, frame: &Frame) {
        self.camera.update();
        factory.clear(ClearOp::color_and_depth([0.1, 0.2, 0.3, 0.0]));
        factory.set_state(&State { depth_test: DepthTest::LessThan, ..State::default() });

        let fov = self.camera.fov.to_radians();
        let projection = Mat4::perspective_rh_gl(fov, frame.aspect(), 0.01, 10.0);
        let view = self.camera.view();
        let model = Mat4::from_axis_angle(
            Vec3::new(1.0, 0.5, 0.0).normalize(),
            (frame.time * SPIN_RATE).to_radians(),
        );

        let pass = factory.use_program(&self.program);
        pass.bind_texture(0, &self.image);
        pass.bind_texture(1, &self.checker);
        pass.set_uniform("tex", 0);
        pass.set_uniform("tex2", 1);
        pass.set_uniform("transform", projection * view * model);
        self.cube.draw(&pass);
    }

    fn process_input(&mut self, keys: &KeyState, frame: &Frame) {
        self.camera.process_input(keys, frame.dt);
    }

    fn key(&mut self, key: Key, action: Action, _modifiers: Modifiers) {
        if key == Key::R && action == Action::Press {
            self.camera = Camera::new(Vec3::new(0.0, 0.0, 3.0));
            self.camera.invert_pitch = true;
        }
    }

    fn mouse_move(&mut self, x: f64, y: f64) {
        self.camera.mouse_move(x, y);
    }

    fn mouse_button(&mut self, button: MouseButton, action: Action, x: f64, y: f64) {
        self.camera.mouse_button(button, action, x, y);
    }

    fn scroll(&mut self, _dx: f32, dy: f32) {
        self.camera.zoom(dy);
    }
}
