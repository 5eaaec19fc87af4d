use super::{Frame, Mesh, Scene};
use crate::camera::Camera;
use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::image::Image;
use crate::input::{Action, Key, KeyState, Modifiers, MouseButton};
use crate::pipeline::{ClearOp, DepthTest, State};
use crate::program::Program;
use crate::texture::Texture;
use crate::util::Assets;
use glam::{Mat4, Vec3};

/// Point light parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 2.0, 2.0),
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.5),
            specular: Vec3::splat(1.0),
        }
    }
}

/// Ten textured cubes under a Phong-lit point light, with a free camera
/// and an egui window for the light, material and camera values.
///
/// `Space` toggles the animation, `R` resets the camera and the scroll
/// wheel zooms.
pub struct LitCubes {
    lighting: Program,
    flat: Program,
    cube: Mesh,
    diffuse: Texture,
    specular: Texture,

    camera: Camera,
    clear_color: [f32; 4],
    light: Light,
    shininess: f32,
    animation: bool,
    elapsed: f32,
}

const CUBES: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Degrees per second of cube rotation while animating.
const SPIN_RATE: f32 = 20.0;

fn start_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, 3.0))
}

impl LitCubes {
    /// Returns the camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the light.
    pub fn light(&self) -> &Light {
        &self.light
    }

    /// Returns `true` while the cubes spin.
    pub fn animation(&self) -> bool {
        self.animation
    }
}

/// Three drag values editing a vector in place.
fn drag_vec3(ui: &mut egui::Ui, value: &mut Vec3, speed: f64) {
    ui.horizontal(|ui| {
        for component in AsMut::<[f32; 3]>::as_mut(value) {
            ui.add(egui::DragValue::new(component).speed(speed));
        }
    });
}

impl Scene for LitCubes {
    const NAME: &'static str = "lit-cubes";

    fn init<D: Driver>(factory: &Factory<D>, assets: &Assets) -> Result<Self> {
        let cube = Mesh::cube(factory)?;
        let lighting = factory.program_from_files(
            assets.shader("lighting.vs"),
            assets.shader("lighting.fs"),
        )?;
        let flat = factory.program_from_files(
            assets.shader("transform.vs"),
            assets.shader("uniform_color.fs"),
        )?;
        info!("program ids: lighting {}, light cube {}", lighting.id(), flat.id());

        let diffuse = factory.texture_from_image(&Image::load(assets.image("container.png"))?)?;
        let specular = factory.texture_from_image(&Image::solid(4, 4, &[128, 128, 128])?)?;

        Ok(Self {
            lighting,
            flat,
            cube,
            diffuse,
            specular,
            camera: start_camera(),
            clear_color: [0.1, 0.2, 0.3, 0.0],
            light: Light::default(),
            shininess: 32.0,
            animation: true,
            elapsed: 0.0,
        })
    }

    fn render<D: Driver>(&mut self, factory: &mut Factory<D>, frame: &Frame) {
        if self.animation {
            self.elapsed += frame.dt;
        }
        self.camera.update();

        factory.clear(ClearOp::color_and_depth(self.clear_color));
        factory.set_state(&State { depth_test: DepthTest::LessThan, ..State::default() });

        let fov = self.camera.fov.to_radians();
        let projection = Mat4::perspective_rh_gl(fov, frame.aspect(), 0.01, 50.0);
        let view = self.camera.view();

        {
            let pass = factory.use_program(&self.flat);
            let model = Mat4::from_translation(self.light.position) * Mat4::from_scale(Vec3::splat(0.1));
            pass.set_uniform("transform", projection * view * model);
            pass.set_uniform("color", self.light.diffuse.extend(1.0));
            self.cube.draw(&pass);
        }

        let pass = factory.use_program(&self.lighting);
        pass.set_uniform("viewPos", self.camera.position);
        pass.set_uniform("light.position", self.light.position);
        pass.set_uniform("light.ambient", self.light.ambient);
        pass.set_uniform("light.diffuse", self.light.diffuse);
        pass.set_uniform("light.specular", self.light.specular);
        pass.set_uniform("material.diffuse", 0);
        pass.set_uniform("material.specular", 1);
        pass.set_uniform("material.shininess", self.shininess);
        pass.bind_texture(0, &self.diffuse);
        pass.bind_texture(1, &self.specular);

        let axis = Vec3::new(1.0, 0.5, 0.0).normalize();
        for (i, position) in CUBES.iter().enumerate() {
            let angle = (self.elapsed * SPIN_RATE + 20.0 * i as f32).to_radians();
            let model = Mat4::from_translation(*position) * Mat4::from_axis_angle(axis, angle);
            pass.set_uniform("transform", projection * view * model);
            pass.set_uniform("modelTransform", model);
            self.cube.draw(&pass);
        }
    }

    fn process_input(&mut self, keys: &KeyState, frame: &Frame) {
        self.camera.process_input(keys, frame.dt);
    }

    fn key(&mut self, key: Key, action: Action, _modifiers: Modifiers) {
        match (key, action) {
            (Key::Space, Action::Press) => {
                self.animation = !self.animation;
                info!("animation: {}", self.animation);
            }
            (Key::R, Action::Press) => {
                self.camera = start_camera();
                info!("camera reset");
            }
            _ => {}
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

    fn ui(&mut self, ctx: &egui::Context) {
        egui::Window::new("lit cubes").default_pos([10.0, 10.0]).show(ctx, |ui| {
            egui::Grid::new("lit-cubes-values").num_columns(2).show(ui, |ui| {
                ui.label("clear color");
                ui.color_edit_button_rgba_unmultiplied(&mut self.clear_color);
                ui.end_row();

                ui.label("camera position");
                drag_vec3(ui, &mut self.camera.position, 0.1);
                ui.end_row();

                ui.label("camera yaw");
                let yaw = egui::DragValue::new(&mut self.camera.yaw).speed(1.0);
                ui.add(yaw.clamp_range(0.0..=359.0));
                ui.end_row();

                ui.label("camera pitch");
                let pitch = egui::DragValue::new(&mut self.camera.pitch).speed(1.0);
                ui.add(pitch.clamp_range(-89.0..=89.0));
                ui.end_row();

                ui.label("field of view");
                ui.add(egui::Slider::new(&mut self.camera.fov, 1.0..=45.0));
                ui.end_row();

                ui.label("light position");
                drag_vec3(ui, &mut self.light.position, 0.1);
                ui.end_row();

                ui.label("light ambient");
                ui.color_edit_button_rgb(self.light.ambient.as_mut());
                ui.end_row();

                ui.label("light diffuse");
                ui.color_edit_button_rgb(self.light.diffuse.as_mut());
                ui.end_row();

                ui.label("light specular");
                ui.color_edit_button_rgb(self.light.specular.as_mut());
                ui.end_row();

                ui.label("material shininess");
                ui.add(egui::Slider::new(&mut self.shininess, 1.0..=256.0).logarithmic(true));
                ui.end_row();
            });
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.animation, "animation");
                if ui.button("reset camera").clicked() {
                    self.camera = start_camera();
                }
            });
        });
    }
}
