//! Free-look camera.

use crate::input::{Action, Key, KeyState, MouseButton};
use glam::{Mat4, Vec2, Vec3};

/// Movement speed in units per second.
const MOVE_SPEED: f32 = 3.0;

/// Degrees of rotation per pixel of cursor travel.
const ROTATE_SPEED: f32 = 0.8;

/// Pitch is kept inside this range to avoid flipping over the poles.
const PITCH_LIMIT: f32 = 89.0;

/// Narrowest and widest vertical field of view, in degrees.
const FOV_RANGE: (f32, f32) = (1.0, 45.0);

/// A first-person camera driven by yaw and pitch angles.
///
/// Keyboard movement and mouse look only apply while control is active,
/// which the right mouse button toggles.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,

    /// Rotation about the world Y axis, in degrees, within `[0, 360)`.
    pub yaw: f32,

    /// Rotation about the camera X axis, in degrees, within `[-89, 89]`.
    pub pitch: f32,

    /// World up direction.
    pub up: Vec3,

    /// Flip the vertical mouse axis.
    pub invert_pitch: bool,

    /// Vertical field of view, in degrees.
    pub fov: f32,

    front: Vec3,
    control: bool,
    cursor: Vec2,
}

impl Camera {
    /// Camera at `position` looking down negative Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            up: Vec3::Y,
            invert_pitch: false,
            fov: FOV_RANGE.1,
            front: Vec3::NEG_Z,
            control: false,
            cursor: Vec2::ZERO,
        }
    }

    /// Recomputes the front vector from yaw and pitch.
    pub fn update(&mut self) {
        let rotation = Mat4::from_rotation_y(self.yaw.to_radians())
            * Mat4::from_rotation_x(self.pitch.to_radians());
        self.front = rotation.transform_vector3(Vec3::NEG_Z).normalize();
    }

    /// The unit vector the camera looks along.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Returns `true` while the camera follows input.
    pub fn has_control(&self) -> bool {
        self.control
    }

    /// World-to-view transform.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Narrows the field of view by `lines` of scroll, widening it for
    /// negative values.
    pub fn zoom(&mut self, lines: f32) {
        self.fov = (self.fov - lines).clamp(FOV_RANGE.0, FOV_RANGE.1);
    }

    /// Moves the camera for held keys: `W`/`S` forward and back, `A`/`D`
    /// sideways, `E`/`Q` up and down.
    pub fn process_input(&mut self, keys: &KeyState, dt: f32) {
        if !self.control {
            return;
        }
        self.update();
        let step = MOVE_SPEED * dt;
        let right = self.up.cross(-self.front).normalize();
        let up = (-self.front).cross(right);
        let bindings = [
            (Key::W, self.front),
            (Key::S, -self.front),
            (Key::D, right),
            (Key::A, -right),
            (Key::E, up),
            (Key::Q, -up),
        ];
        for (key, direction) in bindings.iter() {
            if keys.is_down(*key) {
                self.position += *direction * step;
            }
        }
    }

    /// Rotates the camera by the cursor travel since the last event.
    pub fn mouse_move(&mut self, x: f64, y: f64) {
        if !self.control {
            return;
        }
        let position = Vec2::new(x as f32, y as f32);
        let delta = position - self.cursor;
        self.cursor = position;

        self.yaw -= delta.x * ROTATE_SPEED;
        if self.invert_pitch {
            self.pitch += delta.y * ROTATE_SPEED;
        } else {
            self.pitch -= delta.y * ROTATE_SPEED;
        }

        self.yaw = self.yaw.rem_euclid(360.0);
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update();
    }

    /// Takes control on right button press and releases it on release.
    pub fn mouse_button(&mut self, button: MouseButton, action: Action, x: f64, y: f64) {
        if button != MouseButton::Right {
            return;
        }
        match action {
            Action::Press => {
                self.cursor = Vec2::new(x as f32, y as f32);
                self.control = true;
            }
            Action::Release => self.control = false,
            Action::Repeat => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controlled() -> Camera {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        camera.mouse_button(MouseButton::Right, Action::Press, 100.0, 100.0);
        camera
    }

    #[test]
    fn input_is_ignored_without_control() {
        let mut camera = Camera::new(Vec3::ZERO);
        let mut keys = KeyState::new();
        keys.press(Key::W);
        camera.process_input(&keys, 1.0);
        camera.mouse_move(500.0, 500.0);
        assert_eq!(camera.position, Vec3::ZERO);
        assert_eq!(camera.yaw, 0.0);
    }

    #[test]
    fn forward_follows_the_front_vector() {
        let mut camera = controlled();
        let mut keys = KeyState::new();
        keys.press(Key::W);
        camera.process_input(&keys, 1.0);
        assert!((camera.position - Vec3::new(0.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped_and_yaw_wraps() {
        let mut camera = controlled();
        camera.mouse_move(100.0, -1000.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.mouse_move(110.0, -1000.0);
        assert!((camera.yaw - 352.0).abs() < 1e-4);
    }

    #[test]
    fn inverted_pitch_flips_vertical_motion() {
        let mut camera = controlled();
        camera.invert_pitch = true;
        camera.mouse_move(100.0, 110.0);
        assert!(camera.pitch > 0.0);
    }

    #[test]
    fn releasing_the_right_button_drops_control() {
        let mut camera = controlled();
        assert!(camera.has_control());
        camera.mouse_button(MouseButton::Left, Action::Release, 0.0, 0.0);
        assert!(camera.has_control());
        camera.mouse_button(MouseButton::Right, Action::Release, 0.0, 0.0);
        assert!(!camera.has_control());
    }

    #[test]
    fn movement_uses_the_latest_orientation() {
        let mut camera = controlled();
        camera.yaw = 90.0;
        let mut keys = KeyState::new();
        keys.press(Key::W);
        camera.process_input(&keys, 1.0);
        assert!((camera.position - Vec3::new(-MOVE_SPEED, 0.0, 3.0)).length() < 1e-4);

        camera.mouse_move(100.0 + 90.0 / ROTATE_SPEED as f64, 100.0);
        assert!((camera.front() - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.zoom(5.0);
        assert_eq!(camera.fov, 40.0);
        camera.zoom(100.0);
        assert_eq!(camera.fov, FOV_RANGE.0);
        camera.zoom(-100.0);
        assert_eq!(camera.fov, FOV_RANGE.1);
    }

    #[test]
    fn yaw_turns_the_view_left() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.yaw = 90.0;
        camera.update();
        assert!((camera.front() - Vec3::NEG_X).length() < 1e-5);
    }
}
