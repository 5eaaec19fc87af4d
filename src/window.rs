//! Windowed main loop on glutin.

use crate::app::{App, Phase};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::factory::Factory;
use crate::input::{Action, Event, Key, Modifiers, MouseButton};
use crate::overlay::Overlay;
use crate::scene::Scene;
use crate::util::Assets;
use glutin::dpi::PhysicalSize;
use glutin::event::{self, ElementState, MouseScrollDelta, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::run_return::EventLoopExtRunReturn;
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, CreationError, GlProfile, GlRequest};
use std::time::Instant;

/// Opens a window with an OpenGL core context and runs `S` until Escape is
/// pressed or the window is closed.
///
/// Returns the process exit code.
pub fn run<S: Scene>(config: &Config) -> Result<i32> {
    info!("initialize event loop");
    let mut event_loop = EventLoop::new();

    info!("create window");
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(config.width, config.height));
    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, config.gl_version))
        .with_gl_profile(GlProfile::Core)
        .with_vsync(config.vsync)
        .with_multisampling(config.samples)
        .build_windowed(window, &event_loop)
        .map_err(|err| {
            error!("failed to create window: {}", err);
            creation_error(err)
        })?;
    let context = unsafe { context.make_current() }.map_err(|(_, err)| {
        error!("failed to make context current: {}", err);
        Error::ContextCreation(err.to_string())
    })?;

    let mut factory = Factory::load(|sym| context.get_proc_address(sym) as *const _)?;
    info!("OpenGL context version: {}", factory.version());

    let size = context.window().inner_size();
    let assets = Assets::new(&config.assets);
    let mut app = App::<S>::new(&factory, &assets, size.width, size.height)?;
    let mut overlay = Overlay::new(&event_loop, |sym| context.get_proc_address(sym) as *const _);

    info!("start main loop");
    let max_frames = config.max_frames;
    let mut modifiers = Modifiers::default();
    let mut cursor = (0.0, 0.0);
    let mut pending = Vec::new();
    let mut last = Instant::now();
    let code = event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            event::Event::WindowEvent { event, .. } => {
                if let WindowEvent::Resized(size) = event {
                    context.resize(size);
                }
                if overlay.on_event(&event) {
                    return;
                }
                if let Some(event) = translate(&event, &mut modifiers, &mut cursor) {
                    pending.push(event);
                }
            }
            event::Event::MainEventsCleared => {
                let now = Instant::now();
                let dt = (now - last).as_secs_f32();
                last = now;
                if app.iterate(&mut factory, pending.drain(..), dt) == Phase::Terminated {
                    *control_flow = ControlFlow::ExitWithCode(app.exit_code());
                    return;
                }
                overlay.draw(context.window(), app.scene_mut());
                if let Err(err) = context.swap_buffers() {
                    error!("failed to swap buffers: {}", err);
                }
                if max_frames.map_or(false, |max| app.frames() >= max) {
                    *control_flow = ControlFlow::ExitWithCode(app.exit_code());
                }
            }
            _ => {}
        }
    });

    // Scene resources go before the factory deletes them, and the overlay
    // before the context.
    drop(overlay);
    drop(app);
    factory.collect_garbage();
    Ok(code)
}

fn creation_error(err: CreationError) -> Error {
    match err {
        CreationError::NoBackendAvailable(_) => Error::LibraryInit(err.to_string()),
        CreationError::OpenGlVersionNotSupported
        | CreationError::NoAvailablePixelFormat
        | CreationError::RobustnessNotSupported => Error::ContextCreation(err.to_string()),
        _ => Error::WindowCreation(err.to_string()),
    }
}

/// Translates a window event, tracking modifier and cursor state across
/// events.
fn translate(
    event: &WindowEvent,
    modifiers: &mut Modifiers,
    cursor: &mut (f64, f64),
) -> Option<Event> {
    match *event {
        WindowEvent::CloseRequested => Some(Event::Close),
        WindowEvent::Focused(false) => Some(Event::FocusLost),
        WindowEvent::Resized(size) => Some(Event::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::ModifiersChanged(state) => {
            *modifiers = Modifiers {
                control: state.ctrl(),
                shift: state.shift(),
                alt: state.alt(),
            };
            None
        }
        WindowEvent::KeyboardInput { input, .. } => Some(Event::Key {
            key: input.virtual_keycode.map(key).unwrap_or(Key::Unknown),
            scancode: input.scancode,
            action: action(input.state),
            modifiers: *modifiers,
        }),
        WindowEvent::CursorMoved { position, .. } => {
            *cursor = (position.x, position.y);
            Some(Event::CursorMoved { x: position.x, y: position.y })
        }
        WindowEvent::MouseInput { state, button, .. } => Some(Event::MouseButton {
            button: mouse_button(button),
            action: action(state),
            x: cursor.0,
            y: cursor.1,
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(dx, dy) => (dx, dy),
                MouseScrollDelta::PixelDelta(position) => {
                    (position.x as f32 / 20.0, position.y as f32 / 20.0)
                }
            };
            Some(Event::Scroll { dx, dy })
        }
        _ => None,
    }
}

fn action(state: ElementState) -> Action {
    match state {
        ElementState::Pressed => Action::Press,
        ElementState::Released => Action::Release,
    }
}

fn mouse_button(button: event::MouseButton) -> MouseButton {
    match button {
        event::MouseButton::Left => MouseButton::Left,
        event::MouseButton::Right => MouseButton::Right,
        event::MouseButton::Middle => MouseButton::Middle,
        event::MouseButton::Other(n) => MouseButton::Other(n),
    }
}

fn key(code: VirtualKeyCode) -> Key {
    match code {
        VirtualKeyCode::Escape => Key::Escape,
        VirtualKeyCode::Space => Key::Space,
        VirtualKeyCode::W => Key::W,
        VirtualKeyCode::A => Key::A,
        VirtualKeyCode::S => Key::S,
        VirtualKeyCode::D => Key::D,
        VirtualKeyCode::Q => Key::Q,
        VirtualKeyCode::E => Key::E,
        VirtualKeyCode::R => Key::R,
        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_map_to_scene_keys() {
        assert_eq!(key(VirtualKeyCode::Escape), Key::Escape);
        assert_eq!(key(VirtualKeyCode::W), Key::W);
        assert_eq!(key(VirtualKeyCode::Z), Key::Unknown);
    }

    #[test]
    fn mouse_buttons_carry_the_last_cursor_position() {
        let mut modifiers = Modifiers::default();
        let mut cursor = (12.0, 34.0);
        #[allow(deprecated)]
        let event = WindowEvent::MouseInput {
            device_id: unsafe { event::DeviceId::dummy() },
            state: ElementState::Pressed,
            button: event::MouseButton::Right,
            modifiers: Default::default(),
        };
        assert_eq!(
            translate(&event, &mut modifiers, &mut cursor),
            Some(Event::MouseButton {
                button: MouseButton::Right,
                action: Action::Press,
                x: 12.0,
                y: 34.0,
            }),
        );
    }
}
