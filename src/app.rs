//! The per-window main loop state.

use crate::config::Config;
use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::headless;
use crate::input::{Action, Event, Key, KeyState};
use crate::pipeline::Viewport;
use crate::scene::{Frame, Scene};
use crate::util::Assets;

/// Lifecycle of an [`App`].
///
/// [`App`]: struct.App.html
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Phase {
    /// Resources are built, no frame has been drawn yet.
    Initialized,

    /// At least one frame has been drawn.
    Rendering,

    /// Escape was pressed or the window was closed.
    Terminated,
}

/// A scene plus the loop state around it.
pub struct App<S: Scene> {
    scene: S,
    phase: Phase,
    keys: KeyState,
    width: u32,
    height: u32,
    time: f32,
    frames: u64,
}

impl<S: Scene> App<S> {
    /// Builds the scene and sets the viewport to the framebuffer size.
    pub fn new<D: Driver>(
        factory: &Factory<D>,
        assets: &Assets,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        info!("initialize scene: {} (assets in {})", S::NAME, assets.root().display());
        let scene = S::init(factory, assets).map_err(|err| {
            error!("failed to create scene: {}", S::NAME);
            err
        })?;
        info!("framebuffer size changed: ({} x {})", width, height);
        factory.viewport(Viewport::full(width, height));
        Ok(Self {
            scene,
            phase: Phase::Initialized,
            keys: KeyState::new(),
            width,
            height,
            time: 0.0,
            frames: 0,
        })
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` until the app terminates.
    pub fn is_running(&self) -> bool {
        self.phase != Phase::Terminated
    }

    /// Process exit code after a clean shutdown.
    pub fn exit_code(&self) -> i32 {
        0
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the scene.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Returns the keys currently held.
    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// Returns the scene mutably.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Dispatches one event to the scene.
    pub fn handle<D: Driver>(&mut self, factory: &Factory<D>, event: Event) {
        match event {
            Event::Key { key, scancode, action, modifiers } => {
                let action = match action {
                    Action::Press => self.keys.press(key),
                    Action::Release => {
                        self.keys.release(key);
                        Action::Release
                    }
                    Action::Repeat => Action::Repeat,
                };
                info!(
                    "key: {:?}, scancode: {}, action: {}, mods: {}",
                    key,
                    scancode,
                    action,
                    modifiers,
                );
                if key == Key::Escape && action == Action::Press {
                    self.phase = Phase::Terminated;
                    return;
                }
                self.scene.key(key, action, modifiers);
            }
            Event::CursorMoved { x, y } => self.scene.mouse_move(x, y),
            Event::MouseButton { button, action, x, y } => {
                self.scene.mouse_button(button, action, x, y)
            }
            Event::Scroll { dx, dy } => self.scene.scroll(dx, dy),
            Event::Resized { width, height } => {
                info!("framebuffer size changed: ({} x {})", width, height);
                self.width = width;
                self.height = height;
                factory.viewport(Viewport::full(width, height));
                self.scene.reshape(width, height);
            }
            Event::FocusLost => {
                debug!("focus lost, releasing held keys");
                self.keys.clear();
            }
            Event::Close => self.phase = Phase::Terminated,
        }
    }

    /// Runs one loop iteration: handle `events`, then, unless terminated,
    /// poll input, render a frame and delete released objects.
    pub fn iterate<D, I>(&mut self, factory: &mut Factory<D>, events: I, dt: f32) -> Phase
        where D: Driver, I: IntoIterator<Item = Event>
    {
        for event in events {
            if !self.is_running() {
                break;
            }
            self.handle(factory, event);
        }
        if !self.is_running() {
            return self.phase;
        }

        self.time += dt;
        let frame = Frame {
            time: self.time,
            dt,
            width: self.width,
            height: self.height,
        };
        self.scene.process_input(&self.keys, &frame);
        self.scene.render(factory, &frame);
        factory.collect_garbage();
        self.frames += 1;
        self.phase = Phase::Rendering;
        self.phase
    }
}

/// Runs a scene against the software driver for `config.max_frames`
/// frames (one if unset), at a fixed 60Hz step.
pub fn run_headless<S: Scene>(config: &Config) -> Result<i32> {
    let mut factory = Factory::new(headless::Driver::new());
    info!("OpenGL context version: {}", factory.version());
    let assets = Assets::new(&config.assets);
    let mut app = App::<S>::new(&factory, &assets, config.width, config.height)?;

    info!("start main loop");
    let frames = config.max_frames.unwrap_or(1);
    while app.is_running() && app.frames() < frames {
        app.iterate(&mut factory, std::iter::empty(), 1.0 / 60.0);
    }
    info!(
        "rendered {} frames, {} draw calls",
        app.frames(),
        factory.driver().draws().len(),
    );
    let code = app.exit_code();
    drop(app);
    factory.collect_garbage();
    Ok(code)
}
