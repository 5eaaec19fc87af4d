use gl_primer::app::{App, Phase};
use gl_primer::driver::Driver as _;
use gl_primer::gl;
use gl_primer::headless::{self, Value};
use gl_primer::input::{Action, Event, Key, Modifiers};
use gl_primer::scene::{self, Scene};
use gl_primer::util::Assets;
use gl_primer::Factory;

const DT: f32 = 1.0 / 60.0;
const IDLE: [Event; 0] = [];

fn assets() -> Assets {
    Assets::new(env!("CARGO_MANIFEST_DIR"))
}

fn key(key: Key, action: Action) -> Event {
    Event::Key { key, scancode: 0, action, modifiers: Modifiers::default() }
}

/// Renders two frames of `S` and returns the recorded draw calls.
fn render_twice<S: Scene>() -> Vec<headless::Draw> {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<S>::new(&factory, &assets(), 640, 480).unwrap();
    assert_eq!(app.phase(), Phase::Initialized);
    assert_eq!(app.iterate(&mut factory, IDLE, DT), Phase::Rendering);
    assert_eq!(app.iterate(&mut factory, IDLE, DT), Phase::Rendering);
    assert_eq!(app.frames(), 2);
    assert_eq!(factory.driver().get_error(), gl::NO_ERROR);
    assert_eq!(factory.driver().program_in_use(), 0);
    assert_eq!(factory.driver().viewport_value(), [0, 0, 640, 480]);
    factory.driver().draws()
}

#[test]
fn clear_only_clears() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::Clear>::new(&factory, &assets(), 320, 200).unwrap();
    app.iterate(&mut factory, IDLE, DT);
    assert!(factory.driver().draws().is_empty());
    assert_eq!(factory.driver().clears(), vec![gl::COLOR_BUFFER_BIT]);
    assert_eq!(factory.driver().clear_color_value(), [0.0, 0.1, 0.2, 0.3]);
}

#[test]
fn point_draws_one_vertex() {
    let draws = render_twice::<scene::Point>();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].mode, gl::POINTS);
    assert_eq!((draws[0].first, draws[0].count), (0, 1));
    assert_eq!(draws[0].index_type, None);
}

#[test]
fn point_is_drawn_large() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::Point>::new(&factory, &assets(), 640, 480).unwrap();
    app.iterate(&mut factory, IDLE, DT);
    assert_eq!(factory.driver().point_size_value(), 10.0);
    assert!(!factory.driver().is_enabled(gl::DEPTH_TEST));
}

#[test]
fn triangle_uploads_its_color() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::Triangle>::new(&factory, &assets(), 640, 480).unwrap();
    app.iterate(&mut factory, IDLE, DT);

    let draws = factory.driver().draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].mode, gl::TRIANGLES);
    assert_eq!(draws[0].count, 3);
    match factory.driver().uniform(draws[0].program, "color") {
        Some(Value::Vec4([_, _, _, a])) => assert_eq!(a, 1.0),
        other => panic!("unexpected uniform: {:?}", other),
    }
}

#[test]
fn rectangle_is_indexed() {
    let draws = render_twice::<scene::Rectangle>();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].count, 6);
    assert_eq!(draws[0].index_type, Some(gl::UNSIGNED_INT));
}

#[test]
fn textured_cube_binds_two_units() {
    let draws = render_twice::<scene::TexturedCube>();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].count, 36);
    let units: Vec<u32> = draws[0].textures.iter().map(|&(unit, _)| unit).collect();
    assert_eq!(units, vec![0, 1]);
}

#[test]
fn lit_cubes_draws_the_lamp_then_ten_cubes() {
    let draws = render_twice::<scene::LitCubes>();
    assert_eq!(draws.len(), 22);
    let lamp = draws[0].program;
    let lit = draws[1].program;
    assert_ne!(lamp, lit);
    assert!(draws[1 .. 11].iter().all(|draw| draw.program == lit));
    assert!(draws.iter().all(|draw| draw.count == 36));
}

#[test]
fn lit_cubes_material_samplers_use_units_zero_and_one() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::LitCubes>::new(&factory, &assets(), 640, 480).unwrap();
    app.iterate(&mut factory, IDLE, DT);

    let lit = factory.driver().draws()[1].program;
    assert_eq!(factory.driver().uniform(lit, "material.diffuse"), Some(Value::Int(0)));
    assert_eq!(factory.driver().uniform(lit, "material.specular"), Some(Value::Int(1)));
    assert_eq!(
        factory.driver().uniform(lit, "light.position"),
        Some(Value::Vec3([2.0, 2.0, 2.0])),
    );
    assert_eq!(app.scene().light(), &scene::Light::default());
    assert!(factory.driver().is_enabled(gl::DEPTH_TEST));
}

#[test]
fn lit_cubes_lays_out_its_debug_window() {
    let factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::LitCubes>::new(&factory, &assets(), 640, 480).unwrap();
    let ctx = egui::Context::default();
    let _ = ctx.run(egui::RawInput::default(), |ctx| app.scene_mut().ui(ctx));
    let output = ctx.run(egui::RawInput::default(), |ctx| app.scene_mut().ui(ctx));
    assert!(!output.shapes.is_empty());

    // Laying out without input edits nothing.
    assert!(app.scene().animation());
    assert_eq!(app.scene().light(), &scene::Light::default());
    assert_eq!(app.scene().camera().fov, 45.0);
}

#[test]
fn scenes_without_controls_draw_no_window() {
    let factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::Triangle>::new(&factory, &assets(), 640, 480).unwrap();
    let ctx = egui::Context::default();
    let output = ctx.run(egui::RawInput::default(), |ctx| app.scene_mut().ui(ctx));
    assert!(output.shapes.is_empty());
}

#[test]
fn scrolling_zooms_the_camera() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::TexturedCube>::new(&factory, &assets(), 640, 480).unwrap();
    assert_eq!(app.scene().camera().fov, 45.0);
    app.iterate(&mut factory, vec![Event::Scroll { dx: 0.0, dy: 5.0 }], DT);
    assert_eq!(app.scene().camera().fov, 40.0);
    app.iterate(&mut factory, vec![Event::Scroll { dx: 0.0, dy: -20.0 }], DT);
    assert_eq!(app.scene().camera().fov, 45.0);

    let mut lit = App::<scene::LitCubes>::new(&factory, &assets(), 640, 480).unwrap();
    lit.iterate(&mut factory, vec![Event::Scroll { dx: 0.0, dy: 100.0 }], DT);
    assert_eq!(lit.scene().camera().fov, 1.0);
}

#[test]
fn losing_focus_releases_held_keys() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::TexturedCube>::new(&factory, &assets(), 640, 480).unwrap();
    app.iterate(&mut factory, vec![key(Key::W, Action::Press)], DT);
    assert!(app.keys().is_down(Key::W));
    app.iterate(&mut factory, vec![Event::FocusLost], DT);
    assert!(!app.keys().is_down(Key::W));
}

#[test]
fn unmapped_keys_do_not_repeat_each_other() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::Clear>::new(&factory, &assets(), 640, 480).unwrap();
    let press = |scancode| Event::Key {
        key: Key::Unknown,
        scancode,
        action: Action::Press,
        modifiers: Modifiers::default(),
    };
    app.iterate(&mut factory, vec![press(44), press(45)], DT);
    assert!(!app.keys().is_down(Key::Unknown));
}

#[test]
fn space_toggles_the_animation() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::LitCubes>::new(&factory, &assets(), 640, 480).unwrap();
    assert!(app.scene().animation());
    app.iterate(&mut factory, vec![key(Key::Space, Action::Press)], DT);
    assert!(!app.scene().animation());
    app.iterate(&mut factory, vec![key(Key::Space, Action::Release)], DT);
    assert!(!app.scene().animation());
}

#[test]
fn escape_terminates_without_rendering() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::Triangle>::new(&factory, &assets(), 640, 480).unwrap();
    let phase = app.iterate(&mut factory, vec![key(Key::Escape, Action::Press)], DT);
    assert_eq!(phase, Phase::Terminated);
    assert!(!app.is_running());
    assert_eq!(app.exit_code(), 0);
    assert_eq!(app.frames(), 0);
    assert!(factory.driver().draws().is_empty());
}

#[test]
fn close_terminates() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::Clear>::new(&factory, &assets(), 640, 480).unwrap();
    assert_eq!(app.iterate(&mut factory, vec![Event::Close], DT), Phase::Terminated);
}

#[test]
fn resize_updates_the_viewport() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::Clear>::new(&factory, &assets(), 640, 480).unwrap();
    app.iterate(&mut factory, vec![Event::Resized { width: 800, height: 600 }], DT);
    assert_eq!(factory.driver().viewport_value(), [0, 0, 800, 600]);
}

#[test]
fn missing_assets_fail_init_without_leaks() {
    let factory = Factory::new(headless::Driver::new());
    let empty = Assets::new(std::env::temp_dir().join("gl-primer-no-assets"));
    assert!(App::<scene::LitCubes>::new(&factory, &empty, 640, 480).is_err());
    factory.collect_garbage();
    assert_eq!(factory.driver().live_objects(), 0);
}

#[test]
fn dropping_a_scene_releases_everything() {
    let mut factory = Factory::new(headless::Driver::new());
    let mut app = App::<scene::TexturedCube>::new(&factory, &assets(), 640, 480).unwrap();
    app.iterate(&mut factory, IDLE, DT);
    assert!(factory.driver().live_objects() > 0);
    drop(app);
    factory.collect_garbage();
    assert_eq!(factory.driver().live_objects(), 0);
}
