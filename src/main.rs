use clap::Parser;
use gl_primer::config::Config;
use gl_primer::scene::{self, SceneKind};
use gl_primer::{app, window, Scene};
use std::path::PathBuf;
use std::process;

/// Scene selection for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum CliScene {
    /// Clear the window to a fixed color.
    Clear,
    /// One point, no uniforms.
    Point,
    /// A triangle with an animated uniform color.
    Triangle,
    /// An indexed quad with per-vertex colors.
    Rectangle,
    /// A spinning cube with two textures.
    TexturedCube,
    /// Ten Phong-lit cubes with a free camera and a control surface.
    #[default]
    LitCubes,
}

impl From<CliScene> for SceneKind {
    fn from(cli: CliScene) -> Self {
        match cli {
            CliScene::Clear => SceneKind::Clear,
            CliScene::Point => SceneKind::Point,
            CliScene::Triangle => SceneKind::Triangle,
            CliScene::Rectangle => SceneKind::Rectangle,
            CliScene::TexturedCube => SceneKind::TexturedCube,
            CliScene::LitCubes => SceneKind::LitCubes,
        }
    }
}

/// Instructional OpenGL scenes.
#[derive(Parser, Debug)]
#[command(
    name = "gl-primer",
    about = "Instructional OpenGL scenes",
    long_about = "Instructional OpenGL scenes.\n\n\
        Press Escape or close the window to quit. In the camera scenes, hold\n\
        the right mouse button to look around, move with W/A/S/D/Q/E and\n\
        scroll to zoom. In lit-cubes, the overlay window edits the light,\n\
        material and camera values.",
    version
)]
struct ClapArgs {
    /// Scene to run.
    #[arg(long, default_value = "lit-cubes", value_enum)]
    scene: CliScene,

    /// Initial window width in pixels.
    #[arg(long, default_value = "960")]
    width: u32,

    /// Initial window height in pixels.
    #[arg(long, default_value = "540")]
    height: u32,

    /// Disable vertical sync.
    #[arg(long)]
    no_vsync: bool,

    /// Multisample count, zero to disable.
    #[arg(long, default_value = "0")]
    samples: u16,

    /// Directory holding shader/ and image/.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Render with the software driver, without opening a window.
    #[arg(long)]
    headless: bool,

    /// Exit after rendering N frames.
    #[arg(long)]
    max_frames: Option<u64>,
}

impl From<ClapArgs> for Config {
    fn from(args: ClapArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            vsync: !args.no_vsync,
            samples: args.samples,
            assets: args.assets,
            scene: args.scene.into(),
            headless: args.headless,
            max_frames: args.max_frames,
            ..Config::default()
        }
    }
}

fn run<S: Scene>(config: &Config) -> gl_primer::Result<i32> {
    if config.headless {
        app::run_headless::<S>(config)
    } else {
        window::run::<S>(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from(ClapArgs::parse());
    log::info!("start program: scene {}", config.scene);

    let result = match config.scene {
        SceneKind::Clear => run::<scene::Clear>(&config),
        SceneKind::Point => run::<scene::Point>(&config),
        SceneKind::Triangle => run::<scene::Triangle>(&config),
        SceneKind::Rectangle => run::<scene::Rectangle>(&config),
        SceneKind::TexturedCube => run::<scene::TexturedCube>(&config),
        SceneKind::LitCubes => run::<scene::LitCubes>(&config),
    };
    match result {
        Ok(code) => process::exit(code),
        Err(err) => {
            log::error!("{}", err);
            process::exit(err.exit_code());
        }
    }
}
