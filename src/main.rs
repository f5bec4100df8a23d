use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;
use tracing::Level;

use term_splitview::config::{DisplaySpec, LayoutConfig};
use term_splitview::debug_log::{
    DEFAULT_MAX_LINES, DebugLogHandle, install_panic_hook, set_global_debug_log,
};
use term_splitview::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_splitview::error::AppError;
use term_splitview::geometry::Size;
use term_splitview::playground::{Playground, run_playground};
use term_splitview::tracing_sub;

const AFTER_HELP: &str = indoc! {"
    Keys (press ? inside the playground for the full list):
      n / x      open / close a window
      f          float or unfloat the active window
      [ / ]      snap the active window to the primary / secondary side
      t / o / k  toggle tablet mode / rotate / toggle the on-screen keyboard
      q          quit
"};

#[derive(Parser, Debug)]
#[command(
    name = "term-splitview",
    version = env!("CARGO_PKG_VERSION"),
    about = "Split-view and floating-window playground on a virtual display",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Virtual display size in pixels.
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "1600x1000")]
    display: Size,

    /// Height of the shelf reserved at the bottom of the display.
    #[arg(long, value_name = "PIXELS", default_value_t = 48)]
    shelf: i32,

    /// Start in tablet mode.
    #[arg(long)]
    tablet: bool,

    /// Start rotated to portrait.
    #[arg(long)]
    portrait: bool,

    /// Multiplier for every animation duration; 0 disables animations.
    #[arg(long, value_name = "SCALE", default_value_t = 1.0)]
    animation_scale: f64,

    /// Append tracing output to this file instead of the in-app log panel.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at TRACE level (snap previews, every drag step).
    #[arg(short, long)]
    verbose: bool,

    /// Milliseconds to wait for input before the next frame.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    frame_ms: u64,
}

struct Settings {
    display: DisplaySpec,
    config: LayoutConfig,
    poll_interval: Duration,
}

impl TryFrom<&Cli> for Settings {
    type Error = AppError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let display = DisplaySpec::new(cli.display.width, cli.display.height, cli.shelf)?;
        let config = LayoutConfig {
            animation_scale: cli.animation_scale,
            ..LayoutConfig::default()
        };
        config.validate()?;
        Ok(Self {
            display,
            config,
            poll_interval: Duration::from_millis(cli.frame_ms.clamp(1, 1000)),
        })
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let settings = Settings::try_from(cli)?;
    let level = if cli.verbose { Level::TRACE } else { Level::DEBUG };

    let log = match &cli.log_file {
        Some(path) => {
            tracing_sub::init_with_file(path, level)?;
            None
        }
        None => {
            let handle = DebugLogHandle::new(DEFAULT_MAX_LINES);
            set_global_debug_log(handle.clone());
            tracing_sub::init_default();
            Some(handle)
        }
    };
    install_panic_hook();
    tracing::info!(
        display = %settings.display.bounds(),
        shelf = settings.display.shelf_height,
        tablet = cli.tablet,
        "playground starting"
    );

    let mut playground = Playground::new(
        settings.display,
        settings.config,
        cli.tablet,
        cli.portrait,
        log,
    );
    let mut output = ConsoleOutputDriver::new()?;
    run_playground(
        ConsoleInputDriver::new(),
        &mut output,
        &mut playground,
        settings.poll_interval,
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("term-splitview: {err}");
            ExitCode::FAILURE
        }
    }
}
