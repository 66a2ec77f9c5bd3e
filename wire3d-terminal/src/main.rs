/// wire3d Terminal Demo - Hidden-line vehicle
///
/// Renders the extruded car model with optional hidden-line removal.
/// Controls:
///   - WASD / Arrow Keys: Rotate
///   - +/-: Scale
///   - O: Toggle hidden-line removal
///   - Mouse drag / HJKL: Pan
///   - R: Reset view
///   - Q/ESC: Quit
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use wire3d_core::config;
use wire3d_terminal::{AppError, TerminalApp};

const DEFAULT_LOG_DIRECTIVE: &str = "wire3d=info";

#[derive(Debug, Parser)]
#[command(name = "wire3d-terminal", version, about = "Hidden-line wireframe renderer for the terminal")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. "wire3d=debug"
    #[arg(long)]
    log_level: Option<String>,

    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with hidden-line removal enabled
    #[arg(long)]
    occlusion: bool,

    /// Override the terminal scale factor
    #[arg(long)]
    scale: Option<u32>,
}

fn init_logging(args: &Args) -> Result<(), AppError> {
    let filter = match &args.log_level {
        Some(directive) => EnvFilter::try_new(directive)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
    };

    match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    init_logging(&args)?;

    tracing::info!("wire3d-terminal v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_or_default(args.config.as_deref())?;
    if args.occlusion {
        config.view.occlusion = true;
    }
    if let Some(scale) = args.scale {
        config.terminal.scale = scale.max(1);
    }

    let mut app = TerminalApp::new(&config)?;
    app.run()?;

    tracing::info!("wire3d-terminal exiting");
    Ok(())
}
