use std::fs::{self, OpenOptions};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use mvtty::app::App;
use mvtty::config::{Cli, Config};
use mvtty::error::AppError;
use time::UtcOffset;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MVTTY_LOG";

fn main() -> ExitCode {
    let config = Cli::parse().into_config();

    // Must run before any other thread exists for the offset to be readable.
    let utc_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    match run(&config, utc_offset) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            #[allow(clippy::print_stderr)]
            {
                let _ = writeln!(std::io::stderr(), "Error: {err}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, utc_offset: UtcOffset) -> Result<(), AppError> {
    init_logging(config)?;
    info!(
        ioc_dir = %config.ioc_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        "mvtty starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    let app = App::new(config, utc_offset);
    runtime.block_on(mvtty::runtime::run(app, config))?;

    Ok(())
}

/// Sends logs to `<home>/mvtty.log`; stdout belongs to the terminal UI.
fn init_logging(config: &Config) -> Result<(), AppError> {
    let home_error = |source| AppError::Home {
        path: config.home.clone(),
        source,
    };

    fs::create_dir_all(&config.home).map_err(home_error)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .map_err(home_error)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    Ok(())
}
