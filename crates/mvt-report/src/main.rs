use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mvt_report::DeviceType;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MVTTY_LOG";

/// Generate a PDF security report from MVT JSON results.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Directory holding the JSON files written by `mvt-ios` or
    /// `mvt-android`. The report is saved there as well.
    scan_dir: PathBuf,

    /// Device family of the scanned device.
    #[arg(long, value_enum, default_value_t = DeviceArg::Auto)]
    device_type: DeviceArg,

    /// Report file name, `.pdf` is appended when missing.
    #[arg(long)]
    file_name: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DeviceArg {
    Ios,
    Android,
    Auto,
}

impl DeviceArg {
    fn device_type(self) -> Option<DeviceType> {
        match self {
            DeviceArg::Ios => Some(DeviceType::Ios),
            DeviceArg::Android => Some(DeviceType::Android),
            DeviceArg::Auto => None,
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match mvt_report::generate_report(
        &cli.scan_dir,
        cli.device_type.device_type(),
        cli.file_name.as_deref(),
    ) {
        Ok(path) => {
            info!("Report saved to {}", path.display());
            #[allow(clippy::print_stdout)]
            {
                println!("{}", path.display());
            }

            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");

            ExitCode::FAILURE
        }
    }
}
