//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::infra::paths;

const LOG_FILE_NAME: &str = "mvtty.log";

/// Terminal dashboard for the Mobile Verification Toolkit.
#[derive(Debug, Parser)]
#[command(name = "mvtty", version, about)]
pub struct Cli {
    /// Indicator directory passed to `--iocs` checks.
    #[arg(long, env = "MVTTY_IOC_DIR")]
    pub ioc_dir: Option<PathBuf>,

    /// Directory for mvtty's own files such as the log.
    #[arg(long, env = "MVTTY_HOME")]
    pub home: Option<PathBuf>,

    /// Do not run `mvt-ios version` at startup.
    #[arg(long)]
    pub skip_tool_check: bool,
}

/// Resolved runtime settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub ioc_dir: PathBuf,
    pub home: PathBuf,
    pub skip_tool_check: bool,
}

impl Cli {
    /// Fills unset options with platform defaults.
    pub fn into_config(self) -> Config {
        Config {
            ioc_dir: self.ioc_dir.unwrap_or_else(paths::default_ioc_dir),
            home: self.home.unwrap_or_else(paths::mvtty_home),
            skip_tool_check: self.skip_tool_check,
        }
    }
}

impl Config {
    pub fn log_path(&self) -> PathBuf {
        self.home.join(LOG_FILE_NAME)
    }
}
