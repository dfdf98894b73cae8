use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that end the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to prepare {}: {source}", path.display())]
    Home { path: PathBuf, source: io::Error },
    #[error("failed to start async runtime: {0}")]
    Runtime(io::Error),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
