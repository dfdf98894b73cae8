//! MVT installation check.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::{MvtCommand, Platform};

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Title of the overlay shown when MVT is not usable.
pub const INSTALL_WARNING_TITLE: &str = "MVT Installation Check";

/// Body of the overlay shown when MVT is not usable.
pub const INSTALL_WARNING_MESSAGE: &str = "Mobile Verification Toolkit (MVT) Installation Issue\n\n\
MVT was not found in your system PATH or is not responding correctly.\n\n\
Please ensure MVT is installed correctly before using this application.\n\n\
Installation instructions:\n\
- pip3 install mvt\n\
- Restart the terminal/command prompt\n\
- Ensure Python and pip are in your PATH";

/// Availability of the MVT tools on this machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToolStatus {
    Checking,
    Ready,
    /// The tool ran but exited with a failure.
    Warning,
    /// The tool is not installed or did not answer in time.
    Missing,
    /// The check was disabled from the command line.
    Skipped,
}

impl ToolStatus {
    pub fn label(self) -> &'static str {
        match self {
            ToolStatus::Checking => "Checking MVT...",
            ToolStatus::Ready => "MVT Ready",
            ToolStatus::Warning => "MVT Warning",
            ToolStatus::Missing => "MVT Missing",
            ToolStatus::Skipped => "MVT Unchecked",
        }
    }

    /// Returns whether the installation warning should be shown.
    pub fn needs_attention(self) -> bool {
        matches!(self, ToolStatus::Warning | ToolStatus::Missing)
    }
}

/// Checks whether the MVT tools can be executed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolProbe: Send + Sync {
    async fn probe(&self) -> ToolStatus;
}

/// Probe that runs `mvt-ios version` with a timeout.
pub struct MvtProbe {
    command: MvtCommand,
    timeout: Duration,
}

impl MvtProbe {
    pub fn new() -> Self {
        Self::with_command(
            MvtCommand::for_platform(Platform::Ios, "version"),
            PROBE_TIMEOUT,
        )
    }

    /// Creates a probe running a custom command.
    pub fn with_command(command: MvtCommand, timeout: Duration) -> Self {
        Self { command, timeout }
    }
}

impl Default for MvtProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProbe for MvtProbe {
    async fn probe(&self) -> ToolStatus {
        let mut command = self.command.to_process_command();
        command.kill_on_drop(true);

        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                info!("MVT is installed and working correctly");

                ToolStatus::Ready
            }
            Ok(Ok(output)) => {
                warn!(status = %output.status, "MVT may not be installed correctly");

                ToolStatus::Warning
            }
            Ok(Err(probe_error)) => {
                error!(%probe_error, "MVT is not installed or not in PATH");

                ToolStatus::Missing
            }
            Err(_) => {
                error!(timeout = ?self.timeout, "MVT did not respond in time");

                ToolStatus::Missing
            }
        }
    }
}
