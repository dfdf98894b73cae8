//! Jobs: ordered command steps plus the console messages that frame them.
//!
//! Message construction is pure so runners only decide *when* to print and
//! never *what*.

use crate::domain::command::MvtCommand;
use crate::domain::platform::Platform;

/// Category of a console line, mapped to a color by the UI.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineKind {
    Command,
    Output,
    Info,
    Success,
    Failure,
    Warning,
}

/// One console line produced by a job.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobLine {
    pub kind: LineKind,
    pub text: String,
}

impl JobLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self::new(LineKind::Output, text)
    }
}

/// How one step ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    /// The process exited with a status code.
    Exited(i32),
    /// The process was killed by a signal.
    Stopped,
    /// The process could not be spawned or awaited.
    Error(String),
}

impl StepOutcome {
    /// Returns the exit code, counting execution errors as `1`.
    pub fn code(&self) -> Option<i32> {
        match self {
            StepOutcome::Exited(code) => Some(*code),
            StepOutcome::Error(_) => Some(1),
            StepOutcome::Stopped => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code() == Some(0)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, StepOutcome::Stopped)
    }
}

/// Overall result of a job, used for the status line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobSummary {
    Succeeded,
    Failed,
    Stopped,
}

/// Message family of a job.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobKind {
    Single,
    DownloadIocs,
    VersionCheck,
    UpdateMvt,
}

/// One command of a job, tagged with the platform it targets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobStep {
    pub command: MvtCommand,
    pub platform: Option<Platform>,
}

/// Ordered steps run sequentially in one tab.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    kind: JobKind,
    steps: Vec<JobStep>,
}

impl Job {
    /// Job running one analysis command.
    pub fn single(command: MvtCommand) -> Self {
        Self {
            kind: JobKind::Single,
            steps: vec![JobStep {
                command,
                platform: None,
            }],
        }
    }

    /// Downloads indicators with both platform tools.
    pub fn download_iocs() -> Self {
        Self::per_platform(JobKind::DownloadIocs, "download-iocs")
    }

    /// Prints the version of both platform tools.
    pub fn version_check() -> Self {
        Self::per_platform(JobKind::VersionCheck, "version")
    }

    /// Upgrades the MVT package through pip.
    pub fn update_mvt() -> Self {
        Self {
            kind: JobKind::UpdateMvt,
            steps: vec![JobStep {
                command: MvtCommand::new("pip")
                    .arg("install")
                    .arg("--upgrade")
                    .arg("mvt"),
                platform: None,
            }],
        }
    }

    fn per_platform(kind: JobKind, subcommand: &str) -> Self {
        let steps = Platform::ALL
            .into_iter()
            .map(|platform| JobStep {
                command: MvtCommand::for_platform(platform, subcommand),
                platform: Some(platform),
            })
            .collect();

        Self { kind, steps }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn steps(&self) -> &[JobStep] {
        &self.steps
    }

    /// Short description for the status line.
    pub fn title(&self) -> String {
        match self.kind {
            JobKind::Single => self
                .steps
                .first()
                .map_or_else(String::new, |step| step.command.display()),
            JobKind::DownloadIocs => "Downloading IOCs...".to_string(),
            JobKind::VersionCheck => "Checking MVT version...".to_string(),
            JobKind::UpdateMvt => "Updating MVT...".to_string(),
        }
    }

    /// Lines printed once before the first step.
    pub fn intro_lines(&self) -> Vec<JobLine> {
        match self.kind {
            JobKind::UpdateMvt => vec![
                JobLine::new(
                    LineKind::Info,
                    "Updating Mobile Verification Toolkit to latest version...",
                ),
                JobLine::new(
                    LineKind::Warning,
                    "This may take a few minutes depending on your internet connection.",
                ),
            ],
            JobKind::Single | JobKind::DownloadIocs | JobKind::VersionCheck => Vec::new(),
        }
    }

    /// Lines printed before the step at `index` is spawned.
    pub fn before_step_lines(&self, index: usize) -> Vec<JobLine> {
        let Some(step) = self.steps.get(index) else {
            return Vec::new();
        };
        let mut lines = Vec::new();

        match (self.kind, step.platform) {
            (JobKind::DownloadIocs, Some(platform)) => lines.push(JobLine::new(
                LineKind::Info,
                format!("Attempting to download/update IOCs for {platform}..."),
            )),
            (JobKind::VersionCheck, Some(platform)) => lines.push(JobLine::new(
                LineKind::Info,
                format!("Checking MVT {platform} version..."),
            )),
            _ => {}
        }
        lines.push(JobLine::new(
            LineKind::Command,
            format!("Executing: {}", step.command.display()),
        ));

        lines
    }

    /// Lines printed after the step at `index` ends with `outcome`.
    pub fn step_lines(&self, index: usize, outcome: &StepOutcome) -> Vec<JobLine> {
        let mut lines = Vec::new();
        let code = match outcome {
            StepOutcome::Stopped => {
                lines.push(JobLine::new(LineKind::Warning, "Stopped by user."));
                return lines;
            }
            StepOutcome::Error(error) => {
                lines.push(JobLine::new(
                    LineKind::Failure,
                    format!("Error executing command: {error}"),
                ));
                1
            }
            StepOutcome::Exited(code) => *code,
        };
        let platform = self
            .steps
            .get(index)
            .and_then(|step| step.platform)
            .map_or("", Platform::label);

        match self.kind {
            JobKind::Single if code == 0 => {
                lines.push(JobLine::new(
                    LineKind::Success,
                    "Command completed successfully!",
                ));
            }
            JobKind::Single => lines.push(JobLine::new(
                LineKind::Failure,
                format!("Command failed with return code {code}"),
            )),
            JobKind::DownloadIocs if code == 0 => lines.push(JobLine::new(
                LineKind::Success,
                format!("{platform} IOCs downloaded/updated successfully!"),
            )),
            JobKind::DownloadIocs => lines.push(JobLine::new(
                LineKind::Failure,
                format!("{platform} IOCs download/update failed (code: {code})."),
            )),
            JobKind::VersionCheck if code == 0 => {}
            JobKind::VersionCheck => lines.push(JobLine::new(
                LineKind::Failure,
                format!("Failed to get {platform} MVT version (code: {code})."),
            )),
            JobKind::UpdateMvt if code == 0 => {
                lines.push(JobLine::new(LineKind::Success, "MVT updated successfully!"));
                lines.push(JobLine::new(
                    LineKind::Info,
                    "You may need to restart the application to use the updated version.",
                ));
            }
            JobKind::UpdateMvt => {
                lines.push(JobLine::new(
                    LineKind::Failure,
                    format!("MVT update failed (return code: {code})"),
                ));
                lines.push(JobLine::new(
                    LineKind::Warning,
                    "Try running as administrator/sudo or check your internet connection.",
                ));
            }
        }

        lines
    }

    /// Lines printed after the last step. A stopped job prints nothing more.
    pub fn summary_lines(&self, outcomes: &[StepOutcome]) -> Vec<JobLine> {
        if outcomes.iter().any(StepOutcome::is_stopped) {
            return Vec::new();
        }

        match self.kind {
            JobKind::DownloadIocs if outcomes.iter().all(StepOutcome::is_success) => {
                vec![JobLine::new(
                    LineKind::Success,
                    "All IOC download/update attempts finished.",
                )]
            }
            JobKind::DownloadIocs => vec![JobLine::new(
                LineKind::Warning,
                "All IOC download/update attempts finished, one or more failed.",
            )],
            JobKind::VersionCheck => {
                vec![JobLine::new(LineKind::Success, "Version checks complete.")]
            }
            JobKind::Single | JobKind::UpdateMvt => Vec::new(),
        }
    }

    /// Folds step outcomes into one result.
    pub fn summary(outcomes: &[StepOutcome]) -> JobSummary {
        if outcomes.iter().any(StepOutcome::is_stopped) {
            return JobSummary::Stopped;
        }
        if outcomes.iter().all(StepOutcome::is_success) {
            return JobSummary::Succeeded;
        }

        JobSummary::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[JobLine]) -> Vec<&str> {
        lines.iter().map(|line| line.text.as_str()).collect()
    }

    #[test]
    fn test_single_job_step_lines() {
        // Arrange
        let job = Job::single(MvtCommand::for_platform(Platform::Ios, "version"));

        // Act
        let success = job.step_lines(0, &StepOutcome::Exited(0));
        let failure = job.step_lines(0, &StepOutcome::Exited(2));

        // Assert
        assert_eq!(texts(&success), ["Command completed successfully!"]);
        assert_eq!(success[0].kind, LineKind::Success);
        assert_eq!(texts(&failure), ["Command failed with return code 2"]);
        assert_eq!(failure[0].kind, LineKind::Failure);
    }

    #[test]
    fn test_before_step_lines_show_masked_command() {
        // Arrange
        let job = Job::single(
            MvtCommand::for_platform(Platform::Ios, "extract-key")
                .secret_option("-p", "pw")
                .arg("/b"),
        );

        // Act
        let lines = job.before_step_lines(0);

        // Assert
        assert_eq!(texts(&lines), ["Executing: mvt-ios extract-key -p ******** /b"]);
        assert_eq!(lines[0].kind, LineKind::Command);
    }

    #[test]
    fn test_download_iocs_messages_per_platform() {
        // Arrange
        let job = Job::download_iocs();

        // Act
        let before_android = job.before_step_lines(1);
        let ios = job.step_lines(0, &StepOutcome::Exited(0));
        let android = job.step_lines(1, &StepOutcome::Exited(3));

        // Assert
        assert_eq!(
            texts(&before_android),
            [
                "Attempting to download/update IOCs for Android...",
                "Executing: mvt-android download-iocs"
            ]
        );
        assert_eq!(texts(&ios), ["iOS IOCs downloaded/updated successfully!"]);
        assert_eq!(
            texts(&android),
            ["Android IOCs download/update failed (code: 3)."]
        );
    }

    #[test]
    fn test_download_iocs_summary_reports_any_failure() {
        // Arrange
        let job = Job::download_iocs();

        // Act
        let all_good = job.summary_lines(&[StepOutcome::Exited(0), StepOutcome::Exited(0)]);
        let ios_failed = job.summary_lines(&[StepOutcome::Exited(1), StepOutcome::Exited(0)]);

        // Assert
        assert_eq!(
            texts(&all_good),
            ["All IOC download/update attempts finished."]
        );
        assert_eq!(
            texts(&ios_failed),
            ["All IOC download/update attempts finished, one or more failed."]
        );
    }

    #[test]
    fn test_version_check_only_reports_failures() {
        // Arrange
        let job = Job::version_check();

        // Act
        let ios_ok = job.step_lines(0, &StepOutcome::Exited(0));
        let android_failed = job.step_lines(1, &StepOutcome::Exited(127));
        let summary = job.summary_lines(&[StepOutcome::Exited(0), StepOutcome::Exited(127)]);

        // Assert
        assert!(ios_ok.is_empty());
        assert_eq!(
            texts(&android_failed),
            ["Failed to get Android MVT version (code: 127)."]
        );
        assert_eq!(texts(&summary), ["Version checks complete."]);
    }

    #[test]
    fn test_update_mvt_messages() {
        // Arrange
        let job = Job::update_mvt();

        // Act
        let intro = job.intro_lines();
        let failed = job.step_lines(0, &StepOutcome::Exited(1));

        // Assert
        assert_eq!(job.steps()[0].command.display(), "pip install --upgrade mvt");
        assert_eq!(intro.len(), 2);
        assert_eq!(
            texts(&failed),
            [
                "MVT update failed (return code: 1)",
                "Try running as administrator/sudo or check your internet connection."
            ]
        );
    }

    #[test]
    fn test_spawn_error_counts_as_code_one() {
        // Arrange
        let job = Job::single(MvtCommand::new("missing-tool"));
        let outcome = StepOutcome::Error("No such file or directory".to_string());

        // Act
        let lines = job.step_lines(0, &outcome);

        // Assert
        assert_eq!(
            texts(&lines),
            [
                "Error executing command: No such file or directory",
                "Command failed with return code 1"
            ]
        );
        assert_eq!(Job::summary(&[outcome]), JobSummary::Failed);
    }

    #[test]
    fn test_stopped_job_has_no_summary() {
        // Arrange
        let job = Job::download_iocs();
        let outcomes = [StepOutcome::Stopped];

        // Act
        let step = job.step_lines(0, &StepOutcome::Stopped);
        let summary = job.summary_lines(&outcomes);

        // Assert
        assert_eq!(texts(&step), ["Stopped by user."]);
        assert!(summary.is_empty());
        assert_eq!(Job::summary(&outcomes), JobSummary::Stopped);
    }
}
