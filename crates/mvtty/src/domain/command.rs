//! Command-line assembly for `mvt-ios` and `mvt-android` invocations.
//!
//! Form values are read trimmed; an empty value counts as unset. Path values
//! get a leading `~` expanded and passwords are passed through untrimmed.
//! Each action validates its required fields in table order and reports the
//! first one missing as [`CommandError::MissingField`].

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Stdio;

use thiserror::Error;

use crate::domain::form::{FieldId, Form};
use crate::domain::job::Job;
use crate::domain::platform::Platform;
use crate::infra::paths;

/// Replacement shown instead of secret argument values.
pub const SECRET_MASK: &str = "********";

/// Environment overrides that keep tool output unbuffered and colored.
const OUTPUT_ENV: [(&str, &str); 4] = [
    ("PYTHONUNBUFFERED", "1"),
    ("PYTHONIOENCODING", "utf-8"),
    ("FORCE_COLOR", "1"),
    ("TERM", "xterm-256color"),
];

/// Errors raised while turning form input into a command.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CommandError {
    /// A required form field is empty.
    #[error("{message}")]
    MissingField { message: &'static str },
}

/// Owned program and argument vector for one subprocess invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MvtCommand {
    program: String,
    args: Vec<String>,
    secret_indices: BTreeSet<usize>,
}

impl MvtCommand {
    /// Creates a command without arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secret_indices: BTreeSet::new(),
        }
    }

    /// Creates a command for the platform tool with its subcommand.
    pub fn for_platform(platform: Platform, subcommand: &str) -> Self {
        Self::new(platform.binary()).arg(subcommand)
    }

    /// Appends one positional argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends `flag value` when `value` is not empty.
    #[must_use]
    pub fn option(self, flag: &str, value: &str) -> Self {
        if value.is_empty() {
            return self;
        }

        self.arg(flag).arg(value)
    }

    /// Appends `flag value` when `value` is not empty, masking the value in
    /// [`MvtCommand::display`].
    #[must_use]
    pub fn secret_option(mut self, flag: &str, value: &str) -> Self {
        if value.is_empty() {
            return self;
        }

        self.args.push(flag.to_string());
        self.secret_indices.insert(self.args.len());
        self.args.push(value.to_string());
        self
    }

    /// Appends `flag` when `enabled` is set.
    #[must_use]
    pub fn flag_if(self, flag: &str, enabled: bool) -> Self {
        if enabled { self.arg(flag) } else { self }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the command joined by single spaces with secrets masked.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        for (index, arg) in self.args.iter().enumerate() {
            if self.secret_indices.contains(&index) {
                parts.push(SECRET_MASK);
            } else {
                parts.push(arg.as_str());
            }
        }

        parts.join(" ")
    }

    /// Builds the process command with piped output and a detached stdin.
    /// The child is killed when its handle is dropped.
    pub fn to_process_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .envs(OUTPUT_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        command
    }
}

/// Returns the expanded path of a required field or the validation error
/// when it is empty.
fn required_path(form: &Form, id: FieldId, message: &'static str) -> Result<String, CommandError> {
    let value = form.text(id);
    if value.is_empty() {
        return Err(CommandError::MissingField { message });
    }

    Ok(expand_path(value))
}

/// Returns the expanded path of an optional field, empty when unset.
fn optional_path(form: &Form, id: FieldId) -> String {
    expand_path(form.text(id))
}

/// Expands a leading `~`, which the tools would otherwise receive literally.
fn expand_path(value: &str) -> String {
    paths::expand_tilde(value).to_string_lossy().into_owned()
}

/// Operations offered on the iOS analysis tab.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IosAction {
    DecryptBackup,
    ExtractKey,
    CheckBackup,
    CheckFilesystem,
    CheckBackupIocs,
    CheckFilesystemIocs,
}

impl IosAction {
    pub const ALL: [IosAction; 6] = [
        IosAction::DecryptBackup,
        IosAction::ExtractKey,
        IosAction::CheckBackup,
        IosAction::CheckFilesystem,
        IosAction::CheckBackupIocs,
        IosAction::CheckFilesystemIocs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IosAction::DecryptBackup => "Decrypt Backup",
            IosAction::ExtractKey => "Extract Key",
            IosAction::CheckBackup => "Check Backup",
            IosAction::CheckFilesystem => "Check Filesystem",
            IosAction::CheckBackupIocs => "Check Backup IOCs",
            IosAction::CheckFilesystemIocs => "Check Filesystem IOCs",
        }
    }

    /// Validates the iOS form and assembles the `mvt-ios` invocation.
    ///
    /// # Errors
    /// Returns [`CommandError::MissingField`] for the first required field
    /// left empty.
    pub fn build(self, form: &Form, ioc_dir: &Path) -> Result<MvtCommand, CommandError> {
        let password = form.raw_text(FieldId::Password);
        let output = optional_path(form, FieldId::OutputPath);
        let ioc_dir = ioc_dir.to_string_lossy();

        let command = match self {
            IosAction::DecryptBackup => {
                let backup =
                    required_path(form, FieldId::BackupPath, "Please select a backup path")?;
                let output =
                    required_path(form, FieldId::OutputPath, "Please select an output path")?;

                MvtCommand::for_platform(Platform::Ios, "decrypt-backup")
                    .option("-d", &output)
                    .secret_option("-p", password)
                    .arg(backup)
            }
            IosAction::ExtractKey => {
                let backup =
                    required_path(form, FieldId::BackupPath, "Please select a backup path")?;

                MvtCommand::for_platform(Platform::Ios, "extract-key")
                    .secret_option("-p", password)
                    .arg(backup)
            }
            IosAction::CheckBackup => {
                let backup =
                    required_path(form, FieldId::BackupPath, "Please select a backup path")?;

                MvtCommand::for_platform(Platform::Ios, "check-backup")
                    .option("-o", &output)
                    .arg(backup)
            }
            IosAction::CheckFilesystem => {
                let dump = required_path(
                    form,
                    FieldId::BackupPath,
                    "Please select a filesystem dump path",
                )?;

                MvtCommand::for_platform(Platform::Ios, "check-fs")
                    .option("-o", &output)
                    .arg(dump)
            }
            IosAction::CheckBackupIocs => {
                let backup =
                    required_path(form, FieldId::BackupPath, "Please select a backup path")?;

                MvtCommand::for_platform(Platform::Ios, "check-backup")
                    .option("--iocs", &ioc_dir)
                    .option("--output", &output)
                    .arg(backup)
            }
            IosAction::CheckFilesystemIocs => {
                let dump = required_path(
                    form,
                    FieldId::BackupPath,
                    "Please select a filesystem dump path",
                )?;

                MvtCommand::for_platform(Platform::Ios, "check-fs")
                    .option("--iocs", &ioc_dir)
                    .option("--output", &output)
                    .arg(dump)
            }
        };

        Ok(command)
    }
}

/// Operations offered on the Android analysis tab.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AndroidAction {
    DownloadApks,
    CheckAdb,
    CheckBugreport,
    CheckBackup,
    CheckAndroidQf,
    CheckIocs,
}

impl AndroidAction {
    pub const ALL: [AndroidAction; 6] = [
        AndroidAction::DownloadApks,
        AndroidAction::CheckAdb,
        AndroidAction::CheckBugreport,
        AndroidAction::CheckBackup,
        AndroidAction::CheckAndroidQf,
        AndroidAction::CheckIocs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AndroidAction::DownloadApks => "Download APKs",
            AndroidAction::CheckAdb => "Check ADB",
            AndroidAction::CheckBugreport => "Check Bugreport",
            AndroidAction::CheckBackup => "Check Backup",
            AndroidAction::CheckAndroidQf => "Check AndroidQF",
            AndroidAction::CheckIocs => "Check IOCs",
        }
    }

    /// Validates the Android form and assembles the `mvt-android` invocation.
    ///
    /// # Errors
    /// Returns [`CommandError::MissingField`] for the first required field
    /// left empty.
    pub fn build(self, form: &Form, ioc_dir: &Path) -> Result<MvtCommand, CommandError> {
        let output = optional_path(form, FieldId::OutputPath);
        let serial = form.text(FieldId::Serial);
        let password = form.raw_text(FieldId::Password);
        let non_interactive = form.is_checked(FieldId::NonInteractive);

        let command = match self {
            AndroidAction::DownloadApks => {
                let output = required_path(
                    form,
                    FieldId::OutputPath,
                    "Please select an output path for APKs",
                )?;

                MvtCommand::for_platform(Platform::Android, "download-apks")
                    .option("-o", &output)
                    .option("-s", serial)
                    .flag_if("-a", form.is_checked(FieldId::AllApks))
            }
            AndroidAction::CheckAdb => MvtCommand::for_platform(Platform::Android, "check-adb")
                .option("-s", serial)
                .option("-o", &output)
                .flag_if("-n", non_interactive)
                .secret_option("-p", password),
            AndroidAction::CheckBugreport => {
                let target =
                    required_path(form, FieldId::TargetPath, "Please select a bugreport path")?;

                MvtCommand::for_platform(Platform::Android, "check-bugreport")
                    .option("-o", &output)
                    .arg(target)
            }
            AndroidAction::CheckBackup => {
                let target = required_path(
                    form,
                    FieldId::TargetPath,
                    "Please select a backup path for Android analysis",
                )?;

                MvtCommand::for_platform(Platform::Android, "check-backup")
                    .option("-o", &output)
                    .flag_if("-n", non_interactive)
                    .secret_option("-p", password)
                    .arg(target)
            }
            AndroidAction::CheckAndroidQf => {
                let target =
                    required_path(form, FieldId::TargetPath, "Please select an AndroidQF path")?;

                MvtCommand::for_platform(Platform::Android, "check-androidqf")
                    .option("-o", &output)
                    .flag_if("-n", non_interactive)
                    .secret_option("-p", password)
                    .arg(target)
            }
            AndroidAction::CheckIocs => {
                let target = required_path(
                    form,
                    FieldId::TargetPath,
                    "Please select a target path for Android IOC check",
                )?;

                MvtCommand::for_platform(Platform::Android, "check-backup")
                    .option("--iocs", &ioc_dir.to_string_lossy())
                    .option("--output", &output)
                    .option("-s", serial)
                    .flag_if("-n", non_interactive)
                    .secret_option("-p", password)
                    .arg(target)
            }
        };

        Ok(command)
    }
}

/// Maintenance jobs offered on the utilities tab.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UtilityAction {
    DownloadIocs,
    VersionCheck,
    UpdateMvt,
}

impl UtilityAction {
    pub const ALL: [UtilityAction; 3] = [
        UtilityAction::DownloadIocs,
        UtilityAction::VersionCheck,
        UtilityAction::UpdateMvt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UtilityAction::DownloadIocs => "Download/Update IOCs",
            UtilityAction::VersionCheck => "Check MVT Version",
            UtilityAction::UpdateMvt => "Update MVT",
        }
    }

    pub fn job(self) -> Job {
        match self {
            UtilityAction::DownloadIocs => Job::download_iocs(),
            UtilityAction::VersionCheck => Job::version_check(),
            UtilityAction::UpdateMvt => Job::update_mvt(),
        }
    }
}

/// Any action button rendered below a form.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Ios(IosAction),
    Android(AndroidAction),
    Utility(UtilityAction),
    GenerateReport,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Ios(action) => action.label(),
            Action::Android(action) => action.label(),
            Action::Utility(action) => action.label(),
            Action::GenerateReport => "Generate PDF Report",
        }
    }

    /// Builds the job this action runs. The report action runs in-process
    /// and yields `None`.
    ///
    /// # Errors
    /// Returns [`CommandError::MissingField`] when form validation fails.
    pub fn job(self, form: &Form, ioc_dir: &Path) -> Result<Option<Job>, CommandError> {
        let job = match self {
            Action::Ios(action) => Job::single(action.build(form, ioc_dir)?),
            Action::Android(action) => Job::single(action.build(form, ioc_dir)?),
            Action::Utility(action) => action.job(),
            Action::GenerateReport => return Ok(None),
        };

        Ok(Some(job))
    }
}
