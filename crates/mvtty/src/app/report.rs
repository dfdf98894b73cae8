use std::path::PathBuf;

use mvt_report::DeviceType;

use crate::domain::{CommandError, FieldId, Form};
use crate::infra::paths;

/// Inputs of one report generation run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct ReportRequest {
    pub(super) scan_dir: PathBuf,
    pub(super) device_type: Option<DeviceType>,
    pub(super) file_name: Option<String>,
}

impl ReportRequest {
    /// Reads the report form. `Auto` leaves device detection to the
    /// generator; an empty file name selects the timestamped default.
    pub(super) fn from_form(form: &Form) -> Result<Self, CommandError> {
        let scan_dir = form.text(FieldId::ScanDir);
        if scan_dir.is_empty() {
            return Err(CommandError::MissingField {
                message: "Please select a results directory",
            });
        }

        let device_type = form
            .choice(FieldId::DeviceType)
            .and_then(|choice| choice.parse::<DeviceType>().ok());
        let file_name = Some(form.text(FieldId::FileName))
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(Self {
            scan_dir: paths::expand_tilde(scan_dir),
            device_type,
            file_name,
        })
    }
}
