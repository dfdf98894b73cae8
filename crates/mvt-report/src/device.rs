use std::fmt;
use std::str::FromStr;

use crate::scan::ScanData;

/// Device family a set of scan results was extracted from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeviceType {
    Ios,
    Android,
    Unknown,
}

impl DeviceType {
    /// Guesses the device family from the result files present.
    ///
    /// Only `mvt-ios` writes `backup_info.json`, so its presence means iOS.
    pub fn detect(scan: &ScanData) -> Self {
        if scan.contains("backup_info") {
            return DeviceType::Ios;
        }

        DeviceType::Android
    }

    /// Label used in report text and file names.
    pub fn label(self) -> &'static str {
        match self {
            DeviceType::Ios => "iOS",
            DeviceType::Android => "Android",
            DeviceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(DeviceType::Ios),
            "android" => Ok(DeviceType::Android),
            "unknown" => Ok(DeviceType::Unknown),
            other => Err(format!("unknown device type `{other}`")),
        }
    }
}
