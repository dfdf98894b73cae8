use std::fmt;

/// Device family handled by one of the MVT command-line tools.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    /// Both platforms in the order utility jobs visit them.
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    /// Returns the executable name of the platform tool.
    pub fn binary(self) -> &'static str {
        match self {
            Platform::Ios => "mvt-ios",
            Platform::Android => "mvt-android",
        }
    }

    /// Returns the human-readable platform label.
    pub fn label(self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
