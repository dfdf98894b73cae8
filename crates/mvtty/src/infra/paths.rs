//! Filesystem locations and directory listing for the path picker.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory name under the home directory used for logs.
const MVTTY_DIR: &str = ".mvtty";

/// Returns the mvtty home directory (`~/.mvtty`).
pub fn mvtty_home() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join(MVTTY_DIR);
    }

    PathBuf::from(MVTTY_DIR)
}

/// Returns the directory `mvt-ios download-iocs` stores indicators in.
pub fn default_ioc_dir() -> PathBuf {
    let data_dir = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("mvt").join("indicators")
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(input: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(input);
    };

    if input == "~" {
        return home;
    }
    if let Some(rest) = input.strip_prefix("~/") {
        return home.join(rest);
    }

    PathBuf::from(input)
}

/// Formats `path` relative to the home directory as `~/...` when possible.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(relative) = path.strip_prefix(&home)
    {
        if relative.as_os_str().is_empty() {
            return "~".to_string();
        }

        return format!("~/{}", relative.display());
    }

    path.display().to_string()
}

/// One entry of a directory listing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Options for [`list_dir`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ListOptions {
    pub show_hidden: bool,
    pub directories_only: bool,
}

/// Lists `dir` with directories first, then case-insensitive by name.
///
/// # Errors
/// Returns an error when the directory cannot be read.
pub fn list_dir(dir: &Path, options: ListOptions) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if !options.show_hidden && name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let is_dir = path.is_dir();
        if options.directories_only && !is_dir {
            continue;
        }

        entries.push(DirEntry { name, path, is_dir });
    }

    entries.sort_by(compare_entries);

    Ok(entries)
}

fn compare_entries(left: &DirEntry, right: &DirEntry) -> Ordering {
    right
        .is_dir
        .cmp(&left.is_dir)
        .then_with(|| left.name.to_lowercase().cmp(&right.name.to_lowercase()))
        .then_with(|| left.name.cmp(&right.name))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().expect("failed to create temp dir");
        fs::create_dir(dir.path().join("beta")).expect("failed to create dir");
        fs::create_dir(dir.path().join("Alpha")).expect("failed to create dir");
        fs::create_dir(dir.path().join(".cache")).expect("failed to create dir");
        fs::write(dir.path().join("backup.ab"), "").expect("failed to write file");
        fs::write(dir.path().join("Archive.zip"), "").expect("failed to write file");
        fs::write(dir.path().join(".hidden"), "").expect("failed to write file");

        dir
    }

    #[test]
    fn test_list_dir_sorts_directories_first_case_insensitive() {
        // Arrange
        let dir = fixture();

        // Act
        let entries = list_dir(dir.path(), ListOptions::default()).expect("failed to list");

        // Assert
        assert_eq!(names(&entries), ["Alpha", "beta", "Archive.zip", "backup.ab"]);
        assert!(entries[0].is_dir);
        assert!(!entries[2].is_dir);
    }

    #[test]
    fn test_list_dir_includes_hidden_when_requested() {
        // Arrange
        let dir = fixture();
        let options = ListOptions {
            show_hidden: true,
            directories_only: false,
        };

        // Act
        let entries = list_dir(dir.path(), options).expect("failed to list");

        // Assert
        assert_eq!(
            names(&entries),
            [".cache", "Alpha", "beta", ".hidden", "Archive.zip", "backup.ab"]
        );
    }

    #[test]
    fn test_list_dir_directories_only() {
        // Arrange
        let dir = fixture();
        let options = ListOptions {
            show_hidden: false,
            directories_only: true,
        };

        // Act
        let entries = list_dir(dir.path(), options).expect("failed to list");

        // Assert
        assert_eq!(names(&entries), ["Alpha", "beta"]);
    }

    #[test]
    fn test_list_dir_fails_for_missing_dir() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");

        // Act
        let result = list_dir(&dir.path().join("missing"), ListOptions::default());

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_tilde_and_display_path_round_trip() {
        // Arrange
        let Some(home) = dirs::home_dir() else {
            return;
        };

        // Act
        let expanded = expand_tilde("~/cases/7");
        let displayed = display_path(&home.join("cases").join("7"));

        // Assert
        assert_eq!(expanded, home.join("cases").join("7"));
        assert_eq!(displayed, "~/cases/7");
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }

    #[test]
    fn test_default_ioc_dir_ends_with_mvt_indicators() {
        // Arrange

        // Act
        let ioc_dir = default_ioc_dir();

        // Assert
        assert!(ioc_dir.ends_with("mvt/indicators"));
    }
}
