//! Loading of MVT JSON result files from a scan output directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::error::ReportError;

const DETECTED_SUFFIX: &str = "_detected";

/// All JSON results of one MVT run, keyed by file stem.
#[derive(Debug)]
pub struct ScanData {
    dir: PathBuf,
    results: BTreeMap<String, Value>,
    detected_issues: Vec<Value>,
}

impl ScanData {
    /// Reads every `*.json` file directly inside `dir`.
    ///
    /// Files that fail to parse are skipped with a warning. Items of
    /// `*_detected.json` arrays are collected as detected issues.
    ///
    /// # Errors
    /// Returns an error when `dir` cannot be listed or holds no JSON files.
    pub fn load(dir: &Path) -> Result<Self, ReportError> {
        info!(dir = %dir.display(), "Loading scan data");

        if !dir.is_dir() {
            return Err(ReportError::NotADirectory {
                dir: dir.to_path_buf(),
            });
        }

        let entries = fs::read_dir(dir).map_err(|source| ReportError::io(dir, source))?;
        let mut json_paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        json_paths.sort();

        if json_paths.is_empty() {
            warn!(dir = %dir.display(), "No JSON files found in output directory");

            return Err(ReportError::NoScanData {
                dir: dir.to_path_buf(),
            });
        }

        let mut results = BTreeMap::new();
        let mut detected_issues = Vec::new();
        for path in json_paths {
            let Some(key) = path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
            else {
                continue;
            };
            let data = match fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<Value>(&contents) {
                    Ok(data) => data,
                    Err(err) => {
                        warn!(path = %path.display(), "Failed to parse scan result: {err}");
                        continue;
                    }
                },
                Err(err) => {
                    warn!(path = %path.display(), "Error reading scan result: {err}");
                    continue;
                }
            };

            if key.ends_with(DETECTED_SUFFIX)
                && let Value::Array(items) = &data
            {
                detected_issues.extend(items.iter().cloned());
            }
            results.insert(key, data);
        }

        info!(
            files = results.len(),
            detected = detected_issues.len(),
            "Loaded scan data"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            results,
            detected_issues,
        })
    }

    /// Builds scan data from in-memory results, mainly for tests.
    pub fn from_results(dir: impl Into<PathBuf>, results: BTreeMap<String, Value>) -> Self {
        let detected_issues = results
            .iter()
            .filter(|(key, _)| key.ends_with(DETECTED_SUFFIX))
            .filter_map(|(_, value)| value.as_array())
            .flatten()
            .cloned()
            .collect();

        Self {
            dir: dir.into(),
            results,
            detected_issues,
        }
    }

    /// Directory the results were loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn contains(&self, key: &str) -> bool {
        self.results.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.results.get(key)
    }

    /// Returns the result only when it is a JSON array.
    pub fn list(&self, key: &str) -> Option<&[Value]> {
        self.results.get(key)?.as_array().map(Vec::as_slice)
    }

    /// Number of loaded result files.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    pub fn detected_issues(&self) -> &[Value] {
        &self.detected_issues
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_collects_results_and_detections() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("sms.json"), r#"[{"text": "hi"}]"#)
            .expect("failed to write fixture");
        fs::write(
            dir.path().join("sms_detected.json"),
            r#"[{"module": "sms", "url": "https://bad.example"}]"#,
        )
        .expect("failed to write fixture");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("failed to write fixture");

        // Act
        let scan = ScanData::load(dir.path()).expect("failed to load scan data");

        // Assert
        assert_eq!(scan.len(), 2);
        assert!(scan.contains("sms"));
        assert_eq!(scan.detected_issues().len(), 1);
        assert_eq!(scan.list("sms").map(<[Value]>::len), Some(1));
    }

    #[test]
    fn test_load_skips_unparseable_files() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("broken.json"), "{not json").expect("failed to write fixture");
        fs::write(dir.path().join("info.json"), "{}").expect("failed to write fixture");

        // Act
        let scan = ScanData::load(dir.path()).expect("failed to load scan data");

        // Assert
        assert_eq!(scan.keys().collect::<Vec<_>>(), vec!["info"]);
    }

    #[test]
    fn test_load_rejects_directory_without_json() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");

        // Act
        let result = ScanData::load(dir.path());

        // Assert
        assert!(matches!(result, Err(ReportError::NoScanData { .. })));
    }

    #[test]
    fn test_load_rejects_missing_directory() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");
        let missing = dir.path().join("missing");

        // Act
        let result = ScanData::load(&missing);

        // Assert
        assert!(matches!(result, Err(ReportError::NotADirectory { .. })));
    }

    #[test]
    fn test_list_ignores_non_array_results() {
        // Arrange
        let mut results = BTreeMap::new();
        results.insert("backup_info".to_string(), serde_json::json!({"IMEI": "1"}));
        let scan = ScanData::from_results("/tmp/scan", results);

        // Act
        let list = scan.list("backup_info");

        // Assert
        assert!(list.is_none());
        assert!(scan.get("backup_info").is_some());
    }
}
