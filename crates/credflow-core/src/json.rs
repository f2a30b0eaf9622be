//! JSON file helpers shared by every stage.
//!
//! Reads distinguish a missing file from an unreadable or malformed one so
//! stages can report "critical data source not found" separately. Writes are
//! pretty-printed with a caller-chosen indent and overwrite the target.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Two-space indentation (unified log).
pub const INDENT_2: &[u8] = b"  ";

/// Four-space indentation (decision and audit trail outputs).
pub const INDENT_4: &[u8] = b"    ";

/// Errors reading or writing a JSON file.
#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize JSON for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl JsonFileError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, JsonFileError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            JsonFileError::NotFound(path.to_path_buf())
        } else {
            JsonFileError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|source| JsonFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` to `path` as pretty JSON, creating parent directories.
pub fn write_json_pretty<T: Serialize>(
    path: &Path,
    value: &T,
    indent: &[u8],
) -> Result<(), JsonFileError> {
    let io_err = |source: io::Error| JsonFileError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    let formatter = PrettyFormatter::with_indent(indent);
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value.serialize(&mut serializer).map_err(|source| {
        if source.is_io() {
            JsonFileError::Io {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            JsonFileError::Serialize {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    writer.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{DecisionRecord, ValidationStatus};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = read_json::<serde_json::Value>(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, JsonFileError::Parse { .. }));
    }

    #[test]
    fn test_write_uses_requested_indent_and_creates_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/nested/data.json");

        write_json_pretty(&path, &serde_json::json!({"a": [1]}), INDENT_4).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"a\": [\n        1\n    ]"));

        write_json_pretty(&path, &serde_json::json!({"a": 1}), INDENT_2).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_unserializable_value_is_serialize_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let value: BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();

        let err = write_json_pretty(&path, &value, INDENT_4).unwrap_err();
        assert!(matches!(err, JsonFileError::Serialize { .. }), "{err}");
        assert!(err.to_string().starts_with("failed to serialize JSON"));
    }

    #[test]
    fn test_decisions_keep_two_decimal_precision_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("decisions.json");
        let records = vec![DecisionRecord {
            customer_id: "C1".to_string(),
            previous_limit: 1234.56,
            new_limit: 1382.71,
            rule_applied: "Low Risk Policy".to_string(),
            decision_summary: "s".to_string(),
            validation_status: ValidationStatus::Pass,
            timestamp: "t".to_string(),
            agent_id: "LimitSetter01".to_string(),
        }];

        write_json_pretty(&path, &records, INDENT_4).unwrap();
        let back: Vec<DecisionRecord> = read_json(&path).unwrap();
        assert_eq!(back, records);
        assert_eq!(format!("{:.2}", back[0].new_limit), "1382.71");
    }
}
