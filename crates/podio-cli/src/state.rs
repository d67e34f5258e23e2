//! Tracked-state and desired-state files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use podio_provider::Record;

pub fn read_record(path: &Path) -> Result<Record> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON record in {}", path.display()))
}

/// Writes via a sibling `.tmp` file, then renames it into place.
pub fn write_record(path: &Path, record: &Record) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json + "\n")
        .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to write state file: {}", path.display()))
}

pub fn remove_record(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("space.json");
        let record = Record::new()
            .with("space_id", 1001i64)
            .with("name", "Eng")
            .with("auto_join", false);

        write_record(&path, &record).unwrap();
        assert_eq!(read_record(&path).unwrap(), record);
        assert!(!path.with_extension("tmp").exists());

        remove_record(&path).unwrap();
        assert!(!path.exists());
        remove_record(&path).unwrap();
    }

    #[test]
    fn test_nulls_mean_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desired.json");
        fs::write(&path, r#"{"org_id": 42, "name": "Eng", "privacy": null}"#).unwrap();

        let record = read_record(&path).unwrap();
        assert_eq!(record.len(), 2);
        assert!(!record.contains("privacy"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_record(Path::new("/nonexistent/state.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/state.json"));
    }
}
