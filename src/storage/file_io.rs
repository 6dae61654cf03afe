//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::MoodPaperError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, MoodPaperError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        MoodPaperError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        MoodPaperError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Read a text file, returning an error if it doesn't exist
pub fn read_text_required<P: AsRef<Path>>(path: P) -> Result<String, MoodPaperError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MoodPaperError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path).map_err(|e| {
        MoodPaperError::Storage(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), MoodPaperError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| MoodPaperError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Write text to a file atomically
pub fn write_text_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), MoodPaperError> {
    write_atomic(path.as_ref(), |writer| {
        writer
            .write_all(contents.as_bytes())
            .map_err(|e| MoodPaperError::Storage(format!("Failed to write data: {}", e)))
    })
}

/// Write raw bytes to a file atomically
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<(), MoodPaperError> {
    write_atomic(path.as_ref(), |writer| {
        writer
            .write_all(contents)
            .map_err(|e| MoodPaperError::Storage(format!("Failed to write data: {}", e)))
    })
}

/// The file is either completely written or left untouched.
fn write_atomic<F>(path: &Path, fill: F) -> Result<(), MoodPaperError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), MoodPaperError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            MoodPaperError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| MoodPaperError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    let written = fill(&mut writer).and_then(|()| {
        writer
            .flush()
            .map_err(|e| MoodPaperError::Storage(format!("Failed to flush data: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| MoodPaperError::Storage(format!("Failed to sync data: {}", e)))
    });
    drop(writer);

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        MoodPaperError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_write_and_read_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();
        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_text_overwrite_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("moodpaper-keys.enc");

        write_text_atomic(&path, "first").unwrap();
        write_text_atomic(&path, "second").unwrap();

        assert_eq!(read_text_required(&path).unwrap(), "second");
        assert!(!temp_dir.path().join("moodpaper-keys.enc.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("image.png");

        write_bytes_atomic(&path, &[0x89, b'P', b'N', b'G']).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_read_text_required_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.enc");

        assert!(matches!(
            read_text_required(&path),
            Err(MoodPaperError::Storage(_))
        ));
    }
}
