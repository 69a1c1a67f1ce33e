//! JSON persistence with atomic replace.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

/// Write `value` to `path` as pretty JSON.
///
/// The file is written to a temporary sibling and renamed over `path`, so a
/// crash mid-write never leaves a truncated state file behind.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> LedgerResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| LedgerError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush().map_err(|e| LedgerError::io(tmp.path(), e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| LedgerError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| LedgerError::io(path, e.error))?;
    debug!(path = %path.display(), "state saved");
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> LedgerResult<T> {
    let file = File::open(path).map_err(|e| LedgerError::io(path, e))?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), "state loaded");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1u32);
        save_json(&value, &path).unwrap();
        let back: BTreeMap<String, u32> = load_json(&path).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        save_json(&vec![1, 2, 3], &path).unwrap();
        save_json(&vec![4], &path).unwrap();
        let back: Vec<i32> = load_json(&path).unwrap();
        assert_eq!(back, vec![4]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_json::<Vec<i32>>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LedgerError::Io { .. }));
    }

    #[test]
    fn garbage_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_json::<Vec<i32>>(&path).unwrap_err(),
            LedgerError::Json(_)
        ));
    }
}
