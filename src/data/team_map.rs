//! Team-name normalization
//!
//! Source exports disagree on team naming ("Miami (FL)" vs "Miami").
//! A two-column `from,to` CSV forces specific mappings; names without an
//! entry pass through trimmed.

use std::collections::HashMap;
use std::path::Path;

use crate::Result;

/// Lookup from raw source name to canonical name
#[derive(Debug, Default, Clone)]
pub struct TeamNameMap {
    map: HashMap<String, String>,
}

impl TeamNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the mapping file; a missing file is an empty map, not an error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let mut map = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let from = record.get(0).unwrap_or("").trim();
            let to = record.get(1).unwrap_or("").trim();
            if !from.is_empty() && !to.is_empty() {
                map.insert(from.to_string(), to.to_string());
            }
        }

        Ok(TeamNameMap { map })
    }

    /// Canonical name for a raw source name
    pub fn normalize(&self, name: &str) -> String {
        let trimmed = name.trim();
        self.map
            .get(trimmed)
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Append a mapping to the file, creating it (with header) if needed
    pub fn append<P: AsRef<Path>>(path: P, from: &str, to: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let exists = path.exists();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if !exists {
            writer.write_record(["from", "to"])?;
        }
        writer.write_record([from.trim(), to.trim()])?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_empty_map() {
        let map = TeamNameMap::load("does/not/exist.csv").unwrap();
        assert!(map.is_empty());
        assert_eq!(map.normalize("Duke"), "Duke");
    }

    #[test]
    fn test_normalize_maps_and_trims() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from,to\nMiami (FL),Miami\nPittsburgh,Pitt\n")
            .unwrap();

        let map = TeamNameMap::load(file.path()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.normalize("Miami (FL)"), "Miami");
        assert_eq!(map.normalize("  Pittsburgh  "), "Pitt");
        assert_eq!(map.normalize("Duke"), "Duke");
    }

    #[test]
    fn test_append_creates_and_extends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team_name_map.csv");

        TeamNameMap::append(&path, "Miami (FL)", "Miami").unwrap();
        TeamNameMap::append(&path, "Pittsburgh", "Pitt").unwrap();

        let map = TeamNameMap::load(&path).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.normalize("Pittsburgh"), "Pitt");
    }
}
