// Persistence of playoff series records, one record per season.
// The engine only depends on the SeriesStore trait; the file store keeps one JSON
// document per season in a cache directory.

use fnv::FnvHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::series::PlayoffSeries;

pub trait SeriesStore {
    /// Fetch the record for a season, or None if it was never created
    fn get(&self, season: i32) -> Result<Option<PlayoffSeries>>;

    /// Insert or replace the record for `series.season`
    fn put(&mut self, series: &PlayoffSeries) -> Result<()>;
}

/// In-memory store, used by tests and one-shot simulations
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: FnvHashMap<i32, PlayoffSeries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SeriesStore for MemoryStore {
    fn get(&self, season: i32) -> Result<Option<PlayoffSeries>> {
        Ok(self.records.get(&season).cloned())
    }

    fn put(&mut self, series: &PlayoffSeries) -> Result<()> {
        self.records.insert(series.season, series.clone());
        Ok(())
    }
}

/// Stores each season as `playoff_series_{season}.json` under a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create the store, creating the directory if it doesn't exist
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(JsonFileStore {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    pub fn path_for(&self, season: i32) -> PathBuf {
        self.dir.join(format!("playoff_series_{}.json", season))
    }
}

impl SeriesStore for JsonFileStore {
    fn get(&self, season: i32) -> Result<Option<PlayoffSeries>> {
        let path = self.path_for(season);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        debug!("Loaded playoff series from {}", path.display());
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn put(&mut self, series: &PlayoffSeries) -> Result<()> {
        let path = self.path_for(series.season);
        let json = serde_json::to_string_pretty(series)?;
        fs::write(&path, json)?;
        debug!("Saved playoff series to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{Matchup, SeriesTeam};

    fn sample(season: i32) -> PlayoffSeries {
        PlayoffSeries::new(
            season,
            vec![Matchup::new(SeriesTeam::new(1, 0, 1), SeriesTeam::new(2, 0, 2))],
        )
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.get(2025).unwrap().is_none());
        store.put(&sample(2025)).unwrap();
        assert_eq!(store.get(2025).unwrap(), Some(sample(2025)));
        assert!(store.get(2024).unwrap().is_none());
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("cache")).unwrap();
        assert!(store.get(2030).unwrap().is_none());

        let mut series = sample(2030);
        series.current_round = 1;
        store.put(&series).unwrap();
        assert!(store.path_for(2030).exists());
        assert_eq!(store.get(2030).unwrap(), Some(series));
    }

    #[test]
    fn test_json_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::write(store.path_for(2031), "not json").unwrap();
        assert!(store.get(2031).is_err());
    }
}
