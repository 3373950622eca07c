use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{load_file, LoadedDataset, SourceOptions};
use crate::error::LoadError;

/// Memoized loader result for one source file.
///
/// The file is read on the first [`get`](DatasetCache::get) and the same
/// `Arc` is handed out until [`invalidate`](DatasetCache::invalidate) or
/// [`set_source`](DatasetCache::set_source) is called. A failed load leaves
/// the cache empty so the next `get` tries again.
#[derive(Debug)]
pub struct DatasetCache {
    source: PathBuf,
    options: SourceOptions,
    entry: Option<Arc<LoadedDataset>>,
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>, options: SourceOptions) -> Self {
        Self {
            source: source.into(),
            options,
            entry: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.entry.is_some()
    }

    pub fn get(&mut self) -> Result<Arc<LoadedDataset>, LoadError> {
        if let Some(entry) = &self.entry {
            return Ok(Arc::clone(entry));
        }
        let loaded = Arc::new(load_file(&self.source, &self.options)?);
        self.entry = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("Dropped cached dataset for {}", self.source.display());
        }
    }

    /// Re-read the current source.
    pub fn reload(&mut self) -> Result<Arc<LoadedDataset>, LoadError> {
        self.invalidate();
        self.get()
    }

    /// Point the cache at a different file; the old entry is discarded.
    pub fn set_source(&mut self, source: impl Into<PathBuf>) {
        self.source = source.into();
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Date,Amount,customer_segment,businessindustrytype").unwrap();
        writeln!(file, "2023-01-02,100,SegA,Tech").unwrap();
        file
    }

    #[test]
    fn get_returns_the_same_allocation_until_invalidated() {
        let file = csv_file();
        let mut cache = DatasetCache::new(file.path(), SourceOptions::default());
        assert!(!cache.is_loaded());

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let reloaded = cache.reload().unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(first.records, reloaded.records);
    }

    #[test]
    fn cached_entry_survives_source_file_changes() {
        let mut file = csv_file();
        let mut cache = DatasetCache::new(file.path(), SourceOptions::default());
        assert_eq!(cache.get().unwrap().records.len(), 1);

        writeln!(file, "2023-01-03,50,SegB,Tech").unwrap();
        file.flush().unwrap();
        assert_eq!(cache.get().unwrap().records.len(), 1);
        assert_eq!(cache.reload().unwrap().records.len(), 2);
    }

    #[test]
    fn failed_load_leaves_cache_empty() {
        let mut cache = DatasetCache::new("/no/such/file.csv", SourceOptions::default());
        assert!(matches!(cache.get(), Err(LoadError::NotFound(_))));
        assert!(!cache.is_loaded());

        let file = csv_file();
        cache.set_source(file.path());
        assert!(cache.get().is_ok());
        assert!(cache.is_loaded());
    }
}
