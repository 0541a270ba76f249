//! Table Cache Module
//! Explicit content-addressed cache for the normalized table.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::DataFrame;
use sha2::{Digest, Sha256};

use super::loader::{self, DatasetError, LoadReport};

struct CacheEntry {
    digest: [u8; 32],
    frame: Arc<DataFrame>,
    report: LoadReport,
}

/// Single-slot cache for the normalized table, keyed by a SHA-256 digest of
/// the source bytes. Derived-metric tables are never stored here; they are
/// recomputed on every render pass.
#[derive(Default)]
pub struct TableCache {
    entry: Option<CacheEntry>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, reusing the cached table when the file bytes are
    /// unchanged since the previous load.
    pub fn load(&mut self, path: &Path) -> Result<(Arc<DataFrame>, LoadReport), DatasetError> {
        let bytes = fs::read(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let digest: [u8; 32] = Sha256::digest(&bytes).into();

        if let Some(entry) = &self.entry {
            if entry.digest == digest {
                tracing::debug!(path = %path.display(), "table cache hit");
                return Ok((entry.frame.clone(), entry.report.clone()));
            }
        }

        tracing::debug!(path = %path.display(), "table cache miss");
        let text = String::from_utf8_lossy(&bytes);
        let (frame, report) = loader::parse_records(&text)?;
        let frame = Arc::new(frame);
        self.entry = Some(CacheEntry {
            digest,
            frame: frame.clone(),
            report: report.clone(),
        });
        Ok((frame, report))
    }

    /// Drop the cached table; the next load re-parses the source.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dataset(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "epiview-cache-{}-{name}.json",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reuses_table_for_identical_bytes() {
        let path = temp_dataset("hit", r#"[{"Date":"2021-01-01","Confirmed":"1"}]"#);
        let mut cache = TableCache::new();
        let (first, _) = cache.load(&path).unwrap();
        let (second, _) = cache.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn reparses_when_bytes_change() {
        let path = temp_dataset("miss", r#"[{"Date":"2021-01-01","Confirmed":"1"}]"#);
        let mut cache = TableCache::new();
        let (first, _) = cache.load(&path).unwrap();
        fs::write(
            &path,
            r#"[{"Date":"2021-01-01","Confirmed":"1"},{"Date":"2021-01-02","Confirmed":"2"}]"#,
        )
        .unwrap();
        let (second, _) = cache.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.height(), 2);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn invalidate_forces_a_reparse() {
        let path = temp_dataset("invalidate", r#"[{"Date":"2021-01-01","Confirmed":"1"}]"#);
        let mut cache = TableCache::new();
        let (first, _) = cache.load(&path).unwrap();
        cache.invalidate();
        let (second, _) = cache.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut cache = TableCache::new();
        let err = cache
            .load(Path::new("/nonexistent/epiview-covid.json"))
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
