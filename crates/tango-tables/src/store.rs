use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::{DisplayRow, DisplayTable, SearchIndex, SearchIndexRow};

pub const SEARCH_INDEX_FILE: &str = "search_index.csv.gz";
pub const DISPLAY_TABLE_FILE: &str = "anki_entries.csv.gz";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("table file not found: {0} (run `tango compile` first)")]
    Missing(PathBuf),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persists and reloads the two compiled artifacts as gzipped CSV under a
/// tables directory.
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn search_index_path(&self) -> PathBuf {
        self.dir.join(SEARCH_INDEX_FILE)
    }

    pub fn display_table_path(&self) -> PathBuf {
        self.dir.join(DISPLAY_TABLE_FILE)
    }

    /// Writes both tables, creating the directory if needed.
    pub fn write(
        &self,
        index_rows: &[SearchIndexRow],
        display_rows: &[DisplayRow],
    ) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        write_table(&self.search_index_path(), index_rows)?;
        write_table(&self.display_table_path(), display_rows)?;
        tracing::info!(
            index_rows = index_rows.len(),
            display_rows = display_rows.len(),
            "Wrote tables to {}",
            self.dir.display()
        );
        Ok(())
    }

    pub fn read_search_index(&self) -> Result<SearchIndex, StoreError> {
        let rows = read_table(&self.search_index_path())?;
        Ok(SearchIndex::new(rows))
    }

    pub fn read_display_table(&self) -> Result<DisplayTable, StoreError> {
        let rows = read_table(&self.display_table_path())?;
        Ok(DisplayTable::new(rows))
    }
}

fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    let encoder = GzEncoder::new(File::create(path)?, Compression::default());
    let mut writer = csv::Writer::from_writer(encoder);
    for row in rows {
        writer.serialize(row).map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let encoder = writer.into_inner().map_err(|e| e.into_error())?;
    encoder.finish()?;
    Ok(())
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Err(StoreError::Missing(path.to_path_buf()));
    }
    let decoder = GzDecoder::new(BufReader::new(File::open(path)?));
    let mut reader = csv::Reader::from_reader(decoder);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })?);
    }
    Ok(rows)
}
