use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tango_core::EntryId;
use tango_tables::{DisplayRow, DisplayTable};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("resolved id {0} is missing from the display table; the tables are inconsistent")]
    UnknownId(EntryId),

    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the resolved selection as header-less CSV batches, columns
/// expression, meaning, reading, part_of_speech, in selection order.
///
/// `size` is the maximum number of rows per file; 0 means one file holds
/// everything. When more than one file is produced each gets a 1-based
/// 2-digit suffix. All files of one run share the run date as base name,
/// so a second export on the same date overwrites the first.
pub fn export(
    table: &DisplayTable,
    ids: &[EntryId],
    out_dir: &Path,
    size: usize,
    date: NaiveDate,
) -> Result<Vec<PathBuf>, ExportError> {
    let rows: Vec<_> = ids
        .iter()
        .map(|&id| table.get(id).ok_or(ExportError::UnknownId(id)))
        .collect::<Result<_, _>>()?;

    std::fs::create_dir_all(out_dir)?;
    let base = date.format("%Y.%m.%d").to_string();
    let chunk_size = if size == 0 { rows.len().max(1) } else { size };
    let file_count = rows.len().div_ceil(chunk_size).max(1);

    let mut written = Vec::with_capacity(file_count);
    for (i, chunk) in rows.chunks(chunk_size).enumerate() {
        written.push(write_batch(out_dir, &base, file_count, i, chunk)?);
    }
    if rows.is_empty() {
        // Nothing resolved still yields one (empty) dated file.
        written.push(write_batch(out_dir, &base, 1, 0, &[])?);
    }
    for path in &written {
        tracing::info!("Saved {}", path.display());
    }
    Ok(written)
}

fn write_batch(
    out_dir: &Path,
    base: &str,
    file_count: usize,
    index: usize,
    rows: &[&DisplayRow],
) -> Result<PathBuf, ExportError> {
    let name = if file_count == 1 {
        format!("{base}.csv")
    } else {
        format!("{base}.{:02}.csv", index + 1)
    };
    let path = out_dir.join(name);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(File::create(&path)?);
    for row in rows {
        writer
            .write_record([
                row.expression.as_str(),
                row.meaning.as_str(),
                row.reading.as_str(),
                row.part_of_speech.as_str(),
            ])
            .map_err(|source| ExportError::Csv {
                path: path.clone(),
                source,
            })?;
    }
    writer.into_inner().map_err(|e| e.into_error())?;
    Ok(path)
}
