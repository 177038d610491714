use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tango_core::EntryId;

/// One surface form of one entry. A form shared by several entries yields
/// several rows, which is where disambiguation comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndexRow {
    pub id: EntryId,
    /// Column name matches the persisted artifact.
    #[serde(rename = "entry")]
    pub surface: String,
}

/// Fully formatted export fields for one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayRow {
    pub id: EntryId,
    pub expression: String,
    pub meaning: String,
    pub reading: String,
    pub part_of_speech: String,
}

/// Read-only surface-form lookup over the index rows.
#[derive(Debug)]
pub struct SearchIndex {
    rows: Vec<SearchIndexRow>,
    by_surface: HashMap<String, Vec<EntryId>>,
}

impl SearchIndex {
    pub fn new(rows: Vec<SearchIndexRow>) -> Self {
        let mut by_surface: HashMap<String, Vec<EntryId>> = HashMap::new();
        for row in &rows {
            let ids = by_surface.entry(row.surface.clone()).or_default();
            // Distinct ids in first-seen scan order.
            if !ids.contains(&row.id) {
                ids.push(row.id);
            }
        }
        Self { rows, by_surface }
    }

    /// All distinct entry ids carrying this exact surface form.
    pub fn lookup(&self, surface: &str) -> Vec<EntryId> {
        self.by_surface.get(surface).cloned().unwrap_or_default()
    }

    pub fn rows(&self) -> &[SearchIndexRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read-only id lookup over the display rows, preserving row order.
#[derive(Debug)]
pub struct DisplayTable {
    rows: Vec<DisplayRow>,
    by_id: HashMap<EntryId, usize>,
}

impl DisplayTable {
    pub fn new(rows: Vec<DisplayRow>) -> Self {
        let by_id = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.id, idx))
            .collect();
        Self { rows, by_id }
    }

    pub fn get(&self, id: EntryId) -> Option<&DisplayRow> {
        self.by_id.get(&id).map(|&idx| &self.rows[idx])
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
