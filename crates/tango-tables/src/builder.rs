use tango_core::{Entry, capitalize, join_forms};

use crate::types::{DisplayRow, SearchIndexRow};

/// Flattens entries into the search index: one row per kanji form, then one
/// per kana form, in entry order.
pub fn build_search_index(entries: &[Entry]) -> Vec<SearchIndexRow> {
    let mut rows = Vec::new();
    for entry in entries {
        for form in entry.kanji.iter().chain(entry.kana.iter()) {
            rows.push(SearchIndexRow {
                id: entry.id,
                surface: form.clone(),
            });
        }
    }
    rows
}

/// Formats every entry into its display row. No entry is dropped; an entry
/// with no forms still yields a row with empty strings.
pub fn build_display_table(entries: &[Entry]) -> Vec<DisplayRow> {
    entries.iter().map(display_row).collect()
}

fn display_row(entry: &Entry) -> DisplayRow {
    let (expression, mut reading) = if entry.use_kana {
        (join_forms(&entry.kana), join_forms(&entry.kanji))
    } else {
        (join_forms(&entry.kanji), join_forms(&entry.kana))
    };
    if !entry.kanji_notes.is_empty() {
        reading.push_str(&format!(" ({})", join_forms(&entry.kanji_notes)));
    }
    DisplayRow {
        id: entry.id,
        expression,
        meaning: format_meaning(entry),
        reading,
        part_of_speech: join_forms(&entry.pos),
    }
}

fn format_meaning(entry: &Entry) -> String {
    let mut meaning = if entry.meanings.len() == 1 {
        capitalize(&format!("{}.", entry.meanings[0]))
    } else {
        let mut numbered = String::new();
        for (i, gloss) in entry.meanings.iter().enumerate() {
            if i > 0 {
                numbered.push_str("; ");
            }
            numbered.push_str(&format!("{}. {}", i + 1, gloss));
        }
        numbered.push('.');
        numbered
    };
    if !entry.notes.is_empty() {
        meaning.push_str(&format!(" ({})", join_forms(&entry.notes)));
    }
    meaning
}
