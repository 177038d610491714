use serde::{Deserialize, Serialize};

/// JMdict `misc` marker that flips an entry to kana-preferred display.
pub const USE_KANA_MARKER: &str = "word usually written using kana alone";

/// JMdict `ent_seq` sequence number.
pub type EntryId = u32;

/// One canonical dictionary headword group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Surface forms, in source order. May be empty for kana-only words.
    pub kanji: Vec<String>,
    /// Phonetic readings, in source order.
    pub kana: Vec<String>,
    /// Orthography annotations (e.g. "ateji"), first-seen order, deduplicated.
    pub kanji_notes: Vec<String>,
    /// One gloss string per sense, in source order. Numbered on display.
    pub meanings: Vec<String>,
    /// Part-of-speech tags, first-seen order, deduplicated.
    pub pos: Vec<String>,
    /// Usage annotations, first-seen order, deduplicated.
    pub notes: Vec<String>,
    /// True when the reading is the preferred display form.
    /// Always true when `kanji` is empty.
    pub use_kana: bool,
}

impl Entry {
    /// Whether an entry with these forms and notes displays kana first.
    pub fn derive_use_kana(kanji: &[String], notes: &[String]) -> bool {
        kanji.is_empty() || notes.iter().any(|n| n == USE_KANA_MARKER)
    }
}

/// Ordered-set push: appends `value` unless it is empty or already present.
pub fn push_unique(set: &mut Vec<String>, value: String) {
    if !value.is_empty() && !set.contains(&value) {
        set.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_unique_keeps_first_seen_order() {
        let mut set = Vec::new();
        push_unique(&mut set, "ateji".to_string());
        push_unique(&mut set, "irregular okurigana usage".to_string());
        push_unique(&mut set, "ateji".to_string());
        push_unique(&mut set, String::new());
        assert_eq!(set, vec!["ateji", "irregular okurigana usage"]);
    }

    #[test]
    fn empty_kanji_always_uses_kana() {
        assert!(Entry::derive_use_kana(&[], &[]));
        assert!(Entry::derive_use_kana(&[], &["colloquialism".to_string()]));
    }

    #[test]
    fn marker_note_uses_kana() {
        let kanji = vec!["猫".to_string()];
        assert!(!Entry::derive_use_kana(&kanji, &[]));
        assert!(Entry::derive_use_kana(
            &kanji,
            &[USE_KANA_MARKER.to_string()]
        ));
    }
}
