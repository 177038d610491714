use tango_core::{Entry, EntryId, push_unique};

use crate::error::LoadError;

/// One `<entry>` element, validated against the fixed JMdict schema at
/// parse time rather than accumulated into open-ended generic maps.
#[derive(Debug, Default)]
pub struct RawEntry {
    pub seq: Option<String>,
    pub kanji: Vec<RawKanji>,
    pub readings: Vec<RawReading>,
    pub senses: Vec<RawSense>,
}

/// A `<k_ele>` element: one surface form plus its `ke_inf` annotations.
#[derive(Debug, Default)]
pub struct RawKanji {
    pub form: String,
    pub notes: Vec<String>,
}

/// An `<r_ele>` element.
#[derive(Debug, Default)]
pub struct RawReading {
    pub form: String,
}

/// A `<sense>` element: glosses plus `pos`/`misc` tags.
#[derive(Debug, Default)]
pub struct RawSense {
    pub glosses: Vec<String>,
    pub pos: Vec<String>,
    pub misc: Vec<String>,
}

impl RawEntry {
    /// Collapses the raw record into a canonical [`Entry`].
    ///
    /// A missing or non-numeric `ent_seq` is fatal for the whole compile
    /// run; a partial index with unstable ids is worse than no index.
    pub fn normalize(self) -> Result<Entry, LoadError> {
        let near = self
            .kanji
            .first()
            .map(|k| k.form.clone())
            .or_else(|| self.readings.first().map(|r| r.form.clone()))
            .unwrap_or_else(|| "<no forms>".to_string());
        let seq = self.seq.ok_or(LoadError::MissingId { near })?;
        let id: EntryId = seq
            .parse()
            .map_err(|_| LoadError::InvalidId(seq.clone()))?;

        let mut kanji = Vec::new();
        let mut kanji_notes = Vec::new();
        for k in self.kanji {
            kanji.push(k.form);
            for note in k.notes {
                push_unique(&mut kanji_notes, note);
            }
        }

        let kana: Vec<String> = self.readings.into_iter().map(|r| r.form).collect();

        let mut meanings = Vec::new();
        let mut pos = Vec::new();
        let mut notes = Vec::new();
        for sense in self.senses {
            // A sense's glosses render as one numbered meaning.
            if !sense.glosses.is_empty() {
                meanings.push(sense.glosses.join(", "));
            }
            for p in sense.pos {
                push_unique(&mut pos, p);
            }
            for m in sense.misc {
                push_unique(&mut notes, m);
            }
        }

        let use_kana = Entry::derive_use_kana(&kanji, &notes);
        Ok(Entry {
            id,
            kanji,
            kana,
            kanji_notes,
            meanings,
            pos,
            notes,
            use_kana,
        })
    }
}
