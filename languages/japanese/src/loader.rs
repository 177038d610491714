use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::bufread::GzDecoder;
use quick_xml::Reader;
use quick_xml::events::{BytesText, Event};
use regex::Regex;
use tango_core::Entry;

use crate::error::LoadError;
use crate::raw::{RawEntry, RawKanji, RawReading, RawSense};

/// Loads a JMdict dump and normalizes it into canonical entries.
pub struct JMdictLoader;

impl JMdictLoader {
    /// Load from an XML file; `.gz` paths are gzip-decoded on the fly.
    pub fn load(path: &Path) -> Result<Vec<Entry>, LoadError> {
        tracing::info!("Loading JMdict from {}", path.display());
        let file = BufReader::new(File::open(path)?);
        let gzipped = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        let entries = if gzipped {
            parse_document(BufReader::new(GzDecoder::new(file)))?
        } else {
            parse_document(file)?
        };
        tracing::info!("Loaded {} dictionary entries", entries.len());
        Ok(entries)
    }
}

/// Which leaf tag the current text content belongs to.
enum Field {
    None,
    Seq,
    KanjiForm,
    KanjiNote,
    ReadingForm,
    Gloss,
    Pos,
    Misc,
}

/// Streaming parse of a JMdict document into normalized entries.
///
/// JMdict encodes its part-of-speech and misc tags as general entities
/// (`&n;`, `&uk;`, ...) declared in the in-file DOCTYPE, so the internal
/// subset is scanned for `<!ENTITY>` declarations before any entry text is
/// decoded. The use-kana marker is one of those expansions.
pub fn parse_document<R: BufRead>(input: R) -> Result<Vec<Entry>, LoadError> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut entities: HashMap<String, String> = HashMap::new();
    let mut entries = Vec::new();

    let mut buf = Vec::new();
    let mut entry: Option<RawEntry> = None;
    let mut kanji: Option<RawKanji> = None;
    let mut reading: Option<RawReading> = None;
    let mut sense: Option<RawSense> = None;
    let mut field = Field::None;
    let mut text = String::new();

    loop {
        let position = reader.buffer_position();
        match reader.read_event_into(&mut buf) {
            Ok(Event::DocType(e)) => {
                entities = parse_entities(&String::from_utf8_lossy(e.as_ref()));
                tracing::debug!("Resolved {} DTD entities", entities.len());
            }
            Ok(Event::Start(e)) => {
                text.clear();
                field = match e.name().as_ref() {
                    b"entry" => {
                        entry = Some(RawEntry::default());
                        Field::None
                    }
                    b"ent_seq" => Field::Seq,
                    b"k_ele" => {
                        kanji = Some(RawKanji::default());
                        Field::None
                    }
                    b"keb" if kanji.is_some() => Field::KanjiForm,
                    b"ke_inf" if kanji.is_some() => Field::KanjiNote,
                    b"r_ele" => {
                        reading = Some(RawReading::default());
                        Field::None
                    }
                    b"reb" if reading.is_some() => Field::ReadingForm,
                    b"sense" => {
                        sense = Some(RawSense::default());
                        Field::None
                    }
                    b"gloss" if sense.is_some() => {
                        // Multilingual dumps tag non-English glosses with
                        // xml:lang; untagged glosses default to English.
                        let mut english = true;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"xml:lang" && attr.value.as_ref() != b"eng" {
                                english = false;
                            }
                        }
                        if english { Field::Gloss } else { Field::None }
                    }
                    b"pos" if sense.is_some() => Field::Pos,
                    b"misc" if sense.is_some() => Field::Misc,
                    _ => Field::None,
                };
            }
            Ok(Event::Text(e)) => {
                if !matches!(field, Field::None) {
                    text.push_str(&decode_text(&e, &entities));
                }
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"ent_seq" => {
                        if let Some(en) = entry.as_mut() {
                            en.seq = Some(std::mem::take(&mut text));
                        }
                    }
                    b"keb" => {
                        if let Some(k) = kanji.as_mut() {
                            k.form = std::mem::take(&mut text);
                        }
                    }
                    b"ke_inf" => {
                        if let Some(k) = kanji.as_mut() {
                            k.notes.push(std::mem::take(&mut text));
                        }
                    }
                    b"k_ele" => {
                        if let (Some(en), Some(k)) = (entry.as_mut(), kanji.take()) {
                            en.kanji.push(k);
                        }
                    }
                    b"reb" => {
                        if let Some(r) = reading.as_mut() {
                            r.form = std::mem::take(&mut text);
                        }
                    }
                    b"r_ele" => {
                        if let (Some(en), Some(r)) = (entry.as_mut(), reading.take()) {
                            en.readings.push(r);
                        }
                    }
                    b"gloss" => {
                        if matches!(field, Field::Gloss) {
                            if let Some(s) = sense.as_mut() {
                                s.glosses.push(std::mem::take(&mut text));
                            }
                        }
                    }
                    b"pos" => {
                        if let Some(s) = sense.as_mut() {
                            s.pos.push(std::mem::take(&mut text));
                        }
                    }
                    b"misc" => {
                        if let Some(s) = sense.as_mut() {
                            s.misc.push(std::mem::take(&mut text));
                        }
                    }
                    b"sense" => {
                        if let (Some(en), Some(s)) = (entry.as_mut(), sense.take()) {
                            en.senses.push(s);
                        }
                    }
                    b"entry" => {
                        if let Some(raw) = entry.take() {
                            entries.push(raw.normalize()?);
                        }
                    }
                    _ => {}
                }
                field = Field::None;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(source) => return Err(LoadError::Xml { position, source }),
        }
        buf.clear();
    }

    Ok(entries)
}

/// Entity-aware text decoding. Unresolvable references are kept verbatim so
/// a malformed dictionary stays visible in the output instead of silently
/// losing tags.
fn decode_text(e: &BytesText, entities: &HashMap<String, String>) -> String {
    match e.unescape_with(|name| entities.get(name).map(String::as_str)) {
        Ok(cow) => cow.into_owned(),
        Err(_) => String::from_utf8_lossy(e.as_ref()).into_owned(),
    }
}

/// Extracts `<!ENTITY name "expansion">` pairs from the internal DTD subset.
fn parse_entities(doctype: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(re) = Regex::new(r#"<!ENTITY\s+(\S+)\s+"([^"]*)">"#) else {
        return map;
    };
    for cap in re.captures_iter(doctype) {
        map.insert(cap[1].to_string(), cap[2].to_string());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tango_core::USE_KANA_MARKER;

    const MINI_JMDICT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE JMdict [
<!ENTITY n "noun (common) (futsuumeishi)">
<!ENTITY uk "word usually written using kana alone">
<!ENTITY ateji "ateji (phonetic) reading">
]>
<JMdict>
<entry>
<ent_seq>1000050</ent_seq>
<k_ele>
<keb>猫</keb>
</k_ele>
<r_ele>
<reb>ねこ</reb>
</r_ele>
<sense>
<pos>&n;</pos>
<gloss>cat</gloss>
</sense>
<sense>
<pos>&n;</pos>
<gloss>shamisen</gloss>
</sense>
</entry>
<entry>
<ent_seq>1000060</ent_seq>
<k_ele>
<keb>流石</keb>
<ke_inf>&ateji;</ke_inf>
</k_ele>
<k_ele>
<keb>遉</keb>
<ke_inf>&ateji;</ke_inf>
</k_ele>
<r_ele>
<reb>さすが</reb>
</r_ele>
<sense>
<pos>&n;</pos>
<misc>&uk;</misc>
<gloss>as one would expect</gloss>
</sense>
</entry>
</JMdict>
"#;

    #[test]
    fn parses_entries_in_document_order() {
        let entries = parse_document(Cursor::new(MINI_JMDICT)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 1000050);
        assert_eq!(entries[0].kanji, vec!["猫"]);
        assert_eq!(entries[0].kana, vec!["ねこ"]);
        assert_eq!(entries[0].meanings, vec!["cat", "shamisen"]);
        assert!(!entries[0].use_kana);
    }

    #[test]
    fn expands_dtd_entities() {
        let entries = parse_document(Cursor::new(MINI_JMDICT)).unwrap();
        assert_eq!(entries[0].pos, vec!["noun (common) (futsuumeishi)"]);
        assert_eq!(entries[1].notes, vec![USE_KANA_MARKER]);
        assert_eq!(entries[1].kanji_notes, vec!["ateji (phonetic) reading"]);
    }

    #[test]
    fn use_kana_marker_carries_through() {
        let entries = parse_document(Cursor::new(MINI_JMDICT)).unwrap();
        assert!(entries[1].use_kana);
        assert!(!entries[1].kanji.is_empty());
    }

    #[test]
    fn missing_ent_seq_aborts_the_parse() {
        let doc = r#"<JMdict><entry><r_ele><reb>ねこ</reb></r_ele>
<sense><gloss>cat</gloss></sense></entry></JMdict>"#;
        match parse_document(Cursor::new(doc)) {
            Err(LoadError::MissingId { near }) => assert_eq!(near, "ねこ"),
            other => panic!("expected MissingId, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_ent_seq_aborts_the_parse() {
        let doc = r#"<JMdict><entry><ent_seq>first</ent_seq>
<r_ele><reb>ねこ</reb></r_ele></entry></JMdict>"#;
        assert!(matches!(
            parse_document(Cursor::new(doc)),
            Err(LoadError::InvalidId(_))
        ));
    }

    #[test]
    fn non_english_glosses_are_skipped() {
        let doc = r#"<JMdict><entry><ent_seq>1</ent_seq>
<r_ele><reb>ねこ</reb></r_ele>
<sense><gloss xml:lang="ger">Katze</gloss><gloss>cat</gloss></sense>
</entry></JMdict>"#;
        let entries = parse_document(Cursor::new(doc)).unwrap();
        assert_eq!(entries[0].meanings, vec!["cat"]);
    }

    #[test]
    fn loads_gzipped_dumps() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jmdict.xml.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(MINI_JMDICT.as_bytes()).unwrap();
        enc.finish().unwrap();

        let entries = JMdictLoader::load(&path).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
