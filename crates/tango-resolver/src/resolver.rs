use std::io::{BufRead, Write};

use tango_core::{EntryId, normalize_query};
use tango_tables::{DisplayTable, SearchIndex};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("operator input closed while a decision was pending")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-word resolution state. A replacement search term always restarts
/// matching from scratch; no candidate state survives the transition.
enum State {
    Searching(String),
    NoMatch(String),
    Disambiguating {
        term: String,
        matches: Vec<EntryId>,
    },
    Resolved(Vec<EntryId>),
}

/// Interactively resolves query words against the search index.
///
/// Generic over its input and output streams so the dialogue can be
/// scripted in tests; the binary hands it locked stdin/stdout.
pub struct Resolver<'t, R, W> {
    index: &'t SearchIndex,
    table: &'t DisplayTable,
    input: R,
    output: W,
}

impl<'t, R: BufRead, W: Write> Resolver<'t, R, W> {
    pub fn new(index: &'t SearchIndex, table: &'t DisplayTable, input: R, output: W) -> Self {
        Self {
            index,
            table,
            input,
            output,
        }
    }

    /// Resolves every word in order, appending each word's ids to one
    /// running list. Duplicates across words are preserved.
    pub fn resolve_all(&mut self, words: &[String]) -> Result<Vec<EntryId>, ResolveError> {
        let mut selected = Vec::new();
        for word in words {
            let ids = self.resolve_word(word)?;
            tracing::debug!(%word, count = ids.len(), "resolved");
            selected.extend(ids);
        }
        Ok(selected)
    }

    /// Runs the state machine for a single word until it reaches a
    /// terminal state. Zero, one, or many ids may come back, in operator
    /// response order when a subset was chosen.
    pub fn resolve_word(&mut self, word: &str) -> Result<Vec<EntryId>, ResolveError> {
        let mut state = State::Searching(normalize_query(word));
        loop {
            state = match state {
                State::Searching(term) => {
                    let matches = self.index.lookup(&term);
                    match matches.len() {
                        0 => State::NoMatch(term),
                        1 => State::Resolved(matches),
                        _ => State::Disambiguating { term, matches },
                    }
                }
                State::NoMatch(term) => self.on_no_match(&term)?,
                State::Disambiguating { term, matches } => {
                    self.on_disambiguate(&term, matches)?
                }
                State::Resolved(ids) => return Ok(ids),
            };
        }
    }

    fn on_no_match(&mut self, term: &str) -> Result<State, ResolveError> {
        writeln!(
            self.output,
            "No match for {term}. Enter a new search term, or blank to skip."
        )?;
        let response = self.read_line()?;
        if response.is_empty() {
            Ok(State::Resolved(Vec::new()))
        } else {
            Ok(State::Searching(normalize_query(&response)))
        }
    }

    fn on_disambiguate(
        &mut self,
        term: &str,
        matches: Vec<EntryId>,
    ) -> Result<State, ResolveError> {
        for (i, id) in matches.iter().enumerate() {
            if let Some(row) = self.table.get(*id) {
                writeln!(self.output, "{}: {} {}", i + 1, row.expression, row.meaning)?;
            }
        }
        loop {
            writeln!(
                self.output,
                "Multiple hits for {term}. Enter entry numbers separated by spaces, \
                 a for all, x for none, or r to refine the search term."
            )?;
            match self.read_line()?.as_str() {
                "a" => return Ok(State::Resolved(matches)),
                "x" => return Ok(State::Resolved(Vec::new())),
                "r" => {
                    writeln!(self.output, "Enter new search term:")?;
                    let term = self.read_line()?;
                    return Ok(State::Searching(normalize_query(&term)));
                }
                response => match parse_selection(response, matches.len()) {
                    Some(indices) => {
                        let ids = indices.iter().map(|&i| matches[i - 1]).collect();
                        return Ok(State::Resolved(ids));
                    }
                    // Invalid response: stay in this state and re-prompt.
                    None => continue,
                },
            }
        }
    }

    fn read_line(&mut self) -> Result<String, ResolveError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ResolveError::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}

/// All-or-nothing parse of a 1-based index selection. Any token that is not
/// an integer, or is out of range, rejects the whole response. Repeats and
/// arbitrary order are allowed.
fn parse_selection(response: &str, candidates: usize) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    for token in response.split_whitespace() {
        let idx: usize = token.parse().ok()?;
        if idx == 0 || idx > candidates {
            return None;
        }
        indices.push(idx);
    }
    if indices.is_empty() {
        return None;
    }
    Some(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tango_tables::{build_display_table, build_search_index};

    fn fixtures() -> (SearchIndex, DisplayTable) {
        let mk = |id, kanji: &[&str], kana: &[&str], meaning: &str| tango_core::Entry {
            id,
            kanji: kanji.iter().map(|s| s.to_string()).collect(),
            kana: kana.iter().map(|s| s.to_string()).collect(),
            kanji_notes: vec![],
            meanings: vec![meaning.to_string()],
            pos: vec!["n".to_string()],
            notes: vec![],
            use_kana: kanji.is_empty(),
        };
        let entries = vec![
            mk(1, &[], &["ねこ"], "cat"),
            mk(10, &["橋"], &["はし"], "bridge"),
            mk(20, &["端"], &["はし"], "edge"),
            mk(30, &["箸"], &["はし"], "chopsticks"),
        ];
        let index = SearchIndex::new(build_search_index(&entries));
        let table = DisplayTable::new(build_display_table(&entries));
        (index, table)
    }

    fn resolve(word: &str, script: &str) -> Result<Vec<EntryId>, ResolveError> {
        let (index, table) = fixtures();
        let mut output = Vec::new();
        let mut resolver = Resolver::new(&index, &table, Cursor::new(script), &mut output);
        resolver.resolve_word(word)
    }

    #[test]
    fn unique_match_needs_no_interaction() {
        // Empty script: any read would fail with InputClosed.
        assert_eq!(resolve("ねこ", "").unwrap(), vec![1]);
    }

    #[test]
    fn no_match_blank_skips() {
        assert_eq!(resolve("いぬ", "\n").unwrap(), Vec::<EntryId>::new());
    }

    #[test]
    fn no_match_replacement_restarts_search() {
        assert_eq!(resolve("いぬ", "ねこ\n").unwrap(), vec![1]);
    }

    #[test]
    fn subset_preserves_response_order_and_repeats() {
        assert_eq!(resolve("はし", "2 2 1\n").unwrap(), vec![20, 20, 10]);
    }

    #[test]
    fn accept_all_keeps_match_order() {
        assert_eq!(resolve("はし", "a\n").unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn reject_all_contributes_nothing() {
        assert_eq!(resolve("はし", "x\n").unwrap(), Vec::<EntryId>::new());
    }

    #[test]
    fn refine_restarts_from_scratch() {
        assert_eq!(resolve("はし", "r\nねこ\n").unwrap(), vec![1]);
    }

    #[test]
    fn out_of_range_index_rejects_whole_response() {
        assert_eq!(resolve("はし", "1 5\n2\n").unwrap(), vec![20]);
    }

    #[test]
    fn non_numeric_token_rejects_whole_response() {
        assert_eq!(resolve("はし", "1 two\n3\n").unwrap(), vec![30]);
    }

    #[test]
    fn unrecognized_input_reprompts() {
        assert_eq!(resolve("はし", "yes\n\n1\n").unwrap(), vec![10]);
    }

    #[test]
    fn closed_input_is_an_error_not_a_hang() {
        assert!(matches!(resolve("はし", ""), Err(ResolveError::InputClosed)));
    }

    #[test]
    fn queries_are_normalized_before_lookup() {
        // Full-width/compatibility input still finds the entry.
        assert_eq!(resolve("  ねこ ", "").unwrap(), vec![1]);
    }

    #[test]
    fn resolve_all_appends_across_words_with_duplicates() {
        let (index, table) = fixtures();
        let mut output = Vec::new();
        let script = "a\n";
        let mut resolver = Resolver::new(&index, &table, Cursor::new(script), &mut output);
        let words = vec!["ねこ".to_string(), "はし".to_string(), "ねこ".to_string()];
        assert_eq!(resolver.resolve_all(&words).unwrap(), vec![1, 10, 20, 30, 1]);
    }

    #[test]
    fn candidates_are_listed_once_per_disambiguation() {
        let (index, table) = fixtures();
        let mut output = Vec::new();
        let mut resolver = Resolver::new(&index, &table, Cursor::new("x\n"), &mut output);
        resolver.resolve_word("はし").unwrap();
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("1: 橋 Bridge."));
        assert!(shown.contains("3: 箸 Chopsticks."));
    }
}
