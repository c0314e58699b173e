//! Lexicon entry types.
//!
//! A [`LexiconEntry`] is one sense of one headword as it appears in a
//! CC-CEDICT line.  The same headword commonly has several entries (different
//! readings or unrelated senses), so the index stores lists of entries per
//! headword rather than a single value.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// A measure word annotation (`CL:個|个[ge4]`) attached to a noun entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    /// Traditional form of the counter word.
    pub traditional: String,
    /// Simplified form; equal to `traditional` when the source gives one form.
    pub simplified: String,
    /// Reading of the counter word itself (e.g. `"ge4"`).
    pub romanization: String,
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.traditional == self.simplified {
            write!(f, "{}[{}]", self.simplified, self.romanization)
        } else {
            write!(
                f,
                "{}|{}[{}]",
                self.traditional, self.simplified, self.romanization
            )
        }
    }
}

// ---------------------------------------------------------------------------
// LexiconEntry
// ---------------------------------------------------------------------------

/// One lexical sense.
///
/// Entries are built by the parser (or synthesized by the lookup service for
/// generated results) and never mutated after indexing, apart from the
/// build-time `frequency_score` pass run by
/// [`LexiconIndex::build_frequency_table`](crate::lexicon::LexiconIndex::build_frequency_table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub headword_simplified: String,
    pub headword_traditional: String,
    /// Tone-numbered reading, e.g. `"yin2 hang2"`.
    pub romanization: String,
    /// Glosses in source order, without duplicates.
    pub definitions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<Vec<Classifier>>,
    pub is_compound: bool,
    pub char_count: usize,
    /// Number of indexed compounds that start with this character under this
    /// reading.  Only ever non-zero for single-character entries.
    pub frequency_score: u32,
    pub is_generated: bool,
}

impl LexiconEntry {
    /// Build a lexicon-sourced entry.  `is_compound` and `char_count` are
    /// derived from the simplified headword.
    pub fn new(
        traditional: impl Into<String>,
        simplified: impl Into<String>,
        romanization: impl Into<String>,
        definitions: Vec<String>,
    ) -> Self {
        let headword_simplified = simplified.into();
        let char_count = headword_simplified.chars().count();
        Self {
            headword_traditional: traditional.into(),
            headword_simplified,
            romanization: romanization.into(),
            definitions,
            classifier: None,
            is_compound: char_count > 1,
            char_count,
            frequency_score: 0,
            is_generated: false,
        }
    }

    /// Build an entry synthesized at query time (not present in the lexicon).
    ///
    /// Both headword forms are set to `query`; the source of the single
    /// definition is the fallback translator.
    pub fn generated(
        query: impl Into<String>,
        romanization: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        let query = query.into();
        let mut entry = Self::new(query.clone(), query, romanization, vec![definition.into()]);
        entry.is_generated = true;
        entry
    }

    /// First character of the simplified headword.
    pub fn first_char(&self) -> Option<char> {
        self.headword_simplified.chars().next()
    }

    /// First syllable of the reading (`"yin2 hang2"` → `"yin2"`).
    pub fn first_syllable(&self) -> Option<&str> {
        self.romanization.split_whitespace().next()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
