//! Public lookup entry point: lexicon first, machine translation second.
//!
//! ```text
//! lookup(query)
//!   ├─ no Han characters        → NotChinese
//!   ├─ index.lookup_exact hit   → Found(rank(entries))
//!   └─ otherwise                → Generated(romanize + translator.translate)
//!                                  (translation failure → Generated with an
//!                                   explanatory definition, never an error)
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::lexicon::{rank, LexiconEntry, LexiconIndex, RankedEntry, DEFAULT_MAX_RESULTS};
use crate::lookup::script::{contains_han, romanize};
use crate::translate::Translator;

// ---------------------------------------------------------------------------
// LookupResult
// ---------------------------------------------------------------------------

/// Outcome of a single lookup.  Always well-formed; failures of the fallback
/// path are folded into [`LookupResult::Generated`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupResult {
    /// The query contains no Han characters.
    NotChinese { query: String },

    /// One or more lexicon entries, ranked.
    Found {
        query: String,
        entries: Vec<RankedEntry>,
    },

    /// A single entry synthesized for a query the lexicon does not know.
    /// `translated` is `false` when the definition reports a translator
    /// failure instead of a gloss.
    Generated {
        query: String,
        entry: LexiconEntry,
        translated: bool,
    },
}

impl LookupResult {
    pub fn query(&self) -> &str {
        match self {
            LookupResult::NotChinese { query }
            | LookupResult::Found { query, .. }
            | LookupResult::Generated { query, .. } => query,
        }
    }

    /// Human-readable status line.
    pub fn message(&self) -> &'static str {
        match self {
            LookupResult::NotChinese { .. } => "Term not found",
            LookupResult::Found { .. } => "Phrase found in dictionary",
            LookupResult::Generated {
                translated: true, ..
            } => "Phrase not in dictionary; generated via machine translation",
            LookupResult::Generated {
                translated: false, ..
            } => "Phrase not in dictionary; machine translation unavailable",
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, LookupResult::Generated { .. })
    }

    /// Entries carried by the result, in display order.
    pub fn entries(&self) -> Vec<&LexiconEntry> {
        match self {
            LookupResult::NotChinese { .. } => Vec::new(),
            LookupResult::Found { entries, .. } => entries.iter().map(|r| &r.entry).collect(),
            LookupResult::Generated { entry, .. } => vec![entry],
        }
    }
}

// ---------------------------------------------------------------------------
// LookupService
// ---------------------------------------------------------------------------

/// Read-only dictionary lookup with machine-translation fallback.
///
/// The index must be fully built before it is handed to the service; the
/// service never mutates it.
pub struct LookupService {
    index: Arc<LexiconIndex>,
    translator: Arc<dyn Translator>,
    reverse_max_results: usize,
}

impl LookupService {
    pub fn new(index: Arc<LexiconIndex>, translator: Arc<dyn Translator>) -> Self {
        Self {
            index,
            translator,
            reverse_max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Cap the number of headwords returned by [`reverse_lookup`](Self::reverse_lookup).
    pub fn with_reverse_limit(mut self, max_results: usize) -> Self {
        self.reverse_max_results = max_results;
        self
    }

    pub fn index(&self) -> &LexiconIndex {
        &self.index
    }

    /// Resolve `query` to a [`LookupResult`].  Never fails.
    pub async fn lookup(&self, query: &str) -> LookupResult {
        let query = query.trim();

        if !contains_han(query) {
            return LookupResult::NotChinese {
                query: query.to_string(),
            };
        }

        let hits = self.index.lookup_exact(query);
        if !hits.is_empty() {
            let entries = hits.into_iter().cloned().collect();
            return LookupResult::Found {
                query: query.to_string(),
                entries: rank(entries, query),
            };
        }

        let romanization = romanize(&self.index, query);
        let (definition, translated) = match self.translator.translate(query).await {
            Ok(text) => (text, true),
            Err(e) => {
                log::warn!("lookup: fallback translation failed for {query:?}: {e}");
                (format!("[{e}]"), false)
            }
        };

        LookupResult::Generated {
            query: query.to_string(),
            entry: LexiconEntry::generated(query, romanization, definition),
            translated,
        }
    }

    /// English → Chinese: the top-ranked sense of each matching headword.
    pub fn reverse_lookup(&self, english: &str) -> Vec<LexiconEntry> {
        self.index
            .lookup_english(english, self.reverse_max_results)
            .into_iter()
            .filter_map(|headword| {
                let senses = self.index.lookup_exact(&headword).into_iter().cloned().collect();
                rank(senses, &headword).into_iter().next().map(|r| r.entry)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
