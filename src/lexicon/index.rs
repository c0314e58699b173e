//! In-memory bilingual index over parsed lexicon entries.
//!
//! Entries are stored once in an arena; the simplified and traditional tables
//! map a headword to the ids of every entry filed under it, in insertion
//! order.  Building is two-phase:
//!
//! 1. [`LexiconIndex::index`] every entry (also fills the
//!    [`CompoundFrequencyTable`]),
//! 2. [`LexiconIndex::build_frequency_table`] once, to score single-character
//!    entries.
//!
//! [`LexiconIndex::load`] and [`LexiconIndex::from_reader`] run both phases,
//! so an index obtained from them is complete and can be shared read-only.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::lexicon::entry::LexiconEntry;
use crate::lexicon::parser::parse_line;
use crate::lexicon::rank::rank;
use crate::lexicon::reverse::EnglishIndex;

// ---------------------------------------------------------------------------
// LexiconError
// ---------------------------------------------------------------------------

/// Errors raised while loading a lexicon file.
///
/// Individual malformed lines are never errors; they are skipped.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The dictionary file does not exist.  Fatal at startup.
    #[error("Dictionary not found: {}", .0.display())]
    FileMissing(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// CompoundFrequencyTable
// ---------------------------------------------------------------------------

/// `(first character, reading of that character) → number of compounds`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompoundFrequencyTable {
    counts: HashMap<(char, String), u32>,
}

impl CompoundFrequencyTable {
    fn record(&mut self, entry: &LexiconEntry) {
        if let (Some(first), Some(syllable)) = (entry.first_char(), entry.first_syllable()) {
            *self.counts.entry((first, syllable.to_string())).or_insert(0) += 1;
        }
    }

    /// Number of compounds that begin with `character` read as `romanization`.
    pub fn get(&self, character: char, romanization: &str) -> u32 {
        self.counts
            .get(&(character, romanization.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// IndexStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub simplified_keys: usize,
    pub traditional_keys: usize,
    pub compounds: usize,
    pub frequency_keys: usize,
}

// ---------------------------------------------------------------------------
// LexiconIndex
// ---------------------------------------------------------------------------

type EntryId = usize;

#[derive(Debug, Default, Clone)]
pub struct LexiconIndex {
    entries: Vec<LexiconEntry>,
    simplified: HashMap<String, Vec<EntryId>>,
    traditional: HashMap<String, Vec<EntryId>>,
    compound_frequency: CompoundFrequencyTable,
    english: EnglishIndex,
}

impl LexiconIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Load and fully build an index from a CC-CEDICT file.
    ///
    /// # Errors
    ///
    /// - [`LexiconError::FileMissing`]: `path` does not exist.
    /// - [`LexiconError::Io`]: the file could not be opened or read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LexiconError::FileMissing(path.to_path_buf()));
        }

        log::info!("Loading lexicon from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Build an index from any line-oriented source.
    ///
    /// Lines that are comments, malformed, or not valid UTF-8 are skipped.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, LexiconError> {
        let mut index = Self::new();
        let mut buf: Vec<u8> = Vec::new();
        let mut line_no = 0usize;
        let mut skipped = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let Ok(line) = std::str::from_utf8(&buf) else {
                log::debug!("lexicon line {line_no}: invalid UTF-8, skipped");
                skipped += 1;
                continue;
            };

            match parse_line(line) {
                Some(entry) => index.index(entry),
                None => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() && !trimmed.starts_with('#') && !trimmed.starts_with('%')
                    {
                        log::debug!("lexicon line {line_no}: malformed, skipped");
                        skipped += 1;
                    }
                }
            }
        }

        index.build_frequency_table();

        let stats = index.stats();
        log::info!(
            "Lexicon loaded: {} entries ({} simplified keys, {} traditional keys, {} compounds), {} lines skipped",
            stats.entries,
            stats.simplified_keys,
            stats.traditional_keys,
            stats.compounds,
            skipped
        );

        Ok(index)
    }

    /// Add one entry (build phase 1).
    pub fn index(&mut self, entry: LexiconEntry) {
        let id = self.entries.len();

        self.simplified
            .entry(entry.headword_simplified.clone())
            .or_default()
            .push(id);

        if entry.headword_traditional != entry.headword_simplified {
            self.traditional
                .entry(entry.headword_traditional.clone())
                .or_default()
                .push(id);
        }

        if entry.is_compound {
            self.compound_frequency.record(&entry);
        }

        self.english
            .insert(&entry.headword_simplified, &entry.definitions);

        self.entries.push(entry);
    }

    /// Score single-character entries from the compound table (build phase 2).
    ///
    /// Only headwords with more than one sense are scored; everything else
    /// keeps `frequency_score == 0`.  Must run after the last
    /// [`index`](Self::index) call.
    pub fn build_frequency_table(&mut self) {
        for ids in self.simplified.values() {
            if ids.len() < 2 {
                continue;
            }
            for &id in ids {
                let entry = &mut self.entries[id];
                if entry.char_count != 1 {
                    continue;
                }
                let Some(ch) = entry.first_char() else {
                    continue;
                };
                entry.frequency_score = self.compound_frequency.get(ch, &entry.romanization);
            }
        }

        self.english.finish();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every entry filed under `headword`, simplified table first.
    ///
    /// Returns an empty vector when the headword is unknown.
    pub fn lookup_exact(&self, headword: &str) -> Vec<&LexiconEntry> {
        self.simplified
            .get(headword)
            .or_else(|| self.traditional.get(headword))
            .map(|ids| ids.iter().map(|&id| &self.entries[id]).collect())
            .unwrap_or_default()
    }

    /// Preferred reading of a single character: the romanization of its
    /// top-ranked entry.
    pub fn reading_of(&self, character: char) -> Option<String> {
        let mut buf = [0u8; 4];
        let key: &str = character.encode_utf8(&mut buf);
        let entries: Vec<LexiconEntry> = self.lookup_exact(key).into_iter().cloned().collect();
        rank(entries, key)
            .into_iter()
            .next()
            .map(|ranked| ranked.entry.romanization)
    }

    /// Simplified headwords whose definitions mention `english`.
    pub fn lookup_english(&self, english: &str, max_results: usize) -> Vec<String> {
        self.english.lookup(english, max_results)
    }

    pub fn compound_frequency(&self) -> &CompoundFrequencyTable {
        &self.compound_frequency
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entries: self.entries.len(),
            simplified_keys: self.simplified.len(),
            traditional_keys: self.traditional.len(),
            compounds: self.entries.iter().filter(|e| e.is_compound).count(),
            frequency_keys: self.compound_frequency.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
