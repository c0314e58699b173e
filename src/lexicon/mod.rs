//! CC-CEDICT lexicon: parsing, indexing and sense ranking.
//!
//! ```text
//! cc-cedict.txt ──parse_line──▶ LexiconEntry ──index──▶ LexiconIndex
//!                                                  │
//!                          build_frequency_table ◀─┘  (second pass)
//!
//! lookup_exact(headword) ──▶ Vec<&LexiconEntry> ──rank──▶ Vec<RankedEntry>
//! ```

pub mod entry;
pub mod index;
pub mod parser;
pub mod rank;
pub mod reverse;

pub use entry::{Classifier, LexiconEntry};
pub use index::{CompoundFrequencyTable, IndexStats, LexiconError, LexiconIndex};
pub use parser::{normalize_romanization, parse_line};
pub use rank::{rank, Confidence, RankedEntry};
pub use reverse::{EnglishIndex, DEFAULT_MAX_RESULTS};
