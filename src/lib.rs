//! Chinese dictionary lookup over CC-CEDICT with a machine-translation
//! fallback for phrases the lexicon does not contain.
//!
//! * [`lexicon`]: parsing, indexing and sense ranking.
//! * [`translate`]: lazily loaded, idle-evicted fallback translator.
//! * [`lookup`]: the query entry point tying both together.
//! * [`config`]: TOML settings and platform paths.

pub mod config;
pub mod lexicon;
pub mod lookup;
pub mod translate;
