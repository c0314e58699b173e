//! Ranking of multiple entries filed under one headword.
//!
//! A single character often has several unrelated senses or readings.  The
//! compound-frequency score (how many known compounds start with this
//! character under this reading) is a deterministic proxy for which sense is
//! more common.  Compounds keep the dictionary's own order.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::lexicon::entry::LexiconEntry;

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Label attached to each ranked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    MostCommon,
    LessCommon,
    SeeAllMeanings,
    OnlyMeaning,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::MostCommon => "most common",
            Confidence::LessCommon => "less common",
            Confidence::SeeAllMeanings => "see all meanings",
            Confidence::OnlyMeaning => "only meaning",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RankedEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub entry: LexiconEntry,
    pub confidence: Confidence,
}

// ---------------------------------------------------------------------------
// rank
// ---------------------------------------------------------------------------

/// Order `entries` for display and label each one.
///
/// - one entry: `"only meaning"`, whatever the headword length;
/// - single-character headword: stable sort by `frequency_score` descending;
///   the top entry is `"most common"` and the rest `"less common"`, unless the
///   top score is 0, in which case every entry is `"see all meanings"`;
/// - multi-character headword: source order, every entry `"see all meanings"`.
///
/// Ties keep insertion order and are not broken by any secondary signal.
pub fn rank(mut entries: Vec<LexiconEntry>, query_headword: &str) -> Vec<RankedEntry> {
    if entries.len() == 1 {
        return entries
            .into_iter()
            .map(|entry| RankedEntry {
                entry,
                confidence: Confidence::OnlyMeaning,
            })
            .collect();
    }

    let single_char = query_headword.chars().count() == 1;
    if !single_char {
        return entries
            .into_iter()
            .map(|entry| RankedEntry {
                entry,
                confidence: Confidence::SeeAllMeanings,
            })
            .collect();
    }

    // `sort_by` is stable, so equal scores keep their insertion order.
    entries.sort_by(|a, b| b.frequency_score.cmp(&a.frequency_score));

    let has_signal = entries.first().is_some_and(|top| top.frequency_score > 0);

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let confidence = match (has_signal, i) {
                (false, _) => Confidence::SeeAllMeanings,
                (true, 0) => Confidence::MostCommon,
                (true, _) => Confidence::LessCommon,
            };
            RankedEntry { entry, confidence }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
