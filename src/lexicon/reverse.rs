//! English → Chinese reverse index built from entry definitions.
//!
//! Definitions are cut into short English phrases (`"to book ahead; to
//! reserve"` → `"book ahead"`, `"reserve"`) and each phrase points back at the
//! simplified headwords whose definitions produced it.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Words too common to be useful as single-word keys.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "to", "of", "in", "on", "for", "by", "with", "and", "or", "from", "as",
    "at", "is", "are", "be", "was", "were", "that", "this", "these", "those", "it", "its",
    "which", "also", "used", "use",
];

/// Default cap on reverse lookup results.
pub const DEFAULT_MAX_RESULTS: usize = 6;

fn phrase_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*(?:;|,|/|\bor\b|\band\b|\bto\b)\s*").expect("static regex")
    })
}

fn trailing_parenthetical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(.*\)$").expect("static regex"))
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Split one definition into lowercase phrase candidates.
pub fn split_definition(definition: &str) -> Vec<String> {
    phrase_separator()
        .split(definition)
        .filter_map(|part| {
            let part = part.trim().to_lowercase();
            let part = trailing_parenthetical().replace(&part, "");
            let part = part.trim();
            (!part.is_empty()).then(|| part.to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// EnglishIndex
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct EnglishIndex {
    phrases: HashMap<String, Vec<String>>,
    /// Phrase keys ordered by (word count, length) for the whole-word pass.
    ordered_keys: Vec<String>,
}

impl EnglishIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every phrase of every definition under `simplified`.
    pub fn insert(&mut self, simplified: &str, definitions: &[String]) {
        for definition in definitions {
            for phrase in split_definition(definition) {
                let mut words = phrase
                    .split(|c: char| !c.is_ascii_alphabetic())
                    .filter(|w| !w.is_empty());
                let single_word = match (words.next(), words.next()) {
                    (Some(w), None) if w.len() > 2 && !is_stopword(w) && w != phrase => {
                        Some(w.to_string())
                    }
                    _ => None,
                };

                self.add(phrase, simplified);
                if let Some(word) = single_word {
                    self.add(word, simplified);
                }
            }
        }
    }

    fn add(&mut self, key: String, simplified: &str) {
        let headwords = self.phrases.entry(key).or_default();
        if !headwords.iter().any(|h| h == simplified) {
            headwords.push(simplified.to_string());
        }
    }

    /// Freeze the key order used by whole-word matching.  Called once after
    /// the last [`insert`](Self::insert).
    pub fn finish(&mut self) {
        let mut keys: Vec<String> = self.phrases.keys().cloned().collect();
        keys.sort_by(|a, b| {
            (a.split_whitespace().count(), a.len(), a.as_str())
                .cmp(&(b.split_whitespace().count(), b.len(), b.as_str()))
        });
        self.ordered_keys = keys;
    }

    /// Simplified headwords whose definitions mention `query`.
    ///
    /// Exact phrase matches come first, then phrases containing `query` as a
    /// whole word, shortest phrases first.
    pub fn lookup(&self, query: &str, max_results: usize) -> Vec<String> {
        let q = query.trim().to_lowercase();
        if q.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let mut results: Vec<String> = Vec::new();
        let push_all = |headwords: &[String], results: &mut Vec<String>| -> bool {
            for h in headwords {
                if !results.contains(h) {
                    results.push(h.clone());
                    if results.len() >= max_results {
                        return true;
                    }
                }
            }
            false
        };

        if let Some(headwords) = self.phrases.get(&q) {
            if push_all(headwords, &mut results) {
                return results;
            }
        }

        let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(&q))) else {
            return results;
        };
        for key in &self.ordered_keys {
            if key == &q || !pattern.is_match(key) {
                continue;
            }
            if push_all(&self.phrases[key], &mut results) {
                break;
            }
        }

        results
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
