//! Han script detection and per-character romanization.

use crate::lexicon::LexiconIndex;

/// CJK Unified Ideographs block.
pub fn is_han(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// `true` if `text` contains at least one Han character.
pub fn contains_han(text: &str) -> bool {
    text.chars().any(is_han)
}

/// Build a reading for `text` one character at a time.
///
/// Each Han character contributes the first syllable of its preferred
/// lexicon reading, or the character itself when the lexicon has no entry.
/// Runs of other non-whitespace characters are kept verbatim as one token.
///
/// ```
/// use hanzi_lookup::lexicon::{LexiconEntry, LexiconIndex};
/// use hanzi_lookup::lookup::romanize;
///
/// let mut idx = LexiconIndex::new();
/// idx.index(LexiconEntry::new("你", "你", "ni3", vec!["you".into()]));
/// idx.build_frequency_table();
///
/// assert_eq!(romanize(&idx, "你AI猫"), "ni3 AI 猫");
/// ```
pub fn romanize(index: &LexiconIndex, text: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();
    let mut run = String::new();

    for c in text.chars() {
        if is_han(c) {
            if !run.is_empty() {
                tokens.push(std::mem::take(&mut run));
            }
            let syllable = index
                .reading_of(c)
                .and_then(|r| r.split_whitespace().next().map(str::to_string))
                .unwrap_or_else(|| c.to_string());
            tokens.push(syllable);
        } else if c.is_whitespace() {
            if !run.is_empty() {
                tokens.push(std::mem::take(&mut run));
            }
        } else {
            run.push(c);
        }
    }
    if !run.is_empty() {
        tokens.push(run);
    }

    tokens.join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconEntry;

    #[test]
    fn detects_han_characters() {
        assert!(contains_han("你好"));
        assert!(contains_han("hello 世界"));
        assert!(!contains_han("hello"));
        assert!(!contains_han(""));
        assert!(!contains_han("こんにちは"));
        assert!(!contains_han("123 !?"));
    }

    #[test]
    fn block_boundaries() {
        assert!(is_han('\u{4e00}'));
        assert!(is_han('\u{9fff}'));
        assert!(!is_han('\u{4dff}'));
        assert!(!is_han('\u{a000}'));
    }

    #[test]
    fn romanizes_with_preferred_reading() {
        let mut idx = LexiconIndex::new();
        idx.index(LexiconEntry::new("行", "行", "xing2", vec!["to walk".into()]));
        idx.index(LexiconEntry::new("行", "行", "hang2", vec!["row".into()]));
        idx.index(LexiconEntry::new("行人", "行人", "xing2 ren2", vec!["pedestrian".into()]));
        idx.index(LexiconEntry::new("人", "人", "ren2", vec!["person".into()]));
        idx.build_frequency_table();

        assert_eq!(romanize(&idx, "人行"), "ren2 xing2");
    }

    #[test]
    fn unknown_characters_are_kept() {
        let idx = LexiconIndex::new();
        assert_eq!(romanize(&idx, "猫 cat"), "猫 cat");
        assert_eq!(romanize(&idx, ""), "");
    }
}
