//! Post-processing of raw machine-translation output.
//!
//! OPUS-MT style models asked for a short gloss tend to append
//! parentheticals, second sentences and comma-separated continuations.  The
//! pipeline below trims those deterministically.

/// Characters stripped from both ends after truncation.
const EDGE_PUNCTUATION: &[char] = &['.', '。', '!', '！', ','];

/// Clean a decoded hypothesis into a short gloss.
///
/// Steps, in order:
/// 1. drop everything from the first `(`;
/// 2. truncate at the first `.`, `!` or `;`;
/// 3. if a `,` remains and the text before it has at least two words, keep
///    only that prefix;
/// 4. trim whitespace and `.。!！,` from both ends.
///
/// ```
/// use hanzi_lookup::translate::clean_translation;
///
/// assert_eq!(clean_translation("quantum computing (QC). It is"), "quantum computing");
/// assert_eq!(clean_translation("good morning, everyone"), "good morning");
/// assert_eq!(clean_translation("hello, world"), "hello, world");
/// ```
pub fn clean_translation(raw: &str) -> String {
    let mut text = raw;

    if let Some(pos) = text.find('(') {
        text = &text[..pos];
    }

    if let Some(pos) = text.find(['.', '!', ';']) {
        text = &text[..pos];
    }

    if let Some(pos) = text.find(',') {
        let head = text[..pos].trim();
        if head.split_whitespace().count() >= 2 {
            text = head;
        }
    }

    text.trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCTUATION.contains(&c))
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_parenthetical_tail() {
        assert_eq!(clean_translation("bank (financial institution)"), "bank");
    }

    #[test]
    fn truncates_at_sentence_punctuation() {
        assert_eq!(clean_translation("to walk. He went home"), "to walk");
        assert_eq!(clean_translation("wow! amazing"), "wow");
        assert_eq!(clean_translation("industry; business"), "industry");
    }

    #[test]
    fn keeps_multiword_prefix_before_comma() {
        assert_eq!(
            clean_translation("machine learning, and also other things"),
            "machine learning"
        );
    }

    #[test]
    fn keeps_comma_when_prefix_is_one_word() {
        assert_eq!(clean_translation("yes, indeed"), "yes, indeed");
    }

    #[test]
    fn strips_edge_punctuation_and_whitespace() {
        assert_eq!(clean_translation("  ,hello world,  "), "hello world");
        assert_eq!(clean_translation("谢谢。"), "谢谢");
        assert_eq!(clean_translation("great！"), "great");
    }

    #[test]
    fn steps_apply_in_order() {
        // The parenthesis goes first, so its period never triggers step 2.
        assert_eq!(clean_translation("a b (c. d), e"), "a b");
    }

    #[test]
    fn empty_and_punctuation_only_inputs() {
        assert_eq!(clean_translation(""), "");
        assert_eq!(clean_translation("..."), "");
        assert_eq!(clean_translation("(only a note)"), "");
    }
}
