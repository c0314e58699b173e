//! CC-CEDICT line parser.
//!
//! Line format:
//!
//! ```text
//! TRADITIONAL SIMPLIFIED [ROMANIZATION] /definition 1/definition 2/.../
//! ```
//!
//! [`parse_line`] never fails loudly: comment lines, blank lines and malformed
//! lines all yield `None` so one bad line never aborts a dictionary load.

use crate::lexicon::entry::{Classifier, LexiconEntry};

/// Prefix of a definition fragment that carries measure words instead of a gloss.
const CLASSIFIER_PREFIX: &str = "CL:";

/// Parse a single lexicon line.
///
/// Returns `None` for comments (`#`, `%`), blank lines and anything that does
/// not match the expected layout.
///
/// ```
/// use hanzi_lookup::lexicon::parse_line;
///
/// let e = parse_line("銀行 银行 [yin2 hang2] /bank/CL:家[jia1],個|个[ge4]/").unwrap();
/// assert_eq!(e.headword_simplified, "银行");
/// assert_eq!(e.definitions, vec!["bank"]);
/// assert_eq!(e.classifier.unwrap().len(), 2);
/// ```
pub fn parse_line(raw: &str) -> Option<LexiconEntry> {
    let line = raw.trim_end_matches(['\r', '\n']);
    if line.starts_with('#') || line.starts_with('%') || line.trim().is_empty() {
        return None;
    }

    let bracket_start = line.find('[')?;
    let bracket_end = bracket_start + line[bracket_start..].find(']')?;

    let mut forms = line[..bracket_start].split_whitespace();
    let traditional = forms.next()?;
    let simplified = forms.next()?;

    let romanization = normalize_romanization(line[bracket_start + 1..bracket_end].trim());

    let mut definitions: Vec<String> = Vec::new();
    let mut classifiers: Vec<Classifier> = Vec::new();

    for fragment in line[bracket_end + 1..].split('/') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        if let Some(spec) = fragment.strip_prefix(CLASSIFIER_PREFIX) {
            classifiers.extend(parse_classifiers(spec));
            continue;
        }
        if !definitions.iter().any(|d| d == fragment) {
            definitions.push(fragment.to_string());
        }
    }

    let mut entry = LexiconEntry::new(traditional, simplified, romanization, definitions);
    if !classifiers.is_empty() {
        entry.classifier = Some(classifiers);
    }
    Some(entry)
}

/// Parse the body of a `CL:` fragment, e.g. `個|个[ge4],隻|只[zhi1]`.
///
/// Groups without a bracketed reading are dropped.
fn parse_classifiers(spec: &str) -> Vec<Classifier> {
    spec.split(',')
        .filter_map(|group| {
            let group = group.trim();
            let open = group.find('[')?;
            let close = open + group[open..].find(']')?;

            let mut forms = group[..open].split('|').map(str::trim);
            let traditional = forms.next().filter(|f| !f.is_empty())?;
            let simplified = forms.next().filter(|f| !f.is_empty()).unwrap_or(traditional);

            Some(Classifier {
                traditional: traditional.to_string(),
                simplified: simplified.to_string(),
                romanization: normalize_romanization(group[open + 1..close].trim()),
            })
        })
        .collect()
}

/// Drop the neutral-tone marker (`5`) from every syllable where it directly
/// follows a Latin letter: `"shen2 me5"` → `"shen2 me"`.
pub fn normalize_romanization(reading: &str) -> String {
    reading
        .split_whitespace()
        .map(|syllable| {
            let mut chars = syllable.chars().rev();
            match (chars.next(), chars.next()) {
                (Some('5'), Some(prev)) if prev.is_ascii_alphabetic() => {
                    &syllable[..syllable.len() - 1]
                }
                _ => syllable,
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
