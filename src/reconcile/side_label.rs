//! Human-readable side/tape labels for the children of a compound audio object.

use tracing::trace;

use crate::normalize;

/// Known endings, longest first so `Tape10` is not read as `Tape1`.
const KNOWN_SUFFIXES: &[&str] = &[
    "Tape10", "SideA", "SideB", "Side1", "Side2", "Tape1", "Tape2", "Tape3", "Tape4", "Tape5",
    "Tape6", "Tape7", "Tape8", "Tape9",
];

/// `<prefix><delim><middle><delim>Side<token>` with the prefix matched case-insensitively.
///
/// The token is one letter or a number, and ends at a delimiter or the end
/// of the name, so `Sidewalk` is not a side.
fn side_segment(prefix: &str, stem: &str) -> Option<String> {
    let pattern = format!(
        r"(?i)^{}[-_].+?[-_](Side(?:[A-Za-z]|[0-9]+))(?:[-_ ]|$)",
        regex::escape(prefix)
    );
    let pattern = regex::Regex::new(&pattern).ok()?;
    let captures = pattern.captures(stem)?;
    Some(captures[1].to_owned())
}

/// A known ending that is the whole stem or follows a delimiter.
fn known_suffix(stem: &str) -> Option<&'static str> {
    let lower = stem.to_lowercase();
    KNOWN_SUFFIXES
        .iter()
        .find(|suffix| {
            lower
                .strip_suffix(&suffix.to_lowercase())
                .is_some_and(|head| head.is_empty() || head.ends_with(['-', '_', ' ']))
        })
        .copied()
}

/// Whatever follows the prefix, with leading delimiters removed; may be empty.
fn remainder<'s>(prefix: &str, stem: &'s str) -> &'s str {
    let rest = match stem.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &stem[prefix.len()..],
        _ => stem,
    };
    rest.trim_start_matches(['-', '_', ' '])
}

/// Label for one compound audio child, e.g. `SideA` or `Tape2`.
///
/// `prefix` is the record's normalized locator; the file name may spell its
/// digit separators either way.
pub fn extract(file_name: &str, prefix: &str) -> String {
    let file_name = normalize::underscore_for_dot(file_name);
    let stem = normalize::strip_extension(&file_name);
    let label = side_segment(prefix, stem)
        .or_else(|| known_suffix(stem).map(str::to_owned))
        .unwrap_or_else(|| remainder(prefix, stem).to_owned());
    trace!(file = %file_name, label = %label, "side label");
    label
}

#[cfg(test)]
mod tests {
    use super::extract;

    #[test]
    fn side_segment_after_middle() {
        assert_eq!(
            extract(
                "SR1267_435-PhilBrown-CFRCReminiscences1-SideA.mp3",
                "SR1267_435"
            ),
            "SideA"
        );
        assert_eq!(
            extract("SR1267.435-PhilBrown-sideB.mp3", "sr1267_435"),
            "sideB"
        );
    }

    #[test]
    fn known_suffix_fallback() {
        assert_eq!(extract("SR9-Tape10.wav", "sr9"), "Tape10");
        assert_eq!(extract("SR9_tape2.wav", "sr9"), "Tape2");
        assert_eq!(extract("SR9-SideB.wav", "sr9"), "SideB");
    }

    #[test]
    fn side_words_need_delimiters() {
        assert_eq!(extract("SR9-Walk-Sidewalk.mp3", "sr9"), "Walk-Sidewalk");
        assert_eq!(extract("SR9-Phil-SideA-copy.mp3", "sr9"), "SideA");
        assert_eq!(extract("SR9-Phil-Side12.mp3", "sr9"), "Side12");
        assert_eq!(extract("SR9-OutsideA.mp3", "sr9"), "OutsideA");
        assert_eq!(extract("SR9-Retape2.mp3", "sr9"), "Retape2");
    }

    #[test]
    fn remainder_fallback() {
        assert_eq!(extract("SR9-interview-part3.mp3", "sr9"), "interview-part3");
        assert_eq!(extract("SR9-.mp3", "sr9"), "");
        assert_eq!(extract("other.mp3", "sr9"), "other");
    }
}
