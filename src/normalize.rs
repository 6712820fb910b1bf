//! Comparison-stable forms of locator strings and file names.
//!
//! Locators typed by archivists (`SR 12.34`, `mi-5`) and file names produced by
//! digitization (`SR12_34-detail.tif`) disagree on case and punctuation. Every
//! function here is a pure string transform; none of the forms is privileged,
//! the resolver tries them in turn.

/// Lower-case and drop spaces, periods and hyphens.
pub fn loose(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// [`loose`] with underscores dropped as well, collapsing every punctuation variant.
pub fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Replace `from` with `to` wherever it sits between two ASCII digits.
///
/// Neighbours are read from the input, so `1_2_3` becomes `1.2.3`.
fn swap_digit_delimiter(s: &str, from: char, to: char) -> String {
    let chars = s.chars().collect::<Vec<_>>();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_digits = i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if c == from && between_digits { to } else { c }
        })
        .collect()
}

/// `MI12_3.tif` -> `MI12.3.tif`. Underscores between letters are left alone.
pub fn dot_for_underscore(s: &str) -> String {
    swap_digit_delimiter(s, '_', '.')
}

/// `SR1267.435` -> `SR1267_435`. Periods between letters are left alone.
pub fn underscore_for_dot(s: &str) -> String {
    swap_digit_delimiter(s, '.', '_')
}

/// Final path component, accepting both separators since exiftool output may
/// come from either platform.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Everything before the last period, or the whole name when there is none.
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}

/// Canonical prefix used for compound sibling detection: whitespace removed,
/// digit-separating periods turned into underscores, lower-cased.
pub fn sibling_prefix(locator: &str) -> String {
    let squeezed = locator
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    underscore_for_dot(&squeezed).to_lowercase()
}
