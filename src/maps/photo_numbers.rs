//! Photo-number lists such as `3,5-7,9`.

/// Widest range expanded; wider ones are kept as their two endpoints.
const MAX_RANGE_SPAN: u64 = 10_000;

/// Expand a comma-separated list, turning ascending `a-b` ranges into every
/// number in between.
///
/// A descending range, or one spanning more than [`MAX_RANGE_SPAN`] numbers,
/// yields its two endpoints unexpanded; anything else
/// containing `-` is kept as written. Empty entries are dropped.
pub fn parse(field: &str) -> Vec<String> {
    let mut numbers = Vec::new();
    for part in field.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        if !part.contains('-') {
            numbers.push(part.to_owned());
            continue;
        }
        let bounds = part.split('-').map(str::trim).collect::<Vec<_>>();
        let [start, end] = bounds[..] else {
            numbers.push(part.to_owned());
            continue;
        };
        match (parse_digits(start), parse_digits(end)) {
            (Some(first), Some(last)) if first <= last && last - first < MAX_RANGE_SPAN => {
                numbers.extend((first..=last).map(|n| n.to_string()));
            }
            (Some(_), Some(_)) => {
                numbers.push(start.to_owned());
                numbers.push(end.to_owned());
            }
            _ => numbers.push(part.to_owned()),
        }
    }
    numbers
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Zero-pad a numeric photo number to three digits; other text is returned unchanged.
pub fn pad(number: &str) -> String {
    match number.trim().parse::<u64>() {
        Ok(n) => format!("{n:03}"),
        Err(_) => number.to_owned(),
    }
}
