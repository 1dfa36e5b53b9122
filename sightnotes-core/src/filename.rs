//! Human-readable labels for session filenames.
//!
//! The capture process names files `<Topic>_<YYYY-MM-DD>_<HH-MM-SS>.md`, e.g.
//! `NeuralNetworks_2026-02-28_20-05-38.md`. Decoding never fails: anything
//! that does not fit the pattern is shown as its bare name.

use time::macros::format_description;
use time::Date;

/// Topic and date extracted from a session filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFilename {
    pub topic: String,
    /// Short US-style date ("Feb 28, 2026"), or empty when the name has none.
    pub date: String,
}

const DATE_LEN: usize = "YYYY-MM-DD".len();

/// Decodes `name` into a display topic and date.
pub fn decode_filename(name: &str) -> DecodedFilename {
    let stem = strip_extension(name);
    match split_topic_and_date(stem) {
        Some((topic, date)) => DecodedFilename { topic: humanize_topic(topic), date: format_short_date(date) },
        None => DecodedFilename { topic: stem.to_owned(), date: String::new() },
    }
}

/// Inserts a space before every uppercase letter that does not already
/// follow whitespace, then trims: `NeuralNetworks` → `Neural Networks`.
pub fn humanize_topic(topic: &str) -> String {
    let mut out = String::with_capacity(topic.len() + 8);
    let mut prev: Option<char> = None;
    for c in topic.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| !p.is_whitespace()) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out.trim().to_owned()
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// Finds the first `YYYY-MM-DD_` run that is a real calendar date and has a
/// non-empty topic before it and a time suffix after it.
fn split_topic_and_date(stem: &str) -> Option<(&str, Date)> {
    let bytes = stem.as_bytes();
    for start in 0..bytes.len().saturating_sub(DATE_LEN) {
        let end = start + DATE_LEN;
        if !looks_like_date(&bytes[start..end]) || bytes[end] != b'_' || end + 1 >= bytes.len() {
            continue;
        }
        // looks_like_date only accepts ASCII, so both slice bounds are char boundaries.
        let topic = stem[..start].trim_end_matches(['_', '-', ' ']);
        if topic.is_empty() {
            return None;
        }
        let date = Date::parse(&stem[start..end], format_description!("[year]-[month]-[day]")).ok()?;
        return Some((topic, date));
    }
    None
}

fn looks_like_date(b: &[u8]) -> bool {
    b.len() == DATE_LEN
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

fn format_short_date(date: Date) -> String {
    date.format(format_description!("[month repr:short] [day padding:none], [year]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_capture_filenames() {
        let d = decode_filename("NeuralNetworks_2026-02-28_20-05-38.md");
        assert_eq!(d.topic, "Neural Networks");
        assert_eq!(d.date, "Feb 28, 2026");
    }

    #[test]
    fn topic_may_touch_the_date_directly() {
        let d = decode_filename("OperatingSystems2025-11-03_09-00-00.md");
        assert_eq!(d.topic, "Operating Systems");
        assert_eq!(d.date, "Nov 3, 2025");
    }

    #[test]
    fn non_matching_names_fall_back_to_the_stem() {
        assert_eq!(
            decode_filename("raw_notes.md"),
            DecodedFilename { topic: "raw_notes".into(), date: String::new() }
        );
        assert_eq!(decode_filename("2026-02-28_20-05-38.md").date, "");
        assert_eq!(decode_filename("Bad_2026-13-45_10-00-00.md").topic, "Bad_2026-13-45_10-00-00");
        assert_eq!(decode_filename("NoSuffix_2026-02-28.md").topic, "NoSuffix_2026-02-28");
    }

    #[test]
    fn any_string_is_accepted() {
        for name in ["", ".", ".md", "é", "日本語_2026-02-28_x", "A_0000-00-00_"] {
            let _ = decode_filename(name);
        }
        assert_eq!(decode_filename(".hidden").topic, ".hidden");
    }

    #[test]
    fn humanize_does_not_double_spaces() {
        assert_eq!(humanize_topic("Deep Learning"), "Deep Learning");
        assert_eq!(humanize_topic("AIBasics"), "A I Basics");
    }
}
