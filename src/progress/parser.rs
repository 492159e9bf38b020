//! Parser for wget's dot-style progress lines.
//!
//! A line such as
//!
//! ```text
//!   1450K .......... .......... .......... .......... ..........  8% 1.23M 12s
//! ```
//!
//! is normalised by turning every run of whitespace, `.`, `,` or `=` into a
//! single delimiter. Decimal numbers are thereby split into two fields, so
//! the field count depends on which values carried a fraction:
//!
//! | fields | layout |
//! |---|---|
//! | 4 | downloaded, percent, speed, eta |
//! | 5 | downloaded, percent, speed (int, frac), eta, if field 3 is all digits |
//! | 5 | downloaded, percent, speed, eta (int, frac), otherwise |
//! | 6 | downloaded, percent, speed (int, frac), eta (int, frac) |
//! | 7 | the 6-field layout with one trailing field ignored |
//!
//! Any other count goes through a best-effort fallback anchored on the
//! percent field. Parsing never fails.

use super::event::ProgressEvent;

const DELIMITER: char = '|';

/// Parse one output line known to contain a `%`.
pub fn parse_line(line: &str) -> ProgressEvent {
    let normalized = normalize(line);
    let fields: Vec<&str> = normalized.split(DELIMITER).collect();
    map_fields(&fields)
}

/// Collapse separators into single [`DELIMITER`]s and trim them off the ends.
pub fn normalize(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending = false;

    for c in line.chars() {
        if c.is_whitespace() || matches!(c, '.' | ',' | '=' | DELIMITER) {
            pending = true;
            continue;
        }
        if pending && !out.is_empty() {
            out.push(DELIMITER);
        }
        pending = false;
        out.push(c);
    }

    out
}

fn map_fields(fields: &[&str]) -> ProgressEvent {
    let percent_at_one = fields.get(1).is_some_and(|f| f.contains('%'));

    match (fields.len(), percent_at_one) {
        (4, true) => event(fields[0], fields[1], fields[2].into(), fields[3].into()),
        (5, true) if is_digits(fields[2]) => event(
            fields[0],
            fields[1],
            join(fields[2], fields[3]),
            fields[4].into(),
        ),
        (5, true) => event(
            fields[0],
            fields[1],
            fields[2].into(),
            join(fields[3], fields[4]),
        ),
        (6, true) | (7, true) => event(
            fields[0],
            fields[1],
            join(fields[2], fields[3]),
            join(fields[4], fields[5]),
        ),
        _ => fallback(fields),
    }
}

fn fallback(fields: &[&str]) -> ProgressEvent {
    let Some(at) = fields.iter().position(|f| f.contains('%')) else {
        return ProgressEvent::default();
    };

    let downloaded = at.checked_sub(1).map(|i| fields[i]).unwrap_or_default();
    let speed = fields.get(at + 1).copied().unwrap_or_default();
    let time_left = if fields.len() > at + 2 {
        fields[fields.len() - 1]
    } else {
        ""
    };

    event(downloaded, fields[at], speed.into(), time_left.into())
}

fn event(downloaded: &str, percent: &str, speed: String, time_left: String) -> ProgressEvent {
    ProgressEvent {
        downloaded: downloaded.to_string(),
        percent: parse_percent(percent),
        speed,
        time_left,
    }
}

/// Leading digits of a field, clamped to 100. Anything unparsable is 0.
pub fn parse_percent(field: &str) -> u8 {
    let digits: String = field
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits
        .parse::<u32>()
        .map(|p| p.min(100) as u8)
        .unwrap_or(if digits.is_empty() { 0 } else { 100 })
}

fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_digit())
}

fn join(int: &str, frac: &str) -> String {
    format!("{}.{}", int, frac)
}
