use regex::{Captures, Regex};
use std::sync::LazyLock;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})(?::(\d{2}))?\s*(am|pm)?").unwrap());

/// Time of day as a fractional hour (`7:30am` is `7.5`).
///
/// The first token carrying minutes or an am/pm suffix wins; otherwise the
/// first bare number is read as an hour. Unsuffixed hours are returned as
/// written, without range checks.
pub fn extract_time(line: &str) -> Option<f64> {
    let mut bare: Option<Captures<'_>> = None;

    for caps in TIME_RE.captures_iter(line) {
        if caps.get(2).is_some() || caps.get(3).is_some() {
            return to_hours(&caps, line);
        }
        if bare.is_none() {
            bare = Some(caps);
        }
    }

    bare.and_then(|caps| to_hours(&caps, line))
}

fn to_hours(caps: &Captures<'_>, line: &str) -> Option<f64> {
    let mut hours: u32 = match caps[1].parse() {
        Ok(h) => h,
        Err(e) => {
            tracing::warn!("Unparseable hour '{}' in '{}': {}", &caps[1], line, e);
            return None;
        }
    };

    let minutes: u32 = match caps.get(2) {
        Some(m) => match m.as_str().parse() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Unparseable minutes '{}' in '{}': {}", m.as_str(), line, e);
                return None;
            }
        },
        None => 0,
    };

    match caps.get(3).map(|p| p.as_str().to_lowercase()).as_deref() {
        Some("pm") if hours != 12 => hours += 12,
        Some("am") if hours == 12 => hours = 0,
        _ => {}
    }

    Some(f64::from(hours) + f64::from(minutes) / 60.0)
}
