use regex::Regex;
use std::sync::LazyLock;

/// Offset reported when a line carries no day information
pub const UNKNOWN_OFFSET: i32 = -1;

static DAYS_BEFORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*days?\s*(?:before|prior)").unwrap());
static DAY_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)day\s*([-+]?\d+)").unwrap());
static DAYS_AHEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*days?\s*ahead").unwrap());

#[derive(Clone, Copy)]
enum Sign {
    /// Positive counts become negative, zero and negatives pass through
    Before,
    AsWritten,
}

/// Day offset relative to the procedure: 0 is procedure day, negative is
/// before it, and [`UNKNOWN_OFFSET`] when nothing matches.
pub fn extract_offset(line: &str) -> i32 {
    let patterns: [(&Regex, Sign); 3] = [
        (&*DAYS_BEFORE_RE, Sign::Before),
        (&*DAY_NUMBER_RE, Sign::AsWritten),
        (&*DAYS_AHEAD_RE, Sign::Before),
    ];

    for (pattern, sign) in patterns {
        let Some(caps) = pattern.captures(line) else {
            continue;
        };

        let token = &caps[1];
        return match token.parse::<i32>() {
            Ok(days) => match sign {
                Sign::Before if days > 0 => -days,
                _ => days,
            },
            Err(e) => {
                tracing::warn!("Unparseable day count '{}' in '{}': {}", token, line, e);
                UNKNOWN_OFFSET
            }
        };
    }

    let lower = line.to_lowercase();
    if lower.contains("day of procedure") || lower.contains("day of colonoscopy") {
        return 0;
    }

    UNKNOWN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_before() {
        assert_eq!(extract_offset("3 days before procedure"), -3);
        assert_eq!(extract_offset("Stop iron 7 days prior to your colonoscopy"), -7);
        assert_eq!(extract_offset("1 DAY BEFORE"), -1);
        assert_eq!(extract_offset("2days before"), -2);
    }

    #[test]
    fn test_zero_days_before_stays_zero() {
        assert_eq!(extract_offset("0 days before"), 0);
    }

    #[test]
    fn test_day_number_keeps_sign() {
        assert_eq!(extract_offset("day -2"), -2);
        assert_eq!(extract_offset("Day 1: low fibre diet"), 1);
        assert_eq!(extract_offset("Day +3"), 3);
        assert_eq!(extract_offset("DAY-4"), -4);
    }

    #[test]
    fn test_days_ahead() {
        assert_eq!(extract_offset("Buy your kit 5 days ahead"), -5);
    }

    #[test]
    fn test_before_pattern_wins_over_day_number() {
        assert_eq!(extract_offset("2 days before, see day 1"), -2);
    }

    #[test]
    fn test_day_of_procedure() {
        assert_eq!(extract_offset("On the day of procedure"), 0);
        assert_eq!(extract_offset("Day of Colonoscopy"), 0);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(extract_offset("Eat light breakfast"), UNKNOWN_OFFSET);
        assert_eq!(extract_offset(""), UNKNOWN_OFFSET);
    }

    #[test]
    fn test_overflow_falls_back_to_unknown() {
        assert_eq!(extract_offset("99999999999 days before"), UNKNOWN_OFFSET);
    }
}
