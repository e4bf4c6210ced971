use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PAGE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*page\s+\d+\s*$").unwrap());

/// Split extracted document text into cleaned, non-empty lines.
///
/// Page-number lines ("Page 3") are dropped. Order is preserved.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_line)
        .filter(|line| !line.is_empty() && !is_page_number(line))
        .collect()
}

/// Replace non-printable characters with spaces, collapse whitespace runs
/// and trim.
///
/// Replacement happens before collapsing so that the result is stable under
/// a second application.
pub fn clean_line(line: &str) -> String {
    let printable: String = line
        .chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { ' ' })
        .collect();

    WHITESPACE_RE.replace_all(&printable, " ").trim().to_string()
}

fn is_page_number(line: &str) -> bool {
    PAGE_NUMBER_RE.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_line_collapses_whitespace() {
        assert_eq!(clean_line("  Take   the\tfirst  dose  "), "Take the first dose");
    }

    #[test]
    fn test_clean_line_replaces_non_printable() {
        assert_eq!(clean_line("Drink\u{00a0}clear\u{2013}fluids"), "Drink clear fluids");
        assert_eq!(clean_line("\u{feff}Plenvu\u{0}"), "Plenvu");
    }

    #[test]
    fn test_clean_line_is_idempotent() {
        let inputs = [
            "  a \u{0} \u{0} b ",
            "Day\u{2009}\u{2009}1",
            "already clean",
            "\t\t",
        ];
        for input in inputs {
            let once = clean_line(input);
            assert_eq!(clean_line(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_normalize_drops_empty_and_page_lines() {
        let text = "Plenvu Prep\n\n   \nPage 2\n  page 13  \nEat light breakfast\nPAGE 4\n";
        assert_eq!(
            normalize_lines(text),
            vec!["Plenvu Prep", "Eat light breakfast"]
        );
    }

    #[test]
    fn test_normalize_keeps_lines_mentioning_pages() {
        let text = "See page 2 for details\nPage two";
        assert_eq!(
            normalize_lines(text),
            vec!["See page 2 for details", "Page two"]
        );
    }

    #[test]
    fn test_normalize_handles_crlf() {
        assert_eq!(normalize_lines("one\r\ntwo\r\n"), vec!["one", "two"]);
    }

    #[test]
    fn test_normalize_twice_is_stable() {
        let text = "  Day 1 \u{2022} Low fibre diet \n\nPage 1\nStop iron  tablets";
        let once = normalize_lines(text);
        let twice = normalize_lines(&once.join("\n"));
        assert_eq!(once, twice);
    }
}
