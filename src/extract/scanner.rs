//! Two-pass document scanner.
//!
//! The first pass discovers document-wide flags (morning procedure, split
//! dose). The second pass walks the lines in order, carrying the current prep
//! product forward and building one record per line. Both passes are plain
//! functions of their inputs; nothing is retained between documents.

use regex::Regex;
use std::sync::LazyLock;

use super::classify::Classifier;
use super::offset::extract_offset;
use super::record::{InstructionRecord, ProcedureTime};
use super::time::extract_time;
use crate::config::Config;

const FALLBACK_PREP: &str = "plenvu";

static DEFAULT_PRODUCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(plenvu|glycoprep|moviprep|picolax|picoprep|prepkit)\b").unwrap()
});

/// Document-wide flags found in the first pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub procedure_morning: bool,
    pub split_dose: bool,
}

/// First pass: both flags are sticky once any line sets them.
pub fn discover_flags<S: AsRef<str>>(lines: &[S]) -> Flags {
    let mut flags = Flags::default();

    for line in lines {
        let lower = line.as_ref().to_lowercase();
        if lower.contains("morning") && lower.contains("procedure") {
            flags.procedure_morning = true;
        }
        if lower.contains("split") {
            flags.split_dose = true;
        }
    }

    flags
}

/// Immutable scan configuration: classifier tables, product names and the
/// fallback prep. Cheap to clone and safe to share between requests.
#[derive(Debug, Clone)]
pub struct Scanner {
    classifier: Classifier,
    products: Option<Regex>,
    default_prep: String,
}

impl Scanner {
    pub fn new(
        classifier: Classifier,
        products: &[String],
        default_prep: &str,
    ) -> Result<Self, regex::Error> {
        let names: Vec<String> = products
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();

        let products = if names.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"(?i)\b({})\b", names.join("|")))?)
        };

        let default_prep = match default_prep.trim() {
            "" => {
                tracing::warn!("Empty default prep configured, using '{}'", FALLBACK_PREP);
                FALLBACK_PREP.to_string()
            }
            prep => prep.to_lowercase(),
        };

        Ok(Self {
            classifier,
            products,
            default_prep,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, regex::Error> {
        Self::new(
            Classifier::new(&config.keywords),
            &config.keywords.prep_products,
            &config.default_prep,
        )
    }

    /// Run both passes over normalized lines
    pub fn scan<S: AsRef<str>>(&self, lines: &[S]) -> Vec<InstructionRecord> {
        let flags = discover_flags(lines);
        tracing::debug!(
            "Document flags: procedure_morning={}, split_dose={}",
            flags.procedure_morning,
            flags.split_dose
        );
        self.assemble(lines, flags)
    }

    /// Second pass: one record per line, in order, numbered from 1.
    pub fn assemble<S: AsRef<str>>(&self, lines: &[S], flags: Flags) -> Vec<InstructionRecord> {
        let procedure_time = ProcedureTime::from_morning_flag(flags.procedure_morning);
        let mut current_prep: Option<String> = None;

        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let line = line.as_ref();
                if let Some(prep) = self.detect_prep(line) {
                    if current_prep.as_deref() != Some(prep.as_str()) {
                        tracing::debug!("Prep product switched to '{}' at line {}", prep, i + 1);
                    }
                    current_prep = Some(prep);
                }

                InstructionRecord {
                    bowelprep: current_prep
                        .clone()
                        .unwrap_or_else(|| self.default_prep.clone()),
                    order: i + 1,
                    category: self.classifier.classify(line),
                    message: line.to_string(),
                    offset: extract_offset(line),
                    time: extract_time(line),
                    split: flags.split_dose,
                    procedure_time,
                }
            })
            .collect()
    }

    /// A product name only counts on lines that also mention "prep".
    fn detect_prep(&self, line: &str) -> Option<String> {
        if !line.to_lowercase().contains("prep") {
            return None;
        }
        self.products
            .as_ref()?
            .find(line)
            .map(|m| m.as_str().to_lowercase())
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            classifier: Classifier::default(),
            products: Some(DEFAULT_PRODUCT_RE.clone()),
            default_prep: FALLBACK_PREP.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::classify::Category;
    use crate::extract::offset::UNKNOWN_OFFSET;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_discover_flags() {
        let flags = discover_flags(&["Procedure in the morning", "nothing"]);
        assert!(flags.procedure_morning);
        assert!(!flags.split_dose);

        let flags = discover_flags(&["Split dose regimen"]);
        assert!(!flags.procedure_morning);
        assert!(flags.split_dose);
    }

    #[test]
    fn test_morning_needs_both_words_on_one_line() {
        let flags = discover_flags(&["Morning appointment", "Procedure details"]);
        assert!(!flags.procedure_morning);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let input = lines(&[
            "Plenvu Prep Instructions",
            "Take first dose 2 days before procedure at 6pm",
            "Eat light breakfast",
            "Procedure in the morning, split dose required",
        ]);

        let records = Scanner::default().scan(&input);
        assert_eq!(records.len(), 4);

        let second = &records[1];
        assert_eq!(second.bowelprep, "plenvu");
        assert_eq!(second.order, 2);
        assert_eq!(second.category, Category::Bowelprep);
        assert_eq!(second.offset, -2);
        assert_eq!(second.time, Some(18.0));

        for record in &records[..2] {
            assert_eq!(record.procedure_time, ProcedureTime::Morning);
            assert!(record.split);
        }
        assert_eq!(records[2].category, Category::Diet);
        assert_eq!(records[2].offset, UNKNOWN_OFFSET);
        assert_eq!(records[2].time, None);
    }

    #[test]
    fn test_orders_are_contiguous() {
        let input = lines(&["a", "b", "c", "d", "e"]);
        let records = Scanner::default().scan(&input);
        let orders: Vec<usize> = records.iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
        assert!(records.iter().zip(&input).all(|(r, l)| &r.message == l));
    }

    #[test]
    fn test_empty_document() {
        assert!(Scanner::default().scan::<String>(&[]).is_empty());
    }

    #[test]
    fn test_flags_apply_to_every_record() {
        let input = lines(&["Line one", "Line two"]);
        let records = Scanner::default().scan(&input);
        assert!(records.iter().all(|r| !r.split));
        assert!(
            records
                .iter()
                .all(|r| r.procedure_time == ProcedureTime::Afternoon)
        );
    }

    #[test]
    fn test_sticky_prep_product() {
        let input = lines(&[
            "Before any product",
            "Moviprep preparation",
            "Drink clear fluids",
            "Picolax prep kit",
            "Stop eating",
        ]);
        let records = Scanner::default().scan(&input);
        let preps: Vec<&str> = records.iter().map(|r| r.bowelprep.as_str()).collect();
        assert_eq!(
            preps,
            vec!["plenvu", "moviprep", "moviprep", "picolax", "picolax"]
        );
    }

    #[test]
    fn test_product_without_prep_word_is_ignored() {
        let input = lines(&["Picolax sachets", "Glycoprep"]);
        let records = Scanner::default().scan(&input);
        // "Picolax sachets" lacks "prep"; "Glycoprep" contains it
        assert_eq!(records[0].bowelprep, "plenvu");
        assert_eq!(records[1].bowelprep, "glycoprep");
    }

    #[test]
    fn test_product_must_be_whole_word() {
        let input = lines(&["Prep: superplenvu kit"]);
        let records = Scanner::default().scan(&input);
        assert_eq!(records[0].bowelprep, "plenvu");

        let input = lines(&["Prep with MOVIPREP."]);
        let records = Scanner::default().scan(&input);
        assert_eq!(records[0].bowelprep, "moviprep");
    }

    #[test]
    fn test_assemble_uses_given_flags() {
        let input = lines(&["Nothing special"]);
        let flags = Flags {
            procedure_morning: true,
            split_dose: true,
        };
        let records = Scanner::default().assemble(&input, flags);
        assert_eq!(records[0].procedure_time, ProcedureTime::Morning);
        assert!(records[0].split);
    }

    #[test]
    fn test_from_config_custom_products_and_default() {
        let mut config = Config::default();
        config.default_prep = "ColonLYTELY".into();
        config.keywords.prep_products = vec!["colonlytely".into(), "fleet+".into()];

        let scanner = Scanner::from_config(&config).unwrap();
        let input = lines(&["Intro", "Prep using Moviprep", "ColonLytely prep"]);
        let records = scanner.scan(&input);
        assert_eq!(records[0].bowelprep, "colonlytely");
        // moviprep is not in the configured product list
        assert_eq!(records[1].bowelprep, "colonlytely");
        assert_eq!(records[2].bowelprep, "colonlytely");
    }

    #[test]
    fn test_empty_default_prep_falls_back() {
        let scanner = Scanner::new(Classifier::default(), &[], "  ").unwrap();
        let records = scanner.scan(&["Prep with plenvu"]);
        assert_eq!(records[0].bowelprep, "plenvu");
    }
}
