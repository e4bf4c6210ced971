use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::KeywordsConfig;

/// Instruction category assigned to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Medication,
    Bowelprep,
    Diet,
    Procedure,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medication => "medication",
            Category::Bowelprep => "bowelprep",
            Category::Diet => "diet",
            Category::Procedure => "procedure",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword classifier.
///
/// Rules are checked in priority order and the first category with a keyword
/// contained in the lowercased line wins. Containment is plain substring
/// matching, so "eat" also fires inside "heater". Lines matching nothing fall
/// back to [`Category::Procedure`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(Category, Vec<String>)>,
}

impl Classifier {
    pub fn new(keywords: &KeywordsConfig) -> Self {
        let lower = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };

        Self {
            rules: vec![
                (Category::Medication, lower(&keywords.medication)),
                (Category::Bowelprep, lower(&keywords.bowelprep)),
                (Category::Diet, lower(&keywords.diet)),
                (Category::Procedure, lower(&keywords.procedure)),
            ],
        }
    }

    pub fn classify(&self, line: &str) -> Category {
        let lower = line.to_lowercase();

        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Procedure)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&KeywordsConfig::default())
    }
}
