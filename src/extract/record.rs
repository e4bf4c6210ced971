use serde::{Deserialize, Serialize};
use std::fmt;

use super::classify::Category;

/// Column order of the output table
pub const COLUMNS: [&str; 8] = [
    "bowelprep",
    "order",
    "category",
    "message",
    "offset",
    "time",
    "split",
    "procedure_time",
];

/// Whether the procedure is scheduled in the morning or the afternoon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureTime {
    Morning,
    Afternoon,
}

impl ProcedureTime {
    pub fn from_morning_flag(morning: bool) -> Self {
        if morning {
            ProcedureTime::Morning
        } else {
            ProcedureTime::Afternoon
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureTime::Morning => "morning",
            ProcedureTime::Afternoon => "afternoon",
        }
    }
}

impl fmt::Display for ProcedureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row, built from a single document line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionRecord {
    pub bowelprep: String,
    pub order: usize,
    pub category: Category,
    pub message: String,
    pub offset: i32,
    pub time: Option<f64>,
    pub split: bool,
    pub procedure_time: ProcedureTime,
}
