//! Line-level extraction of prep instructions from document text.

mod classify;
mod normalize;
mod offset;
mod record;
mod scanner;
mod time;

pub use classify::Category;
pub use normalize::normalize_lines;
pub use record::{COLUMNS, InstructionRecord, ProcedureTime};
pub use scanner::Scanner;
