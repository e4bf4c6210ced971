use anyhow::{Context, Result};
use console::{Emoji, style};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::extract::{Category, InstructionRecord, Scanner};
use crate::pipeline;

static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

pub fn run(config_path: Option<&Path>, path: PathBuf) -> Result<()> {
    println!();
    println!("{}", style(" prepcsv - Inspect ").bold().reverse());
    println!();

    let config = Config::load(config_path)?;
    let scanner = Scanner::from_config(&config).context("Invalid prep product list in config")?;

    println!("{}Source: {}", PAPER, style(path.display()).cyan());

    let records = pipeline::extract_records(&path, &scanner)
        .with_context(|| format!("Failed to process {}", path.display()))?;

    let Some(first) = records.first() else {
        println!("{}", style("No instruction lines found").yellow());
        println!();
        return Ok(());
    };

    println!(
        "{}{} lines, split dose: {}, procedure: {}",
        CHART,
        style(records.len()).green().bold(),
        style(first.split).cyan(),
        style(first.procedure_time).cyan()
    );
    println!();

    println!(
        "  {:>4}  {:<10}  {:<10}  {:>6}  {:>6}  {}",
        style("#").dim(),
        style("prep").dim(),
        style("category").dim(),
        style("offset").dim(),
        style("time").dim(),
        style("message").dim()
    );
    for record in &records {
        print_row(record);
    }
    println!();

    Ok(())
}

fn print_row(record: &InstructionRecord) {
    let category = match record.category {
        Category::Medication => style(record.category.as_str()).red(),
        Category::Bowelprep => style(record.category.as_str()).magenta(),
        Category::Diet => style(record.category.as_str()).green(),
        Category::Procedure => style(record.category.as_str()).blue(),
    };
    let time = record
        .time
        .map(|t| format!("{:.2}", t))
        .unwrap_or_else(|| "-".to_string());

    println!(
        "  {:>4}  {:<10}  {:<10}  {:>6}  {:>6}  {}",
        record.order, record.bowelprep, category, record.offset, time, record.message
    );
}
