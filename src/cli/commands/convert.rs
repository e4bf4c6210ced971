use anyhow::{Context, Result};
use console::{Emoji, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::ExportFormat;
use crate::config::Config;
use crate::extract::Scanner;
use crate::pipeline;

static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[X] ");
static FILE: Emoji<'_, '_> = Emoji("📁 ", "");

/// A failed conversion is logged and reported, not returned as an error.
pub fn run(
    config_path: Option<&Path>,
    path: PathBuf,
    output: Option<PathBuf>,
    format: ExportFormat,
) -> Result<()> {
    println!();
    println!("{}", style(" prepcsv - Convert ").bold().reverse());
    println!();

    let config = Config::load(config_path)?;
    let scanner = Scanner::from_config(&config).context("Invalid prep product list in config")?;
    let output = output.unwrap_or_else(|| PathBuf::from(&config.output_file));

    println!("{}Source: {}", PAPER, style(path.display()).cyan());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&format!("{}{{spinner:.green}} {{msg}}", FILE))
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Extracting instructions...");

    let outcome = pipeline::process_file(&path, &output, format, &scanner);

    spinner.finish_and_clear();

    if outcome.success {
        println!(
            "{}{} ({} rows)",
            CHECK,
            outcome.message,
            style(outcome.records).green().bold()
        );
        println!();
        println!(
            "  {} {}",
            style("→").dim(),
            style(output.display()).cyan().underlined()
        );
    } else {
        println!("{}{}", CROSS, style(&outcome.message).red());
    }
    println!();

    Ok(())
}
