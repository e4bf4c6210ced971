use anyhow::Result;
use console::{Emoji, style};
use std::path::Path;

use crate::config::Config;

static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub fn run(config_path: Option<&Path>, force: bool) -> Result<()> {
    println!();
    println!("{}", style(" prepcsv - Initialization ").bold().reverse());
    println!();

    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };

    // Check if config already exists
    if config_path.exists() && !force {
        println!(
            "{}Configuration already exists at {}",
            WARN,
            style(config_path.display()).cyan()
        );
        println!("  Use {} to overwrite", style("--force").yellow());
        return Ok(());
    }

    println!("{}Writing default configuration...", GEAR);
    Config::default().save(&config_path)?;

    println!(
        "{}Configuration written to {}",
        CHECK,
        style(config_path.display()).cyan()
    );
    println!();
    println!("  Edit {} to adjust keyword lists,", style("[keywords]").yellow());
    println!("  and {} for the upload service.", style("[server]").yellow());
    println!();

    Ok(())
}
