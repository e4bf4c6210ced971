use anyhow::Result;
use console::{Emoji, style};
use std::path::Path;

use crate::config::Config;
use crate::server;

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");

pub async fn run(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    println!();
    println!("{}", style(" prepcsv - Upload Service ").bold().reverse());
    println!();
    println!(
        "{}Starting upload service at {}",
        ROCKET,
        style(format!("http://localhost:{}", config.server.port))
            .cyan()
            .underlined()
    );
    println!();

    server::run(&config).await
}
