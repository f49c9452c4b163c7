//! Serve command - run the web app

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::web;

pub async fn run(bind: Option<&str>, config_path: Option<&Path>, quiet: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let bind = config.bind(bind);

    if !quiet {
        println!("{}", "bookify".bold());
        println!("  Catalog: {}", config.catalog.base_url.cyan());
        if config.catalog.api_key.is_none() {
            println!(
                "  {}: no API key configured, catalog requests are unauthenticated",
                "Note".yellow()
            );
        }
        println!("  Open {} in your browser", format!("http://{}", bind).green());
        println!();
    }

    web::serve(&config, &bind).await
}
