use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, Write};

use crate::config::{Config, API_KEY_ENV};

/// Run the init command - interactively create a config file
pub fn run(force: bool) -> Result<()> {
    let config_path = Config::config_path()?;

    // Check if config already exists
    if config_path.exists() && !force {
        eprintln!(
            "{}: Config already exists at {}",
            "Error".red().bold(),
            config_path.display()
        );
        eprintln!();
        eprintln!("Use {} to overwrite.", "--force".cyan());
        bail!("Config file already exists");
    }

    println!("{}", "bookify configuration".bold());
    println!();
    println!(
        "This will create a config file at: {}",
        config_path.display().to_string().cyan()
    );
    println!();

    let defaults = Config::default();
    let bind = prompt(
        "Step 1: Choose a listen address",
        "The web app will be served on this address.",
        &defaults.server.bind,
    )?;
    let api_key = prompt(
        "Step 2: Catalog API key",
        &format!(
            "Leave empty to send unauthenticated requests, or set {} later.",
            API_KEY_ENV
        ),
        "",
    )?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let config_content = render_config(&bind, &api_key, &defaults);
    std::fs::write(&config_path, &config_content)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    println!();
    println!(
        "{} Config written to {}",
        "✓".green(),
        config_path.display()
    );
    println!();
    println!("You can now use:");
    println!("  {} - run the web app", "bookify serve".cyan());
    println!(
        "  {} - search the catalog from the terminal",
        "bookify search <query>".cyan()
    );

    Ok(())
}

fn prompt(heading: &str, help: &str, default: &str) -> Result<String> {
    println!("{}", heading.bold());
    println!();
    println!("{}", help);
    println!();

    if default.is_empty() {
        print!("Enter value: ");
    } else {
        print!("Enter value [{}]: ", default.green());
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    println!();
    Ok(if input.is_empty() {
        default.to_string()
    } else {
        input.to_string()
    })
}

fn render_config(bind: &str, api_key: &str, defaults: &Config) -> String {
    let key_line = if api_key.is_empty() {
        "# api_key = \"...\"".to_string()
    } else {
        format!("api_key = {}", toml::Value::String(api_key.to_string()))
    };

    format!(
        r#"# bookify configuration

[server]
bind = {bind}

[catalog]
base_url = {base_url}
{key_line}
max_results = {max_results}

[session]
idle_timeout_secs = {idle}
"#,
        bind = toml::Value::String(bind.to_string()),
        base_url = toml::Value::String(defaults.catalog.base_url.clone()),
        max_results = defaults.catalog.max_results,
        idle = defaults.session.idle_timeout_secs,
    )
}
