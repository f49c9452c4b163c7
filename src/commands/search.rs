//! Search command - query the catalog from the terminal

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::reading_list::Book;

/// Longest description shown in terminal output, in characters
const DESCRIPTION_PREVIEW: usize = 160;

/// Run the search command
pub async fn run(
    query: &str,
    limit: Option<u32>,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Please provide a search query");
    }

    let config = Config::load(config_path)?;
    let mut client = CatalogClient::new(&config.catalog)?;
    if let Some(limit) = limit {
        client = client.with_max_results(limit);
    }

    let books = client
        .search(query)
        .await
        .with_context(|| format!("Search for {:?} failed", query))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    print_results(&books);
    Ok(())
}

fn print_results(books: &[Book]) {
    println!();
    println!("Found {} result(s):", books.len());
    println!();

    for book in books {
        println!("{}", book.title.bold());
        println!("  by {}", book.author.cyan());
        println!("  {}", preview(&book.description, DESCRIPTION_PREVIEW).dimmed());
        if !book.thumbnail.is_empty() {
            println!("  {}", book.thumbnail.dimmed());
        }
        println!();
    }
}

/// Truncate `text` to at most `max` characters, marking the cut with "..."
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("A short blurb", 160), "A short blurb");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("héllo wörld", 6), "héllo...");
    }
}
