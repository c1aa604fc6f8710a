//! Command-line interface definitions and result printing

use crate::search::Query;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;

/// ferret-rs - search wikis, service catalogs, code, chat and card boards
#[derive(Parser, Debug)]
#[command(name = "ferret-rs", author, version, about)]
pub struct Cli {
    /// Config file
    #[arg(long, global = true, env = "FERRET_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search by the given provider
    Search {
        /// Provider name
        provider: String,
        /// Search keyword
        keyword: Option<String>,
        /// Page number, from 1
        #[arg(long)]
        page: Option<String>,
        /// Results per page
        #[arg(long)]
        limit: Option<String>,
        /// Open the Nth result with the goto command
        #[arg(long)]
        goto: Option<String>,
        /// Provider call timeout, e.g. 2500ms or 3s
        #[arg(long)]
        timeout: Option<String>,
    },
    /// Listen for the UI and REST API requests
    Listen,
}

/// Render results as a numbered table followed by the elapsed time
pub fn format_results(query: &Query) -> String {
    let rows: Vec<(String, String)> = query
        .results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let title = match result.short_date() {
                Some(date) => format!("{} ({})", result.title, date),
                None => result.title.clone(),
            };
            ((i + 1).to_string(), title)
        })
        .collect();

    let width = rows.iter().map(|(n, _)| n.len()).max().unwrap_or(0).max(1);

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  TITLE", "#", width = width);
    for (n, title) in &rows {
        let _ = writeln!(out, "{:<width$}  {}", n, title, width = width);
    }
    let _ = writeln!(out, "\n{}ms", query.elapsed_ms());
    out
}
