//! CLI entry point for the booklist tool.

use anyhow::Result;
use clap::Parser;

mod app;
mod app_config;
mod cli;
mod commands;

use cli::Args;

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    app::runtime::run_booklist(args)
}
