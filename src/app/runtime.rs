use std::fs::{self, File};
use std::io::BufWriter;

use anyhow::{Context, Result};
use booklist_core::CourseRecord;
use booklist_core::export;
use booklist_core::extract::extract_pages;
use booklist_core::parser::{ParseSession, parse_pages_with};
use tracing::{debug, info};

use crate::app::config_runtime::{self, RunSettings};
use crate::app::terminal;
use crate::app_config;
use crate::cli::Args;
use crate::commands;

/// Runs one conversion from parsed CLI arguments.
pub(crate) fn run_booklist(args: Args) -> Result<()> {
    let loaded = app_config::load_default_file_config()?;
    let file_config = loaded.config.as_ref();

    terminal::init_tracing(config_runtime::resolve_default_log_level(&args, file_config));
    debug!(?args, config_path = ?loaded.path, "CLI arguments parsed");

    let settings = config_runtime::resolve_settings(&args, file_config);
    info!("Started parsing {}", settings.input.display());

    let pages = extract_pages(&settings.input)
        .with_context(|| format!("Failed to read '{}'", settings.input.display()))?;
    let session = ParseSession::new().with_progress_interval(settings.progress_interval);
    let output = parse_pages_with(session, &pages)?;
    info!("Finished parsing {}", settings.input.display());

    if settings.dry_run {
        commands::run_dry_run_preview(&output);
        return Ok(());
    }

    if output.is_empty() {
        info!("Nothing to save");
        return Ok(());
    }

    let rows = write_output(&settings, &output.courses)?;
    info!("Saved {} rows to {}", rows, settings.output.display());
    Ok(())
}

fn write_output(settings: &RunSettings, courses: &[CourseRecord]) -> Result<usize> {
    if let Some(parent) = settings.output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create '{}'", parent.display()))?;
        info!(dir = %parent.display(), "Created output directory");
    }

    let file = File::create(&settings.output)
        .with_context(|| format!("Unable to open '{}'", settings.output.display()))?;
    let rows = export::write(settings.format, courses, BufWriter::new(file))
        .with_context(|| format!("Failed to write '{}'", settings.output.display()))?;
    Ok(rows)
}
