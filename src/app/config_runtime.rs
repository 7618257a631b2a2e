//! Merges CLI arguments with file configuration.

use std::path::{Path, PathBuf};

use booklist_core::ExportFormat;
use booklist_core::parser::DEFAULT_PROGRESS_INTERVAL;

use crate::app_config::FileConfig;
use crate::cli::Args;

/// Settings for one run after CLI and file config are merged.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) input: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) format: ExportFormat,
    pub(crate) progress_interval: usize,
    pub(crate) dry_run: bool,
}

/// Default log level when `RUST_LOG` is unset.
///
/// Priority: quiet flag > verbose flag > config verbosity > `info`.
pub(crate) fn resolve_default_log_level(args: &Args, file_config: Option<&FileConfig>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => file_config
            .and_then(|cfg| cfg.verbosity)
            .map_or("info", |verbosity| verbosity.log_level()),
        1 => "debug",
        _ => "trace",
    }
}

/// Applies file defaults wherever the CLI left a value unset.
pub(crate) fn resolve_settings(args: &Args, file_config: Option<&FileConfig>) -> RunSettings {
    let format = args
        .format
        .or_else(|| file_config.and_then(|cfg| cfg.format))
        .unwrap_or_default();
    let output_dir = file_config.and_then(|cfg| cfg.output_dir.as_deref());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, output_dir, format));
    let progress_interval = file_config
        .and_then(|cfg| cfg.progress_interval)
        .unwrap_or(DEFAULT_PROGRESS_INTERVAL);

    RunSettings {
        input: args.input.clone(),
        output,
        format,
        progress_interval,
        dry_run: args.dry_run,
    }
}

/// Input base name with the format's extension, inside `output_dir` or the
/// current directory.
pub(crate) fn default_output_path(
    input: &Path,
    output_dir: Option<&Path>,
    format: ExportFormat,
) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "booklist".into(), |stem| stem.to_string_lossy());
    let file_name = format!("{stem}.{}", format.extension());
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
