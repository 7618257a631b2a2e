//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use booklist_core::ExportFormat;
use clap::Parser;

/// Convert a bookstore booklist into one row per course textbook.
///
/// Reads a PDF booklist (or a `.txt` token dump with one fragment per line
/// and form feeds between pages) and writes CSV or JSON.
#[derive(Parser, Debug)]
#[command(name = "booklist")]
#[command(author, version, about)]
pub struct Args {
    /// Booklist document to parse (.pdf or .txt)
    #[arg(value_parser = existing_file)]
    pub input: PathBuf,

    /// Output file (default: input name with the format's extension)
    pub output: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format: csv or json
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Parse and print a summary without writing output
    #[arg(long)]
    pub dry_run: bool,
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("'{value}' is not an existing file"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input_file() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".txt").tempfile().unwrap()
    }

    #[test]
    fn test_cli_input_only_parses_with_defaults() {
        let file = input_file();
        let args = Args::try_parse_from(["booklist", file.path().to_str().unwrap()]).unwrap();
        assert_eq!(args.input, file.path());
        assert!(args.output.is_none());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.format.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_cli_missing_input_is_an_error() {
        let err = Args::try_parse_from(["booklist"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_nonexistent_input_rejected() {
        let err = Args::try_parse_from(["booklist", "/no/such/booklist.pdf"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_directory_input_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Args::try_parse_from(["booklist", dir.path().to_str().unwrap()]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_output_and_flags() {
        let file = input_file();
        let args = Args::try_parse_from([
            "booklist",
            file.path().to_str().unwrap(),
            "out.json",
            "-vv",
            "--format",
            "json",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.format, Some(ExportFormat::Json));
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_unknown_format_rejected() {
        let file = input_file();
        let result = Args::try_parse_from([
            "booklist",
            file.path().to_str().unwrap(),
            "--format",
            "xml",
        ]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["booklist", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let file = input_file();
        let args = Args::try_parse_from(["booklist", "-q", file.path().to_str().unwrap()]).unwrap();
        assert!(args.quiet);
    }
}
