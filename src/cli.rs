use crate::config::{CliOverrides, Config, Ordering};
use crate::error::Result;
use crate::job::ExporterKind;
use crate::ui::OutputMode;
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// Command line shared by both exporters. The binary name and description
/// are filled in per exporter by [`Cli::parse_for`].
#[derive(Parser, Debug)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Walks the source folders below the working directory and concatenates every \
                  matching file into one plain-text report, ready to paste into a review or chat."
)]
#[command(after_help = "EXAMPLES:\n  \
    export-project\n  \
    export-project --output dump.txt --ordering traversal\n  \
    export-frontend --base-dir ../client --dry-run\n  \
    export-frontend --config code-exporter.toml --output-format json")]
pub struct Cli {
    /// Report file (defaults to the configured file name in the base directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory to export from (defaults to the current directory)
    #[arg(long, env = "CODE_EXPORTER_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Order of files in the report
    #[arg(long, value_enum)]
    pub ordering: Option<Ordering>,

    /// Output format for console messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be exported without writing the report)
    #[arg(long, help = "List the files that would be exported without writing the report")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    /// Parses the process arguments for `kind`, exiting on usage errors.
    pub fn parse_for(kind: ExporterKind) -> Self {
        Self::try_parse_for(kind, std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_for<I, T>(
        kind: ExporterKind,
        args: I,
    ) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command()
            .name(kind.bin_name())
            .bin_name(kind.bin_name())
            .about(kind.about())
            .try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }

    pub fn load_config(&self, kind: ExporterKind) -> Result<Config> {
        let base_dir = self.base_directory();
        let mut config = Config::load_with_defaults(self.config.as_ref(), &base_dir)?;

        let overrides = self.create_cli_overrides(kind);
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    /// `--output` only overrides the report file of the exporter being run.
    pub fn create_cli_overrides(&self, kind: ExporterKind) -> CliOverrides {
        let overrides = CliOverrides::new().with_ordering(self.ordering);

        match kind {
            ExporterKind::Project => overrides.with_project_file(self.output.clone()),
            ExporterKind::Frontend => overrides.with_frontend_file(self.output.clone()),
        }
    }

    pub fn base_directory(&self) -> PathBuf {
        match self.base_dir {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_format.into()
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(kind: ExporterKind, args: &[&str]) -> Cli {
        Cli::try_parse_for(kind, args.iter().copied()).unwrap()
    }

    #[test]
    fn test_defaults_without_arguments() {
        let cli = parse(ExporterKind::Project, &["export-project"]);
        assert!(cli.output.is_none());
        assert!(cli.ordering.is_none());
        assert_eq!(cli.output_format, OutputFormat::Human);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(!cli.dry_run);
        assert!(!cli.generate_config);
    }

    #[test]
    fn test_flags_are_parsed() {
        let cli = parse(
            ExporterKind::Frontend,
            &[
                "export-frontend",
                "-o",
                "front.txt",
                "--ordering",
                "traversal",
                "--output-format",
                "json",
                "-vv",
                "--dry-run",
            ],
        );

        assert_eq!(cli.output, Some(PathBuf::from("front.txt")));
        assert_eq!(cli.ordering, Some(Ordering::Traversal));
        assert_eq!(cli.output_mode(), OutputMode::Json);
        assert_eq!(cli.verbosity_level(), 2);
        assert!(cli.dry_run);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_for(ExporterKind::Project, ["export-project", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_argument_is_rejected() {
        let result = Cli::try_parse_for(ExporterKind::Project, ["export-project", "src"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_override_targets_running_exporter() {
        let cli = parse(ExporterKind::Frontend, &["export-frontend", "-o", "front.txt"]);
        let overrides = cli.create_cli_overrides(ExporterKind::Frontend);
        assert_eq!(overrides.frontend_file, Some(PathBuf::from("front.txt")));
        assert!(overrides.project_file.is_none());
    }

    #[test]
    fn test_load_config_merges_file_and_flags() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("code-exporter.toml"),
            "[output]\nproject_file = \"server.txt\"\nfrontend_file = \"client.txt\"\n\n[scan]\nordering = \"traversal\"\n",
        )
        .unwrap();

        let base = temp_dir.path().to_str().unwrap();
        let cli = parse(
            ExporterKind::Project,
            &["export-project", "--base-dir", base, "--ordering", "grouped"],
        );
        let config = cli.load_config(ExporterKind::Project).unwrap();

        assert_eq!(config.output.project_file, PathBuf::from("server.txt"));
        assert_eq!(config.output.frontend_file, PathBuf::from("client.txt"));
        assert_eq!(config.scan.ordering, Ordering::Grouped);
    }
}
