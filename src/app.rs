use crate::cli::Cli;
use crate::error::{ExportError, UserFriendlyError};
use crate::job::ExporterKind;
use crate::scanner::SourceScanner;
use crate::ui::{OutputFormatter, OutputMode};
use crate::CodeExporter;
use tracing_subscriber::EnvFilter;

/// Exit code for a completed export where some files or folders could not
/// be read.
pub const EXIT_WITH_WARNINGS: i32 = 2;

/// Entry point shared by both binaries. Returns the process exit code.
pub fn main_with(kind: ExporterKind) -> i32 {
    let cli = Cli::parse_for(kind);
    setup_logging(cli.verbosity_level(), cli.quiet);
    run(kind, &cli)
}

pub fn run(kind: ExporterKind, cli: &Cli) -> i32 {
    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(kind, cli);
    }

    let exporter = match CodeExporter::from_cli(kind, cli) {
        Ok(exporter) => exporter,
        Err(e) => {
            print_startup_error(cli.output_mode(), &e);
            return e.exit_code();
        }
    };

    if cli.dry_run {
        return handle_dry_run(&exporter);
    }

    exporter
        .output_formatter()
        .print_header(&format!("{} EXPORTER", exporter.job().title()));

    match exporter.export() {
        Ok(summary) => {
            exporter.output_formatter().print_export_summary(kind, &summary);

            if summary.has_warnings() {
                EXIT_WITH_WARNINGS
            } else {
                0
            }
        }
        Err(e) => {
            exporter.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(kind: ExporterKind, cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.base_directory().join("code-exporter.toml"));

    match CodeExporter::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  {} --config {}", kind.bin_name(), config_path.display());
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(exporter: &CodeExporter) -> i32 {
    let formatter = exporter.output_formatter();

    formatter.info("DRY RUN MODE - The report will not be written");
    formatter.print_separator();

    let found = match exporter.check_environment() {
        Ok(found) => found,
        Err(e) => {
            exporter.handle_error(&e);
            return e.exit_code();
        }
    };
    formatter.print_found_markers(&found);

    let job = exporter.job();
    formatter.info(&format!("Report would be written to: {}", job.output_path.display()));
    formatter.info(&format!("Ordering: {:?}", exporter.config().scan.ordering));

    let scanner = SourceScanner::new(&job, exporter.config().scan.ordering);
    let plan = match scanner.plan(&job, exporter.base_dir()) {
        Ok(plan) => plan,
        Err(e) => {
            exporter.handle_error(&e);
            return e.exit_code();
        }
    };

    formatter.print_separator();
    formatter.print_plan(&plan, &scanner.get_statistics(&plan));
    formatter.print_separator();
    formatter.success("Dry run completed successfully");

    0
}

fn print_startup_error(mode: OutputMode, error: &ExportError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(mode, 0, false);
    formatter.print_user_friendly_error(error);
}

/// Installs the stderr tracing subscriber. `RUST_LOG` wins over the
/// verbosity flags.
pub fn setup_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(verbosity, quiet)));

    // A second initialisation (tests, embedding) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_log_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "code_exporter=error";
    }

    match verbosity {
        0 => "code_exporter=warn",
        1 => "code_exporter=info",
        2 => "code_exporter=debug",
        _ => "code_exporter=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn cli_for(kind: ExporterKind, base: &Path, extra: &[&str]) -> Cli {
        let mut args = vec![
            kind.bin_name().to_string(),
            "--base-dir".to_string(),
            base.display().to_string(),
            "--quiet".to_string(),
            "--output-format".to_string(),
            "plain".to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_for(kind, args).unwrap()
    }

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");
        let config_arg = config_path.display().to_string();

        let cli = cli_for(
            ExporterKind::Project,
            temp_dir.path(),
            &["--generate-config", "--config", &config_arg],
        );

        assert_eq!(run(ExporterKind::Project, &cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[output]"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("src/index.ts"), "x").unwrap();

        let cli = cli_for(ExporterKind::Project, temp_dir.path(), &["--dry-run"]);

        assert_eq!(run(ExporterKind::Project, &cli), 0);
        assert!(!temp_dir
            .path()
            .join(crate::config::DEFAULT_PROJECT_OUTPUT)
            .exists());
    }

    #[test]
    fn test_missing_structure_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let cli = cli_for(ExporterKind::Frontend, temp_dir.path(), &[]);

        assert_eq!(run(ExporterKind::Frontend, &cli), 3);
        assert!(!temp_dir
            .path()
            .join(crate::config::DEFAULT_FRONTEND_OUTPUT)
            .exists());
    }

    #[test]
    fn test_successful_export_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("main.tsx"), "render();").unwrap();

        let cli = cli_for(ExporterKind::Frontend, temp_dir.path(), &[]);

        assert_eq!(run(ExporterKind::Frontend, &cli), 0);
        let report = fs::read_to_string(
            temp_dir
                .path()
                .join(crate::config::DEFAULT_FRONTEND_OUTPUT),
        )
        .unwrap();
        assert!(report.contains("CATEGORY: Main files"));
    }

    #[test]
    fn test_default_log_directive() {
        assert_eq!(default_log_directive(0, false), "code_exporter=warn");
        assert_eq!(default_log_directive(2, false), "code_exporter=debug");
        assert_eq!(default_log_directive(3, true), "code_exporter=error");
    }
}
