pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod job;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, Ordering, OutputConfig, ScanConfig};
pub use error::{ExportError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    read_source, ExportProgress, ExportSummary, OutputFile, ReadOutcome, ReportWriter,
};
pub use job::{categorize, Category, ExportJob, ExporterKind, Grouping};
pub use scanner::{ExportPlan, FileFilter, PlanStatistics, SourceFile, SourceScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main library interface: one exporter bound to a base directory.
pub struct CodeExporter {
    kind: ExporterKind,
    config: Config,
    base_dir: PathBuf,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl CodeExporter {
    pub fn new<P: Into<PathBuf>>(
        kind: ExporterKind,
        config: Config,
        base_dir: P,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Result<Self> {
        let base_dir = base_dir.into();
        if !base_dir.is_dir() {
            return Err(ExportError::InvalidPath {
                path: base_dir.display().to_string(),
            });
        }

        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        // Progress bars would interleave with machine-readable output.
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Ok(Self {
            kind,
            config,
            base_dir,
            output_formatter,
            progress_manager,
        })
    }

    pub fn from_cli(kind: ExporterKind, cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config(kind)?;

        Self::new(
            kind,
            config,
            cli_args.base_directory(),
            cli_args.output_mode(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        )
    }

    /// The job for this exporter, with the output path resolved against the
    /// base directory.
    pub fn job(&self) -> ExportJob {
        let output = self.kind.output_file(&self.config);
        let job = self.kind.job(output);
        let resolved = job.resolved_output(&self.base_dir);
        self.kind.job(resolved)
    }

    pub fn check_environment(&self) -> Result<Vec<String>> {
        self.job().check_environment(&self.base_dir)
    }

    pub fn plan(&self) -> Result<ExportPlan> {
        let job = self.job();
        SourceScanner::new(&job, self.config.scan.ordering).plan(&job, &self.base_dir)
    }

    /// Runs the whole export: environment check, scan, report, summary.
    /// Nothing is written when the environment check fails.
    pub fn export(&self) -> Result<ExportSummary> {
        let job = self.job();

        self.output_formatter
            .start_operation("Verifying project structure");
        let found = job.check_environment(&self.base_dir)?;
        self.output_formatter.print_found_markers(&found);
        info!(
            exporter = self.kind.bin_name(),
            base_dir = %self.base_dir.display(),
            "starting export"
        );

        let spinner = self.progress_manager.create_spinner("Scanning source folders");
        let scanner = SourceScanner::new(&job, self.config.scan.ordering);
        let plan = scanner.plan(&job, &self.base_dir)?;
        spinner.finish_and_clear();

        for missing in plan.missing_roots() {
            self.output_formatter
                .warning(&format!("Folder '{}' not found, skipping", missing));
        }
        for error in &plan.scan_errors {
            warn!("{}", error);
        }

        let statistics = scanner.get_statistics(&plan);
        self.output_formatter.debug(&statistics.display_summary());
        debug!(files = plan.total_files(), "scan finished");

        self.output_formatter
            .print_export_target(self.kind, &job.output_path.display().to_string());

        let output = OutputFile::new(&job.output_path);
        let file_progress = self
            .progress_manager
            .create_file_progress(plan.total_files() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ExportProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let progress = output.write_report(&job, &plan, Some(&progress_callback))?;

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Exported {} files", progress.files_exported),
            progress.elapsed(),
        );

        let summary = ExportSummary::new(&job, &plan, &progress, output.path());
        info!(
            files = summary.files_exported,
            failed = summary.files_failed,
            bytes = summary.bytes_written,
            "export finished"
        );

        Ok(summary)
    }

    /// Writes the default configuration as a starting point for edits.
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn kind(&self) -> ExporterKind {
        self.kind
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ExportError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Exports `base_dir` with default settings and no console output.
pub fn export_directory(
    kind: ExporterKind,
    base_dir: &Path,
    output: Option<&Path>,
    ordering: Ordering,
) -> Result<ExportSummary> {
    let mut config = Config::default();
    config.scan.ordering = ordering;

    if let Some(output_path) = output {
        let output_path = Some(output_path.to_path_buf());
        let overrides = match kind {
            ExporterKind::Project => CliOverrides::new().with_project_file(output_path),
            ExporterKind::Frontend => CliOverrides::new().with_frontend_file(output_path),
        };
        config.merge_with_cli_args(&overrides);
    }

    CodeExporter::new(kind, config, base_dir, OutputMode::Plain, 0, true)?.export()
}
