use crate::error::{ExportError, Result};
use crate::extractor::report_writer::{ExportProgress, ReportWriter};
use crate::job::ExportJob;
use crate::scanner::ExportPlan;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Final, serializable account of one export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub exporter: String,
    pub output_path: PathBuf,
    pub files_exported: usize,
    pub files_failed: usize,
    pub latin1_fallbacks: usize,
    pub bytes_written: u64,
    pub files_by_section: BTreeMap<String, usize>,
    pub missing_roots: Vec<String>,
    pub scan_errors: Vec<String>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
    pub exported_at: DateTime<Utc>,
}

impl ExportSummary {
    pub fn new(
        job: &ExportJob,
        plan: &ExportPlan,
        progress: &ExportProgress,
        output_path: &Path,
    ) -> Self {
        Self {
            exporter: job.kind.bin_name().to_string(),
            output_path: output_path.to_path_buf(),
            files_exported: progress.files_exported,
            files_failed: progress.errors.len(),
            latin1_fallbacks: progress.latin1_fallbacks,
            bytes_written: progress.bytes_written,
            files_by_section: progress.files_by_section.clone(),
            missing_roots: plan.missing_roots().iter().map(|r| r.to_string()).collect(),
            scan_errors: plan.scan_errors.clone(),
            errors: progress.errors.clone(),
            duration_ms: progress.elapsed().as_millis() as u64,
            exported_at: Utc::now(),
        }
    }

    /// True when some file or directory could not be read.
    pub fn has_warnings(&self) -> bool {
        !self.errors.is_empty() || !self.scan_errors.is_empty()
    }
}

/// The report file on disk. Creating it truncates any previous report.
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn create(&self) -> Result<ReportWriter<BufWriter<fs::File>>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.output_error(e))?;
            }
        }

        let file = fs::File::create(&self.path).map_err(|e| self.output_error(e))?;
        Ok(ReportWriter::new(BufWriter::new(file)))
    }

    pub fn write_report(
        &self,
        job: &ExportJob,
        plan: &ExportPlan,
        progress_callback: Option<&dyn Fn(&ExportProgress)>,
    ) -> Result<ExportProgress> {
        let mut writer = self.create()?;
        writer
            .write_plan(job, plan, progress_callback)
            .map_err(|e| self.output_error(e))
    }

    fn output_error(&self, source: std::io::Error) -> ExportError {
        ExportError::OutputFile {
            path: self.path.display().to_string(),
            source,
        }
    }
}
