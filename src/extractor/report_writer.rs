use crate::extractor::content_reader::{read_source, ReadOutcome};
use crate::job::{ExportJob, Grouping};
use crate::scanner::{ExportPlan, SourceFile};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const BANNER_WIDTH: usize = 60;
const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub files_processed: usize,
    pub total_files: usize,
    /// Files whose content was written (UTF-8 or Latin-1).
    pub files_exported: usize,
    pub latin1_fallbacks: usize,
    pub bytes_written: u64,
    pub files_by_section: BTreeMap<String, usize>,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ExportProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            files_exported: 0,
            latin1_fallbacks: 0,
            bytes_written: 0,
            files_by_section: BTreeMap::new(),
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, file: &SourceFile, section: &str, outcome: &ReadOutcome) {
        self.files_processed += 1;
        self.current_file = Some(file.relative_path.clone());

        match outcome {
            ReadOutcome::Utf8(_) => self.files_exported += 1,
            ReadOutcome::Latin1(_) => {
                self.files_exported += 1;
                self.latin1_fallbacks += 1;
            }
            ReadOutcome::Failed(reason) => {
                self.errors
                    .push(format!("Failed to read {}: {}", file.relative_path, reason));
            }
        }

        *self
            .files_by_section
            .entry(section.to_string())
            .or_insert(0) += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Remembers the last section banner written so a new one is only emitted
/// when the section changes.
#[derive(Debug, Default)]
pub struct SectionTracker {
    current: Option<String>,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `section` differs from the previous one.
    pub fn enter(&mut self, section: &str) -> bool {
        if self.current.as_deref() == Some(section) {
            return false;
        }
        self.current = Some(section.to_string());
        true
    }
}

/// Writes the text report: title, section banners and fenced file contents.
pub struct ReportWriter<W: Write> {
    out: W,
    bytes_written: u64,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bytes_written: 0,
        }
    }

    pub fn write_title(&mut self, title: &str) -> io::Result<()> {
        self.emit(&format!("=== {} ===\n\n", title))
    }

    pub fn write_section_banner(&mut self, kind: &str, name: &str) -> io::Result<()> {
        let line = "=".repeat(BANNER_WIDTH);
        self.emit(&format!("\n{line}\n{kind}: {name}\n{line}\n\n"))
    }

    pub fn write_file(&mut self, relative_path: &str, outcome: &ReadOutcome) -> io::Result<()> {
        self.emit(&format!("\n--- {} ---\n```\n", relative_path))?;

        match outcome {
            ReadOutcome::Utf8(content) | ReadOutcome::Latin1(content) => self.emit(content)?,
            ReadOutcome::Failed(reason) => {
                self.emit(&format!("# Error reading file: {}\n", reason))?
            }
        }

        self.emit(&format!("\n```\n\n{}\n", "─".repeat(RULE_WIDTH)))
    }

    /// Writes every file of `plan` under the banners `job` calls for.
    pub fn write_plan(
        &mut self,
        job: &ExportJob,
        plan: &ExportPlan,
        progress_callback: Option<&dyn Fn(&ExportProgress)>,
    ) -> io::Result<ExportProgress> {
        let mut progress = ExportProgress::new(plan.total_files());
        let mut sections = SectionTracker::new();

        self.write_title(job.title())?;

        for root in &plan.roots {
            if !root.exists {
                continue;
            }

            if job.grouping() == Grouping::ByRoot {
                self.write_section_banner("FOLDER", &root.name.to_uppercase())?;
            }

            for file in &root.files {
                if let Some(callback) = progress_callback {
                    callback(&progress);
                }

                let section = match (job.grouping(), file.category) {
                    (Grouping::ByCategory, Some(category)) => {
                        if sections.enter(category.label()) {
                            self.write_section_banner("CATEGORY", category.label())?;
                        }
                        category.label().to_string()
                    }
                    _ => root.name.clone(),
                };

                let outcome = read_source(&file.source_path);
                match &outcome {
                    ReadOutcome::Latin1(_) => {
                        debug!(path = %file.relative_path, "decoded as Latin-1")
                    }
                    ReadOutcome::Failed(reason) => {
                        warn!(path = %file.relative_path, error = %reason, "could not read file")
                    }
                    ReadOutcome::Utf8(_) => {}
                }

                self.write_file(&file.relative_path, &outcome)?;
                progress.record(file, &section, &outcome);
            }
        }

        self.out.flush()?;
        progress.bytes_written = self.bytes_written;

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.bytes_written += text.len() as u64;
        Ok(())
    }
}
