use crate::config::Ordering;
use crate::error::{ExportError, Result};
use crate::job::{categorize, Category, ExportJob, Grouping};
use crate::scanner::file_filter::FileFilter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub source_path: PathBuf,
    /// Path relative to the base directory, always with `/` separators.
    pub relative_path: String,
    pub extension: String,
    pub size: u64,
    pub category: Option<Category>,
}

impl SourceFile {
    pub fn new(source_path: PathBuf, relative_path: String, size: u64) -> Self {
        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            source_path,
            relative_path,
            extension,
            size,
            category: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// Files found under one configured root, in the order they will be written.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedRoot {
    pub name: String,
    pub exists: bool,
    pub files: Vec<SourceFile>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportPlan {
    pub roots: Vec<PlannedRoot>,
    pub scan_errors: Vec<String>,
}

impl ExportPlan {
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.roots.iter().flat_map(|root| root.files.iter())
    }

    pub fn total_files(&self) -> usize {
        self.roots.iter().map(|root| root.files.len()).sum()
    }

    pub fn missing_roots(&self) -> Vec<&str> {
        self.roots
            .iter()
            .filter(|root| !root.exists)
            .map(|root| root.name.as_str())
            .collect()
    }
}

pub struct SourceScanner {
    filter: FileFilter,
    grouping: Grouping,
    ordering: Ordering,
    report_path: PathBuf,
}

impl SourceScanner {
    pub fn new(job: &ExportJob, ordering: Ordering) -> Self {
        Self {
            filter: FileFilter::new(job),
            grouping: job.grouping(),
            ordering,
            report_path: job.output_path.clone(),
        }
    }

    /// Scans every root of `job` below `base_dir`. Missing roots are kept in
    /// the plan with `exists == false` so the caller can warn about them.
    pub fn plan(&self, job: &ExportJob, base_dir: &Path) -> Result<ExportPlan> {
        if !base_dir.is_dir() {
            return Err(ExportError::Scan {
                message: format!("{} is not a directory", base_dir.display()),
            });
        }

        let mut plan = ExportPlan::default();

        for root in &job.roots {
            let root_path = if root == "." {
                base_dir.to_path_buf()
            } else {
                base_dir.join(root)
            };

            if !root_path.exists() {
                warn!(root = %root, "root folder not found, skipping");
                plan.roots.push(PlannedRoot {
                    name: root.clone(),
                    exists: false,
                    files: Vec::new(),
                });
                continue;
            }

            let files = if root_path.is_dir() {
                self.scan_root(&root_path, base_dir, &mut plan.scan_errors)?
            } else {
                Vec::new()
            };

            plan.roots.push(PlannedRoot {
                name: root.clone(),
                exists: true,
                files,
            });
        }

        Ok(plan)
    }

    fn scan_root(
        &self,
        root_path: &Path,
        base_dir: &Path,
        scan_errors: &mut Vec<String>,
    ) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();

        // Sorting by file name keeps the walk deterministic across platforms.
        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        scan_errors.push(format!("Permission denied: {}", err));
                    } else {
                        scan_errors.push(format!("Scan error: {}", err));
                    }
                    continue;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            match self.process_file(&entry, base_dir) {
                Ok(Some(file)) => {
                    debug!(path = %file.relative_path, "selected for export");
                    files.push(file);
                }
                Ok(None) => {}
                Err(err) => {
                    scan_errors.push(format!(
                        "Error processing {}: {}",
                        entry.path().display(),
                        err
                    ));
                }
            }
        }

        self.order(&mut files);
        Ok(files)
    }

    fn process_file(&self, entry: &DirEntry, base_dir: &Path) -> Result<Option<SourceFile>> {
        let path = entry.path();
        if is_same_location(path, &self.report_path) {
            debug!(path = %path.display(), "skipping the report file");
            return Ok(None);
        }

        let relative_path = calculate_relative_path(path, base_dir)?;

        if !self.filter.accepts(path, &relative_path) {
            return Ok(None);
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let file = SourceFile::new(path.to_path_buf(), relative_path, size);

        let file = match self.grouping {
            Grouping::ByCategory => {
                let category = categorize(&file.relative_path);
                file.with_category(category)
            }
            Grouping::ByRoot => file,
        };

        Ok(Some(file))
    }

    fn order(&self, files: &mut [SourceFile]) {
        if self.ordering == Ordering::Traversal {
            return;
        }

        match self.grouping {
            Grouping::ByCategory => files.sort_by(|a, b| {
                a.category
                    .cmp(&b.category)
                    .then_with(|| a.relative_path.cmp(&b.relative_path))
            }),
            Grouping::ByRoot => files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path)),
        }
    }

    pub fn get_statistics(&self, plan: &ExportPlan) -> PlanStatistics {
        let mut statistics = PlanStatistics::default();

        for file in plan.files() {
            statistics.total_files += 1;
            statistics.total_size += file.size;
            *statistics
                .files_by_extension
                .entry(file.extension.clone())
                .or_insert(0) += 1;
            if let Some(category) = file.category {
                *statistics.files_by_category.entry(category).or_insert(0) += 1;
            }
            if statistics.largest_file.is_none() || file.size > statistics.largest_file_size {
                statistics.largest_file_size = file.size;
                statistics.largest_file = Some(file.relative_path.clone());
            }
        }

        statistics
    }
}

/// Compares two file paths by their canonical parent directory and file
/// name, so `./dump.json` and `/abs/dump.json` name the same entry. The file
/// itself need not exist yet.
fn is_same_location(path: &Path, other: &Path) -> bool {
    if path == other {
        return true;
    }
    if path.file_name() != other.file_name() {
        return false;
    }

    match (canonical_location(path), canonical_location(other)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn canonical_location(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

/// Regular files, plus symlinks that resolve to one.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn calculate_relative_path(file_path: &Path, base_dir: &Path) -> Result<String> {
    let relative = file_path
        .strip_prefix(base_dir)
        .map_err(|_| ExportError::InvalidPath {
            path: format!(
                "Cannot calculate relative path for {} from base {}",
                file_path.display(),
                base_dir.display()
            ),
        })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(ExportError::InvalidPath {
                    path: format!("Unexpected path component in {}", relative.display()),
                })
            }
        }
    }

    Ok(parts.join("/"))
}

#[derive(Debug, Default, Serialize)]
pub struct PlanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_extension: BTreeMap<String, usize>,
    pub files_by_category: BTreeMap<Category, usize>,
    pub largest_file_size: u64,
    pub largest_file: Option<String>,
}

impl PlanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1));

            for (ext, count) in extensions {
                summary.push_str(&format!("    .{}: {} files\n", ext, count));
            }
        }

        if !self.files_by_category.is_empty() {
            summary.push_str("  Files by category:\n");
            for (category, count) in &self.files_by_category {
                summary.push_str(&format!("    {}: {} files\n", category, count));
            }
        }

        if let Some(ref largest) = self.largest_file {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                largest,
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
