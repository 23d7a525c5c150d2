use crate::job::ExportJob;
use std::collections::BTreeSet;
use std::path::Path;

/// Decides which files make it into the report: the extension must be in
/// the job's fixed set and the relative path must not contain any excluded
/// substring.
pub struct FileFilter {
    extensions: BTreeSet<String>,
    excluded_substrings: Vec<String>,
}

impl FileFilter {
    pub fn new(job: &ExportJob) -> Self {
        Self {
            extensions: job.included_extensions.clone(),
            excluded_substrings: job.excluded_substrings.clone(),
        }
    }

    /// Extensions compare case-sensitively; `App.TSX` is not a `tsx` file.
    pub fn has_included_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(ext))
    }

    pub fn is_excluded(&self, relative_path: &str) -> bool {
        self.excluded_substrings
            .iter()
            .any(|excluded| relative_path.contains(excluded.as_str()))
    }

    pub fn accepts(&self, path: &Path, relative_path: &str) -> bool {
        self.has_included_extension(path) && !self.is_excluded(relative_path)
    }
}
