use crate::config::Config;
use crate::error::{ExportError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The two exporters shipped by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExporterKind {
    /// Backend sources and schema folders, grouped by root folder.
    Project,
    /// Frontend sources, grouped by path category.
    Frontend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    ByRoot,
    ByCategory,
}

impl ExporterKind {
    pub fn bin_name(&self) -> &'static str {
        match self {
            ExporterKind::Project => "export-project",
            ExporterKind::Frontend => "export-frontend",
        }
    }

    pub fn about(&self) -> &'static str {
        match self {
            ExporterKind::Project => {
                "Export the server's src and prisma folders into a single text report"
            }
            ExporterKind::Frontend => {
                "Export the frontend sources, grouped by category, into a single text report"
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ExporterKind::Project => "PROJECT SERVER CODE",
            ExporterKind::Frontend => "FRONTEND CODE",
        }
    }

    pub fn roots(&self) -> &'static [&'static str] {
        match self {
            ExporterKind::Project => &["src", "prisma"],
            ExporterKind::Frontend => &["."],
        }
    }

    pub fn included_extensions(&self) -> &'static [&'static str] {
        match self {
            ExporterKind::Project => &["ts", "js", "prisma", "json", "toml", "cjs", "sql"],
            ExporterKind::Frontend => &["tsx", "ts", "js", "jsx", "css", "json", "cjs", "mjs"],
        }
    }

    pub fn excluded_substrings(&self) -> &'static [&'static str] {
        match self {
            ExporterKind::Project => &[],
            ExporterKind::Frontend => &["components/ui"],
        }
    }

    /// Entries of which at least one must exist in the base directory.
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            ExporterKind::Project => &["src", "prisma"],
            ExporterKind::Frontend => &["App.tsx", "main.tsx", "components"],
        }
    }

    pub fn grouping(&self) -> Grouping {
        match self {
            ExporterKind::Project => Grouping::ByRoot,
            ExporterKind::Frontend => Grouping::ByCategory,
        }
    }

    pub fn missing_structure_hint(&self) -> &'static str {
        match self {
            ExporterKind::Project => "Make sure you run this command from the 'server' folder.",
            ExporterKind::Frontend => {
                "Make sure you run this command from the root folder of the frontend sources."
            }
        }
    }

    /// File families listed in the closing summary.
    pub fn included_families(&self) -> &'static [&'static str] {
        match self {
            ExporterKind::Project => &[
                "TypeScript (.ts)",
                "JavaScript (.js)",
                "Prisma (.prisma, .sql)",
                "Configuration (.json, .toml, .cjs)",
            ],
            ExporterKind::Frontend => &[
                "React/TypeScript (.tsx, .ts)",
                "JavaScript (.js, .jsx)",
                "Styles (.css)",
                "Configuration (.json, .cjs, .mjs)",
            ],
        }
    }

    pub fn output_file<'a>(&self, config: &'a Config) -> &'a Path {
        match self {
            ExporterKind::Project => &config.output.project_file,
            ExporterKind::Frontend => &config.output.frontend_file,
        }
    }

    /// Builds the fixed job for this exporter, writing to `output_path`.
    pub fn job<P: Into<PathBuf>>(&self, output_path: P) -> ExportJob {
        ExportJob {
            kind: *self,
            roots: self.roots().iter().map(|r| r.to_string()).collect(),
            included_extensions: self
                .included_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
            excluded_substrings: self
                .excluded_substrings()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_path: output_path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportJob {
    pub kind: ExporterKind,
    pub roots: Vec<String>,
    pub included_extensions: BTreeSet<String>,
    pub excluded_substrings: Vec<String>,
    pub output_path: PathBuf,
}

impl ExportJob {
    pub fn grouping(&self) -> Grouping {
        self.kind.grouping()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Returns the markers present in `base_dir`, or `MissingStructure` when
    /// none of them is.
    pub fn check_environment(&self, base_dir: &Path) -> Result<Vec<String>> {
        let found: Vec<String> = self
            .kind
            .markers()
            .iter()
            .filter(|marker| base_dir.join(marker).exists())
            .map(|marker| marker.to_string())
            .collect();

        if found.is_empty() {
            return Err(ExportError::MissingStructure {
                expected: self.kind.markers().iter().map(|m| m.to_string()).collect(),
                hint: self.kind.missing_structure_hint().to_string(),
            });
        }

        Ok(found)
    }

    /// Resolves the output path against `base_dir` unless it is absolute.
    pub fn resolved_output(&self, base_dir: &Path) -> PathBuf {
        if self.output_path.is_absolute() {
            self.output_path.clone()
        } else {
            base_dir.join(&self.output_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_project_job_literals() {
        let job = ExporterKind::Project.job("out.txt");
        assert_eq!(job.roots, vec!["src", "prisma"]);
        assert!(job.included_extensions.contains("prisma"));
        assert!(job.included_extensions.contains("sql"));
        assert!(!job.included_extensions.contains("tsx"));
        assert!(job.excluded_substrings.is_empty());
        assert_eq!(job.grouping(), Grouping::ByRoot);
    }

    #[test]
    fn test_frontend_job_literals() {
        let job = ExporterKind::Frontend.job("out.txt");
        assert_eq!(job.roots, vec!["."]);
        assert_eq!(job.included_extensions.len(), 8);
        assert!(job.included_extensions.contains("mjs"));
        assert!(!job.included_extensions.contains("sql"));
        assert_eq!(job.excluded_substrings, vec!["components/ui"]);
        assert_eq!(job.grouping(), Grouping::ByCategory);
    }

    #[test]
    fn test_environment_check_accepts_any_marker() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("prisma")).unwrap();

        let job = ExporterKind::Project.job("out.txt");
        let found = job.check_environment(temp_dir.path()).unwrap();
        assert_eq!(found, vec!["prisma"]);
    }

    #[test]
    fn test_environment_check_fails_without_markers() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("index.html"), "<html></html>").unwrap();

        let job = ExporterKind::Frontend.job("out.txt");
        let err = job.check_environment(temp_dir.path()).unwrap_err();
        match err {
            ExportError::MissingStructure { expected, hint } => {
                assert_eq!(expected, vec!["App.tsx", "main.tsx", "components"]);
                assert!(hint.contains("frontend"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_frontend_marker_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("main.tsx"), "").unwrap();

        let job = ExporterKind::Frontend.job("out.txt");
        assert_eq!(
            job.check_environment(temp_dir.path()).unwrap(),
            vec!["main.tsx"]
        );
    }

    #[test]
    fn test_output_resolution() {
        let base = Path::new("/work/server");
        let job = ExporterKind::Project.job("dump.txt");
        assert_eq!(job.resolved_output(base), PathBuf::from("/work/server/dump.txt"));

        let job = ExporterKind::Project.job("/tmp/dump.txt");
        assert_eq!(job.resolved_output(base), PathBuf::from("/tmp/dump.txt"));
    }
}
