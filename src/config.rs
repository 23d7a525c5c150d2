use crate::error::{ExportError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT_OUTPUT: &str = "codigos_proyecto_exportados.txt";
pub const DEFAULT_FRONTEND_OUTPUT: &str = "codigos_frontend_exportados.txt";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub project_file: PathBuf,
    pub frontend_file: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub ordering: Ordering,
}

/// Order in which matching files are written to the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    /// Sort by section, then by relative path. One banner per section.
    #[default]
    Grouped,
    /// Keep the directory walk order. A section banner is repeated whenever
    /// the walk comes back to a category it already left.
    Traversal,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            project_file: PathBuf::from(DEFAULT_PROJECT_OUTPUT),
            frontend_file: PathBuf::from(DEFAULT_FRONTEND_OUTPUT),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExportError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ExportError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ExportError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    /// Loads `config_path` if given, otherwise the first default config file
    /// found in `base_dir`, otherwise the built-in defaults.
    pub fn load_with_defaults<P: AsRef<Path>>(
        config_path: Option<P>,
        base_dir: &Path,
    ) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_names = ["code-exporter.toml", ".code-exporter.toml"];

                for name in &default_names {
                    let candidate = base_dir.join(name);
                    if candidate.is_file() {
                        return Self::load_from_file(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, overrides: &CliOverrides) {
        if let Some(ref project_file) = overrides.project_file {
            self.output.project_file = project_file.clone();
        }

        if let Some(ref frontend_file) = overrides.frontend_file {
            self.output.frontend_file = frontend_file.clone();
        }

        if let Some(ordering) = overrides.ordering {
            self.scan.ordering = ordering;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ExportError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ExportError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    /// Checks the values only. Output paths are relative to the base
    /// directory, so whether they can be created is left to the export.
    pub fn validate(&self) -> Result<()> {
        for (key, file) in [
            ("output.project_file", &self.output.project_file),
            ("output.frontend_file", &self.output.frontend_file),
        ] {
            if file.as_os_str().is_empty() {
                return Err(ExportError::Config {
                    message: format!("{} must not be empty", key),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub project_file: Option<PathBuf>,
    pub frontend_file: Option<PathBuf>,
    pub ordering: Option<Ordering>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_file(mut self, file: Option<PathBuf>) -> Self {
        self.project_file = file;
        self
    }

    pub fn with_frontend_file(mut self, file: Option<PathBuf>) -> Self {
        self.frontend_file = file;
        self
    }

    pub fn with_ordering(mut self, ordering: Option<Ordering>) -> Self {
        self.ordering = ordering;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.output.project_file,
            PathBuf::from("codigos_proyecto_exportados.txt")
        );
        assert_eq!(
            config.output.frontend_file,
            PathBuf::from("codigos_frontend_exportados.txt")
        );
        assert_eq!(config.scan.ordering, Ordering::Grouped);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.output.frontend_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_ignores_working_directory() {
        // `src` is a directory in the crate root, where tests run, but the
        // name is resolved against the base directory at export time.
        let mut config = Config::default();
        config.output.project_file = PathBuf::from("src");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.scan.ordering = Ordering::Traversal;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.scan.ordering, Ordering::Traversal);
        assert_eq!(loaded_config.output.project_file, config.output.project_file);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[scan]\nordering = \"traversal\"").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.scan.ordering, Ordering::Traversal);
        assert_eq!(
            config.output.project_file,
            PathBuf::from(DEFAULT_PROJECT_OUTPUT)
        );
    }

    #[test]
    fn test_default_config_lookup_in_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("code-exporter.toml"),
            "[output]\nproject_file = \"dump.txt\"\nfrontend_file = \"front.txt\"\n",
        )
        .unwrap();

        let config = Config::load_with_defaults(None::<&Path>, temp_dir.path()).unwrap();
        assert_eq!(config.output.project_file, PathBuf::from("dump.txt"));

        let empty_dir = TempDir::new().unwrap();
        let config = Config::load_with_defaults(None::<&Path>, empty_dir.path()).unwrap();
        assert_eq!(
            config.output.project_file,
            PathBuf::from(DEFAULT_PROJECT_OUTPUT)
        );
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(ExportError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_ordering(Some(Ordering::Traversal))
            .with_frontend_file(Some(PathBuf::from("front.txt")));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.scan.ordering, Ordering::Traversal);
        assert_eq!(config.output.frontend_file, PathBuf::from("front.txt"));
        assert_eq!(
            config.output.project_file,
            PathBuf::from(DEFAULT_PROJECT_OUTPUT)
        );
    }

    #[test]
    fn test_default_config_serializes_every_section() {
        let temp_file = NamedTempFile::new().unwrap();
        Config::default().save_to_file(temp_file.path()).unwrap();

        let sample = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(sample.contains("[output]"));
        assert!(sample.contains("[scan]"));
        assert!(sample.contains("ordering = \"grouped\""));
    }
}
