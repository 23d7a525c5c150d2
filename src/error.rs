use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expected project structure not found (looked for: {})", .expected.join(", "))]
    MissingStructure { expected: Vec<String>, hint: String },

    #[error("Cannot write output file {path}: {source}")]
    OutputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Directory scan failed: {message}")]
    Scan { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ExportError {
    fn user_message(&self) -> String {
        match self {
            ExportError::MissingStructure { expected, .. } => {
                format!(
                    "Expected project structure not found. Looked for: {}",
                    expected.join(", ")
                )
            }
            ExportError::OutputFile { path, source } => {
                format!("Cannot write output file {}: {}", path, source)
            }
            ExportError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ExportError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            ExportError::Scan { message } => {
                format!("Could not scan directory: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ExportError::MissingStructure { hint, .. } => Some(hint.clone()),
            ExportError::OutputFile { .. } => Some(
                "Check that the output location is writable, or choose another file with --output."
                    .to_string(),
            ),
            ExportError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config."
                    .to_string(),
            ),
            ExportError::Scan { .. } => Some(
                "Ensure you have read permissions for the base directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl ExportError {
    /// Process exit code used by the command-line entry points.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::MissingStructure { .. } => 3,
            ExportError::OutputFile { .. } => 4,
            _ => 1,
        }
    }
}

impl From<toml::de::Error> for ExportError {
    fn from(error: toml::de::Error) -> Self {
        ExportError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
