//! Error handling for the mutrack CLI

use mutrack_core::LayoutError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mutrack CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid layout request: {message}")]
    InvalidRequest { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest { message: message.into() }
    }
}

impl From<LayoutError> for CliError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::InvalidConfig(message) => Self::config(message),
            other => Self::invalid_request(other.to_string()),
        }
    }
}

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::InvalidRequest { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Every region needs chr, start, stop and width\n\
                 • Every event needs a dt code (1, 2, 4, 5, 6 or 10) and the fields of its kind\n\
                 • Run with -v to see which records were dropped from the view",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your mutrack.toml configuration file\n\
                 • Use 'mutrack config --example' to generate a sample configuration\n\
                 • Row height anchors must have increasing counts and non-increasing heights",
            );
        }
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("request.json"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_layout_error_conversion() {
        let err: CliError = LayoutError::config("bin_width must be > 0").into();
        assert!(matches!(err, CliError::Config { .. }));

        let err: CliError = LayoutError::NoRegions.into();
        assert!(matches!(err, CliError::InvalidRequest { .. }));
        assert!(format_error_with_suggestions(&err).contains("dt code"));
    }
}
