//! Error handling for the oden-sync CLI
//!
//! Library errors arrive already rendered as the text a caller should see.
//! `CliError` pairs that text with the exit code the process ends with.

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use std::error::Error;
use std::fmt;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type that includes both error information and suggested exit code
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Create a CLI error from another error with a specific exit code
    pub fn from_error<E: Error + Send + Sync + 'static>(error: E, exit_code: i32) -> Self {
        let message = error.to_string();
        Self {
            message,
            exit_code,
            source: Some(Box::new(error)),
        }
    }

    /// An operation that ran and reported a failure
    pub fn operation(message: impl Into<String>) -> Self {
        Self::new(message, EXIT_WARNING)
    }

    /// A configuration or startup failure
    pub fn startup<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_error(error, EXIT_ERROR)
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        // The first source is the error the message was rendered from
        let mut current_source = self.source().and_then(|err| err.source());
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {}", err));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

/// Extension trait for converting results to CLI results
pub trait IntoCliResult<T> {
    fn cli_error(self, exit_code: i32) -> CliResult<T>;
    fn cli_startup_error(self) -> CliResult<T>;
}

impl<T, E: Error + Send + Sync + 'static> IntoCliResult<T> for Result<T, E> {
    fn cli_error(self, exit_code: i32) -> CliResult<T> {
        self.map_err(|e| CliError::from_error(e, exit_code))
    }

    fn cli_startup_error(self) -> CliResult<T> {
        self.map_err(CliError::startup)
    }
}

/// Print the command output or the error chain and return the exit code
pub fn handle_cli_result<T: fmt::Display>(result: CliResult<T>) -> i32 {
    match result {
        Ok(output) => {
            println!("{output}");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.full_chain());
            e.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "could not read body file")
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_operation_error_uses_warning_code() {
        let err = CliError::operation("❌ Not a GitHub repository");
        assert_eq!(err.exit_code, EXIT_WARNING);
        assert_eq!(err.full_chain(), "❌ Not a GitHub repository");
    }

    #[test]
    fn test_startup_error_keeps_cause_chain() {
        let err = CliError::startup(Wrapped(io::Error::new(
            io::ErrorKind::NotFound,
            "notes.md missing",
        )));

        assert_eq!(err.exit_code, EXIT_ERROR);
        assert_eq!(
            err.full_chain(),
            "could not read body file\n  Caused by: notes.md missing"
        );
    }

    #[test]
    fn test_into_cli_result() {
        let result: Result<(), io::Error> = Err(io::Error::other("boom"));
        let err = result.cli_error(7).unwrap_err();
        assert_eq!(err.exit_code, 7);
        assert_eq!(err.to_string(), "boom");

        let result: Result<(), io::Error> = Err(io::Error::other("boom"));
        assert_eq!(result.cli_startup_error().unwrap_err().exit_code, EXIT_ERROR);
    }

    #[test]
    fn test_handle_cli_result_exit_codes() {
        assert_eq!(handle_cli_result(Ok::<_, CliError>("done")), EXIT_SUCCESS);
        assert_eq!(
            handle_cli_result::<String>(Err(CliError::operation("failed"))),
            EXIT_WARNING
        );
    }
}
