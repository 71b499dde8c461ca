// ============================================================================
// mediaedit-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// CLI failures (bad configuration, runtime setup, missing tools) are carried
// as CoreError with added context. Rejections from bridge operations are not
// errors at this level; they are reported by `output::print_rejection`.

// ---- Internal crate imports ----
use mediaedit_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::fmt;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// CONTEXT
// ============================================================================

/// Prefixes a failure with what the CLI was doing when it happened.
///
/// The result is always `CoreError::OperationFailed`, so the exit path stays
/// the same whatever the underlying error was.
pub trait CliErrorContext<T> {
    fn cli_context<C: fmt::Display>(self, context: C) -> CliResult<T>;

    /// Like `cli_context`, but only builds the message on failure.
    fn cli_with_context<C: fmt::Display>(self, context: impl FnOnce() -> C) -> CliResult<T>;
}

impl<T, E: Into<CoreError>> CliErrorContext<T> for Result<T, E> {
    fn cli_context<C: fmt::Display>(self, context: C) -> CliResult<T> {
        self.cli_with_context(|| context)
    }

    fn cli_with_context<C: fmt::Display>(self, context: impl FnOnce() -> C) -> CliResult<T> {
        self.map_err(|e| {
            let cause: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {cause}", context()))
        })
    }
}

/// Creates a CLI error with a formatted message.
#[macro_export]
macro_rules! cli_error {
    ($($arg:tt)*) => {
        ::mediaedit_core::CoreError::OperationFailed(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_context_wraps_message() {
        let result: Result<(), CoreError> = Err(CoreError::Config("bad bitrate".into()));
        let err = result.cli_context("invalid bridge configuration").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("invalid bridge configuration"));
        assert!(message.contains("bad bitrate"));
    }

    #[test]
    fn test_cli_with_context_accepts_io_errors() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = result
            .cli_with_context(|| format!("failed to start {}", "runtime"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to start runtime"));
    }

    #[test]
    fn test_cli_error_macro() {
        let err = cli_error!("missing {} tool(s)", 2);
        assert!(matches!(err, CoreError::OperationFailed(ref m) if m == "missing 2 tool(s)"));
    }
}
