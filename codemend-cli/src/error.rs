//! CLI-specific error types and exit code mapping

use codemend_core::error::CodemendError;
use codemend_engine::error::EngineError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Required credential environment variable is not set.
    #[error("missing credentials: environment variable {var} is not set")]
    MissingCredentials { var: &'static str },

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from codemend-core.
    #[error("{0}")]
    Core(#[from] CodemendError),

    /// Fatal pipeline error from codemend-engine.
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// Analysis-only scan found issues (deliberate non-zero for CI).
    #[error("scan error: {0}")]
    Scan(String),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                |
    /// |------|----------------------------------------|
    /// | 0    | Success                                |
    /// | 1    | General / command error                |
    /// | 2    | Configuration / credentials error      |
    /// | 4    | `scan` found issues (non-zero for CI)  |
    /// | 10   | IO error                               |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::MissingCredentials { .. } => 2,
            Self::Scan(_) => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) | Self::Engine(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("bad".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_missing_credentials() {
        let err = CliError::MissingCredentials {
            var: "GROQ_API_KEY",
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_exit_code_scan_error() {
        let err = CliError::Scan("found 5 findings".to_owned());
        assert_eq!(err.exit_code(), 4, "scan error should return exit code 4");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("oops".to_owned());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_core_error() {
        let core_err = CodemendError::Config(codemend_core::error::ConfigError::FileNotFound {
            path: "codemend.toml".to_owned(),
        });
        let err: CliError = core_err.into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_engine_error() {
        let engine_err: EngineError = codemend_core::error::DiscoveryError::RootNotFound {
            path: "/missing".to_owned(),
        }
        .into();
        let err: CliError = engine_err.into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display = err.to_string();
        assert!(display.contains("configuration error"));
        assert!(display.contains("invalid TOML syntax"));
    }
}
