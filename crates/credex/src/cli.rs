//! CLI argument parsing, error types, and exit codes

use crate::tracing::LogLevel;
use clap::Parser;
use credex_secrets::{SecretError, SecretRequest};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

/// Exit code for successful runs
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Secret resolution or payload error exit code
pub const EXIT_RESOLUTION: i32 = 3;

/// Fetch a database credential secret and print it as a shell export line.
///
/// The output is a single line suitable for `eval` during container startup:
///
/// `export POSTGRES_USER=<username> POSTGRES_PASSWORD=<password>`
#[derive(Parser, Debug)]
#[command(name = "credex")]
#[command(about = "Export database credentials from AWS Secrets Manager as shell statements")]
#[command(version)]
pub struct Cli {
    /// Secret identifier (name or ARN) to fetch
    pub secret_id: String,

    /// Fetch a specific secret version by ID
    #[arg(long)]
    pub version_id: Option<String>,

    /// Fetch a specific version stage (defaults to AWSCURRENT server-side)
    #[arg(long)]
    pub version_stage: Option<String>,

    /// Set logging level (logs go to stderr)
    #[arg(short = 'l', long, default_value = "warn", value_enum)]
    pub level: LogLevel,

    /// Output logs and errors in JSON format
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Build the backend lookup request from the parsed arguments.
    #[must_use]
    pub fn secret_request(&self) -> SecretRequest {
        let mut request = SecretRequest::new(&self.secret_id);
        if let Some(version_id) = &self.version_id {
            request = request.with_version_id(version_id);
        }
        if let Some(version_stage) = &self.version_stage {
            request = request.with_version_stage(version_stage);
        }
        request
    }
}

/// Parse command line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// CLI-specific error types with exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(credex::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Secret resolution or payload error (exit code 3)
    #[error("{message}")]
    #[diagnostic(code(credex::cli::resolution))]
    Resolution {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(credex::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new resolution error
    #[must_use]
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new resolution error with help text
    #[must_use]
    pub fn resolution_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }
}

/// Convert `SecretError` to a `CliError` with category-appropriate help text.
///
/// Every variant maps to `Resolution` (exit code 3); the help text is the
/// only thing that differs, and it never references payload content.
impl From<SecretError> for CliError {
    fn from(err: SecretError) -> Self {
        match &err {
            SecretError::NotFound { .. } => Self::resolution_with_help(
                err.to_string(),
                "Check the secret identifier and the configured AWS region",
            ),
            SecretError::AccessDenied { .. } => Self::resolution_with_help(
                err.to_string(),
                "Check that the active AWS credentials allow secretsmanager:GetSecretValue",
            ),
            SecretError::InvalidJson { .. } | SecretError::MissingField { .. } => {
                Self::resolution_with_help(
                    err.to_string(),
                    "The secret payload must be a JSON object with string 'username' and 'password' keys",
                )
            }
            SecretError::Backend { .. } | SecretError::NotAString { .. } => {
                Self::resolution(err.to_string())
            }
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Resolution { .. } | CliError::Other { .. } => EXIT_RESOLUTION,
    }
}

/// Render error to stderr based on the JSON flag.
///
/// Stdout is reserved for the export line; errors never touch it.
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::Resolution { .. } => "resolution",
                CliError::Other { .. } => "other",
            },
            "message": err.to_string()
        }));

        match serde_json::to_string(&envelope) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        // Use miette for human-friendly error display
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<T> {
    /// Status indicator - always "error"
    pub status: &'static str,
    /// The error payload
    pub error: T,
}

impl<T> ErrorEnvelope<T> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: T) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_secret_id_with_defaults() {
        let cli = Cli::try_parse_from(["credex", "prod/db-credentials"]).unwrap();
        assert_eq!(cli.secret_id, "prod/db-credentials");
        assert!(cli.version_id.is_none());
        assert!(cli.version_stage.is_none());
        assert!(matches!(cli.level, LogLevel::Warn));
        assert!(!cli.json);
    }

    #[test]
    fn zero_arguments_fail_before_any_work() {
        let result = Cli::try_parse_from(["credex"]);
        assert!(result.is_err());
    }

    #[test]
    fn extra_positional_arguments_are_rejected() {
        let result = Cli::try_parse_from(["credex", "one", "two"]);
        assert!(result.is_err());
    }

    #[test]
    fn version_options_are_parsed() {
        let cli = Cli::try_parse_from([
            "credex",
            "prod/db",
            "--version-id",
            "v1",
            "--version-stage",
            "AWSPREVIOUS",
        ])
        .unwrap();
        let request = cli.secret_request();
        assert_eq!(request.secret_id, "prod/db");
        assert_eq!(request.version_id.as_deref(), Some("v1"));
        assert_eq!(request.version_stage.as_deref(), Some("AWSPREVIOUS"));
    }

    #[test]
    fn log_level_parsing() {
        let cli = Cli::try_parse_from(["credex", "-l", "debug", "prod/db"]).unwrap();
        assert!(matches!(cli.level, LogLevel::Debug));

        let result = Cli::try_parse_from(["credex", "--level", "invalid", "prod/db"]);
        assert!(result.is_err());
    }

    #[test]
    fn json_flag() {
        let cli = Cli::try_parse_from(["credex", "--json", "prod/db"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn help_flag_renders_help() {
        let err = Cli::try_parse_from(["credex", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn exit_code_mapping() {
        assert_eq!(exit_code_for(&CliError::config("bad flag")), EXIT_CLI);
        assert_eq!(
            exit_code_for(&CliError::resolution("not found")),
            EXIT_RESOLUTION
        );
        assert_eq!(exit_code_for(&CliError::other("boom")), EXIT_RESOLUTION);
    }

    #[test]
    fn secret_error_mapping_keeps_category() {
        let err: CliError = SecretError::NotFound {
            secret_id: "prod/db".to_string(),
        }
        .into();
        assert!(matches!(err, CliError::Resolution { .. }));
        assert_eq!(exit_code_for(&err), EXIT_RESOLUTION);
    }

    #[test]
    fn missing_field_mapping_mentions_expected_shape() {
        let err: CliError = SecretError::MissingField {
            secret_id: "prod/db".to_string(),
            field: "password",
        }
        .into();
        match err {
            CliError::Resolution { help, .. } => {
                assert!(help.unwrap().contains("'username' and 'password'"));
            }
            other => panic!("expected Resolution, got {other:?}"),
        }
    }
}
