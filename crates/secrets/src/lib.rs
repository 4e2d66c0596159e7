//! Secret resolution for credex
//!
//! Provides the [`SecretResolver`] seam between the CLI and the secrets
//! backend, the [`SecretError`] taxonomy, and parsing of database credential
//! payloads into [`DatabaseCredentials`].
//!
//! ```ignore
//! use credex_secrets::{DatabaseCredentials, SecretRequest, SecretResolver};
//!
//! let request = SecretRequest::new("prod/db-credentials");
//! let secret = resolver.fetch(&request).await?;
//! let creds = DatabaseCredentials::from_json(&request.secret_id, secret.expose())?;
//! ```

mod payload;
pub mod resolvers;
mod types;

pub use payload::{DatabaseCredentials, PASSWORD_KEY, USERNAME_KEY};
pub use types::SecureSecret;

#[cfg(feature = "aws")]
pub use resolvers::AwsResolver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for secret resolution and payload parsing.
///
/// Backend failures are split into not-found, access-denied, and everything
/// else so callers can tell "the secret does not exist" apart from "the
/// payload is malformed". Messages carry the secret identifier, never the
/// secret value.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The backend has no secret under this identifier
    #[error("Secret '{secret_id}' not found")]
    NotFound {
        /// Identifier that was looked up
        secret_id: String,
    },

    /// The caller is not allowed to read this secret
    #[error("Access denied reading secret '{secret_id}'")]
    AccessDenied {
        /// Identifier that was looked up
        secret_id: String,
    },

    /// Any other backend failure (throttling, network, decryption)
    #[error("Backend error fetching secret '{secret_id}': {message}")]
    Backend {
        /// Identifier that was looked up
        secret_id: String,
        /// Error message from the backend client
        message: String,
    },

    /// The secret exists but carries binary data instead of a string value
    #[error("Secret '{secret_id}' has no string value (may be binary)")]
    NotAString {
        /// Identifier that was looked up
        secret_id: String,
    },

    /// The secret string is not a valid JSON object
    #[error("Secret '{secret_id}' is not valid JSON: {message}")]
    InvalidJson {
        /// Identifier that was looked up
        secret_id: String,
        /// Parser error message
        message: String,
    },

    /// The payload parsed but lacks a required string field
    #[error("Key '{field}' missing or not a string in secret '{secret_id}'")]
    MissingField {
        /// Identifier that was looked up
        secret_id: String,
        /// The absent field name
        field: &'static str,
    },
}

/// A secret lookup request.
///
/// The identifier is opaque and passed to the backend verbatim; it can be a
/// plain name or a full ARN. Version fields pin a specific secret version,
/// otherwise the backend serves the current one (`AWSCURRENT`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretRequest {
    /// Secret identifier - can be ARN or secret name
    pub secret_id: String,

    /// Version ID (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    /// Version stage (optional, defaults to AWSCURRENT)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_stage: Option<String>,
}

impl SecretRequest {
    /// Create a request for the current value of a secret
    #[must_use]
    pub fn new(secret_id: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            version_id: None,
            version_stage: None,
        }
    }

    /// Pin the request to a specific version ID
    #[must_use]
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Pin the request to a version stage (e.g. `AWSPREVIOUS`)
    #[must_use]
    pub fn with_version_stage(mut self, version_stage: impl Into<String>) -> Self {
        self.version_stage = Some(version_stage.into());
        self
    }
}

/// Trait for fetching secret values from a backend.
///
/// Implementors provide [`fetch`](SecretResolver::fetch) for a single
/// round trip and [`provider_name`](SecretResolver::provider_name) for
/// logging. The returned [`SecureSecret`] zeroes its memory on drop.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Fetch the secret value for a request.
    async fn fetch(&self, request: &SecretRequest) -> Result<SecureSecret, SecretError>;

    /// Get the provider name for this resolver (e.g. `"aws"`).
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_error_not_found_names_identifier() {
        let err = SecretError::NotFound {
            secret_id: "prod/db".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("prod/db"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn secret_error_access_denied() {
        let err = SecretError::AccessDenied {
            secret_id: "prod/db".to_string(),
        };
        assert!(err.to_string().contains("Access denied"));
    }

    #[test]
    fn secret_error_missing_field_names_key() {
        let err = SecretError::MissingField {
            secret_id: "prod/db".to_string(),
            field: "password",
        };
        let msg = err.to_string();
        assert!(msg.contains("password"));
        assert!(msg.contains("prod/db"));
    }

    #[test]
    fn secret_error_invalid_json_carries_parser_message() {
        let err = SecretError::InvalidJson {
            secret_id: "prod/db".to_string(),
            message: "expected value at line 1".to_string(),
        };
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn secret_request_new_has_no_version() {
        let request = SecretRequest::new("arn:aws:secretsmanager:us-east-1:123456:secret:test");
        assert_eq!(
            request.secret_id,
            "arn:aws:secretsmanager:us-east-1:123456:secret:test"
        );
        assert!(request.version_id.is_none());
        assert!(request.version_stage.is_none());
    }

    #[test]
    fn secret_request_builders_set_versions() {
        let request = SecretRequest::new("prod/db")
            .with_version_id("v1")
            .with_version_stage("AWSPREVIOUS");
        assert_eq!(request.version_id.as_deref(), Some("v1"));
        assert_eq!(request.version_stage.as_deref(), Some("AWSPREVIOUS"));
    }

    #[test]
    fn secret_request_serialization_round_trips() {
        let request = SecretRequest::new("prod/db").with_version_stage("AWSCURRENT");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("versionStage"));
        assert!(!json.contains("versionId"));
        let parsed: SecretRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, parsed);
    }
}
