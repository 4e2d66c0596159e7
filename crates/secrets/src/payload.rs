//! Database credential payload parsing
//!
//! Secrets Manager stores database credentials as a JSON object. RDS-managed
//! secrets carry extra fields (`host`, `port`, `engine`, `dbname`); only
//! `username` and `password` matter here and everything else is ignored.

use crate::types::SecureSecret;
use crate::SecretError;

/// Payload key holding the database username
pub const USERNAME_KEY: &str = "username";
/// Payload key holding the database password
pub const PASSWORD_KEY: &str = "password";

/// A parsed database credential payload.
///
/// The password is held as a [`SecureSecret`] so it is zeroed on drop and
/// redacted in debug output.
#[derive(Debug, Clone)]
pub struct DatabaseCredentials {
    username: String,
    password: SecureSecret,
}

impl DatabaseCredentials {
    /// Parse a secret string as a database credential payload.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidJson`] if the string is not valid JSON,
    /// or [`SecretError::MissingField`] if `username` or `password` is absent
    /// or not a string.
    pub fn from_json(secret_id: &str, payload: &str) -> Result<Self, SecretError> {
        let parsed: serde_json::Value =
            serde_json::from_str(payload).map_err(|e| SecretError::InvalidJson {
                secret_id: secret_id.to_string(),
                message: e.to_string(),
            })?;

        let username = string_field(secret_id, &parsed, USERNAME_KEY)?;
        let password = string_field(secret_id, &parsed, PASSWORD_KEY)?;

        Ok(Self {
            username,
            password: SecureSecret::new(password),
        })
    }

    /// The database username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The database password.
    #[must_use]
    pub fn password(&self) -> &SecureSecret {
        &self.password
    }
}

/// Extract a required string field from a parsed payload
fn string_field(
    secret_id: &str,
    parsed: &serde_json::Value,
    field: &'static str,
) -> Result<String, SecretError> {
    parsed
        .get(field)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SecretError::MissingField {
            secret_id: secret_id.to_string(),
            field,
        })
}
