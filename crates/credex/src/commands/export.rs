//! The export command: fetch, parse, format
//!
//! Fetches one secret, parses it as a database credential payload, and
//! formats the shell export line. The line is returned to the caller so
//! nothing reaches stdout unless the whole sequence succeeded.

use crate::cli::CliError;
use credex_secrets::{DatabaseCredentials, SecretRequest, SecretResolver};

/// Environment variable receiving the username
pub const USER_VAR: &str = "POSTGRES_USER";
/// Environment variable receiving the password
pub const PASSWORD_VAR: &str = "POSTGRES_PASSWORD";

/// Execute the export command.
///
/// # Errors
///
/// Returns a [`CliError`] if the backend call fails or the payload is not a
/// valid credential object. No partial output is produced on error.
pub async fn execute_export(
    resolver: &dyn SecretResolver,
    request: &SecretRequest,
) -> Result<String, CliError> {
    tracing::debug!(
        secret_id = %request.secret_id,
        provider = resolver.provider_name(),
        "fetching secret"
    );

    let secret = resolver.fetch(request).await?;
    let creds = DatabaseCredentials::from_json(&request.secret_id, secret.expose())?;

    tracing::debug!(secret_id = %request.secret_id, "credential payload parsed");

    Ok(format_export_line(&creds))
}

/// Format credentials as a single shell export line.
///
/// Values are concatenated verbatim, matching the original container startup
/// contract byte-for-byte; the consumer `eval`s the line as-is.
#[must_use]
pub fn format_export_line(creds: &DatabaseCredentials) -> String {
    format!(
        "export {USER_VAR}={} {PASSWORD_VAR}={}",
        creds.username(),
        creds.password().expose()
    )
}
