//! AWS Secrets Manager secret resolver

use crate::types::SecureSecret;
use crate::{SecretError, SecretRequest, SecretResolver};
use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;

/// Resolves secrets from AWS Secrets Manager.
///
/// Credentials and region come from the SDK default chain (environment,
/// shared config, IMDS/ECS task roles), so the tool works both on developer
/// machines and inside containers with an attached role.
pub struct AwsResolver {
    client: Client,
}

impl std::fmt::Debug for AwsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsResolver").finish_non_exhaustive()
    }
}

impl AwsResolver {
    /// Create a resolver using the SDK default configuration chain.
    pub async fn new() -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::from_client(Client::new(&config))
    }

    /// Create a resolver from an existing client (used for custom endpoints).
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretResolver for AwsResolver {
    fn provider_name(&self) -> &'static str {
        "aws"
    }

    async fn fetch(&self, request: &SecretRequest) -> Result<SecureSecret, SecretError> {
        let mut call = self
            .client
            .get_secret_value()
            .secret_id(&request.secret_id);

        if let Some(version_id) = &request.version_id {
            call = call.version_id(version_id);
        }

        if let Some(version_stage) = &request.version_stage {
            call = call.version_stage(version_stage);
        }

        tracing::debug!(
            secret_id = %request.secret_id,
            version_id = ?request.version_id,
            version_stage = ?request.version_stage,
            "calling GetSecretValue"
        );

        let response = call
            .send()
            .await
            .map_err(|e| classify_sdk_error(&request.secret_id, &e))?;

        let secret_string = response
            .secret_string()
            .ok_or_else(|| SecretError::NotAString {
                secret_id: request.secret_id.clone(),
            })?;

        Ok(SecureSecret::new(secret_string.to_string()))
    }
}

/// Map an SDK error onto the [`SecretError`] taxonomy.
///
/// Not-found is a modeled exception; access denial and expired or invalid
/// credentials arrive as unmodeled errors and are matched by error code.
fn classify_sdk_error(secret_id: &str, err: &SdkError<GetSecretValueError>) -> SecretError {
    if let SdkError::ServiceError(context) = err {
        let service_err = context.err();

        if service_err.is_resource_not_found_exception() {
            return SecretError::NotFound {
                secret_id: secret_id.to_string(),
            };
        }

        if matches!(
            service_err.meta().code(),
            Some("AccessDeniedException" | "UnrecognizedClientException" | "ExpiredTokenException")
        ) {
            return SecretError::AccessDenied {
                secret_id: secret_id.to_string(),
            };
        }

        return SecretError::Backend {
            secret_id: secret_id.to_string(),
            message: service_err.to_string(),
        };
    }

    SecretError::Backend {
        secret_id: secret_id.to_string(),
        message: err.to_string(),
    }
}
