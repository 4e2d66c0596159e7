//! Secret resolver implementations
//!
//! Currently one backend is supported:
//!
//! - [`AwsResolver`] - AWS Secrets Manager (feature `aws`, enabled by default)

#[cfg(feature = "aws")]
mod aws;

#[cfg(feature = "aws")]
pub use aws::AwsResolver;
