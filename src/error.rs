//! Crate-level error types shared by the credential, signing, and configuration layers.
//!
//! Pagination failures are not represented here: the paginator surfaces whatever error type
//! the wrapped operation produces, unmodified.

// self
use crate::{_prelude::*, id::IdentifierError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by signing and credential APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The credential could not be resolved.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// Authentication material could not be computed.
	#[error(transparent)]
	Signing(#[from] SigningError),
}

/// Configuration and validation failures.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// An identifier (region, service, access key) failed validation.
	#[error("Identifier is invalid.")]
	InvalidIdentifier(#[from] IdentifierError),
	/// Signer configuration omitted the region.
	#[error("Signer configuration is missing a region.")]
	MissingRegion,
	/// Signer configuration omitted the service name.
	#[error("Signer configuration is missing a service name.")]
	MissingService,
}

/// Failures raised while resolving a credential.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// A provider had nothing to offer.
	#[error("No credential is available from the {provider} provider.")]
	Missing {
		/// Label of the provider that came up empty.
		provider: &'static str,
	},
	/// A required environment variable is unset or empty.
	#[error("Environment variable `{variable}` is not set.")]
	Environment {
		/// Name of the missing variable.
		variable: String,
	},
	/// The resolved access key id is malformed.
	#[error("Resolved access key id is invalid.")]
	InvalidAccessKeyId(#[from] IdentifierError),
	/// The resolved credential already expired at the signing instant.
	#[error("Credential expired at {expired_at}.")]
	Expired {
		/// Expiration instant carried by the credential.
		expired_at: OffsetDateTime,
	},
	/// Every provider in a chain failed; the last failure is kept as the source.
	#[error("All {attempts} chained credential providers failed.")]
	ChainExhausted {
		/// Number of providers consulted.
		attempts: usize,
		/// Failure reported by the final provider.
		#[source]
		last: Box<CredentialError>,
	},
	/// Custom resolver failure (metadata service, STS, ...).
	#[error("Credential provider failed.")]
	Provider {
		/// Resolver-specific failure.
		#[source]
		source: BoxError,
	},
}
impl CredentialError {
	/// Wraps a custom resolver failure.
	pub fn provider(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Provider { source: Box::new(src) }
	}
}

/// Failures raised while computing a signature.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// Presigned URLs must expire after a positive duration of at most seven days.
	#[error("Presigned URL validity of {seconds}s is outside 1..=604800 seconds.")]
	InvalidExpiry {
		/// Requested validity in whole seconds.
		seconds: i64,
	},
	/// The URL carries no host to sign.
	#[error("URL `{url}` has no host component.")]
	MissingHost {
		/// Offending URL.
		url: String,
	},
	/// The HTTP method is not one the signer understands.
	#[error("HTTP method `{method}` is not supported.")]
	UnsupportedMethod {
		/// Method string as supplied.
		method: String,
	},
	/// A header name or value cannot be represented on the wire.
	#[error("Header `{name}` cannot be encoded.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// The signing instant could not be rendered as an ISO 8601 basic timestamp.
	#[error("Signing timestamp could not be formatted.")]
	Timestamp(#[from] time::error::Format),
	/// The HMAC key could not be initialized.
	#[error("Signing key could not be initialized.")]
	SigningKey,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn credential_error_converts_into_crate_error_with_source() {
		let inner = CredentialError::Environment { variable: "AWS_ACCESS_KEY_ID".into() };
		let err: Error =
			CredentialError::ChainExhausted { attempts: 2, last: Box::new(inner) }.into();

		assert!(matches!(err, Error::Credential(_)));
		assert!(err.to_string().contains("2 chained"));

		let source = StdError::source(&err)
			.expect("Chain exhaustion should expose the last provider failure.");

		assert!(source.to_string().contains("AWS_ACCESS_KEY_ID"));
	}

	#[test]
	fn signing_error_reports_expiry_bounds() {
		let err = SigningError::InvalidExpiry { seconds: 0 };

		assert_eq!(err.to_string(), "Presigned URL validity of 0s is outside 1..=604800 seconds.");
	}
}
