//! Credential model and the provider contract consumed by signers.
//!
//! Providers are interchangeable behind [`CredentialProvider`]: a fixed credential, the process
//! environment, a custom async resolver, a fallback chain, or a cache wrapping any of those.

pub mod cache;
pub mod environment;
pub mod resolver;
pub mod secret;

pub use cache::CachedCredentialProvider;
pub use environment::EnvironmentCredentialProvider;
pub use resolver::{ChainCredentialProvider, FnCredentialProvider};
pub use secret::Secret;

// self
use crate::{_prelude::*, error::CredentialError, id::AccessKeyId};

/// Boxed future returned by [`CredentialProvider::credential`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Credential, CredentialError>> + 'a + Send>>;

/// Resolves the credential used to sign requests.
///
/// Resolution may suspend (metadata service, STS) and may fail. Implementations shared across
/// tasks must synchronize any internal cache themselves.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Resolves a credential.
	fn credential(&self) -> CredentialFuture<'_>;
}
impl<P> CredentialProvider for Arc<P>
where
	P: ?Sized + CredentialProvider,
{
	fn credential(&self) -> CredentialFuture<'_> {
		(**self).credential()
	}
}

/// Access key pair plus optional session token; treated as an immutable value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Public access key id.
	pub access_key_id: AccessKeyId,
	/// Secret access key; callers must avoid logging it.
	pub secret_access_key: Secret,
	/// Session token issued with temporary credentials.
	pub session_token: Option<Secret>,
	/// Instant after which temporary credentials stop working.
	pub expiration: Option<OffsetDateTime>,
}
impl Credential {
	/// Creates a long-lived credential.
	pub fn new(access_key_id: AccessKeyId, secret_access_key: impl Into<String>) -> Self {
		Self {
			access_key_id,
			secret_access_key: Secret::new(secret_access_key),
			session_token: None,
			expiration: None,
		}
	}

	/// Attaches a session token.
	pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
		self.session_token = Some(Secret::new(token));

		self
	}

	/// Attaches an expiration instant.
	pub fn with_expiration(mut self, instant: OffsetDateTime) -> Self {
		self.expiration = Some(instant);

		self
	}

	/// Returns `true` if the credential carries an expiration at or before `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expiration.is_some_and(|expiration| expiration <= instant)
	}

	/// Fails with [`CredentialError::Expired`] if the credential cannot sign at `instant`.
	pub fn ensure_valid_at(&self, instant: OffsetDateTime) -> Result<(), CredentialError> {
		match self.expiration {
			Some(expired_at) if expired_at <= instant =>
				Err(CredentialError::Expired { expired_at }),
			_ => Ok(()),
		}
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("access_key_id", &self.access_key_id)
			.field("secret_access_key", &"<redacted>")
			.field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
			.field("expiration", &self.expiration)
			.finish()
	}
}
impl CredentialProvider for Credential {
	fn credential(&self) -> CredentialFuture<'_> {
		let credential = self.clone();

		Box::pin(async move { Ok(credential) })
	}
}

/// Provider that always returns the same credential.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider(Credential);
impl StaticCredentialProvider {
	/// Wraps a fixed credential.
	pub fn new(credential: Credential) -> Self {
		Self(credential)
	}
}
impl CredentialProvider for StaticCredentialProvider {
	fn credential(&self) -> CredentialFuture<'_> {
		self.0.credential()
	}
}
