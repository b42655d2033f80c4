//! Signing delegate contract and its AWS Signature Version 4 implementation.
//!
//! [`SigningDelegate`] is the per-request capability service wrappers use to authenticate
//! calls: either a presigned URL carrying query-string authentication or a header set that
//! covers the request body. [`Signer`] resolves a credential through any
//! [`CredentialProvider`] and delegates the arithmetic to the pure functions in [`sigv4`].

pub mod config;
pub mod sigv4;

pub use config::*;

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	credential::{Credential, CredentialProvider},
	error::SigningError,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Boxed future returned by [`SigningDelegate`] methods.
pub type SignFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// HTTP methods the signer accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `HEAD`
	Head,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
	/// `OPTIONS`
	Options,
}
impl HttpMethod {
	/// Returns the canonical upper-case token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Head => "HEAD",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
			HttpMethod::Options => "OPTIONS",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for HttpMethod {
	type Err = SigningError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.to_ascii_uppercase().as_str() {
			"GET" => HttpMethod::Get,
			"HEAD" => HttpMethod::Head,
			"POST" => HttpMethod::Post,
			"PUT" => HttpMethod::Put,
			"PATCH" => HttpMethod::Patch,
			"DELETE" => HttpMethod::Delete,
			"OPTIONS" => HttpMethod::Options,
			_ => return Err(SigningError::UnsupportedMethod { method: s.to_owned() }),
		})
	}
}

/// Header map keyed by lower-case names, ordered for canonicalization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);
impl Headers {
	/// Creates an empty header set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name` to `value`, replacing any previous value.
	pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.as_ref().to_ascii_lowercase(), value.into())
	}

	/// Adds `value` to `name`, comma-joining it with any existing value.
	pub fn append(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) {
		self.0
			.entry(name.as_ref().to_ascii_lowercase())
			.and_modify(|existing| {
				existing.push(',');
				existing.push_str(value.as_ref());
			})
			.or_insert_with(|| value.as_ref().to_owned());
	}

	/// Looks up a header case-insensitively.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Returns `true` when `name` is present.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(&name.to_ascii_lowercase())
	}

	/// Removes a header, returning its value.
	pub fn remove(&mut self, name: &str) -> Option<String> {
		self.0.remove(&name.to_ascii_lowercase())
	}

	/// Iterates headers in canonical (lexicographic) order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}

	/// Number of distinct header names.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no headers are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for Headers
where
	K: AsRef<str>,
	V: Into<String>,
{
	fn from_iter<T>(iter: T) -> Self
	where
		T: IntoIterator<Item = (K, V)>,
	{
		let mut headers = Self::new();

		for (name, value) in iter {
			headers.insert(name, value);
		}

		headers
	}
}
impl IntoIterator for Headers {
	type IntoIter = std::collections::btree_map::IntoIter<String, String>;
	type Item = (String, String);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// Request body as seen by the signature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Payload {
	/// No body.
	#[default]
	Empty,
	/// Body bytes covered by the signature.
	Bytes(Vec<u8>),
	/// Body excluded from the signature (`UNSIGNED-PAYLOAD`), e.g. a stream.
	Unsigned,
}
impl Payload {
	/// Hex-encoded SHA-256 of the body, or the unsigned-payload marker.
	pub fn sha256_hex(&self) -> String {
		match self {
			Payload::Empty => hex::encode(Sha256::digest(b"")),
			Payload::Bytes(bytes) => hex::encode(Sha256::digest(bytes)),
			Payload::Unsigned => sigv4::UNSIGNED_PAYLOAD.to_owned(),
		}
	}
}
impl From<Vec<u8>> for Payload {
	fn from(bytes: Vec<u8>) -> Self {
		Payload::Bytes(bytes)
	}
}
impl From<&[u8]> for Payload {
	fn from(bytes: &[u8]) -> Self {
		Payload::Bytes(bytes.to_vec())
	}
}

/// Per-request authentication capability consumed by service wrappers.
///
/// Both operations suspend only while the credential is resolved; the signature itself is a
/// pure computation over the request and the signing instant.
pub trait SigningDelegate
where
	Self: Send + Sync,
{
	/// Returns `url` with query-string authentication valid for `expires` from now.
	fn sign_url<'a>(
		&'a self,
		url: &'a Url,
		method: HttpMethod,
		headers: &'a Headers,
		expires: Duration,
	) -> SignFuture<'a, Url>;

	/// Returns `headers` plus the authentication headers covering `payload`.
	fn sign_headers<'a>(
		&'a self,
		url: &'a Url,
		method: HttpMethod,
		headers: &'a Headers,
		payload: &'a Payload,
	) -> SignFuture<'a, Headers>;
}
impl<D> SigningDelegate for Arc<D>
where
	D: ?Sized + SigningDelegate,
{
	fn sign_url<'a>(
		&'a self,
		url: &'a Url,
		method: HttpMethod,
		headers: &'a Headers,
		expires: Duration,
	) -> SignFuture<'a, Url> {
		(**self).sign_url(url, method, headers, expires)
	}

	fn sign_headers<'a>(
		&'a self,
		url: &'a Url,
		method: HttpMethod,
		headers: &'a Headers,
		payload: &'a Payload,
	) -> SignFuture<'a, Headers> {
		(**self).sign_headers(url, method, headers, payload)
	}
}

/// SigV4 signing delegate backed by a credential provider.
#[derive(Clone, Debug)]
pub struct Signer<P> {
	config: SignerConfig,
	credentials: P,
}
impl<P> Signer<P>
where
	P: CredentialProvider,
{
	/// Creates a signer for the configured region and service.
	pub fn new(config: SignerConfig, credentials: P) -> Self {
		Self { config, credentials }
	}

	/// Returns the signer configuration.
	pub fn config(&self) -> &SignerConfig {
		&self.config
	}

	/// Returns the credential provider.
	pub fn credentials(&self) -> &P {
		&self.credentials
	}

	async fn credential_at(&self, instant: OffsetDateTime) -> Result<Credential> {
		let credential = self.credentials.credential().await?;

		credential.ensure_valid_at(instant)?;

		Ok(credential)
	}

	fn params<'a>(
		&'a self,
		url: &'a Url,
		method: HttpMethod,
		headers: &'a Headers,
	) -> sigv4::SigningParams<'a> {
		sigv4::SigningParams {
			region: self.config.region(),
			service: self.config.service(),
			method,
			url,
			headers,
			settings: self.config.settings(),
		}
	}
}
impl<P> SigningDelegate for Signer<P>
where
	P: CredentialProvider,
{
	fn sign_url<'a>(
		&'a self,
		url: &'a Url,
		method: HttpMethod,
		headers: &'a Headers,
		expires: Duration,
	) -> SignFuture<'a, Url> {
		const KIND: OpKind = OpKind::SignUrl;

		let span = OpSpan::new(KIND, "signer");

		Box::pin(span.instrument(async move {
			obs::record_op_outcome(KIND, OpOutcome::Attempt);

			let result: Result<Url> = async {
				let instant = self.config.clock().now();
				let credential = self.credential_at(instant).await?;
				let params = self.params(url, method, headers);

				Ok(sigv4::presign_url(&params, expires, &credential, instant)?)
			}
			.await;

			obs::record_op_outcome(KIND, OpOutcome::of(&result));

			result
		}))
	}

	fn sign_headers<'a>(
		&'a self,
		url: &'a Url,
		method: HttpMethod,
		headers: &'a Headers,
		payload: &'a Payload,
	) -> SignFuture<'a, Headers> {
		const KIND: OpKind = OpKind::SignHeaders;

		let span = OpSpan::new(KIND, "signer");

		Box::pin(span.instrument(async move {
			obs::record_op_outcome(KIND, OpOutcome::Attempt);

			let result: Result<Headers> = async {
				let instant = self.config.clock().now();
				let credential = self.credential_at(instant).await?;
				let params = self.params(url, method, headers);

				Ok(sigv4::sign_headers(&params, payload, &credential, instant)?)
			}
			.await;

			obs::record_op_outcome(KIND, OpOutcome::of(&result));

			result
		}))
	}
}
