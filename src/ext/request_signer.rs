//! In-place request signing for HTTP client request types.

// self
use crate::{_prelude::*, sign::SignFuture};
#[cfg(feature = "reqwest")]
use crate::{
	error::SigningError,
	sign::{Headers, HttpMethod, Payload, SigningDelegate},
};

/// Signs an outbound request of a specific client type without the caller rebuilding it.
///
/// The trait is generic over the request so a delegate can serve several clients.
pub trait RequestSignerExt<Request>
where
	Self: Send + Sync,
{
	/// Adds the authentication headers to `request`, covering its URL, method, headers and
	/// buffered body. Streaming bodies are signed as `UNSIGNED-PAYLOAD`.
	fn sign_request<'a>(&'a self, request: &'a mut Request) -> SignFuture<'a, ()>;
}
#[cfg(feature = "reqwest")]
impl<D> RequestSignerExt<ReqwestRequest> for D
where
	D: ?Sized + SigningDelegate,
{
	fn sign_request<'a>(&'a self, request: &'a mut ReqwestRequest) -> SignFuture<'a, ()> {
		Box::pin(async move {
			let method = request.method().as_str().parse::<HttpMethod>()?;
			let url = request.url().clone();
			let headers = collect_headers(request.headers())?;
			let payload = match request.body() {
				None => Payload::Empty,
				Some(body) => match body.as_bytes() {
					Some(bytes) => Payload::Bytes(bytes.to_vec()),
					None => Payload::Unsigned,
				},
			};
			let signed = self.sign_headers(&url, method, &headers, &payload).await?;

			apply_headers(request.headers_mut(), &headers, signed)?;

			Ok(())
		})
	}
}

#[cfg(feature = "reqwest")]
fn collect_headers(map: &reqwest_header::HeaderMap) -> Result<Headers, SigningError> {
	let mut headers = Headers::new();

	for (name, value) in map {
		let value =
			value.to_str().map_err(|_| SigningError::InvalidHeader { name: name.to_string() })?;

		headers.append(name.as_str(), value);
	}

	Ok(headers)
}

#[cfg(feature = "reqwest")]
fn apply_headers(
	map: &mut reqwest_header::HeaderMap,
	original: &Headers,
	signed: Headers,
) -> Result<(), SigningError> {
	for (name, value) in signed {
		if original.get(&name) == Some(value.as_str()) {
			continue;
		}

		let header_name = reqwest_header::HeaderName::from_bytes(name.as_bytes())
			.map_err(|_| SigningError::InvalidHeader { name: name.clone() })?;
		let header_value = reqwest_header::HeaderValue::from_str(&value)
			.map_err(|_| SigningError::InvalidHeader { name })?;

		map.insert(header_name, header_value);
	}

	Ok(())
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		clock::FixedClock,
		credential::Credential,
		sign::{Signer, SignerConfig},
	};

	fn signer() -> Signer<Credential> {
		let config = SignerConfig::builder()
			.region("us-east-1")
			.service("execute-api")
			.clock(Arc::new(FixedClock(macros::datetime!(2024-05-01 08:00 UTC))))
			.build()
			.expect("Signer configuration should be valid.");

		Signer::new(config, example_credential())
	}

	#[tokio::test]
	async fn reqwest_request_gains_authorization_headers() {
		let client = reqwest::Client::new();
		let mut request = client
			.post("https://api.example.com/v1/items?page=2")
			.header("content-type", "application/json")
			.body("{\"name\":\"a\"}")
			.build()
			.expect("Request should build.");

		signer().sign_request(&mut request).await.expect("Signing should succeed.");

		let header = |name: &str| request.headers().get(name).and_then(|v| v.to_str().ok());

		assert_eq!(header("content-type"), Some("application/json"));
		assert_eq!(header("host"), Some("api.example.com"));
		assert_eq!(header("x-amz-date"), Some("20240501T080000Z"));
		assert!(header("authorization").is_some_and(|value| {
			value.contains("SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date")
		}));
	}

	#[tokio::test]
	async fn body_is_part_of_the_signature() {
		let client = reqwest::Client::new();
		let build = |body: &'static str| {
			client
				.put("https://api.example.com/v1/items")
				.body(body)
				.build()
				.expect("Request should build.")
		};
		let mut first = build("one");
		let mut second = build("two");

		signer().sign_request(&mut first).await.expect("Signing should succeed.");
		signer().sign_request(&mut second).await.expect("Signing should succeed.");

		assert_ne!(first.headers().get("authorization"), second.headers().get("authorization"));
	}
}
