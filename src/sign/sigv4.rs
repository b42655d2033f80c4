//! Pure AWS Signature Version 4 computations.
//!
//! Everything here is a deterministic function of the request, the credential, and the
//! signing instant: identical inputs produce byte-identical output.

// crates.io
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};
use time::{UtcOffset, macros::format_description};
// self
use crate::{
	_prelude::*,
	credential::Credential,
	error::SigningError,
	sign::{Headers, HttpMethod, Payload, SigningSettings},
};

type HmacSha256 = Hmac<Sha256>;

// Everything outside `A-Z a-z 0-9 - _ . ~`.
const URI_RESERVED: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Algorithm identifier placed in the authorization material.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
/// Payload hash marker for bodies excluded from the signature.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";
/// Longest validity a presigned URL may carry.
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::days(7);

const SCOPE_TERMINATOR: &str = "aws4_request";
// Rewritten by proxies and SDK middleware after signing.
const UNSIGNED_HEADERS: &[&str] = &["authorization", "user-agent", "x-amzn-trace-id"];

/// Request description shared by both signing modes.
#[derive(Clone, Copy, Debug)]
pub struct SigningParams<'a> {
	/// Region in the credential scope.
	pub region: &'a str,
	/// Service name in the credential scope.
	pub service: &'a str,
	/// Request method.
	pub method: HttpMethod,
	/// Full request URL, including any query string.
	pub url: &'a Url,
	/// Caller headers; all of them are signed except a few proxy-managed ones.
	pub headers: &'a Headers,
	/// Canonicalization switches.
	pub settings: SigningSettings,
}

/// Returns `params.headers` plus `host`, `x-amz-date`, `x-amz-content-sha256` (if enabled),
/// `x-amz-security-token` (if the credential carries one) and `authorization`.
pub fn sign_headers(
	params: &SigningParams<'_>,
	payload: &Payload,
	credential: &Credential,
	instant: OffsetDateTime,
) -> Result<Headers, SigningError> {
	let stamp = Stamp::at(instant)?;
	let host = host_header(params.url)?;
	let payload_hash = payload.sha256_hex();
	let mut headers = params.headers.clone();

	if !headers.contains("host") {
		headers.insert("host", host);
	}

	headers.insert("x-amz-date", stamp.amz_date.as_str());

	if params.settings.content_sha256_header {
		headers.insert("x-amz-content-sha256", payload_hash.as_str());
	}
	if let Some(token) = &credential.session_token {
		headers.insert("x-amz-security-token", token.expose());
	}

	let query = canonical_query(
		params.url.query_pairs().map(|(name, value)| (name.into_owned(), value.into_owned())),
	);
	let canonical = CanonicalRequest::new(params, &query, &headers, &payload_hash);
	let scope = stamp.scope(params);
	let signature = signature(credential, &stamp, params, &scope, &canonical)?;

	headers.insert(
		"authorization",
		format!(
			"{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
			credential.access_key_id, canonical.signed_headers
		),
	);

	Ok(headers)
}

/// Returns `params.url` with the `X-Amz-*` authentication query parameters appended.
///
/// `expires` must be between one second and [`MAX_PRESIGN_EXPIRY`] inclusive.
pub fn presign_url(
	params: &SigningParams<'_>,
	expires: Duration,
	credential: &Credential,
	instant: OffsetDateTime,
) -> Result<Url, SigningError> {
	let seconds = expires.whole_seconds();

	if !(1..=MAX_PRESIGN_EXPIRY.whole_seconds()).contains(&seconds) {
		return Err(SigningError::InvalidExpiry { seconds });
	}

	let stamp = Stamp::at(instant)?;
	let host = host_header(params.url)?;
	let mut headers = params.headers.clone();

	if !headers.contains("host") {
		headers.insert("host", host);
	}

	let scope = stamp.scope(params);
	let mut pairs = params
		.url
		.query_pairs()
		.filter(|(name, _)| name != "X-Amz-Signature")
		.map(|(name, value)| (name.into_owned(), value.into_owned()))
		.collect::<Vec<_>>();

	pairs.push(("X-Amz-Algorithm".into(), ALGORITHM.into()));
	pairs.push(("X-Amz-Credential".into(), format!("{}/{scope}", credential.access_key_id)));
	pairs.push(("X-Amz-Date".into(), stamp.amz_date.clone()));
	pairs.push(("X-Amz-Expires".into(), seconds.to_string()));
	pairs.push(("X-Amz-SignedHeaders".into(), signed_header_names(&headers)));

	if let Some(token) = &credential.session_token {
		pairs.push(("X-Amz-Security-Token".into(), token.expose().to_owned()));
	}

	let query = canonical_query(pairs);
	let canonical = CanonicalRequest::new(params, &query, &headers, UNSIGNED_PAYLOAD);
	let signature = signature(credential, &stamp, params, &scope, &canonical)?;
	let mut url = params.url.clone();

	url.set_query(Some(&format!("{query}&X-Amz-Signature={signature}")));

	Ok(url)
}

/// Derives the date/region/service scoped HMAC key.
pub fn derive_signing_key(
	secret_access_key: &str,
	date: &str,
	region: &str,
	service: &str,
) -> Result<Vec<u8>, SigningError> {
	let k_date = hmac_sha256(format!("AWS4{secret_access_key}").as_bytes(), date.as_bytes())?;
	let k_region = hmac_sha256(&k_date, region.as_bytes())?;
	let k_service = hmac_sha256(&k_region, service.as_bytes())?;

	hmac_sha256(&k_service, SCOPE_TERMINATOR.as_bytes())
}

/// Percent-encodes everything except the unreserved set `A-Z a-z 0-9 - _ . ~`.
pub fn uri_encode(input: &[u8]) -> String {
	percent_encoding::percent_encode(input, URI_RESERVED).to_string()
}

struct Stamp {
	amz_date: String,
	date: String,
}
impl Stamp {
	fn at(instant: OffsetDateTime) -> Result<Self, SigningError> {
		let utc = instant.to_offset(UtcOffset::UTC);

		Ok(Self {
			amz_date: utc
				.format(format_description!("[year][month][day]T[hour][minute][second]Z"))?,
			date: utc.format(format_description!("[year][month][day]"))?,
		})
	}

	fn scope(&self, params: &SigningParams<'_>) -> String {
		format!("{}/{}/{}/{SCOPE_TERMINATOR}", self.date, params.region, params.service)
	}
}

struct CanonicalRequest {
	text: String,
	signed_headers: String,
}
impl CanonicalRequest {
	fn new(params: &SigningParams<'_>, query: &str, headers: &Headers, payload_hash: &str) -> Self {
		let mut canonical_headers = String::new();

		for (name, value) in signable(headers) {
			canonical_headers.push_str(name);
			canonical_headers.push(':');
			canonical_headers.push_str(&value.split_whitespace().collect::<Vec<_>>().join(" "));
			canonical_headers.push('\n');
		}

		let signed_headers = signed_header_names(headers);
		let text = format!(
			"{}\n{}\n{query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}",
			params.method,
			canonical_uri(params.url, params.settings.double_encode_path),
		);

		Self { text, signed_headers }
	}
}

fn signature(
	credential: &Credential,
	stamp: &Stamp,
	params: &SigningParams<'_>,
	scope: &str,
	canonical: &CanonicalRequest,
) -> Result<String, SigningError> {
	let string_to_sign = format!(
		"{ALGORITHM}\n{}\n{scope}\n{}",
		stamp.amz_date,
		hex::encode(Sha256::digest(canonical.text.as_bytes()))
	);
	let key = derive_signing_key(
		credential.secret_access_key.expose(),
		&stamp.date,
		params.region,
		params.service,
	)?;

	Ok(hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
	let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SigningError::SigningKey)?;

	mac.update(data);

	Ok(mac.finalize().into_bytes().to_vec())
}

fn host_header(url: &Url) -> Result<String, SigningError> {
	let host = url.host_str().ok_or_else(|| SigningError::MissingHost { url: url.to_string() })?;

	Ok(match url.port() {
		Some(port) => format!("{host}:{port}"),
		None => host.to_owned(),
	})
}

fn signable(headers: &Headers) -> impl Iterator<Item = (&str, &str)> {
	headers.iter().filter(|(name, _)| !UNSIGNED_HEADERS.contains(name))
}

fn signed_header_names(headers: &Headers) -> String {
	signable(headers).map(|(name, _)| name).collect::<Vec<_>>().join(";")
}

fn canonical_uri(url: &Url, double_encode: bool) -> String {
	let path = url.path();

	if path.is_empty() {
		return "/".into();
	}

	path.split('/')
		.map(|segment| {
			let decoded = percent_encoding::percent_decode_str(segment).collect::<Vec<_>>();
			let once = uri_encode(&decoded);

			if double_encode { uri_encode(once.as_bytes()) } else { once }
		})
		.collect::<Vec<_>>()
		.join("/")
}

fn canonical_query(pairs: impl IntoIterator<Item = (String, String)>) -> String {
	let mut encoded = pairs
		.into_iter()
		.map(|(name, value)| (uri_encode(name.as_bytes()), uri_encode(value.as_bytes())))
		.collect::<Vec<_>>();

	encoded.sort();

	encoded.into_iter().map(|(name, value)| format!("{name}={value}")).collect::<Vec<_>>().join("&")
}
