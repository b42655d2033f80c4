//! Credential provider backed by process environment variables.

// self
use crate::{
	_prelude::*,
	credential::{Credential, CredentialFuture, CredentialProvider},
	error::CredentialError,
	id::AccessKeyId,
};

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads `{PREFIX}_ACCESS_KEY_ID`, `{PREFIX}_SECRET_ACCESS_KEY`, and the optional
/// `{PREFIX}_SESSION_TOKEN` at resolution time. The prefix defaults to `AWS`.
#[derive(Clone)]
pub struct EnvironmentCredentialProvider {
	prefix: String,
	lookup: Lookup,
}
impl EnvironmentCredentialProvider {
	const DEFAULT_PREFIX: &'static str = "AWS";

	/// Creates a provider reading the `AWS_*` variables.
	pub fn new() -> Self {
		Self::with_prefix(Self::DEFAULT_PREFIX)
	}

	/// Creates a provider reading `{prefix}_*` variables.
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self { prefix: prefix.into(), lookup: Arc::new(|name: &str| std::env::var(name).ok()) }
	}

	/// Replaces the variable source, e.g. with a fixed map in tests.
	pub fn with_lookup<F>(mut self, lookup: F) -> Self
	where
		F: 'static + Send + Sync + Fn(&str) -> Option<String>,
	{
		self.lookup = Arc::new(lookup);

		self
	}

	fn variable(&self, suffix: &str) -> String {
		format!("{}_{suffix}", self.prefix)
	}

	fn read(&self, suffix: &str) -> Option<String> {
		(self.lookup)(&self.variable(suffix)).filter(|value| !value.is_empty())
	}

	fn require(&self, suffix: &str) -> Result<String, CredentialError> {
		self.read(suffix)
			.ok_or_else(|| CredentialError::Environment { variable: self.variable(suffix) })
	}

	fn resolve_now(&self) -> Result<Credential, CredentialError> {
		let access_key_id = AccessKeyId::new(self.require("ACCESS_KEY_ID")?)?;
		let credential = Credential::new(access_key_id, self.require("SECRET_ACCESS_KEY")?);

		Ok(match self.read("SESSION_TOKEN") {
			Some(token) => credential.with_session_token(token),
			None => credential,
		})
	}
}
impl Default for EnvironmentCredentialProvider {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for EnvironmentCredentialProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EnvironmentCredentialProvider").field("prefix", &self.prefix).finish()
	}
}
impl CredentialProvider for EnvironmentCredentialProvider {
	fn credential(&self) -> CredentialFuture<'_> {
		let resolved = self.resolve_now();

		Box::pin(async move { resolved })
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn provider(vars: &[(&str, &str)]) -> EnvironmentCredentialProvider {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();

		EnvironmentCredentialProvider::with_prefix("TEST")
			.with_lookup(move |name| vars.get(name).cloned())
	}

	#[tokio::test]
	async fn reads_key_pair_and_session_token() {
		let credential = provider(&[
			("TEST_ACCESS_KEY_ID", "AKIDEXAMPLE"),
			("TEST_SECRET_ACCESS_KEY", "secret"),
			("TEST_SESSION_TOKEN", "session"),
		])
		.credential()
		.await
		.expect("Complete environment should resolve.");

		assert_eq!(credential.access_key_id.as_ref(), "AKIDEXAMPLE");
		assert_eq!(credential.secret_access_key.expose(), "secret");
		assert_eq!(credential.session_token.as_ref().map(|t| t.expose()), Some("session"));
	}

	#[tokio::test]
	async fn missing_or_empty_variables_name_the_variable() {
		let err = provider(&[("TEST_ACCESS_KEY_ID", "AKIDEXAMPLE"), ("TEST_SECRET_ACCESS_KEY", "")])
			.credential()
			.await
			.expect_err("An empty secret should be rejected.");

		assert!(matches!(
			err,
			CredentialError::Environment { ref variable } if variable == "TEST_SECRET_ACCESS_KEY"
		));
	}

	#[tokio::test]
	async fn malformed_access_key_is_rejected() {
		let vars = [("TEST_ACCESS_KEY_ID", "AKID EXAMPLE"), ("TEST_SECRET_ACCESS_KEY", "s")];
		let err = provider(&vars)
			.credential()
			.await
			.expect_err("Whitespace in the access key should be rejected.");

		assert!(matches!(err, CredentialError::InvalidAccessKeyId(_)));
	}

	#[test]
	fn default_prefix_is_aws() {
		assert_eq!(
			EnvironmentCredentialProvider::new().variable("ACCESS_KEY_ID"),
			"AWS_ACCESS_KEY_ID"
		);
	}
}
