//! Custom asynchronous resolvers and fallback chains.

// self
use crate::{
	_prelude::*,
	credential::{Credential, CredentialFuture, CredentialProvider},
	error::CredentialError,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Adapts an async closure into a [`CredentialProvider`].
///
/// Useful for metadata-service or STS lookups that live outside this crate.
#[derive(Clone)]
pub struct FnCredentialProvider<F>(F);
impl<F, Fut> FnCredentialProvider<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<Credential, CredentialError>>,
{
	/// Wraps `resolve`, which is invoked on every resolution.
	pub fn new(resolve: F) -> Self {
		Self(resolve)
	}
}
impl<F> Debug for FnCredentialProvider<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FnCredentialProvider(..)")
	}
}
impl<F, Fut> CredentialProvider for FnCredentialProvider<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<Credential, CredentialError>>,
{
	fn credential(&self) -> CredentialFuture<'_> {
		Box::pin((self.0)())
	}
}

/// Consults providers in order and returns the first credential that resolves.
#[derive(Clone, Default)]
pub struct ChainCredentialProvider {
	providers: Vec<Arc<dyn CredentialProvider>>,
}
impl ChainCredentialProvider {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a provider to the end of the chain.
	pub fn with(mut self, provider: impl 'static + CredentialProvider) -> Self {
		self.providers.push(Arc::new(provider));

		self
	}

	/// Appends an already shared provider.
	pub fn with_shared(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
		self.providers.push(provider);

		self
	}

	/// Number of providers in the chain.
	pub fn len(&self) -> usize {
		self.providers.len()
	}

	/// Returns `true` when the chain has no providers.
	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}
impl Debug for ChainCredentialProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ChainCredentialProvider").field("len", &self.providers.len()).finish()
	}
}
impl CredentialProvider for ChainCredentialProvider {
	fn credential(&self) -> CredentialFuture<'_> {
		const KIND: OpKind = OpKind::ResolveCredential;

		let span = OpSpan::new(KIND, "chain");

		Box::pin(span.instrument(async move {
			obs::record_op_outcome(KIND, OpOutcome::Attempt);

			let mut last = None;

			for provider in &self.providers {
				match provider.credential().await {
					Ok(credential) => {
						obs::record_op_outcome(KIND, OpOutcome::Success);

						return Ok(credential);
					},
					Err(err) => last = Some(err),
				}
			}

			obs::record_op_outcome(KIND, OpOutcome::Failure);

			Err(match last {
				Some(last) => CredentialError::ChainExhausted {
					attempts: self.providers.len(),
					last: Box::new(last),
				},
				None => CredentialError::Missing { provider: "chain" },
			})
		}))
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{_preludet::*, credential::EnvironmentCredentialProvider};

	#[tokio::test]
	async fn closure_provider_resolves_on_every_call() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let provider = FnCredentialProvider::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);

			async { Ok(example_credential()) }
		});

		provider.credential().await.expect("First resolution should succeed.");
		provider.credential().await.expect("Second resolution should succeed.");

		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn chain_falls_through_to_first_success() {
		let empty_env = EnvironmentCredentialProvider::with_prefix("NOPE").with_lookup(|_| None);
		let chain = ChainCredentialProvider::new().with(empty_env).with(example_credential());
		let credential =
			chain.credential().await.expect("Second provider should satisfy the chain.");

		assert_eq!(credential, example_credential());
		assert_eq!(chain.len(), 2);
	}

	#[tokio::test]
	async fn exhausted_chain_reports_last_failure() {
		let chain = ChainCredentialProvider::new()
			.with(FnCredentialProvider::new(|| async {
				Err(CredentialError::Missing { provider: "a" })
			}))
			.with(FnCredentialProvider::new(|| async {
				Err(CredentialError::Missing { provider: "b" })
			}));
		let err =
			chain.credential().await.expect_err("Every provider failing should fail the chain.");

		assert!(matches!(
			err,
			CredentialError::ChainExhausted { attempts: 2, ref last }
				if matches!(**last, CredentialError::Missing { provider: "b" })
		));
	}

	#[tokio::test]
	async fn empty_chain_is_missing() {
		let err = ChainCredentialProvider::new()
			.credential()
			.await
			.expect_err("An empty chain cannot resolve anything.");

		assert!(matches!(err, CredentialError::Missing { provider: "chain" }));
	}
}
