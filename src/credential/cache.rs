//! Caching wrapper that reuses a resolved credential until it nears expiration.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	credential::{Credential, CredentialFuture, CredentialProvider},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Caches the credential returned by an inner provider.
///
/// Credentials without an expiration are cached indefinitely. Expiring credentials are
/// re-resolved once fewer than `refresh_window` remain. Concurrent callers that miss the cache
/// share a single resolution through an async guard, so the inner provider is never hit twice
/// for the same refresh.
pub struct CachedCredentialProvider<P>
where
	P: ?Sized,
{
	inner: Arc<P>,
	cached: RwLock<Option<Credential>>,
	refresh_guard: AsyncMutex<()>,
	refresh_window: Duration,
	clock: Arc<dyn Clock>,
}
impl<P> CachedCredentialProvider<P>
where
	P: ?Sized + CredentialProvider,
{
	const DEFAULT_REFRESH_WINDOW: Duration = Duration::minutes(5);

	/// Wraps `inner` with the default five-minute refresh window.
	pub fn new(inner: P) -> Self
	where
		P: Sized,
	{
		Self::from_shared(Arc::new(inner))
	}

	/// Same as [`CachedCredentialProvider::new`] for a provider that is already shared.
	pub fn from_shared(inner: Arc<P>) -> Self {
		Self {
			inner,
			cached: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
			refresh_window: Self::DEFAULT_REFRESH_WINDOW,
			clock: Arc::new(SystemClock),
		}
	}

	/// Overrides how long before expiration a credential is considered stale.
	pub fn with_refresh_window(mut self, window: Duration) -> Self {
		self.refresh_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}

	/// Overrides the clock used for freshness checks.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Drops the cached credential so the next call resolves again.
	pub fn invalidate(&self) {
		*self.cached.write() = None;
	}

	/// Returns the cached credential if it is still fresh at `now`.
	pub fn cached_at(&self, now: OffsetDateTime) -> Option<Credential> {
		self.cached.read().as_ref().filter(|credential| self.is_fresh(credential, now)).cloned()
	}

	fn is_fresh(&self, credential: &Credential, now: OffsetDateTime) -> bool {
		match credential.expiration {
			Some(expiration) => expiration - now > self.refresh_window,
			None => true,
		}
	}
}
impl<P> Debug for CachedCredentialProvider<P>
where
	P: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedCredentialProvider")
			.field("cached", &self.cached.read().is_some())
			.field("refresh_window", &self.refresh_window)
			.finish()
	}
}
impl<P> CredentialProvider for CachedCredentialProvider<P>
where
	P: ?Sized + CredentialProvider,
{
	fn credential(&self) -> CredentialFuture<'_> {
		const KIND: OpKind = OpKind::ResolveCredential;

		let span = OpSpan::new(KIND, "cached");

		Box::pin(span.instrument(async move {
			if let Some(credential) = self.cached_at(self.clock.now()) {
				return Ok(credential);
			}

			let _singleflight = self.refresh_guard.lock().await;

			if let Some(credential) = self.cached_at(self.clock.now()) {
				return Ok(credential);
			}

			obs::record_op_outcome(KIND, OpOutcome::Attempt);

			let resolved = self.inner.credential().await;

			obs::record_op_outcome(KIND, OpOutcome::of(&resolved));

			if let Ok(credential) = &resolved {
				*self.cached.write() = Some(credential.clone());
			}

			resolved
		}))
	}
}
