//! Optional observability helpers for pagination, signing, and credential resolution.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `cloud_paginator.op` with the `op` and
//!   `stage` (call site) fields, plus a debug event per fetched page.
//! - Enable `metrics` to increment the `cloud_paginator_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`, and `cloud_paginator_stop_total`
//!   labeled by the reason a pagination run ended.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// One paginator step.
	Paginate,
	/// Presigned URL generation.
	SignUrl,
	/// Header signing.
	SignHeaders,
	/// Credential resolution through a provider.
	ResolveCredential,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Paginate => "paginate",
			OpKind::SignUrl => "sign_url",
			OpKind::SignHeaders => "sign_headers",
			OpKind::ResolveCredential => "resolve_credential",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto [`OpOutcome::Success`] or [`OpOutcome::Failure`].
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => OpOutcome::Success,
			Err(_) => OpOutcome::Failure,
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
