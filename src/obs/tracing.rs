// self
use crate::{_prelude::*, obs::OpKind, paginate::StopReason};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder shared by paginator steps and signing calls.
///
/// Operations receive a clone through [`OperationContext`](crate::paginate::OperationContext)
/// so transport code can log inside the same span.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("cloud_paginator.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a fetched page; `stop` is set when the page ends the run.
pub fn trace_page(page: usize, stop: Option<StopReason>) {
	#[cfg(feature = "tracing")]
	{
		let stop = stop.map_or("continue", StopReason::as_str);

		tracing::debug!(page, stop, "page fetched");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (page, stop);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn page_events_accept_every_outcome() {
		trace_page(0, None);
		trace_page(1, Some(StopReason::TokenAbsent));
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OpSpan::new(OpKind::Paginate, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
