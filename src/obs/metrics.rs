// self
use crate::{
	obs::{OpKind, OpOutcome},
	paginate::StopReason,
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cloud_paginator_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records why a pagination run ended.
pub fn record_stop(reason: StopReason) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("cloud_paginator_stop_total", "reason" => reason.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = reason;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_op_outcome(OpKind::SignHeaders, OpOutcome::Failure);
		record_stop(StopReason::TokenRepeated);
	}
}
