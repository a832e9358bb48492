// self
use crate::obs::{ApiOp, CacheOutcome, OpOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(op: ApiOp, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"apliiq_client_request_total",
			"op" => op.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}

/// Records a cache lookup outcome for a cache-aware read (when enabled).
pub fn record_cache_outcome(op: ApiOp, outcome: CacheOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"apliiq_client_cache_total",
			"op" => op.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}

/// Records an order accepted with HTTP 202 (when enabled).
pub fn record_order_accepted() {
	#[cfg(feature = "metrics")]
	metrics::counter!("apliiq_client_order_accepted_total").increment(1);
}
