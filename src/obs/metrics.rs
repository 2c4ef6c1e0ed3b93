// self
use crate::obs::{Operation, RequestOutcome};

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(operation: Operation, outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"medium_gateway_request_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Records an authentication state transition via the global metrics recorder (when enabled).
pub fn record_auth_event(event: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("medium_gateway_auth_events_total", "event" => event).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = event;
	}
}
