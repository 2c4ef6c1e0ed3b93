// self
use crate::{_prelude::*, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span builder used by the dispatch policy.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: Operation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("medium_gateway.request", operation = operation.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
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

/// Logs a failed remote call before the error is handed back to the caller.
pub fn log_request_failure(operation: Operation, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(operation = operation.as_str(), error = %error, "Medium API request failed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, error);
	}
}

/// Logs a rate-limit pause.
pub fn log_rate_limit_wait(tokens: u32, wait: Duration) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			tokens,
			wait_ms = wait.whole_milliseconds() as u64,
			"Rate limit reached; waiting."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (tokens, wait);
	}
}

/// Logs a successful authentication.
pub fn log_auth_success(at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(timestamp = %at, "Medium authentication succeeded.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = at;
	}
}

/// Logs a security alert raised by the credential guard.
pub fn log_security_alert(message: &str, at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(timestamp = %at, "Security alert: {message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (message, at);
	}
}
