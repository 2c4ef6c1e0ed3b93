//! Tunables for [`MediumClient`](crate::client::MediumClient).

// self
use crate::{_prelude::*, cache::DEFAULT_TTL, error::ConfigError, rate_limit::RateLimiter};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.medium.com/v1";

/// Client configuration; every field has a production default.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// API root that endpoint paths are appended to.
	pub base_url: String,
	/// Lifetime of cached read responses.
	pub cache_ttl: Duration,
	/// Rate limiter capacity.
	pub max_tokens: u32,
	/// Rate limiter refill rate, in tokens per second.
	pub refill_per_second: f64,
	/// Per-request transport timeout.
	pub timeout: Duration,
}
impl ClientConfig {
	/// Overrides the API root.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	/// Overrides the cache lifetime.
	pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
		self.cache_ttl = ttl;

		self
	}

	/// Overrides the rate limiter capacity and refill rate.
	pub fn with_rate_limit(mut self, max_tokens: u32, refill_per_second: f64) -> Self {
		self.max_tokens = max_tokens;
		self.refill_per_second = refill_per_second;

		self
	}

	/// Overrides the transport timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	pub(crate) fn parsed_base_url(&self) -> Result<Url, ConfigError> {
		Ok(Url::parse(self.base_url.trim_end_matches('/'))?)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.into(),
			cache_ttl: DEFAULT_TTL,
			max_tokens: RateLimiter::DEFAULT_MAX_TOKENS,
			refill_per_second: RateLimiter::DEFAULT_REFILL_PER_SECOND,
			timeout: Duration::seconds(30),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_production_values() {
		let config = ClientConfig::default();

		assert_eq!(config.base_url, "https://api.medium.com/v1");
		assert_eq!(config.cache_ttl, Duration::minutes(5));
		assert_eq!(config.max_tokens, 10);
		assert_eq!(config.refill_per_second, 2.);
		assert_eq!(config.timeout, Duration::seconds(30));
	}

	#[test]
	fn invalid_base_url_is_a_config_error() {
		let err = ClientConfig::default()
			.with_base_url("not a url")
			.parsed_base_url()
			.expect_err("A relative base URL should be rejected.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
	}
}
