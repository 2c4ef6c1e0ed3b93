//! Gateway-level error types shared across the credential guard, transport, and dispatch layers.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used to carry foreign failure causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
///
/// The response cache and the rate limiter never fail; every variant originates in the
/// credential guard, the transport, or the remote API.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Remote API answered with a failure or an unreadable body.
	#[error(transparent)]
	Remote(#[from] RemoteError),

	/// Token issuance failed.
	#[error("Medium authentication failed: {source}.")]
	AuthenticationFailed {
		/// Failure reported by the token issuer.
		#[source]
		source: BoxError,
	},
	/// An access token was requested before `authenticate()` succeeded.
	#[error("Authentication required: call authenticate() first.")]
	AuthenticationRequired,
}
impl Error {
	/// Wraps an issuer failure inside [`Error::AuthenticationFailed`].
	pub fn authentication_failed(src: impl Into<BoxError>) -> Self {
		Self::AuthenticationFailed { source: src.into() }
	}
}

/// Configuration and validation failures raised while assembling the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required credential is absent (or empty) in the supplied configuration.
	#[error("Missing {key} in the credential configuration.")]
	MissingCredential {
		/// Name of the missing secret.
		key: &'static str,
	},
	/// Base URL cannot be parsed or joined with an endpoint path.
	#[error("API base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidBaseUrl { source }
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Medium API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures reported by the remote API itself.
#[derive(Debug, ThisError)]
pub enum RemoteError {
	/// The API answered with a non-success status code.
	#[error("Medium API returned HTTP {status}: {message}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Preview of the response body.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// The API answered with a body that is not the expected JSON.
	#[error("Medium API returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_credential_names_the_key() {
		let err: Error = ConfigError::MissingCredential { key: "MEDIUM_CLIENT_SECRET" }.into();

		assert!(matches!(err, Error::Config(ConfigError::MissingCredential { .. })));
		assert!(err.to_string().contains("MEDIUM_CLIENT_SECRET"));
	}

	#[test]
	fn authentication_failure_keeps_its_source() {
		let cause = std::io::Error::other("issuer offline");
		let err = Error::authentication_failed(cause);
		let source = StdError::source(&err)
			.expect("Authentication failures should expose the issuer error as their source.");

		assert_eq!(source.to_string(), "issuer offline");
		assert!(err.to_string().contains("issuer offline"));
	}

	#[test]
	fn remote_status_renders_code_and_preview() {
		let err: Error = RemoteError::Status {
			status: 503,
			message: "upstream unavailable".into(),
			retry_after: None,
		}
		.into();

		assert_eq!(err.to_string(), "Medium API returned HTTP 503: upstream unavailable.");
	}
}
