//! Transport primitives for calls against the Medium REST API.
//!
//! The dispatch policy only depends on [`ApiHttpClient`]: it hands over a fully resolved
//! [`ApiRequest`] (method, absolute URL, bearer token, optional JSON body) and receives the raw
//! [`ApiResponse`]. Status classification and JSON decoding stay in the client so custom
//! transports only have to move bytes.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Content type sent and accepted on every call.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP methods used by the Medium API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
	/// Side-effect-free read.
	Get,
	/// Write.
	Post,
}
impl HttpMethod {
	/// Returns the wire name of the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request handed to an [`ApiHttpClient`].
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Absolute URL, query string included.
	pub url: Url,
	/// Bearer token for the `Authorization` header.
	pub bearer: TokenSecret,
	/// JSON payload for writes.
	pub body: Option<serde_json::Value>,
}
impl ApiRequest {
	/// Headers every transport must send, in `(name, value)` form.
	pub fn headers(&self) -> [(&'static str, String); 3] {
		[
			("Authorization", self.bearer.bearer_header()),
			("Content-Type", JSON_CONTENT_TYPE.into()),
			("Accept", JSON_CONTENT_TYPE.into()),
		]
	}
}

/// Captures metadata from an HTTP response for downstream error mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the API.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Raw response returned by an [`ApiHttpClient`].
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// Status and retry hints.
	pub metadata: ResponseMetadata,
	/// Undecoded body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response from a status code and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { metadata: ResponseMetadata { status, retry_after: None }, body: body.into() }
	}

	/// Attaches a Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
		self.metadata.retry_after = Some(retry_after);

		self
	}
}

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing Medium API calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// in-flight request of a client, and their futures must be `Send` so dispatch futures can hop
/// executors. Non-success statuses are not transport errors: return them as an
/// [`ApiResponse`] and let the client classify them.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and collects the full response.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client whose requests give up after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, crate::error::ConfigError> {
		let timeout = std::time::Duration::try_from(timeout)
			.map_err(crate::error::ConfigError::http_client_build)?;
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
			};
			let headers = request.headers();
			let mut builder = client.request(method, request.url);

			for (name, value) in headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = &request.body {
				builder = builder.json(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { metadata: ResponseMetadata { status, retry_after }, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(secs as i64));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
