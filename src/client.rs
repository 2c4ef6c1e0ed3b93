//! Dispatch policy for Medium API operations.
//!
//! Every call runs the same pipeline: take one token from the rate limiter (waiting if the
//! bucket is empty), serve `GET` requests from the response cache when a live entry exists,
//! otherwise attach the bearer token from the [`CredentialGuard`] and call the API. Successful
//! reads are cached under `METHOD:endpoint` for the configured TTL; writes never touch the
//! cache. Failures are logged and returned unchanged, with no retry and no stale fallback.
//!
//! The limiter is charged before the cache lookup, so cache hits count against the budget.

pub mod config;
pub mod params;

pub use config::*;
pub use params::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::CredentialGuard,
	cache::{CacheStats, ExpiringCache},
	clock::{Clock, SystemClock},
	error::{ConfigError, RemoteError, TransportError},
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpMethod},
	obs::{self, Operation, RequestOutcome, RequestSpan},
	rate_limit::RateLimiter,
	types::{ApiEnvelope, MediumArticle, MediumPublication, MediumUser},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const BODY_PREVIEW_LIMIT: usize = 512;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestMediumClient = MediumClient<ReqwestHttpClient>;

/// Credential-gated Medium API client with a response cache and a rate limiter.
///
/// Each client owns its cache and limiter; clones of the surrounding `Arc` share them, separate
/// clients never do.
pub struct MediumClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for every outbound call.
	pub http_client: Arc<C>,
	guard: Arc<CredentialGuard>,
	cache: ExpiringCache<serde_json::Value>,
	limiter: RateLimiter,
	base_url: Url,
}
impl<C> MediumClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		guard: Arc<CredentialGuard>,
		http_client: impl Into<Arc<C>>,
		config: &ClientConfig,
	) -> Result<Self> {
		Self::with_clock(guard, http_client, config, Arc::new(SystemClock))
	}

	/// Creates a client whose cache and limiter read time from `clock`.
	pub fn with_clock(
		guard: Arc<CredentialGuard>,
		http_client: impl Into<Arc<C>>,
		config: &ClientConfig,
		clock: Arc<dyn Clock>,
	) -> Result<Self> {
		let base_url = config.parsed_base_url()?;
		let cache = ExpiringCache::with_clock(clock.clone()).with_default_ttl(config.cache_ttl);
		let limiter = RateLimiter::with_clock(config.max_tokens, config.refill_per_second, clock);

		Ok(Self { http_client: http_client.into(), guard, cache, limiter, base_url })
	}

	/// Credential guard supplying bearer tokens.
	pub fn guard(&self) -> &CredentialGuard {
		&self.guard
	}

	/// Obtains a bearer token through the credential guard.
	pub async fn authenticate(&self) -> Result<()> {
		self.guard.authenticate().await
	}

	/// Publishes an article as a Markdown draft (`POST /publications`).
	pub async fn publish_article(&self, params: &PublishArticleParams) -> Result<serde_json::Value> {
		self.dispatch(
			Operation::PublishArticle,
			HttpMethod::Post,
			"/publications",
			Some(params.to_payload()),
		)
		.await
	}

	/// Lists the user's publications (`GET /publications`).
	pub async fn get_user_publications(&self) -> Result<serde_json::Value> {
		self.dispatch(Operation::UserPublications, HttpMethod::Get, "/publications", None).await
	}

	/// Searches articles (`GET /articles?…`).
	pub async fn search_articles(&self, params: &SearchArticlesParams) -> Result<serde_json::Value> {
		self.dispatch(Operation::SearchArticles, HttpMethod::Get, &params.endpoint(), None).await
	}

	/// Lists the user's drafts (`GET /drafts`).
	pub async fn get_drafts(&self) -> Result<serde_json::Value> {
		self.dispatch(Operation::Drafts, HttpMethod::Get, "/drafts", None).await
	}

	/// Fetches the authenticated user's profile (`GET /me`).
	pub async fn get_user_profile(&self) -> Result<serde_json::Value> {
		self.dispatch(Operation::UserProfile, HttpMethod::Get, "/me", None).await
	}

	/// Creates a Markdown draft (`POST /drafts`).
	pub async fn create_draft(&self, params: &CreateDraftParams) -> Result<serde_json::Value> {
		self.dispatch(Operation::CreateDraft, HttpMethod::Post, "/drafts", Some(params.to_payload()))
			.await
	}

	/// Typed variant of [`get_user_profile`](Self::get_user_profile).
	pub async fn user_profile_typed(&self) -> Result<ApiEnvelope<MediumUser>> {
		decode(self.get_user_profile().await?)
	}

	/// Typed variant of [`get_user_publications`](Self::get_user_publications).
	pub async fn publications_typed(&self) -> Result<ApiEnvelope<Vec<MediumPublication>>> {
		decode(self.get_user_publications().await?)
	}

	/// Typed variant of [`search_articles`](Self::search_articles).
	pub async fn search_articles_typed(
		&self,
		params: &SearchArticlesParams,
	) -> Result<ApiEnvelope<Vec<MediumArticle>>> {
		decode(self.search_articles(params).await?)
	}

	/// Drops every cached response.
	pub fn clear_cache(&self) {
		self.cache.clear();
	}

	/// Sweeps expired responses and reports what remains cached.
	pub fn cache_stats(&self) -> CacheStats {
		self.cache.stats()
	}

	/// Whole rate-limit tokens currently available.
	pub fn available_tokens(&self) -> u32 {
		self.limiter.available_tokens()
	}

	/// Refills the rate limiter to capacity.
	pub fn reset_rate_limit(&self) {
		self.limiter.reset();
	}

	/// Runs one operation through the limiter → cache → remote → cache-fill pipeline.
	///
	/// `GET` responses are cached under `GET:<endpoint>`; other methods always reach the API.
	pub async fn dispatch(
		&self,
		operation: Operation,
		method: HttpMethod,
		endpoint: &str,
		body: Option<serde_json::Value>,
	) -> Result<serde_json::Value> {
		let span = RequestSpan::new(operation, "dispatch");

		obs::record_request_outcome(operation, RequestOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.limiter.consume(1).await;

				let key = (method == HttpMethod::Get).then(|| cache_key(method, endpoint));

				if let Some(cached) = key.as_deref().and_then(|key| self.cache.get(key)) {
					obs::record_request_outcome(operation, RequestOutcome::CacheHit);

					return Ok(cached);
				}

				let value = self.call(method, endpoint, body).await?;

				obs::record_request_outcome(operation, RequestOutcome::Success);

				if let Some(key) = key {
					self.cache.set(key, value.clone());
				}

				Ok::<_, Error>(value)
			})
			.await;

		if let Err(e) = &result {
			obs::log_request_failure(operation, e);
			obs::record_request_outcome(operation, RequestOutcome::Failure);
		}

		result
	}

	async fn call(
		&self,
		method: HttpMethod,
		endpoint: &str,
		body: Option<serde_json::Value>,
	) -> Result<serde_json::Value> {
		let request = ApiRequest {
			method,
			url: self.endpoint_url(endpoint)?,
			bearer: self.guard.access_token()?,
			body,
		};
		let response =
			self.http_client.execute(request).await.map_err(TransportError::network)?;

		parse_response(response)
	}

	fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
		let raw = format!("{}{endpoint}", self.base_url.as_str().trim_end_matches('/'));

		Url::parse(&raw).map_err(|e| ConfigError::from(e).into())
	}
}
#[cfg(feature = "reqwest")]
impl MediumClient<ReqwestHttpClient> {
	/// Creates a client backed by a reqwest transport honoring `config.timeout`.
	pub fn new(guard: Arc<CredentialGuard>, config: &ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(config.timeout)?;

		Self::with_http_client(guard, http_client, config)
	}
}
impl<C> Debug for MediumClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MediumClient")
			.field("base_url", &self.base_url.as_str())
			.field("guard", &self.guard)
			.field("cache", &self.cache)
			.field("limiter", &self.limiter)
			.finish()
	}
}

/// Cache key for a request: `METHOD:endpoint`, query string included.
pub fn cache_key(method: HttpMethod, endpoint: &str) -> String {
	format!("{method}:{endpoint}")
}

fn parse_response(response: ApiResponse) -> Result<serde_json::Value> {
	let status = response.metadata.status;

	if !response.metadata.is_success() {
		return Err(RemoteError::Status {
			status,
			message: body_preview(&response.body),
			retry_after: response.metadata.retry_after,
		}
		.into());
	}
	if response.body.iter().all(u8::is_ascii_whitespace) {
		return Ok(serde_json::Value::Null);
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| RemoteError::Decode { source, status: Some(status) }.into())
}

fn decode<T>(value: serde_json::Value) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value)
		.map_err(|source| RemoteError::Decode { source, status: None }.into())
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let trimmed = text.trim();

	if trimmed.is_empty() {
		return "empty response body".into();
	}

	trimmed.chars().take(BODY_PREVIEW_LIMIT).collect()
}
