//! Serde models for the payloads the Medium API returns.
//!
//! The dispatch policy caches and returns raw JSON; these models are for callers that want
//! typed access (see [`MediumClient::user_profile_typed`](crate::client::MediumClient)).

// self
use crate::_prelude::*;

/// Authenticated user as returned by `GET /me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediumUser {
	/// User identifier.
	pub id: String,
	/// Handle without the leading `@`.
	pub username: String,
	/// Display name.
	pub name: String,
	/// Profile URL.
	pub url: String,
	/// Avatar URL.
	pub image_url: String,
}

/// Publication the user belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediumPublication {
	/// Publication identifier.
	pub id: String,
	/// Publication name.
	pub name: String,
	/// Short description.
	#[serde(default)]
	pub description: String,
	/// Publication URL.
	pub url: String,
	/// Logo URL.
	#[serde(default)]
	pub image_url: String,
}

/// Article returned by search and publish calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediumArticle {
	/// Article identifier.
	pub id: String,
	/// Title.
	pub title: String,
	/// Body, when the endpoint includes it.
	#[serde(default)]
	pub content: String,
	/// Author identifier.
	pub author_id: String,
	/// Tags attached to the article.
	#[serde(default)]
	pub tags: Vec<String>,
	/// Publication instant in Unix milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub published_at: Option<i64>,
	/// Canonical URL.
	pub url: String,
	/// Clap count, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub claps: Option<u64>,
	/// View count, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub views: Option<u64>,
}
impl MediumArticle {
	/// Publication instant, if reported and representable.
	pub fn published_at(&self) -> Option<OffsetDateTime> {
		let millis = self.published_at?;

		OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).ok()
	}
}

/// Pagination hints attached to list responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
	/// Total number of items.
	pub total: Option<u64>,
	/// Current page.
	pub page: Option<u64>,
	/// Page size.
	pub per_page: Option<u64>,
}

/// `{ "data": …, "meta": … }` wrapper used by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
	/// Payload.
	pub data: T,
	/// Pagination hints, when present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<PageMeta>,
}
