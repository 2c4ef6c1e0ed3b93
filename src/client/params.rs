//! Request parameters and JSON payloads for the write and search operations.

// self
use crate::_prelude::*;

/// Content format sent with every write.
pub const CONTENT_FORMAT: &str = "markdown";
/// Publish status sent with [`PublishArticleParams`].
pub const PUBLISH_STATUS: &str = "draft";

/// Parameters for [`MediumClient::publish_article`](crate::client::MediumClient::publish_article).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishArticleParams {
	/// Article title.
	pub title: String,
	/// Markdown body.
	pub content: String,
	/// Optional tags.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	/// Optional target publication.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub publication_id: Option<String>,
}
impl PublishArticleParams {
	/// JSON body posted to `/publications`.
	pub fn to_payload(&self) -> serde_json::Value {
		serde_json::to_value(PublishPayload {
			title: &self.title,
			content_format: CONTENT_FORMAT,
			content: &self.content,
			tags: self.tags.as_deref(),
			publish_status: PUBLISH_STATUS,
			publication_id: self.publication_id.as_deref(),
		})
		.unwrap_or_default()
	}
}

/// Parameters for [`MediumClient::create_draft`](crate::client::MediumClient::create_draft).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftParams {
	/// Draft title.
	pub title: String,
	/// Markdown body.
	pub content: String,
	/// Optional tags.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
}
impl CreateDraftParams {
	/// JSON body posted to `/drafts`.
	pub fn to_payload(&self) -> serde_json::Value {
		serde_json::to_value(DraftPayload {
			title: &self.title,
			content_format: CONTENT_FORMAT,
			content: &self.content,
			tags: self.tags.as_deref(),
		})
		.unwrap_or_default()
	}
}

/// Filters for [`MediumClient::search_articles`](crate::client::MediumClient::search_articles).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArticlesParams {
	/// Keywords, each sent as its own `q` parameter.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub keywords: Option<Vec<String>>,
	/// Restricts results to one publication.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub publication_id: Option<String>,
	/// Tags, each sent as its own `tag` parameter.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
}
impl SearchArticlesParams {
	/// Endpoint path with the form-encoded query, e.g. `/articles?q=rust&tag=async`.
	///
	/// Without any filter the query string is omitted.
	pub fn endpoint(&self) -> String {
		let mut query = url::form_urlencoded::Serializer::new(String::new());

		for keyword in self.keywords.iter().flatten() {
			query.append_pair("q", keyword);
		}
		if let Some(publication_id) = &self.publication_id {
			query.append_pair("publicationId", publication_id);
		}
		for tag in self.tags.iter().flatten() {
			query.append_pair("tag", tag);
		}

		let query = query.finish();

		if query.is_empty() { "/articles".into() } else { format!("/articles?{query}") }
	}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishPayload<'a> {
	title: &'a str,
	content_format: &'static str,
	content: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	tags: Option<&'a [String]>,
	publish_status: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	publication_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftPayload<'a> {
	title: &'a str,
	content_format: &'static str,
	content: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	tags: Option<&'a [String]>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn publish_payload_is_markdown_draft() {
		let params = PublishArticleParams {
			title: "Hello".into(),
			content: "World of Rust".into(),
			tags: Some(vec!["rust".into()]),
			publication_id: None,
		};

		assert_eq!(
			params.to_payload(),
			json!({
				"title": "Hello",
				"contentFormat": "markdown",
				"content": "World of Rust",
				"tags": ["rust"],
				"publishStatus": "draft",
			})
		);
	}

	#[test]
	fn draft_payload_omits_absent_tags() {
		let params = CreateDraftParams { title: "T".into(), content: "C".into(), tags: None };

		assert_eq!(
			params.to_payload(),
			json!({ "title": "T", "contentFormat": "markdown", "content": "C" })
		);
	}

	#[test]
	fn search_endpoint_repeats_array_parameters() {
		let params = SearchArticlesParams {
			keywords: Some(vec!["rust lang".into(), "tokio".into()]),
			publication_id: Some("pub-1".into()),
			tags: Some(vec!["async".into(), "web".into()]),
		};

		assert_eq!(
			params.endpoint(),
			"/articles?q=rust+lang&q=tokio&publicationId=pub-1&tag=async&tag=web"
		);
	}

	#[test]
	fn search_endpoint_without_filters_has_no_query() {
		assert_eq!(SearchArticlesParams::default().endpoint(), "/articles");
	}
}
