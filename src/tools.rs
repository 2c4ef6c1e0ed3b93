//! Named, schema-validated tool surface over [`MediumClient`].
//!
//! Hosts list the tools with [`ToolRegistry::descriptors`] and invoke them by name with JSON
//! arguments. [`ToolRegistry::call`] never fails: successes come back as pretty-printed JSON
//! text, and every failure (unknown tool, bad arguments, auth, transport, remote) becomes a
//! [`ToolOutput`] flagged with `is_error`.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
// self
use crate::{
	_prelude::*,
	client::{CreateDraftParams, MediumClient, PublishArticleParams, SearchArticlesParams},
	http::ApiHttpClient,
};

/// Shortest accepted article or draft body, in characters.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Failures raised before or while running a tool.
#[derive(Debug, ThisError)]
pub enum ToolError {
	/// No tool is registered under the requested name.
	#[error("Unknown tool `{name}`.")]
	UnknownTool {
		/// Requested name.
		name: String,
	},
	/// Arguments do not match the tool's schema.
	#[error("Invalid arguments: {source}.")]
	InvalidArguments {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Arguments parsed but violate a field rule.
	#[error("Invalid `{field}`: {reason}.")]
	Validation {
		/// Offending field.
		field: &'static str,
		/// Rule that failed.
		reason: &'static str,
	},
	/// The gateway call failed.
	#[error(transparent)]
	Gateway(#[from] Error),
}

/// Static description of a registered tool.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
	/// Tool name used by [`ToolRegistry::call`].
	pub name: &'static str,
	/// Human-readable summary.
	pub description: &'static str,
	/// JSON Schema of the arguments object.
	pub input_schema: Value,
}

/// One content block of a tool result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
	/// Plain text.
	Text {
		/// Text body.
		text: String,
	},
}

/// Result returned to the host for every call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
	/// Result blocks.
	pub content: Vec<ToolContent>,
	/// Set when the call failed.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub is_error: bool,
}
impl ToolOutput {
	/// Successful result carrying `text`.
	pub fn text(text: impl Into<String>) -> Self {
		Self { content: vec![ToolContent::Text { text: text.into() }], is_error: false }
	}

	/// Failed result carrying `message`.
	pub fn error(message: impl Into<String>) -> Self {
		Self { content: vec![ToolContent::Text { text: message.into() }], is_error: true }
	}

	/// Concatenated text of every block.
	pub fn joined_text(&self) -> String {
		self.content
			.iter()
			.map(|ToolContent::Text { text }| text.as_str())
			.collect::<Vec<_>>()
			.join("\n")
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tool {
	PublishArticle,
	GetPublications,
	SearchArticles,
	GetDrafts,
	GetProfile,
	CreateDraft,
}
impl Tool {
	const ALL: [Tool; 6] = [
		Tool::PublishArticle,
		Tool::GetPublications,
		Tool::SearchArticles,
		Tool::GetDrafts,
		Tool::GetProfile,
		Tool::CreateDraft,
	];

	fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|tool| tool.name() == name)
	}

	const fn name(self) -> &'static str {
		match self {
			Tool::PublishArticle => "publish-article",
			Tool::GetPublications => "get-publications",
			Tool::SearchArticles => "search-articles",
			Tool::GetDrafts => "get-drafts",
			Tool::GetProfile => "get-profile",
			Tool::CreateDraft => "create-draft",
		}
	}

	const fn description(self) -> &'static str {
		match self {
			Tool::PublishArticle => "Publish a new article on Medium.",
			Tool::GetPublications => "List the publications of the authenticated user.",
			Tool::SearchArticles => "Search and filter Medium articles.",
			Tool::GetDrafts => "List the drafts of the authenticated user.",
			Tool::GetProfile => "Fetch the profile of the authenticated user.",
			Tool::CreateDraft => "Create a Markdown draft on Medium.",
		}
	}

	const fn failure_prefix(self) -> &'static str {
		match self {
			Tool::PublishArticle => "Failed to publish article",
			Tool::GetPublications => "Failed to fetch publications",
			Tool::SearchArticles => "Failed to search articles",
			Tool::GetDrafts => "Failed to fetch drafts",
			Tool::GetProfile => "Failed to fetch profile",
			Tool::CreateDraft => "Failed to create draft",
		}
	}

	fn input_schema(self) -> Value {
		let strings = json!({ "type": "array", "items": { "type": "string" } });

		match self {
			Tool::PublishArticle => json!({
				"type": "object",
				"properties": {
					"title": { "type": "string", "minLength": 1 },
					"content": { "type": "string", "minLength": MIN_CONTENT_CHARS },
					"tags": strings,
					"publicationId": { "type": "string" },
				},
				"required": ["title", "content"],
			}),
			Tool::CreateDraft => json!({
				"type": "object",
				"properties": {
					"title": { "type": "string", "minLength": 1 },
					"content": { "type": "string", "minLength": MIN_CONTENT_CHARS },
					"tags": strings,
				},
				"required": ["title", "content"],
			}),
			Tool::SearchArticles => json!({
				"type": "object",
				"properties": {
					"keywords": strings,
					"publicationId": { "type": "string" },
					"tags": strings,
				},
			}),
			Tool::GetPublications | Tool::GetDrafts | Tool::GetProfile =>
				json!({ "type": "object", "properties": {} }),
		}
	}
}

/// Exposes every dispatch operation of a [`MediumClient`] as a named tool.
pub struct ToolRegistry<C>
where
	C: ?Sized + ApiHttpClient,
{
	client: Arc<MediumClient<C>>,
}
impl<C> ToolRegistry<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Wraps `client`.
	pub fn new(client: Arc<MediumClient<C>>) -> Self {
		Self { client }
	}

	/// Descriptions of every registered tool.
	pub fn descriptors(&self) -> Vec<ToolDescriptor> {
		Tool::ALL
			.into_iter()
			.map(|tool| ToolDescriptor {
				name: tool.name(),
				description: tool.description(),
				input_schema: tool.input_schema(),
			})
			.collect()
	}

	/// Runs the tool registered as `name`, converting every failure into an error output.
	pub async fn call(&self, name: &str, arguments: Value) -> ToolOutput {
		let Some(tool) = Tool::from_name(name) else {
			return ToolOutput::error(ToolError::UnknownTool { name: name.into() }.to_string());
		};

		match self.run(tool, arguments).await {
			Ok(value) => match serde_json::to_string_pretty(&value) {
				Ok(text) => ToolOutput::text(text),
				Err(e) => ToolOutput::error(format!("{}: {e}", tool.failure_prefix())),
			},
			Err(e) => ToolOutput::error(format!("{}: {e}", tool.failure_prefix())),
		}
	}

	async fn run(&self, tool: Tool, arguments: Value) -> Result<Value, ToolError> {
		let client = self.client.as_ref();
		let value = match tool {
			Tool::PublishArticle => {
				let params: PublishArticleParams = parse_arguments(arguments)?;

				validate_article(&params.title, &params.content)?;

				client.publish_article(&params).await?
			},
			Tool::CreateDraft => {
				let params: CreateDraftParams = parse_arguments(arguments)?;

				validate_article(&params.title, &params.content)?;

				client.create_draft(&params).await?
			},
			Tool::SearchArticles => {
				let params: SearchArticlesParams = parse_arguments(arguments)?;

				client.search_articles(&params).await?
			},
			Tool::GetPublications => client.get_user_publications().await?,
			Tool::GetDrafts => client.get_drafts().await?,
			Tool::GetProfile => client.get_user_profile().await?,
		};

		Ok(value)
	}
}
impl<C> Debug for ToolRegistry<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ToolRegistry").field("tools", &Tool::ALL.len()).finish()
	}
}

fn parse_arguments<T>(arguments: Value) -> Result<T, ToolError>
where
	T: DeserializeOwned,
{
	// Hosts send `null` for tools without parameters.
	let arguments = if arguments.is_null() { json!({}) } else { arguments };

	serde_path_to_error::deserialize(arguments)
		.map_err(|source| ToolError::InvalidArguments { source })
}

fn validate_article(title: &str, content: &str) -> Result<(), ToolError> {
	if title.trim().is_empty() {
		return Err(ToolError::Validation { field: "title", reason: "title is required" });
	}
	if content.chars().count() < MIN_CONTENT_CHARS {
		return Err(ToolError::Validation {
			field: "content",
			reason: "content must be at least 10 characters",
		});
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn tool_names_round_trip() {
		for tool in Tool::ALL {
			assert_eq!(Tool::from_name(tool.name()), Some(tool));
		}

		assert_eq!(Tool::from_name("delete-everything"), None);
	}

	#[test]
	fn article_rules_reject_short_content_and_blank_titles() {
		assert!(matches!(
			validate_article("  ", "long enough body"),
			Err(ToolError::Validation { field: "title", .. })
		));
		assert!(matches!(
			validate_article("Title", "too short"),
			Err(ToolError::Validation { field: "content", .. })
		));
		assert!(validate_article("Title", "exactly 10").is_ok());
	}

	#[test]
	fn arguments_report_the_failing_path() {
		let err = parse_arguments::<SearchArticlesParams>(json!({ "keywords": [1] }))
			.expect_err("Numbers are not keywords.");

		assert!(err.to_string().contains("keywords[0]"));

		let params = parse_arguments::<SearchArticlesParams>(Value::Null)
			.expect("Null arguments should be treated as an empty object.");

		assert_eq!(params, SearchArticlesParams::default());
	}

	#[test]
	fn output_serializes_with_error_flag_only_on_failure() {
		let ok = serde_json::to_value(ToolOutput::text("done")).expect("Output should serialize.");
		let err = serde_json::to_value(ToolOutput::error("boom")).expect("Output should serialize.");

		assert_eq!(ok, json!({ "content": [{ "type": "text", "text": "done" }] }));
		assert_eq!(err, json!({ "content": [{ "type": "text", "text": "boom" }], "isError": true }));
	}
}
