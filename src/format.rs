//! Markdown renderers for article summaries.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{_prelude::*, types::MediumArticle};

/// Article fields shown by the renderers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
	/// Title.
	pub title: String,
	/// Canonical URL.
	pub url: String,
	/// Author display name or identifier.
	pub author: Option<String>,
	/// Human-readable publication time.
	pub published_at: Option<String>,
	/// Short abstract.
	pub summary: Option<String>,
	/// Tags.
	#[serde(default)]
	pub tags: Vec<String>,
}
impl From<&MediumArticle> for ArticleSummary {
	fn from(article: &MediumArticle) -> Self {
		Self {
			title: article.title.clone(),
			url: article.url.clone(),
			author: Some(article.author_id.clone()),
			published_at: article.published_at().and_then(|at| at.format(&Rfc3339).ok()),
			summary: None,
			tags: article.tags.clone(),
		}
	}
}

/// Renders one article as a Markdown document.
pub fn format_article_summary(article: &ArticleSummary) -> String {
	let mut sections = vec![format!("# {}\n", article.title), format!("**Link:** {}\n", article.url)];

	if let Some(author) = &article.author {
		sections.push(format!("**Author:** {author}\n"));
	}
	if let Some(published_at) = &article.published_at {
		sections.push(format!("**Published:** {published_at}\n"));
	}
	if !article.tags.is_empty() {
		sections.push(format!("**Tags:** {}\n", article.tags.join(", ")));
	}
	if let Some(summary) = &article.summary {
		sections.push(format!("## Summary\n\n{summary}\n"));
	}

	sections.join("\n")
}

/// Renders a numbered Markdown list of articles.
pub fn format_article_list(articles: &[ArticleSummary]) -> String {
	if articles.is_empty() {
		return "No articles yet.".into();
	}

	let mut out = format!("# Articles\n\n{} article(s)\n\n---\n\n", articles.len());
	let items = articles
		.iter()
		.enumerate()
		.map(|(i, article)| {
			let mut item = format!("## {}. {}\n\n**Link:** {}\n\n", i + 1, article.title, article.url);

			if let Some(author) = &article.author {
				item.push_str(&format!("**Author:** {author}\n\n"));
			}
			if let Some(published_at) = &article.published_at {
				item.push_str(&format!("**Published:** {published_at}\n\n"));
			}
			if !article.tags.is_empty() {
				item.push_str(&format!("**Tags:** {}\n\n", article.tags.join(", ")));
			}
			if let Some(summary) = &article.summary {
				item.push_str(&format!("**Summary:** {summary}\n\n"));
			}

			item.push_str("---\n");

			item
		})
		.collect::<Vec<_>>();

	out.push_str(&items.join("\n"));

	out
}
