//! Optional observability helpers for dispatch and authentication.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `medium_gateway.request` with the `operation` and
//!   `stage` fields, plus warn/error events for failed calls and security alerts.
//! - Enable `metrics` to increment the `medium_gateway_request_total` counter for every
//!   attempt/cache hit/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Remote API operations observed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// `POST /publications`.
	PublishArticle,
	/// `GET /publications`.
	UserPublications,
	/// `GET /articles?…`.
	SearchArticles,
	/// `GET /drafts`.
	Drafts,
	/// `GET /me`.
	UserProfile,
	/// `POST /drafts`.
	CreateDraft,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::PublishArticle => "publish_article",
			Operation::UserPublications => "user_publications",
			Operation::SearchArticles => "search_articles",
			Operation::Drafts => "drafts",
			Operation::UserProfile => "user_profile",
			Operation::CreateDraft => "create_draft",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each dispatched request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to the dispatch policy.
	Attempt,
	/// Served from the response cache without a remote call.
	CacheHit,
	/// Remote call succeeded.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::CacheHit => "cache_hit",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
