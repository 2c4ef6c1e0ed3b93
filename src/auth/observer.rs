//! Audit hooks invoked by [`CredentialGuard`](crate::auth::CredentialGuard) on state transitions.

// self
use crate::{_prelude::*, obs};

/// Security-relevant transitions reported by the credential guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
	/// A required credential was absent during construction.
	CredentialMissing {
		/// Name of the missing secret.
		key: &'static str,
		/// When the check failed.
		at: OffsetDateTime,
	},
	/// A token was issued and stored.
	Authenticated {
		/// When the token was stored.
		at: OffsetDateTime,
	},
	/// Token issuance failed; any previous token is still in place.
	AuthenticationFailed {
		/// Rendered issuer failure.
		reason: String,
		/// When the failure was observed.
		at: OffsetDateTime,
	},
	/// An access token was requested before any authentication succeeded.
	UnauthorizedTokenRequest {
		/// When the request was made.
		at: OffsetDateTime,
	},
}
impl AuthEvent {
	/// Returns a stable label suitable for metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::CredentialMissing { .. } => "credential_missing",
			Self::Authenticated { .. } => "authenticated",
			Self::AuthenticationFailed { .. } => "authentication_failed",
			Self::UnauthorizedTokenRequest { .. } => "unauthorized_token_request",
		}
	}
}

/// Receives [`AuthEvent`]s from the credential guard.
pub trait AuthObserver
where
	Self: Send + Sync,
{
	/// Handles a single event. Must not panic.
	fn on_event(&self, event: &AuthEvent);
}
impl<F> AuthObserver for F
where
	F: Send + Sync + Fn(&AuthEvent),
{
	fn on_event(&self, event: &AuthEvent) {
		self(event)
	}
}

/// Default observer: structured logs plus an event counter.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuthObserver;
impl AuthObserver for TracingAuthObserver {
	fn on_event(&self, event: &AuthEvent) {
		obs::record_auth_event(event.as_str());

		match event {
			AuthEvent::Authenticated { at } => obs::log_auth_success(*at),
			AuthEvent::CredentialMissing { key, at } =>
				obs::log_security_alert(&format!("Missing critical credential: {key}."), *at),
			AuthEvent::AuthenticationFailed { reason, at } =>
				obs::log_security_alert(&format!("Authentication failed: {reason}"), *at),
			AuthEvent::UnauthorizedTokenRequest { at } =>
				obs::log_security_alert("Unauthorized access token request.", *at),
		}
	}
}

/// Observer that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAuthObserver;
impl AuthObserver for NoopAuthObserver {
	fn on_event(&self, _event: &AuthEvent) {}
}
