//! Credential guard that gates bearer-token issuance behind validated client secrets.
//!
//! Construction fails fast when either secret is missing, so a live guard always holds a
//! complete [`Credentials`] pair. The guard then moves from [`AuthState::Constructed`] to
//! [`AuthState::Authenticated`] on the first successful [`CredentialGuard::authenticate`] and
//! never moves back: later calls replace the token, failed calls leave the previous one alone.

// self
use crate::{
	_prelude::*,
	auth::{
		AuthEvent, AuthObserver, CredentialConfig, Credentials, SimulatedIssuer, TokenIssuer,
		TokenSecret, TracingAuthObserver,
	},
	error::ConfigError,
};

/// Observable lifecycle of a [`CredentialGuard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
	/// Credentials validated; no token yet.
	Constructed,
	/// A token is stored.
	Authenticated,
}

/// Holds validated credentials and the bearer token issued for them.
pub struct CredentialGuard {
	credentials: Credentials,
	access_token: RwLock<Option<TokenSecret>>,
	issuer: Arc<dyn TokenIssuer>,
	observer: Arc<dyn AuthObserver>,
	authenticate_lock: AsyncMutex<()>,
}
impl CredentialGuard {
	/// Validates `config` and builds a guard backed by [`SimulatedIssuer`] and
	/// [`TracingAuthObserver`].
	pub fn new(config: CredentialConfig) -> Result<Self> {
		Self::with_observer(config, Arc::new(TracingAuthObserver))
	}

	/// Validates the process environment and builds a guard with default collaborators.
	pub fn from_env() -> Result<Self> {
		Self::new(CredentialConfig::from_env())
	}

	/// Validates `config`, reporting a missing secret to `observer` before failing.
	pub fn with_observer(config: CredentialConfig, observer: Arc<dyn AuthObserver>) -> Result<Self> {
		let credentials = match config.validate() {
			Ok(credentials) => credentials,
			Err(e) => {
				if let ConfigError::MissingCredential { key } = &e {
					observer.on_event(&AuthEvent::CredentialMissing {
						key: *key,
						at: OffsetDateTime::now_utc(),
					});
				}

				return Err(e.into());
			},
		};

		Ok(Self {
			credentials,
			access_token: RwLock::new(None),
			issuer: Arc::new(SimulatedIssuer),
			observer,
			authenticate_lock: AsyncMutex::new(()),
		})
	}

	/// Replaces the token issuer.
	pub fn with_issuer(mut self, issuer: Arc<dyn TokenIssuer>) -> Self {
		self.issuer = issuer;

		self
	}

	/// Client identifier the guard was built with.
	pub fn client_id(&self) -> &str {
		&self.credentials.client_id
	}

	/// Current lifecycle state.
	pub fn state(&self) -> AuthState {
		if self.access_token.read().is_some() {
			AuthState::Authenticated
		} else {
			AuthState::Constructed
		}
	}

	/// Returns `true` once a token has been stored.
	pub fn is_authenticated(&self) -> bool {
		matches!(self.state(), AuthState::Authenticated)
	}

	/// Obtains a token from the issuer and stores it, replacing any previous token.
	///
	/// Concurrent callers are serialized. On failure the stored token is left untouched and
	/// the issuer error is wrapped in [`Error::AuthenticationFailed`].
	pub async fn authenticate(&self) -> Result<()> {
		let _serialized = self.authenticate_lock.lock().await;

		match self.issuer.issue(&self.credentials).await {
			Ok(token) => {
				*self.access_token.write() = Some(token);

				self.observer.on_event(&AuthEvent::Authenticated { at: OffsetDateTime::now_utc() });

				Ok(())
			},
			Err(e) => {
				self.observer.on_event(&AuthEvent::AuthenticationFailed {
					reason: e.to_string(),
					at: OffsetDateTime::now_utc(),
				});

				Err(Error::authentication_failed(e))
			},
		}
	}

	/// Returns the stored token, or [`Error::AuthenticationRequired`] before the first
	/// successful [`authenticate`](Self::authenticate).
	pub fn access_token(&self) -> Result<TokenSecret> {
		if let Some(token) = self.access_token.read().as_ref() {
			return Ok(token.clone());
		}

		self.observer.on_event(&AuthEvent::UnauthorizedTokenRequest { at: OffsetDateTime::now_utc() });

		Err(Error::AuthenticationRequired)
	}
}
impl Debug for CredentialGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialGuard")
			.field("client_id", &self.credentials.client_id)
			.field("state", &self.state())
			.finish()
	}
}
