//! Client credentials and the configuration they are validated from.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Name of the variable holding the client identifier.
pub const CLIENT_ID_KEY: &str = "MEDIUM_CLIENT_ID";
/// Name of the variable holding the client secret.
pub const CLIENT_SECRET_KEY: &str = "MEDIUM_CLIENT_SECRET";

/// Unvalidated credential values as supplied by the host process.
#[derive(Clone, Default)]
pub struct CredentialConfig {
	/// Client identifier, if supplied.
	pub client_id: Option<String>,
	/// Client secret, if supplied.
	pub client_secret: Option<String>,
}
impl CredentialConfig {
	/// Creates a config with both values present.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: Some(client_id.into()), client_secret: Some(client_secret.into()) }
	}

	/// Reads [`CLIENT_ID_KEY`] and [`CLIENT_SECRET_KEY`] from the process environment.
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads both values through `lookup`, keyed by [`CLIENT_ID_KEY`] and [`CLIENT_SECRET_KEY`].
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		Self { client_id: lookup(CLIENT_ID_KEY), client_secret: lookup(CLIENT_SECRET_KEY) }
	}

	/// Checks that both values are present and non-empty.
	///
	/// The identifier is checked first, so a config missing both reports [`CLIENT_ID_KEY`].
	pub fn validate(self) -> Result<Credentials, ConfigError> {
		let client_id = require(self.client_id, CLIENT_ID_KEY)?;
		let client_secret = require(self.client_secret, CLIENT_SECRET_KEY)?;

		Ok(Credentials { client_id, client_secret: TokenSecret::new(client_secret) })
	}
}
impl Debug for CredentialConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialConfig")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.finish()
	}
}

/// Validated client credentials.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// Client identifier.
	pub client_id: String,
	/// Client secret; never logged.
	pub client_secret: TokenSecret,
}

fn require(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
	match value {
		Some(value) if !value.is_empty() => Ok(value),
		_ => Err(ConfigError::MissingCredential { key }),
	}
}
