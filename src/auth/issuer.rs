//! Bearer-token issuance contracts.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenSecret},
	clock,
	error::BoxError,
};

/// Boxed future returned by [`TokenIssuer::issue`].
pub type IssueFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenSecret, BoxError>> + 'a + Send>>;

/// Exchanges validated client credentials for a bearer token.
pub trait TokenIssuer
where
	Self: Send + Sync,
{
	/// Obtains a fresh access token for `credentials`.
	fn issue<'a>(&'a self, credentials: &'a Credentials) -> IssueFuture<'a>;
}

/// Stand-in issuer that synthesizes tokens locally.
///
/// Tokens look like `medium_token_<unix-ms>_<random suffix>`; no upstream exchange happens.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedIssuer;
impl SimulatedIssuer {
	const SUFFIX_BYTES: usize = 12;

	fn synthesize() -> TokenSecret {
		let issued_ms = clock::epoch_millis(OffsetDateTime::now_utc());
		let nonce: [u8; Self::SUFFIX_BYTES] = rand::random();

		TokenSecret::new(format!("medium_token_{issued_ms}_{}", URL_SAFE_NO_PAD.encode(nonce)))
	}
}
impl TokenIssuer for SimulatedIssuer {
	fn issue<'a>(&'a self, _credentials: &'a Credentials) -> IssueFuture<'a> {
		Box::pin(async move { Ok(Self::synthesize()) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn simulated_tokens_are_prefixed_and_unique() {
		let credentials =
			Credentials { client_id: "id".into(), client_secret: TokenSecret::new("secret") };
		let first = SimulatedIssuer
			.issue(&credentials)
			.await
			.expect("Simulated issuance should never fail.");
		let second = SimulatedIssuer
			.issue(&credentials)
			.await
			.expect("Simulated issuance should never fail.");

		assert!(first.expose().starts_with("medium_token_"));
		assert_ne!(first, second);
	}
}
