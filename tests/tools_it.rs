#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use medium_gateway::{
	auth::{CredentialConfig, CredentialGuard, NoopAuthObserver},
	client::{ClientConfig, ReqwestMediumClient},
	http::ReqwestHttpClient,
	tools::ToolRegistry,
};

async fn build_registry(
	server: &MockServer,
	authenticate: bool,
) -> ToolRegistry<ReqwestHttpClient> {
	let guard = Arc::new(
		CredentialGuard::with_observer(
			CredentialConfig::new("client-tools", "secret-tools"),
			Arc::new(NoopAuthObserver),
		)
		.expect("Test credentials should validate."),
	);

	if authenticate {
		guard.authenticate().await.expect("Simulated authentication should succeed.");
	}

	let config = ClientConfig::default().with_base_url(server.url("/v1"));
	let client =
		ReqwestMediumClient::new(guard, &config).expect("Client configuration should be valid.");

	ToolRegistry::new(Arc::new(client))
}

#[tokio::test]
async fn registry_lists_every_operation() {
	let server = MockServer::start_async().await;
	let registry = build_registry(&server, false).await;
	let names = registry.descriptors().into_iter().map(|d| d.name).collect::<Vec<_>>();

	assert_eq!(
		names,
		[
			"publish-article",
			"get-publications",
			"search-articles",
			"get-drafts",
			"get-profile",
			"create-draft",
		]
	);
}

#[tokio::test]
async fn successful_call_returns_pretty_json() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let registry = build_registry(&server, true).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/publications");
			then.status(201)
				.header("content-type", "application/json")
				.body(r#"{"data":{"id":"article-123"}}"#);
		})
		.await;
	let output = registry
		.call(
			"publish-article",
			json!({ "title": "Test Article", "content": "This is test content" }),
		)
		.await;

	assert!(!output.is_error);

	let value: Value = serde_json::from_str(&output.joined_text())?;

	assert_eq!(value["data"]["id"], "article-123");
	assert!(output.joined_text().contains('\n'));

	mock.assert_async().await;

	Ok(())
}

#[tokio::test]
async fn validation_failures_never_reach_the_api() {
	let server = MockServer::start_async().await;
	let registry = build_registry(&server, true).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST);
			then.status(201).body("{}");
		})
		.await;
	let output = registry.call("create-draft", json!({ "title": "Draft", "content": "short" })).await;

	assert!(output.is_error);
	assert!(output.joined_text().starts_with("Failed to create draft: "));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn unauthenticated_calls_become_error_outputs() {
	let server = MockServer::start_async().await;
	let registry = build_registry(&server, false).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/me");
			then.status(200).body("{}");
		})
		.await;
	let output = registry.call("get-profile", Value::Null).await;

	assert!(output.is_error);
	assert!(output.joined_text().contains("Authentication required"));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn remote_errors_and_unknown_tools_are_reported() {
	let server = MockServer::start_async().await;
	let registry = build_registry(&server, true).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/articles").query_param("tag", "rust");
			then.status(503).body("maintenance");
		})
		.await;

	let output = registry.call("search-articles", json!({ "tags": ["rust"] })).await;

	assert!(output.is_error);
	assert!(output.joined_text().contains("503"));

	let output = registry.call("delete-account", json!({})).await;

	assert!(output.is_error);
	assert!(output.joined_text().contains("delete-account"));
}
