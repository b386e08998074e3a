//! Pluggable third-party identity passes: an OAuth 2.0 authorization-code pass for Google and the
//! strict, case-insensitive HTTP header index it reads protocol metadata with.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod head;
pub mod http;
pub mod message;
pub mod oauth;
pub mod obs;
pub mod pass;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::ReqwestHttpClient,
		message::RawMessage,
		oauth::ReqwestTransportErrorMapper,
		pass::GooglePass,
		provider::{ProviderConfig, ProviderEndpoints},
	};

	/// Google pass type alias used by reqwest-backed integration tests.
	pub type ReqwestTestPass = GooglePass<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`GooglePass`] whose OAuth and API endpoints both point at `base`.
	pub fn build_reqwest_test_pass(
		base: &str,
		client_id: &str,
		client_secret: &str,
		redirect_uri: &str,
	) -> ReqwestTestPass {
		let base = Url::parse(base).expect("Mock server base URL should parse.");
		let config = ProviderConfig::new(client_id, client_secret, redirect_uri)
			.expect("Test provider configuration should be valid.")
			.with_endpoints(ProviderEndpoints { oauth: base.clone(), api: base });

		GooglePass::with_http_client(
			config,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}

	/// Builds an inbound callback request for `target` (path plus query) on `app.example.com`.
	pub fn callback_request(target: &str) -> RawMessage {
		RawMessage::new([format!("GET {target} HTTP/1.1"), "Host: app.example.com".into()])
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
