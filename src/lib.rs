//! Typed Rust client for the Apliiq print-on-demand API - HMAC-signed
//! requests, tiered response caching, and tolerant payload normalization in
//! one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod normalize;
pub mod obs;
pub mod sign;
pub mod validate;
#[cfg(feature = "reqwest")]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; available
	//! whenever the default reqwest transport is compiled in.

	pub use crate::_prelude::*;

	// self
	use crate::{client::ApliiqClient, config::ClientConfig, http::ReqwestTransport};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApliiqClient<ReqwestTransport>;

	/// Builds a reqwest transport that accepts the self-signed certificates
	/// produced by `httpmock` during tests.
	pub fn test_reqwest_transport(endpoint: Url, timeout: Duration) -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client, endpoint, timeout)
	}

	/// Constructs an [`ApliiqClient`] pointed at a mock server base URL.
	pub fn build_reqwest_test_client(config: ClientConfig) -> ReqwestTestClient {
		let transport = test_reqwest_transport(config.endpoint.clone(), config.timeout);

		ApliiqClient::with_transport(config, transport)
			.expect("Failed to build test client from fixture configuration.")
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
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
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
