//! Transport primitives for signed API calls.
//!
//! The module exposes [`ApiTransport`] as the crate's only dependency on an
//! HTTP stack: the facade hands it a fully prepared [`ApiRequest`] (signature
//! header already attached) and reads back a status + body pair or a
//! [`TransportFailure`]. The reqwest-backed [`ReqwestTransport`] ships behind
//! the default `reqwest` feature; callers can substitute any implementation
//! for testing or custom stacks.

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportFailure>> + 'a + Send>>;

/// HTTP methods the client issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiMethod {
	/// Cache-aware read.
	Get,
	/// Cache-bypassing write.
	Post,
}
impl ApiMethod {
	/// Stable wire label for the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiMethod::Get => "GET",
			ApiMethod::Post => "POST",
		}
	}
}
impl Display for ApiMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A fully prepared outbound request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: ApiMethod,
	/// Path relative to the configured endpoint (e.g. `Product/162`).
	pub path: String,
	/// Exact body bytes to transmit; the same bytes the signature covers.
	pub body: Option<Vec<u8>>,
	/// Headers to attach; the facade adds exactly the authentication header.
	pub headers: Vec<(&'static str, String)>,
}

/// Status + body pair returned by a completed call.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}

/// Failure raised by the transport itself, below HTTP semantics.
#[derive(Debug, ThisError)]
pub enum TransportFailure {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Apliiq API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The configured timeout elapsed before a response arrived.
	#[error("Request timed out while calling the Apliiq API.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Apliiq API.")]
	Io(#[from] std::io::Error),
}
impl TransportFailure {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportFailure {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Abstraction over HTTP transports capable of executing signed API calls.
///
/// Implementations must be `Send + Sync + 'static` so one client instance can
/// serve concurrent operations, and the returned futures must be `Send` so
/// facade calls can hop executors freely.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes the request and resolves to the raw status + body pair.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// Reqwest-backed [`ApiTransport`] honoring the configured endpoint + timeout.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	endpoint: Url,
	timeout: std::time::Duration,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport from the client configuration.
	pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().build()?;

		Ok(Self::with_client(client, config.endpoint.clone(), config.timeout))
	}

	/// Wraps an existing reqwest client, e.g. a test client that accepts
	/// self-signed certificates.
	pub fn with_client(client: ReqwestClient, endpoint: Url, timeout: Duration) -> Self {
		Self { client, endpoint, timeout: timeout.unsigned_abs() }
	}

	fn request_url(&self, path: &str) -> String {
		format!("{}/{}", self.endpoint.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let method = match request.method {
			ApiMethod::Get => reqwest::Method::GET,
			ApiMethod::Post => reqwest::Method::POST,
		};
		let mut builder =
			self.client.request(method, self.request_url(&request.path)).timeout(self.timeout);

		for (name, value) in request.headers {
			builder = builder.header(name, value);
		}
		if let Some(body) = request.body {
			builder = builder.header("content-type", "application/json").body(body);
		}

		Box::pin(async move {
			let response = builder.send().await.map_err(TransportFailure::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportFailure::from)?.to_vec();

			Ok(TransportResponse { status, body })
		})
	}
}
