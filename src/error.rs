//! Client-level error taxonomy shared across the signer, cache, and facade.
//!
//! Every failure a public operation can surface is funneled through [`Error`]:
//! local validation failures map to [`Error::Validation`] (status 400),
//! upstream/network failures to [`Error::Transport`] (upstream status, 500
//! when unknown), and anything unclassified to [`Error::Unknown`] (status
//! 500). [`Error::Config`] only occurs while constructing a client, before
//! any network I/O.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected before any request is issued.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Schema or business-rule validation failure.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Upstream or network failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Fallback for failures not classified above.
	#[error("Unexpected client failure: {message}.")]
	Unknown {
		/// Human-readable summary of the failure.
		message: String,
	},
}
impl Error {
	/// Builds the catch-all [`Error::Unknown`] variant.
	pub fn unknown(message: impl Into<String>) -> Self {
		Self::Unknown { message: message.into() }
	}

	/// HTTP-equivalent status code for the failure class.
	///
	/// Validation failures report 400, transport failures mirror the upstream
	/// status when one was observed, and everything else reports 500.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::Validation(_) => 400,
			Self::Transport(inner) => inner.status,
			Self::Config(_) | Self::Unknown { .. } => 500,
		}
	}

	/// Structured detail attached to the failure, when available.
	pub fn detail(&self) -> Option<&serde_json::Value> {
		match self {
			Self::Transport(inner) => inner.detail.as_ref(),
			_ => None,
		}
	}
}

/// Configuration and construction failures raised before any operation runs.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Application identifier was empty or whitespace.
	#[error("Client configuration is missing an application identifier.")]
	MissingAppId,
	/// Shared signing secret was empty or whitespace.
	#[error("Client configuration is missing the shared signing secret.")]
	MissingSharedSecret,
	/// Request timeout must be a positive duration.
	#[error("Client configuration requires a positive request timeout.")]
	NonPositiveTimeout,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// A single structural or business-rule violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
	/// Dotted path to the offending field, when known.
	pub field: Option<String>,
	/// Human-readable description of the violation.
	pub message: String,
}
impl Violation {
	/// Builds a violation without a field path.
	pub fn new(message: impl Into<String>) -> Self {
		Self { field: None, message: message.into() }
	}

	/// Builds a violation pinned to a field path.
	pub fn at(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self { field: Some(field.into()), message: message.into() }
	}
}
impl Display for Violation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.field {
			Some(field) => write!(f, "{field}: {}", self.message),
			None => f.write_str(&self.message),
		}
	}
}

/// Payload validation failure carrying every violation at once.
///
/// The display message comma-joins all violation messages so callers see the
/// complete list of issues instead of only the first.
#[derive(Clone, Debug, ThisError)]
#[error("{message}")]
pub struct ValidationError {
	/// Aggregated, comma-joined violation summary.
	pub message: String,
	/// Structured violations for programmatic handling.
	pub violations: Vec<Violation>,
}
impl ValidationError {
	/// Aggregates a violation list into a single error.
	pub fn new(violations: Vec<Violation>) -> Self {
		let message = violations.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");

		Self { message, violations }
	}
}

/// Upstream or network failure surfaced by a public operation.
#[derive(Debug, ThisError)]
#[error("Apliiq API call failed with status {status}: {message}")]
pub struct TransportError {
	/// Upstream HTTP status, 500 when the failure happened below HTTP.
	pub status: u16,
	/// Human-readable failure summary.
	pub message: String,
	/// Upstream response body as structured detail, when available.
	pub detail: Option<serde_json::Value>,
	/// Underlying transport failure, when one was captured.
	#[source]
	pub source: Option<BoxError>,
}
impl TransportError {
	/// Builds an error for a completed call with a non-success status.
	///
	/// The raw body is carried as structured detail: parsed JSON when the
	/// payload decodes, the raw text otherwise.
	pub fn status(status: u16, body: &[u8]) -> Self {
		let detail = if body.is_empty() {
			None
		} else {
			Some(serde_json::from_slice(body).unwrap_or_else(|_| {
				serde_json::Value::String(String::from_utf8_lossy(body).into_owned())
			}))
		};

		Self {
			status,
			message: format!("upstream responded with HTTP {status}"),
			detail,
			source: None,
		}
	}

	/// Builds an error for a transport-layer failure with no HTTP status.
	pub fn failure(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self { status: 500, message: src.to_string(), detail: None, source: Some(Box::new(src)) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn validation_error_joins_all_violations() {
		let error = ValidationError::new(vec![
			Violation::new("order_number is required"),
			Violation::at("line_items[0].sku", "must start with APQ-"),
		]);

		assert_eq!(
			error.to_string(),
			"order_number is required, line_items[0].sku: must start with APQ-"
		);
		assert_eq!(error.violations.len(), 2);
		assert_eq!(Error::from(error).status_code(), 400);
	}

	#[test]
	fn transport_error_defaults_to_500_without_status() {
		let error = TransportError::failure(std::io::Error::other("connection reset"));

		assert_eq!(error.status, 500);
		assert!(Error::from(error).detail().is_none());
	}

	#[test]
	fn transport_error_carries_upstream_body_as_detail() {
		let error = TransportError::status(503, br#"{"error":"maintenance"}"#);
		let wrapped = Error::from(error);

		assert_eq!(wrapped.status_code(), 503);
		assert_eq!(wrapped.detail(), Some(&serde_json::json!({ "error": "maintenance" })));
	}

	#[test]
	fn non_json_upstream_body_falls_back_to_raw_text() {
		let error = TransportError::status(502, b"bad gateway");

		assert_eq!(error.detail, Some(serde_json::Value::String("bad gateway".into())));
	}
}
