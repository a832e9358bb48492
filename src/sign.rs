//! Time-boxed HMAC request signing.
//!
//! Every outbound call carries a single `x-apliiq-auth` header whose value is
//! `"<unixSeconds>:<base64HmacSha256>:<appId>:<hexNonce>"`. The signature is
//! computed over the concatenation (no delimiters) of the application
//! identifier, the decimal timestamp, the nonce, and the base64 of the exact
//! body bytes that go on the wire, keyed by the shared secret. Signing is
//! sign-before-send: the facade serializes the body once and hands the same
//! buffer to the signer and to the transport.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac as _};
use sha2::Sha256;
// self
use crate::{_prelude::*, error::ConfigError};

type HmacSha256 = Hmac<Sha256>;

/// Name of the authentication header attached to every request.
pub const AUTH_HEADER: &str = "x-apliiq-auth";

const NONCE_LEN: usize = 16;

/// Ephemeral per-call signing inputs; consumed once, never persisted.
#[derive(Clone, Debug)]
pub struct SignedRequestContext {
	/// Unix time in whole seconds at signing.
	pub timestamp_secs: i64,
	/// 16 random bytes encoded as 32 lowercase hex characters.
	pub nonce: String,
	/// Base64 of the wire body bytes, or of the empty string without a body.
	pub body_base64: String,
}
impl SignedRequestContext {
	/// Issues a fresh context for the current instant with a random nonce.
	pub fn issue(body: Option<&[u8]>) -> Self {
		let nonce_bytes: [u8; NONCE_LEN] = rand::random();

		Self::at(OffsetDateTime::now_utc().unix_timestamp(), hex::encode(nonce_bytes), body)
	}

	/// Builds a context from explicit inputs; the deterministic path tests use.
	pub fn at(timestamp_secs: i64, nonce: impl Into<String>, body: Option<&[u8]>) -> Self {
		Self {
			timestamp_secs,
			nonce: nonce.into(),
			body_base64: BASE64.encode(body.unwrap_or_default()),
		}
	}
}

/// Computes authentication header values for outbound requests.
///
/// The signer owns copies of the immutable credentials, performs no caching
/// and no retries, and runs exactly once per outbound call (cache-miss
/// triggered calls included).
#[derive(Clone)]
pub struct RequestSigner {
	app_id: String,
	shared_secret: String,
}
impl RequestSigner {
	/// Creates a signer, rejecting blank credentials before any I/O.
	pub fn new(
		app_id: impl Into<String>,
		shared_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let app_id = app_id.into();
		let shared_secret = shared_secret.into();

		if app_id.trim().is_empty() {
			return Err(ConfigError::MissingAppId);
		}
		if shared_secret.trim().is_empty() {
			return Err(ConfigError::MissingSharedSecret);
		}

		Ok(Self { app_id, shared_secret })
	}

	/// Signs `body` at the current instant and returns the header value.
	pub fn header_value(&self, body: Option<&[u8]>) -> String {
		self.header_value_with(&SignedRequestContext::issue(body))
	}

	/// Returns the header value for an explicit context.
	pub fn header_value_with(&self, context: &SignedRequestContext) -> String {
		format!(
			"{}:{}:{}:{}",
			context.timestamp_secs,
			self.signature(context),
			self.app_id,
			context.nonce
		)
	}

	/// Base64 HMAC-SHA256 over the concatenated signature input.
	pub fn signature(&self, context: &SignedRequestContext) -> String {
		let input = format!(
			"{}{}{}{}",
			self.app_id, context.timestamp_secs, context.nonce, context.body_base64
		);
		let mut mac = HmacSha256::new_from_slice(self.shared_secret.as_bytes())
			.expect("HMAC-SHA256 accepts keys of any length.");

		mac.update(input.as_bytes());

		BASE64.encode(mac.finalize().into_bytes())
	}
}
impl Debug for RequestSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestSigner")
			.field("app_id", &self.app_id)
			.field("shared_secret_set", &true)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn signer() -> RequestSigner {
		RequestSigner::new("app-1", "top-secret").expect("Signer fixture should build.")
	}

	#[test]
	fn blank_credentials_fail_fast() {
		assert!(matches!(RequestSigner::new("", "secret"), Err(ConfigError::MissingAppId)));
		assert!(matches!(
			RequestSigner::new("app", " "),
			Err(ConfigError::MissingSharedSecret)
		));
	}

	#[test]
	fn header_has_four_colon_separated_fields() {
		let signer = signer();
		let header = signer.header_value(None);
		let fields = header.split(':').collect::<Vec<_>>();

		assert_eq!(fields.len(), 4);
		assert!(fields[0].parse::<i64>().is_ok(), "first field must be the decimal timestamp");
		assert_eq!(fields[2], "app-1");
		assert_eq!(fields[3].len(), 32, "nonce must be 16 bytes as lowercase hex");
		assert!(fields[3].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
	}

	#[test]
	fn same_second_signatures_differ_by_nonce() {
		let signer = signer();
		let body = serde_json::to_vec(&json!({ "order_number": "1001" }))
			.expect("Fixture body should serialize.");
		let first = signer.header_value(Some(&body));
		let second = signer.header_value(Some(&body));

		assert_ne!(first, second, "fresh nonces must produce distinct signatures");

		// Both must still verify against the HMAC of their own signature input.
		for header in [&first, &second] {
			let fields = header.split(':').collect::<Vec<_>>();
			let context = SignedRequestContext::at(
				fields[0].parse().expect("Timestamp field should parse."),
				fields[3],
				Some(body.as_slice()),
			);

			assert_eq!(signer.signature(&context), fields[1]);
		}
	}

	#[test]
	fn signature_matches_independent_hmac() {
		use hmac::Mac as _;

		let signer = signer();
		let context = SignedRequestContext::at(1_700_000_000, "00ff".repeat(8), Some(b"{}"));
		let expected_input = format!("app-1{}{}{}", 1_700_000_000, "00ff".repeat(8), "e30=");
		let mut mac = Hmac::<Sha256>::new_from_slice(b"top-secret")
			.expect("HMAC fixture key should be accepted.");

		mac.update(expected_input.as_bytes());

		let expected = BASE64.encode(mac.finalize().into_bytes());

		assert_eq!(signer.signature(&context), expected);
	}

	#[test]
	fn absent_body_signs_the_empty_string() {
		let context = SignedRequestContext::at(0, "ab".repeat(16), None);

		assert_eq!(context.body_base64, "");
	}
}
