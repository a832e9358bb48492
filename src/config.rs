//! Immutable client configuration: credentials, endpoint, timeout, and the
//! cache TTL tiers.

// self
use crate::{_prelude::*, error::ConfigError};

/// Immutable configuration owned by an [`ApliiqClient`](crate::client::ApliiqClient)
/// for its whole lifetime.
///
/// `app_id` and `shared_secret` are required; everything else defaults to the
/// values the live API expects. Construction-time validation rejects empty
/// credentials so signing can never fail mid-request.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Application identifier issued by Apliiq.
	pub app_id: String,
	/// Shared secret used to key request signatures.
	pub shared_secret: String,
	/// Base API endpoint every request path is resolved against.
	pub endpoint: Url,
	/// Timeout applied to each outbound call.
	pub timeout: Duration,
	/// Response cache behavior.
	pub cache: CacheConfig,
}
impl ClientConfig {
	/// Base endpoint of the production API.
	pub const DEFAULT_ENDPOINT: &'static str = "https://api.apliiq.com/v1";
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

	/// Creates a configuration with default endpoint, timeout, and caching.
	pub fn new(app_id: impl Into<String>, shared_secret: impl Into<String>) -> Self {
		let endpoint = Url::parse(Self::DEFAULT_ENDPOINT)
			.expect("Default endpoint constant must be a valid URL.");

		Self {
			app_id: app_id.into(),
			shared_secret: shared_secret.into(),
			endpoint,
			timeout: Self::DEFAULT_TIMEOUT,
			cache: CacheConfig::default(),
		}
	}

	/// Overrides the base endpoint.
	pub fn with_endpoint(mut self, endpoint: Url) -> Self {
		self.endpoint = endpoint;

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the cache block.
	pub fn with_cache(mut self, cache: CacheConfig) -> Self {
		self.cache = cache;

		self
	}

	/// Validates the configuration before any network I/O can happen.
	pub(crate) fn validate(&self) -> Result<(), ConfigError> {
		if self.app_id.trim().is_empty() {
			return Err(ConfigError::MissingAppId);
		}
		if self.shared_secret.trim().is_empty() {
			return Err(ConfigError::MissingSharedSecret);
		}
		if !self.timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(())
	}
}

/// Resource classes the cache distinguishes when resolving TTL tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceClass {
	/// A single product entry (`product:<id>`).
	Product,
	/// The full product-list entry (`products:all`).
	ProductBatch,
}

/// Cache behavior and TTL tiers.
///
/// TTL precedence, highest first: per-call override, resource-class override
/// ([`product_ttl`](Self::product_ttl) / [`product_batch_ttl`](Self::product_batch_ttl)),
/// [`default_ttl`](Self::default_ttl), then the hardcoded
/// [`FALLBACK_TTL`](Self::FALLBACK_TTL).
#[derive(Clone, Debug)]
pub struct CacheConfig {
	/// When false the cache is never constructed and every read hits upstream.
	pub enabled: bool,
	/// Capacity bound before least-recently-used eviction kicks in.
	pub max_entries: usize,
	/// Store-wide TTL applied when no class override matches.
	pub default_ttl: Option<Duration>,
	/// Reserved knob carried over from the configuration surface; the read
	/// path currently treats stale entries as absent regardless.
	pub stale_while_revalidate: bool,
	/// TTL override for single-product entries.
	pub product_ttl: Option<Duration>,
	/// TTL override for the full product-list entry.
	pub product_batch_ttl: Option<Duration>,
}
impl CacheConfig {
	/// Hardcoded last-resort TTL.
	pub const FALLBACK_TTL: Duration = Duration::minutes(5);
	/// Default capacity bound.
	pub const DEFAULT_MAX_ENTRIES: usize = 100;

	/// Creates a configuration with caching switched off entirely.
	pub fn disabled() -> Self {
		Self { enabled: false, ..Self::default() }
	}

	/// Overrides the capacity bound.
	pub fn with_max_entries(mut self, max_entries: usize) -> Self {
		self.max_entries = max_entries;

		self
	}

	/// Overrides the store-wide default TTL.
	pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
		self.default_ttl = Some(ttl);

		self
	}

	/// Overrides the single-product TTL tier.
	pub fn with_product_ttl(mut self, ttl: Duration) -> Self {
		self.product_ttl = Some(ttl);

		self
	}

	/// Overrides the product-list TTL tier.
	pub fn with_product_batch_ttl(mut self, ttl: Duration) -> Self {
		self.product_batch_ttl = Some(ttl);

		self
	}

	/// Resolves the effective TTL for a resource class.
	///
	/// A per-call override always wins; otherwise the class tier, then the
	/// store default, then [`FALLBACK_TTL`](Self::FALLBACK_TTL).
	pub fn ttl_for(&self, class: ResourceClass, call_override: Option<Duration>) -> Duration {
		if let Some(ttl) = call_override {
			return ttl;
		}

		let class_ttl = match class {
			ResourceClass::Product => self.product_ttl,
			ResourceClass::ProductBatch => self.product_batch_ttl,
		};

		class_ttl.or(self.default_ttl).unwrap_or(Self::FALLBACK_TTL)
	}
}
impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			max_entries: Self::DEFAULT_MAX_ENTRIES,
			default_ttl: None,
			stale_while_revalidate: false,
			product_ttl: None,
			product_batch_ttl: None,
		}
	}
}
