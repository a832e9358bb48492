//! Cache-aware API facade composing the signer, cache, normalizer, and
//! validation layers.
//!
//! Each read operation consults the cache first, falls back through the
//! normalizer + validator, and repopulates the cache from the fetched payload.
//! The write operation (order creation) bypasses the cache entirely and runs
//! validation before and after the call. Every failure leaves through the
//! taxonomy in [`crate::error`]; no raw transport or decoding error reaches
//! the caller. Concurrent misses for the same key deliberately trigger
//! independent upstream calls; the later populate overwrites the earlier one
//! with an equivalent immutable value.

// self
use crate::{
	_prelude::*,
	cache::{CacheStats, CachedValue, PRODUCT_KEY_PREFIX, PRODUCTS_ALL_KEY, ResponseCache, product_key},
	config::{ClientConfig, ResourceClass},
	error::{TransportError, ValidationError},
	http::{ApiMethod, ApiRequest, ApiTransport},
	model::{ApliiqOrder, ApliiqOrderResponse, Product},
	normalize,
	obs::{self, ApiOp, CacheOutcome, OpOutcome, RequestSpan},
	sign::{AUTH_HEADER, RequestSigner},
	validate,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApliiqClient = ApliiqClient<ReqwestTransport>;

/// Typed client for the Apliiq API.
///
/// The client owns the immutable configuration, the request signer, the
/// transport handle, and (when enabled) the response cache, so individual
/// operations can focus on their read/write semantics. One instance is safe
/// to share across concurrent tasks; it keeps no background threads or
/// timers, staleness is checked lazily on read.
pub struct ApliiqClient<T>
where
	T: ?Sized + ApiTransport,
{
	config: ClientConfig,
	signer: RequestSigner,
	transport: Arc<T>,
	cache: Option<Arc<ResponseCache>>,
}
impl<T> ApliiqClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client over a caller-provided transport.
	///
	/// Configuration is validated here, before any network I/O: blank
	/// credentials or a non-positive timeout fail fast as
	/// [`ConfigError`](crate::error::ConfigError). When caching is disabled
	/// the cache is simply never constructed and every read is a forced
	/// upstream fetch.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<T>>) -> Result<Self> {
		config.validate()?;

		let signer = RequestSigner::new(config.app_id.clone(), config.shared_secret.clone())?;
		let cache = config
			.cache
			.enabled
			.then(|| Arc::new(ResponseCache::new(config.cache.max_entries)));

		Ok(Self { config, signer, transport: transport.into(), cache })
	}

	/// Read-only view of the configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Fetches the full product list, cache-aware.
	pub async fn products(&self) -> Result<Vec<Product>> {
		self.products_with_ttl(None).await
	}

	/// [`products`](Self::products) with a per-call TTL override for the list
	/// entry; derived single-product entries keep their class tier.
	pub async fn products_with_ttl(&self, ttl_override: Option<Duration>) -> Result<Vec<Product>> {
		const OP: ApiOp = ApiOp::Products;

		let span = RequestSpan::new(OP, "products");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				if let Some(cache) = &self.cache {
					if let Some(CachedValue::Products(products)) = cache.get(PRODUCTS_ALL_KEY) {
						obs::record_cache_outcome(OP, CacheOutcome::Hit);

						return Ok(products);
					}

					obs::record_cache_outcome(OP, CacheOutcome::Miss);
				}

				let body = self.dispatch(ApiMethod::Get, "Product".into(), None).await?.body;
				let raw = normalize::extract_product_list(&body)
					.map_err(|err| Error::unknown(err.to_string()))?;
				let products =
					validate::decode_products(raw).map_err(|violations| {
						Error::from(ValidationError::new(violations))
					})?;

				if let Some(cache) = &self.cache {
					// One fetch event populates both tiers: the list under the
					// batch TTL and every contained product under the
					// single-product TTL, each with independent expiry.
					let product_ttl = self.config.cache.ttl_for(ResourceClass::Product, None);

					for product in &products {
						cache.set(
							product_key(product.id),
							CachedValue::Product(Box::new(product.clone())),
							product_ttl,
						);
					}

					let batch_ttl =
						self.config.cache.ttl_for(ResourceClass::ProductBatch, ttl_override);

					cache.set(PRODUCTS_ALL_KEY, CachedValue::Products(products.clone()), batch_ttl);
				}

				Ok(products)
			})
			.await;

		record_result(OP, &result);

		result
	}

	/// Fetches one product by identifier, cache-aware.
	pub async fn product(&self, id: u64) -> Result<Product> {
		self.product_with_ttl(id, None).await
	}

	/// [`product`](Self::product) with a per-call TTL override.
	pub async fn product_with_ttl(&self, id: u64, ttl_override: Option<Duration>) -> Result<Product> {
		const OP: ApiOp = ApiOp::Product;

		let span = RequestSpan::new(OP, "product");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let key = product_key(id);

				if let Some(cache) = &self.cache {
					if let Some(CachedValue::Product(product)) = cache.get(&key) {
						obs::record_cache_outcome(OP, CacheOutcome::Hit);

						return Ok(*product);
					}

					obs::record_cache_outcome(OP, CacheOutcome::Miss);
				}

				let body =
					self.dispatch(ApiMethod::Get, format!("Product/{id}"), None).await?.body;
				let entity = normalize::extract_entity(body);
				let product = validate::decode_product(entity).map_err(|violations| {
					Error::from(ValidationError::new(violations))
				})?;

				if let Some(cache) = &self.cache {
					let ttl = self.config.cache.ttl_for(ResourceClass::Product, ttl_override);

					cache.set(key, CachedValue::Product(Box::new(product.clone())), ttl);
				}

				Ok(product)
			})
			.await;

		record_result(OP, &result);

		result
	}

	/// Creates an order; never cached.
	///
	/// The payload is validated before transmission and the exact serialized
	/// bytes are both signed and sent. An HTTP 202 is a success for the
	/// caller (the body is returned as-is after schema validation) but is
	/// surfaced through the observability hooks, since it signals
	/// asynchronous downstream processing rather than completion.
	pub async fn create_order(&self, order: &ApliiqOrder) -> Result<ApliiqOrderResponse> {
		const OP: ApiOp = ApiOp::CreateOrder;

		let span = RequestSpan::new(OP, "create_order");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let violations = validate::check_order(order);

				if !violations.is_empty() {
					return Err(ValidationError::new(violations).into());
				}

				let wire_body = serde_json::to_vec(order)
					.map_err(|err| Error::unknown(format!("order payload failed to serialize: {err}")))?;
				let response =
					self.dispatch(ApiMethod::Post, "Order".into(), Some(wire_body)).await?;

				if response.status == 202 {
					obs::order_accepted_event(&order.order_number);
					obs::record_order_accepted();
				}

				validate::decode_order_response(response.body)
					.map_err(|violations| ValidationError::new(violations).into())
			})
			.await;

		record_result(OP, &result);

		result
	}

	/// Drops every cache entry.
	pub fn clear_cache(&self) {
		if let Some(cache) = &self.cache {
			cache.clear();
		}
	}

	/// Drops the cache entry of one product, leaving the list entry and every
	/// other product entry intact.
	pub fn clear_product_cache(&self, id: u64) {
		if let Some(cache) = &self.cache {
			cache.delete(&product_key(id));
		}
	}

	/// Drops the list entry and every single-product entry, leaving unrelated
	/// keys untouched.
	pub fn clear_products_cache(&self) {
		if let Some(cache) = &self.cache {
			cache.delete(PRODUCTS_ALL_KEY);
			cache.delete_by_prefix(PRODUCT_KEY_PREFIX);
		}
	}

	/// Cache statistics; an absent (disabled) cache reports size zero.
	pub fn cache_stats(&self) -> CacheStats {
		self.cache.as_ref().map(|cache| cache.stats()).unwrap_or(CacheStats { size: 0 })
	}

	/// Signs and executes one call, funneling failures into the taxonomy.
	///
	/// The signer runs exactly once per outbound call, cache-miss triggered
	/// calls included, over the same bytes the transport transmits.
	async fn dispatch(
		&self,
		method: ApiMethod,
		path: String,
		body: Option<Vec<u8>>,
	) -> Result<ApiResponse> {
		let header_value = self.signer.header_value(body.as_deref());
		let request =
			ApiRequest { method, path, body, headers: vec![(AUTH_HEADER, header_value)] };
		let response =
			self.transport.execute(request).await.map_err(TransportError::failure)?;

		if !(200..300).contains(&response.status) {
			return Err(TransportError::status(response.status, &response.body).into());
		}

		let body = if response.body.is_empty() {
			serde_json::Value::Null
		} else {
			serde_json::from_slice(&response.body).map_err(|err| {
				Error::unknown(format!("upstream returned malformed JSON: {err}"))
			})?
		};

		Ok(ApiResponse { status: response.status, body })
	}
}
#[cfg(feature = "reqwest")]
impl ApliiqClient<ReqwestTransport> {
	/// Creates a client with the crate's default reqwest transport.
	///
	/// The transport honors the configured endpoint and timeout. Use
	/// [`ApliiqClient::with_transport`] to supply a custom stack instead.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let transport = ReqwestTransport::new(&config)?;

		Self::with_transport(config, transport)
	}
}
// Handles are cheap to clone regardless of whether the transport itself is.
impl<T> Clone for ApliiqClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			signer: self.signer.clone(),
			transport: self.transport.clone(),
			cache: self.cache.clone(),
		}
	}
}
impl<T> Debug for ApliiqClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApliiqClient")
			.field("app_id", &self.config.app_id)
			.field("endpoint", &self.config.endpoint.as_str())
			.field("cache_enabled", &self.cache.is_some())
			.finish()
	}
}

/// Decoded status + JSON body pair used inside the facade.
struct ApiResponse {
	status: u16,
	body: serde_json::Value,
}

fn record_result<V>(op: ApiOp, result: &Result<V>) {
	match result {
		Ok(_) => obs::record_op_outcome(op, OpOutcome::Success),
		Err(_) => obs::record_op_outcome(op, OpOutcome::Failure),
	}
}
