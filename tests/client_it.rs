// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use apliiq_client::{
	_preludet::*,
	cache::CacheStats,
	config::{CacheConfig, ClientConfig},
	model::{ApliiqLineItem, ApliiqOrder, ShippingAddress},
};

const APP_ID: &str = "test-app";
const SHARED_SECRET: &str = "test-secret";

fn build_config(server: &MockServer) -> ClientConfig {
	ClientConfig::new(APP_ID, SHARED_SECRET)
		.with_endpoint(
			Url::parse(&server.base_url()).expect("Mock server base URL should parse."),
		)
		.with_timeout(Duration::seconds(5))
}

fn build_client(server: &MockServer) -> ReqwestTestClient {
	build_reqwest_test_client(build_config(server))
}

fn valid_order() -> ApliiqOrder {
	ApliiqOrder {
		order_number: "1001".into(),
		line_items: vec![ApliiqLineItem {
			title: Some("Premium Hoodie".into()),
			sku: Some("APQ-1998244S7A1".into()),
			price: Some("45.50".into()),
			quantity: Some(2),
			..ApliiqLineItem::default()
		}],
		shipping_address: Some(ShippingAddress {
			country_code: Some("US".into()),
			province_code: Some("CA".into()),
			..ShippingAddress::default()
		}),
		..ApliiqOrder::default()
	}
}

#[tokio::test]
async fn list_fetch_populates_both_cache_tiers() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product");
			then.status(200).header("content-type", "application/json").json_body(json!([{
				"Products": [
					{ "Id": 162, "Name": "Premium Tee" },
					{ "Id": 7, "Name": "Classic Hoodie" }
				]
			}]));
		})
		.await;
	// The single-product endpoint must never be called.
	let item_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product/162");
			then.status(200).json_body(json!({ "Id": 162 }));
		})
		.await;
	let products =
		client.products().await.expect("Initial product list fetch should succeed.");

	assert_eq!(products.len(), 2);
	// List entry + one entry per product.
	assert_eq!(client.cache_stats(), CacheStats { size: 3 });

	let single = client
		.product(162)
		.await
		.expect("Single-product read should be served from the cache.");

	assert_eq!(single.id, 162);
	assert_eq!(single.name.as_deref(), Some("Premium Tee"));

	let relisted = client.products().await.expect("Cached list read should succeed.");

	assert_eq!(relisted.len(), 2);

	list_mock.assert_calls_async(1).await;
	item_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn requests_carry_a_well_formed_auth_header() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product/7").header_matches(
				"x-apliiq-auth",
				r"^\d+:[A-Za-z0-9+/]+=*:test-app:[0-9a-f]{32}$",
			);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "data": { "Id": 7, "Name": "Classic Hoodie" } }));
		})
		.await;
	let product = client.product(7).await.expect("Signed single-product fetch should succeed.");

	assert_eq!(product.id, 7);

	mock.assert_async().await;
}

#[tokio::test]
async fn disabled_cache_forces_upstream_fetches() {
	let server = MockServer::start_async().await;
	let config = build_config(&server).with_cache(CacheConfig::disabled());
	let client = build_reqwest_test_client(config);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product");
			then.status(200).json_body(json!({ "products": [{ "Id": 1 }] }));
		})
		.await;

	client.products().await.expect("First uncached fetch should succeed.");
	client.products().await.expect("Second uncached fetch should succeed.");

	assert_eq!(client.cache_stats(), CacheStats { size: 0 });

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn cache_clearing_is_scoped_per_operation() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product");
			then.status(200).json_body(json!({ "products": [{ "Id": 162 }, { "Id": 7 }] }));
		})
		.await;
	let item_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product/162");
			then.status(200).json_body(json!({ "Id": 162, "Name": "Refetched" }));
		})
		.await;

	client.products().await.expect("Product list fetch should succeed.");

	// Dropping one product entry leaves the list and the other product alone.
	client.clear_product_cache(162);

	assert_eq!(client.cache_stats(), CacheStats { size: 2 });

	let refetched =
		client.product(162).await.expect("Evicted product read should refetch upstream.");

	assert_eq!(refetched.name.as_deref(), Some("Refetched"));

	let listed = client.products().await.expect("List read should still be cached.");

	assert_eq!(listed.len(), 2);

	list_mock.assert_calls_async(1).await;
	item_mock.assert_calls_async(1).await;

	// Dropping all product state leaves nothing behind.
	client.clear_products_cache();

	assert_eq!(client.cache_stats(), CacheStats { size: 0 });
}

#[tokio::test]
async fn order_accepted_with_202_is_a_success() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/Order")
				.header("content-type", "application/json")
				.header_exists("x-apliiq-auth");
			then.status(202)
				.header("content-type", "application/json")
				.json_body(json!({ "status": "accepted" }));
		})
		.await;
	let response = client
		.create_order(&valid_order())
		.await
		.expect("A 202 from order creation must surface as success, not an error.");

	assert!(response.id.is_none());
	assert_eq!(response.extra.get("status"), Some(&json!("accepted")));

	mock.assert_async().await;
}

#[tokio::test]
async fn invalid_order_never_reaches_the_wire() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/Order");
			then.status(200).json_body(json!({ "id": 1 }));
		})
		.await;
	let mut order = valid_order();

	order.line_items[0].price = Some("45.5".into());
	order.line_items[0].sku = Some("1998244S7A1".into());

	let err = client
		.create_order(&order)
		.await
		.expect_err("Business-rule violations must fail before transmission.");

	assert_eq!(err.status_code(), 400);

	let message = err.to_string();

	assert!(message.contains("two decimals"), "price violation must be reported: {message}");
	assert!(message.contains("APQ-"), "SKU violation must be reported too: {message}");
	assert!(message.contains(", "), "violations must be comma-joined: {message}");

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn upstream_failure_maps_to_transport_error_with_detail() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product");
			then.status(503)
				.header("content-type", "application/json")
				.json_body(json!({ "error": "maintenance window" }));
		})
		.await;
	let err =
		client.products().await.expect_err("Upstream 503 must surface as a transport error.");

	assert!(matches!(err, Error::Transport(_)));
	assert_eq!(err.status_code(), 503);
	assert_eq!(err.detail(), Some(&json!({ "error": "maintenance window" })));

	mock.assert_async().await;
}

#[tokio::test]
async fn unrecognized_list_shape_fails_loudly() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product");
			then.status(200).json_body(json!({}));
		})
		.await;
	let err = client
		.products()
		.await
		.expect_err("An empty-object envelope must fail normalization.");

	assert!(matches!(err, Error::Unknown { .. }));
	assert!(
		err.to_string().contains("object"),
		"the failure must name the actual top-level shape: {err}"
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn malformed_list_element_fails_the_whole_batch() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product");
			then.status(200)
				.json_body(json!({ "products": [{ "Id": 1 }, { "Name": "no identity" }] }));
		})
		.await;
	let err = client
		.products()
		.await
		.expect_err("A malformed list element must fail the batch without partial success.");

	assert!(matches!(err, Error::Validation(_)));
	assert_eq!(err.status_code(), 400);
	assert_eq!(
		client.cache_stats(),
		CacheStats { size: 0 },
		"a failed batch must not populate any cache tier"
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_reads_share_one_client_instance() {
	let server = MockServer::start_async().await;
	let client = std::sync::Arc::new(build_client(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product");
			then.status(200).json_body(json!({ "products": [{ "Id": 1 }, { "Id": 2 }] }));
		})
		.await;
	let client_a = client.clone();
	let client_b = client.clone();
	let (first, second) = tokio::join!(client_a.products(), client_b.products());

	assert_eq!(first.expect("Concurrent fetch A should succeed.").len(), 2);
	assert_eq!(second.expect("Concurrent fetch B should succeed.").len(), 2);

	// No request deduplication is promised; both misses may hit upstream.
	let calls = mock.calls_async().await;

	assert!((1..=2).contains(&calls), "unexpected upstream call count: {calls}");
	assert_eq!(client.cache_stats(), CacheStats { size: 3 });
}
