//! Demonstrates the cache-aware catalog reads against a mock upstream: one
//! list fetch warms both the list entry and every single-product entry, so
//! the follow-up single-product read never touches the network.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use time::Duration;
use url::Url;
// self
use apliiq_client::{client::ReqwestApliiqClient, config::ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/Product");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"products": [
					{ "Id": 162, "Name": "Premium Tee", "Price": 24.99 },
					{ "Id": 7, "Name": "Classic Hoodie", "Price": 45.50 }
				]
			}));
		})
		.await;
	let config = ClientConfig::new("demo-app", "demo-secret")
		.with_endpoint(Url::parse(&server.base_url())?)
		.with_timeout(Duration::seconds(5));
	let client = ReqwestApliiqClient::new(config)?;
	let products = client.products().await?;

	for product in &products {
		println!("{} ({})", product.name.as_deref().unwrap_or("<unnamed>"), product.id);
	}

	// Served from the cache; the mock is still at one call.
	let tee = client.product(162).await?;

	println!("cached read: {} ({})", tee.name.as_deref().unwrap_or("<unnamed>"), tee.id);
	println!("cache holds {} entries", client.cache_stats().size);

	list_mock.assert_calls_async(1).await;

	Ok(())
}
