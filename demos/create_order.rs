//! Demonstrates order creation against a mock upstream: business rules run
//! before the first byte is sent, the payload is signed over its exact wire
//! bytes, and an HTTP 202 surfaces as a success with a sparse body.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use time::Duration;
use url::Url;
// self
use apliiq_client::{
	client::ReqwestApliiqClient,
	config::ClientConfig,
	model::{ApliiqLineItem, ApliiqOrder, ShippingAddress},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let order_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/Order").header_exists("x-apliiq-auth");
			then.status(202)
				.header("content-type", "application/json")
				.json_body(json!({ "status": "accepted" }));
		})
		.await;
	let config = ClientConfig::new("demo-app", "demo-secret")
		.with_endpoint(Url::parse(&server.base_url())?)
		.with_timeout(Duration::seconds(5));
	let client = ReqwestApliiqClient::new(config)?;
	let order = ApliiqOrder {
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
	};

	// A price like "45.5" or a SKU without the APQ- prefix would fail here,
	// with every violation reported at once and nothing transmitted.
	let response = client.create_order(&order).await?;

	println!("accepted: {:?}", response.extra.get("status"));

	order_mock.assert_async().await;

	Ok(())
}
