//! Outbound order payloads and the creation response.
//!
//! Orders are write-once from the client's perspective; there is no update or
//! cancel surface. Field names follow the upstream snake_case contract.

// self
use crate::_prelude::*;

/// An order submitted to the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApliiqOrder {
	/// Caller-side order identity.
	pub order_number: String,
	/// Items to fulfill.
	#[serde(default)]
	pub line_items: Vec<ApliiqLineItem>,
	/// Destination address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub shipping_address: Option<ShippingAddress>,
	/// Any additional upstream-accepted fields, passed through verbatim.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single order line item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApliiqLineItem {
	/// Item title; at least one of title/name must be present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Item name; at least one of title/name must be present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Stock-keeping unit, `APQ-` prefixed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sku: Option<String>,
	/// Unit price as a two-decimal string (e.g. `"45.50"`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<String>,
	/// Ordered quantity; must be positive.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub quantity: Option<i64>,
	/// Any additional upstream-accepted fields, passed through verbatim.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Order destination address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
	/// ISO 3166-1 alpha-2 country code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country_code: Option<String>,
	/// Province or state code; required when the country is `US`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub province_code: Option<String>,
	/// Any additional address fields, passed through verbatim.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response returned by order creation.
///
/// Upstream identity is [`id`](Self::id). A 202 response may carry a sparse
/// body (the order was accepted for asynchronous processing), so every field
/// tolerates absence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApliiqOrderResponse {
	/// Upstream order identifier, absent until processing completes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	/// Echo of the submitted order number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_number: Option<String>,
	/// Any additional response fields, preserved verbatim.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn order_serializes_without_empty_optionals() {
		let order = ApliiqOrder {
			order_number: "1001".into(),
			line_items: vec![ApliiqLineItem {
				title: Some("Hoodie".into()),
				sku: Some("APQ-1998244S7A1".into()),
				price: Some("45.50".into()),
				quantity: Some(2),
				..ApliiqLineItem::default()
			}],
			..ApliiqOrder::default()
		};
		let value = serde_json::to_value(&order).expect("Order fixture should serialize.");

		assert_eq!(value["order_number"], json!("1001"));
		assert_eq!(value["line_items"][0]["price"], json!("45.50"));
		assert!(value["line_items"][0].get("name").is_none());
		assert!(value.get("shipping_address").is_none());
	}

	#[test]
	fn sparse_accepted_response_decodes() {
		let response: ApliiqOrderResponse =
			serde_json::from_value(json!({ "status": "accepted" }))
				.expect("Sparse 202 body should decode.");

		assert!(response.id.is_none());
		assert_eq!(response.extra.get("status"), Some(&json!("accepted")));
	}
}
