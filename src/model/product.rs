//! Catalog product as the upstream API shapes it.

// self
use crate::_prelude::*;

/// A catalog product.
///
/// Identity is [`id`](Self::id); every other field is structural, optional,
/// and opaque to the cache and signer. Upstream serializes fields in
/// PascalCase and occasionally adds new ones, which are preserved through
/// [`extra`](Self::extra) instead of being dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
	/// Upstream product identifier.
	#[serde(rename = "Id")]
	pub id: u64,
	/// Display name.
	#[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Stock-keeping unit.
	#[serde(rename = "SKU", alias = "Sku", default, skip_serializing_if = "Option::is_none")]
	pub sku: Option<String>,
	/// Price as upstream reports it (number or formatted string).
	#[serde(rename = "Price", default, skip_serializing_if = "Option::is_none")]
	pub price: Option<serde_json::Value>,
	/// Available sizes.
	#[serde(rename = "Sizes", default, skip_serializing_if = "Vec::is_empty")]
	pub sizes: Vec<serde_json::Value>,
	/// Available colors.
	#[serde(rename = "Colors", default, skip_serializing_if = "Vec::is_empty")]
	pub colors: Vec<serde_json::Value>,
	/// Any additional upstream fields, preserved verbatim.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}
impl Product {
	/// Creates a minimal product carrying only its identity.
	pub fn with_id(id: u64) -> Self {
		Self { id, ..Self::default() }
	}
}
