//! Structural and business-rule validation for inbound and outbound payloads.
//!
//! Structural checks decode JSON values into their typed shapes, using
//! `serde_path_to_error` so every violation names the offending field path.
//! Business rules are explicit predicates returning structured
//! [`Violation`] values; nothing in this module raises an error itself, the
//! facade maps non-empty violation lists into
//! [`ValidationError`](crate::error::ValidationError) at the boundary.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::Violation,
	model::{ApliiqLineItem, ApliiqOrder, ApliiqOrderResponse, Product, ShippingAddress},
};

/// Required prefix for every line-item SKU.
pub const SKU_PREFIX: &str = "APQ-";

/// Decodes one product payload, reporting every structural mismatch.
pub fn decode_product(value: serde_json::Value) -> Result<Product, Vec<Violation>> {
	decode("product", value)
}

/// Decodes a normalized product list element-by-element.
///
/// Each element is validated independently, but a single malformed element
/// fails the whole batch; there is no partial-success return.
pub fn decode_products(values: Vec<serde_json::Value>) -> Result<Vec<Product>, Vec<Violation>> {
	let mut products = Vec::with_capacity(values.len());
	let mut violations = Vec::new();

	for (index, value) in values.into_iter().enumerate() {
		match decode::<Product>(&format!("products[{index}]"), value) {
			Ok(product) => products.push(product),
			Err(mut errs) => violations.append(&mut errs),
		}
	}

	if violations.is_empty() { Ok(products) } else { Err(violations) }
}

/// Decodes the order-creation response body.
pub fn decode_order_response(
	value: serde_json::Value,
) -> Result<ApliiqOrderResponse, Vec<Violation>> {
	decode("order response", value)
}

/// Checks every business rule on an outbound order.
///
/// The returned list is empty when the order is valid; otherwise it carries
/// one violation per broken rule so the caller sees all of them at once.
pub fn check_order(order: &ApliiqOrder) -> Vec<Violation> {
	let mut violations = Vec::new();

	if order.order_number.trim().is_empty() {
		violations.push(Violation::at("order_number", "is required"));
	}
	if order.line_items.is_empty() {
		violations.push(Violation::at("line_items", "must contain at least one item"));
	}

	for (index, item) in order.line_items.iter().enumerate() {
		check_line_item(index, item, &mut violations);
	}

	match &order.shipping_address {
		None => violations.push(Violation::at("shipping_address", "is required")),
		Some(address) => check_shipping_address(address, &mut violations),
	}

	violations
}

fn check_line_item(index: usize, item: &ApliiqLineItem, violations: &mut Vec<Violation>) {
	let field = |name: &str| format!("line_items[{index}].{name}");
	let has_title = item.title.as_deref().is_some_and(|value| !value.trim().is_empty());
	let has_name = item.name.as_deref().is_some_and(|value| !value.trim().is_empty());

	if !has_title && !has_name {
		violations.push(Violation::at(
			format!("line_items[{index}]"),
			"must carry a title or a name",
		));
	}

	match item.quantity {
		Some(quantity) if quantity > 0 => {},
		Some(_) => violations.push(Violation::at(field("quantity"), "must be positive")),
		None => violations.push(Violation::at(field("quantity"), "is required")),
	}

	match item.price.as_deref() {
		Some(price) if is_two_decimal_price(price) => {},
		Some(price) => violations.push(Violation::at(
			field("price"),
			format!("`{price}` must be a numeric string with exactly two decimals"),
		)),
		None => violations.push(Violation::at(field("price"), "is required")),
	}

	match item.sku.as_deref() {
		Some(sku) if sku.starts_with(SKU_PREFIX) => {},
		Some(sku) => violations.push(Violation::at(
			field("sku"),
			format!("`{sku}` must start with the {SKU_PREFIX} prefix"),
		)),
		None => violations.push(Violation::at(field("sku"), "is required")),
	}
}

fn check_shipping_address(address: &ShippingAddress, violations: &mut Vec<Violation>) {
	let country = address.country_code.as_deref().unwrap_or_default();

	if !is_iso2_country(country) {
		violations.push(Violation::at(
			"shipping_address.country_code",
			"must be an ISO 3166-1 alpha-2 code",
		));
	}
	if country == "US"
		&& !address.province_code.as_deref().is_some_and(|value| !value.trim().is_empty())
	{
		violations.push(Violation::at(
			"shipping_address.province_code",
			"is required for US shipping addresses",
		));
	}
}

fn decode<T>(context: &str, value: serde_json::Value) -> Result<T, Vec<Violation>>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value).map_err(|err| {
		let path = err.path().to_string();
		let field = if path == "." { context.to_owned() } else { format!("{context}.{path}") };

		vec![Violation::at(field, err.inner().to_string())]
	})
}

fn is_two_decimal_price(value: &str) -> bool {
	let Some((whole, fraction)) = value.split_once('.') else {
		return false;
	};

	!whole.is_empty()
		&& whole.bytes().all(|byte| byte.is_ascii_digit())
		&& fraction.len() == 2
		&& fraction.bytes().all(|byte| byte.is_ascii_digit())
}

fn is_iso2_country(value: &str) -> bool {
	value.len() == 2 && value.bytes().all(|byte| byte.is_ascii_uppercase())
}
