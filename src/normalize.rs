//! Tolerant extraction of canonical entities from inconsistent upstream
//! response envelopes.
//!
//! The collection endpoint wraps its payload differently between deployments:
//! sometimes a top-level array whose first element carries the real list under
//! a nested field, sometimes an object exposing the list under one of a few
//! known names. This module is the only place that tolerance lives; the rest
//! of the crate only ever sees a clean sequence of entities.

// self
use crate::_prelude::*;

/// Known list-carrying field names, probed in fixed priority order.
///
/// The order is significant (first array wins) and deliberately documented as
/// a constant rather than re-derived: upstream PascalCase first, then the
/// generic envelope names in decreasing specificity.
pub const LIST_FIELDS: [&str; 5] = ["Products", "products", "data", "items", "value"];

/// Normalization failure naming the shape that was actually received.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum NormalizeError {
	/// The top-level value was an array or object, but no known field carried
	/// a product list.
	#[error(
		"Products response ({found}) does not expose a product list under any known field \
		 (Products, products, data, items, value)."
	)]
	MissingList {
		/// Top-level JSON type that was received.
		found: &'static str,
	},
	/// The top-level value cannot carry a product list at all.
	#[error("Products response has an unsupported top-level type: {found}.")]
	UnsupportedType {
		/// Top-level JSON type that was received.
		found: &'static str,
	},
}

/// Extracts the ordered product list from a raw collection response body.
///
/// Shapes are tried in order: (a) a top-level array whose first element is an
/// object carrying the list under a known field; (b) a top-level object
/// probed for the known field names, first array wins; (c) everything else
/// fails loudly with the observed top-level type.
pub fn extract_product_list(body: &serde_json::Value) -> Result<Vec<serde_json::Value>, NormalizeError> {
	match body {
		serde_json::Value::Array(items) => {
			if let Some(serde_json::Value::Object(first)) = items.first()
				&& let Some(list) = probe_list_fields(first)
			{
				return Ok(list.clone());
			}

			Err(NormalizeError::MissingList { found: "array" })
		},
		serde_json::Value::Object(map) => probe_list_fields(map)
			.cloned()
			.ok_or(NormalizeError::MissingList { found: "object" }),
		other => Err(NormalizeError::UnsupportedType { found: json_type_name(other) }),
	}
}

/// Extracts the canonical entity from a single-entity response body.
///
/// Prefers a nested `data` object field when present; otherwise the body
/// itself is the entity.
pub fn extract_entity(body: serde_json::Value) -> serde_json::Value {
	match body {
		serde_json::Value::Object(mut map) => {
			if matches!(map.get("data"), Some(serde_json::Value::Object(_)))
				&& let Some(data) = map.remove("data")
			{
				return data;
			}

			serde_json::Value::Object(map)
		},
		other => other,
	}
}

/// Stable name of a JSON value's type, used in normalization failures.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "boolean",
		serde_json::Value::Number(_) => "number",
		serde_json::Value::String(_) => "string",
		serde_json::Value::Array(_) => "array",
		serde_json::Value::Object(_) => "object",
	}
}

fn probe_list_fields(
	map: &serde_json::Map<String, serde_json::Value>,
) -> Option<&Vec<serde_json::Value>> {
	LIST_FIELDS.iter().find_map(|field| map.get(*field).and_then(serde_json::Value::as_array))
}
