use super::error::{Result, StorefrontError};
use serde_json::Value;

/// Marker the store includes in every cart it returns after a successful mutation.
const CART_SUCCESS_MARKER: &str = "subTotalPrice";

/// Pull the default SKU out of a catalog container.
pub fn default_sku(response: &Value) -> Result<String> {
    match response.pointer("/default_sku/id") {
        Some(Value::String(id)) => return Ok(id.clone()),
        Some(Value::Number(id)) => return Ok(id.to_string()),
        Some(Value::Null) | None => {}
        Some(other) => {
            return Err(StorefrontError::UnexpectedResponse(format!(
                "default SKU id is not a string or number: {}",
                other
            )))
        }
    }

    match response.get("cause").and_then(Value::as_str) {
        Some(cause) => Err(StorefrontError::Upstream(cause.to_owned())),
        None => Err(StorefrontError::UnexpectedResponse(
            "catalog response has neither a default SKU nor a cause".to_owned(),
        )),
    }
}

/// Decide whether a cart mutation went through.
pub fn cart_outcome(response: &Value) -> Result<()> {
    if mentions(response, CART_SUCCESS_MARKER) {
        return Ok(());
    }

    let first_error = response
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first());

    match first_error {
        Some(error) => match error.get("message").and_then(Value::as_str) {
            Some(message) => Err(StorefrontError::Upstream(message.to_owned())),
            None => Err(StorefrontError::UnexpectedResponse(format!(
                "cart error without a message: {}",
                error
            ))),
        },
        None => Err(StorefrontError::UnexpectedResponse(
            "cart response has neither a subtotal nor errors".to_owned(),
        )),
    }
}

/// Whether `needle` appears inside any key or string value anywhere in `value`.
fn mentions(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.contains(needle),
        Value::Array(items) => items.iter().any(|item| mentions(item, needle)),
        Value::Object(map) => map
            .iter()
            .any(|(key, item)| key.contains(needle) || mentions(item, needle)),
        _ => false,
    }
}
