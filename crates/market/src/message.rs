//! Parsing of quote messages sent by participants' browsers
//!
//! A message is a JSON object such as `{"offer": 60}` or `{"offer": "60"}`.
//! An empty object (or `null`) carries no quote and only asks for a refresh.

use serde_json::Value;

use crate::error::{MarketError, Result};
use auction_core::Price;

/// Parse a price typed by a participant
pub fn parse_price(raw: &str) -> Result<Price> {
    raw.trim()
        .parse::<Price>()
        .map_err(|_| MarketError::InvalidQuote(raw.to_string()))
}

/// Extract the quoted price from a live message
///
/// Returns `Ok(None)` for refresh messages that carry no quote.
pub fn parse_offer(data: &Value) -> Result<Option<Price>> {
    let map = match data {
        Value::Null => return Ok(None),
        Value::Object(map) if map.is_empty() => return Ok(None),
        Value::Object(map) => map,
        other => return Err(MarketError::InvalidQuote(other.to_string())),
    };

    match map.get("offer") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(truncate_to_price))
            .map(Some)
            .ok_or_else(|| MarketError::InvalidQuote(n.to_string())),
        Some(Value::String(s)) => parse_price(s).map(Some),
        _ => Err(MarketError::InvalidQuote(data.to_string())),
    }
}

/// Truncate a float toward zero, or None when the result is not an i64
fn truncate_to_price(f: f64) -> Option<Price> {
    // -2^63 and 2^63 are exact in f64; the upper bound is exclusive
    let t = f.trunc();
    (t >= Price::MIN as f64 && t < Price::MAX as f64).then_some(t as Price)
}
