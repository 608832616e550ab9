//! Serde helpers for backend payloads
//!
//! The backend is loose about JSON types: ids may be numbers or strings and
//! money may be a number or a numeric string. Everything is accepted here and
//! normalized to `String` ids and `Decimal` amounts. Amounts go back out as
//! JSON numbers.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value as JsonValue;

fn parse_decimal(value: &JsonValue) -> Option<Decimal> {
    match value {
        JsonValue::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .ok()
        }
        JsonValue::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Deserialize ID that can be number or string
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::String(s) => Ok(s),
        _ => Err(D::Error::custom("expected number or string for id")),
    }
}

/// Deserialize optional ID that can be number or string
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(JsonValue::Null) | None => Ok(None),
        _ => Err(D::Error::custom("expected number or string for id")),
    }
}

/// Amount that can be number or string; null counts as zero
pub mod amount {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let value: JsonValue = Deserialize::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Decimal::ZERO);
        }
        parse_decimal(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid amount: {}", value)))
    }

    pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::Error;
        let value = amount
            .to_f64()
            .ok_or_else(|| S::Error::custom("amount out of range"))?;
        serializer.serialize_f64(value)
    }
}

/// Optional amount that can be number, string or null
pub mod optional_amount {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let value: Option<JsonValue> = Option::deserialize(deserializer)?;
        match value {
            None | Some(JsonValue::Null) => Ok(None),
            Some(v) => parse_decimal(&v)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid amount: {}", v))),
        }
    }
}
