//! custom serde helper functions

use alloy_primitives::ChainId;
use serde_json::Value;

/// Parses a chain id given either as a JSON number or as a (hex or decimal) string.
pub fn parse_chain_id(value: &Value) -> Option<ChainId> {
    match value {
        Value::Number(num) => num.as_u64(),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => ChainId::from_str_radix(hex, 16).ok(),
                None => s.parse().ok(),
            }
        }
        _ => None,
    }
}

/// (De)serializes a chain id, accepting a number or a hex/decimal string.
pub mod chain_id {
    use alloy_primitives::ChainId;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(val: &ChainId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u64(*val)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<ChainId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(d)?;
        super::parse_chain_id(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid chain id: {value}")))
    }
}
