//! Parsing user-supplied remap tables

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Parse a JSON object of string-to-string pairs into a remap mapping,
/// e.g. `{"Yes": "Si", "No": "No"}`.
pub fn parse_mapping(text: &str) -> Result<IndexMap<String, String>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| EngineError::InvalidMapping(e.to_string()))?;
    let object = match value {
        Value::Object(map) => map,
        _ => {
            return Err(EngineError::InvalidMapping(
                "expected a JSON object of string pairs".to_string(),
            ))
        }
    };
    let mut mapping = IndexMap::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::String(s) => {
                mapping.insert(key, s);
            }
            _ => {
                return Err(EngineError::InvalidMapping(format!(
                    "value for \"{key}\" must be a string"
                )))
            }
        }
    }
    Ok(mapping)
}
