//! Argument extraction for action implementations.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn missing(action: &str, index: usize) -> Error {
    Error::BadArgument {
        action: action.to_string(),
        index,
        reason: "missing".to_string(),
    }
}

/// Integer argument at `index`.
pub fn int(action: &str, args: &[Value], index: usize) -> Result<i64> {
    let value = args.get(index).ok_or_else(|| missing(action, index))?;
    value.as_i64().ok_or_else(|| Error::BadArgument {
        action: action.to_string(),
        index,
        reason: format!("expected an integer, got {value}"),
    })
}

/// Any deserializable argument at `index`.
pub fn parse<T: DeserializeOwned>(action: &str, args: &[Value], index: usize) -> Result<T> {
    let value = args.get(index).ok_or_else(|| missing(action, index))?;
    T::deserialize(value).map_err(|e| Error::BadArgument {
        action: action.to_string(),
        index,
        reason: e.to_string(),
    })
}
