//! Tool parameter parsing
//!
//! Turns `--json` and repeated `--param key=value` flags into the JSON body
//! sent to a tool's start endpoint.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/// Parse a single `key=value` pair
///
/// The value is read as JSON when it parses (`width=320`, `loop=true`,
/// `size=[1,2]`), otherwise kept as a plain string (`text=hello`).
pub fn parse_param(input: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = input.split_once('=') else {
        bail!("invalid parameter '{}': expected KEY=VALUE", input);
    };

    let key = key.trim();
    if key.is_empty() {
        bail!("invalid parameter '{}': key cannot be empty", input);
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Build the request body from an optional JSON object and `key=value` pairs
///
/// Pairs override keys of the JSON object.
pub fn build_params(json: Option<&str>, pairs: &[String]) -> Result<Value> {
    let mut params = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("--json is not valid JSON")? {
            Value::Object(map) => map,
            other => bail!("--json must be a JSON object, got {}", other),
        },
        None => Map::new(),
    };

    for pair in pairs {
        let (key, value) = parse_param(pair)?;
        params.insert(key, value);
    }

    Ok(Value::Object(params))
}
