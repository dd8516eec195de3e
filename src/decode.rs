use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ClientError;

/// Longest body excerpt quoted in a decode error.
const BODY_SNIPPET_CHARS: usize = 256;

/// Controls how response bodies are mapped onto Rust types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeOptions {
    /// Normalise object keys to camelCase before matching, so `VendorId`,
    /// `vendorId` and `ID` style senders all decode into the same fields.
    pub case_insensitive: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
        }
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    body: &str,
    options: DecodeOptions,
) -> Result<T, ClientError> {
    if body.trim().is_empty() {
        return Err(ClientError::Decode("empty response body".to_owned()));
    }

    let invalid = |err: serde_json::Error| {
        ClientError::Decode(format!(
            "invalid response JSON: {err}; body: {}",
            snippet(body)
        ))
    };

    if !options.case_insensitive {
        return serde_json::from_str::<T>(body).map_err(invalid);
    }

    let mut value = serde_json::from_str::<Value>(body).map_err(invalid)?;
    normalize_keys(&mut value);
    serde_json::from_value::<T>(value).map_err(|err| {
        ClientError::Decode(format!(
            "unexpected response shape: {err}; body: {}",
            snippet(body)
        ))
    })
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}

fn normalize_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let entries = std::mem::take(map);
            let mut normalized = Map::with_capacity(entries.len());
            for (key, mut inner) in entries {
                normalize_keys(&mut inner);
                normalized.insert(camel_case(&key), inner);
            }
            *map = normalized;
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_keys),
        _ => {}
    }
}

/// Lowercases the leading uppercase run of `key`, keeping the last capital of
/// a run that starts a new word (`URLValue` -> `urlValue`, `ID` -> `id`).
pub(crate) fn camel_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len());
    let mut lowering = true;

    for (index, ch) in chars.iter().copied().enumerate() {
        if lowering {
            let next_is_lower = chars
                .get(index + 1)
                .is_some_and(|next| !next.is_uppercase());
            if !ch.is_uppercase() || (index > 0 && next_is_lower) {
                lowering = false;
            }
        }
        if lowering {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
