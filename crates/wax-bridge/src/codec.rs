//! Callback URL encoding.
//!
//! The page reports a result by navigating to
//! `coconutwax://result?action=<name>&payload=<base64 JSON>`. The JSON is
//! always `{"error": string?, "data": object}`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wax_common::{Result, WaxError};

use crate::route::parse_query;

pub const CALLBACK_SCHEME: &str = "coconutwax";
pub const RESULT_MARKER: &str = "://result";
/// Action name used when the page got a route it does not handle.
pub const UNKNOWN_ROUTE_ACTION: &str = "error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CallbackPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl CallbackPayload {
    pub fn success(data: Value) -> Self {
        Self { error: None, data }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            data: Value::Object(Default::default()),
        }
    }

    /// The error string, if present and non-empty.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// Project `data` into `T`, ignoring the error field.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        let data = match self.data {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        serde_json::from_value(data)
            .map_err(|e| WaxError::Protocol(format!("unexpected payload shape: {e}")))
    }

    /// `Rejected` if the error field is set, otherwise the projected data.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        if let Some(message) = self.error_message() {
            return Err(WaxError::Rejected(message.to_string()));
        }
        self.into_data()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallbackEnvelope {
    pub action: String,
    pub payload: CallbackPayload,
}

/// Build the callback URL the page navigates to.
pub fn encode_callback(action: &str, payload: &CallbackPayload) -> Result<String> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| WaxError::Protocol(format!("failed to serialize payload: {e}")))?;
    Ok(format!(
        "{CALLBACK_SCHEME}{RESULT_MARKER}?action={}&payload={}",
        urlencoding::encode(action),
        URL_SAFE_NO_PAD.encode(json)
    ))
}

/// Whether a navigation target is a callback rather than a page load.
pub fn is_callback_url(url: &str) -> bool {
    url.starts_with(CALLBACK_SCHEME) && url.contains(RESULT_MARKER)
}

/// Decode a callback URL into its action and payload.
///
/// The payload may use the standard or URL-safe base64 alphabet, with or
/// without padding.
pub fn decode_envelope(raw: &str) -> Result<CallbackEnvelope> {
    if !raw.contains(RESULT_MARKER) {
        return Err(WaxError::Protocol(format!("not a callback url: {raw}")));
    }

    let mut params = parse_query(raw);
    let action = params
        .remove("action")
        .ok_or_else(|| WaxError::Protocol("callback is missing 'action'".into()))?;
    let encoded = params
        .remove("payload")
        .ok_or_else(|| WaxError::Protocol("callback is missing 'payload'".into()))?;

    let normalized: String = encoded
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| WaxError::Protocol(format!("payload is not valid base64: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| WaxError::Protocol(format!("payload is not valid UTF-8: {e}")))?;
    let payload: CallbackPayload = serde_json::from_str(&text)
        .map_err(|e| WaxError::Protocol(format!("payload is not valid JSON: {e}")))?;

    Ok(CallbackEnvelope { action, payload })
}

/// Decode a callback straight into its typed result.
pub fn decode_callback<T: DeserializeOwned>(raw: &str) -> Result<T> {
    decode_envelope(raw)?.payload.into_result()
}
