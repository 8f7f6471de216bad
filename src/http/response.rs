//! Response decoding by declared content type.

use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// A decoded response body.
///
/// The variant follows the response's `Content-Type`: JSON payloads decode
/// to a structured value, `text/*` to a string, anything else to opaque
/// bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl ResponseData {
    /// Borrow the JSON value, if this is a JSON body.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the text, if this is a text body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the raw bytes, if this is a binary body.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResponseData::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Deserialize a JSON body into a typed value.
    ///
    /// Fails with [`ApiError::ExpectedJson`] for text or binary bodies.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        match self {
            ResponseData::Json(v) => serde_json::from_value(v.clone()).map_err(ApiError::Decode),
            _ => Err(ApiError::ExpectedJson),
        }
    }
}

/// Decode a successful response according to its `Content-Type`.
pub async fn decode_response(response: Response) -> ApiResult<ResponseData> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.contains("application/json") {
        let text = response.text().await?;
        if text.is_empty() {
            // 204-style empty JSON responses decode to null
            return Ok(ResponseData::Json(Value::Null));
        }
        serde_json::from_str(&text)
            .map(ResponseData::Json)
            .map_err(ApiError::Decode)
    } else if content_type.contains("text/") {
        Ok(ResponseData::Text(response.text().await?))
    } else {
        Ok(ResponseData::Bytes(response.bytes().await?.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
        qty: u32,
    }

    #[test]
    fn test_accessors() {
        let data = ResponseData::Json(json!({ "ok": true }));
        assert!(data.as_json().is_some());
        assert!(data.as_text().is_none());
        assert!(data.as_bytes().is_none());

        let data = ResponseData::Text("hello".to_string());
        assert_eq!(data.as_text().unwrap(), "hello");

        let data = ResponseData::Bytes(vec![0xff, 0x00]);
        assert_eq!(data.as_bytes().unwrap(), &[0xff, 0x00]);
    }

    #[test]
    fn test_typed_json() {
        let data = ResponseData::Json(json!({ "id": "p-17", "qty": 3 }));
        let item: Item = data.json().unwrap();
        assert_eq!(
            item,
            Item {
                id: "p-17".to_string(),
                qty: 3
            }
        );
    }

    #[test]
    fn test_typed_json_rejects_non_json_bodies() {
        let data = ResponseData::Text("not json".to_string());
        assert!(matches!(data.json::<Item>(), Err(ApiError::ExpectedJson)));
    }
}
