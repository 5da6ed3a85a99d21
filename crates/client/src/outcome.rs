use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ClientError;

/// Result of one API call that reached the server.
///
/// A missing resource and an upstream 500 are answers the caller (usually an
/// LLM agent) should see and reason about, so they are data rather than errors.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome<T = Value> {
    Ok(T),
    NotFound,
    UpstreamError { status: u16, body: String },
}

impl ApiOutcome<Value> {
    /// JSON handed back to tool callers.
    pub fn into_json(self) -> Value {
        match self {
            Self::Ok(payload) => payload,
            Self::NotFound => json!({ "error": "Resource not found", "status_code": 404 }),
            Self::UpstreamError { status, .. } => {
                json!({ "error": "Server error", "status_code": status })
            }
        }
    }

    /// Decodes a successful payload into one of the envelope models.
    pub fn decode<D: DeserializeOwned>(self) -> Result<ApiOutcome<D>, ClientError> {
        match self {
            Self::Ok(payload) => serde_json::from_value(payload)
                .map(ApiOutcome::Ok)
                .map_err(|error| ClientError::Decode(error.to_string())),
            Self::NotFound => Ok(ApiOutcome::NotFound),
            Self::UpstreamError { status, body } => Ok(ApiOutcome::UpstreamError { status, body }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ApiOutcome;
    use crate::models::{DocumentAttributes, ListEnvelope};

    #[test]
    fn soft_failures_render_legacy_error_objects() {
        assert_eq!(
            ApiOutcome::NotFound.into_json(),
            json!({ "error": "Resource not found", "status_code": 404 })
        );
        assert_eq!(
            ApiOutcome::UpstreamError { status: 500, body: "boom".to_string() }.into_json(),
            json!({ "error": "Server error", "status_code": 500 })
        );
    }

    #[test]
    fn decode_keeps_soft_failures() {
        let decoded = ApiOutcome::NotFound
            .decode::<ListEnvelope<DocumentAttributes>>()
            .expect("not found needs no decoding");
        assert!(matches!(decoded, ApiOutcome::NotFound));
    }

    #[test]
    fn decode_rejects_payloads_of_the_wrong_shape() {
        let error = ApiOutcome::Ok(json!({ "data": "not-a-list" }))
            .decode::<ListEnvelope<DocumentAttributes>>()
            .expect_err("data must be an array");
        assert!(error.to_string().contains("could not decode"));
    }
}
