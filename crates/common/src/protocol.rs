//! Request and response types for the public HTTP API.
//!
//! All bodies are JSON. Field names are part of the wire contract and must not
//! be renamed.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
///
/// `data` is required and must be a JSON string; anything else is rejected by
/// the decoder and surfaces as a 400.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// UTF-8 plaintext to encrypt. May be empty.
    pub data: String,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Standard-alphabet, padded base64 of `nonce || ciphertext || tag`.
    pub encrypted_data: String,
    /// CPU architecture of the host that served the request (e.g. `amd64`).
    pub architecture: String,
    /// Milliseconds spent producing this response.
    pub time_ms: u64,
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// CPU architecture of the host.
    pub architecture: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encrypt_request_accepts_empty_data() {
        let req: EncryptRequest = serde_json::from_value(json!({"data": ""})).unwrap();
        assert!(req.data.is_empty());
    }

    #[test]
    fn encrypt_request_rejects_missing_data() {
        let err = serde_json::from_value::<EncryptRequest>(json!({})).unwrap_err();
        assert!(err.to_string().contains("missing field `data`"));
    }

    #[test]
    fn encrypt_request_rejects_non_string_data() {
        assert!(serde_json::from_value::<EncryptRequest>(json!({"data": 5})).is_err());
        assert!(serde_json::from_value::<EncryptRequest>(json!({"data": null})).is_err());
    }

    #[test]
    fn encrypt_response_field_names() {
        let resp = EncryptResponse {
            encrypted_data: "AAAA".into(),
            architecture: "arm64".into(),
            time_ms: 3,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({"encrypted_data": "AAAA", "architecture": "arm64", "time_ms": 3})
        );
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            architecture: "amd64".into(),
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.status, "ok");
    }
}
