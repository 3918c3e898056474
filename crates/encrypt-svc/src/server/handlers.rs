//! Axum request handlers for all service endpoints.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{EncryptRequest, EncryptResponse, HealthResponse};
use common::ServiceError;
use tracing::{debug, error};

use super::state::AppState;
use crate::crypto::{CipherError, Encryptor};

/// `POST /encrypt` — encrypt the `data` field under the process key.
///
/// The body is decoded as JSON whatever its `Content-Type`. Decoder errors are
/// returned verbatim as a plain-text 400.
pub async fn encrypt(State(state): State<AppState>, body: Bytes) -> Response {
    let req: EncryptRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return error_response(ServiceError::BadRequest(e.to_string())),
    };

    match handle(&state.encryptor, state.architecture, &req) {
        Ok(resp) => {
            debug!(
                plaintext_len = req.data.len(),
                time_ms = resp.time_ms,
                "payload encrypted"
            );
            (StatusCode::OK, Json(resp)).into_response()
        }
        Err(e) => error_response(ServiceError::EncryptionFailure(e.to_string())),
    }
}

/// Any method other than `POST` on `/encrypt`.
pub async fn method_not_allowed() -> Response {
    let mut resp = error_response(ServiceError::MethodNotAllowed);
    resp.headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("POST"));
    resp
}

/// `GET /health` — liveness check.
///
/// The key is created before the listener binds, so a serving process is
/// always ready.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        architecture: state.architecture.into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> Response {
    error_response(ServiceError::NotFound)
}

/// Encrypt one decoded request and assemble the response record.
///
/// `time_ms` covers encryption and encoding, measured on a monotonic clock.
///
/// # Errors
///
/// Returns the [`CipherError`] from the encryptor; nothing is retained.
pub fn handle(
    encryptor: &Encryptor,
    architecture: &str,
    req: &EncryptRequest,
) -> Result<EncryptResponse, CipherError> {
    let started = Instant::now();
    let framed = encryptor.encrypt(req.data.as_bytes())?;
    let encrypted_data = framed.to_base64();
    Ok(EncryptResponse {
        encrypted_data,
        architecture: architecture.to_owned(),
        time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

/// Render a [`ServiceError`] as a plain-text response with its status code.
///
/// Client errors are logged at `debug`; everything else at `error`.
fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if err.is_client_error() {
        debug!(status = status.as_u16(), error = %err, "request rejected");
    } else {
        error!(status = status.as_u16(), error = %err, "request failed");
    }
    (status, err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::{FRAME_OVERHEAD, KEY_LEN, NONCE_LEN};
    use crate::crypto::entropy::{EntropySource, MockEntropySource};
    use crate::crypto::{OsEntropy, SecretKey};
    use aes_gcm::{
        aead::{Aead, KeyInit, Payload},
        Aes256Gcm, Nonce,
    };
    use axum::routing::{get, post};
    use axum::{body::Body, http::Request, Router};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    const KEY: [u8; KEY_LEN] = [0x11; KEY_LEN];

    fn test_router(state: AppState) -> Router {
        Router::new()
            .route("/encrypt", post(encrypt).fallback(method_not_allowed))
            .route("/health", get(health))
            .with_state(state)
    }

    fn post_encrypt(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/encrypt")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(resp: Response) -> Bytes {
        axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap()
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Render `err` under a JSON subscriber and return what it logged.
    fn logged_by(err: ServiceError) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            error_response(err);
        });
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn request(data: &str) -> EncryptRequest {
        EncryptRequest { data: data.into() }
    }

    #[test]
    fn handle_decrypts_with_known_key() {
        let enc = Encryptor::new(SecretKey::from_bytes(KEY), Arc::new(OsEntropy));
        let resp = handle(&enc, "amd64", &request("abc")).unwrap();
        let framed = STANDARD.decode(&resp.encrypted_data).unwrap();
        let (nonce, body) = framed.split_at(NONCE_LEN);
        let plaintext = Aes256Gcm::new_from_slice(&KEY)
            .unwrap()
            .decrypt(Nonce::from_slice(nonce), Payload { msg: body, aad: b"" })
            .unwrap();
        assert_eq!(plaintext, b"abc");
        assert_eq!(resp.architecture, "amd64");
    }

    #[test]
    fn handle_reports_utf8_byte_length() {
        let enc = Encryptor::new(SecretKey::from_bytes(KEY), Arc::new(OsEntropy));
        // Six characters, nine UTF-8 bytes.
        let data = "héllo✓";
        let resp = handle(&enc, "arm64", &request(data)).unwrap();
        let framed = STANDARD.decode(&resp.encrypted_data).unwrap();
        assert_eq!(framed.len(), data.len() + FRAME_OVERHEAD);
    }

    #[test]
    fn handle_surfaces_entropy_failure() {
        let mut entropy = MockEntropySource::new();
        entropy
            .expect_fill()
            .returning(|_| Err(CipherError::Entropy("no entropy".into())));
        let enc = Encryptor::new(SecretKey::from_bytes(KEY), Arc::new(entropy));
        assert!(handle(&enc, "amd64", &request("x")).is_err());
    }

    #[tokio::test]
    async fn malformed_json_returns_400_with_decoder_message() {
        let app = test_router(AppState::with_fixed_key(KEY));
        let resp = app.oneshot(post_encrypt("not-json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_bytes(resp).await;
        let expected = serde_json::from_slice::<EncryptRequest>(b"not-json")
            .unwrap_err()
            .to_string();
        assert_eq!(body, expected.as_bytes());
    }

    #[tokio::test]
    async fn missing_data_returns_400() {
        let app = test_router(AppState::with_fixed_key(KEY));
        let resp = app.oneshot(post_encrypt("{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_bytes(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("missing field `data`"));
    }

    #[tokio::test]
    async fn non_string_data_returns_400() {
        let app = test_router(AppState::with_fixed_key(KEY));
        let resp = app.oneshot(post_encrypt(r#"{"data": 5}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn body_without_content_type_is_accepted() {
        let app = test_router(AppState::with_fixed_key(KEY));
        let req = Request::builder()
            .method("POST")
            .uri("/encrypt")
            .body(Body::from(r#"{"data":"hello"}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_returns_405_with_allow_header() {
        let app = test_router(AppState::with_fixed_key(KEY));
        let req = Request::builder()
            .method("GET")
            .uri("/encrypt")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[header::ALLOW], "POST");
    }

    #[tokio::test]
    async fn entropy_failure_returns_500_and_service_recovers() {
        let calls = AtomicUsize::new(0);
        let mut entropy = MockEntropySource::new();
        entropy.expect_fill().returning(move |buf| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(CipherError::Entropy("rng offline".into()))
            } else {
                OsEntropy.fill(buf)
            }
        });
        let state = AppState::new(Encryptor::new(
            SecretKey::from_bytes(KEY),
            Arc::new(entropy),
        ));
        let app = test_router(state);

        let resp = app
            .clone()
            .oneshot(post_encrypt(r#"{"data":"x"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_bytes(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("rng offline"));

        let resp = app.oneshot(post_encrypt(r#"{"data":"x"}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = test_router(AppState::with_fixed_key(KEY));
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.architecture, crate::platform::architecture());
    }

    #[test]
    fn client_errors_log_at_debug_only() {
        for err in [
            ServiceError::BadRequest("expected value".into()),
            ServiceError::NotFound,
            ServiceError::MethodNotAllowed,
        ] {
            let out = logged_by(err);
            assert!(out.contains(r#""level":"DEBUG""#), "{out}");
            assert!(!out.contains(r#""level":"ERROR""#), "{out}");
        }
    }

    #[test]
    fn encryption_failure_logs_at_error() {
        let out = logged_by(ServiceError::EncryptionFailure("rng offline".into()));
        assert!(out.contains(r#""level":"ERROR""#), "{out}");
        assert!(out.contains("rng offline"));
    }
}
