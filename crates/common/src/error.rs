//! Service error taxonomy shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::MethodNotAllowed`] → 405
/// - [`ServiceError::EncryptionFailure`] → 500
///
/// The `Display` output is sent to callers as a plain-text body, so no variant
/// may carry key material or plaintext.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The body was not valid JSON or lacked a string `data` field.
    #[error("{0}")]
    BadRequest(String),

    /// No route matches the request path.
    #[error("Not found")]
    NotFound,

    /// The route exists but does not accept this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Cipher construction or nonce sampling failed.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound => 404,
            ServiceError::MethodNotAllowed => 405,
            ServiceError::EncryptionFailure(_) => 500,
        }
    }

    /// `true` for errors caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}
