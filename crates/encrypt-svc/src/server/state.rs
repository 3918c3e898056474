//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::Encryptor;
use crate::platform;

/// Application state shared across all request handlers.
///
/// Cloned per request by Axum; the encryptor sits behind an `Arc` and is
/// never mutated, so no lock is needed.
#[derive(Clone)]
pub struct AppState {
    /// Encryptor owning the process key.
    pub encryptor: Arc<Encryptor>,
    /// Host architecture identifier, resolved once at startup.
    pub architecture: &'static str,
}

impl AppState {
    /// Create a new [`AppState`] around `encryptor`.
    pub fn new(encryptor: Encryptor) -> Self {
        Self {
            encryptor: Arc::new(encryptor),
            architecture: platform::architecture(),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State with a known key and the OS RNG, for decrypting responses in tests.
    pub fn with_fixed_key(key: [u8; crate::crypto::cipher::KEY_LEN]) -> Self {
        use crate::crypto::{OsEntropy, SecretKey};
        Self::new(Encryptor::new(SecretKey::from_bytes(key), Arc::new(OsEntropy)))
    }
}
