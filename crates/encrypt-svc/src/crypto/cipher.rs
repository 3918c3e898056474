//! AES-256-GCM encryption into a self-contained framed ciphertext.
//!
//! A fresh 96-bit nonce is drawn from the CSPRNG for every call. Nonces are
//! never derived from a counter here; mixing the two strategies under one key
//! would void the uniqueness argument for random nonces.

use std::sync::Arc;

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::entropy::EntropySource;
use super::key::SecretKey;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Bytes added to every plaintext by framing: nonce prefix plus tag suffix.
pub const FRAME_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// Errors produced by the cipher layer.
///
/// Messages never include key bytes or plaintext.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// The CSPRNG could not supply the requested bytes.
    #[error("entropy source failed: {0}")]
    Entropy(String),

    /// AES-GCM sealing failed.
    #[error("aead operation failed")]
    AeadFailure,
}

/// `nonce || ciphertext || tag`, the layout sent on the wire.
///
/// ```text
/// offset 0..11     : nonce
/// offset 12..N-17  : ciphertext (same length as plaintext)
/// offset N-16..N-1 : GCM tag
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedCiphertext(Vec<u8>);

impl FramedCiphertext {
    /// The full framed byte sequence.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Standard-alphabet, padded base64 of the framed bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }
}

/// Encrypts plaintexts under the process key.
///
/// Holds no per-call state: each [`encrypt`](Self::encrypt) builds its own
/// cipher context and nonce, so one instance is shared across all request
/// handlers without locking.
pub struct Encryptor {
    key: SecretKey,
    entropy: Arc<dyn EntropySource + Send + Sync>,
}

impl Encryptor {
    /// Create an encryptor that owns `key` and samples nonces from `entropy`.
    pub fn new(key: SecretKey, entropy: Arc<dyn EntropySource + Send + Sync>) -> Self {
        Self { key, entropy }
    }

    /// Encrypt `plaintext` (empty is allowed) with empty associated data.
    ///
    /// The output is exactly `plaintext.len() + FRAME_OVERHEAD` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Entropy`] if no nonce could be sampled, and
    /// [`CipherError::InvalidKeyLength`] / [`CipherError::AeadFailure`] if the
    /// cipher cannot be built or run. None of these affect later calls.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<FramedCiphertext, CipherError> {
        seal(&self.key, plaintext, self.entropy.as_ref())
    }
}

impl std::fmt::Debug for Encryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encryptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

fn seal(
    key: &SecretKey,
    plaintext: &[u8],
    entropy: &dyn EntropySource,
) -> Result<FramedCiphertext, CipherError> {
    let cipher = build_cipher(key.expose())?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    entropy.fill(&mut nonce_bytes)?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    // Encrypt in place behind the nonce prefix, then append the tag.
    let mut framed = Vec::with_capacity(plaintext.len() + FRAME_OVERHEAD);
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(plaintext);
    let tag = cipher
        .encrypt_in_place_detached(nonce, b"", &mut framed[NONCE_LEN..])
        .map_err(|_| CipherError::AeadFailure)?;
    framed.extend_from_slice(&tag);

    Ok(FramedCiphertext(framed))
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)
}
