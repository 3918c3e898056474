//! [`SecretKey`]: the process-wide AES-256 key.
//!
//! Created once in `main`, moved into the [`Encryptor`](super::Encryptor) and
//! shared read-only for the lifetime of the process. There is no setter and no
//! way to re-initialise it.

use zeroize::Zeroizing;

use super::cipher::{CipherError, KEY_LEN};
use super::entropy::EntropySource;

/// Fixed-size key buffer holding exactly [`KEY_LEN`] bytes.
///
/// The bytes are wiped when the value is dropped.
pub struct SecretKey(Zeroizing<[u8; KEY_LEN]>);

impl SecretKey {
    /// Draw a fresh key from `entropy`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Entropy`] if the source cannot supply
    /// [`KEY_LEN`] bytes. Callers at startup treat this as fatal.
    pub fn generate(entropy: &dyn EntropySource) -> Result<Self, CipherError> {
        let mut buf = Zeroizing::new([0u8; KEY_LEN]);
        entropy.fill(&mut buf[..])?;
        Ok(Self(buf))
    }

    /// Wrap known key bytes. Used to inject a fixed key under test.
    #[cfg(test)]
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Borrow the raw key bytes.
    pub fn expose(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}
