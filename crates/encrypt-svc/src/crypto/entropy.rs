//! CSPRNG access for key generation and nonce sampling.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

use super::cipher::CipherError;

/// Source of cryptographically secure random bytes.
///
/// Implementations must either fill the whole buffer or return an error;
/// a short fill is never reported as success.
#[cfg_attr(test, mockall::automock)]
pub trait EntropySource {
    /// Overwrite every byte of `buf` with fresh random output.
    fn fill(&self, buf: &mut [u8]) -> Result<(), CipherError>;
}

/// The operating system RNG (`getrandom`). Safe for concurrent use.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CipherError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CipherError::Entropy(e.to_string()))
    }
}
