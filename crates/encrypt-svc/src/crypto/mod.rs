//! AES-256-GCM encryption primitives.
//!
//! This module is free of HTTP dependencies. It owns the process key, the
//! CSPRNG abstraction and the framing of ciphertext on the wire.
//!
//! # Ciphertext format
//!
//! ```text
//! nonce (12 bytes) || ciphertext (len(plaintext) bytes) || tag (16 bytes)
//! ```
//!
//! The nonce travels in the clear so that decryption needs only the key.

pub mod cipher;
pub mod entropy;
pub mod key;

pub use cipher::{CipherError, Encryptor};
pub use entropy::OsEntropy;
pub use key::SecretKey;
