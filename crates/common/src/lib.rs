//! Wire types and errors shared across `encrypt-svc` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
