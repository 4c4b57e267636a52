// RSA Error Types
// Every failure the facade can surface to a caller

use thiserror::Error;

/// Errors returned by key generation, key import and the four RSA operations.
///
/// A failed signature check is not an error; `verify` reports it as `false`.
#[derive(Debug, Error)]
pub enum RsaError {
    /// Argument has an invalid shape (zero bit length, empty signature, bad base64).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Key blob is empty or the primitive cannot parse it into a usable key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Plaintext does not fit in a single RSA block.
    #[error("Payload too large: max {max} bytes, got {actual}")]
    PayloadTooLarge { max: usize, actual: usize },

    /// Ciphertext rejected. The reason is deliberately not reported.
    #[error("Decryption failed")]
    Decryption,

    /// The underlying primitive reported an internal failure.
    #[error("Crypto provider error: {0}")]
    CryptoProvider(String),

    /// Text could not be converted to or from the requested character encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl RsaError {
    pub(crate) fn provider(e: rsa::Error) -> Self {
        RsaError::CryptoProvider(e.to_string())
    }
}

/// Result type for RSA operations
pub type Result<T> = std::result::Result<T, RsaError>;
