// Facade Configuration
// Defaults applied when a caller does not choose explicitly

use crate::crypto::{HashAlgorithm, DEFAULT_KEY_BITS};
use crate::util::encoding::TextEncoding;

/// Settings for [`crate::EasyRsa`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaConfig {
    /// Modulus size for generated keys
    pub key_bits: usize,
    /// Digest used by `sign`/`verify` when none is given
    pub hash: HashAlgorithm,
    /// Charset for text plaintext
    pub text_encoding: TextEncoding,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            hash: HashAlgorithm::default(),
            text_encoding: TextEncoding::default(),
        }
    }
}

impl RsaConfig {
    pub fn with_key_bits(mut self, bits: usize) -> Self {
        self.key_bits = bits;
        self
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RsaConfig::default();
        assert_eq!(config.key_bits, 2048);
        assert_eq!(config.hash, HashAlgorithm::Sha256);
        assert_eq!(config.text_encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_builder() {
        let config = RsaConfig::default()
            .with_key_bits(4096)
            .with_hash(HashAlgorithm::Sha512)
            .with_text_encoding(TextEncoding::Latin1);
        assert_eq!(config.key_bits, 4096);
        assert_eq!(config.hash, HashAlgorithm::Sha512);
        assert_eq!(config.text_encoding, TextEncoding::Latin1);
    }
}
