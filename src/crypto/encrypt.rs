// RSA Encryption
// Public-key side of the facade: encrypt and verify

use std::fmt;

use rand::rngs::OsRng;
use rsa::pkcs1::der::Decode;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::{Result, RsaError};
use super::hash::HashAlgorithm;
use super::keygen::{encode_public_key, KeySource, MAX_KEY_BITS};
use super::padding::{check_payload, encryption_scheme, max_payload, signature_scheme};
use crate::util::encoding::{to_base64, TextEncoding};

/// Holds one public key and offers encryption and signature verification.
///
/// Immutable after construction and safe to share between threads.
#[derive(Clone)]
pub struct Encryptor {
    key: RsaPublicKey,
    blob: Vec<u8>,
    default_hash: HashAlgorithm,
}

impl Encryptor {
    /// Import a PKCS#1 DER public-key blob
    pub fn new(public_key: &[u8]) -> Result<Self> {
        if public_key.is_empty() {
            return Err(RsaError::InvalidKey("public key is empty".to_string()));
        }
        let key = decode_public_key(public_key)?;

        Ok(Self::assemble(key, public_key.to_vec()))
    }

    /// Adopt an already constructed primitive key
    pub fn from_key(key: RsaPublicKey) -> Result<Self> {
        let blob = encode_public_key(&key)?;
        Ok(Self::assemble(key, blob))
    }

    pub fn from_source(source: KeySource<RsaPublicKey>) -> Result<Self> {
        match source {
            KeySource::Blob(blob) => Self::new(&blob),
            KeySource::Handle(key) => Self::from_key(key),
        }
    }

    fn assemble(key: RsaPublicKey, blob: Vec<u8>) -> Self {
        debug!(modulus_bits = key.n().bits(), "Encryptor ready");
        Self {
            key,
            blob,
            default_hash: HashAlgorithm::default(),
        }
    }

    /// Use `hash` for `verify` instead of SHA-256
    pub fn with_default_hash(mut self, hash: HashAlgorithm) -> Self {
        self.default_hash = hash;
        self
    }

    pub fn default_hash(&self) -> HashAlgorithm {
        self.default_hash
    }

    pub fn modulus_bits(&self) -> usize {
        self.key.n().bits()
    }

    /// Ciphertext and signature length in bytes
    pub fn modulus_bytes(&self) -> usize {
        self.key.size()
    }

    /// Largest plaintext `encrypt` accepts
    pub fn max_payload(&self) -> usize {
        max_payload(self.key.size())
    }

    /// Encrypt a single block with PKCS#1 v1.5 padding.
    ///
    /// Plaintexts longer than [`Encryptor::max_payload`] fail with
    /// `PayloadTooLarge`; nothing is chunked.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        check_payload(plaintext.len(), self.key.size())?;

        let ciphertext = self
            .key
            .encrypt(&mut OsRng, encryption_scheme(), plaintext)
            .map_err(RsaError::provider)?;

        debug!(plaintext_len = plaintext.len(), "Encrypted block");
        Ok(ciphertext)
    }

    /// Encrypt UTF-8 text, returning base64 ciphertext
    pub fn encrypt_text(&self, text: &str) -> Result<String> {
        self.encrypt_text_with(text, TextEncoding::Utf8)
    }

    /// Encrypt text converted to bytes with `encoding`, returning base64 ciphertext
    pub fn encrypt_text_with(&self, text: &str, encoding: TextEncoding) -> Result<String> {
        let plaintext = encoding.encode(text)?;
        Ok(to_base64(&self.encrypt(&plaintext)?))
    }

    /// Check `signature` over `data` using the default hash.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool> {
        self.verify_with(data, signature, self.default_hash)
    }

    /// Check `signature` over `data` using `hash`.
    ///
    /// A signature that does not match (other data, other key, other hash,
    /// tampered bytes) yields `Ok(false)`. Only an empty signature is an error.
    pub fn verify_with(&self, data: &[u8], signature: &[u8], hash: HashAlgorithm) -> Result<bool> {
        if signature.is_empty() {
            return Err(RsaError::InvalidParameter("signature is empty".to_string()));
        }

        let digest = hash.digest(data);
        match self.key.verify(signature_scheme(hash), &digest, signature) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!(%hash, reason = %e, "Signature rejected");
                Ok(false)
            }
        }
    }

    /// The held public-key blob, byte for byte
    pub fn export_public_key(&self) -> Vec<u8> {
        self.blob.clone()
    }

    pub fn export_key(&self) -> Vec<u8> {
        self.export_public_key()
    }

    /// Hex SHA-256 of the public-key blob
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.blob))
    }

    /// Underlying primitive key
    pub fn key(&self) -> &RsaPublicKey {
        &self.key
    }
}

/// Parse a PKCS#1 `RSAPublicKey`, accepting any modulus `KeyGenerator` can produce
fn decode_public_key(blob: &[u8]) -> Result<RsaPublicKey> {
    let parsed = rsa::pkcs1::RsaPublicKey::from_der(blob)
        .map_err(|e| RsaError::InvalidKey(format!("cannot parse public key: {}", e)))?;
    let n = BigUint::from_bytes_be(parsed.modulus.as_bytes());
    let e = BigUint::from_bytes_be(parsed.public_exponent.as_bytes());

    RsaPublicKey::new_with_max_size(n, e, MAX_KEY_BITS)
        .map_err(|e| RsaError::InvalidKey(format!("unusable public key: {}", e)))
}

impl fmt::Debug for Encryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encryptor")
            .field("modulus_bits", &self.modulus_bits())
            .field("fingerprint", &self.fingerprint())
            .field("default_hash", &self.default_hash)
            .finish()
    }
}
