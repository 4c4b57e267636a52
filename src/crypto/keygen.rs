// RSA Key Generation
// Produces paired private/public key blobs through the RSA primitive

use std::fmt;
use std::time::Instant;

use rand::rngs::OsRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::info;
use zeroize::Zeroizing;

use super::error::{Result, RsaError};

/// Modulus size used when the caller does not ask for one
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Largest modulus `KeyGenerator` produces and `Encryptor` imports
pub const MAX_KEY_BITS: usize = 16384;

/// A private-key blob and a public-key blob.
///
/// Both blobs are PKCS#1 DER as produced by the primitive. Material coming out
/// of [`KeyGenerator`] is always paired; material assembled by hand through
/// [`KeyMaterial::new`] is taken as-is, nothing checks that the halves match.
#[derive(Clone)]
pub struct KeyMaterial {
    private_key: Zeroizing<Vec<u8>>,
    public_key: Vec<u8>,
}

impl KeyMaterial {
    pub fn new(private_key: Vec<u8>, public_key: Vec<u8>) -> Self {
        Self {
            private_key: Zeroizing::new(private_key),
            public_key,
        }
    }

    pub(crate) fn from_keys(private_key: &RsaPrivateKey, public_key: &RsaPublicKey) -> Result<Self> {
        Ok(Self {
            private_key: encode_private_key(private_key)?,
            public_key: encode_public_key(public_key)?,
        })
    }

    /// Serialized private key
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// Serialized public key
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("private_key", &format_args!("[{} bytes redacted]", self.private_key.len()))
            .field("public_key", &hex::encode(&self.public_key))
            .finish()
    }
}

/// Where an `Encryptor` or `Decryptor` gets its key from: a serialized blob,
/// or a primitive handle the caller has already set up.
#[derive(Clone)]
pub enum KeySource<K> {
    Blob(Vec<u8>),
    Handle(K),
}

/// Generates RSA key pairs of a fixed modulus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGenerator {
    bits: usize,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self {
            bits: DEFAULT_KEY_BITS,
        }
    }
}

impl KeyGenerator {
    /// Generator for [`DEFAULT_KEY_BITS`]-bit keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator for keys with a `bits`-bit modulus
    pub fn with_bits(bits: usize) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Generate a fresh key pair.
    ///
    /// Large moduli take a long time; keep this off latency-sensitive paths.
    /// Failures of the primitive are reported once and never retried.
    pub fn generate(&self) -> Result<KeyMaterial> {
        if self.bits == 0 {
            return Err(RsaError::InvalidParameter(
                "key bit length must be greater than zero".to_string(),
            ));
        }
        if self.bits > MAX_KEY_BITS {
            return Err(RsaError::InvalidParameter(format!(
                "key bit length {} exceeds maximum {}",
                self.bits, MAX_KEY_BITS
            )));
        }

        info!(bits = self.bits, "Generating RSA key pair");
        let started = Instant::now();

        let private_key = RsaPrivateKey::new(&mut OsRng, self.bits).map_err(RsaError::provider)?;
        let public_key = private_key.to_public_key();
        let material = KeyMaterial::from_keys(&private_key, &public_key)?;

        info!(
            bits = self.bits,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "RSA key pair generated"
        );
        Ok(material)
    }
}

/// Generate a key pair with a `bits`-bit modulus
pub fn generate_key(bits: usize) -> Result<KeyMaterial> {
    KeyGenerator::with_bits(bits).generate()
}

/// Generate a key pair with the default modulus size
pub fn create_key() -> Result<KeyMaterial> {
    KeyGenerator::new().generate()
}

pub(crate) fn encode_private_key(key: &RsaPrivateKey) -> Result<Zeroizing<Vec<u8>>> {
    let doc = key
        .to_pkcs1_der()
        .map_err(|e| RsaError::CryptoProvider(format!("private key export failed: {}", e)))?;
    Ok(Zeroizing::new(doc.as_bytes().to_vec()))
}

pub(crate) fn encode_public_key(key: &RsaPublicKey) -> Result<Vec<u8>> {
    let doc = key
        .to_pkcs1_der()
        .map_err(|e| RsaError::CryptoProvider(format!("public key export failed: {}", e)))?;
    Ok(doc.as_bytes().to_vec())
}
