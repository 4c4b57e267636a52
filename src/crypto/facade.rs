// RSA Facade
// One-line setup: generate a key pair and build both sides

use tracing::debug;

use super::decrypt::Decryptor;
use super::encrypt::Encryptor;
use super::error::Result;
use super::keygen::{KeyGenerator, KeyMaterial};
use crate::config::RsaConfig;

/// Entry point tying key generation to `Encryptor`/`Decryptor` construction.
///
/// ```no_run
/// use easy_rsa::EasyRsa;
///
/// let (encryptor, decryptor) = EasyRsa::default().create()?;
/// let ciphertext = encryptor.encrypt(b"Input")?;
/// assert_eq!(decryptor.decrypt(&ciphertext)?, b"Input");
/// # Ok::<(), easy_rsa::RsaError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct EasyRsa {
    config: RsaConfig,
}

impl EasyRsa {
    pub fn new(config: RsaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RsaConfig {
        &self.config
    }

    /// Generate a key pair of the configured size
    pub fn generate_key(&self) -> Result<KeyMaterial> {
        KeyGenerator::with_bits(self.config.key_bits).generate()
    }

    /// Generate a key pair and return both sides, each using the configured hash
    pub fn create(&self) -> Result<(Encryptor, Decryptor)> {
        let material = self.generate_key()?;
        let pair = (self.encryptor(&material)?, self.decryptor(&material)?);
        debug!(bits = self.config.key_bits, hash = %self.config.hash, "Created key pair");
        Ok(pair)
    }

    pub fn encryptor(&self, material: &KeyMaterial) -> Result<Encryptor> {
        Ok(Encryptor::new(material.public_key())?.with_default_hash(self.config.hash))
    }

    pub fn decryptor(&self, material: &KeyMaterial) -> Result<Decryptor> {
        Ok(Decryptor::new(material.private_key())?.with_default_hash(self.config.hash))
    }
}
