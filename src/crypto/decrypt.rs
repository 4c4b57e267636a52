// RSA Decryption
// Private-key side of the facade: decrypt and sign

use std::fmt;

use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use tracing::debug;
use zeroize::Zeroizing;

use super::encrypt::Encryptor;
use super::error::{Result, RsaError};
use super::hash::HashAlgorithm;
use super::keygen::{encode_private_key, KeySource, MAX_KEY_BITS};
use super::padding::{encryption_scheme, max_payload, signature_scheme};
use crate::util::encoding::{from_base64, TextEncoding};

/// Holds one private key and offers decryption and signing.
///
/// Immutable after construction and safe to share between threads. Private-key
/// operations run blinded with fresh randomness per call.
#[derive(Clone)]
pub struct Decryptor {
    key: RsaPrivateKey,
    blob: Zeroizing<Vec<u8>>,
    default_hash: HashAlgorithm,
}

impl Decryptor {
    /// Import a PKCS#1 DER private-key blob
    pub fn new(private_key: &[u8]) -> Result<Self> {
        if private_key.is_empty() {
            return Err(RsaError::InvalidKey("private key is empty".to_string()));
        }
        let key = RsaPrivateKey::from_pkcs1_der(private_key)
            .map_err(|e| RsaError::InvalidKey(format!("cannot parse private key: {}", e)))?;

        Self::assemble(key, Zeroizing::new(private_key.to_vec()))
    }

    /// Adopt an already constructed primitive key
    pub fn from_key(key: RsaPrivateKey) -> Result<Self> {
        let blob = encode_private_key(&key)?;
        Self::assemble(key, blob)
    }

    pub fn from_source(source: KeySource<RsaPrivateKey>) -> Result<Self> {
        match source {
            KeySource::Blob(blob) => Self::new(&Zeroizing::new(blob)),
            KeySource::Handle(key) => Self::from_key(key),
        }
    }

    fn assemble(key: RsaPrivateKey, blob: Zeroizing<Vec<u8>>) -> Result<Self> {
        key.validate()
            .map_err(|e| RsaError::InvalidKey(format!("inconsistent private key: {}", e)))?;
        if key.n().bits() > MAX_KEY_BITS {
            return Err(RsaError::InvalidKey(format!(
                "modulus of {} bits exceeds maximum {}",
                key.n().bits(),
                MAX_KEY_BITS
            )));
        }

        debug!(modulus_bits = key.n().bits(), "Decryptor ready");
        Ok(Self {
            key,
            blob,
            default_hash: HashAlgorithm::default(),
        })
    }

    /// Use `hash` for `sign` instead of SHA-256
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

    pub fn modulus_bytes(&self) -> usize {
        self.key.size()
    }

    /// Largest plaintext the matching public key can encrypt
    pub fn max_payload(&self) -> usize {
        max_payload(self.key.size())
    }

    /// Decrypt one PKCS#1 v1.5 block.
    ///
    /// Every rejection, whether wrong length or bad padding, is reported as the
    /// same `RsaError::Decryption`.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() != self.key.size() {
            debug!("Ciphertext rejected");
            return Err(RsaError::Decryption);
        }

        let plaintext = self
            .key
            .decrypt_blinded(&mut OsRng, encryption_scheme(), ciphertext)
            .map_err(|_| {
                debug!("Ciphertext rejected");
                RsaError::Decryption
            })?;

        Ok(plaintext)
    }

    /// Decrypt base64 ciphertext and decode the plaintext as UTF-8
    pub fn decrypt_text(&self, ciphertext: &str) -> Result<String> {
        self.decrypt_text_with(ciphertext, TextEncoding::Utf8)
    }

    /// Decrypt base64 ciphertext and decode the plaintext with `encoding`
    pub fn decrypt_text_with(&self, ciphertext: &str, encoding: TextEncoding) -> Result<String> {
        let raw = from_base64(ciphertext)?;
        let plaintext = Zeroizing::new(self.decrypt(&raw)?);
        encoding.decode(&plaintext)
    }

    /// Sign `data` with the default hash.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.sign_with(data, self.default_hash)
    }

    /// Hash `data` with `hash`, then sign the digest (RSASSA-PKCS1-v1_5).
    ///
    /// PKCS#1 v1.5 signatures are deterministic, so equal `(data, hash, key)`
    /// give equal signatures. Fails with `CryptoProvider` when the digest
    /// does not fit the modulus.
    pub fn sign_with(&self, data: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>> {
        let digest = hash.digest(data);
        let signature = self
            .key
            .sign_with_rng(&mut OsRng, signature_scheme(hash), &digest)
            .map_err(RsaError::provider)?;

        debug!(%hash, data_len = data.len(), "Signed data");
        Ok(signature)
    }

    /// The held private-key blob, byte for byte
    pub fn export_private_key(&self) -> Vec<u8> {
        self.blob.to_vec()
    }

    pub fn export_key(&self) -> Vec<u8> {
        self.export_private_key()
    }

    /// Encryptor for the public half of this key, sharing the default hash
    pub fn public_key(&self) -> Result<Encryptor> {
        Ok(Encryptor::from_key(self.key.to_public_key())?.with_default_hash(self.default_hash))
    }

    /// Underlying primitive key
    pub fn key(&self) -> &RsaPrivateKey {
        &self.key
    }
}

impl fmt::Debug for Decryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decryptor")
            .field("modulus_bits", &self.modulus_bits())
            .field("default_hash", &self.default_hash)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keygen::KeyMaterial;
    use crate::crypto::test_keys;
    use crate::util::encoding::to_base64;

    fn pair(material: &KeyMaterial) -> (Encryptor, Decryptor) {
        (
            Encryptor::new(material.public_key()).unwrap(),
            Decryptor::new(material.private_key()).unwrap(),
        )
    }

    fn test_roundtrip(enc: &Encryptor, dec: &Decryptor, message: &[u8]) {
        let ciphertext = enc.encrypt(message).unwrap();
        let decrypted = dec.decrypt(&ciphertext).unwrap();
        assert_eq!(message, decrypted.as_slice());
    }

    #[test]
    fn test_decrypt_bytes() {
        let (enc, dec) = pair(test_keys::small());
        let message = b"Hello, RSA!";

        let ciphertext = enc.encrypt(message).unwrap();
        let decrypted = dec.decrypt(&ciphertext).unwrap();

        assert_eq!(message.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_decrypt_text() {
        let (enc, dec) = pair(test_keys::small());
        let message = "Test message for RSA decryption";

        let ciphertext = enc.encrypt_text(message).unwrap();
        assert_eq!(dec.decrypt_text(&ciphertext).unwrap(), message);
    }

    #[test]
    fn test_decrypt_text_with_each_encoding() {
        let (enc, dec) = pair(test_keys::small());
        for encoding in TextEncoding::ALL {
            let ciphertext = enc.encrypt_text_with("Input", encoding).unwrap();
            assert_eq!(dec.decrypt_text_with(&ciphertext, encoding).unwrap(), "Input");
        }
    }

    #[test]
    fn test_decrypt_text_wrong_encoding() {
        let (enc, dec) = pair(test_keys::small());
        let odd = to_base64(&enc.encrypt(&[0x41]).unwrap());
        assert!(matches!(
            dec.decrypt_text_with(&odd, TextEncoding::Utf16Le),
            Err(RsaError::Encoding(_))
        ));

        let ciphertext = enc.encrypt_text_with("Input", TextEncoding::Utf16Le).unwrap();
        assert_eq!(
            dec.decrypt_text_with(&ciphertext, TextEncoding::Latin1).unwrap(),
            "I\0n\0p\0u\0t\0"
        );
    }

    #[test]
    fn test_decrypt_text_bad_base64() {
        let (_, dec) = pair(test_keys::small());
        assert!(matches!(dec.decrypt_text("***"), Err(RsaError::InvalidParameter(_))));
    }

    #[test]
    fn test_decrypt_invalid_size() {
        let (_, dec) = pair(test_keys::small());
        assert!(matches!(dec.decrypt(&[0u8; 10]), Err(RsaError::Decryption)));
        assert!(matches!(dec.decrypt(&[]), Err(RsaError::Decryption)));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let (enc, _) = pair(test_keys::small());
        let (_, other) = pair(test_keys::other());

        let ciphertext = enc.encrypt(b"Test").unwrap();
        // A wrong key almost always breaks the padding; on the rare pass the
        // plaintext cannot match.
        match other.decrypt(&ciphertext) {
            Err(err) => assert!(matches!(err, RsaError::Decryption)),
            Ok(plaintext) => assert_ne!(plaintext, b"Test"),
        }
    }

    #[test]
    fn test_tampered_ciphertext() {
        let (enc, dec) = pair(test_keys::small());
        let mut ciphertext = enc.encrypt(b"Tamper me").unwrap();
        ciphertext[0] ^= 0x01;

        match dec.decrypt(&ciphertext) {
            Err(err) => assert!(matches!(err, RsaError::Decryption)),
            Ok(plaintext) => assert_ne!(plaintext, b"Tamper me"),
        }
    }

    #[test]
    fn test_roundtrip_various_sizes() {
        let (enc, dec) = pair(test_keys::small());

        let test_cases: Vec<Vec<u8>> = vec![
            Vec::new(),
            b"A".to_vec(),
            b"Hello, World!".to_vec(),
            vec![0u8; 100],
            vec![255u8; 117],
        ];

        for message in test_cases {
            test_roundtrip(&enc, &dec, &message);
        }
    }

    #[test]
    fn test_sign_verify() {
        let (enc, dec) = pair(test_keys::small());
        let signature = dec.sign(b"12345").unwrap();

        assert_eq!(signature.len(), test_keys::SMALL_BITS / 8);
        assert!(enc.verify(b"12345", &signature).unwrap());
        assert!(!enc.verify(b"12346", &signature).unwrap());
    }

    #[test]
    fn test_sign_is_deterministic() {
        let (_, dec) = pair(test_keys::small());
        let first = dec.sign_with(b"same", HashAlgorithm::Sha384).unwrap();
        let second = dec.sign_with(b"same", HashAlgorithm::Sha384).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sign_every_hash() {
        let (enc, dec) = pair(test_keys::small());
        for hash in HashAlgorithm::ALL {
            let signature = dec.sign_with(b"payload", hash).unwrap();
            assert!(enc.verify_with(b"payload", &signature, hash).unwrap(), "{}", hash);
        }
    }

    #[test]
    fn test_hash_mismatch_is_false() {
        let (enc, dec) = pair(test_keys::small());
        for signed_with in HashAlgorithm::ALL {
            let signature = dec.sign_with(b"payload", signed_with).unwrap();
            for checked_with in HashAlgorithm::ALL {
                if checked_with != signed_with {
                    assert!(!enc.verify_with(b"payload", &signature, checked_with).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_tampered_signature() {
        let (enc, dec) = pair(test_keys::small());
        let signature = dec.sign(b"data").unwrap();

        for bit in [0usize, 7, 500, 1023] {
            let mut tampered = signature.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            assert!(!enc.verify(b"data", &tampered).unwrap());
        }
    }

    #[test]
    fn test_wrong_key_signature() {
        let (enc, _) = pair(test_keys::small());
        let (_, other) = pair(test_keys::other());
        let signature = other.sign(b"data").unwrap();
        assert!(!enc.verify(b"data", &signature).unwrap());
    }

    #[test]
    fn test_sign_hash_too_large_for_key() {
        // 512-bit modulus: 64 bytes, SHA-512 DigestInfo needs 83 + 11
        let dec = Decryptor::new(crate::crypto::keygen::generate_key(512).unwrap().private_key()).unwrap();
        let result = dec.sign_with(b"data", HashAlgorithm::Sha512);
        assert!(matches!(result, Err(RsaError::CryptoProvider(_))));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(Decryptor::new(&[]), Err(RsaError::InvalidKey(_))));
    }

    #[test]
    fn test_public_blob_is_not_a_private_key() {
        let result = Decryptor::new(test_keys::small().public_key());
        assert!(matches!(result, Err(RsaError::InvalidKey(_))));
    }

    #[test]
    fn test_export_is_verbatim() {
        let material = test_keys::small();
        let dec = Decryptor::new(material.private_key()).unwrap();
        assert_eq!(dec.export_key(), material.private_key());
    }

    #[test]
    fn test_from_handle() {
        let material = test_keys::small();
        let key = RsaPrivateKey::from_pkcs1_der(material.private_key()).unwrap();
        let dec = Decryptor::from_source(KeySource::Handle(key)).unwrap();

        assert_eq!(dec.export_key(), material.private_key());
        let (enc, _) = pair(material);
        let ciphertext = enc.encrypt(b"handle").unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), b"handle");
    }

    #[test]
    fn test_public_key_pairs_with_material() {
        let material = test_keys::small();
        let dec = Decryptor::new(material.private_key())
            .unwrap()
            .with_default_hash(HashAlgorithm::Sha1);

        let enc = dec.public_key().unwrap();
        assert_eq!(enc.export_key(), material.public_key());
        assert_eq!(enc.default_hash(), HashAlgorithm::Sha1);
    }

    #[test]
    fn test_concurrent_use() {
        let (enc, dec) = pair(test_keys::small());

        std::thread::scope(|scope| {
            for i in 0..4u8 {
                let enc = &enc;
                let dec = &dec;
                scope.spawn(move || {
                    let message = vec![i; 16];
                    let ciphertext = enc.encrypt(&message).unwrap();
                    assert_eq!(dec.decrypt(&ciphertext).unwrap(), message);

                    let signature = dec.sign(&message).unwrap();
                    assert!(enc.verify(&message, &signature).unwrap());
                });
            }
        });
    }
}
