//! Small RSA facade.
//!
//! [`KeyGenerator`] produces paired PKCS#1 DER key blobs, an [`Encryptor`]
//! wraps the public half (encrypt, verify) and a [`Decryptor`] the private
//! half (decrypt, sign). [`EasyRsa`] does all of it in one call. The RSA
//! arithmetic, padding and hashing come from the RustCrypto `rsa`, `sha1` and
//! `sha2` crates.
//!
//! Encryption uses PKCS#1 v1.5 padding, so one call takes at most
//! `modulus_bytes - 11` bytes. Signatures are RSASSA-PKCS1-v1_5 over a
//! SHA-256 digest unless another [`HashAlgorithm`] is given.

pub mod cli;
pub mod config;
pub mod crypto;
pub mod util;

pub use config::RsaConfig;
pub use crypto::{
    create_key, generate_key, Decryptor, EasyRsa, Encryptor, HashAlgorithm, KeyGenerator,
    KeyMaterial, KeySource, Result, RsaError, DEFAULT_KEY_BITS,
};
pub use util::TextEncoding;
