// RSA Module - Main module file
// Key material, the two key-holding sides, and the facade over them

pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod facade;
pub mod hash;
pub mod keygen;
pub mod padding;

#[cfg(test)]
pub(crate) mod test_keys;

pub use decrypt::Decryptor;
pub use encrypt::Encryptor;
pub use error::{Result, RsaError};
pub use facade::EasyRsa;
pub use hash::HashAlgorithm;
pub use keygen::{
    create_key, generate_key, KeyGenerator, KeyMaterial, KeySource, DEFAULT_KEY_BITS, MAX_KEY_BITS,
};
