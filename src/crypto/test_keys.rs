// Shared test keys, generated once per test binary

use std::sync::OnceLock;

use super::keygen::{generate_key, KeyMaterial};

/// Smallest size that still fits a SHA-512 PKCS#1 v1.5 signature
pub const SMALL_BITS: usize = 1024;

pub fn small() -> &'static KeyMaterial {
    static KEY: OnceLock<KeyMaterial> = OnceLock::new();
    KEY.get_or_init(|| generate_key(SMALL_BITS).unwrap())
}

pub fn standard() -> &'static KeyMaterial {
    static KEY: OnceLock<KeyMaterial> = OnceLock::new();
    KEY.get_or_init(|| generate_key(2048).unwrap())
}

/// Unrelated to `small()`, for wrong-key checks
pub fn other() -> &'static KeyMaterial {
    static KEY: OnceLock<KeyMaterial> = OnceLock::new();
    KEY.get_or_init(|| generate_key(SMALL_BITS).unwrap())
}
