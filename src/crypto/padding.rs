// PKCS#1 v1.5 Padding Policy
// Fixes the padding schemes used for encryption and signatures

use rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign};

use super::error::{Result, RsaError};
use super::hash::HashAlgorithm;

/// Bytes consumed by encryption padding: 0x00 || 0x02 || PS (>= 8 bytes) || 0x00
pub const PKCS1_V15_OVERHEAD: usize = 11;

/// Largest plaintext that fits in one block for a modulus of `modulus_bytes`.
pub fn max_payload(modulus_bytes: usize) -> usize {
    modulus_bytes.saturating_sub(PKCS1_V15_OVERHEAD)
}

/// Reject plaintexts that would need more than one block.
/// Large data has to be handled with hybrid encryption by the caller.
pub fn check_payload(len: usize, modulus_bytes: usize) -> Result<()> {
    let max = max_payload(modulus_bytes);
    if len > max {
        return Err(RsaError::PayloadTooLarge { max, actual: len });
    }
    Ok(())
}

/// Encryption padding shared by `Encryptor` and `Decryptor`
pub fn encryption_scheme() -> Pkcs1v15Encrypt {
    Pkcs1v15Encrypt
}

/// EMSA-PKCS1-v1_5 signature padding carrying the DigestInfo prefix of `hash`.
///
/// Signatures produced with this scheme are deterministic: the same data, hash
/// and key always give the same signature.
pub fn signature_scheme(hash: HashAlgorithm) -> Pkcs1v15Sign {
    match hash {
        HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<sha1::Sha1>(),
        HashAlgorithm::Sha224 => Pkcs1v15Sign::new::<sha2::Sha224>(),
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<sha2::Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<sha2::Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<sha2::Sha512>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_payload() {
        // 512 bits = 64 bytes, 2048 bits = 256 bytes
        assert_eq!(max_payload(64), 53);
        assert_eq!(max_payload(256), 245);
        assert_eq!(max_payload(4), 0);
    }

    #[test]
    fn test_check_payload_boundary() {
        assert!(check_payload(245, 256).is_ok());
        match check_payload(246, 256) {
            Err(RsaError::PayloadTooLarge { max, actual }) => {
                assert_eq!(max, 245);
                assert_eq!(actual, 246);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_signature_scheme_tracks_hash() {
        for alg in HashAlgorithm::ALL {
            let scheme = signature_scheme(alg);
            assert_eq!(scheme.hash_len, Some(alg.output_len()));
        }
    }
}
