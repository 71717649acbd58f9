use super::FingerprintError;
use sha2::{Digest, Sha256};

/// Cryptographic digest capability used by the content fingerprint.
pub trait ContentDigest: Send + Sync {
    fn digest(&self, bytes: &[u8]) -> Result<Vec<u8>, FingerprintError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digest;

impl ContentDigest for Sha256Digest {
    fn digest(&self, bytes: &[u8]) -> Result<Vec<u8>, FingerprintError> {
        Ok(Sha256::digest(bytes).to_vec())
    }
}
