//! Target hash computation.
//!
//! The session engine only needs `plaintext -> hash string`; this module
//! provides that as the [`Hasher`] trait plus a digest-backed default.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::config::HashingSettings;
use crate::{Error, Result};

/// Hash algorithms with a local implementation, keyed by hashcat mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// Raw MD5 (mode 0)
    Md5,
    /// Raw SHA1 (mode 100)
    Sha1,
    /// Raw SHA2-256 (mode 1400)
    Sha256,
    /// Raw SHA2-512 (mode 1700)
    Sha512,
    /// bcrypt (mode 3200)
    Bcrypt,
}

impl HashAlgorithm {
    /// Resolve a hashcat mode.
    pub fn from_mode(mode: u32) -> Option<Self> {
        match mode {
            0 => Some(HashAlgorithm::Md5),
            100 => Some(HashAlgorithm::Sha1),
            1400 => Some(HashAlgorithm::Sha256),
            1700 => Some(HashAlgorithm::Sha512),
            3200 => Some(HashAlgorithm::Bcrypt),
            _ => None,
        }
    }

    /// hashcat mode number.
    pub fn mode(&self) -> u32 {
        match self {
            HashAlgorithm::Md5 => 0,
            HashAlgorithm::Sha1 => 100,
            HashAlgorithm::Sha256 => 1400,
            HashAlgorithm::Sha512 => 1700,
            HashAlgorithm::Bcrypt => 3200,
        }
    }
}

/// Computes the target hash for a plaintext.
pub trait Hasher: Send + Sync {
    /// Hash `plaintext` with the given hashcat mode.
    ///
    /// Fails with [`Error::UnsupportedAlgorithm`] for modes that are not
    /// offered or not implemented.
    fn hash(&self, plaintext: &str, hash_type: u32) -> Result<String>;
}

/// Default [`Hasher`] backed by RustCrypto digests and `bcrypt`.
#[derive(Debug, Clone)]
pub struct DigestHasher {
    settings: HashingSettings,
}

impl DigestHasher {
    /// Create a hasher restricted to the configured catalog.
    pub fn new(settings: HashingSettings) -> Self {
        Self { settings }
    }
}

impl Default for DigestHasher {
    fn default() -> Self {
        Self::new(HashingSettings::default())
    }
}

impl Hasher for DigestHasher {
    fn hash(&self, plaintext: &str, hash_type: u32) -> Result<String> {
        if self.settings.find(hash_type).is_none() {
            return Err(Error::UnsupportedAlgorithm(hash_type));
        }
        let algorithm =
            HashAlgorithm::from_mode(hash_type).ok_or(Error::UnsupportedAlgorithm(hash_type))?;

        let bytes = plaintext.as_bytes();
        let hashed = match algorithm {
            HashAlgorithm::Md5 => hex::encode(Md5::digest(bytes)),
            HashAlgorithm::Sha1 => hex::encode(Sha1::digest(bytes)),
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
            HashAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
            HashAlgorithm::Bcrypt => bcrypt::hash(plaintext, self.settings.bcrypt_cost)
                .map_err(|e| Error::Hashing(e.to_string()))?,
        };
        Ok(hashed)
    }
}
