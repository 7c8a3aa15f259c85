/*++
Licensed under the Apache-2.0 license.
Abstract:
    Generic trait definition of the cryptographic capabilities consumed by
    CSR generation.
--*/

pub use crate::ecdsa::{EcdsaPub, EcdsaSig, CURVE_SIZE};

#[cfg(feature = "rustcrypto")]
pub use crate::rustcrypto::*;

pub mod ecdsa;

#[cfg(feature = "rustcrypto")]
mod rustcrypto;

use thiserror::Error;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
use zeroize::ZeroizeOnDrop;

/// Size in bytes of a SHA-256 digest.
pub const SHA256_SIZE: usize = 256 / 8;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum CryptoError {
    #[error("key material is not a valid P-256 key")]
    KeyFormat,
    #[error("unsupported elliptic curve")]
    UnsupportedCurve,
    #[error("crypto library error {0:#x}")]
    CryptoLibError(u32),
    #[error("signature does not verify against the public key")]
    SignatureVerification,
    #[error("buffer has the wrong size")]
    Size,
}

/// A SHA-256 digest.
#[derive(Clone, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, ZeroizeOnDrop)]
#[repr(C)]
pub struct Digest(pub [u8; SHA256_SIZE]);

impl Digest {
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

pub trait Hasher: Sized {
    /// Adds a chunk to the running hash.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Value to add to hash.
    fn update(&mut self, bytes: &[u8]) -> Result<(), CryptoError>;

    /// Finish a running hash operation and return the result.
    ///
    /// Once this function has been called, the object can no longer be used and
    /// a new one must be created to hash more data.
    fn finish(self) -> Result<Digest, CryptoError>;
}

pub trait Crypto {
    type Hasher: Hasher;
    type PrivKey;

    /// Initialize a running SHA-256 hash.
    fn hash_initialize(&mut self) -> Result<Self::Hasher, CryptoError>;

    /// Cryptographically hashes the given buffer with SHA-256.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Value to be hashed.
    fn hash(&mut self, bytes: &[u8]) -> Result<Digest, CryptoError> {
        let mut hasher = self.hash_initialize()?;
        hasher.update(bytes)?;
        hasher.finish()
    }

    /// Locate the EC point inside a DER-encoded SubjectPublicKeyInfo.
    ///
    /// Fails with `CryptoError::KeyFormat` if `spki` is not an EC public key on
    /// P-256.
    ///
    /// # Arguments
    ///
    /// * `spki` - DER-encoded SubjectPublicKeyInfo.
    fn extract_ec_point(&mut self, spki: &[u8]) -> Result<EcdsaPub, CryptoError>;

    /// Import a P-256 private key from PEM. Both PKCS#8 (`PRIVATE KEY`) and
    /// SEC1 (`EC PRIVATE KEY`) armor are accepted.
    ///
    /// # Arguments
    ///
    /// * `pem` - PEM-armored private key.
    fn import_private_key(&mut self, pem: &str) -> Result<Self::PrivKey, CryptoError>;

    /// Sign `digest` with `priv_key`
    ///
    /// # Arguments
    ///
    /// * `digest` - Digest of data to be signed.
    /// * `priv_key` - Private key to sign with.
    /// * `pub_key` - The public key corresponding to `priv_key`. An implementation may
    ///    optionally use pub_key to validate any generated signatures.
    fn ecdsa_sign_digest(
        &mut self,
        digest: &Digest,
        priv_key: &Self::PrivKey,
        pub_key: &EcdsaPub,
    ) -> Result<EcdsaSig, CryptoError>;

    /// Sign the SHA-256 digest of `bytes` with `priv_key`.
    ///
    /// `bytes` is hashed exactly as given.
    fn ecdsa_sign(
        &mut self,
        bytes: &[u8],
        priv_key: &Self::PrivKey,
        pub_key: &EcdsaPub,
    ) -> Result<EcdsaSig, CryptoError> {
        let digest = self.hash(bytes)?;
        self.ecdsa_sign_digest(&digest, priv_key, pub_key)
    }
}
