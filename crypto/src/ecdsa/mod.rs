/*++
Licensed under the Apache-2.0 license.
Abstract:
    Fixed-size ECDSA key and signature buffers for the P-256 curve.
--*/

use crate::CryptoError;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
use zeroize::ZeroizeOnDrop;

pub const CURVE_SIZE: usize = 256 / 8;

/// SEC1 tag byte of an uncompressed point.
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// An ECDSA public key as its affine coordinates.
#[derive(Clone, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct EcdsaPub {
    pub x: [u8; CURVE_SIZE],
    pub y: [u8; CURVE_SIZE],
}

impl EcdsaPub {
    /// Build from an uncompressed SEC1 point `0x04 || X || Y`.
    pub fn from_uncompressed(point: &[u8]) -> Result<Self, CryptoError> {
        match point.split_first() {
            Some((&UNCOMPRESSED_POINT_TAG, coords)) => {
                Self::read_from_bytes(coords).map_err(|_| CryptoError::Size)
            }
            _ => Err(CryptoError::KeyFormat),
        }
    }

    /// The `X || Y` coordinates without the SEC1 tag byte.
    pub fn coordinates(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// An ECDSA signature as its raw `(r, s)` pair.
#[derive(Clone, Debug, FromBytes, IntoBytes, KnownLayout, Immutable, ZeroizeOnDrop)]
#[repr(C)]
pub struct EcdsaSig {
    pub r: [u8; CURVE_SIZE],
    pub s: [u8; CURVE_SIZE],
}

impl EcdsaSig {
    pub fn from_slice(r: &[u8; CURVE_SIZE], s: &[u8; CURVE_SIZE]) -> Self {
        Self { r: *r, s: *s }
    }

    pub fn as_slice(&self) -> (&[u8], &[u8]) {
        (&self.r, &self.s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uncompressed() {
        let mut point = [0u8; 1 + 2 * CURVE_SIZE];
        point[0] = UNCOMPRESSED_POINT_TAG;
        point[1..=CURVE_SIZE].fill(0xaa);
        point[CURVE_SIZE + 1..].fill(0xbb);

        let pub_key = EcdsaPub::from_uncompressed(&point).unwrap();
        assert_eq!(pub_key.x, [0xaa; CURVE_SIZE]);
        assert_eq!(pub_key.y, [0xbb; CURVE_SIZE]);
        assert_eq!(pub_key.coordinates(), &point[1..]);
    }

    #[test]
    fn test_from_uncompressed_rejects_other_encodings() {
        // Compressed point
        let mut compressed = [0u8; 1 + CURVE_SIZE];
        compressed[0] = 0x02;
        assert_eq!(
            EcdsaPub::from_uncompressed(&compressed),
            Err(CryptoError::KeyFormat)
        );

        // Truncated uncompressed point
        let mut truncated = [0u8; 2 * CURVE_SIZE];
        truncated[0] = UNCOMPRESSED_POINT_TAG;
        assert_eq!(
            EcdsaPub::from_uncompressed(&truncated),
            Err(CryptoError::Size)
        );

        assert_eq!(EcdsaPub::from_uncompressed(&[]), Err(CryptoError::KeyFormat));
    }
}
