// Licensed under the Apache-2.0 license

//! SubjectPublicKeyInfo import and re-encoding for P-256 keys

use super::asn1::{encode_bit_string, encode_oid, encode_sequence, DerValue};
use crate::{error::KeyFormatError, oid};
use crypto::{ecdsa::UNCOMPRESSED_POINT_TAG, Crypto, EcdsaPub};
use log::trace;

const PUBLIC_KEY_PEM_LABEL: &str = "PUBLIC KEY";
const PEM_ARMOR_PREFIX: &[u8] = b"-----BEGIN ";

/// A caller-supplied public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyInput<'a> {
    /// PEM with a `PUBLIC KEY` label around a DER SubjectPublicKeyInfo.
    Pem(&'a str),
    /// A DER SubjectPublicKeyInfo.
    Der(&'a [u8]),
}

impl<'a> PublicKeyInput<'a> {
    /// Treat `bytes` as PEM if they start with PEM armor, otherwise as DER.
    pub fn detect(bytes: &'a [u8]) -> Self {
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        let trimmed = &bytes[start..];
        match core::str::from_utf8(trimmed) {
            Ok(pem) if trimmed.starts_with(PEM_ARMOR_PREFIX) => Self::Pem(pem),
            _ => Self::Der(bytes),
        }
    }

    /// The DER SubjectPublicKeyInfo carried by this input.
    pub fn to_spki_der(&self) -> Result<Vec<u8>, KeyFormatError> {
        match self {
            Self::Der(der) => Ok(der.to_vec()),
            Self::Pem(text) => {
                let pem = pem::parse(text)?;
                if pem.tag() != PUBLIC_KEY_PEM_LABEL {
                    return Err(KeyFormatError::UnexpectedPemLabel(pem.tag().to_string()));
                }
                Ok(pem.contents().to_vec())
            }
        }
    }
}

/// DER-encodes the AlgorithmIdentifier for an EC public key on P-256.
///
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///     algorithm   OBJECT IDENTIFIER,
///     parameters  ECParameters
///     }
///
/// ECParameters ::= CHOICE {
///       namedCurve         OBJECT IDENTIFIER
///       -- implicitCurve   NULL
///       -- specifiedCurve  SpecifiedECDomain
///     }
fn encode_ec_pub_alg_id() -> Result<DerValue, KeyFormatError> {
    Ok(encode_sequence(&[
        encode_oid(oid::EC_PUBLIC_KEY)?,
        encode_oid(oid::CURVE_P256)?,
    ]))
}

/// Encode SubjectPublicKeyInfo for an ECDSA public key
///
/// SubjectPublicKeyInfo  ::=  SEQUENCE  {
///        algorithm            AlgorithmIdentifier,
///        subjectPublicKey     BIT STRING  }
///
/// subjectPublicKey is a BIT STRING containing an ECPoint
/// in uncompressed format.
///
/// ECPoint ::= OCTET STRING
///
/// The ECPoint OCTET STRING is mapped to the subjectPublicKey BIT STRING
/// directly, which means the OCTET STRING tag and size fields are omitted.
pub fn encode_ecdsa_subject_pubkey_info(pub_key: &EcdsaPub) -> Result<DerValue, KeyFormatError> {
    let mut point = Vec::with_capacity(1 + pub_key.coordinates().len());
    point.push(UNCOMPRESSED_POINT_TAG);
    point.extend_from_slice(pub_key.coordinates());

    Ok(encode_sequence(&[
        encode_ec_pub_alg_id()?,
        encode_bit_string(&point),
    ]))
}

/// Normalize `input` to a P-256 point and its canonical SubjectPublicKeyInfo.
///
/// Only the EC point is taken from the caller's encoding. The returned
/// SubjectPublicKeyInfo is rebuilt from it, so algorithm parameters are
/// always the named P-256 curve.
pub fn import_public_key<C: Crypto>(
    crypto: &mut C,
    input: &PublicKeyInput,
) -> Result<(EcdsaPub, DerValue), KeyFormatError> {
    let der = DerValue::from_der(input.to_spki_der()?)?;
    let pub_key = crypto
        .extract_ec_point(der.as_bytes())
        .map_err(KeyFormatError::Unsupported)?;
    trace!("imported {} byte SubjectPublicKeyInfo", der.len());

    let spki = encode_ecdsa_subject_pubkey_info(&pub_key)?;
    Ok((pub_key, spki))
}
