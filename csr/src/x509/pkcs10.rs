// Licensed under the Apache-2.0 license

//! PKCS#10 (RFC 2986) CertificationRequestInfo and CertificationRequest

use super::{
    asn1::{
        encode_bit_string, encode_integer, encode_integer_bytes, encode_oid, encode_sequence,
        encode_tlv, DerValue, Tag,
    },
    name::Name,
};
use crate::{error::EncodingError, oid};
use base64ct::{Base64UrlUnpadded, Encoding};
use crypto::EcdsaSig;
use pem::{EncodeConfig, LineEnding, Pem};

const CSR_V0: u64 = 0;

const CSR_PEM_LABEL: &str = "CERTIFICATE REQUEST";

/// The to-be-signed portion of a certification request.
///
/// CertificationRequestInfo ::= SEQUENCE {
///     version       INTEGER { v1(0) } (v1,...),
///     subject       Name,
///     subjectPKInfo SubjectPublicKeyInfo{{ PKInfoAlgorithms }},
///     attributes    [0] Attributes{{ CRIAttributes }}
/// }
///
/// The encoding is fixed at construction. The signature covers exactly
/// [`CertificationRequestInfo::as_bytes`], which are later embedded in the
/// final request without modification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationRequestInfo(DerValue);

impl CertificationRequestInfo {
    /// # Arguments
    ///
    /// * `subject` - Subject Name.
    /// * `subject_pubkey_info` - DER-encoded SubjectPublicKeyInfo.
    /// * `attributes` - DER-encoded Attributes, placed in order inside the
    ///    `[0]` field.
    pub fn new(
        subject: &Name,
        subject_pubkey_info: &DerValue,
        attributes: &[DerValue],
    ) -> Result<Self, EncodingError> {
        // Attributes is IMPLICIT field number 0 in place of the SET OF tag
        let attributes_contents: Vec<u8> = attributes
            .iter()
            .flat_map(|attr| attr.as_bytes())
            .copied()
            .collect();
        let attributes = encode_tlv(Tag::ContextSpecificConstructed(0), &attributes_contents)?;

        Ok(Self(encode_sequence(&[
            // version
            encode_integer(CSR_V0),
            // subject
            subject.encode()?,
            // subjectPublicKeyInfo
            subject_pubkey_info.clone(),
            // attributes
            attributes,
        ])))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// DER-encodes the AlgorithmIdentifier for ecdsa-with-SHA256.
///
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///     algorithm   OBJECT IDENTIFIER,
///     parameters  ANY DEFINED BY algorithm OPTIONAL
///     }
///
/// RFC 5758 requires the parameters field to be absent.
fn encode_ecdsa_sig_alg_id() -> Result<DerValue, EncodingError> {
    Ok(encode_sequence(&[encode_oid(oid::ECDSA_WITH_SHA256)?]))
}

/// BIT STRING containing
///
/// ECDSA-Sig-Value ::= SEQUENCE {
///     r  INTEGER,
///     s  INTEGER
///   }
fn encode_ecdsa_signature_bit_string(sig: &EcdsaSig) -> DerValue {
    let (r, s) = sig.as_slice();
    let sig_value = encode_sequence(&[encode_integer_bytes(r), encode_integer_bytes(s)]);
    encode_bit_string(sig_value.as_bytes())
}

/// A signed PKCS #10 certification request.
///
/// CertificationRequest  ::=  SEQUENCE  {
///    certificationRequestInfo       CertificationRequestInfo,
///    signatureAlgorithm             AlgorithmIdentifier,
///    signature                      BIT STRING
/// }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationRequest(DerValue);

impl CertificationRequest {
    /// Combine `info` with the signature computed over its encoding.
    pub fn new(info: &CertificationRequestInfo, sig: &EcdsaSig) -> Result<Self, EncodingError> {
        Ok(Self(encode_sequence(&[
            // CertificationRequestInfo
            info.0.clone(),
            // Alg ID
            encode_ecdsa_sig_alg_id()?,
            // Signature
            encode_ecdsa_signature_bit_string(sig),
        ])))
    }

    pub fn as_der(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_der(self) -> Vec<u8> {
        self.0.into_vec()
    }

    /// URL-safe base64 of the DER encoding, without padding.
    pub fn to_base64url(&self) -> String {
        Base64UrlUnpadded::encode_string(self.as_der())
    }

    /// PEM armored with the `CERTIFICATE REQUEST` label and LF line endings.
    pub fn to_pem(&self) -> String {
        let pem = Pem::new(CSR_PEM_LABEL, self.as_der().to_vec());
        pem::encode_config(
            &pem,
            EncodeConfig {
                line_ending: LineEnding::LF,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x509::{extensions::encode_extension_request, spki::encode_ecdsa_subject_pubkey_info};
    use crypto::{EcdsaPub, CURVE_SIZE};
    use der::{Decode, Encode};
    use x509_cert::request::CertReq;

    fn test_info(dns_names: &[&str]) -> CertificationRequestInfo {
        let pub_key = EcdsaPub {
            x: [0x11; CURVE_SIZE],
            y: [0x22; CURVE_SIZE],
        };
        let spki = encode_ecdsa_subject_pubkey_info(&pub_key).unwrap();
        CertificationRequestInfo::new(
            &Name::common_name("example.com"),
            &spki,
            &[encode_extension_request(dns_names).unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn test_certification_request_info_prefix() {
        let info = test_info(&[]);
        let bytes = info.as_bytes();
        // SEQUENCE, then INTEGER 0
        assert_eq!(&bytes[..3], &[0x30, 0x81, 0x89]);
        assert_eq!(&bytes[3..6], &[0x02, 0x01, 0x00]);
        // attributes [0] holds the extensionRequest directly
        let attrs_start = bytes.len() - 19;
        assert_eq!(&bytes[attrs_start..attrs_start + 4], &[0xA0, 0x11, 0x30, 0x0F]);
        assert_eq!(&bytes[bytes.len() - 4..], &[0x31, 0x02, 0x30, 0x00]);
    }

    #[test]
    fn test_signature_integers() {
        // High bit set on r needs a zero pad, leading zeros on s are stripped.
        let mut r = [0u8; CURVE_SIZE];
        r[0] = 0x80;
        let mut s = [0u8; CURVE_SIZE];
        s[CURVE_SIZE - 1] = 0x01;
        let bit_string = encode_ecdsa_signature_bit_string(&EcdsaSig::from_slice(&r, &s));

        let bytes = bit_string.as_bytes();
        assert_eq!(&bytes[..5], &[0x03, 0x29, 0x00, 0x30, 0x26]);
        assert_eq!(&bytes[5..8], &[0x02, 0x21, 0x00]);
        assert_eq!(&bytes[8..8 + CURVE_SIZE], &r);
        assert_eq!(&bytes[8 + CURVE_SIZE..], &[0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_csr_structure() {
        let info = test_info(&["example.com"]);
        let sig = EcdsaSig::from_slice(&[0x33; CURVE_SIZE], &[0x44; CURVE_SIZE]);
        let csr = CertificationRequest::new(&info, &sig).unwrap();

        let parsed = CertReq::from_der(csr.as_der()).unwrap();
        assert_eq!(parsed.info.to_der().unwrap(), info.as_bytes());
        assert_eq!(parsed.algorithm.oid.to_string(), oid::ECDSA_WITH_SHA256);
        assert!(parsed.algorithm.parameters.is_none());
        assert_eq!(parsed.info.subject.to_string(), "CN=example.com");
        assert_eq!(parsed.info.attributes.len(), 1);

        let sig_der = parsed.signature.as_bytes().unwrap();
        assert_eq!(sig_der[0], 0x30);
        assert_eq!(&sig_der[4..4 + CURVE_SIZE], &[0x33; CURVE_SIZE]);
    }

    #[test]
    fn test_output_forms() {
        let info = test_info(&[]);
        let sig = EcdsaSig::from_slice(&[0x55; CURVE_SIZE], &[0x66; CURVE_SIZE]);
        let csr = CertificationRequest::new(&info, &sig).unwrap();

        let b64 = csr.to_base64url();
        assert!(!b64.contains(['=', '+', '/']));
        assert_eq!(
            Base64UrlUnpadded::decode_vec(&b64).unwrap(),
            csr.as_der()
        );

        let pem_text = csr.to_pem();
        assert!(pem_text.starts_with("-----BEGIN CERTIFICATE REQUEST-----\n"));
        assert!(!pem_text.contains('\r'));
        let parsed = pem::parse(&pem_text).unwrap();
        assert_eq!(parsed.tag(), "CERTIFICATE REQUEST");
        assert_eq!(parsed.contents(), csr.as_der());

        assert_eq!(csr.clone().into_der(), csr.as_der());
    }
}
