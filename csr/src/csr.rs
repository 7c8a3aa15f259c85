// Licensed under the Apache-2.0 license

//! Certification request generation
//!
//! Generation runs through [`Phase::BuildingInfo`], [`Phase::Signing`] and
//! [`Phase::Assembled`] exactly once each. A failure in any phase ends the
//! operation and nothing partially built is returned.

use crate::{
    error::CsrError,
    x509::{
        extensions::encode_extension_request, spki::import_public_key, CertificationRequest,
        CertificationRequestInfo, Name, PublicKeyInput,
    },
};
use crypto::Crypto;
use log::{debug, trace};

/// Stages of a single generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BuildingInfo,
    Signing,
    Assembled,
}

/// Build and sign a PKCS #10 request for `common_name`.
///
/// # Arguments
///
/// * `crypto` - Provider for SPKI parsing, hashing and signing.
/// * `common_name` - Subject CommonName, encoded as a UTF8String.
/// * `public_key` - SubjectPublicKeyInfo of the key being certified.
/// * `private_key` - Private key matching `public_key`.
/// * `dns_names` - dNSName entries for the subjectAltName extension, in order.
pub fn build_csr<C: Crypto, S: AsRef<str>>(
    crypto: &mut C,
    common_name: &str,
    public_key: &PublicKeyInput,
    private_key: &C::PrivKey,
    dns_names: &[S],
) -> Result<CertificationRequest, CsrError> {
    let mut phase = Phase::BuildingInfo;
    let result = run(crypto, common_name, public_key, private_key, dns_names, &mut phase);
    if let Err(e) = &result {
        debug!("CSR generation aborted in {phase:?}: {e}");
    }
    result
}

fn run<C: Crypto, S: AsRef<str>>(
    crypto: &mut C,
    common_name: &str,
    public_key: &PublicKeyInput,
    private_key: &C::PrivKey,
    dns_names: &[S],
    phase: &mut Phase,
) -> Result<CertificationRequest, CsrError> {
    trace!("{phase:?}: {} dNSName entries", dns_names.len());
    let (pub_key, spki) = import_public_key(crypto, public_key)?;
    let info = CertificationRequestInfo::new(
        &Name::common_name(common_name),
        &spki,
        &[encode_extension_request(dns_names)?],
    )?;

    *phase = Phase::Signing;
    trace!("{phase:?}: {} byte CertificationRequestInfo", info.as_bytes().len());
    // The PKCS#10 CSR is self-signed, so the subject's own key signs it.
    let sig = crypto
        .ecdsa_sign(info.as_bytes(), private_key, &pub_key)
        .map_err(CsrError::Signing)?;

    *phase = Phase::Assembled;
    let csr = CertificationRequest::new(&info, &sig)?;
    debug!("{phase:?}: {} byte CertificationRequest", csr.as_der().len());
    Ok(csr)
}

/// Build and sign a PKCS #10 request and return its DER encoding as
/// unpadded base64url.
///
/// See [`build_csr`] for the arguments.
pub fn generate_csr<C: Crypto, S: AsRef<str>>(
    crypto: &mut C,
    common_name: &str,
    public_key: &PublicKeyInput,
    private_key: &C::PrivKey,
    dns_names: &[S],
) -> Result<String, CsrError> {
    build_csr(crypto, common_name, public_key, private_key, dns_names)
        .map(|csr| csr.to_base64url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, KeyFormatError};
    use base64ct::{Base64UrlUnpadded, Encoding};
    use crypto::{CryptoError, RustCryptoImpl};
    use der::{Decode, Encode};
    use p256::{
        ecdsa::{signature::Verifier, Signature, SigningKey, VerifyingKey},
        pkcs8::{DecodePublicKey, EncodePublicKey},
    };
    use rand::{rngs::StdRng, SeedableRng};
    use x509_cert::{
        ext::pkix::{name::GeneralName, SubjectAltName},
        request::CertReq,
    };

    const SUBJECT_ALT_NAME_OID: &str = "2.5.29.17";

    fn test_key_pair(seed: [u8; 32]) -> (SigningKey, Vec<u8>) {
        let mut rng = StdRng::from_seed(seed);
        let signing = SigningKey::random(&mut rng);
        let spki = VerifyingKey::from(&signing)
            .to_public_key_der()
            .unwrap()
            .as_bytes()
            .to_vec();
        (signing, spki)
    }

    fn decode(b64: &str) -> CertReq {
        let der = Base64UrlUnpadded::decode_vec(b64).unwrap();
        CertReq::from_der(&der).unwrap()
    }

    fn verify(req: &CertReq, verifying: &VerifyingKey) {
        let info = req.info.to_der().unwrap();
        let sig = Signature::from_der(req.signature.as_bytes().unwrap()).unwrap();
        verifying.verify(&info, &sig).unwrap();
    }

    fn dns_names(req: &CertReq) -> Vec<String> {
        let attr = req.info.attributes.iter().next().unwrap();
        let extensions = attr.values.iter().next().unwrap();
        let extensions = x509_cert::ext::Extensions::from_der(&extensions.to_der().unwrap())
            .unwrap();
        extensions
            .iter()
            .filter(|ext| ext.extn_id.to_string() == SUBJECT_ALT_NAME_OID)
            .flat_map(|ext| SubjectAltName::from_der(ext.extn_value.as_bytes()).unwrap().0)
            .map(|name| match name {
                GeneralName::DnsName(dns) => dns.to_string(),
                other => panic!("unexpected GeneralName {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_generate_csr() {
        let (signing, spki) = test_key_pair([1; 32]);
        let mut crypto = RustCryptoImpl::new();
        let names = ["example.com", "www.example.com"];

        let b64 = generate_csr(
            &mut crypto,
            "example.com",
            &PublicKeyInput::Der(&spki),
            &signing,
            &names,
        )
        .unwrap();
        assert!(!b64.contains('='));

        let req = decode(&b64);
        assert_eq!(req.info.subject.to_string(), "CN=example.com");
        assert_eq!(req.info.public_key.to_der().unwrap(), spki);
        assert_eq!(dns_names(&req), names);

        verify(&req, &VerifyingKey::from(&signing));
    }

    #[test]
    fn test_generate_csr_from_pem_fixtures() {
        let mut crypto = RustCryptoImpl::new();
        let private_key = crypto
            .import_private_key(include_str!("../../test_data/p256_sec1_priv.pem"))
            .unwrap();
        let public_pem = include_str!("../../test_data/p256_pub.pem");

        let csr = build_csr(
            &mut crypto,
            "device-01",
            &PublicKeyInput::Pem(public_pem),
            &private_key,
            &[] as &[&str],
        )
        .unwrap();

        let req = CertReq::from_der(csr.as_der()).unwrap();
        let expected_spki = pem::parse(public_pem).unwrap();
        assert_eq!(req.info.public_key.to_der().unwrap(), expected_spki.contents());
        // extensionRequest is present even without any names
        assert_eq!(req.info.attributes.len(), 1);
        assert!(dns_names(&req).is_empty());

        let verifying = VerifyingKey::from_public_key_der(expected_spki.contents()).unwrap();
        verify(&req, &verifying);
    }

    #[test]
    fn test_signatures_verify_across_runs() {
        let (signing, spki) = test_key_pair([3; 32]);
        let verifying = VerifyingKey::from(&signing);
        let mut crypto = RustCryptoImpl::new();

        for _ in 0..2 {
            let b64 = generate_csr(
                &mut crypto,
                "host.example",
                &PublicKeyInput::Der(&spki),
                &signing,
                &["host.example"],
            )
            .unwrap();
            verify(&decode(&b64), &verifying);
        }
    }

    #[test]
    fn test_mismatched_private_key() {
        let (_, spki) = test_key_pair([1; 32]);
        let (other_signing, _) = test_key_pair([2; 32]);
        let mut crypto = RustCryptoImpl::new();

        let err = generate_csr(
            &mut crypto,
            "example.com",
            &PublicKeyInput::Der(&spki),
            &other_signing,
            &["example.com"],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Signing);
        assert!(matches!(
            err,
            CsrError::Signing(CryptoError::SignatureVerification)
        ));
        assert!(err.to_string().starts_with("Failed to generate CSR: Signing failed: "));
    }

    #[test]
    fn test_bad_public_key() {
        let (signing, _) = test_key_pair([1; 32]);
        let mut crypto = RustCryptoImpl::new();

        let err = generate_csr(
            &mut crypto,
            "example.com",
            &PublicKeyInput::Pem(include_str!("../../test_data/rsa2048_pub.pem")),
            &signing,
            &["example.com"],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyFormat);
        assert!(matches!(
            err,
            CsrError::KeyFormat(KeyFormatError::Unsupported(_))
        ));
        assert!(err
            .to_string()
            .starts_with("Failed to generate CSR: Failed to encode SubjectPublicKeyInfo: "));

        let err = generate_csr(
            &mut crypto,
            "example.com",
            &PublicKeyInput::Der(&[0x42; 40]),
            &signing,
            &[] as &[&str],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyFormat);
    }
}
