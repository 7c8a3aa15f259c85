/*++
Licensed under the Apache-2.0 license.

Abstract:
    Error types surfaced by CSR generation.
--*/
use crypto::CryptoError;
use thiserror::Error;

/// Failure to produce a DER encoding.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodingError {
    #[error("malformed object identifier {0:?}")]
    MalformedOid(String),
    #[error("invalid tag number {0}")]
    InvalidTag(u8),
    #[error("invalid length {0}")]
    InvalidLength(usize),
    #[error("{0:?} is not a PrintableString")]
    NonPrintableString(String),
}

/// Public key material that cannot be turned into a SubjectPublicKeyInfo.
#[derive(Debug, Error)]
pub enum KeyFormatError {
    #[error("invalid PEM: {0}")]
    Pem(#[from] pem::PemError),
    #[error("unexpected PEM label {0:?}")]
    UnexpectedPemLabel(String),
    #[error("unsupported public key: {0}")]
    Unsupported(#[source] CryptoError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Phase that failed, for callers that branch on the failure class.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    Encoding,
    KeyFormat,
    Signing,
}

#[derive(Debug, Error)]
pub enum CsrError {
    #[error("Failed to generate CSR: {0}")]
    Encoding(#[from] EncodingError),
    #[error("Failed to generate CSR: Failed to encode SubjectPublicKeyInfo: {0}")]
    KeyFormat(#[from] KeyFormatError),
    #[error("Failed to generate CSR: Signing failed: {0}")]
    Signing(#[source] CryptoError),
}

impl CsrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CsrError::Encoding(_) => ErrorKind::Encoding,
            CsrError::KeyFormat(_) => ErrorKind::KeyFormat,
            CsrError::Signing(_) => ErrorKind::Signing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_prefixes() {
        let err = CsrError::from(EncodingError::MalformedOid("1.x".into()));
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(
            err.to_string(),
            "Failed to generate CSR: malformed object identifier \"1.x\""
        );

        let err = CsrError::from(KeyFormatError::Unsupported(CryptoError::UnsupportedCurve));
        assert_eq!(err.kind(), ErrorKind::KeyFormat);
        assert_eq!(
            err.to_string(),
            "Failed to generate CSR: Failed to encode SubjectPublicKeyInfo: \
             unsupported public key: unsupported elliptic curve"
        );

        let err = CsrError::Signing(CryptoError::SignatureVerification);
        assert_eq!(err.kind(), ErrorKind::Signing);
        assert!(err
            .to_string()
            .starts_with("Failed to generate CSR: Signing failed: "));
    }
}
