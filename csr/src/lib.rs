/*++
Licensed under the Apache-2.0 license.

Abstract:
    PKCS#10 certificate signing request generation for P-256 keys.
--*/

pub use crate::csr::{build_csr, generate_csr, Phase};
pub use error::{CsrError, EncodingError, ErrorKind, KeyFormatError};
pub use x509::{CertificationRequest, CertificationRequestInfo, PublicKeyInput};

pub mod csr;
pub mod error;
pub mod oid;
pub mod x509;
