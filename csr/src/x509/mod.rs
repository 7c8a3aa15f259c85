// Licensed under the Apache-2.0 license

//! DER encoding of PKCS#10 certification requests
//!
//! Every value is encoded into its own buffer and composed bottom-up. No
//! structure is ever patched after it has been encoded.

pub mod asn1;
pub mod extensions;
pub mod name;
pub mod pkcs10;
pub mod spki;

pub use asn1::{DerValue, Tag};
pub use name::{DirectoryString, Name};
pub use pkcs10::{CertificationRequest, CertificationRequestInfo};
pub use spki::PublicKeyInput;
