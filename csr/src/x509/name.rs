// Licensed under the Apache-2.0 license

use super::asn1::{
    encode_oid, encode_printable_string, encode_sequence, encode_set, encode_utf8_string,
    DerValue,
};
use crate::{error::EncodingError, oid};

/// String choices allowed for X.520 naming attributes.
///
/// Some verifiers do an exact DER comparison on names, so the caller picks
/// the string type explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryString<'a> {
    PrintableString(&'a str),
    Utf8String(&'a str),
}

impl DirectoryString<'_> {
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PrintableString(val) => val,
            Self::Utf8String(val) => val,
        }
    }

    pub fn encode(&self) -> Result<DerValue, EncodingError> {
        match self {
            Self::PrintableString(val) => encode_printable_string(val),
            Self::Utf8String(val) => Ok(encode_utf8_string(val)),
        }
    }
}

/// Subject of a certification request: a single CommonName.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name<'a> {
    pub cn: DirectoryString<'a>,
}

impl<'a> Name<'a> {
    /// A subject whose CommonName is encoded as a UTF8String.
    pub fn common_name(cn: &'a str) -> Self {
        Self {
            cn: DirectoryString::Utf8String(cn),
        }
    }

    /// DER-encodes the Name as an RDNSequence holding one
    /// RelativeDistinguishedName with the CommonName attribute.
    ///
    /// Name ::= CHOICE { rdnSequence  RDNSequence }
    ///
    /// RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
    ///
    /// RelativeDistinguishedName ::=
    ///     SET SIZE (1..MAX) OF AttributeTypeAndValue
    ///
    /// AttributeTypeAndValue ::= SEQUENCE {
    ///     type     AttributeType,
    ///     value    AttributeValue }
    pub fn encode(&self) -> Result<DerValue, EncodingError> {
        let cn = encode_sequence(&[encode_oid(oid::COMMON_NAME)?, self.cn.encode()?]);
        Ok(encode_sequence(&[encode_set(&[cn])]))
    }
}
