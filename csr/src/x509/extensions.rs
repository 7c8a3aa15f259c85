// Licensed under the Apache-2.0 license

use super::asn1::{
    encode_context_specific_primitive, encode_oid, encode_octet_string, encode_sequence,
    encode_set, DerValue,
};
use crate::{error::EncodingError, oid};

// GeneralName dNSName [2] IA5String
const DNS_NAME_TAG_NUMBER: u8 = 2;

/// Encode the subjectAltName extension listing `dns_names` as dNSName entries
///
/// Extension  ::=  SEQUENCE  {
///     extnID      OBJECT IDENTIFIER,
///     critical    BOOLEAN DEFAULT FALSE,
///     extnValue   OCTET STRING
///                 -- contains the DER encoding of an ASN.1 value
///                 -- corresponding to the extension type identified
///                 -- by extnID
/// }
///
/// SubjectAltName ::= GeneralNames
///
/// GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
///
/// Names are written in the order given. `critical` takes its default and is
/// omitted.
pub fn encode_subject_alt_name_extension<S: AsRef<str>>(
    dns_names: &[S],
) -> Result<DerValue, EncodingError> {
    let general_names = dns_names
        .iter()
        .map(|name| {
            encode_context_specific_primitive(DNS_NAME_TAG_NUMBER, name.as_ref().as_bytes())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(encode_sequence(&[
        encode_oid(oid::SUBJECT_ALT_NAME)?,
        encode_octet_string(encode_sequence(&general_names).as_bytes()),
    ]))
}

/// Encode the PKCS#9 extensionRequest attribute
///
/// Attribute ::= SEQUENCE {
///     type   AttributeType,
///     values SET SIZE(1..MAX) OF AttributeValue
/// }
///
/// The single value is an `Extensions` SEQUENCE holding the subjectAltName
/// extension. With no DNS names the attribute is still present and carries
/// an empty `Extensions` SEQUENCE.
pub fn encode_extension_request<S: AsRef<str>>(
    dns_names: &[S],
) -> Result<DerValue, EncodingError> {
    let extensions = if dns_names.is_empty() {
        encode_sequence(&[])
    } else {
        encode_sequence(&[encode_subject_alt_name_extension(dns_names)?])
    };

    Ok(encode_sequence(&[
        encode_oid(oid::EXTENSION_REQUEST)?,
        encode_set(&[extensions]),
    ]))
}
