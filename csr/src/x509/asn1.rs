// Licensed under the Apache-2.0 license

//! DER encoders for the ASN.1 types used by PKCS#10
//!
//! Every encoder returns a complete tag-length-value triple as a [`DerValue`].
//! Constructed types take already-encoded children and concatenate them in
//! the order given.

use crate::{error::EncodingError, oid::Oid};
use core::fmt;

/// ASN.1 identifiers emitted by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    ObjectIdentifier,
    Utf8String,
    PrintableString,
    Sequence,
    Set,
    /// `[n]` with primitive contents, as used by IMPLICIT tagging.
    ContextSpecific(u8),
    /// `[n]` wrapping a complete DER value, as used by EXPLICIT tagging.
    ContextSpecificConstructed(u8),
}

impl Tag {
    const BOOL_TAG: u8 = 0x1;
    const INTEGER_TAG: u8 = 0x2;
    const BIT_STRING_TAG: u8 = 0x3;
    const OCTET_STRING_TAG: u8 = 0x4;
    const OID_TAG: u8 = 0x6;
    const UTF8_STRING_TAG: u8 = 0xC;
    const PRINTABLE_STRING_TAG: u8 = 0x13;
    const SEQUENCE_TAG: u8 = 0x30;
    const SET_OF_TAG: u8 = 0x31;

    // Constants for setting tag bits
    const CONTEXT_SPECIFIC: u8 = 0x80; // Used for Implicit/Explicit tags
    const CONSTRUCTED: u8 = 0x20; // SET{OF} and SEQUENCE{OF} have this bit set

    // Tag numbers from 31 up need the multi-byte high-tag-number form.
    const MAX_LOW_TAG_NUMBER: u8 = 30;

    /// The single identifier octet for this tag.
    pub fn to_byte(self) -> Result<u8, EncodingError> {
        let byte = match self {
            Tag::Boolean => Self::BOOL_TAG,
            Tag::Integer => Self::INTEGER_TAG,
            Tag::BitString => Self::BIT_STRING_TAG,
            Tag::OctetString => Self::OCTET_STRING_TAG,
            Tag::ObjectIdentifier => Self::OID_TAG,
            Tag::Utf8String => Self::UTF8_STRING_TAG,
            Tag::PrintableString => Self::PRINTABLE_STRING_TAG,
            Tag::Sequence => Self::SEQUENCE_TAG,
            Tag::Set => Self::SET_OF_TAG,
            Tag::ContextSpecific(n) => Self::CONTEXT_SPECIFIC | Self::low_tag_number(n)?,
            Tag::ContextSpecificConstructed(n) => {
                Self::CONTEXT_SPECIFIC | Self::CONSTRUCTED | Self::low_tag_number(n)?
            }
        };
        Ok(byte)
    }

    fn low_tag_number(n: u8) -> Result<u8, EncodingError> {
        if n > Self::MAX_LOW_TAG_NUMBER {
            return Err(EncodingError::InvalidTag(n));
        }
        Ok(n)
    }
}

/// A complete DER encoding of one ASN.1 value.
///
/// The bytes are self-delimiting: the header's length covers exactly the
/// remaining content octets. Values are never modified once built.
#[derive(Clone, PartialEq, Eq)]
pub struct DerValue(Vec<u8>);

impl DerValue {
    /// Wrap bytes produced elsewhere after checking they hold exactly one
    /// low-tag-number DER value with a definite length.
    pub fn from_der(bytes: Vec<u8>) -> Result<Self, EncodingError> {
        let (&tag, rest) = bytes
            .split_first()
            .ok_or(EncodingError::InvalidLength(0))?;
        if tag & 0x1f == 0x1f {
            return Err(EncodingError::InvalidTag(tag));
        }

        let (&first, rest) = rest
            .split_first()
            .ok_or(EncodingError::InvalidLength(bytes.len()))?;
        let (content_len, content) = if first & 0x80 == 0 {
            (first as usize, rest)
        } else {
            let width = (first & 0x7f) as usize;
            // Indefinite lengths and lengths wider than usize are rejected
            if width == 0 || width > core::mem::size_of::<usize>() || rest.len() < width {
                return Err(EncodingError::InvalidLength(bytes.len()));
            }
            let len = rest[..width]
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize);
            (len, &rest[width..])
        };

        if content.len() != content_len {
            return Err(EncodingError::InvalidLength(content_len));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for DerValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for DerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerValue(")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// Calculate the number of bytes the ASN.1 size field will be
fn get_size_width(size: usize) -> usize {
    if size <= 127 {
        1
    } else {
        let significant_bits = usize::BITS - size.leading_zeros();
        1 + ((significant_bits + 7) / 8) as usize
    }
}

/// DER-encodes the size field of an ASN.1 type
///
/// Sizes up to 127 use the short form. Larger sizes use `0x80 | n` followed
/// by the `n` big-endian bytes of the size, with no leading zero bytes.
pub fn encode_length(size: usize) -> Vec<u8> {
    let size_width = get_size_width(size);
    let mut out = Vec::with_capacity(size_width);

    if size_width == 1 {
        out.push(size as u8);
    } else {
        let rem = size_width - 1;
        out.push(0x80 | rem as u8);

        for i in (0..rem).rev() {
            out.push((size >> (i * 8)) as u8);
        }
    }

    out
}

fn tlv(tag: u8, parts: &[&[u8]]) -> DerValue {
    let size: usize = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(1 + get_size_width(size) + size);
    out.push(tag);
    out.extend_from_slice(&encode_length(size));
    for part in parts {
        out.extend_from_slice(part);
    }
    DerValue(out)
}

/// Frame `contents` with the identifier and length octets for `tag`.
pub fn encode_tlv(tag: Tag, contents: &[u8]) -> Result<DerValue, EncodingError> {
    Ok(tlv(tag.to_byte()?, &[contents]))
}

/// DER-encodes `value` as an ASN.1 BOOLEAN. TRUE is `0xFF`.
pub fn encode_boolean(value: bool) -> DerValue {
    tlv(Tag::BOOL_TAG, &[&[if value { 0xFF } else { 0x00 }]])
}

/// DER-encodes a big-endian unsigned integer buffer as an ASN.1 INTEGER
///
/// Redundant leading zero bytes are stripped and a single zero byte is
/// prepended when the most significant remaining bit is set, so the value is
/// never read back as negative. An empty buffer encodes zero.
pub fn encode_integer_bytes(integer: &[u8]) -> DerValue {
    let first_significant = integer
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(integer.len());
    let trimmed = &integer[first_significant..];

    match trimmed.first() {
        None => tlv(Tag::INTEGER_TAG, &[&[0]]),
        Some(&msb) if msb & 0x80 != 0 => tlv(Tag::INTEGER_TAG, &[&[0], trimmed]),
        Some(_) => tlv(Tag::INTEGER_TAG, &[trimmed]),
    }
}

/// DER-encodes `integer` as an ASN.1 INTEGER
pub fn encode_integer(integer: u64) -> DerValue {
    encode_integer_bytes(&integer.to_be_bytes())
}

/// DER-encodes the dotted-decimal `oid` as an ASN.1 OBJECT IDENTIFIER
pub fn encode_oid(oid: &str) -> Result<DerValue, EncodingError> {
    Ok(encode_oid_value(&Oid::parse(oid)?))
}

pub fn encode_oid_value(oid: &Oid) -> DerValue {
    tlv(Tag::OID_TAG, &[&oid.to_der_contents()])
}

/// DER-encodes `bytes` as an ASN.1 BIT STRING with no unused bits.
pub fn encode_bit_string(bytes: &[u8]) -> DerValue {
    // First byte of BIT STRING is the number of unused bits. But all bits
    // are used.
    tlv(Tag::BIT_STRING_TAG, &[&[0], bytes])
}

pub fn encode_octet_string(bytes: &[u8]) -> DerValue {
    tlv(Tag::OCTET_STRING_TAG, &[bytes])
}

pub fn encode_utf8_string(s: &str) -> DerValue {
    tlv(Tag::UTF8_STRING_TAG, &[s.as_bytes()])
}

/// X.680 PrintableString alphabet
fn is_printable(c: char) -> bool {
    c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
}

/// DER-encodes `s` as an ASN.1 PrintableString
///
/// Fails with [`EncodingError::NonPrintableString`] if `s` contains a
/// character outside the PrintableString alphabet.
pub fn encode_printable_string(s: &str) -> Result<DerValue, EncodingError> {
    if !s.chars().all(is_printable) {
        return Err(EncodingError::NonPrintableString(s.to_string()));
    }
    Ok(tlv(Tag::PRINTABLE_STRING_TAG, &[s.as_bytes()]))
}

fn concat(children: &[DerValue]) -> Vec<&[u8]> {
    children.iter().map(DerValue::as_bytes).collect()
}

/// DER-encodes a SEQUENCE of `children` in the order given.
pub fn encode_sequence(children: &[DerValue]) -> DerValue {
    tlv(Tag::SEQUENCE_TAG, &concat(children))
}

/// DER-encodes a SET of `children` in the order given.
///
/// Callers with more than one element are responsible for supplying them in
/// DER SET OF order.
pub fn encode_set(children: &[DerValue]) -> DerValue {
    tlv(Tag::SET_OF_TAG, &concat(children))
}

/// Wraps `inner` in an EXPLICIT constructed `[number]` tag.
pub fn encode_context_specific(number: u8, inner: &DerValue) -> Result<DerValue, EncodingError> {
    encode_tlv(Tag::ContextSpecificConstructed(number), inner.as_bytes())
}

/// Encodes `contents` under an IMPLICIT primitive `[number]` tag.
pub fn encode_context_specific_primitive(
    number: u8,
    contents: &[u8],
) -> Result<DerValue, EncodingError> {
    encode_tlv(Tag::ContextSpecific(number), contents)
}

/// DER-encodes an X.501 AttributeTypeAndValue with a UTF8String value.
///
/// AttributeTypeAndValue ::= SEQUENCE {
///     type     AttributeType,
///     value    AttributeValue }
pub fn encode_attribute(oid: &str, value: &str) -> Result<DerValue, EncodingError> {
    Ok(encode_sequence(&[
        encode_oid(oid)?,
        encode_utf8_string(value),
    ]))
}
