/*++
Licensed under the Apache-2.0 license.

Abstract:
    ASN.1 OBJECT IDENTIFIER parsing and content encoding.
--*/
use crate::error::EncodingError;
use core::fmt;
use core::str::FromStr;

// RFC 5480 id-ecPublicKey
pub const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

// RFC 5480 secp256r1
pub const CURVE_P256: &str = "1.2.840.10045.3.1.7";

// RFC 5758 ecdsa-with-SHA256
pub const ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";

// X.520 id-at-commonName
pub const COMMON_NAME: &str = "2.5.4.3";

// RFC 5280 id-ce-subjectAltName
pub const SUBJECT_ALT_NAME: &str = "2.5.29.17";

// RFC 2985 pkcs-9-at-extensionRequest
pub const EXTENSION_REQUEST: &str = "1.2.840.113549.1.9.14";

/// A parsed OBJECT IDENTIFIER.
///
/// The first arc is 0, 1 or 2. Under 0 and 1 the second arc is below 40.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: Vec<u64>,
}

impl Oid {
    /// Parse a dotted-decimal string such as `"1.2.840.10045.2.1"`.
    pub fn parse(dotted: &str) -> Result<Self, EncodingError> {
        let malformed = || EncodingError::MalformedOid(dotted.to_string());

        let arcs = dotted
            .split('.')
            .map(|arc| {
                if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed());
                }
                arc.parse::<u64>().map_err(|_| malformed())
            })
            .collect::<Result<Vec<u64>, EncodingError>>()?;

        match arcs.as_slice() {
            [first, second, ..] if *first <= 2 && (*first == 2 || *second < 40) => {
                // 40 * first + second must fit in a single arc.
                second.checked_add(40 * first).ok_or_else(malformed)?;
                Ok(Self { arcs })
            }
            _ => Err(malformed()),
        }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    /// The content octets of the OBJECT IDENTIFIER, without tag and length.
    ///
    /// The first two arcs share one subidentifier `40 * arc1 + arc2`. Every
    /// subidentifier is written base-128, most significant group first, with
    /// the high bit set on all bytes except the last.
    pub fn to_der_contents(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.arcs.len() * 2);
        // Validated in parse
        let first = 40 * self.arcs[0] + self.arcs[1];
        encode_base128(first, &mut bytes);
        for &arc in &self.arcs[2..] {
            encode_base128(arc, &mut bytes);
        }
        bytes
    }
}

fn encode_base128(value: u64, out: &mut Vec<u8>) {
    // A u64 needs at most ten 7-bit groups.
    let mut groups = [0u8; 10];
    let mut i = groups.len();
    let mut v = value;
    loop {
        i -= 1;
        groups[i] = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    let last = groups.len() - 1;
    for (j, &group) in groups.iter().enumerate().skip(i) {
        out.push(if j == last { group } else { group | 0x80 });
    }
}

impl FromStr for Oid {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{first}")?;
        }
        for arc in arcs {
            write!(f, ".{arc}")?;
        }
        Ok(())
    }
}
