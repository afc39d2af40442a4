use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter};
use sha1::Sha1;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io;

use tokenista_config::Algorithm;

use crate::error::TokenError;

/// Values bound into a token's signature alongside its payload and expiry.
///
/// Keys are kept sorted, so two maps holding the same pairs always sign identically
/// regardless of the order they were filled in.
pub type ExtraValues = BTreeMap<String, String>;

/// Build the exact string that gets signed for a token
///
/// The base string is `payload-expiry`. When extra values are present their
/// canonical JSON encoding is appended after a `:`; an empty map adds nothing.
pub fn signing_string(
    payload: &str,
    expiry: impl Display,
    extra_values: &ExtraValues,
) -> Result<String, TokenError> {
    let mut sign_string = format!("{}-{}", payload, expiry);
    if !extra_values.is_empty() {
        sign_string.push(':');
        sign_string.push_str(&canonical_json(extra_values)?);
    }
    Ok(sign_string)
}

/// Encode extra values as a compact JSON object with sorted keys.
///
/// Strings are escaped the way PHP's `json_encode` does by default, so tokens stay
/// interchangeable with ones issued by PHP services: `/` becomes `\/` and every
/// non-ASCII code point becomes a lowercase `\uXXXX` escape.
pub fn canonical_json(extra_values: &ExtraValues) -> Result<String, TokenError> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter);
    extra_values.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| TokenError::generic(e.to_string()))
}

struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if c != '/' && c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            if c == '/' {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = index + c.len_utf8();
        }
        CompactFormatter.write_string_fragment(writer, &fragment[start..])
    }
}

/// Sign a token's payload, expiry and extra values with a single secret
///
/// # Returns
///
/// The lowercase hex HMAC of the signing string
pub fn sign_token(
    payload: &str,
    expiry: impl Display,
    extra_values: &ExtraValues,
    secret: &str,
    algorithm: Algorithm,
) -> Result<String, TokenError> {
    let sign_string = signing_string(payload, expiry, extra_values)?;
    let tag = match algorithm {
        Algorithm::Sha1 => hmac_tag::<Hmac<Sha1>>(secret.as_bytes(), sign_string.as_bytes())?,
        Algorithm::Sha256 => hmac_tag::<Hmac<Sha256>>(secret.as_bytes(), sign_string.as_bytes())?,
    };
    Ok(hex::encode(tag))
}

fn hmac_tag<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, TokenError> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|e| TokenError::invalid_key(e.to_string()))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Decode a signature segment into raw MAC bytes.
///
/// Only the exact form the signer emits is accepted: lowercase hex of the
/// algorithm's length. Anything else can never match.
pub(crate) fn decode_signature(signature: &str, algorithm: Algorithm) -> Option<Vec<u8>> {
    let well_formed = signature.len() == algorithm.signature_len()
        && signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !well_formed {
        return None;
    }
    hex::decode(signature).ok()
}

/// Constant-time check of a decoded signature against one secret
pub(crate) fn verify_tag(sign_string: &str, secret: &str, algorithm: Algorithm, tag: &[u8]) -> bool {
    match algorithm {
        Algorithm::Sha1 => hmac_verify::<Hmac<Sha1>>(secret.as_bytes(), sign_string.as_bytes(), tag),
        Algorithm::Sha256 => {
            hmac_verify::<Hmac<Sha256>>(secret.as_bytes(), sign_string.as_bytes(), tag)
        }
    }
}

fn hmac_verify<M: Mac + KeyInit>(secret: &[u8], message: &[u8], tag: &[u8]) -> bool {
    match <M as KeyInit>::new_from_slice(secret) {
        Ok(mut mac) => {
            mac.update(message);
            mac.verify_slice(tag).is_ok()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra(pairs: &[(&str, &str)]) -> ExtraValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_signing_string_without_extra_values() {
        let sign_string = signing_string("vufQO8H+9pwnb5hz", 1394614391, &ExtraValues::new()).unwrap();
        assert_eq!(sign_string, "vufQO8H+9pwnb5hz-1394614391");

        let negative = signing_string("vufQO8H+9pwnb5hz", -20, &ExtraValues::new()).unwrap();
        assert_eq!(negative, "vufQO8H+9pwnb5hz--20");
    }

    #[test]
    fn test_signing_string_with_extra_values() {
        let sign_string = signing_string(
            "vufQO8H+9pwnb5hz",
            1394614391,
            &extra(&[("stuff", "whatever"), ("email", "test@123.456.com")]),
        )
        .unwrap();
        assert_eq!(
            sign_string,
            r#"vufQO8H+9pwnb5hz-1394614391:{"email":"test@123.456.com","stuff":"whatever"}"#
        );
    }

    #[test]
    fn test_canonical_json_escaping() {
        let json = canonical_json(&extra(&[
            ("redirect", "/account/reset"),
            ("name", "Zoë \u{1F600}"),
            ("quote", "say \"hi\"\n"),
        ]))
        .unwrap();
        assert_eq!(
            json,
            r#"{"name":"Zo\u00eb \ud83d\ude00","quote":"say \"hi\"\n","redirect":"\/account\/reset"}"#
        );
    }

    #[test]
    fn test_signing_is_insensitive_to_insertion_order() {
        let mut first = ExtraValues::new();
        first.insert("email".to_string(), "test@123.456.com".to_string());
        first.insert("stuff".to_string(), "whatever".to_string());

        let second: ExtraValues = std::collections::HashMap::from([
            ("stuff".to_string(), "whatever".to_string()),
            ("email".to_string(), "test@123.456.com".to_string()),
        ])
        .into_iter()
        .collect();

        assert_eq!(
            sign_token("payload", 100, &first, "our-secret", Algorithm::Sha1).unwrap(),
            sign_token("payload", 100, &second, "our-secret", Algorithm::Sha1).unwrap()
        );
    }

    #[test]
    fn test_signature_shape() {
        let sha1 = sign_token("payload", 100, &ExtraValues::new(), "", Algorithm::Sha1).unwrap();
        assert_eq!(sha1.len(), 40);
        assert!(sha1.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));

        let sha256 =
            sign_token("payload", 100, &ExtraValues::new(), "", Algorithm::Sha256).unwrap();
        assert_eq!(sha256.len(), 64);
    }

    #[test]
    fn test_verify_tag() {
        let sign_string = signing_string("payload", 100, &ExtraValues::new()).unwrap();
        let signature =
            sign_token("payload", 100, &ExtraValues::new(), "our-secret", Algorithm::Sha1).unwrap();
        let tag = decode_signature(&signature, Algorithm::Sha1).unwrap();

        assert!(verify_tag(&sign_string, "our-secret", Algorithm::Sha1, &tag));
        assert!(!verify_tag(&sign_string, "other-secret", Algorithm::Sha1, &tag));
        assert!(!verify_tag(&sign_string, "our-secret", Algorithm::Sha256, &tag));
    }

    #[test]
    fn test_decode_signature_rejects_non_canonical_hex() {
        let signature =
            sign_token("payload", 100, &ExtraValues::new(), "our-secret", Algorithm::Sha1).unwrap();

        assert!(decode_signature(&signature, Algorithm::Sha1).is_some());
        assert!(decode_signature(&signature.to_uppercase(), Algorithm::Sha1).is_none());
        assert!(decode_signature(&signature[1..], Algorithm::Sha1).is_none());
        assert!(decode_signature(&signature, Algorithm::Sha256).is_none());
        assert!(decode_signature("invalid", Algorithm::Sha1).is_none());
    }
}
