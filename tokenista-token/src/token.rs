use std::fmt;

/// Signature given to tokens that do not split into three segments.
///
/// It is not hex, so it can never equal a computed signature.
pub const INVALID_SIGNATURE: &str = "invalid";

/// The three hyphen-separated segments of a token string
///
/// Payloads are standard base64 and signatures are hex, so neither can contain a
/// hyphen; splitting on `-` is only safe because of that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub payload: &'a str,
    /// The expiry segment exactly as it appears in the token
    pub expiry: &'a str,
    pub signature: &'a str,
}

impl<'a> TokenParts<'a> {
    /// Split a token string into its segments.
    ///
    /// This never fails: anything that is not exactly three segments becomes an
    /// empty payload and expiry with [`INVALID_SIGNATURE`], which validates as
    /// both tampered and expired.
    pub fn parse(token: &'a str) -> Self {
        let mut segments = token.split('-');
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(payload), Some(expiry), Some(signature), None) => Self {
                payload,
                expiry,
                signature,
            },
            _ => Self::malformed(),
        }
    }

    fn malformed() -> Self {
        Self {
            payload: "",
            expiry: "",
            signature: INVALID_SIGNATURE,
        }
    }

    /// The expiry as a Unix timestamp, or 0 (the epoch) when it is not an integer
    pub fn expiry_timestamp(&self) -> i64 {
        self.expiry.parse::<i64>().unwrap_or(0)
    }
}

impl fmt::Display for TokenParts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.payload, self.expiry, self.signature)
    }
}

/// Split a token string into payload, expiry and signature
///
/// Convenience wrapper around [`TokenParts::parse`].
pub fn parse_token(token: &str) -> TokenParts<'_> {
    TokenParts::parse(token)
}
