use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried inside a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Why a token failed verification.
///
/// Callers that surface failures to clients should collapse all three
/// variants into a single response so the reason is not observable from
/// the outside.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not structurally a valid signed token.
    #[error("malformed token")]
    Malformed,
    /// The signature does not match the token contents.
    #[error("invalid token signature")]
    SignatureInvalid,
    /// The token was well-formed and correctly signed, but its expiry
    /// timestamp is in the past.
    #[error("expired token")]
    Expired,
}

/// Issues and verifies signed bearer tokens (HS256).
///
/// The codec is stateless: everything needed to verify a token is the
/// token itself plus the signing secret held here. It can be cloned
/// freely, so one copy can live in the middleware and another in the
/// credential service.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Builds a codec from the shared signing secret and a token
    /// lifetime in seconds.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        TokenCodec {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issues a token for `subject`, valid from now until now + ttl.
    pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verifies a token and returns its claims.
    ///
    /// Structure is checked before the signature, and the signature
    /// before expiry, so a tampered token reports `SignatureInvalid`
    /// even when its expiry timestamp also lies in the past.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        // No clock-skew allowance: a token is expired the moment its
        // exp timestamp has passed.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureInvalid
                }
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-for-token-codec";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, 3600)
    }

    #[test]
    fn issued_token_round_trips_subject() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn lifetime_follows_configured_ttl() {
        for ttl in [1, 60, 3600, 86_400] {
            let codec = TokenCodec::new(SECRET, ttl);
            let token = codec.issue("bob").unwrap();
            let claims = codec.verify(&token).unwrap();
            assert_eq!(claims.exp - claims.iat, ttl, "ttl {} not honored", ttl);
        }
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let codec = codec();
        let now = Utc::now().timestamp();
        let stale = Claims {
            sub: "alice".to_owned(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();

        // Flip the first character of the signature segment. The first
        // character carries the high bits of the first signature byte,
        // so the change always survives base64 decoding.
        let (body, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", body, flipped, &signature[1..]);

        assert_eq!(codec.verify(&tampered), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let ours = codec();
        let theirs = TokenCodec::new("a-completely-different-secret", 3600);
        let token = theirs.issue("alice").unwrap();

        assert_eq!(ours.verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn structurally_invalid_tokens_are_malformed() {
        let codec = codec();
        for garbage in ["", "garbage", "only.two", "a.b.c.d"] {
            assert_eq!(
                codec.verify(garbage),
                Err(TokenError::Malformed),
                "input {:?} should be malformed",
                garbage
            );
        }

        // A real token with the signature segment chopped off.
        let token = codec.issue("alice").unwrap();
        let (body, _) = token.rsplit_once('.').unwrap();
        assert_eq!(codec.verify(body), Err(TokenError::Malformed));
    }
}
