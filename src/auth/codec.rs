// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed token encoding and decoding (HS256).
//!
//! The codec owns the signing key and the two TTL policies, all injected at
//! construction as an immutable [`TokenConfig`]. Rotating the key
//! invalidates every outstanding token; that is an accepted operational
//! trade-off.
//!
//! ## Validation Modes
//!
//! Decoding and expiry checking are deliberately separate:
//!
//! - [`TokenCodec::decode`] verifies signature and structure only. This is
//!   the mode the reissue protocol uses on the expired access token; the
//!   whole point of that token in the reissue flow is that it has expired.
//! - [`TokenCodec::decode_valid`] additionally rejects tokens whose expiry
//!   has passed. This is the mode used everywhere else.
//!
//! Collapsing these into one "is valid" check would reject every reissue
//! attempt, so they stay distinct methods on the same decoder.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaims;
use super::error::AuthError;
use super::roles::Role;

/// Which kind of token to mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, carries subject and roles
    Access,
    /// Long-lived, carries timestamps only
    Refresh,
}

/// Immutable codec configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared HMAC signing secret
    pub secret: String,
    /// Access-token lifetime in milliseconds
    pub access_token_ttl_ms: i64,
    /// Refresh-token lifetime in milliseconds
    pub refresh_token_ttl_ms: i64,
}

/// Encoder/decoder for signed session tokens.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_token_ttl_ms: i64,
    refresh_token_ttl_ms: i64,
}

impl TokenCodec {
    /// Create a codec from its configuration.
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_ttl_ms: config.access_token_ttl_ms,
            refresh_token_ttl_ms: config.refresh_token_ttl_ms,
        }
    }

    /// Access-token lifetime, echoed to clients in the session pair.
    pub fn access_token_ttl_ms(&self) -> i64 {
        self.access_token_ttl_ms
    }

    /// Mint a signed token of the given kind.
    ///
    /// Access tokens embed the subject and roles; refresh tokens embed
    /// neither, which is also how decoded tokens are told apart.
    pub fn issue(
        &self,
        kind: TokenKind,
        subject: &str,
        roles: Option<&[Role]>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = match kind {
            TokenKind::Access => TokenClaims {
                sub: Some(subject.to_string()),
                roles: Some(roles.unwrap_or(&[]).to_vec()),
                iat: now.timestamp(),
                exp: (now + Duration::milliseconds(self.access_token_ttl_ms)).timestamp(),
            },
            TokenKind::Refresh => TokenClaims {
                sub: None,
                roles: None,
                iat: now.timestamp(),
                exp: (now + Duration::milliseconds(self.refresh_token_ttl_ms)).timestamp(),
            },
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))
    }

    /// Decode a token, verifying signature and structure but NOT expiry.
    ///
    /// Callers that need expiry enforcement use [`Self::decode_valid`].
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }

    /// Decode a token and additionally reject it if expired at `now`.
    pub fn decode_valid(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, AuthError> {
        let claims = self.decode(token)?;
        if claims.is_expired(now) {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(&TokenConfig {
            secret: "test-signing-secret".to_string(),
            access_token_ttl_ms: 3_600_000,
            refresh_token_ttl_ms: 14 * 24 * 3_600_000,
        })
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn access_token_round_trip() {
        let codec = test_codec();
        let now = t0();
        let token = codec
            .issue(TokenKind::Access, "42", Some(&[Role::User]), now)
            .unwrap();

        // Three base64url segments separated by dots.
        assert_eq!(token.split('.').count(), 3);

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.roles, Some(vec![Role::User]));
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 3600);
    }

    #[test]
    fn refresh_token_carries_timestamps_only() {
        let codec = test_codec();
        let token = codec.issue(TokenKind::Refresh, "42", None, t0()).unwrap();

        let claims = codec.decode(&token).unwrap();
        assert!(claims.sub.is_none());
        assert!(claims.roles.is_none());
        assert_eq!(claims.exp - claims.iat, 14 * 24 * 3600);
    }

    #[test]
    fn decode_rejects_foreign_signature() {
        let codec = test_codec();
        let other = TokenCodec::new(&TokenConfig {
            secret: "a-different-secret".to_string(),
            access_token_ttl_ms: 3_600_000,
            refresh_token_ttl_ms: 3_600_000,
        });

        let forged = other
            .issue(TokenKind::Access, "42", Some(&[Role::User]), t0())
            .unwrap();
        assert!(matches!(
            codec.decode(&forged),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        let codec = test_codec();
        assert!(matches!(
            codec.decode("not-a-token"),
            Err(AuthError::MalformedToken)
        ));

        // Well-formed base64url segments that do not hold JWT content.
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        let junk = format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\"}"),
            URL_SAFE_NO_PAD.encode(b"plainly not json"),
            URL_SAFE_NO_PAD.encode(b"signature")
        );
        assert!(matches!(
            codec.decode(&junk),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn decode_ignores_expiry_but_decode_valid_enforces_it() {
        let codec = test_codec();
        let now = t0();
        let token = codec
            .issue(TokenKind::Access, "42", Some(&[Role::User]), now)
            .unwrap();

        let past_expiry = now + Duration::milliseconds(3_700_000);

        // The lenient mode recovers identity from an expired token.
        let claims = codec.decode(&token).unwrap();
        assert!(claims.is_expired(past_expiry));

        // The strict mode rejects it.
        assert!(matches!(
            codec.decode_valid(&token, past_expiry),
            Err(AuthError::TokenExpired)
        ));

        // And accepts it while still live.
        assert!(codec.decode_valid(&token, now).is_ok());
    }
}
