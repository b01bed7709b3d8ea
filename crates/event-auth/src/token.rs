//! Bearer token generation and validation
//!
//! Tokens are compact JWTs signed with HS256 over a shared secret. The payload
//! carries the user id and email plus issue and expiry timestamps. Nothing is
//! stored server side, so a token stays valid until `exp` passes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime in seconds (2 hours)
pub const DEFAULT_TOKEN_TTL: u64 = 2 * 60 * 60;

/// Minimum accepted secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime in seconds; keeps `iat + ttl` in range
pub const MAX_TOKEN_TTL: u64 = i64::MAX as u64;

/// JWT header for HS256
#[derive(Debug, Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
}

impl Default for JwtHeader {
    fn default() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: i64,
    /// Email address at issue time
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration (Unix timestamp)
    pub exp: u64,
}

/// Issues and verifies signed tokens with one secret and lifetime
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
    ttl_secs: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer, rejecting secrets shorter than [`MIN_SECRET_LEN`]
    /// and lifetimes above [`MAX_TOKEN_TTL`]
    pub fn new(secret: impl Into<Vec<u8>>, ttl_secs: u64) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Key(format!(
                "secret must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                secret.len()
            )));
        }

        if ttl_secs > MAX_TOKEN_TTL {
            return Err(AuthError::Key(format!(
                "token lifetime must be at most {} seconds, got {}",
                MAX_TOKEN_TTL, ttl_secs
            )));
        }

        Ok(Self { secret, ttl_secs })
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a token for `user_id` that expires `ttl_secs` from now
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        let now = now_secs();
        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| AuthError::Encode("token expiry out of range".to_string()))?;

        let claims = TokenClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp,
        };

        self.encode(&claims)
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(token, now_secs())
    }

    fn verify_at(&self, token: &str, now: u64) -> Result<TokenClaims, AuthError> {
        let claims = self.decode(token)?;

        if claims.exp <= now {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| AuthError::Key(e.to_string()))
    }

    fn encode(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        let header_json = serde_json::to_vec(&JwtHeader::default())
            .map_err(|e| AuthError::Encode(e.to_string()))?;
        let payload_json =
            serde_json::to_vec(claims).map_err(|e| AuthError::Encode(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(payload_json)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            signing_input,
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut parts = token.split('.');
        let (header_b64, payload_b64, signature_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(p), Some(s), None) => (h, p, s),
                _ => return Err(AuthError::InvalidToken("malformed token")),
            };

        // Signature first, so nothing unauthenticated gets parsed
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::InvalidToken("invalid signature encoding"))?;

        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken("invalid signature"))?;

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| AuthError::InvalidToken("invalid header encoding"))?;
        let header: JwtHeader = serde_json::from_slice(&header_bytes)
            .map_err(|_| AuthError::InvalidToken("invalid header format"))?;

        if header.alg != "HS256" {
            return Err(AuthError::InvalidToken("unsupported algorithm"));
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::InvalidToken("invalid payload encoding"))?;

        serde_json::from_slice(&payload_bytes)
            .map_err(|_| AuthError::InvalidToken("invalid payload format"))
    }
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Extract the token from an Authorization header value
///
/// Accepts `Bearer <token>` as well as a bare token, which older clients send.
/// Returns `None` for a missing or blank header.
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let value = auth_header?.trim();
    if value.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(TEST_SECRET, DEFAULT_TOKEN_TTL).unwrap()
    }

    #[test]
    fn test_token_issue_and_verify() {
        let issuer = issuer();
        let token = issuer.issue(42, "a@x.com").unwrap();

        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL);
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = TokenIssuer::new("short", DEFAULT_TOKEN_TTL);
        assert!(matches!(result, Err(AuthError::Key(_))));
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        for ttl in [u64::MAX, MAX_TOKEN_TTL + 1] {
            let result = TokenIssuer::new(TEST_SECRET, ttl);
            assert!(matches!(result, Err(AuthError::Key(_))), "ttl {}", ttl);
        }
    }

    #[test]
    fn test_longest_ttl_issues_a_valid_token() {
        let issuer = TokenIssuer::new(TEST_SECRET, MAX_TOKEN_TTL).unwrap();
        assert_eq!(issuer.ttl_secs(), MAX_TOKEN_TTL);

        let token = issuer.issue(1, "a@x.com").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.exp, claims.iat + MAX_TOKEN_TTL);
    }

    #[test]
    fn test_invalid_token() {
        assert_eq!(
            issuer().verify("invalid-token"),
            Err(AuthError::InvalidToken("malformed token"))
        );
        assert!(issuer().verify("a.b.c.d").is_err());
        assert!(issuer().verify("").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = issuer().issue(1, "a@x.com").unwrap();

        let other = TokenIssuer::new("another-secret-key-at-least-32-bytes", 60).unwrap();
        assert_eq!(
            other.verify(&token),
            Err(AuthError::InvalidToken("invalid signature"))
        );
    }

    #[test]
    fn test_expired_token() {
        let issuer = TokenIssuer::new(TEST_SECRET, 60).unwrap();
        let token = issuer.issue(7, "a@x.com").unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(
            issuer.verify_at(&token, claims.exp),
            Err(AuthError::TokenExpired)
        );
        assert!(issuer.verify_at(&token, claims.exp - 1).is_ok());
    }

    #[test]
    fn test_zero_ttl_token_is_already_expired() {
        let issuer = TokenIssuer::new(TEST_SECRET, 0).unwrap();
        let token = issuer.issue(7, "a@x.com").unwrap();

        assert_eq!(issuer.verify(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let issuer = issuer();
        let token = issuer.issue(1, "a@x.com").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = TokenClaims {
            sub: 2,
            email: "a@x.com".to_string(),
            iat: 0,
            exp: u64::MAX,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            issuer.verify(&forged),
            Err(AuthError::InvalidToken("invalid signature"))
        );
    }

    #[test]
    fn test_jwt_format() {
        let token = issuer().issue(1, "a@x.com").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let header_bytes = URL_SAFE_NO_PAD.decode(parts[0]).unwrap();
        let header: JwtHeader = serde_json::from_slice(&header_bytes).unwrap();
        assert_eq!(header.alg, "HS256");
        assert_eq!(header.typ, "JWT");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", issuer());
        assert!(!rendered.contains(TEST_SECRET));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc123")), Some("abc123"));
        assert_eq!(extract_bearer_token(Some("bearer abc123")), Some("abc123"));
        assert_eq!(extract_bearer_token(Some("abc123")), Some("abc123"));

        assert_eq!(extract_bearer_token(Some("Basic abc123")), None);
        assert_eq!(extract_bearer_token(Some("Bearer ")), None);
        assert_eq!(extract_bearer_token(Some("")), None);
        assert_eq!(extract_bearer_token(None), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn any_user_id_round_trips(user_id in any::<i64>(), local in "[a-z]{1,12}") {
            let issuer = issuer();
            let email = format!("{}@example.com", local);
            let token = issuer.issue(user_id, &email).unwrap();

            let claims = issuer.verify(&token).unwrap();
            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.email, email);
        }

        #[test]
        fn flipping_a_signature_char_invalidates(idx in 0usize..43) {
            let token = issuer().issue(1, "a@x.com").unwrap();
            let (body, signature) = token.rsplit_once('.').unwrap();

            let mut chars: Vec<char> = signature.chars().collect();
            let i = idx % chars.len();
            chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
            let tampered = format!("{}.{}", body, chars.into_iter().collect::<String>());

            prop_assert!(issuer().verify(&tampered).is_err());
        }
    }
}
