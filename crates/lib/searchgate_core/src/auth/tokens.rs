//! JWT mint and verification.
//!
//! Tokens are HS256-signed and carry `{sub, exp, iat}`. Verification accepts
//! the HMAC family only: the declared algorithm is checked on the decoded
//! header before any signature work.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Claims carried by every token this service mints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — the stable user id.
    pub sub: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Errors from [`mint`].
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt encode: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Verification failures. Callers pattern-match on `Expired`; everything else
/// collapses to a generic unauthorized outcome at the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("token is malformed")]
    Malformed,

    #[error("expected an HMAC signing algorithm")]
    WrongAlgorithm,

    #[error("signature mismatch")]
    BadSignature,

    #[error("required claim missing or empty")]
    MissingClaim,

    #[error("token has expired")]
    Expired,
}

/// Claims as decoded from the wire, before presence checks.
#[derive(Deserialize)]
struct RawClaims {
    sub: Option<String>,
    exp: Option<i64>,
    #[serde(default)]
    iat: i64,
}

/// Mint a signed token for `subject` expiring `ttl_seconds` after `now`.
pub fn mint(
    subject: &str,
    now: DateTime<Utc>,
    ttl_seconds: i64,
    key: &[u8],
) -> Result<String, TokenError> {
    let claims = TokenClaims {
        sub: subject.to_string(),
        exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        iat: now.timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(key),
    )?)
}

/// Verify `token` against `key`, returning its claims on success.
///
/// Checks run in a fixed order and the first failure wins: malformed input,
/// declared algorithm, signature, claim presence (`exp`, non-empty `sub`),
/// expiry against the current wall clock. No clock skew is tolerated.
pub fn verify(token: &str, key: &[u8]) -> Result<TokenClaims, VerifyError> {
    if token.is_empty() {
        warn!("token verification failed: no token passed");
        return Err(VerifyError::Malformed);
    }

    let header = decode_header(token).map_err(|_| VerifyError::Malformed)?;
    if !matches!(
        header.alg,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    ) {
        warn!(alg = ?header.alg, "token verification failed: non-HMAC signing algorithm");
        return Err(VerifyError::WrongAlgorithm);
    }

    // Signature only; claim presence and expiry are re-checked explicitly so
    // each failure keeps its own error kind.
    let mut validation = Validation::new(header.alg);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<RawClaims>(token, &DecodingKey::from_secret(key), &validation).map_err(
        |e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => VerifyError::BadSignature,
            _ => VerifyError::Malformed,
        },
    )?;

    let RawClaims { sub, exp, iat } = data.claims;
    let exp = exp.ok_or(VerifyError::MissingClaim)?;
    let sub = sub
        .filter(|s| !s.is_empty())
        .ok_or(VerifyError::MissingClaim)?;

    if exp < Utc::now().timestamp() {
        return Err(VerifyError::Expired);
    }

    Ok(TokenClaims { sub, exp, iat })
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;

    use super::*;

    const KEY: &[u8] = b"test-signing-key";

    #[test]
    fn mint_then_verify_roundtrip() {
        let now = Utc::now();
        let token = mint("user-1", now, 60, KEY).unwrap();
        let claims = verify(&token, KEY).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp, now.timestamp() + 60);
        assert_eq!(claims.iat, now.timestamp());
    }

    #[test]
    fn expired_token_is_distinguishable() {
        let minted_at = Utc::now() - Duration::seconds(3600);
        let token = mint("user-1", minted_at, 60, KEY).unwrap();
        assert_eq!(verify(&token, KEY), Err(VerifyError::Expired));
    }

    #[test]
    fn empty_token_is_malformed() {
        assert_eq!(verify("", KEY), Err(VerifyError::Malformed));
    }

    #[test]
    fn garbage_token_is_malformed() {
        assert_eq!(verify("not-a-jwt", KEY), Err(VerifyError::Malformed));
        assert_eq!(verify("a.b.c", KEY), Err(VerifyError::Malformed));
    }

    #[test]
    fn wrong_key_is_bad_signature() {
        let token = mint("user-1", Utc::now(), 60, KEY).unwrap();
        assert_eq!(verify(&token, b"other-key"), Err(VerifyError::BadSignature));
    }

    /// A token declaring RS256 must be rejected on the header alone, even
    /// though its signature never gets checked.
    #[test]
    fn non_hmac_algorithm_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let exp = Utc::now().timestamp() + 600;
        let payload =
            URL_SAFE_NO_PAD.encode(json!({"sub": "user-1", "exp": exp}).to_string());
        let token = format!("{header}.{payload}.bm90LWEtc2lnbmF0dXJl");
        assert_eq!(verify(&token, KEY), Err(VerifyError::WrongAlgorithm));
    }

    #[test]
    fn missing_exp_claim_is_rejected() {
        let token = encode(
            &Header::default(),
            &json!({"sub": "user-1"}),
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();
        assert_eq!(verify(&token, KEY), Err(VerifyError::MissingClaim));
    }

    #[test]
    fn empty_subject_is_rejected() {
        let exp = Utc::now().timestamp() + 600;
        let token = encode(
            &Header::default(),
            &json!({"sub": "", "exp": exp}),
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();
        assert_eq!(verify(&token, KEY), Err(VerifyError::MissingClaim));

        let token = encode(
            &Header::default(),
            &json!({"exp": exp}),
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();
        assert_eq!(verify(&token, KEY), Err(VerifyError::MissingClaim));
    }
}
