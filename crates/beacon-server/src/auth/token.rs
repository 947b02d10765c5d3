//! JWT token service

use std::sync::LazyLock;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moka::sync::Cache;

use super::model::JwtPayload;

/// Verified claims, keyed by the raw token
static TOKEN_CACHE: LazyLock<Cache<String, JwtPayload>> = LazyLock::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(300))
        .build()
});

/// Decode and validate a token, reusing recent verifications
pub fn decode_jwt_token_cached(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<JwtPayload> {
    if let Some(claims) = TOKEN_CACHE.get(token) {
        if claims.exp > chrono::Utc::now().timestamp() {
            return Ok(claims);
        }
        TOKEN_CACHE.invalidate(token);
    }

    let claims = decode_jwt_token(token, secret_key)?;
    TOKEN_CACHE.insert(token.to_string(), claims.clone());

    Ok(claims)
}

/// Decode and validate a token without caching
pub fn decode_jwt_token(token: &str, secret_key: &str) -> jsonwebtoken::errors::Result<JwtPayload> {
    let decoding_key = DecodingKey::from_base64_secret(secret_key)?;
    decode::<JwtPayload>(token, &decoding_key, &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
}

/// Issue a token for `sub` valid for `expire_seconds`
pub fn encode_jwt_token(
    sub: &str,
    secret_key: &str,
    expire_seconds: i64,
) -> jsonwebtoken::errors::Result<String> {
    let exp = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(expire_seconds))
        .unwrap_or_else(chrono::Utc::now)
        .timestamp();

    let payload = JwtPayload {
        sub: sub.to_string(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_base64_secret(secret_key)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "VGhpc0lzTXlDdXN0b21TZWNyZXRLZXkwMTIzNDU2Nzg5MDEyMzQ1Njc4OQ==";
    const OTHER_SECRET: &str = "QW5vdGhlclNlY3JldEtleUZvclRlc3RpbmdQdXJwb3NlczAxMjM0NTY3OA==";

    #[test]
    fn test_encode_decode() {
        let token = encode_jwt_token("alice", SECRET, 3600).unwrap();
        let claims = decode_jwt_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode_jwt_token("alice", SECRET, 3600).unwrap();
        assert!(decode_jwt_token(&token, OTHER_SECRET).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = encode_jwt_token("alice", SECRET, -3600).unwrap();
        assert!(decode_jwt_token(&token, SECRET).is_err());
        assert!(decode_jwt_token_cached(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_jwt_token_cached("not-a-token", SECRET).is_err());
    }

    #[test]
    fn test_cached_decode() {
        let token = encode_jwt_token("bob", SECRET, 3600).unwrap();
        assert_eq!(decode_jwt_token_cached(&token, SECRET).unwrap().sub, "bob");
        assert_eq!(decode_jwt_token_cached(&token, SECRET).unwrap().sub, "bob");
    }
}
