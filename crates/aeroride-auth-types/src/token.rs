//! Session JWT validation and (feature `issuer`) minting.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aeroride_domain::id::UserId;
use aeroride_domain::user::UserRole;

/// Identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: UserId,
    pub role: UserRole,
    /// Whether the session was opened with "remember me".
    pub remember: bool,
    /// Expiry, seconds since UNIX epoch.
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("wrong token kind")]
    WrongKind,
}

/// Access tokens authorize requests; refresh tokens only rotate the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload.
///
/// | Field  | Meaning |
/// |--------|---------|
/// | `sub`  | user id (UUID string) |
/// | `role` | [`UserRole`] wire value (`u8`) |
/// | `kind` | [`TokenKind`] |
/// | `remember` | persistent session cookies requested at sign-in |
/// | `exp`  | expiry, seconds since epoch |
///
/// `Serialize` is only derived for the `issuer` feature: the auth service
/// is the sole token minter.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "issuer", test), derive(Serialize))]
pub struct JwtClaims {
    pub sub: String,
    pub role: u8,
    pub kind: TokenKind,
    #[serde(default)]
    pub remember: bool,
    pub exp: u64,
}

/// HS256, `exp` enforced with the library's default 60s leeway.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

fn validate_kind(token: &str, secret: &str, kind: TokenKind) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.kind != kind {
        return Err(AuthError::WrongKind);
    }
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    let role = UserRole::from_u8(claims.role).ok_or(AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id: UserId::from(user_id),
        role,
        remember: claims.remember,
        exp: claims.exp,
    })
}

/// Validate an access token. Every service calls this per request.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    validate_kind(token, secret, TokenKind::Access)
}

#[cfg(any(feature = "issuer", test))]
pub use issue::{IssuedToken, TokenSubject, issue_token, validate_refresh_token};

#[cfg(any(feature = "issuer", test))]
mod issue {
    use std::time::{SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;
    use crate::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};

    #[derive(Debug, Clone)]
    pub struct IssuedToken {
        pub token: String,
        pub exp: u64,
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    /// Who a token is minted for.
    #[derive(Debug, Clone, Copy)]
    pub struct TokenSubject {
        pub user_id: UserId,
        pub role: UserRole,
        pub remember: bool,
    }

    /// Sign a token of `kind`. Lifetime: 4h access, 7d refresh.
    pub fn issue_token(
        subject: &TokenSubject,
        kind: TokenKind,
        secret: &str,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let ttl = match kind {
            TokenKind::Access => ACCESS_TOKEN_EXP,
            TokenKind::Refresh => REFRESH_TOKEN_EXP,
        };
        let exp = now_secs() + ttl;
        let claims = JwtClaims {
            sub: subject.user_id.to_string(),
            role: subject.role.as_u8(),
            kind,
            remember: subject.remember,
            exp,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(IssuedToken { token, exp })
    }

    /// Validate a refresh token. Only the auth service's rotation flow needs it.
    pub fn validate_refresh_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
        validate_kind(token, secret, TokenKind::Refresh)
    }
}
