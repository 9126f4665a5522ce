//! Signed session helpers for integration tests.
//!
//! Services validate real JWTs, so tests mint them with the same secret the
//! router under test was built with.

use axum::http::{HeaderMap, HeaderValue, header};

use aeroride_auth_types::cookie::ACCESS_TOKEN_COOKIE;
use aeroride_auth_types::token::{TokenKind, TokenSubject, issue_token};
use aeroride_domain::id::UserId;
use aeroride_domain::user::UserRole;

/// Secret shared by test routers and [`MockSession`].
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Identity to sign into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockSession {
    pub user_id: UserId,
    pub role: UserRole,
}

impl MockSession {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn passenger() -> Self {
        Self::new(UserId::generate(), UserRole::Passenger)
    }

    pub fn driver() -> Self {
        Self::new(UserId::generate(), UserRole::Driver)
    }

    pub fn access_token(&self) -> String {
        self.token(TokenKind::Access)
    }

    pub fn refresh_token(&self) -> String {
        self.token(TokenKind::Refresh)
    }

    fn token(&self, kind: TokenKind) -> String {
        let subject = TokenSubject {
            user_id: self.user_id,
            role: self.role,
            remember: false,
        };
        issue_token(&subject, kind, TEST_JWT_SECRET)
            .expect("sign test token")
            .token
    }

    /// `Authorization: Bearer <access token>`.
    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.access_token()))
            .expect("token is valid header value")
    }

    /// `Cookie: aeroride_access_token=<access token>`.
    pub fn access_cookie(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("{ACCESS_TOKEN_COOKIE}={}", self.access_token()))
            .expect("token is valid header value")
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, self.bearer());
        map
    }
}
