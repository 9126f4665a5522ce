use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use aeroride_auth_types::{
    cookie::{
        REFRESH_TOKEN_COOKIE, clear_cookies, set_access_token_cookie, set_refresh_token_cookie,
    },
    identity::SessionIdentity,
};
use aeroride_core::error::AppError;
use aeroride_domain::id::UserId;
use aeroride_domain::user::UserRole;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::token::RefreshTokenUseCase;

const X_AERORIDE_ACCESS_TOKEN_EXPIRES: &str = "x-aeroride-access-token-expires";

fn token_expires_header(exp: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(X_AERORIDE_ACCESS_TOKEN_EXPIRES),
        HeaderValue::from(exp),
    );
    headers
}

// ── GET /auth/token ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckTokenQuery {
    /// Role the caller must satisfy, by storage name.
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct CheckTokenResponse {
    pub user_id: UserId,
    pub user_role: UserRole,
    pub access_token_exp: u64,
}

pub async fn check_token(
    identity: Result<SessionIdentity, AppError>,
    Query(query): Query<CheckTokenQuery>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let identity = identity.map_err(|_| AuthServiceError::InvalidToken)?;

    if let Some(required) = query.role.as_deref() {
        let required = required
            .parse::<UserRole>()
            .map_err(|_| AuthServiceError::MalformedInput("unknown role"))?;
        if !identity.role.satisfies(required) {
            return Err(AuthServiceError::InvalidToken);
        }
    }

    Ok((
        StatusCode::OK,
        token_expires_header(identity.exp),
        Json(CheckTokenResponse {
            user_id: identity.user_id,
            user_role: identity.role,
            access_token_exp: identity.exp,
        }),
    ))
}

// ── PATCH /auth/token ─────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let refresh_value = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::InvalidRefreshToken)?;

    let usecase = RefreshTokenUseCase {
        identities: state.identity_repo(),
        jwt_secret: state.jwt_secret.as_str().to_owned(),
    };

    let out = usecase.execute(&refresh_value).await?;

    let jar = set_access_token_cookie(
        jar,
        out.access.token,
        state.cookie_domain.clone(),
        out.remember,
    );
    let jar = set_refresh_token_cookie(
        jar,
        out.refresh.token,
        state.cookie_domain.clone(),
        out.remember,
    );

    Ok((StatusCode::CREATED, jar, token_expires_header(out.access.exp)))
}

// ── DELETE /auth/token ────────────────────────────────────────────────────────

pub async fn revoke_token(
    State(state): State<AppState>,
    _identity: SessionIdentity,
    jar: CookieJar,
) -> impl IntoResponse {
    let jar = clear_cookies(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}
