use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use aeroride_auth_types::cookie::{set_access_token_cookie, set_refresh_token_cookie};
use aeroride_domain::id::UserId;
use aeroride_domain::user::UserRole;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::otp::{IssueOtpInput, IssueOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

// ── POST /auth/otp ────────────────────────────────────────────────────────────

/// Missing fields deserialize to empty strings so validation answers 400.
#[derive(Deserialize)]
pub struct IssueOtpRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueOtpResponse {
    pub success: bool,
    pub message: &'static str,
    /// Epoch milliseconds.
    pub can_resend_at: i64,
}

pub async fn issue_otp(
    State(state): State<AppState>,
    Json(body): Json<IssueOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = IssueOtpUseCase {
        otps: state.otp_repo(),
        mailer: state.mailer.clone(),
        generator: state.code_generator(),
        limiter: state.rate_limiter.clone(),
    };

    let out = usecase.execute(IssueOtpInput { email: body.email }).await?;

    Ok((
        StatusCode::OK,
        Json(IssueOtpResponse {
            success: true,
            message: "OTP sent successfully",
            can_resend_at: out.can_resend_at.timestamp_millis(),
        }),
    ))
}

// ── POST /auth/otp/verify ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub remember_me: bool,
    pub role: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Serialize)]
pub struct VerifiedUser {
    pub id: UserId,
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token expiry, seconds since epoch.
    pub expires_at: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub is_new_user: bool,
    pub user: VerifiedUser,
    pub session: SessionBody,
    pub message: &'static str,
    pub warnings: Vec<String>,
}

fn parse_role(role: Option<String>) -> Result<Option<UserRole>, AuthServiceError> {
    match role.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name
            .parse::<UserRole>()
            .map(Some)
            .map_err(|_| AuthServiceError::MalformedInput("unknown role")),
    }
}

pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let role = parse_role(body.role)?;
    let usecase = VerifyOtpUseCase {
        otps: state.otp_repo(),
        identities: state.identity_repo(),
        jwt_secret: state.jwt_secret.as_str().to_owned(),
    };

    let out = usecase
        .execute(VerifyOtpInput {
            email: body.email,
            code: body.code,
            remember_me: body.remember_me,
            role,
            full_name: body.full_name,
        })
        .await?;

    let jar = set_access_token_cookie(
        jar,
        out.access.token.clone(),
        state.cookie_domain.clone(),
        out.remember_me,
    );
    let jar = set_refresh_token_cookie(
        jar,
        out.refresh.token.clone(),
        state.cookie_domain.clone(),
        out.remember_me,
    );

    let message = if out.is_new_user {
        "Account created successfully!"
    } else {
        "Login successful!"
    };

    Ok((
        StatusCode::OK,
        jar,
        Json(VerifyOtpResponse {
            success: true,
            is_new_user: out.is_new_user,
            user: VerifiedUser {
                id: out.user.id,
                email: out.user.email,
            },
            session: SessionBody {
                access_token: out.access.token,
                refresh_token: out.refresh.token,
                expires_at: out.access.exp,
            },
            message,
            warnings: out.warnings,
        }),
    ))
}
