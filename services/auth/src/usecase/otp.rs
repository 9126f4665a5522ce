use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use aeroride_auth_types::token::{IssuedToken, TokenKind, TokenSubject, issue_token};
use aeroride_domain::user::UserRole;

use crate::domain::repository::{
    CodeGenerator, IdentityRepository, IssueRateLimiter, OtpMailer, OtpRepository,
};
use crate::domain::types::{
    AuthUser, NewIdentity, OTP_LEN, OneTimeCode, Outcome, RESEND_COOLDOWN_SECS, RateDecision,
    RoleProfile, email_local_part,
};
use crate::error::AuthServiceError;

fn validate_email(email: &str) -> Result<&str, AuthServiceError> {
    let email = email.trim();
    if email.contains('@') {
        Ok(email)
    } else {
        Err(AuthServiceError::MalformedInput("valid email is required"))
    }
}

// ── Issue ────────────────────────────────────────────────────────────────────

pub struct IssueOtpInput {
    pub email: String,
}

#[derive(Debug)]
pub struct IssueOtpOutput {
    /// Earliest time the client should offer "resend".
    pub can_resend_at: DateTime<Utc>,
}

pub struct IssueOtpUseCase<O, M, G, L>
where
    O: OtpRepository,
    M: OtpMailer,
    G: CodeGenerator,
    L: IssueRateLimiter,
{
    pub otps: O,
    pub mailer: M,
    pub generator: G,
    pub limiter: L,
}

impl<O, M, G, L> IssueOtpUseCase<O, M, G, L>
where
    O: OtpRepository,
    M: OtpMailer,
    G: CodeGenerator,
    L: IssueRateLimiter,
{
    pub async fn execute(&self, input: IssueOtpInput) -> Result<IssueOtpOutput, AuthServiceError> {
        let email = validate_email(&input.email)?;

        if let RateDecision::Limited { retry_after } = self.limiter.check(email).await? {
            return Err(AuthServiceError::RateLimited {
                retry_after_secs: retry_after.as_secs_f64().ceil() as u64,
            });
        }

        let now = Utc::now();
        if let Err(e) = self.otps.purge_expired(now).await {
            warn!(error = ?e, "failed to purge expired login codes");
        }

        let otp = OneTimeCode::issue(email, self.generator.generate(), now);
        self.otps.create(&otp).await?;

        if let Err(e) = self.mailer.send_code(email, &otp.code).await {
            warn!(error = %e, otp_id = %otp.id, "login code delivery failed");
            // An undeliverable code must not stay redeemable.
            if let Err(e) = self.otps.delete(otp.id).await {
                warn!(error = ?e, otp_id = %otp.id, "failed to delete undelivered login code");
            }
            return Err(AuthServiceError::DeliveryFailed);
        }

        info!(otp_id = %otp.id, "login code issued");
        Ok(IssueOtpOutput {
            can_resend_at: now + Duration::seconds(RESEND_COOLDOWN_SECS),
        })
    }
}

// ── Verify ───────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub email: String,
    pub code: String,
    pub remember_me: bool,
    /// Requested role for a first sign-in. Ignored for existing users.
    pub role: Option<UserRole>,
    pub full_name: Option<String>,
}

#[derive(Debug)]
pub struct VerifyOtpOutput {
    pub user: AuthUser,
    pub is_new_user: bool,
    pub remember_me: bool,
    pub access: IssuedToken,
    pub refresh: IssuedToken,
    /// Auxiliary writes that failed without failing the sign-in.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity {
    pub user: AuthUser,
    pub is_new_user: bool,
}

pub struct VerifyOtpUseCase<O, I>
where
    O: OtpRepository,
    I: IdentityRepository,
{
    pub otps: O,
    pub identities: I,
    pub jwt_secret: String,
}

impl<O, I> VerifyOtpUseCase<O, I>
where
    O: OtpRepository,
    I: IdentityRepository,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<VerifyOtpOutput, AuthServiceError> {
        let code = input.code.trim();
        if code.chars().count() != OTP_LEN {
            return Err(AuthServiceError::MalformedCode);
        }
        let email = validate_email(&input.email)?;
        if input.role.is_some_and(|role| !role.is_self_selectable()) {
            return Err(AuthServiceError::MalformedInput("role cannot be self-assigned"));
        }

        let otp = self
            .otps
            .find_latest_valid(email, code, Utc::now())
            .await?
            .ok_or(AuthServiceError::InvalidOrExpiredCode)?;

        // Lost the race to a concurrent verification of the same code.
        if !self.otps.consume(otp.id).await? {
            return Err(AuthServiceError::InvalidOrExpiredCode);
        }

        let (resolved, auxiliary) = self
            .resolve_identity(email, input.role, input.full_name.as_deref())
            .await?
            .into_parts();

        let subject = TokenSubject {
            user_id: resolved.user.id,
            role: resolved.user.role,
            remember: input.remember_me,
        };
        let access = issue_token(&subject, TokenKind::Access, &self.jwt_secret)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let refresh = issue_token(&subject, TokenKind::Refresh, &self.jwt_secret)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;

        info!(
            user_id = %resolved.user.id,
            is_new_user = resolved.is_new_user,
            "login code verified"
        );
        Ok(VerifyOtpOutput {
            user: resolved.user,
            is_new_user: resolved.is_new_user,
            remember_me: input.remember_me,
            access,
            refresh,
            warnings: auxiliary.into_iter().collect(),
        })
    }

    /// Reuse the profile registered under `email`, or create user + profile.
    /// A failed partner-profile write downgrades the result to `Partial`.
    pub async fn resolve_identity(
        &self,
        email: &str,
        role: Option<UserRole>,
        full_name: Option<&str>,
    ) -> Result<Outcome<ResolvedIdentity>, AuthServiceError> {
        if let Some(user) = self.identities.find_by_email(email).await? {
            return Ok(Outcome::Complete(ResolvedIdentity {
                user,
                is_new_user: false,
            }));
        }

        let full_name = full_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email_local_part(email))
            .to_owned();
        let role = role.unwrap_or_default();

        let created = self
            .identities
            .create(&NewIdentity {
                email: email.to_owned(),
                full_name: full_name.clone(),
                role,
            })
            .await;
        let user = match created {
            Ok(user) => user,
            Err(e) => {
                // A concurrent first sign-in may have registered the email.
                let Some(user) = self.identities.find_by_email(email).await? else {
                    return Err(e);
                };
                debug!(user_id = %user.id, "identity created concurrently, reusing it");
                return Ok(Outcome::Complete(ResolvedIdentity {
                    user,
                    is_new_user: false,
                }));
            }
        };
        let resolved = ResolvedIdentity {
            user,
            is_new_user: true,
        };

        let Some(profile) = RoleProfile::for_new_user(role, &full_name, email) else {
            return Ok(Outcome::Complete(resolved));
        };
        match self
            .identities
            .create_role_profile(resolved.user.id, &profile)
            .await
        {
            Ok(()) => Ok(Outcome::Complete(resolved)),
            Err(e) => {
                warn!(
                    error = ?e,
                    user_id = %resolved.user.id,
                    profile = profile.label(),
                    "role profile creation failed"
                );
                Ok(Outcome::Partial {
                    primary: resolved,
                    auxiliary: format!("{} profile could not be created", profile.label()),
                })
            }
        }
    }
}
