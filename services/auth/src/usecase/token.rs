use aeroride_auth_types::token::{
    IssuedToken, TokenKind, TokenSubject, issue_token, validate_refresh_token,
};

use crate::domain::repository::IdentityRepository;
use crate::domain::types::AuthUser;
use crate::error::AuthServiceError;

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub user: AuthUser,
    /// Carried over from the refresh token so rotated cookies keep the
    /// persistence chosen at sign-in.
    pub remember: bool,
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

pub struct RefreshTokenUseCase<I: IdentityRepository> {
    pub identities: I,
    pub jwt_secret: String,
}

impl<I: IdentityRepository> RefreshTokenUseCase<I> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshTokenOutput, AuthServiceError> {
        // Access tokens are rejected here even when their signature is valid.
        let info = validate_refresh_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| AuthServiceError::InvalidRefreshToken)?;

        let user = self
            .identities
            .find_by_id(info.user_id)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)?;

        // Role comes from storage, not the old token, so promotions apply
        // on the next rotation.
        let subject = TokenSubject {
            user_id: user.id,
            role: user.role,
            remember: info.remember,
        };
        let access = issue_token(&subject, TokenKind::Access, &self.jwt_secret)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let refresh = issue_token(&subject, TokenKind::Refresh, &self.jwt_secret)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;

        Ok(RefreshTokenOutput {
            user,
            remember: info.remember,
            access,
            refresh,
        })
    }
}
