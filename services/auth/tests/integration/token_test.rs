use aeroride_auth::error::AuthServiceError;
use aeroride_auth::usecase::token::RefreshTokenUseCase;
use aeroride_auth_types::token::{
    TokenKind, TokenSubject, issue_token, validate_access_token, validate_refresh_token,
};
use aeroride_domain::user::UserRole;
use aeroride_testing::auth::MockSession;

use crate::helpers::{MockIdentityRepo, TEST_JWT_SECRET, test_user};

fn usecase(identities: MockIdentityRepo) -> RefreshTokenUseCase<MockIdentityRepo> {
    RefreshTokenUseCase {
        identities,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_rotate_token_pair_for_known_user() {
    let user = test_user(UserRole::Passenger);
    let session = MockSession::new(user.id, user.role);

    let out = usecase(MockIdentityRepo::new(vec![user.clone()]))
        .execute(&session.refresh_token())
        .await
        .unwrap();

    assert_eq!(out.user, user);
    let access = validate_access_token(&out.access.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(access.user_id, user.id);
    let refresh = validate_refresh_token(&out.refresh.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(refresh.user_id, user.id);
}

#[tokio::test]
async fn should_take_role_from_storage_not_old_token() {
    // Promoted to driver after the session was opened as a passenger.
    let user = test_user(UserRole::Driver);
    let session = MockSession::new(user.id, UserRole::Passenger);

    let out = usecase(MockIdentityRepo::new(vec![user]))
        .execute(&session.refresh_token())
        .await
        .unwrap();

    let access = validate_access_token(&out.access.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(access.role, UserRole::Driver);
}

#[tokio::test]
async fn should_keep_remember_flag_across_rotation() {
    let user = test_user(UserRole::Passenger);
    let token = issue_token(
        &TokenSubject {
            user_id: user.id,
            role: user.role,
            remember: true,
        },
        TokenKind::Refresh,
        TEST_JWT_SECRET,
    )
    .unwrap()
    .token;

    let out = usecase(MockIdentityRepo::new(vec![user]))
        .execute(&token)
        .await
        .unwrap();

    assert!(out.remember);
    assert!(validate_refresh_token(&out.refresh.token, TEST_JWT_SECRET).unwrap().remember);
}

#[tokio::test]
async fn should_reject_access_token_as_refresh_token() {
    let user = test_user(UserRole::Passenger);
    let session = MockSession::new(user.id, user.role);

    let result = usecase(MockIdentityRepo::new(vec![user]))
        .execute(&session.access_token())
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_refresh_for_unknown_user() {
    let session = MockSession::passenger();

    let result = usecase(MockIdentityRepo::empty())
        .execute(&session.refresh_token())
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_garbage_refresh_token() {
    let result = usecase(MockIdentityRepo::empty()).execute("not-a-jwt").await;
    assert!(matches!(result, Err(AuthServiceError::InvalidRefreshToken)));
}
