use chrono::{Duration, Utc};

use aeroride_auth::domain::types::{OneTimeCode, RoleProfile};
use aeroride_auth::error::AuthServiceError;
use aeroride_auth::usecase::otp::{IssueOtpInput, VerifyOtpInput};
use aeroride_auth_types::token::{validate_access_token, validate_refresh_token};
use aeroride_domain::user::UserRole;

use crate::helpers::{
    FIXED_CODE, MockIdentityRepo, MockMailer, MockOtpRepo, TEST_EMAIL, TEST_JWT_SECRET,
    issue_usecase, test_user, verify_usecase,
};

fn issue_input() -> IssueOtpInput {
    IssueOtpInput {
        email: TEST_EMAIL.to_owned(),
    }
}

fn verify_input(code: &str) -> VerifyOtpInput {
    VerifyOtpInput {
        email: TEST_EMAIL.to_owned(),
        code: code.to_owned(),
        remember_me: false,
        role: None,
        full_name: None,
    }
}

// ── IssueOtpUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_and_deliver_code_on_issue() {
    let otps = MockOtpRepo::empty();
    let mailer = MockMailer::new();
    let usecase = issue_usecase(otps.clone(), mailer.clone());

    let before = Utc::now();
    let out = usecase.execute(issue_input()).await.unwrap();

    assert_eq!(
        mailer.sent(),
        vec![(TEST_EMAIL.to_owned(), FIXED_CODE.to_owned())]
    );
    let stored = otps.codes.lock().unwrap().clone();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].code, FIXED_CODE);
    assert!(!stored[0].is_used);
    assert_eq!(stored[0].attempts, 0);
    assert_eq!(stored[0].expires_at - stored[0].created_at, Duration::minutes(5));
    assert!(out.can_resend_at >= before + Duration::seconds(30));
}

#[tokio::test]
async fn should_rate_limit_fourth_issue_within_window() {
    let usecase = issue_usecase(MockOtpRepo::empty(), MockMailer::new());

    for _ in 0..3 {
        usecase.execute(issue_input()).await.unwrap();
    }
    let result = usecase.execute(issue_input()).await;

    match result {
        Err(AuthServiceError::RateLimited { retry_after_secs }) => {
            assert!((1..=30).contains(&retry_after_secs), "{retry_after_secs}");
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn should_not_count_other_identifiers_against_limit() {
    let usecase = issue_usecase(MockOtpRepo::empty(), MockMailer::new());
    for _ in 0..3 {
        usecase.execute(issue_input()).await.unwrap();
    }

    let result = usecase
        .execute(IssueOtpInput {
            email: "other@example.com".to_owned(),
        })
        .await;
    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn should_reject_identifier_without_at_sign() {
    let otps = MockOtpRepo::empty();
    let mailer = MockMailer::new();
    let usecase = issue_usecase(otps.clone(), mailer.clone());

    let result = usecase
        .execute(IssueOtpInput {
            email: "not-an-email".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::MalformedInput(_))),
        "expected MalformedInput, got {result:?}"
    );
    assert_eq!(otps.len(), 0);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn should_delete_code_when_delivery_fails() {
    let otps = MockOtpRepo::empty();
    let usecase = issue_usecase(otps.clone(), MockMailer::failing());

    let result = usecase.execute(issue_input()).await;

    assert!(
        matches!(result, Err(AuthServiceError::DeliveryFailed)),
        "expected DeliveryFailed, got {result:?}"
    );
    assert_eq!(otps.len(), 0);
}

#[tokio::test]
async fn should_purge_expired_codes_on_issue() {
    let stale = OneTimeCode::issue(TEST_EMAIL, "654321".to_owned(), Utc::now() - Duration::hours(1));
    let otps = MockOtpRepo::new(vec![stale]);
    let usecase = issue_usecase(otps.clone(), MockMailer::new());

    usecase.execute(issue_input()).await.unwrap();

    let codes = otps.codes.lock().unwrap().clone();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].code, FIXED_CODE);
}

// ── VerifyOtpUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_passenger_on_first_verification() {
    let otps = MockOtpRepo::empty();
    let identities = MockIdentityRepo::empty();
    issue_usecase(otps.clone(), MockMailer::new())
        .execute(issue_input())
        .await
        .unwrap();

    let out = verify_usecase(otps, identities.clone())
        .execute(verify_input(FIXED_CODE))
        .await
        .unwrap();

    assert!(out.is_new_user);
    assert_eq!(out.user.email, TEST_EMAIL);
    assert_eq!(out.user.role, UserRole::Passenger);
    assert!(out.warnings.is_empty());

    let created = identities.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].full_name, "user");
    assert_eq!(created[0].role, UserRole::Passenger);
    assert!(identities.role_profiles.lock().unwrap().is_empty());

    let info = validate_access_token(&out.access.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, out.user.id);
    assert_eq!(info.role, UserRole::Passenger);
}

#[tokio::test]
async fn should_verify_code_exactly_once() {
    let otps = MockOtpRepo::empty();
    let identities = MockIdentityRepo::empty();
    issue_usecase(otps.clone(), MockMailer::new())
        .execute(issue_input())
        .await
        .unwrap();
    let usecase = verify_usecase(otps, identities);

    usecase.execute(verify_input(FIXED_CODE)).await.unwrap();
    let second = usecase.execute(verify_input(FIXED_CODE)).await;

    assert!(
        matches!(second, Err(AuthServiceError::InvalidOrExpiredCode)),
        "expected InvalidOrExpiredCode, got {second:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_code_even_when_value_matches() {
    let issued_at = Utc::now() - Duration::minutes(6);
    let otps = MockOtpRepo::new(vec![OneTimeCode::issue(
        TEST_EMAIL,
        FIXED_CODE.to_owned(),
        issued_at,
    )]);

    let result = verify_usecase(otps, MockIdentityRepo::empty())
        .execute(verify_input(FIXED_CODE))
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidOrExpiredCode)),
        "expected InvalidOrExpiredCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_never_issued_code() {
    let result = verify_usecase(MockOtpRepo::empty(), MockIdentityRepo::empty())
        .execute(verify_input("999999"))
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidOrExpiredCode)),
        "expected InvalidOrExpiredCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_code_issued_to_another_identifier() {
    let otps = MockOtpRepo::new(vec![OneTimeCode::issue(
        "someone@example.com",
        FIXED_CODE.to_owned(),
        Utc::now(),
    )]);

    let result = verify_usecase(otps, MockIdentityRepo::empty())
        .execute(verify_input(FIXED_CODE))
        .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidOrExpiredCode)));
}

#[tokio::test]
async fn should_reject_code_of_wrong_length() {
    for code in ["12345", "1234567", ""] {
        let result = verify_usecase(MockOtpRepo::empty(), MockIdentityRepo::empty())
            .execute(verify_input(code))
            .await;
        assert!(
            matches!(result, Err(AuthServiceError::MalformedCode)),
            "code {code:?}: expected MalformedCode, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_admin_role_request() {
    let otps = MockOtpRepo::new(vec![OneTimeCode::issue(
        TEST_EMAIL,
        FIXED_CODE.to_owned(),
        Utc::now(),
    )]);
    let mut input = verify_input(FIXED_CODE);
    input.role = Some(UserRole::SuperAdmin);

    let result = verify_usecase(otps.clone(), MockIdentityRepo::empty())
        .execute(input)
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::MalformedInput(_))),
        "expected MalformedInput, got {result:?}"
    );
    // The code stays redeemable.
    assert!(!otps.codes.lock().unwrap()[0].is_used);
}

#[tokio::test]
async fn should_reuse_existing_identity() {
    let existing = test_user(UserRole::Driver);
    let identities = MockIdentityRepo::new(vec![existing.clone()]);
    let otps = MockOtpRepo::new(vec![OneTimeCode::issue(
        TEST_EMAIL,
        FIXED_CODE.to_owned(),
        Utc::now(),
    )]);
    let mut input = verify_input(FIXED_CODE);
    input.role = Some(UserRole::GaragePartner);

    let out = verify_usecase(otps, identities.clone())
        .execute(input)
        .await
        .unwrap();

    assert!(!out.is_new_user);
    assert_eq!(out.user, existing);
    assert!(identities.created.lock().unwrap().is_empty());
    assert!(identities.role_profiles.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reuse_identity_created_by_concurrent_sign_in() {
    let identities = MockIdentityRepo::losing_create_race();
    let otps = MockOtpRepo::new(vec![OneTimeCode::issue(
        TEST_EMAIL,
        FIXED_CODE.to_owned(),
        Utc::now(),
    )]);
    let mut input = verify_input(FIXED_CODE);
    input.role = Some(UserRole::Driver);

    let out = verify_usecase(otps, identities.clone())
        .execute(input)
        .await
        .unwrap();

    assert!(!out.is_new_user);
    assert_eq!(out.user.email, TEST_EMAIL);
    assert_eq!(out.user.role, UserRole::Passenger);
    assert!(out.warnings.is_empty());
    assert!(identities.role_profiles.lock().unwrap().is_empty());
    let info = validate_access_token(&out.access.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, out.user.id);
}

#[tokio::test]
async fn should_create_driver_profile_for_new_driver() {
    let identities = MockIdentityRepo::empty();
    let otps = MockOtpRepo::new(vec![OneTimeCode::issue(
        TEST_EMAIL,
        FIXED_CODE.to_owned(),
        Utc::now(),
    )]);
    let mut input = verify_input(FIXED_CODE);
    input.role = Some(UserRole::Driver);
    input.full_name = Some("Ada Obi".to_owned());

    let out = verify_usecase(otps, identities.clone())
        .execute(input)
        .await
        .unwrap();

    assert!(out.is_new_user);
    assert_eq!(out.user.role, UserRole::Driver);
    assert_eq!(identities.created.lock().unwrap()[0].full_name, "Ada Obi");
    let profiles = identities.role_profiles.lock().unwrap().clone();
    assert_eq!(
        profiles,
        vec![(
            out.user.id,
            RoleProfile::Driver {
                experience_years: 0,
                background_check_status: "pending".to_owned(),
            }
        )]
    );
}

#[tokio::test]
async fn should_succeed_with_warning_when_role_profile_fails() {
    let otps = MockOtpRepo::new(vec![OneTimeCode::issue(
        TEST_EMAIL,
        FIXED_CODE.to_owned(),
        Utc::now(),
    )]);
    let mut input = verify_input(FIXED_CODE);
    input.role = Some(UserRole::AirlinePartner);

    let out = verify_usecase(otps, MockIdentityRepo::failing_role_profiles())
        .execute(input)
        .await
        .unwrap();

    assert!(out.is_new_user);
    assert_eq!(out.user.role, UserRole::AirlinePartner);
    assert_eq!(out.warnings, vec!["airline profile could not be created".to_owned()]);
}

#[tokio::test]
async fn should_pick_newest_matching_code() {
    let now = Utc::now();
    let older = OneTimeCode::issue(TEST_EMAIL, FIXED_CODE.to_owned(), now - Duration::minutes(2));
    let newer = OneTimeCode::issue(TEST_EMAIL, FIXED_CODE.to_owned(), now - Duration::minutes(1));
    let newer_id = newer.id;
    let otps = MockOtpRepo::new(vec![older, newer]);

    verify_usecase(otps.clone(), MockIdentityRepo::empty())
        .execute(verify_input(FIXED_CODE))
        .await
        .unwrap();

    let codes = otps.codes.lock().unwrap().clone();
    let used: Vec<_> = codes.iter().filter(|c| c.is_used).map(|c| c.id).collect();
    assert_eq!(used, vec![newer_id]);
}

#[tokio::test]
async fn should_carry_remember_me_into_refresh_token() {
    let otps = MockOtpRepo::new(vec![OneTimeCode::issue(
        TEST_EMAIL,
        FIXED_CODE.to_owned(),
        Utc::now(),
    )]);
    let mut input = verify_input(FIXED_CODE);
    input.remember_me = true;

    let out = verify_usecase(otps, MockIdentityRepo::empty())
        .execute(input)
        .await
        .unwrap();

    assert!(out.remember_me);
    let info = validate_refresh_token(&out.refresh.token, TEST_JWT_SECRET).unwrap();
    assert!(info.remember);
    assert!(out.refresh.exp > out.access.exp);
}
