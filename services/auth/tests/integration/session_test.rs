use chrono::Duration;

use carehub_auth::error::AuthServiceError;
use carehub_auth::usecase::session::{
    LoginWithPhoneCodeInput, LoginWithPhoneCodeUseCase, issue_session_token,
};
use carehub_auth_types::token::validate_session_token;

use crate::helpers::{
    MockLoginCodeRepo, MockUserRepo, TEST_JWT_SECRET, test_login_code, test_phone, test_settings,
    test_user,
};

fn login(code: &str) -> LoginWithPhoneCodeInput {
    LoginWithPhoneCodeInput {
        phone: test_phone(),
        code: code.to_owned(),
    }
}

#[tokio::test]
async fn should_issue_session_token_that_validates() {
    let user = test_user();
    let (token, exp) = issue_session_token(&user, TEST_JWT_SECRET).unwrap();

    let info = validate_session_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id.0);
    assert_eq!(info.user_role, user.role);
    assert_eq!(info.session_exp, exp);
}

#[tokio::test]
async fn should_log_in_known_user_with_valid_code() {
    let user = test_user();
    let repo = MockLoginCodeRepo::new(vec![test_login_code(
        &user.phone,
        "482913",
        Duration::seconds(5),
    )]);
    let codes = repo.codes_handle();

    let uc = LoginWithPhoneCodeUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        login_codes: repo,
        settings: test_settings(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let output = uc.execute(login("482913")).await.unwrap();

    assert_eq!(output.user.id, user.id);
    let info = validate_session_token(&output.session_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id.0);
    assert!(codes.lock().unwrap()[0].consumed_at.is_some());
}

#[tokio::test]
async fn should_reject_wrong_code_as_invalid_login_code() {
    let user = test_user();
    let uc = LoginWithPhoneCodeUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        login_codes: MockLoginCodeRepo::new(vec![test_login_code(
            &user.phone,
            "482913",
            Duration::seconds(5),
        )]),
        settings: test_settings(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc.execute(login("000000")).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidLoginCode)),
        "expected InvalidLoginCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_phone_like_wrong_code() {
    let uc = LoginWithPhoneCodeUseCase {
        users: MockUserRepo::empty(),
        login_codes: MockLoginCodeRepo::new(vec![test_login_code(
            &test_phone(),
            "482913",
            Duration::seconds(5),
        )]),
        settings: test_settings(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc.execute(login("482913")).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidLoginCode)),
        "expected InvalidLoginCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_propagate_malformed_code_as_validation_error() {
    let uc = LoginWithPhoneCodeUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        login_codes: MockLoginCodeRepo::empty(),
        settings: test_settings(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = uc.execute(login("12ab")).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCode)));
}
