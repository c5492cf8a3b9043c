use axum::http::StatusCode;

use carehub_auth::error::AuthServiceError;
use carehub_auth::handlers::login_code::issue_login_code;
use carehub_auth::usecase::issue::{IssueLoginCodeInput, IssueLoginCodeUseCase};

use crate::helpers::{MockCodeSender, MockLoginCodeRepo, test_phone, test_settings};

fn input() -> IssueLoginCodeInput {
    IssueLoginCodeInput {
        phone: test_phone(),
        requester_ip: Some("203.0.113.9".to_owned()),
    }
}

fn usecase(sender: MockCodeSender) -> IssueLoginCodeUseCase<MockLoginCodeRepo, MockCodeSender> {
    IssueLoginCodeUseCase {
        login_codes: MockLoginCodeRepo::empty(),
        sender,
        settings: test_settings(),
    }
}

#[tokio::test]
async fn should_respond_created_without_code_by_default() {
    let uc = usecase(MockCodeSender::default());

    let (status, body) = issue_login_code(&uc, input(), false).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let json = serde_json::to_value(&body.0).unwrap();
    assert!(json["expires_at"].is_string());
    assert!(json.get("code").is_none());
}

#[tokio::test]
async fn should_include_sent_code_when_exposed() {
    let sender = MockCodeSender::default();
    let sent = sender.sent_handle();
    let uc = usecase(sender);

    let (status, body) = issue_login_code(&uc, input(), true).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let json = serde_json::to_value(&body.0).unwrap();
    assert_eq!(json["code"], sent.lock().unwrap()[0].1.as_str());
}

#[tokio::test]
async fn should_surface_cooldown_on_second_request() {
    let uc = usecase(MockCodeSender::default());
    issue_login_code(&uc, input(), false).await.unwrap();

    let result = issue_login_code(&uc, input(), false).await;
    assert!(
        matches!(result, Err(AuthServiceError::Cooldown { .. })),
        "expected Cooldown"
    );
}
