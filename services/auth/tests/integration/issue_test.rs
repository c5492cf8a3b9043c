use chrono::{Duration, Utc};

use carehub_auth::config::LoginCodeSettings;
use carehub_auth::domain::code_hash::hash_code;
use carehub_auth::error::AuthServiceError;
use carehub_auth::usecase::issue::{IssueLoginCodeInput, IssueLoginCodeUseCase};
use carehub_domain::phone::PhoneNumber;

use crate::helpers::{
    MockCodeSender, MockLoginCodeRepo, TEST_LOGIN_CODE_SECRET, test_login_code, test_phone,
    test_settings,
};

fn input() -> IssueLoginCodeInput {
    IssueLoginCodeInput {
        phone: test_phone(),
        requester_ip: Some("203.0.113.9".to_owned()),
    }
}

#[tokio::test]
async fn should_issue_code_and_store_only_its_hash() {
    let repo = MockLoginCodeRepo::empty();
    let codes = repo.codes_handle();
    let sender = MockCodeSender::default();
    let sent = sender.sent_handle();

    let uc = IssueLoginCodeUseCase {
        login_codes: repo,
        sender,
        settings: test_settings(),
    };
    let before = Utc::now();
    let issued = uc.execute(input()).await.unwrap();

    assert_eq!(issued.code.len(), 6);
    assert!(issued.code.bytes().all(|b| b.is_ascii_digit()));
    let ttl = issued.expires_at - before;
    assert!(ttl > Duration::seconds(299) && ttl <= Duration::seconds(301), "ttl {ttl}");

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1, "expected exactly one login code to be stored");
    let stored = &codes[0];
    assert_eq!(stored.phone, test_phone());
    assert_ne!(stored.code_hash, issued.code);
    assert_eq!(
        stored.code_hash,
        hash_code(TEST_LOGIN_CODE_SECRET, &test_phone(), &issued.code)
    );
    assert_eq!(stored.attempts, 0);
    assert!(stored.consumed_at.is_none());
    assert_eq!(stored.requester_ip.as_deref(), Some("203.0.113.9"));
    assert_eq!(stored.expires_at, issued.expires_at);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.as_slice(), &[(test_phone(), issued.code.clone())]);
}

#[tokio::test]
async fn should_use_configured_ttl() {
    let uc = IssueLoginCodeUseCase {
        login_codes: MockLoginCodeRepo::empty(),
        sender: MockCodeSender::default(),
        settings: LoginCodeSettings::new(TEST_LOGIN_CODE_SECRET, 15),
    };
    let before = Utc::now();
    let issued = uc.execute(input()).await.unwrap();
    let ttl = issued.expires_at - before;
    assert!(ttl > Duration::minutes(14) && ttl <= Duration::minutes(15) + Duration::seconds(1));
}

#[tokio::test]
async fn should_reject_second_code_within_cooldown() {
    let uc = IssueLoginCodeUseCase {
        login_codes: MockLoginCodeRepo::empty(),
        sender: MockCodeSender::default(),
        settings: test_settings(),
    };

    uc.execute(input()).await.unwrap();
    let result = uc.execute(input()).await;

    match result {
        Err(AuthServiceError::Cooldown { retry_after_secs }) => {
            assert!((59..=60).contains(&retry_after_secs), "got {retry_after_secs}");
        }
        other => panic!("expected Cooldown, got {other:?}"),
    }
}

#[tokio::test]
async fn should_report_remaining_cooldown_seconds() {
    let phone = test_phone();
    let repo = MockLoginCodeRepo::new(vec![test_login_code(
        &phone,
        "111111",
        Duration::seconds(45),
    )]);

    let uc = IssueLoginCodeUseCase {
        login_codes: repo,
        sender: MockCodeSender::default(),
        settings: test_settings(),
    };
    let result = uc.execute(input()).await;

    match result {
        Err(AuthServiceError::Cooldown { retry_after_secs }) => {
            assert!((14..=15).contains(&retry_after_secs), "got {retry_after_secs}");
        }
        other => panic!("expected Cooldown, got {other:?}"),
    }
}

#[tokio::test]
async fn should_allow_new_code_after_cooldown() {
    let phone = test_phone();
    let repo = MockLoginCodeRepo::new(vec![test_login_code(
        &phone,
        "111111",
        Duration::seconds(61),
    )]);
    let codes = repo.codes_handle();

    let uc = IssueLoginCodeUseCase {
        login_codes: repo,
        sender: MockCodeSender::default(),
        settings: test_settings(),
    };
    uc.execute(input()).await.unwrap();
    assert_eq!(codes.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_rate_limit_sixth_code_within_window() {
    let phone = test_phone();
    let prior = (0..5)
        .map(|i| test_login_code(&phone, "111111", Duration::minutes(2 + i * 2)))
        .collect();
    let repo = MockLoginCodeRepo::new(prior);
    let codes = repo.codes_handle();

    let uc = IssueLoginCodeUseCase {
        login_codes: repo,
        sender: MockCodeSender::default(),
        settings: test_settings(),
    };
    let result = uc.execute(input()).await;

    assert!(
        matches!(result, Err(AuthServiceError::RateLimited)),
        "expected RateLimited, got {result:?}"
    );
    assert_eq!(codes.lock().unwrap().len(), 5, "no code should be stored");
}

#[tokio::test]
async fn should_count_consumed_codes_toward_rate_limit() {
    let phone = test_phone();
    let prior = (0..5)
        .map(|i| {
            let mut code = test_login_code(&phone, "111111", Duration::minutes(2 + i));
            code.consumed_at = Some(Utc::now());
            code
        })
        .collect();

    let uc = IssueLoginCodeUseCase {
        login_codes: MockLoginCodeRepo::new(prior),
        sender: MockCodeSender::default(),
        settings: test_settings(),
    };
    let result = uc.execute(input()).await;
    assert!(matches!(result, Err(AuthServiceError::RateLimited)));
}

#[tokio::test]
async fn should_ignore_codes_outside_rate_limit_window() {
    let phone = test_phone();
    let prior = (0..5)
        .map(|i| test_login_code(&phone, "111111", Duration::minutes(16 + i)))
        .collect();

    let uc = IssueLoginCodeUseCase {
        login_codes: MockLoginCodeRepo::new(prior),
        sender: MockCodeSender::default(),
        settings: test_settings(),
    };
    uc.execute(input()).await.unwrap();
}

#[tokio::test]
async fn should_scope_limits_to_phone_number() {
    let other = PhoneNumber::parse("+40722222222", "40").unwrap();
    let prior = (0..5)
        .map(|i| test_login_code(&other, "111111", Duration::seconds(10 + i)))
        .collect();

    let uc = IssueLoginCodeUseCase {
        login_codes: MockLoginCodeRepo::new(prior),
        sender: MockCodeSender::default(),
        settings: test_settings(),
    };
    uc.execute(input()).await.unwrap();
}

#[tokio::test]
async fn should_not_purge_stale_codes_while_issuing() {
    let phone = test_phone();
    let mut stale = test_login_code(&phone, "111111", Duration::minutes(10));
    stale.consumed_at = Some(Utc::now() - Duration::minutes(9));
    let repo = MockLoginCodeRepo::new(vec![stale]);
    let codes = repo.codes_handle();

    let uc = IssueLoginCodeUseCase {
        login_codes: repo,
        sender: MockCodeSender::default(),
        settings: test_settings(),
    };
    uc.execute(input()).await.unwrap();
    assert_eq!(codes.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_surface_dispatch_failure_as_internal() {
    let uc = IssueLoginCodeUseCase {
        login_codes: MockLoginCodeRepo::empty(),
        sender: MockCodeSender::failing(),
        settings: test_settings(),
    };
    let result = uc.execute(input()).await;
    assert!(
        matches!(result, Err(AuthServiceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
}
