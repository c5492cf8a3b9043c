use chrono::{Duration, Utc};

use carehub_auth::domain::types::MAX_VERIFY_ATTEMPTS;
use carehub_auth::usecase::purge::PurgeLoginCodesUseCase;
use carehub_domain::phone::PhoneNumber;

use crate::helpers::{MockLoginCodeRepo, test_login_code, test_phone};

#[tokio::test]
async fn should_purge_expired_consumed_and_exhausted_codes_for_all_phones() {
    let phone = test_phone();
    let other = PhoneNumber::parse("+40722222222", "40").unwrap();

    let pending = test_login_code(&phone, "111111", Duration::seconds(30));
    let pending_id = pending.id;

    let mut expired = test_login_code(&other, "222222", Duration::minutes(6));
    expired.expires_at = Utc::now() - Duration::minutes(1);

    let mut consumed = test_login_code(&phone, "333333", Duration::minutes(2));
    consumed.consumed_at = Some(Utc::now() - Duration::minutes(1));

    let mut exhausted = test_login_code(&other, "444444", Duration::minutes(1));
    exhausted.attempts = MAX_VERIFY_ATTEMPTS;

    let repo = MockLoginCodeRepo::new(vec![pending, expired, consumed, exhausted]);
    let codes = repo.codes_handle();

    let uc = PurgeLoginCodesUseCase { login_codes: repo };
    let deleted = uc.execute().await.unwrap();

    assert_eq!(deleted, 3);
    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].id, pending_id);
}

#[tokio::test]
async fn should_report_zero_when_nothing_is_stale() {
    let repo = MockLoginCodeRepo::new(vec![test_login_code(
        &test_phone(),
        "111111",
        Duration::seconds(1),
    )]);
    let uc = PurgeLoginCodesUseCase { login_codes: repo };
    assert_eq!(uc.execute().await.unwrap(), 0);
}
