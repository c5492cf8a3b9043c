use std::net::SocketAddr;
use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use carehub_auth::config::{AuthConfig, LoginCodeSettings};
use carehub_auth::infra::db::DbLoginCodeRepository;
use carehub_auth::infra::sms::SmsDispatcher;
use carehub_auth::router::build_router;
use carehub_auth::state::AppState;
use carehub_auth::usecase::purge::PurgeLoginCodesUseCase;
use carehub_core::config::Config;
use carehub_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();
    config.validate().expect("invalid configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let sms = SmsDispatcher::from_config(&config).expect("invalid SMS gateway configuration");

    if let Some(secs) = config.login_code_purge_interval_secs.filter(|s| *s > 0) {
        let purge = PurgeLoginCodesUseCase {
            login_codes: DbLoginCodeRepository { db: db.clone() },
        };
        info!(interval_secs = secs, "starting login code purge task");
        tokio::spawn(async move { purge.run_periodic(Duration::from_secs(secs)).await });
    }

    let state = AppState {
        db,
        sms,
        login_code_settings: LoginCodeSettings::from(&config),
        default_country_code: config.default_country_code.clone(),
        expose_code_in_response: config.login_code_expose_in_response,
        jwt_secret: config.jwt_secret.clone(),
        cookie_domain: config.cookie_domain.clone(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
