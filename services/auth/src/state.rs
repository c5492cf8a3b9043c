use sea_orm::DatabaseConnection;

use crate::config::LoginCodeSettings;
use crate::infra::db::{DbLoginCodeRepository, DbUserRepository};
use crate::infra::sms::SmsDispatcher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sms: SmsDispatcher,
    pub login_code_settings: LoginCodeSettings,
    pub default_country_code: String,
    pub expose_code_in_response: bool,
    pub jwt_secret: String,
    pub cookie_domain: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn login_code_repo(&self) -> DbLoginCodeRepository {
        DbLoginCodeRepository {
            db: self.db.clone(),
        }
    }
}
