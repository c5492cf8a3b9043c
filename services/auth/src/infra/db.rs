use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use carehub_auth_schema::{login_codes, users};
use carehub_domain::id::{LoginCodeId, UserId};
use carehub_domain::phone::PhoneNumber;
use carehub_domain::user::StaffRole;

use crate::domain::repository::{LoginCodeRepository, UserRepository};
use crate::domain::types::{AuthUser, LoginCode};
use crate::error::AuthServiceError;

// ── LoginCode repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLoginCodeRepository {
    pub db: DatabaseConnection,
}

impl LoginCodeRepository for DbLoginCodeRepository {
    async fn count_created_since(
        &self,
        phone: &PhoneNumber,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        let count = login_codes::Entity::find()
            .filter(login_codes::Column::Phone.eq(phone.as_str()))
            .filter(login_codes::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .context("count recent login codes")?;
        Ok(count)
    }

    async fn find_latest(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<LoginCode>, AuthServiceError> {
        let model = login_codes::Entity::find()
            .filter(login_codes::Column::Phone.eq(phone.as_str()))
            .order_by_desc(login_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest login code")?;
        Ok(model.map(login_code_from_model))
    }

    async fn find_active(
        &self,
        phone: &PhoneNumber,
        now: DateTime<Utc>,
    ) -> Result<Option<LoginCode>, AuthServiceError> {
        let model = login_codes::Entity::find()
            .filter(login_codes::Column::Phone.eq(phone.as_str()))
            .filter(login_codes::Column::ConsumedAt.is_null())
            .filter(login_codes::Column::ExpiresAt.gt(now))
            .order_by_desc(login_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find active login code")?;
        Ok(model.map(login_code_from_model))
    }

    async fn create(&self, code: &LoginCode) -> Result<(), AuthServiceError> {
        login_codes::ActiveModel {
            id: Set(code.id.0),
            phone: Set(code.phone.as_str().to_owned()),
            code_hash: Set(code.code_hash.clone()),
            expires_at: Set(code.expires_at),
            consumed_at: Set(code.consumed_at),
            attempts: Set(code.attempts),
            requester_ip: Set(code.requester_ip.clone()),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("create login code")?;
        Ok(())
    }

    async fn record_failed_attempt(&self, id: LoginCodeId) -> Result<(), AuthServiceError> {
        login_codes::Entity::update_many()
            .col_expr(
                login_codes::Column::Attempts,
                Expr::col(login_codes::Column::Attempts).add(1),
            )
            .filter(login_codes::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("record failed login code attempt")?;
        Ok(())
    }

    async fn mark_consumed(
        &self,
        id: LoginCodeId,
        now: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        login_codes::Entity::update_many()
            .col_expr(login_codes::Column::ConsumedAt, Expr::value(now))
            .col_expr(
                login_codes::Column::Attempts,
                Expr::col(login_codes::Column::Attempts).add(1),
            )
            .filter(login_codes::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("mark login code consumed")?;
        Ok(())
    }

    async fn delete_stale(
        &self,
        now: DateTime<Utc>,
        max_attempts: i32,
    ) -> Result<u64, AuthServiceError> {
        let result = login_codes::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(login_codes::Column::ExpiresAt.lte(now))
                    .add(login_codes::Column::ConsumedAt.is_not_null())
                    .add(login_codes::Column::Attempts.gte(max_attempts)),
            )
            .exec(&self.db)
            .await
            .context("delete stale login codes")?;
        Ok(result.rows_affected)
    }
}

fn login_code_from_model(model: login_codes::Model) -> LoginCode {
    LoginCode {
        id: LoginCodeId(model.id),
        phone: PhoneNumber::from_normalized(model.phone),
        code_hash: model.code_hash,
        expires_at: model.expires_at,
        consumed_at: model.consumed_at,
        attempts: model.attempts,
        requester_ip: model.requester_ip,
        created_at: model.created_at,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Phone.eq(phone.as_str()))
            .one(&self.db)
            .await
            .context("find user by phone")?;
        model.map(user_from_model).transpose()
    }
}

fn user_from_model(model: users::Model) -> Result<AuthUser, AuthServiceError> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(StaffRole::from_u8)
        .ok_or_else(|| anyhow::anyhow!("unknown staff role: {}", model.role))?;
    Ok(AuthUser {
        id: UserId(model.id),
        phone: PhoneNumber::from_normalized(model.phone),
        role: role.as_u8(),
    })
}
