use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter};
use waybill_db::TenantDbManager;

use crate::domain::error::AuthError;
use crate::domain::model::Principal;
use crate::domain::repo::LoginAudit;

use super::entity::login_history;

/// Login history inside each tenant database.
pub struct SeaOrmLoginAudit {
    manager: Arc<TenantDbManager>,
}

impl SeaOrmLoginAudit {
    #[must_use]
    pub fn new(manager: Arc<TenantDbManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl LoginAudit for SeaOrmLoginAudit {
    async fn open_session(&self, locator: &str, principal: &Principal) -> Result<i64, AuthError> {
        let db = self.manager.tenant(locator).await?;
        let record = login_history::ActiveModel {
            id: ActiveValue::NotSet,
            principal_id: ActiveValue::Set(principal.id()),
            variant: ActiveValue::Set(principal.kind().as_str().to_owned()),
            username: ActiveValue::Set(principal.login_name().to_owned()),
            status: ActiveValue::Set("open".to_owned()),
            logged_in_at: ActiveValue::Set(Utc::now()),
            logged_out_at: ActiveValue::Set(None),
        };
        let result = login_history::Entity::insert(record).exec(db.sea()).await?;
        Ok(result.last_insert_id)
    }

    async fn close_session(&self, locator: &str, session_id: i64) -> Result<(), AuthError> {
        let db = self.manager.tenant(locator).await?;
        login_history::Entity::update_many()
            .col_expr(login_history::Column::Status, Expr::value("closed"))
            .col_expr(
                login_history::Column::LoggedOutAt,
                Expr::value(Some(Utc::now())),
            )
            .filter(login_history::Column::Id.eq(session_id))
            .exec(db.sea())
            .await?;
        Ok(())
    }
}
