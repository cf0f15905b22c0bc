use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};
use waybill_db::TenantDbManager;

use crate::domain::error::AuthError;
use crate::domain::model::{CustomerAccount, PrincipalKind, StaffAccount};
use crate::domain::repo::PrincipalStore;

use super::entity::{customer, customer_contact, staff};

/// Account lookups inside one tenant database, addressed by store locator.
pub struct SeaOrmPrincipalStore {
    manager: Arc<TenantDbManager>,
}

impl SeaOrmPrincipalStore {
    #[must_use]
    pub fn new(manager: Arc<TenantDbManager>) -> Self {
        Self { manager }
    }
}

fn lower_eq<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).eq(needle)
}

#[async_trait]
impl PrincipalStore for SeaOrmPrincipalStore {
    async fn find_staff_by_identifier(
        &self,
        locator: &str,
        identifier: &str,
    ) -> Result<Option<StaffAccount>, AuthError> {
        let db = self.manager.tenant(locator).await?;
        let needle = identifier.to_lowercase();
        let row = staff::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_eq(staff::Column::Username, &needle))
                    .add(lower_eq(staff::Column::Email, &needle)),
            )
            .one(db.sea())
            .await?;
        Ok(row.map(StaffAccount::from))
    }

    async fn find_customers_by_identifier(
        &self,
        locator: &str,
        identifier: &str,
    ) -> Result<Vec<CustomerAccount>, AuthError> {
        let db = self.manager.tenant(locator).await?;
        let needle = identifier.to_lowercase();

        let mut matched: BTreeMap<i64, customer::Model> = customer::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_eq(customer::Column::Name, &needle))
                    .add(lower_eq(customer::Column::ContactPerson, &needle)),
            )
            .all(db.sea())
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        // The identifier may also be one of the customer's contact emails.
        let contact_hits = customer_contact::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_eq(customer_contact::Column::Email, &needle))
                    .add(lower_eq(customer_contact::Column::SecondaryEmail, &needle)),
            )
            .all(db.sea())
            .await?;
        let missing_ids: Vec<i64> = contact_hits
            .iter()
            .map(|contact| contact.customer_id)
            .filter(|id| !matched.contains_key(id))
            .collect();
        if !missing_ids.is_empty() {
            let extra = customer::Entity::find()
                .filter(customer::Column::Id.is_in(missing_ids))
                .all(db.sea())
                .await?;
            for model in extra {
                matched.insert(model.id, model);
            }
        }
        if matched.is_empty() {
            return Ok(Vec::new());
        }

        // Denormalize each account's primary email from its contact rows.
        let ids: Vec<i64> = matched.keys().copied().collect();
        let mut emails: HashMap<i64, String> = HashMap::new();
        let contacts = customer_contact::Entity::find()
            .filter(customer_contact::Column::CustomerId.is_in(ids))
            .all(db.sea())
            .await?;
        for contact in contacts {
            if let Some(email) = contact.email.or(contact.secondary_email) {
                emails.entry(contact.customer_id).or_insert(email);
            }
        }

        Ok(matched
            .into_values()
            .map(|model| {
                let mut account = CustomerAccount::from(model);
                account.email = emails.get(&account.id).cloned();
                account
            })
            .collect())
    }

    async fn find_staff_by_id(
        &self,
        locator: &str,
        id: i64,
    ) -> Result<Option<StaffAccount>, AuthError> {
        let db = self.manager.tenant(locator).await?;
        Ok(staff::Entity::find_by_id(id)
            .one(db.sea())
            .await?
            .map(StaffAccount::from))
    }

    async fn find_customer_by_id(
        &self,
        locator: &str,
        id: i64,
    ) -> Result<Option<CustomerAccount>, AuthError> {
        let db = self.manager.tenant(locator).await?;
        let Some(model) = customer::Entity::find_by_id(id).one(db.sea()).await? else {
            return Ok(None);
        };
        let contact = customer_contact::Entity::find()
            .filter(customer_contact::Column::CustomerId.eq(id))
            .one(db.sea())
            .await?;
        let mut account = CustomerAccount::from(model);
        account.email = contact.and_then(|c| c.email.or(c.secondary_email));
        Ok(Some(account))
    }

    async fn set_presence(
        &self,
        locator: &str,
        kind: PrincipalKind,
        id: i64,
        online: bool,
    ) -> Result<(), AuthError> {
        let db = self.manager.tenant(locator).await?;
        match kind {
            PrincipalKind::Staff => {
                let mut update = staff::Entity::update_many()
                    .col_expr(staff::Column::Online, Expr::value(online))
                    .filter(staff::Column::Id.eq(id));
                if online {
                    update = update.col_expr(staff::Column::LastActivity, Expr::value(Utc::now()));
                }
                update.exec(db.sea()).await?;
            }
            PrincipalKind::Customer => {
                let mut update = customer::Entity::update_many()
                    .col_expr(customer::Column::Online, Expr::value(online))
                    .filter(customer::Column::Id.eq(id));
                if online {
                    update =
                        update.col_expr(customer::Column::LastActivity, Expr::value(Utc::now()));
                }
                update.exec(db.sea()).await?;
            }
        }
        Ok(())
    }

    async fn touch_last_activity(
        &self,
        locator: &str,
        kind: PrincipalKind,
        id: i64,
    ) -> Result<(), AuthError> {
        let db = self.manager.tenant(locator).await?;
        match kind {
            PrincipalKind::Staff => {
                staff::Entity::update_many()
                    .col_expr(staff::Column::LastActivity, Expr::value(Utc::now()))
                    .filter(staff::Column::Id.eq(id))
                    .exec(db.sea())
                    .await?;
            }
            PrincipalKind::Customer => {
                customer::Entity::update_many()
                    .col_expr(customer::Column::LastActivity, Expr::value(Utc::now()))
                    .filter(customer::Column::Id.eq(id))
                    .exec(db.sea())
                    .await?;
            }
        }
        Ok(())
    }
}
