//! Per-tenant `customers` table. The account's email addresses live on the
//! related `customer_contacts` rows.

use sea_orm::entity::prelude::*;

use crate::domain::model::{AccountStatus, CustomerAccount};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub password_hash: String,
    pub status: String,
    pub locked: bool,
    pub online: bool,
    pub last_activity: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customer_contact::Entity")]
    Contacts,
}

impl Related<super::customer_contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CustomerAccount {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            contact_person: model.contact_person,
            email: None,
            secret_hash: model.password_hash,
            status: AccountStatus::from_store(&model.status),
            locked: model.locked,
            online: model.online,
            last_activity: model.last_activity,
        }
    }
}
