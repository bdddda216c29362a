//! DMAT account entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{DmatAccount, RenewalStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dmat_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub account_number: String,
    pub holder_name: String,
    pub expiry_date: DateTimeUtc,
    pub renewal_status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DmatAccount {
    fn from(model: Model) -> Self {
        DmatAccount {
            id: model.id,
            account_number: model.account_number,
            holder_name: model.holder_name,
            expiry_date: model.expiry_date,
            renewal_status: RenewalStatus::parse(&model.renewal_status).unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl ActiveModel {
    pub fn from_domain(account: &DmatAccount) -> Self {
        Self {
            id: Set(account.id),
            account_number: Set(account.account_number.clone()),
            holder_name: Set(account.holder_name.clone()),
            expiry_date: Set(account.expiry_date),
            renewal_status: Set(account.renewal_status.as_str().to_string()),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
        }
    }
}
