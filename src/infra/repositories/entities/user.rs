//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub client_id: Option<Uuid>,
    /// JSON array of profile ids
    #[sea_orm(column_type = "JsonBinary")]
    pub assigned_clients: Json,
    pub reset_password_token: Option<String>,
    pub reset_password_expires: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        let assigned_clients =
            serde_json::from_value(model.assigned_clients).unwrap_or_else(|e| {
                tracing::warn!(user_id = %model.id, error = %e, "unreadable assigned_clients");
                Vec::new()
            });

        User {
            id: model.id,
            username: model.username,
            email: model.email,
            name: model.name,
            phone_number: model.phone_number,
            password_hash: model.password_hash,
            role: UserRole::from(model.role.as_str()),
            is_active: model.is_active,
            client_id: model.client_id,
            assigned_clients,
            reset_password_token: model.reset_password_token,
            reset_password_expires: model.reset_password_expires,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
