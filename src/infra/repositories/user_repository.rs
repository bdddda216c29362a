//! User repository.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Lookup by e-mail; callers pass the normalized address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Lookup by e-mail or username, whichever matches
    async fn find_by_login(&self, email_or_username: &str) -> AppResult<Option<User>>;

    /// Lookup by the stored SHA-256 hex of a reset token
    async fn find_by_reset_token(&self, token_hash: &str) -> AppResult<Option<User>>;

    /// Insert a new user. Duplicate username or e-mail fails with `Conflict`.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Write back every mutable field of `user`.
    async fn save(&self, user: &User) -> AppResult<User>;

    /// Point a user at the client profile it logs in for.
    async fn link_client(&self, user_id: Uuid, profile_id: Uuid) -> AppResult<()>;

    /// Hard delete; `NotFound` when no row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// All users, newest first.
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn assigned_json(ids: &[Uuid]) -> AppResult<serde_json::Value> {
    serde_json::to_value(ids).map_err(|e| AppError::internal(e.to_string()))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_login(&self, email_or_username: &str) -> AppResult<Option<User>> {
        let login = email_or_username.trim();
        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(login.to_lowercase()))
                    .add(user::Column::Username.eq(login.to_lowercase())),
            )
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_reset_token(&self, token_hash: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::ResetPasswordToken.eq(token_hash))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            name: Set(new_user.name),
            phone_number: Set(new_user.phone_number),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.to_string()),
            is_active: Set(true),
            client_id: Set(None),
            assigned_clients: Set(serde_json::json!([])),
            reset_password_token: Set(None),
            reset_password_expires: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "User"))?;
        Ok(User::from(model))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let existing = UserEntity::find_by_id(user.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.username = Set(user.username.clone());
        active.email = Set(user.email.clone());
        active.name = Set(user.name.clone());
        active.phone_number = Set(user.phone_number.clone());
        active.password_hash = Set(user.password_hash.clone());
        active.role = Set(user.role.to_string());
        active.is_active = Set(user.is_active);
        active.client_id = Set(user.client_id);
        active.assigned_clients = Set(assigned_json(&user.assigned_clients)?);
        active.reset_password_token = Set(user.reset_password_token.clone());
        active.reset_password_expires = Set(user.reset_password_expires);
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "User"))?;
        Ok(User::from(model))
    }

    async fn link_client(&self, user_id: Uuid, profile_id: Uuid) -> AppResult<()> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::ClientId, Expr::value(profile_id))
            .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
