//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::user::normalize_email;
use crate::domain::{NewUser, Password, UpdateUser, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
///
/// `actor` is the authenticated caller; admins may act on anyone, other
/// users only on themselves.
#[async_trait]
pub trait UserService: Send + Sync {
    /// All users, newest first (admin only)
    async fn list_users(&self, actor: &User) -> AppResult<Vec<User>>;

    async fn get_user(&self, actor: &User, id: Uuid) -> AppResult<User>;

    /// Role, activation and assignments are admin-only fields.
    async fn update_user(&self, actor: &User, id: Uuid, update: UpdateUser) -> AppResult<User>;

    /// Set a new password for someone else (admin only)
    async fn reset_user_password(&self, actor: &User, id: Uuid, new_password: &str)
        -> AppResult<()>;

    /// Hard delete (admin only). Profiles are left untouched.
    async fn delete_user(&self, actor: &User, id: Uuid) -> AppResult<()>;

    /// Create an admin unless the e-mail is taken. Returns the user and
    /// whether it was created.
    async fn ensure_admin(
        &self,
        email: &str,
        username: &str,
        name: &str,
        password: &str,
    ) -> AppResult<(User, bool)>;
}

fn require_admin(actor: &User) -> AppResult<()> {
    if actor.is_admin() && actor.is_active {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn require_self_or_admin(actor: &User, id: Uuid) -> AppResult<()> {
    if actor.id == id && actor.is_active {
        return Ok(());
    }
    require_admin(actor)
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self, actor: &User) -> AppResult<Vec<User>> {
        require_admin(actor)?;
        self.uow.users().list().await
    }

    async fn get_user(&self, actor: &User, id: Uuid) -> AppResult<User> {
        require_self_or_admin(actor, id)?;
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_user(&self, actor: &User, id: Uuid, update: UpdateUser) -> AppResult<User> {
        require_self_or_admin(actor, id)?;
        if update.touches_privileged_fields() {
            require_admin(actor)?;
        }

        let users = self.uow.users();
        let mut user = users.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Name is required"));
            }
            user.name = name;
        }
        if let Some(email) = update.email {
            let email = normalize_email(&email);
            if email.is_empty() {
                return Err(AppError::validation("Email is required"));
            }
            if email != user.email && users.find_by_email(&email).await?.is_some() {
                return Err(AppError::validation("Email already registered"));
            }
            user.email = email;
        }
        if let Some(phone) = update.phone_number {
            let phone = phone.trim().to_string();
            user.phone_number = (!phone.is_empty()).then_some(phone);
        }
        if let Some(role) = update.role {
            user.role = UserRole::parse(&role)?;
        }
        if let Some(active) = update.is_active {
            user.is_active = active;
        }
        if let Some(assigned) = update.assigned_clients {
            user.assigned_clients = assigned;
        }

        let saved = users.save(&user).await?;
        tracing::info!(user_id = %saved.id, by = %actor.id, "user updated");
        Ok(saved)
    }

    async fn reset_user_password(
        &self,
        actor: &User,
        id: Uuid,
        new_password: &str,
    ) -> AppResult<()> {
        require_admin(actor)?;

        let users = self.uow.users();
        let mut user = users.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        user.set_password_hash(Password::new(new_password)?.into_string());
        users.save(&user).await?;

        tracing::info!(user_id = %id, by = %actor.id, "password reset by admin");
        Ok(())
    }

    async fn delete_user(&self, actor: &User, id: Uuid) -> AppResult<()> {
        require_admin(actor)?;
        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, by = %actor.id, "user deleted");
        Ok(())
    }

    async fn ensure_admin(
        &self,
        email: &str,
        username: &str,
        name: &str,
        password: &str,
    ) -> AppResult<(User, bool)> {
        let users = self.uow.users();
        let email = normalize_email(email);

        if let Some(existing) = users.find_by_email(&email).await? {
            return Ok((existing, false));
        }

        let user = users
            .create(NewUser {
                username: username.trim().to_lowercase(),
                email,
                name: name.trim().to_string(),
                phone_number: None,
                password_hash: Password::new(password)?.into_string(),
                role: UserRole::Admin,
            })
            .await?;
        Ok((user, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        DmatRepository, MockUserRepository, ProfileRepository, UserRepository,
    };
    use chrono::Utc;

    struct UsersOnly(Arc<MockUserRepository>);

    impl UnitOfWork for UsersOnly {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.0.clone()
        }

        fn profiles(&self) -> Arc<dyn ProfileRepository> {
            unreachable!("profiles are not used by the user service")
        }

        fn dmat_accounts(&self) -> Arc<dyn DmatRepository> {
            unreachable!("dmat accounts are not used by the user service")
        }
    }

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: format!("{}user", role),
            email: format!("{}@example.com", role),
            name: "Someone".into(),
            phone_number: None,
            password_hash: String::new(),
            role,
            is_active: true,
            client_id: None,
            assigned_clients: vec![],
            reset_password_token: None,
            reset_password_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(mock: MockUserRepository) -> UserManager<UsersOnly> {
        UserManager::new(Arc::new(UsersOnly(Arc::new(mock))))
    }

    #[tokio::test]
    async fn test_list_requires_admin() {
        let mut mock = MockUserRepository::new();
        mock.expect_list().returning(|| Ok(vec![]));
        let svc = service(mock);

        assert!(svc.list_users(&user(UserRole::Admin)).await.is_ok());
        assert!(matches!(
            svc.list_users(&user(UserRole::Employee)).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_self_cannot_change_role() {
        let me = user(UserRole::Client);
        let svc = service(MockUserRepository::new());
        let update = UpdateUser {
            role: Some("admin".into()),
            ..Default::default()
        };

        let err = svc.update_user(&me, me.id, update).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_self_can_change_name() {
        let me = user(UserRole::Client);
        let stored = me.clone();
        let mut mock = MockUserRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        mock.expect_save().returning(|u| Ok(u.clone()));
        let svc = service(mock);

        let update = UpdateUser {
            name: Some("  New Name ".into()),
            ..Default::default()
        };
        let saved = svc.update_user(&me, me.id, update).await.unwrap();
        assert_eq!(saved.name, "New Name");
    }

    #[tokio::test]
    async fn test_other_user_is_forbidden() {
        let me = user(UserRole::Employee);
        let svc = service(MockUserRepository::new());
        assert!(matches!(
            svc.get_user(&me, Uuid::new_v4()).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let existing = user(UserRole::Admin);
        let mut mock = MockUserRepository::new();
        mock.expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        mock.expect_create().never();
        let svc = service(mock);

        let (_, created) = svc
            .ensure_admin("Admin@Example.com", "admin", "Admin", "secret123")
            .await
            .unwrap();
        assert!(!created);
    }
}
