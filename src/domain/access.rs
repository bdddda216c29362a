//! Role-based access rules for client profiles.
//!
//! Authentication happens earlier; these checks only decide whether a
//! known user may act on a given profile.

use uuid::Uuid;

use super::user::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// What the caller wants to do with a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    View,
    Create,
    Update,
    Delete,
    Review,
}

/// Allow or refuse `actor` acting on `target`.
///
/// Admins may do anything. Clients reach only their own profile and
/// employees only the profiles assigned to them. Creation has no target,
/// so only admins create.
pub fn authorize(actor: Option<&User>, action: ProfileAction, target: Option<Uuid>) -> AppResult<()> {
    let actor = actor.ok_or(AppError::Forbidden)?;
    if !actor.is_active {
        return Err(AppError::Forbidden);
    }

    let allowed = match (actor.role, target) {
        (UserRole::Admin, _) => true,
        (UserRole::Client, Some(id)) => actor.client_id == Some(id),
        (UserRole::Employee, Some(id)) => actor.is_assigned_to(id),
        (_, None) => false,
    };

    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %actor.id,
            role = %actor.role,
            ?action,
            ?target,
            "profile access denied"
        );
        Err(AppError::Forbidden)
    }
}

/// Which profiles a listing may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileScope {
    All,
    Only(Vec<Uuid>),
}

impl ProfileScope {
    /// Listing scope for an actor. Inactive users see nothing.
    pub fn for_actor(actor: &User) -> Self {
        if !actor.is_active {
            return ProfileScope::Only(Vec::new());
        }
        match actor.role {
            UserRole::Admin => ProfileScope::All,
            UserRole::Employee => ProfileScope::Only(actor.assigned_clients.clone()),
            UserRole::Client => ProfileScope::Only(actor.client_id.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "u".into(),
            email: "u@example.com".into(),
            name: "U".into(),
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

    #[test]
    fn test_admin_always_allowed() {
        let admin = user(UserRole::Admin);
        assert!(authorize(Some(&admin), ProfileAction::Create, None).is_ok());
        assert!(authorize(Some(&admin), ProfileAction::Delete, Some(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn test_client_only_own_profile() {
        let own = Uuid::new_v4();
        let mut client = user(UserRole::Client);
        client.client_id = Some(own);

        assert!(authorize(Some(&client), ProfileAction::View, Some(own)).is_ok());
        assert!(matches!(
            authorize(Some(&client), ProfileAction::View, Some(Uuid::new_v4())),
            Err(AppError::Forbidden)
        ));
        assert!(authorize(Some(&client), ProfileAction::Create, None).is_err());
    }

    #[test]
    fn test_employee_needs_assignment() {
        let target = Uuid::new_v4();
        let mut employee = user(UserRole::Employee);
        assert!(authorize(Some(&employee), ProfileAction::Update, Some(target)).is_err());

        employee.assigned_clients.push(target);
        assert!(authorize(Some(&employee), ProfileAction::Update, Some(target)).is_ok());
    }

    #[test]
    fn test_missing_or_inactive_actor_forbidden() {
        assert!(matches!(
            authorize(None, ProfileAction::View, Some(Uuid::new_v4())),
            Err(AppError::Forbidden)
        ));

        let mut admin = user(UserRole::Admin);
        admin.is_active = false;
        assert!(authorize(Some(&admin), ProfileAction::View, None).is_err());
    }

    #[test]
    fn test_scope_for_roles() {
        let id = Uuid::new_v4();
        let mut client = user(UserRole::Client);
        client.client_id = Some(id);
        assert_eq!(ProfileScope::for_actor(&client), ProfileScope::Only(vec![id]));
        assert_eq!(ProfileScope::for_actor(&user(UserRole::Admin)), ProfileScope::All);
        assert_eq!(
            ProfileScope::for_actor(&user(UserRole::Employee)),
            ProfileScope::Only(Vec::new())
        );
    }
}
