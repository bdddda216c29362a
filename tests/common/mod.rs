//! In-memory doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{DbErr, RuntimeErr};
use uuid::Uuid;

use share_registry::domain::{
    ClientProfile, DmatAccount, NewUser, Password, ProfileScope, User, UserRole,
};
use share_registry::errors::{AppError, AppResult};
use share_registry::infra::{
    DmatRepository, Email, EmailSender, ProfileFilter, ProfileRepository, StorageProbe,
    UnitOfWork, UserRepository,
};
use share_registry::types::PaginationParams;
use share_registry::Config;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub fn test_config() -> Config {
    Config::with_secret(TEST_SECRET)
}

fn page<T: Clone>(items: &[T], pagination: &PaginationParams) -> Vec<T> {
    items
        .iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .cloned()
        .collect()
}

fn in_scope(scope: &ProfileScope, id: Uuid) -> bool {
    match scope {
        ProfileScope::All => true,
        ProfileScope::Only(ids) => ids.contains(&id),
    }
}

/// Same rule as the SQL search: case-insensitive substring of the primary
/// name, the PAN or any holding's company name.
fn matches_query(profile: &ClientProfile, query: &str) -> bool {
    let needle = query.to_lowercase();
    let hit = |s: &str| s.to_lowercase().contains(&needle);
    hit(&profile.shareholder_name.name1)
        || hit(&profile.pan_number)
        || profile.companies.iter().any(|h| hit(&h.company_name))
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
    /// Makes `link_client` fail, to exercise compensation
    pub fail_link: AtomicBool,
    /// Makes lookups fail the way a dropped connection does
    pub offline: AtomicBool,
}

impl MemoryUsers {
    fn reachable(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DbErr::Conn(RuntimeErr::Internal("connection refused".into())).into());
        }
        Ok(())
    }

    pub fn all(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }

    pub fn insert_raw(&self, user: User) {
        self.rows.lock().unwrap().push(user);
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.reachable()?;
        Ok(self.all().into_iter().find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.all().into_iter().find(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.all().into_iter().find(|u| u.username == username))
    }

    async fn find_by_login(&self, email_or_username: &str) -> AppResult<Option<User>> {
        self.reachable()?;
        let login = email_or_username.trim().to_lowercase();
        Ok(self
            .all()
            .into_iter()
            .find(|u| u.email == login || u.username == login))
    }

    async fn find_by_reset_token(&self, token_hash: &str) -> AppResult<Option<User>> {
        Ok(self
            .all()
            .into_iter()
            .find(|u| u.reset_password_token.as_deref() == Some(token_hash)))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(AppError::Conflict("User".into()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            name: new_user.name,
            phone_number: new_user.phone_number,
            password_hash: new_user.password_hash,
            role: new_user.role,
            is_active: true,
            client_id: None,
            assigned_clients: Vec::new(),
            reset_password_token: None,
            reset_password_expires: None,
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AppError::NotFound)?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn link_client(&self, user_id: Uuid, profile_id: Uuid) -> AppResult<()> {
        if self.fail_link.load(Ordering::SeqCst) {
            return Err(AppError::internal("link failed"));
        }
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AppError::NotFound)?;
        slot.client_id = Some(profile_id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users = self.all();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

#[derive(Default)]
pub struct MemoryProfiles {
    rows: Mutex<Vec<ClientProfile>>,
    /// Makes `insert` fail, to exercise compensation
    pub fail_insert: AtomicBool,
}

impl MemoryProfiles {
    pub fn all(&self) -> Vec<ClientProfile> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfiles {
    async fn list(&self, filter: &ProfileFilter) -> AppResult<(Vec<ClientProfile>, u64)> {
        let mut matches: Vec<ClientProfile> = self
            .all()
            .into_iter()
            .filter(|p| in_scope(&filter.scope, p.id))
            .filter(|p| filter.search_text().map_or(true, |q| matches_query(p, q)))
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matches.len() as u64;
        Ok((page(&matches, &filter.pagination), total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ClientProfile>> {
        Ok(self.all().into_iter().find(|p| p.id == id))
    }

    async fn insert(&self, profile: &ClientProfile) -> AppResult<ClientProfile> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::internal("insert failed"));
        }
        self.rows.lock().unwrap().push(profile.clone());
        Ok(profile.clone())
    }

    async fn save(&self, profile: &ClientProfile) -> AppResult<ClientProfile> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or(AppError::NotFound)?;
        *slot = profile.clone();
        Ok(profile.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryDmat {
    rows: Mutex<Vec<DmatAccount>>,
}

#[async_trait]
impl DmatRepository for MemoryDmat {
    async fn list(&self, pagination: &PaginationParams) -> AppResult<(Vec<DmatAccount>, u64)> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = rows.len() as u64;
        Ok((page(&rows, pagination), total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DmatAccount>> {
        Ok(self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, account: &DmatAccount) -> AppResult<DmatAccount> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|a| a.account_number == account.account_number) {
            return Err(AppError::Conflict("DMAT account".into()));
        }
        rows.push(account.clone());
        Ok(account.clone())
    }

    async fn save(&self, account: &DmatAccount) -> AppResult<DmatAccount> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|a| a.id == account.id)
            .ok_or(AppError::NotFound)?;
        *slot = account.clone();
        Ok(account.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Unit of Work over the in-memory repositories.
#[derive(Default)]
pub struct MemoryUow {
    pub users: Arc<MemoryUsers>,
    pub profiles: Arc<MemoryProfiles>,
    pub dmat: Arc<MemoryDmat>,
}

impl UnitOfWork for MemoryUow {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn dmat_accounts(&self) -> Arc<dyn DmatRepository> {
        self.dmat.clone()
    }
}

/// Mailer that keeps every message.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait for background deliveries to land.
    pub async fn wait_for(&self, count: usize) -> Vec<Email> {
        for _ in 0..100 {
            if self.sent.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, email: Email) -> AppResult<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Storage probe with a switch.
pub struct FakeStorage {
    pub up: AtomicBool,
}

impl FakeStorage {
    pub fn up() -> Self {
        Self {
            up: AtomicBool::new(true),
        }
    }

    pub fn down() -> Self {
        Self {
            up: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl StorageProbe for FakeStorage {
    async fn ping(&self) -> AppResult<()> {
        if self.up.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Unavailable)
        }
    }
}

/// Insert an active user with the given role and password.
pub fn seed_user(uow: &MemoryUow, username: &str, role: UserRole, password: &str) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        name: username.to_string(),
        phone_number: None,
        password_hash: Password::new(password).unwrap().into_string(),
        role,
        is_active: true,
        client_id: None,
        assigned_clients: Vec::new(),
        reset_password_token: None,
        reset_password_expires: None,
        created_at: now,
        updated_at: now,
    };
    uow.users.insert_raw(user.clone());
    user
}
