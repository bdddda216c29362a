//! Client profile use cases.
//!
//! Every operation runs the access guard first, then loads, mutates and
//! saves the whole aggregate. Saves are last-writer-wins.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::provisioner::AccountProvisioner;
use crate::domain::{
    authorize, ClientProfile, CreatedProfile, HoldingKey, HoldingPayload, ProfileAction,
    ProfilePayload, ProfileResponse, ProfileScope, ReviewStatus, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{Email, EmailSender, ProfileFilter, UnitOfWork};
use crate::jobs::dispatch_email;
use crate::types::{Paginated, PaginationParams};
use crate::utils::templates;

#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Profiles visible to `actor` matching `query`, newest first.
    async fn list(
        &self,
        actor: &User,
        query: Option<String>,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<ProfileResponse>>;

    async fn get(&self, actor: &User, id: Uuid) -> AppResult<ProfileResponse>;

    /// Create a profile and provision its owner's login.
    async fn create(&self, actor: &User, payload: ProfilePayload) -> AppResult<CreatedProfile>;

    /// Full replace of the mutable fields.
    async fn update(&self, actor: &User, id: Uuid, payload: ProfilePayload)
        -> AppResult<ProfileResponse>;

    /// Delete the profile. Linked logins are left in place.
    async fn delete(&self, actor: &User, id: Uuid) -> AppResult<()>;

    async fn add_holding(
        &self,
        actor: &User,
        id: Uuid,
        holding: HoldingPayload,
    ) -> AppResult<ProfileResponse>;

    async fn edit_holding(
        &self,
        actor: &User,
        id: Uuid,
        key: HoldingKey,
        holding: HoldingPayload,
    ) -> AppResult<ProfileResponse>;

    async fn remove_holding(&self, actor: &User, id: Uuid, key: HoldingKey)
        -> AppResult<ProfileResponse>;

    /// Record a review decision, stamped with the actor's username.
    async fn set_review(
        &self,
        actor: &User,
        id: Uuid,
        key: HoldingKey,
        status: ReviewStatus,
        notes: Option<String>,
    ) -> AppResult<ProfileResponse>;
}

pub struct ProfileManager<U: UnitOfWork> {
    uow: Arc<U>,
    provisioner: Arc<dyn AccountProvisioner>,
    mailer: Arc<dyn EmailSender>,
}

impl<U: UnitOfWork> ProfileManager<U> {
    pub fn new(
        uow: Arc<U>,
        provisioner: Arc<dyn AccountProvisioner>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            uow,
            provisioner,
            mailer,
        }
    }

    /// Guard, load, mutate and save one aggregate.
    async fn modify<F>(
        &self,
        actor: &User,
        action: ProfileAction,
        id: Uuid,
        change: F,
    ) -> AppResult<ProfileResponse>
    where
        F: FnOnce(&mut ClientProfile) -> AppResult<()> + Send,
    {
        authorize(Some(actor), action, Some(id))?;

        let profiles = self.uow.profiles();
        let mut profile = profiles.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        change(&mut profile)?;

        let saved = profiles.save(&profile).await?;
        Ok(ProfileResponse::from(saved))
    }

    /// Remove a login created for a profile that could not be completed.
    async fn compensate_user(&self, user_id: Uuid) {
        if let Err(e) = self.provisioner.revoke(user_id).await {
            tracing::error!(%user_id, error = %e, "failed to remove orphaned login");
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfileService for ProfileManager<U> {
    async fn list(
        &self,
        actor: &User,
        query: Option<String>,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<ProfileResponse>> {
        let filter = ProfileFilter {
            query,
            scope: ProfileScope::for_actor(actor),
            pagination,
        };

        let (profiles, total) = self.uow.profiles().list(&filter).await?;
        Ok(Paginated::new(
            profiles.into_iter().map(ProfileResponse::from).collect(),
            pagination.page(),
            pagination.limit(),
            total,
        ))
    }

    async fn get(&self, actor: &User, id: Uuid) -> AppResult<ProfileResponse> {
        authorize(Some(actor), ProfileAction::View, Some(id))?;

        self.uow
            .profiles()
            .find_by_id(id)
            .await?
            .map(ProfileResponse::from)
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, actor: &User, payload: ProfilePayload) -> AppResult<CreatedProfile> {
        authorize(Some(actor), ProfileAction::Create, None)?;
        let draft = payload.to_draft()?;

        let name = payload.display_name();
        let provisioned = self
            .provisioner
            .provision(
                &name,
                payload.email.as_deref(),
                payload.phone_number.as_deref(),
            )
            .await?;

        let profile = ClientProfile::create(draft, Some(provisioned.user_id), Utc::now());
        let profiles = self.uow.profiles();

        let saved = match profiles.insert(&profile).await {
            Ok(saved) => saved,
            Err(e) => {
                if provisioned.created {
                    self.compensate_user(provisioned.user_id).await;
                }
                return Err(e);
            }
        };

        if let Some(previous) = provisioned.linked_profile {
            // A login backs one profile; keep the existing binding
            tracing::warn!(
                profile_id = %saved.id,
                user_id = %provisioned.user_id,
                linked_profile = %previous,
                "reused login already owns a profile, leaving its link in place"
            );
        } else if let Err(e) = self.uow.users().link_client(provisioned.user_id, saved.id).await {
            tracing::error!(profile_id = %saved.id, error = %e, "linking login to profile failed");
            if let Err(del) = profiles.delete(saved.id).await {
                tracing::error!(profile_id = %saved.id, error = %del, "failed to remove unlinked profile");
            }
            if provisioned.created {
                self.compensate_user(provisioned.user_id).await;
            }
            return Err(e);
        }

        tracing::info!(
            profile_id = %saved.id,
            user_id = %provisioned.user_id,
            new_login = provisioned.created,
            "client profile created"
        );

        if let Some(credentials) = &provisioned.credentials {
            let (subject, html) = templates::welcome_email(
                &name,
                &credentials.username,
                &credentials.email,
                &credentials.password,
            );
            dispatch_email(
                self.mailer.clone(),
                Email::new(&credentials.email, subject, html),
            );
        }

        Ok(CreatedProfile {
            profile: ProfileResponse::from(saved),
            credentials: provisioned.credentials,
        })
    }

    async fn update(
        &self,
        actor: &User,
        id: Uuid,
        payload: ProfilePayload,
    ) -> AppResult<ProfileResponse> {
        let draft = payload.to_draft()?;
        self.modify(actor, ProfileAction::Update, id, move |profile| {
            profile.replace_with(draft, Utc::now());
            Ok(())
        })
        .await
    }

    async fn delete(&self, actor: &User, id: Uuid) -> AppResult<()> {
        authorize(Some(actor), ProfileAction::Delete, Some(id))?;
        self.uow.profiles().delete(id).await?;
        tracing::info!(profile_id = %id, "client profile deleted");
        Ok(())
    }

    async fn add_holding(
        &self,
        actor: &User,
        id: Uuid,
        holding: HoldingPayload,
    ) -> AppResult<ProfileResponse> {
        let draft = holding.into_draft()?;
        self.modify(actor, ProfileAction::Update, id, move |profile| {
            profile.add_holding(draft, Utc::now()).map(|_| ())
        })
        .await
    }

    async fn edit_holding(
        &self,
        actor: &User,
        id: Uuid,
        key: HoldingKey,
        holding: HoldingPayload,
    ) -> AppResult<ProfileResponse> {
        let draft = holding.into_draft()?;
        self.modify(actor, ProfileAction::Update, id, move |profile| {
            profile.edit_holding(&key, draft, Utc::now()).map(|_| ())
        })
        .await
    }

    async fn remove_holding(
        &self,
        actor: &User,
        id: Uuid,
        key: HoldingKey,
    ) -> AppResult<ProfileResponse> {
        self.modify(actor, ProfileAction::Update, id, move |profile| {
            profile.remove_holding(&key, Utc::now()).map(|_| ())
        })
        .await
    }

    async fn set_review(
        &self,
        actor: &User,
        id: Uuid,
        key: HoldingKey,
        status: ReviewStatus,
        notes: Option<String>,
    ) -> AppResult<ProfileResponse> {
        let reviewer = actor.username.clone();
        let notes = notes.unwrap_or_default();
        let response = self
            .modify(actor, ProfileAction::Review, id, move |profile| {
                profile
                    .set_review(&key, status, notes, reviewer, Utc::now())
                    .map(|_| ())
            })
            .await?;

        tracing::info!(profile_id = %id, ?status, reviewer = %actor.username, "holding reviewed");
        Ok(response)
    }
}
