//! Client profile aggregate.
//!
//! A profile owns its share holdings and each holding owns its review
//! record. Every mutation goes through the aggregate and is persisted as
//! one document; there is no version check, so the last write wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Manual audit flag on a holding. Any state may move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    NeedsAttention,
}

/// Review sub-record. A missing record reads as the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProfileStatus {
    #[default]
    Active,
    Closed,
    Pending,
    Suspended,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareholderName {
    #[serde(default)]
    #[schema(example = "Asha Rao")]
    pub name1: String,
    #[serde(default)]
    pub name2: Option<String>,
    #[serde(default)]
    pub name3: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default)]
    pub bank_number: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
    #[serde(default)]
    pub micr_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dividend {
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Certificate range; values are free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DistinctiveNumber {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Share holding embedded in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareHolding {
    pub id: Uuid,
    #[schema(example = "Acme Ltd")]
    pub company_name: String,
    #[serde(default)]
    #[schema(example = "INE000A01011")]
    pub isin_number: String,
    #[serde(default)]
    pub folio_number: Option<String>,
    #[serde(default)]
    pub certificate_number: Option<String>,
    #[serde(default)]
    pub distinctive_number: Option<DistinctiveNumber>,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub face_value: f64,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review: Review,
}

impl ShareHolding {
    /// Quantity times face value. Never stored.
    pub fn total_value(&self) -> f64 {
        self.quantity as f64 * self.face_value
    }

    fn from_draft(draft: HoldingDraft, id: Uuid, review: Review) -> Self {
        Self {
            id,
            company_name: draft.company_name,
            isin_number: draft.isin_number,
            folio_number: draft.folio_number,
            certificate_number: draft.certificate_number,
            distinctive_number: draft.distinctive_number,
            quantity: draft.quantity,
            face_value: draft.face_value,
            purchase_date: draft.purchase_date,
            review,
        }
    }
}

/// Natural key of a holding inside one profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HoldingKey {
    #[schema(example = "Acme Ltd")]
    pub company_name: String,
    #[schema(example = "INE000A01011")]
    pub isin_number: String,
}

impl HoldingKey {
    pub fn new(company_name: impl Into<String>, isin_number: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            isin_number: isin_number.into(),
        }
    }

    /// Trimmed company name and ISIN, both compared case-insensitively.
    pub fn matches(&self, holding: &ShareHolding) -> bool {
        eq_folded(&self.company_name, &holding.company_name)
            && eq_folded(&self.isin_number, &holding.isin_number)
    }
}

fn eq_folded(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Validated holding input. `id` and `review` are only honoured on full replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingDraft {
    pub id: Option<Uuid>,
    pub company_name: String,
    pub isin_number: String,
    pub folio_number: Option<String>,
    pub certificate_number: Option<String>,
    pub distinctive_number: Option<DistinctiveNumber>,
    pub quantity: u64,
    pub face_value: f64,
    pub purchase_date: Option<DateTime<Utc>>,
    pub review: Option<Review>,
}

impl HoldingDraft {
    /// Add and edit commands need both halves of the key.
    pub fn require_key(&self) -> AppResult<()> {
        if self.company_name.trim().is_empty() {
            return Err(AppError::validation("companyName is required"));
        }
        if self.isin_number.trim().is_empty() {
            return Err(AppError::validation("isinNumber is required"));
        }
        Ok(())
    }
}

/// Validated, normalized mutable fields of a profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub shareholder_name: ShareholderName,
    pub pan_number: String,
    pub aadhaar_number: Option<String>,
    pub address: Option<String>,
    pub bank_details: Option<BankDetails>,
    pub demat_account_number: Option<String>,
    pub demat_created_with: Option<String>,
    pub demat_created_with_person: Option<String>,
    pub demat_created_with_person_number: Option<String>,
    pub status: ProfileStatus,
    pub remarks: Option<String>,
    pub dividend: Option<Dividend>,
    pub current_date: Option<DateTime<Utc>>,
    pub companies: Vec<HoldingDraft>,
}

/// The aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub shareholder_name: ShareholderName,
    pub pan_number: String,
    pub aadhaar_number: Option<String>,
    pub address: Option<String>,
    pub bank_details: Option<BankDetails>,
    pub demat_account_number: Option<String>,
    pub demat_created_with: Option<String>,
    pub demat_created_with_person: Option<String>,
    pub demat_created_with_person_number: Option<String>,
    pub status: ProfileStatus,
    pub remarks: Option<String>,
    pub dividend: Option<Dividend>,
    pub current_date: DateTime<Utc>,
    pub companies: Vec<ShareHolding>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientProfile {
    /// Build a new aggregate. Holdings get fresh ids and a pending review
    /// unless the draft carries one.
    pub fn create(draft: ProfileDraft, user_id: Option<Uuid>, now: DateTime<Utc>) -> Self {
        let companies = draft
            .companies
            .into_iter()
            .map(|h| {
                let review = h.review.clone().unwrap_or_default();
                ShareHolding::from_draft(h, Uuid::new_v4(), review)
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            user_id,
            shareholder_name: draft.shareholder_name,
            pan_number: draft.pan_number,
            aadhaar_number: draft.aadhaar_number,
            address: draft.address,
            bank_details: draft.bank_details,
            demat_account_number: draft.demat_account_number,
            demat_created_with: draft.demat_created_with,
            demat_created_with_person: draft.demat_created_with_person,
            demat_created_with_person_number: draft.demat_created_with_person_number,
            status: draft.status,
            remarks: draft.remarks,
            dividend: draft.dividend,
            current_date: draft.current_date.unwrap_or(now),
            companies,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replace of the mutable fields. The holdings list is replaced,
    /// not diffed, but a holding that keeps its id and omits its review
    /// keeps the stored review.
    pub fn replace_with(&mut self, draft: ProfileDraft, now: DateTime<Utc>) {
        let previous = std::mem::take(&mut self.companies);
        self.companies = draft
            .companies
            .into_iter()
            .map(|h| {
                let kept = h
                    .id
                    .and_then(|id| previous.iter().find(|p| p.id == id));
                let id = kept.map(|p| p.id).unwrap_or_else(Uuid::new_v4);
                let review = match (&h.review, kept) {
                    (Some(review), _) => review.clone(),
                    (None, Some(p)) => p.review.clone(),
                    (None, None) => Review::default(),
                };
                ShareHolding::from_draft(h, id, review)
            })
            .collect();

        self.shareholder_name = draft.shareholder_name;
        self.pan_number = draft.pan_number;
        self.aadhaar_number = draft.aadhaar_number;
        self.address = draft.address;
        self.bank_details = draft.bank_details;
        self.demat_account_number = draft.demat_account_number;
        self.demat_created_with = draft.demat_created_with;
        self.demat_created_with_person = draft.demat_created_with_person;
        self.demat_created_with_person_number = draft.demat_created_with_person_number;
        self.status = draft.status;
        self.remarks = draft.remarks;
        self.dividend = draft.dividend;
        if let Some(date) = draft.current_date {
            self.current_date = date;
        }
        self.updated_at = now;
    }

    pub fn find_holding(&self, key: &HoldingKey) -> Option<&ShareHolding> {
        self.companies.iter().find(|h| key.matches(h))
    }

    fn holding_index(&self, key: &HoldingKey) -> AppResult<usize> {
        self.companies
            .iter()
            .position(|h| key.matches(h))
            .ok_or(AppError::NotFound)
    }

    /// Append a holding with a pending review.
    pub fn add_holding(&mut self, draft: HoldingDraft, now: DateTime<Utc>) -> AppResult<&ShareHolding> {
        draft.require_key()?;
        let key = HoldingKey::new(draft.company_name.clone(), draft.isin_number.clone());
        if self.find_holding(&key).is_some() {
            return Err(AppError::conflict("Holding"));
        }

        self.companies
            .push(ShareHolding::from_draft(draft, Uuid::new_v4(), Review::default()));
        self.updated_at = now;
        Ok(&self.companies[self.companies.len() - 1])
    }

    /// Overwrite the holding matching `key`, keeping its id and review.
    pub fn edit_holding(
        &mut self,
        key: &HoldingKey,
        draft: HoldingDraft,
        now: DateTime<Utc>,
    ) -> AppResult<&ShareHolding> {
        draft.require_key()?;
        let idx = self.holding_index(key)?;

        let new_key = HoldingKey::new(draft.company_name.clone(), draft.isin_number.clone());
        let clash = self
            .companies
            .iter()
            .enumerate()
            .any(|(i, h)| i != idx && new_key.matches(h));
        if clash {
            return Err(AppError::conflict("Holding"));
        }

        let current = &self.companies[idx];
        let replacement = ShareHolding::from_draft(draft, current.id, current.review.clone());
        self.companies[idx] = replacement;
        self.updated_at = now;
        Ok(&self.companies[idx])
    }

    /// Remove the holding matching `key`. The last holding cannot be removed.
    pub fn remove_holding(&mut self, key: &HoldingKey, now: DateTime<Utc>) -> AppResult<ShareHolding> {
        let idx = self.holding_index(key)?;
        if self.companies.len() == 1 {
            return Err(AppError::validation(
                "A profile must keep at least one share holding",
            ));
        }

        let removed = self.companies.remove(idx);
        self.updated_at = now;
        Ok(removed)
    }

    /// Record a review decision on the holding matching `key`.
    pub fn set_review(
        &mut self,
        key: &HoldingKey,
        status: ReviewStatus,
        notes: impl Into<String>,
        reviewer: impl Into<String>,
        now: DateTime<Utc>,
    ) -> AppResult<&ShareHolding> {
        let idx = self.holding_index(key)?;
        self.companies[idx].review = Review {
            status,
            notes: notes.into(),
            reviewed_at: Some(now),
            reviewed_by: Some(reviewer.into()),
        };
        self.updated_at = now;
        Ok(&self.companies[idx])
    }
}
