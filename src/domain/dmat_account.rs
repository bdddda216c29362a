//! DMAT brokerage accounts. Independent of client profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::types::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RenewalStatus {
    #[default]
    Active,
    Expired,
    Pending,
    Expiring,
}

impl RenewalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalStatus::Active => "Active",
            RenewalStatus::Expired => "Expired",
            RenewalStatus::Pending => "Pending",
            RenewalStatus::Expiring => "Expiring",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(RenewalStatus::Active),
            "Expired" => Some(RenewalStatus::Expired),
            "Pending" => Some(RenewalStatus::Pending),
            "Expiring" => Some(RenewalStatus::Expiring),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DmatAccount {
    pub id: Uuid,
    #[schema(example = "1204470000123456")]
    pub account_number: String,
    #[schema(example = "Asha Rao")]
    pub holder_name: String,
    pub expiry_date: DateTime<Utc>,
    pub renewal_status: RenewalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDmatAccount {
    #[validate(length(min = 1, message = "accountNumber is required"))]
    #[schema(example = "1204470000123456")]
    pub account_number: String,
    #[validate(length(min = 1, message = "holderName is required"))]
    #[schema(example = "Asha Rao")]
    pub holder_name: String,
    #[serde(default, deserialize_with = "lenient::optional_datetime")]
    #[schema(value_type = String, example = "2026-12-31")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub renewal_status: RenewalStatus,
}

impl CreateDmatAccount {
    /// Trimmed fields plus the required expiry date.
    pub fn normalized(self) -> AppResult<(String, String, DateTime<Utc>, RenewalStatus)> {
        let account_number = self.account_number.trim().to_string();
        let holder_name = self.holder_name.trim().to_string();
        if account_number.is_empty() {
            return Err(AppError::validation("accountNumber is required"));
        }
        if holder_name.is_empty() {
            return Err(AppError::validation("holderName is required"));
        }
        let expiry_date = self
            .expiry_date
            .ok_or_else(|| AppError::validation("expiryDate is required"))?;
        Ok((account_number, holder_name, expiry_date, self.renewal_status))
    }
}

/// Partial update; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDmatAccount {
    pub account_number: Option<String>,
    pub holder_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_datetime")]
    #[schema(value_type = Option<String>, example = "2027-12-31")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub renewal_status: Option<RenewalStatus>,
}

impl DmatAccount {
    /// Apply a partial update. Blank required text is refused.
    pub fn apply(&mut self, update: UpdateDmatAccount, now: DateTime<Utc>) -> AppResult<()> {
        if let Some(number) = update.account_number {
            let number = number.trim().to_string();
            if number.is_empty() {
                return Err(AppError::validation("accountNumber is required"));
            }
            self.account_number = number;
        }
        if let Some(holder) = update.holder_name {
            let holder = holder.trim().to_string();
            if holder.is_empty() {
                return Err(AppError::validation("holderName is required"));
            }
            self.holder_name = holder;
        }
        if let Some(expiry) = update.expiry_date {
            self.expiry_date = expiry;
        }
        if let Some(status) = update.renewal_status {
            self.renewal_status = status;
        }
        self.updated_at = now;
        Ok(())
    }
}
