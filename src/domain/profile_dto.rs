//! Request and response shapes for client profiles.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::client_profile::{
    BankDetails, ClientProfile, Dividend, DistinctiveNumber, HoldingDraft, HoldingKey,
    ProfileDraft, ProfileStatus, Review, ReviewStatus, ShareHolding, ShareholderName,
};
use super::user::Credentials;
use crate::errors::{AppError, AppResult};
use crate::types::lenient::{self, clean};

/// One holding as submitted by a form.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HoldingPayload {
    /// Existing holding id; keeps the stored review on full replace
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
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
    #[serde(default, deserialize_with = "lenient::non_negative_int")]
    #[schema(example = 100)]
    pub quantity: u64,
    #[serde(default, deserialize_with = "lenient::non_negative_decimal")]
    #[schema(example = 10.0)]
    pub face_value: f64,
    #[serde(default, deserialize_with = "lenient::optional_datetime")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review: Option<Review>,
}

impl HoldingPayload {
    /// Trim text and require a company name.
    pub fn into_draft(self) -> AppResult<HoldingDraft> {
        let company_name = self.company_name.trim().to_string();
        if company_name.is_empty() {
            return Err(AppError::validation("companyName is required"));
        }

        Ok(HoldingDraft {
            id: self.id,
            company_name,
            isin_number: self.isin_number.trim().to_string(),
            folio_number: clean(self.folio_number),
            certificate_number: clean(self.certificate_number),
            distinctive_number: self.distinctive_number.map(|d| DistinctiveNumber {
                from: clean(d.from),
                to: clean(d.to),
            }),
            quantity: self.quantity,
            face_value: self.face_value,
            purchase_date: self.purchase_date,
            review: self.review,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DividendPayload {
    #[serde(default, deserialize_with = "lenient::non_negative_decimal")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::optional_datetime")]
    pub date: Option<DateTime<Utc>>,
}

/// Create and full-replace payload for a profile.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    #[serde(default)]
    pub shareholder_name: ShareholderName,
    #[serde(default)]
    #[schema(example = "abcde1234f")]
    pub pan_number: String,
    #[serde(default)]
    pub aadhaar_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
    #[serde(default)]
    pub demat_account_number: Option<String>,
    #[serde(default)]
    pub demat_created_with: Option<String>,
    #[serde(default)]
    pub demat_created_with_person: Option<String>,
    #[serde(default)]
    pub demat_created_with_person_number: Option<String>,
    #[serde(default)]
    pub status: ProfileStatus,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub dividend: Option<DividendPayload>,
    #[serde(default, deserialize_with = "lenient::optional_datetime")]
    pub current_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub companies: Vec<HoldingPayload>,
    /// Login e-mail for the provisioned account (create only)
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Contact number for the provisioned account (create only)
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl ProfilePayload {
    /// Validate and normalize into the aggregate's input.
    /// PAN and IFSC are upper-cased; blank optional text becomes absent.
    pub fn to_draft(&self) -> AppResult<ProfileDraft> {
        self.validate()?;

        let name1 = self.shareholder_name.name1.trim().to_string();
        if name1.is_empty() {
            return Err(AppError::validation("shareholderName.name1 is required"));
        }
        let pan_number = self.pan_number.trim().to_uppercase();
        if pan_number.is_empty() {
            return Err(AppError::validation("panNumber is required"));
        }

        let companies = self
            .companies
            .iter()
            .cloned()
            .map(HoldingPayload::into_draft)
            .collect::<AppResult<Vec<_>>>()?;

        // Holdings are addressed by (companyName, ISIN), so the key must be unique
        let mut keys = HashSet::new();
        for holding in &companies {
            let key = (
                holding.company_name.trim().to_lowercase(),
                holding.isin_number.trim().to_lowercase(),
            );
            if !keys.insert(key) {
                return Err(AppError::conflict("Holding"));
            }
        }

        Ok(ProfileDraft {
            shareholder_name: ShareholderName {
                name1,
                name2: clean(self.shareholder_name.name2.clone()),
                name3: clean(self.shareholder_name.name3.clone()),
            },
            pan_number,
            aadhaar_number: clean(self.aadhaar_number.clone()),
            address: clean(self.address.clone()),
            bank_details: self.bank_details.clone().map(|b| BankDetails {
                bank_number: clean(b.bank_number),
                branch: clean(b.branch),
                bank_name: clean(b.bank_name),
                ifsc_code: clean(b.ifsc_code).map(|s| s.to_uppercase()),
                micr_code: clean(b.micr_code),
            }),
            demat_account_number: clean(self.demat_account_number.clone()),
            demat_created_with: clean(self.demat_created_with.clone()),
            demat_created_with_person: clean(self.demat_created_with_person.clone()),
            demat_created_with_person_number: clean(
                self.demat_created_with_person_number.clone(),
            ),
            status: self.status,
            remarks: clean(self.remarks.clone()),
            dividend: self.dividend.as_ref().map(|d| Dividend {
                amount: d.amount,
                date: d.date,
            }),
            current_date: self.current_date,
            companies,
        })
    }

    /// Name used for the provisioned login.
    pub fn display_name(&self) -> String {
        self.shareholder_name.name1.trim().to_string()
    }
}

/// Edit the holding identified by `companyName` + `isinNumber`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditHoldingRequest {
    #[serde(flatten)]
    pub key: HoldingKey,
    pub holding: HoldingPayload,
}

/// Record a review decision on one holding.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetReviewRequest {
    #[serde(flatten)]
    pub key: HoldingKey,
    pub status: ReviewStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query identifying a holding to remove.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HoldingKeyQuery {
    pub company_name: String,
    pub isin_number: String,
}

impl From<HoldingKeyQuery> for HoldingKey {
    fn from(q: HoldingKeyQuery) -> Self {
        HoldingKey::new(q.company_name, q.isin_number)
    }
}

/// Holding with its derived total value.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HoldingResponse {
    #[serde(flatten)]
    pub holding: ShareHolding,
    #[schema(example = 1000.0)]
    pub total_value: f64,
}

impl From<ShareHolding> for HoldingResponse {
    fn from(holding: ShareHolding) -> Self {
        let total_value = holding.total_value();
        Self {
            holding,
            total_value,
        }
    }
}

/// Profile as returned to API callers.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub shareholder_name: ShareholderName,
    #[schema(example = "ABCDE1234F")]
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
    pub companies: Vec<HoldingResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientProfile> for ProfileResponse {
    fn from(p: ClientProfile) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            shareholder_name: p.shareholder_name,
            pan_number: p.pan_number,
            aadhaar_number: p.aadhaar_number,
            address: p.address,
            bank_details: p.bank_details,
            demat_account_number: p.demat_account_number,
            demat_created_with: p.demat_created_with,
            demat_created_with_person: p.demat_created_with_person,
            demat_created_with_person_number: p.demat_created_with_person_number,
            status: p.status,
            remarks: p.remarks,
            dividend: p.dividend,
            current_date: p.current_date,
            companies: p.companies.into_iter().map(HoldingResponse::from).collect(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Result of creating a profile. `credentials` is set only when a new
/// login was provisioned.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedProfile {
    pub profile: ProfileResponse,
    pub credentials: Option<Credentials>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ProfilePayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pan_and_ifsc_are_uppercased() {
        let draft = payload(json!({
            "shareholderName": {"name1": " Asha Rao "},
            "panNumber": " abcde1234f ",
            "bankDetails": {"ifscCode": "hdfc0001234", "bankName": "  "},
            "companies": [{"companyName": "Acme Ltd", "isinNumber": "INE000A01011"}]
        }))
        .to_draft()
        .unwrap();

        assert_eq!(draft.pan_number, "ABCDE1234F");
        assert_eq!(draft.shareholder_name.name1, "Asha Rao");
        let bank = draft.bank_details.unwrap();
        assert_eq!(bank.ifsc_code.as_deref(), Some("HDFC0001234"));
        assert_eq!(bank.bank_name, None);
    }

    #[test]
    fn test_required_fields() {
        let err = payload(json!({"shareholderName": {"name1": "A"}}))
            .to_draft()
            .unwrap_err();
        assert!(err.to_string().contains("panNumber"));

        let err = payload(json!({"panNumber": "X"})).to_draft().unwrap_err();
        assert!(err.to_string().contains("name1"));

        let err = payload(json!({
            "shareholderName": {"name1": "A"},
            "panNumber": "X",
            "companies": [{"companyName": " ", "quantity": 1}]
        }))
        .to_draft()
        .unwrap_err();
        assert!(err.to_string().contains("companyName"));
    }

    #[test]
    fn test_duplicate_holding_keys_are_rejected() {
        let err = payload(json!({
            "shareholderName": {"name1": "A"},
            "panNumber": "X",
            "companies": [
                {"companyName": "Acme Ltd", "isinNumber": "INE000A01011"},
                {"companyName": " acme ltd", "isinNumber": "ine000a01011"}
            ]
        }))
        .to_draft()
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref what) if what == "Holding"));

        let draft = payload(json!({
            "shareholderName": {"name1": "A"},
            "panNumber": "X",
            "companies": [
                {"companyName": "Acme Ltd", "isinNumber": "INE000A01011"},
                {"companyName": "Acme Ltd", "isinNumber": "INE000A01029"}
            ]
        }))
        .to_draft()
        .unwrap();
        assert_eq!(draft.companies.len(), 2);
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let err = payload(json!({
            "shareholderName": {"name1": "A"},
            "panNumber": "X",
            "email": "not-an-email"
        }))
        .to_draft()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_numeric_coercion_in_holdings() {
        let draft = payload(json!({
            "shareholderName": {"name1": "A"},
            "panNumber": "X",
            "companies": [{"companyName": "Acme", "quantity": "ten", "faceValue": "-5"}]
        }))
        .to_draft()
        .unwrap();
        assert_eq!(draft.companies[0].quantity, 0);
        assert_eq!(draft.companies[0].face_value, 0.0);
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let parsed = serde_json::from_value::<ProfilePayload>(json!({"status": "Deleted"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_response_carries_total_value() {
        let draft = payload(json!({
            "shareholderName": {"name1": "Asha Rao"},
            "panNumber": "abcde1234f",
            "companies": [{"companyName": "Acme Ltd", "isinNumber": "INE000A01011",
                           "quantity": 100, "faceValue": 10}]
        }))
        .to_draft()
        .unwrap();
        let profile = ClientProfile::create(draft, None, Utc::now());
        let json = serde_json::to_value(ProfileResponse::from(profile)).unwrap();

        assert_eq!(json["companies"][0]["totalValue"], 1000.0);
        assert_eq!(json["companies"][0]["companyName"], "Acme Ltd");
        assert_eq!(json["companies"][0]["review"]["status"], "pending");
    }

    #[test]
    fn test_set_review_request_shape() {
        let req: SetReviewRequest = serde_json::from_value(json!({
            "companyName": "Acme Ltd",
            "isinNumber": "INE000A01011",
            "status": "needs_attention",
            "notes": "folio mismatch"
        }))
        .unwrap();
        assert_eq!(req.key, HoldingKey::new("Acme Ltd", "INE000A01011"));
        assert_eq!(req.status, ReviewStatus::NeedsAttention);
    }
}
