//! Client profile entity. Embedded documents live in JSONB columns.

use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::de::DeserializeOwned;

use crate::domain::{ClientProfile, ProfileStatus};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "client_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub shareholder_name: Json,
    pub pan_number: String,
    pub aadhaar_number: Option<String>,
    pub address: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub bank_details: Option<Json>,
    pub demat_account_number: Option<String>,
    pub demat_created_with: Option<String>,
    pub demat_created_with_person: Option<String>,
    pub demat_created_with_person_number: Option<String>,
    pub status: String,
    pub remarks: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub dividend: Option<Json>,
    pub current_date: DateTimeUtc,
    #[sea_orm(column_type = "JsonBinary")]
    pub companies: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn status_label(status: ProfileStatus) -> &'static str {
    match status {
        ProfileStatus::Active => "Active",
        ProfileStatus::Closed => "Closed",
        ProfileStatus::Pending => "Pending",
        ProfileStatus::Suspended => "Suspended",
    }
}

fn parse_status(s: &str) -> ProfileStatus {
    match s {
        "Closed" => ProfileStatus::Closed,
        "Pending" => ProfileStatus::Pending,
        "Suspended" => ProfileStatus::Suspended,
        _ => ProfileStatus::Active,
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<Json> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Profile serialization failed: {}", e)))
}

fn from_json<T: DeserializeOwned>(value: Json, column: &str) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::internal(format!("Corrupt {} column: {}", column, e)))
}

impl TryFrom<Model> for ClientProfile {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(ClientProfile {
            id: model.id,
            user_id: model.user_id,
            shareholder_name: from_json(model.shareholder_name, "shareholder_name")?,
            pan_number: model.pan_number,
            aadhaar_number: model.aadhaar_number,
            address: model.address,
            bank_details: model
                .bank_details
                .map(|v| from_json(v, "bank_details"))
                .transpose()?,
            demat_account_number: model.demat_account_number,
            demat_created_with: model.demat_created_with,
            demat_created_with_person: model.demat_created_with_person,
            demat_created_with_person_number: model.demat_created_with_person_number,
            status: parse_status(&model.status),
            remarks: model.remarks,
            dividend: model.dividend.map(|v| from_json(v, "dividend")).transpose()?,
            current_date: model.current_date,
            companies: from_json(model.companies, "companies")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl ActiveModel {
    /// Row for an aggregate with every column set.
    pub fn from_domain(profile: &ClientProfile) -> AppResult<Self> {
        Ok(Self {
            id: Set(profile.id),
            user_id: Set(profile.user_id),
            shareholder_name: Set(to_json(&profile.shareholder_name)?),
            pan_number: Set(profile.pan_number.clone()),
            aadhaar_number: Set(profile.aadhaar_number.clone()),
            address: Set(profile.address.clone()),
            bank_details: Set(profile.bank_details.as_ref().map(to_json).transpose()?),
            demat_account_number: Set(profile.demat_account_number.clone()),
            demat_created_with: Set(profile.demat_created_with.clone()),
            demat_created_with_person: Set(profile.demat_created_with_person.clone()),
            demat_created_with_person_number: Set(profile
                .demat_created_with_person_number
                .clone()),
            status: Set(status_label(profile.status).to_string()),
            remarks: Set(profile.remarks.clone()),
            dividend: Set(profile.dividend.as_ref().map(to_json).transpose()?),
            current_date: Set(profile.current_date),
            companies: Set(to_json(&profile.companies)?),
            created_at: Set(profile.created_at),
            updated_at: Set(profile.updated_at),
        })
    }
}
