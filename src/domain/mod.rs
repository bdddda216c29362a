//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and access rules, independent of storage
//! and transport.

pub mod access;
pub mod client_profile;
pub mod dmat_account;
pub mod password;
pub mod profile_dto;
pub mod shareholder;
pub mod user;

pub use access::{authorize, ProfileAction, ProfileScope};
pub use client_profile::{
    BankDetails, ClientProfile, Dividend, DistinctiveNumber, HoldingDraft, HoldingKey,
    ProfileDraft, ProfileStatus, Review, ReviewStatus, ShareHolding, ShareholderName,
};
pub use dmat_account::{CreateDmatAccount, DmatAccount, RenewalStatus, UpdateDmatAccount};
pub use password::Password;
pub use profile_dto::{
    CreatedProfile, DividendPayload, EditHoldingRequest, HoldingKeyQuery, HoldingPayload,
    HoldingResponse, ProfilePayload, ProfileResponse, SetReviewRequest,
};
pub use shareholder::Shareholder;
pub use user::{Credentials, NewUser, UpdateUser, User, UserResponse, UserRole};
