// src/models/garage.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::crud::{Resource, SoftDelete, TenantScoped};

// ---
// Garage (o Tenant)
// ---
// A conta principal: a oficina. Unidade de isolamento dos dados.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Garage {
    pub id: Uuid,

    #[schema(example = "Patil Auto Works")]
    pub name: String,
    pub legal_name: Option<String>,
    #[schema(example = "27AAPFU0939F1ZV")]
    pub gst_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    pub onboarding_completed: bool,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Garage {
    const TABLE: &'static str = "garages";
    const ENTITY: &'static str = "Garage";
}

// ---
// Branch (Filial)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub garage_id: Uuid,

    #[schema(example = "Bhosari Workshop")]
    pub name: String,
    #[schema(example = "PUN-BHO-01")]
    pub branch_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,

    pub is_main: bool,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Branch {
    const TABLE: &'static str = "branches";
    const ENTITY: &'static str = "Branch";
}

impl TenantScoped for Branch {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

impl SoftDelete for Branch {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchPayload {
    #[validate(length(min = 1, max = 150, message = "required"))]
    #[schema(example = "Bhosari Workshop")]
    pub name: String,

    #[validate(length(min = 2, max = 30, message = "invalid_branch_code"))]
    #[schema(example = "PUN-BHO-01")]
    pub branch_code: String,

    #[validate(length(max = 20, message = "too_long"))]
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[serde(default)]
    pub is_main: bool,
}
