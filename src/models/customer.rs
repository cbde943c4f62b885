// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::crud::{Resource, SoftDelete, TenantScoped};

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub garage_id: Uuid,

    #[schema(example = "Sneha Kulkarni")]
    pub full_name: String,
    pub email: Option<String>,
    #[schema(example = "+919820012345")]
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub gst_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Customer {
    const TABLE: &'static str = "customers";
    const ENTITY: &'static str = "Customer";
}

impl TenantScoped for Customer {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

impl SoftDelete for Customer {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[validate(length(min = 1, max = 150, message = "required"))]
    #[schema(example = "Sneha Kulkarni")]
    pub full_name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 20, message = "invalid_phone"))]
    #[schema(example = "+919820012345")]
    pub phone: String,

    #[validate(length(min = 6, max = 20, message = "invalid_phone"))]
    pub alternate_phone: Option<String>,

    #[validate(length(equal = 15, message = "invalid_gst_number"))]
    pub gst_number: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CustomerSearch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

// --- VEÍCULO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "fuel_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Petrol,
    Diesel,
    Cng,
    Lpg,
    Electric,
    Hybrid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub customer_id: Uuid,
    pub brand_id: Option<Uuid>,

    #[schema(example = "Swift VXi")]
    pub model: String,
    #[schema(example = "MH12AB1234")]
    pub registration_number: String,
    pub vin: Option<String>,
    pub manufacture_year: Option<i32>,
    pub color: Option<String>,
    pub fuel_type: FuelType,
    pub odometer_km: Option<i32>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Vehicle {
    const TABLE: &'static str = "vehicles";
    const ENTITY: &'static str = "Vehicle";
}

impl TenantScoped for Vehicle {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

impl SoftDelete for Vehicle {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePayload {
    pub customer_id: Uuid,
    pub brand_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "Swift VXi")]
    pub model: String,

    #[validate(length(min = 4, max = 20, message = "invalid_registration_number"))]
    #[schema(example = "MH12AB1234")]
    pub registration_number: String,

    #[validate(length(equal = 17, message = "invalid_vin"))]
    pub vin: Option<String>,

    #[validate(range(min = 1950, max = 2100, message = "invalid_year"))]
    pub manufacture_year: Option<i32>,

    #[validate(length(max = 50, message = "too_long"))]
    pub color: Option<String>,

    pub fuel_type: FuelType,

    #[validate(range(min = 0, message = "invalid_odometer"))]
    pub odometer_km: Option<i32>,
}

impl VehiclePayload {
    /// Placa em maiúsculas e sem espaços, para a unicidade valer.
    pub fn normalized_registration(&self) -> String {
        self.registration_number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect::<String>()
            .to_uppercase()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VehicleSearch {
    pub customer_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub fuel_type: Option<FuelType>,
    pub registration: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registration_is_normalized() {
        let payload: VehiclePayload = serde_json::from_value(json!({
            "customerId": Uuid::new_v4(),
            "model": "Swift",
            "registrationNumber": "mh 12-ab 1234",
            "fuelType": "PETROL"
        }))
        .unwrap();

        assert_eq!(payload.normalized_registration(), "MH12AB1234");
    }

    #[test]
    fn unknown_fuel_type_is_rejected() {
        let raw = json!({
            "customerId": Uuid::new_v4(),
            "model": "Swift",
            "registrationNumber": "MH12AB1234",
            "fuelType": "STEAM"
        });
        assert!(serde_json::from_value::<VehiclePayload>(raw).is_err());
    }

    #[test]
    fn customer_requires_phone() {
        let payload: CustomerPayload = serde_json::from_value(json!({
            "fullName": "Sneha",
            "phone": "12"
        }))
        .unwrap();

        assert!(payload.validate().unwrap_err().field_errors().contains_key("phone"));
    }
}
