// src/models/staff.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    crud::{Resource, SoftDelete, TenantScoped},
    pagination::{PageInfo, PageRequest},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "staff_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Owner,
    Manager,
    ServiceAdvisor,
    Mechanic,
    Accountant,
    Receptionist,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub user_id: Option<Uuid>,

    #[schema(example = "Amit")]
    pub first_name: String,
    #[schema(example = "Deshmukh")]
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub employee_code: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2024-04-01")]
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Staff {
    const TABLE: &'static str = "staff";
    const ENTITY: &'static str = "Staff";
}

impl TenantScoped for Staff {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

impl SoftDelete for Staff {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffPayload {
    pub branch_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "Amit")]
    pub first_name: String,

    #[validate(length(max = 100, message = "too_long"))]
    pub last_name: Option<String>,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "amit@garage.in")]
    pub email: String,

    #[validate(length(min = 6, max = 20, message = "invalid_phone"))]
    pub phone: Option<String>,

    pub role: StaffRole,

    #[validate(length(max = 30, message = "too_long"))]
    pub employee_code: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2024-04-01")]
    pub hire_date: Option<NaiveDate>,

    pub salary: Option<Decimal>,

    /// Só é considerado na atualização.
    pub is_active: Option<bool>,
}

/// `GET /admin/staff?page=0&size=20&role=MECHANIC`
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StaffQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<StaffRole>,
}

impl StaffQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffPage {
    pub content: Vec<Staff>,
    #[serde(flatten)]
    pub page: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn staff_requires_a_known_role() {
        let raw = json!({ "firstName": "Amit", "email": "amit@garage.in", "role": "JANITOR" });
        assert!(serde_json::from_value::<StaffPayload>(raw).is_err());
    }

    #[test]
    fn client_garage_id_is_dropped() {
        let raw = json!({
            "garageId": Uuid::new_v4(),
            "firstName": "Amit",
            "email": "amit@garage.in",
            "role": "MECHANIC"
        });

        let StaffPayload {
            branch_id: _,
            first_name,
            last_name: _,
            email: _,
            phone: _,
            role,
            employee_code: _,
            hire_date: _,
            salary: _,
            is_active: _,
        } = serde_json::from_value(raw).unwrap();

        assert_eq!(first_name, "Amit");
        assert_eq!(role, StaffRole::Mechanic);
    }

    #[test]
    fn staff_page_flattens_page_info() {
        let page = StaffPage {
            content: vec![],
            page: PageInfo::new(&PageRequest { page: Some(0), size: Some(20) }, 0),
        };

        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["size"], 20);
        assert_eq!(json["totalElements"], 0);
    }
}
