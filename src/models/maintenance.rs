// src/models/maintenance.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::crud::{Resource, TenantScoped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "maintenance_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    Scheduled,
    Reminded,
    Completed,
    Cancelled,
    Overdue,
}

impl MaintenanceStatus {
    pub fn is_open(self) -> bool {
        matches!(
            self,
            MaintenanceStatus::Scheduled | MaintenanceStatus::Reminded | MaintenanceStatus::Overdue
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,

    #[schema(example = "Revisão 10.000 km")]
    pub service_type: String,
    pub description: Option<String>,

    #[schema(value_type = String, format = Date, example = "2025-03-10")]
    pub scheduled_date: NaiveDate,
    pub due_odometer_km: Option<i32>,
    pub status: MaintenanceStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for MaintenanceSchedule {
    const TABLE: &'static str = "maintenance_schedules";
    const ENTITY: &'static str = "MaintenanceSchedule";
}

impl TenantScoped for MaintenanceSchedule {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePayload {
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "Revisão 10.000 km")]
    pub service_type: String,

    pub description: Option<String>,

    #[schema(value_type = String, format = Date, example = "2025-03-10")]
    pub scheduled_date: NaiveDate,

    #[validate(range(min = 0, message = "invalid_odometer"))]
    pub due_odometer_km: Option<i32>,

    /// Ignorado na criação (sempre SCHEDULED).
    pub status: Option<MaintenanceStatus>,

    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MaintenanceSearch {
    pub status: Option<MaintenanceStatus>,
    pub vehicle_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingQuery {
    /// Janela em dias a partir de hoje (padrão 7, máximo 365)
    pub days: Option<i64>,
}

impl UpcomingQuery {
    pub fn window_days(&self) -> i64 {
        self.days.unwrap_or(7).clamp(0, 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 7)]
    #[case(Some(30), 30)]
    #[case(Some(-4), 0)]
    #[case(Some(9999), 365)]
    fn upcoming_window_is_clamped(#[case] days: Option<i64>, #[case] expected: i64) {
        assert_eq!(UpcomingQuery { days }.window_days(), expected);
    }

    #[test]
    fn completed_and_cancelled_are_closed() {
        assert!(MaintenanceStatus::Scheduled.is_open());
        assert!(!MaintenanceStatus::Completed.is_open());
        assert!(!MaintenanceStatus::Cancelled.is_open());
    }
}
