// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    crud::{Resource, SoftDelete, TenantScoped},
    error::AppError,
};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodType {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Cheque,
    Wallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "bank_account_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankAccountType {
    Savings,
    Current,
}

// --- Formas de pagamento ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    pub garage_id: Uuid,

    #[schema(example = "PhonePe UPI")]
    pub name: String,
    pub method_type: PaymentMethodType,
    pub details: Option<String>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for PaymentMethod {
    const TABLE: &'static str = "payment_methods";
    const ENTITY: &'static str = "PaymentMethod";
}

impl TenantScoped for PaymentMethod {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

impl SoftDelete for PaymentMethod {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodPayload {
    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "PhonePe UPI")]
    pub name: String,

    pub method_type: PaymentMethodType,

    #[validate(length(max = 500, message = "too_long"))]
    #[schema(example = "patilauto@ybl")]
    pub details: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaymentMethodFilter {
    #[serde(default)]
    pub active_only: bool,
}

// --- Contas bancárias ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: Uuid,
    pub garage_id: Uuid,

    pub account_holder_name: String,
    #[schema(example = "HDFC Bank")]
    pub bank_name: String,
    #[schema(example = "50100012345678")]
    pub account_number: String,
    #[schema(example = "HDFC0001234")]
    pub ifsc_code: String,
    pub branch_name: Option<String>,
    pub account_type: BankAccountType,
    pub is_primary: bool,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for BankAccount {
    const TABLE: &'static str = "bank_accounts";
    const ENTITY: &'static str = "BankAccount";
}

impl TenantScoped for BankAccount {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

impl SoftDelete for BankAccount {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountPayload {
    #[validate(length(min = 1, max = 150, message = "required"))]
    pub account_holder_name: String,

    #[validate(length(min = 1, max = 150, message = "required"))]
    #[schema(example = "HDFC Bank")]
    pub bank_name: String,

    #[validate(length(min = 6, max = 34, message = "invalid_account_number"))]
    #[schema(example = "50100012345678")]
    pub account_number: String,

    #[validate(length(equal = 11, message = "invalid_ifsc_code"))]
    #[schema(example = "HDFC0001234")]
    pub ifsc_code: String,

    #[validate(length(max = 150, message = "too_long"))]
    pub branch_name: Option<String>,

    pub account_type: BankAccountType,

    #[serde(default)]
    pub is_primary: bool,
}

// --- Fotografia financeira diária ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub id: Uuid,
    pub garage_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-01-15")]
    pub snapshot_date: NaiveDate,

    #[schema(example = "45230.50")]
    pub total_revenue: Decimal,
    pub total_tax_collected: Decimal,
    pub quotations_created: i64,
    pub quotations_approved: i64,
    pub new_customers: i64,
    pub services_completed: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for DailySnapshot {
    const TABLE: &'static str = "daily_snapshots";
    const ENTITY: &'static str = "DailySnapshot";
}

impl TenantScoped for DailySnapshot {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

/// Totais de um período (soma das fotografias diárias).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub days: i64,
    pub total_revenue: Decimal,
    pub total_tax_collected: Decimal,
    pub quotations_created: i64,
    pub quotations_approved: i64,
    pub new_customers: i64,
    pub services_completed: i64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SnapshotDateQuery {
    /// Padrão: hoje
    #[param(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}

/// `?from=2025-01-01&to=2025-01-31` (inclusivo)
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    #[param(value_type = String, format = Date)]
    pub from: NaiveDate,
    #[param(value_type = String, format = Date)]
    pub to: NaiveDate,
}

impl DateRangeQuery {
    pub fn validated(self) -> Result<Self, AppError> {
        if self.from > self.to {
            return Err(AppError::BusinessRule("invalid_date_range"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_is_rejected() {
        let range = DateRangeQuery {
            from: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };

        assert!(matches!(
            range.validated(),
            Err(AppError::BusinessRule("invalid_date_range"))
        ));
    }

    #[test]
    fn single_day_range_is_valid() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(DateRangeQuery { from: day, to: day }.validated().is_ok());
    }

    #[test]
    fn ifsc_must_have_eleven_characters() {
        let payload: BankAccountPayload = serde_json::from_value(serde_json::json!({
            "accountHolderName": "Patil Auto Works",
            "bankName": "HDFC Bank",
            "accountNumber": "50100012345678",
            "ifscCode": "HDFC01",
            "accountType": "CURRENT"
        }))
        .unwrap();

        assert!(payload.validate().unwrap_err().field_errors().contains_key("ifsc_code"));
    }
}
