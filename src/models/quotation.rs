// src/models/quotation.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::{
    crud::{Resource, TenantScoped},
    error::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quotation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotationStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    Expired,
    Converted,
}

impl QuotationStatus {
    pub fn can_transition_to(self, next: QuotationStatus) -> bool {
        use QuotationStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Draft, Expired)
                | (Sent, Approved)
                | (Sent, Rejected)
                | (Sent, Expired)
                | (Approved, Converted)
        )
    }

    /// O dia da receita é o da aprovação.
    pub fn stamps_approval(self) -> bool {
        self == QuotationStatus::Approved
    }
}

/// Linha do orçamento (peça ou mão de obra), guardada em JSONB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLine {
    #[schema(example = "Troca de óleo 5W-30")]
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,

    #[schema(example = "QT-20250115-1A2B3C4D")]
    pub quotation_number: String,
    pub status: QuotationStatus,

    #[schema(value_type = Vec<QuotationLine>)]
    pub items: Json<Vec<QuotationLine>>,

    pub tax_id: Option<Uuid>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,

    #[schema(value_type = Option<String>, format = Date, example = "2025-02-15")]
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,

    /// Carimbado na transição para APPROVED; não muda na conversão.
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Quotation {
    const TABLE: &'static str = "quotations";
    const ENTITY: &'static str = "Quotation";
}

impl TenantScoped for Quotation {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLinePayload {
    #[validate(length(min = 1, max = 255, message = "required"))]
    pub description: String,

    #[validate(custom(function = "valid_quantity"))]
    #[schema(example = "1")]
    pub quantity: Decimal,

    #[validate(custom(function = "valid_amount"))]
    #[schema(example = "1450.00")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPayload {
    pub branch_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, message = "at_least_one_item"), nested)]
    pub items: Vec<QuotationLinePayload>,

    pub tax_id: Option<Uuid>,

    #[validate(custom(function = "valid_amount"))]
    pub discount_amount: Option<Decimal>,

    #[schema(value_type = Option<String>, format = Date, example = "2025-02-15")]
    pub valid_until: Option<NaiveDate>,

    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationStatusPayload {
    pub status: QuotationStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct QuotationSearch {
    pub status: Option<QuotationStatus>,
    pub customer_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub number: Option<String>,
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}

/// Teto das colunas `NUMERIC(12, 2)` dos orçamentos.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

fn range_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("range");
    error.message = Some(message.into());
    error
}

fn valid_quantity(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(range_error("must_be_positive"));
    }
    if *value > MAX_QUANTITY {
        return Err(range_error("amount_out_of_range"));
    }
    Ok(())
}

fn valid_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(range_error("must_not_be_negative"));
    }
    if *value > MAX_AMOUNT {
        return Err(range_error("amount_out_of_range"));
    }
    Ok(())
}

/// Valores calculados de um orçamento.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationTotals {
    pub lines: Vec<QuotationLine>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Subtotal das linhas, menos desconto, mais imposto (percentual) sobre o valor líquido.
/// Estouro aritmético ou total acima de `MAX_AMOUNT` vira `amount_out_of_range`.
pub fn compute_totals(
    items: &[QuotationLinePayload],
    discount: Option<Decimal>,
    tax_rate: Option<Decimal>,
) -> Result<QuotationTotals, AppError> {
    const OUT_OF_RANGE: AppError = AppError::BusinessRule("amount_out_of_range");

    let mut lines = Vec::with_capacity(items.len());
    let mut subtotal = Decimal::ZERO;
    for item in items {
        let line_total = item
            .quantity
            .checked_mul(item.unit_price)
            .ok_or(OUT_OF_RANGE)?
            .round_dp(2);
        subtotal = subtotal.checked_add(line_total).ok_or(OUT_OF_RANGE)?;
        lines.push(QuotationLine {
            description: item.description.trim().to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total,
        });
    }

    if subtotal > MAX_AMOUNT {
        return Err(OUT_OF_RANGE);
    }

    let discount_amount = discount.unwrap_or(Decimal::ZERO).round_dp(2);
    if discount_amount > subtotal {
        return Err(AppError::BusinessRule("invalid_discount"));
    }

    let taxable = subtotal - discount_amount;
    let tax_amount = match tax_rate {
        Some(rate) => taxable
            .checked_mul(rate)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .ok_or(OUT_OF_RANGE)?
            .round_dp(2),
        None => Decimal::ZERO,
    };

    let total_amount = taxable.checked_add(tax_amount).ok_or(OUT_OF_RANGE)?;
    if total_amount > MAX_AMOUNT {
        return Err(OUT_OF_RANGE);
    }

    Ok(QuotationTotals {
        lines,
        subtotal,
        discount_amount,
        tax_amount,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn line(description: &str, quantity: &str, unit_price: &str) -> QuotationLinePayload {
        QuotationLinePayload {
            description: description.to_string(),
            quantity: dec(quantity),
            unit_price: dec(unit_price),
        }
    }

    #[test]
    fn totals_apply_discount_before_tax() {
        let items = vec![line("Oil change", "1", "1450.00"), line("Filter", "2", "275.50")];

        let totals = compute_totals(&items, Some(dec("1.00")), Some(dec("18"))).unwrap();

        assert_eq!(totals.subtotal, dec("2001.00"));
        assert_eq!(totals.tax_amount, dec("360.00"));
        assert_eq!(totals.total_amount, dec("2360.00"));
        assert_eq!(totals.lines[1].line_total, dec("551.00"));
    }

    #[test]
    fn no_tax_means_zero_tax() {
        let totals = compute_totals(&[line("Wash", "1", "300")], None, None).unwrap();

        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total_amount, dec("300"));
    }

    #[test]
    fn discount_larger_than_subtotal_is_rejected() {
        let result = compute_totals(&[line("Wash", "1", "300")], Some(dec("301")), None);

        assert!(matches!(result, Err(AppError::BusinessRule("invalid_discount"))));
    }

    #[test]
    fn huge_lines_are_out_of_range_instead_of_overflowing() {
        let items = vec![line("Frota", "100000000000000", "100000000000000000")];

        let result = compute_totals(&items, None, Some(dec("18")));

        assert!(matches!(result, Err(AppError::BusinessRule("amount_out_of_range"))));
    }

    #[test]
    fn totals_above_the_column_limit_are_rejected() {
        let items = vec![line("Motor", "100000", "9999999999.99")];

        let result = compute_totals(&items, None, None);

        assert!(matches!(result, Err(AppError::BusinessRule("amount_out_of_range"))));
    }

    #[test]
    fn total_at_the_column_limit_is_accepted() {
        let totals = compute_totals(&[line("Motor", "1", "9999999999.99")], None, None).unwrap();

        assert_eq!(totals.total_amount, MAX_AMOUNT);
    }

    #[rstest]
    #[case("100000000000000", "1")]
    #[case("1", "100000000000000000")]
    #[case("0", "1")]
    #[case("1", "-1")]
    fn line_validators_reject_out_of_range_values(#[case] quantity: &str, #[case] unit_price: &str) {
        assert!(line("Peça", quantity, unit_price).validate().is_err());
    }

    #[rstest]
    #[case(QuotationStatus::Draft, QuotationStatus::Sent, true)]
    #[case(QuotationStatus::Sent, QuotationStatus::Approved, true)]
    #[case(QuotationStatus::Approved, QuotationStatus::Converted, true)]
    #[case(QuotationStatus::Draft, QuotationStatus::Approved, false)]
    #[case(QuotationStatus::Rejected, QuotationStatus::Sent, false)]
    #[case(QuotationStatus::Converted, QuotationStatus::Draft, false)]
    fn status_transitions(
        #[case] from: QuotationStatus,
        #[case] to: QuotationStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    #[case(QuotationStatus::Approved, true)]
    #[case(QuotationStatus::Converted, false)]
    #[case(QuotationStatus::Sent, false)]
    fn only_approval_records_the_revenue_day(#[case] next: QuotationStatus, #[case] stamps: bool) {
        assert_eq!(next.stamps_approval(), stamps);
    }

    #[test]
    fn client_garage_id_is_dropped() {
        let customer_id = Uuid::new_v4();
        let raw = serde_json::json!({
            "garageId": Uuid::new_v4(),
            "customerId": customer_id,
            "vehicleId": Uuid::new_v4(),
            "items": [{ "description": "Troca de óleo", "quantity": 1, "unitPrice": 1450.0 }]
        });

        let QuotationPayload {
            branch_id: _,
            customer_id: parsed_customer,
            vehicle_id: _,
            items,
            tax_id: _,
            discount_amount: _,
            valid_until: _,
            notes: _,
        } = serde_json::from_value(raw).unwrap();

        assert_eq!(parsed_customer, customer_id);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn quotation_needs_at_least_one_line() {
        let payload: QuotationPayload = serde_json::from_value(serde_json::json!({
            "customerId": Uuid::new_v4(),
            "vehicleId": Uuid::new_v4(),
            "items": []
        }))
        .unwrap();

        assert!(payload.validate().is_err());
    }
}
