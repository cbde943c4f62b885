// src/models/catalog.rs
//
// Dados de referência globais (sem oficina): impostos e marcas de veículos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::crud::{Resource, SoftDelete};

// --- IMPOSTOS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tax_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxType {
    Gst,
    Cgst,
    Sgst,
    Igst,
    Vat,
    ServiceTax,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tax {
    pub id: Uuid,

    #[schema(example = "GST18")]
    pub tax_code: String,
    #[schema(example = "GST 18%")]
    pub name: String,
    #[schema(example = "18.00")]
    pub rate: Decimal,
    pub tax_type: TaxType,
    pub description: Option<String>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Tax {
    const TABLE: &'static str = "taxes";
    const ENTITY: &'static str = "Tax";
}

impl SoftDelete for Tax {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxPayload {
    #[validate(length(min = 2, max = 30, message = "invalid_tax_code"))]
    #[schema(example = "GST18")]
    pub tax_code: String,

    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "GST 18%")]
    pub name: String,

    #[validate(custom(function = "validate_rate"))]
    #[schema(example = "18.00")]
    pub rate: Decimal,

    pub tax_type: TaxType,

    pub description: Option<String>,
}

fn validate_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if rate.is_sign_negative() || *rate > Decimal::ONE_HUNDRED {
        let mut error = ValidationError::new("range");
        error.message = Some("invalid_rate".into());
        return Err(error);
    }
    Ok(())
}

// --- MARCAS DE VEÍCULOS ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleBrand {
    pub id: Uuid,

    #[schema(example = "Maruti Suzuki")]
    pub name: String,
    #[schema(example = "India")]
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for VehicleBrand {
    const TABLE: &'static str = "vehicle_brands";
    const ENTITY: &'static str = "VehicleBrand";
}

impl SoftDelete for VehicleBrand {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleBrandPayload {
    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "Maruti Suzuki")]
    pub name: String,

    #[validate(length(max = 100, message = "too_long"))]
    pub country: Option<String>,

    #[validate(url(message = "invalid_url"))]
    pub logo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BrandSearch {
    pub name: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("18", true)]
    #[case("0", true)]
    #[case("100", true)]
    #[case("-1", false)]
    #[case("100.01", false)]
    fn tax_rate_must_be_a_percentage(#[case] rate: &str, #[case] valid: bool) {
        let payload: TaxPayload = serde_json::from_value(json!({
            "taxCode": "GST18",
            "name": "GST",
            "rate": rate.parse::<f64>().unwrap(),
            "taxType": "GST"
        }))
        .unwrap();

        assert_eq!(payload.validate().is_ok(), valid);
    }
}
