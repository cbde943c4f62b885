// src/models/address.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::crud::{Resource, TenantScoped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "address_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    Home,
    Work,
    Billing,
    Shipping,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub garage_id: Uuid,

    #[schema(example = "Plot 12, MIDC Bhosari")]
    pub line1: String,
    pub line2: Option<String>,
    pub landmark: Option<String>,

    #[schema(example = "Pune")]
    pub city: String,
    #[schema(example = "MH")]
    pub state: String,
    #[schema(example = "411001")]
    pub postal_code: String,
    #[schema(example = "India")]
    pub country: String,

    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Address {
    const TABLE: &'static str = "addresses";
    const ENTITY: &'static str = "Address";
}

impl TenantScoped for Address {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

// Criação e atualização (sobrescreve todos os campos mutáveis)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[validate(length(min = 1, max = 255, message = "required"))]
    #[schema(example = "Plot 12, MIDC Bhosari")]
    pub line1: String,

    #[validate(length(max = 255, message = "too_long"))]
    pub line2: Option<String>,

    #[validate(length(max = 255, message = "too_long"))]
    pub landmark: Option<String>,

    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "Pune")]
    pub city: String,

    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "MH")]
    pub state: String,

    #[validate(length(min = 3, max = 20, message = "invalid_postal_code"))]
    #[schema(example = "411001")]
    pub postal_code: String,

    #[validate(length(min = 1, max = 100, message = "invalid_country"))]
    #[schema(example = "India")]
    pub country: Option<String>,

    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AddressSearch {
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

// Vínculo cliente/filial -> endereço
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkAddressPayload {
    #[validate(nested)]
    pub address: AddressPayload,

    pub address_type: AddressType,

    #[serde(default)]
    pub is_primary: bool,
}

/// Endereço com os dados do vínculo (tipo e se é principal).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAddress {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub address: Address,

    pub address_type: AddressType,
    pub is_primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> serde_json::Value {
        json!({
            "line1": "Plot 12, MIDC Bhosari",
            "city": "Pune",
            "state": "MH",
            "postalCode": "411001"
        })
    }

    #[test]
    fn accepts_minimal_address() {
        let payload: AddressPayload = serde_json::from_value(valid_payload()).unwrap();
        assert!(payload.validate().is_ok());
        assert!(payload.country.is_none());
    }

    #[test]
    fn rejects_blank_city() {
        let mut raw = valid_payload();
        raw["city"] = json!("");
        let payload: AddressPayload = serde_json::from_value(raw).unwrap();

        let errors = payload.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("city"));
    }

    #[test]
    fn nested_address_is_validated_when_linking() {
        let mut address = valid_payload();
        address["postalCode"] = json!("1");
        let payload: LinkAddressPayload = serde_json::from_value(json!({
            "address": address,
            "addressType": "HOME"
        }))
        .unwrap();

        assert!(payload.validate().is_err());
        assert!(!payload.is_primary);
    }

    // A oficina vem sempre da sessão: o payload não tem onde guardar `garageId`.
    // O padrão sem `..` deixa de compilar se alguém acrescentar o campo.
    #[test]
    fn client_garage_id_is_dropped() {
        let mut raw = valid_payload();
        raw["garageId"] = json!(Uuid::new_v4());

        let AddressPayload {
            line1,
            line2: _,
            landmark: _,
            city: _,
            state: _,
            postal_code: _,
            country: _,
            latitude: _,
            longitude: _,
        } = serde_json::from_value(raw).unwrap();

        assert_eq!(line1, "Plot 12, MIDC Bhosari");
    }

    #[test]
    fn unknown_address_type_is_rejected() {
        let raw = json!({ "address": valid_payload(), "addressType": "BEACH_HOUSE" });
        assert!(serde_json::from_value::<LinkAddressPayload>(raw).is_err());
    }
}
