// src/models/otp.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::crud::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "otp_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpType {
    EmailVerification,
    PhoneVerification,
    PasswordReset,
    Login,
}

/// Código de uso único. `user_id` é opcional (fluxos de pré-cadastro).
#[derive(Debug, Clone, FromRow)]
pub struct OtpCode {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub target: String,
    pub code: String,
    pub otp_type: OtpType,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

impl Resource for OtpCode {
    const TABLE: &'static str = "otp_codes";
    const ENTITY: &'static str = "OtpCode";
}

impl OtpCode {
    /// Válido enquanto não usado e antes de expirar. Nunca é persistido.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpPayload {
    /// E-mail ou telefone
    #[validate(length(min = 3, max = 255, message = "required"))]
    #[schema(example = "owner@garage.in")]
    pub target: String,

    pub otp_type: OtpType,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpPayload {
    #[validate(length(min = 3, max = 255, message = "required"))]
    pub target: String,

    pub otp_type: OtpType,

    #[validate(length(equal = 6, message = "invalid_code"))]
    #[schema(example = "482913")]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpIssued {
    pub target: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OtpVerified {
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code(is_used: bool, expires_in: Duration) -> OtpCode {
        let now = Utc::now();
        OtpCode {
            id: Uuid::new_v4(),
            user_id: None,
            target: "owner@garage.in".into(),
            code: "123456".into(),
            otp_type: OtpType::Login,
            expires_at: now + expires_in,
            is_used,
            created_at: now,
        }
    }

    #[test]
    fn unused_and_not_expired_is_valid() {
        assert!(code(false, Duration::minutes(5)).is_valid());
    }

    #[test]
    fn expired_code_is_invalid() {
        assert!(!code(false, Duration::seconds(-1)).is_valid());
    }

    #[test]
    fn used_code_stays_invalid_regardless_of_expiry() {
        let otp = code(true, Duration::days(365));
        assert!(!otp.is_valid());
        assert!(!otp.is_valid_at(otp.created_at));
    }

    #[test]
    fn expiry_instant_itself_is_invalid() {
        let otp = code(false, Duration::minutes(5));
        assert!(!otp.is_valid_at(otp.expires_at));
    }
}
