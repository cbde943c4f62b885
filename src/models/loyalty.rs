// src/models/loyalty.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::crud::{Resource, SoftDelete, TenantScoped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loyalty_tier", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    /// Faixa pelo total de pontos já acumulados (resgates não rebaixam).
    pub fn for_lifetime_points(points: i64) -> Self {
        match points {
            p if p >= 10_000 => LoyaltyTier::Platinum,
            p if p >= 5_000 => LoyaltyTier::Gold,
            p if p >= 1_000 => LoyaltyTier::Silver,
            _ => LoyaltyTier::Bronze,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyProgram {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub customer_id: Uuid,

    pub points_balance: i64,
    pub lifetime_points: i64,
    pub tier: LoyaltyTier,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for LoyaltyProgram {
    const TABLE: &'static str = "loyalty_programs";
    const ENTITY: &'static str = "LoyaltyProgram";
}

impl TenantScoped for LoyaltyProgram {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

impl SoftDelete for LoyaltyProgram {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollPayload {
    pub customer_id: Uuid,

    /// Pontos de boas-vindas
    #[serde(default)]
    #[validate(range(min = 0, max = 100000, message = "invalid_points"))]
    pub initial_points: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointsPayload {
    #[validate(range(min = 1, max = 100000, message = "invalid_points"))]
    #[schema(example = 250)]
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySummary {
    pub members: i64,
    pub total_points_balance: i64,
    pub total_lifetime_points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, LoyaltyTier::Bronze)]
    #[case(999, LoyaltyTier::Bronze)]
    #[case(1_000, LoyaltyTier::Silver)]
    #[case(4_999, LoyaltyTier::Silver)]
    #[case(5_000, LoyaltyTier::Gold)]
    #[case(10_000, LoyaltyTier::Platinum)]
    fn tier_thresholds(#[case] points: i64, #[case] tier: LoyaltyTier) {
        assert_eq!(LoyaltyTier::for_lifetime_points(points), tier);
    }

    #[test]
    fn zero_points_cannot_be_earned() {
        let payload = PointsPayload { points: 0 };
        assert!(payload.validate().is_err());
    }
}
