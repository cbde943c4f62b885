// src/services/loyalty_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        crud::{self, TenantScoped},
        error::AppError,
    },
    db::LoyaltyRepository,
    middleware::tenancy::SessionContext,
    models::{
        customer::Customer,
        loyalty::{EnrollPayload, LoyaltyProgram, LoyaltySummary, LoyaltyTier},
    },
};

/// Novo saldo, novo acumulado e faixa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsUpdate {
    pub points_balance: i64,
    pub lifetime_points: i64,
    pub tier: LoyaltyTier,
}

pub fn earn(program: &LoyaltyProgram, points: i64) -> PointsUpdate {
    let lifetime_points = program.lifetime_points + points;
    PointsUpdate {
        points_balance: program.points_balance + points,
        lifetime_points,
        tier: LoyaltyTier::for_lifetime_points(lifetime_points),
    }
}

/// Resgate não mexe no acumulado (a faixa não cai).
pub fn redeem(program: &LoyaltyProgram, points: i64) -> Result<PointsUpdate, AppError> {
    if points > program.points_balance {
        return Err(AppError::BusinessRule("insufficient_points"));
    }
    Ok(PointsUpdate {
        points_balance: program.points_balance - points,
        lifetime_points: program.lifetime_points,
        tier: program.tier,
    })
}

/// Inscrição de um cliente que já teve programa: ativo é duplicado; excluído
/// volta com o histórico e os pontos iniciais creditados. `None` = inscrição nova.
pub fn reenrollment(existing: Option<&LoyaltyProgram>, initial_points: i64) -> Result<Option<PointsUpdate>, AppError> {
    match existing {
        None => Ok(None),
        Some(program) if program.is_active => Err(AppError::DuplicateKey("customer_id".to_string())),
        Some(program) => Ok(Some(earn(program, initial_points))),
    }
}

#[derive(Clone)]
pub struct LoyaltyService {
    repo: LoyaltyRepository,
    pool: PgPool,
}

impl LoyaltyService {
    pub fn new(repo: LoyaltyRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn enroll(&self, session: &SessionContext, payload: &EnrollPayload) -> Result<LoyaltyProgram, AppError> {
        crud::fetch_owned::<Customer, _>(&self.pool, payload.customer_id, session.garage_id).await?;

        let mut tx = self.pool.begin().await?;
        let existing = self
            .repo
            .lock_by_customer(&mut *tx, session.garage_id, payload.customer_id)
            .await?;

        let program = match reenrollment(existing.as_ref(), payload.initial_points)? {
            None => {
                self.repo
                    .enroll(&mut *tx, session.garage_id, payload.customer_id, payload.initial_points)
                    .await?
            }
            Some(update) => {
                let id = existing.as_ref().map(|p| p.id).ok_or(AppError::NotFound("LoyaltyProgram"))?;
                let program = self
                    .repo
                    .reactivate(&mut *tx, id, update.points_balance, update.lifetime_points, update.tier)
                    .await?;
                tracing::info!("⭐ Programa {} reativado", program.id);
                program
            }
        };
        tx.commit().await?;
        Ok(program)
    }

    pub async fn get(&self, session: &SessionContext, id: Uuid) -> Result<LoyaltyProgram, AppError> {
        crud::fetch_visible::<LoyaltyProgram, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn by_customer(&self, session: &SessionContext, customer_id: Uuid) -> Result<LoyaltyProgram, AppError> {
        self.repo
            .find_by_customer(session.garage_id, customer_id)
            .await?
            .ok_or(AppError::NotFound("LoyaltyProgram"))
    }

    pub async fn list(&self, session: &SessionContext) -> Result<Vec<LoyaltyProgram>, AppError> {
        self.repo.list_active(session.garage_id).await
    }

    pub async fn earn_points(&self, session: &SessionContext, id: Uuid, points: i64) -> Result<LoyaltyProgram, AppError> {
        self.apply(session, id, |program| Ok(earn(program, points))).await
    }

    pub async fn redeem_points(
        &self,
        session: &SessionContext,
        id: Uuid,
        points: i64,
    ) -> Result<LoyaltyProgram, AppError> {
        self.apply(session, id, |program| redeem(program, points)).await
    }

    // Lê com FOR UPDATE, calcula e grava na mesma transação
    async fn apply<F>(&self, session: &SessionContext, id: Uuid, change: F) -> Result<LoyaltyProgram, AppError>
    where
        F: FnOnce(&LoyaltyProgram) -> Result<PointsUpdate, AppError>,
    {
        let mut tx = self.pool.begin().await?;

        let program = self
            .repo
            .lock(&mut *tx, id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(AppError::NotFound("LoyaltyProgram"))?;
        if program.garage_id() != session.garage_id {
            return Err(AppError::OwnershipViolation("LoyaltyProgram"));
        }

        let update = change(&program)?;
        let saved = self
            .repo
            .save_points(
                &mut *tx,
                id,
                update.points_balance,
                update.lifetime_points,
                update.tier,
            )
            .await?;
        tx.commit().await?;

        if saved.tier != program.tier {
            tracing::info!("⭐ Programa {} subiu para {:?}", saved.id, saved.tier);
        }
        Ok(saved)
    }

    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<LoyaltyProgram, _>(&mut *tx, id, session.garage_id).await?;
        crud::set_active::<LoyaltyProgram, _>(&mut *tx, id, false).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn summary(&self, session: &SessionContext) -> Result<LoyaltySummary, AppError> {
        self.repo.summary(session.garage_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn program(balance: i64, lifetime: i64) -> LoyaltyProgram {
        LoyaltyProgram {
            id: Uuid::new_v4(),
            garage_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            points_balance: balance,
            lifetime_points: lifetime,
            tier: LoyaltyTier::for_lifetime_points(lifetime),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn earning_raises_balance_lifetime_and_tier() {
        let update = earn(&program(900, 900), 200);

        assert_eq!(update.points_balance, 1100);
        assert_eq!(update.lifetime_points, 1100);
        assert_eq!(update.tier, LoyaltyTier::Silver);
    }

    #[test]
    fn redeeming_keeps_lifetime_and_tier() {
        let update = redeem(&program(5200, 5200), 5000).unwrap();

        assert_eq!(update.points_balance, 200);
        assert_eq!(update.lifetime_points, 5200);
        assert_eq!(update.tier, LoyaltyTier::Gold);
    }

    #[test]
    fn redeeming_more_than_balance_fails() {
        let err = redeem(&program(100, 3000), 101).unwrap_err();
        assert!(matches!(err, AppError::BusinessRule("insufficient_points")));
    }

    #[test]
    fn first_enrollment_inserts_a_new_program() {
        assert_eq!(reenrollment(None, 50).unwrap(), None);
    }

    #[test]
    fn enrolling_an_active_member_again_is_a_duplicate() {
        let err = reenrollment(Some(&program(10, 10)), 0).unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(field) if field == "customer_id"));
    }

    #[test]
    fn enrolling_after_removal_reactivates_with_history() {
        let mut removed = program(300, 4900);
        removed.is_active = false;

        let update = reenrollment(Some(&removed), 200).unwrap().unwrap();

        assert_eq!(update.points_balance, 500);
        assert_eq!(update.lifetime_points, 5100);
        assert_eq!(update.tier, LoyaltyTier::Gold);
    }

    #[test]
    fn redeeming_the_whole_balance_is_allowed() {
        assert_eq!(redeem(&program(100, 100), 100).unwrap().points_balance, 0);
    }
}
