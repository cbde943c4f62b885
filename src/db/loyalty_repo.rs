// src/db/loyalty_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::loyalty::{LoyaltyProgram, LoyaltySummary, LoyaltyTier},
};

#[derive(Clone)]
pub struct LoyaltyRepository {
    pool: PgPool,
}

impl LoyaltyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn enroll<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        customer_id: Uuid,
        initial_points: i64,
    ) -> Result<LoyaltyProgram, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LoyaltyProgram>(
            r#"
            INSERT INTO loyalty_programs (garage_id, customer_id, points_balance, lifetime_points, tier)
            VALUES ($1, $2, $3, $3, $4)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(customer_id)
        .bind(initial_points)
        .bind(LoyaltyTier::for_lifetime_points(initial_points))
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "customer_id"))
    }

    /// Grava saldo, acumulado e faixa já calculados pelo serviço.
    pub async fn save_points<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        points_balance: i64,
        lifetime_points: i64,
        tier: LoyaltyTier,
    ) -> Result<LoyaltyProgram, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LoyaltyProgram>(
            r#"
            UPDATE loyalty_programs SET
                points_balance = $2, lifetime_points = $3, tier = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(points_balance)
        .bind(lifetime_points)
        .bind(tier)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("LoyaltyProgram"))
    }

    /// Volta a ativar um programa excluído, com os pontos já calculados.
    pub async fn reactivate<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        points_balance: i64,
        lifetime_points: i64,
        tier: LoyaltyTier,
    ) -> Result<LoyaltyProgram, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LoyaltyProgram>(
            r#"
            UPDATE loyalty_programs SET
                is_active = TRUE, points_balance = $2, lifetime_points = $3, tier = $4,
                updated_at = NOW()
            WHERE id = $1 AND NOT is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(points_balance)
        .bind(lifetime_points)
        .bind(tier)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::DuplicateKey("customer_id".to_string()))
    }

    /// Programa do cliente (ativo ou não), travado até o fim da transação.
    pub async fn lock_by_customer<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<LoyaltyProgram>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let program = sqlx::query_as::<_, LoyaltyProgram>(
            "SELECT * FROM loyalty_programs WHERE garage_id = $1 AND customer_id = $2 FOR UPDATE",
        )
        .bind(garage_id)
        .bind(customer_id)
        .fetch_optional(executor)
        .await?;
        Ok(program)
    }

    /// Trava a linha até o fim da transação (ganho/resgate concorrentes).
    pub async fn lock<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<LoyaltyProgram>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let program = sqlx::query_as::<_, LoyaltyProgram>(
            "SELECT * FROM loyalty_programs WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(program)
    }

    pub async fn find_by_customer(
        &self,
        garage_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<LoyaltyProgram>, AppError> {
        let program = sqlx::query_as::<_, LoyaltyProgram>(
            "SELECT * FROM loyalty_programs WHERE garage_id = $1 AND customer_id = $2 AND is_active",
        )
        .bind(garage_id)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(program)
    }

    pub async fn list_active(&self, garage_id: Uuid) -> Result<Vec<LoyaltyProgram>, AppError> {
        let programs = sqlx::query_as::<_, LoyaltyProgram>(
            "SELECT * FROM loyalty_programs WHERE garage_id = $1 AND is_active ORDER BY created_at ASC",
        )
        .bind(garage_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(programs)
    }

    /// Totais dos membros ativos.
    pub async fn summary(&self, garage_id: Uuid) -> Result<LoyaltySummary, AppError> {
        let summary = sqlx::query_as::<_, LoyaltySummary>(
            r#"
            SELECT
                COUNT(*) AS members,
                COALESCE(SUM(points_balance), 0)::BIGINT AS total_points_balance,
                COALESCE(SUM(lifetime_points), 0)::BIGINT AS total_lifetime_points
            FROM loyalty_programs
            WHERE garage_id = $1 AND is_active
            "#,
        )
        .bind(garage_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }
}
