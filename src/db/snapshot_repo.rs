// src/db/snapshot_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{criteria::Criteria, error::AppError},
    models::finance::{DailySnapshot, SnapshotSummary},
};

// Dias contados em UTC. Receita = orçamentos aprovados naquele dia,
// mesmo que depois convertidos.
const UPSERT_SNAPSHOT: &str = r#"
    WITH approved AS (
        SELECT total_amount, tax_amount FROM quotations
        WHERE garage_id = $1
          AND status IN ('APPROVED', 'CONVERTED')
          AND approved_at IS NOT NULL
          AND (approved_at AT TIME ZONE 'UTC')::date = $2
    )
    INSERT INTO daily_snapshots (
        garage_id, snapshot_date, total_revenue, total_tax_collected,
        quotations_created, quotations_approved, new_customers, services_completed
    )
    SELECT
        $1,
        $2,
        COALESCE((SELECT SUM(total_amount) FROM approved), 0),
        COALESCE((SELECT SUM(tax_amount) FROM approved), 0),
        (SELECT COUNT(*) FROM quotations WHERE garage_id = $1 AND (created_at AT TIME ZONE 'UTC')::date = $2),
        (SELECT COUNT(*) FROM approved),
        (SELECT COUNT(*) FROM customers WHERE garage_id = $1 AND (created_at AT TIME ZONE 'UTC')::date = $2),
        (SELECT COUNT(*) FROM maintenance_schedules
          WHERE garage_id = $1 AND status = 'COMPLETED' AND (completed_at AT TIME ZONE 'UTC')::date = $2)
    ON CONFLICT (garage_id, snapshot_date) DO UPDATE SET
        total_revenue = EXCLUDED.total_revenue,
        total_tax_collected = EXCLUDED.total_tax_collected,
        quotations_created = EXCLUDED.quotations_created,
        quotations_approved = EXCLUDED.quotations_approved,
        new_customers = EXCLUDED.new_customers,
        services_completed = EXCLUDED.services_completed,
        updated_at = NOW()
    RETURNING *
"#;

#[derive(Clone)]
pub struct SnapshotRepository {
    pool: PgPool,
}

impl SnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Agrega o movimento do dia e grava (ou regrava) a fotografia.
    pub async fn upsert_for_date<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailySnapshot, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let snapshot = sqlx::query_as::<_, DailySnapshot>(UPSERT_SNAPSHOT)
            .bind(garage_id)
            .bind(date)
            .fetch_one(executor)
            .await?;

        Ok(snapshot)
    }

    pub async fn find_by_date(
        &self,
        garage_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailySnapshot>, AppError> {
        let snapshot = sqlx::query_as::<_, DailySnapshot>(
            "SELECT * FROM daily_snapshots WHERE garage_id = $1 AND snapshot_date = $2",
        )
        .bind(garage_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(snapshot)
    }

    pub async fn list_range(
        &self,
        garage_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailySnapshot>, AppError> {
        Criteria::select("daily_snapshots")
            .scoped(garage_id)
            .between("snapshot_date", Some(from), Some(to))
            .order_by("snapshot_date ASC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn summarize(
        &self,
        garage_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SnapshotSummary, AppError> {
        let summary = sqlx::query_as::<_, SnapshotSummary>(
            r#"
            SELECT
                COUNT(*) AS days,
                COALESCE(SUM(total_revenue), 0) AS total_revenue,
                COALESCE(SUM(total_tax_collected), 0) AS total_tax_collected,
                COALESCE(SUM(quotations_created), 0)::BIGINT AS quotations_created,
                COALESCE(SUM(quotations_approved), 0)::BIGINT AS quotations_approved,
                COALESCE(SUM(new_customers), 0)::BIGINT AS new_customers,
                COALESCE(SUM(services_completed), 0)::BIGINT AS services_completed
            FROM daily_snapshots
            WHERE garage_id = $1 AND snapshot_date BETWEEN $2 AND $3
            "#,
        )
        .bind(garage_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revenue_day_is_the_approval_day_in_utc() {
        assert!(UPSERT_SNAPSHOT.contains("(approved_at AT TIME ZONE 'UTC')::date = $2"));
        assert!(!UPSERT_SNAPSHOT.contains("updated_at::date"));
    }

    #[test]
    fn every_day_boundary_is_taken_in_utc() {
        let bare_casts = UPSERT_SNAPSHOT.matches("_at::date").count();
        assert_eq!(bare_casts, 0);
    }
}
