// src/db/quotation_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        criteria::Criteria,
        error::{map_unique_violation, AppError},
    },
    models::quotation::{
        Quotation, QuotationPayload, QuotationSearch, QuotationStatus, QuotationTotals,
    },
};

#[derive(Clone)]
pub struct QuotationRepository {
    pool: PgPool,
}

impl QuotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        quotation_number: &str,
        payload: &QuotationPayload,
        totals: &QuotationTotals,
    ) -> Result<Quotation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Quotation>(
            r#"
            INSERT INTO quotations (
                garage_id, branch_id, customer_id, vehicle_id, quotation_number,
                items, tax_id, subtotal, discount_amount, tax_amount, total_amount,
                valid_until, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(payload.branch_id)
        .bind(payload.customer_id)
        .bind(payload.vehicle_id)
        .bind(quotation_number)
        .bind(Json(&totals.lines))
        .bind(payload.tax_id)
        .bind(totals.subtotal)
        .bind(totals.discount_amount)
        .bind(totals.tax_amount)
        .bind(totals.total_amount)
        .bind(payload.valid_until)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "quotation_number"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &QuotationPayload,
        totals: &QuotationTotals,
    ) -> Result<Quotation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Quotation>(
            r#"
            UPDATE quotations SET
                branch_id = $2, customer_id = $3, vehicle_id = $4, items = $5,
                tax_id = $6, subtotal = $7, discount_amount = $8, tax_amount = $9,
                total_amount = $10, valid_until = $11, notes = $12, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.branch_id)
        .bind(payload.customer_id)
        .bind(payload.vehicle_id)
        .bind(Json(&totals.lines))
        .bind(payload.tax_id)
        .bind(totals.subtotal)
        .bind(totals.discount_amount)
        .bind(totals.tax_amount)
        .bind(totals.total_amount)
        .bind(payload.valid_until)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Quotation"))
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: QuotationStatus,
    ) -> Result<Quotation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Quotation>(
            r#"
            UPDATE quotations SET
                status = $2,
                approved_at = CASE WHEN $3 THEN NOW() ELSE approved_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(status.stamps_approval())
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Quotation"))
    }

    /// `from`/`to` filtram pela data de criação (inclusivo).
    pub async fn search(
        &self,
        garage_id: Uuid,
        filters: &QuotationSearch,
    ) -> Result<Vec<Quotation>, AppError> {
        Criteria::select("quotations")
            .scoped(garage_id)
            .eq("status", filters.status)
            .eq("customer_id", filters.customer_id)
            .eq("vehicle_id", filters.vehicle_id)
            .eq("branch_id", filters.branch_id)
            .contains("quotation_number", filters.number.as_deref())
            .between("(created_at AT TIME ZONE 'UTC')::date", filters.from, filters.to)
            .order_by("created_at DESC")
            .fetch_all(&self.pool)
            .await
    }
}
