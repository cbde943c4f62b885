// src/db/otp_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::otp::{OtpCode, OtpType},
};

#[derive(Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Códigos anteriores ainda não usados deixam de valer.
    pub async fn invalidate_previous<'e, E>(
        &self,
        executor: E,
        target: &str,
        otp_type: OtpType,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE otp_codes SET is_used = TRUE WHERE target = $1 AND otp_type = $2 AND NOT is_used",
        )
        .bind(target)
        .bind(otp_type)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Option<Uuid>,
        target: &str,
        code: &str,
        otp_type: OtpType,
        expires_at: DateTime<Utc>,
    ) -> Result<OtpCode, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let otp = sqlx::query_as::<_, OtpCode>(
            r#"
            INSERT INTO otp_codes (user_id, target, code, otp_type, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(target)
        .bind(code)
        .bind(otp_type)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;
        Ok(otp)
    }

    /// Código mais recente para (destino, tipo) com o valor informado.
    pub async fn find_latest_matching<'e, E>(
        &self,
        executor: E,
        target: &str,
        otp_type: OtpType,
        code: &str,
    ) -> Result<Option<OtpCode>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let otp = sqlx::query_as::<_, OtpCode>(
            r#"
            SELECT * FROM otp_codes
            WHERE target = $1 AND otp_type = $2 AND code = $3
            ORDER BY created_at DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(target)
        .bind(otp_type)
        .bind(code)
        .fetch_optional(executor)
        .await?;
        Ok(otp)
    }

    pub async fn mark_used<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE otp_codes SET is_used = TRUE WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Limpeza periódica: expirados ou já usados.
    pub async fn delete_stale(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM otp_codes WHERE is_used OR expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
