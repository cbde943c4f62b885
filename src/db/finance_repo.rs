// src/db/finance_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::finance::{BankAccount, BankAccountPayload, PaymentMethod, PaymentMethodPayload},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FORMAS DE PAGAMENTO
    // =========================================================================

    pub async fn create_payment_method<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        payload: &PaymentMethodPayload,
    ) -> Result<PaymentMethod, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PaymentMethod>(
            r#"
            INSERT INTO payment_methods (garage_id, name, method_type, details)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(payload.name.trim())
        .bind(payload.method_type)
        .bind(&payload.details)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "name"))
    }

    pub async fn list_payment_methods(
        &self,
        garage_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<PaymentMethod>, AppError> {
        let methods = sqlx::query_as::<_, PaymentMethod>(
            r#"
            SELECT * FROM payment_methods
            WHERE garage_id = $1 AND (NOT $2 OR is_active)
            ORDER BY name ASC
            "#,
        )
        .bind(garage_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(methods)
    }

    // =========================================================================
    //  CONTAS BANCÁRIAS
    // =========================================================================

    pub async fn create_bank_account<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        payload: &BankAccountPayload,
    ) -> Result<BankAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BankAccount>(
            r#"
            INSERT INTO bank_accounts (
                garage_id, account_holder_name, bank_name, account_number,
                ifsc_code, branch_name, account_type, is_primary
            )
            VALUES ($1, $2, $3, $4, UPPER($5), $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(&payload.account_holder_name)
        .bind(&payload.bank_name)
        .bind(&payload.account_number)
        .bind(&payload.ifsc_code)
        .bind(&payload.branch_name)
        .bind(payload.account_type)
        .bind(payload.is_primary)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "account_number"))
    }

    pub async fn update_bank_account<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &BankAccountPayload,
    ) -> Result<BankAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BankAccount>(
            r#"
            UPDATE bank_accounts SET
                account_holder_name = $2, bank_name = $3, account_number = $4,
                ifsc_code = UPPER($5), branch_name = $6, account_type = $7,
                is_primary = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.account_holder_name)
        .bind(&payload.bank_name)
        .bind(&payload.account_number)
        .bind(&payload.ifsc_code)
        .bind(&payload.branch_name)
        .bind(payload.account_type)
        .bind(payload.is_primary)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "account_number"))?
        .ok_or(AppError::NotFound("BankAccount"))
    }

    /// Desmarca a conta principal atual (antes de marcar outra).
    pub async fn clear_primary_account<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE bank_accounts SET is_primary = FALSE, updated_at = NOW() WHERE garage_id = $1 AND is_primary",
        )
        .bind(garage_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Conta inativa não pode continuar como principal.
    pub async fn deactivate_bank_account<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<BankAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BankAccount>(
            r#"
            UPDATE bank_accounts SET is_active = FALSE, is_primary = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("BankAccount"))
    }
}
