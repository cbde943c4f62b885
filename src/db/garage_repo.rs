// src/db/garage_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::{
        garage::{Branch, BranchPayload, Garage},
        onboarding::{GarageProfilePayload, OnboardingProgress},
    },
};

#[derive(Clone)]
pub struct GarageRepository {
    pool: PgPool,
}

impl GarageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  OFICINAS (TENANTS)
    // =========================================================================

    pub async fn create_garage<'e, E>(
        &self,
        executor: E,
        profile: &GarageProfilePayload,
    ) -> Result<Garage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Garage>(
            r#"
            INSERT INTO garages (name, legal_name, gst_number, email, phone)
            VALUES ($1, $2, UPPER($3), $4, $5)
            RETURNING *
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.legal_name)
        .bind(&profile.gst_number)
        .bind(&profile.email)
        .bind(&profile.phone)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "gst_number"))
    }

    pub async fn mark_onboarded<'e, E>(&self, executor: E, garage_id: Uuid) -> Result<Garage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Garage>(
            r#"
            UPDATE garages SET onboarding_completed = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::TenantNotFound)
    }

    /// O que já foi cadastrado para a oficina (assistente de onboarding).
    pub async fn onboarding_progress(&self, garage_id: Uuid) -> Result<OnboardingProgress, AppError> {
        let (has_main_branch, has_payment_methods, has_bank_account): (bool, bool, bool) =
            sqlx::query_as(
                r#"
                SELECT
                    EXISTS (SELECT 1 FROM branches WHERE garage_id = $1 AND is_main AND is_active),
                    EXISTS (SELECT 1 FROM payment_methods WHERE garage_id = $1 AND is_active),
                    EXISTS (SELECT 1 FROM bank_accounts WHERE garage_id = $1 AND is_active)
                "#,
            )
            .bind(garage_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(OnboardingProgress {
            has_garage: true,
            has_main_branch,
            has_payment_methods,
            has_bank_account,
        })
    }

    // =========================================================================
    //  FILIAIS
    // =========================================================================

    pub async fn create_branch<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        payload: &BranchPayload,
    ) -> Result<Branch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Branch>(
            r#"
            INSERT INTO branches (garage_id, name, branch_code, phone, email, is_main)
            VALUES ($1, $2, UPPER($3), $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(&payload.name)
        .bind(&payload.branch_code)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(payload.is_main)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "branch_code"))
    }

    pub async fn update_branch<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &BranchPayload,
    ) -> Result<Branch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Branch>(
            r#"
            UPDATE branches SET
                name = $2, branch_code = UPPER($3), phone = $4, email = $5,
                is_main = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.branch_code)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(payload.is_main)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "branch_code"))?
        .ok_or(AppError::NotFound("Branch"))
    }

    /// Só uma filial principal por oficina.
    pub async fn clear_main_branch<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        except: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE branches SET is_main = FALSE, updated_at = NOW() WHERE garage_id = $1 AND id <> $2 AND is_main",
        )
        .bind(garage_id)
        .bind(except)
        .execute(executor)
        .await?;
        Ok(())
    }
}
