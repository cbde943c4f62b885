// src/db/catalog_repo.rs
//
// Impostos e marcas: tabelas globais, sem oficina.

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        criteria::Criteria,
        error::{map_unique_violation, AppError},
    },
    models::catalog::{BrandSearch, Tax, TaxPayload, VehicleBrand, VehicleBrandPayload},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  IMPOSTOS
    // =========================================================================

    pub async fn create_tax<'e, E>(&self, executor: E, payload: &TaxPayload) -> Result<Tax, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tax>(
            r#"
            INSERT INTO taxes (tax_code, name, rate, tax_type, description)
            VALUES (UPPER($1), $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&payload.tax_code)
        .bind(&payload.name)
        .bind(payload.rate)
        .bind(payload.tax_type)
        .bind(&payload.description)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "tax_code"))
    }

    pub async fn update_tax<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &TaxPayload,
    ) -> Result<Tax, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tax>(
            r#"
            UPDATE taxes SET
                tax_code = UPPER($2), name = $3, rate = $4, tax_type = $5,
                description = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.tax_code)
        .bind(&payload.name)
        .bind(payload.rate)
        .bind(payload.tax_type)
        .bind(&payload.description)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "tax_code"))?
        .ok_or(AppError::NotFound("Tax"))
    }

    pub async fn list_taxes(&self) -> Result<Vec<Tax>, AppError> {
        let taxes = sqlx::query_as::<_, Tax>("SELECT * FROM taxes ORDER BY tax_code ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(taxes)
    }

    pub async fn find_tax_by_code(&self, code: &str) -> Result<Option<Tax>, AppError> {
        let tax = sqlx::query_as::<_, Tax>("SELECT * FROM taxes WHERE tax_code = UPPER($1)")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tax)
    }

    // =========================================================================
    //  MARCAS DE VEÍCULOS
    // =========================================================================

    pub async fn create_brand<'e, E>(
        &self,
        executor: E,
        payload: &VehicleBrandPayload,
    ) -> Result<VehicleBrand, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, VehicleBrand>(
            r#"
            INSERT INTO vehicle_brands (name, country, logo_url)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(&payload.country)
        .bind(&payload.logo_url)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "name"))
    }

    pub async fn update_brand<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &VehicleBrandPayload,
    ) -> Result<VehicleBrand, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, VehicleBrand>(
            r#"
            UPDATE vehicle_brands SET
                name = $2, country = $3, logo_url = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.trim())
        .bind(&payload.country)
        .bind(&payload.logo_url)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "name"))?
        .ok_or(AppError::NotFound("VehicleBrand"))
    }

    /// Sem `includeInactive`, só marcas ativas.
    pub async fn search_brands(&self, filters: &BrandSearch) -> Result<Vec<VehicleBrand>, AppError> {
        let active_only = (!filters.include_inactive).then_some(true);

        Criteria::select("vehicle_brands")
            .contains("name", filters.name.as_deref())
            .eq("is_active", active_only)
            .order_by("name ASC")
            .fetch_all(&self.pool)
            .await
    }
}
