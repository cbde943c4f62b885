// src/services/catalog_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::CatalogRepository,
    models::catalog::{BrandSearch, Tax, TaxPayload, VehicleBrand, VehicleBrandPayload},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // --- Impostos ---

    pub async fn create_tax(&self, payload: &TaxPayload) -> Result<Tax, AppError> {
        let tax = self.repo.create_tax(&self.pool, payload).await?;
        tracing::info!("🧾 Imposto {} cadastrado ({}%)", tax.tax_code, tax.rate);
        Ok(tax)
    }

    pub async fn get_tax(&self, id: Uuid) -> Result<Tax, AppError> {
        crud::fetch_by_id::<Tax, _>(&self.pool, id).await
    }

    pub async fn list_taxes(&self) -> Result<Vec<Tax>, AppError> {
        self.repo.list_taxes().await
    }

    pub async fn tax_by_code(&self, code: &str) -> Result<Tax, AppError> {
        self.repo
            .find_tax_by_code(code.trim())
            .await?
            .ok_or(AppError::NotFound("Tax"))
    }

    pub async fn update_tax(&self, id: Uuid, payload: &TaxPayload) -> Result<Tax, AppError> {
        self.repo.update_tax(&self.pool, id, payload).await
    }

    pub async fn delete_tax(&self, id: Uuid) -> Result<(), AppError> {
        crud::set_active::<Tax, _>(&self.pool, id, false).await?;
        Ok(())
    }

    // --- Marcas ---

    pub async fn create_brand(&self, payload: &VehicleBrandPayload) -> Result<VehicleBrand, AppError> {
        self.repo.create_brand(&self.pool, payload).await
    }

    pub async fn get_brand(&self, id: Uuid) -> Result<VehicleBrand, AppError> {
        crud::fetch_by_id::<VehicleBrand, _>(&self.pool, id).await
    }

    pub async fn search_brands(&self, filters: &BrandSearch) -> Result<Vec<VehicleBrand>, AppError> {
        self.repo.search_brands(filters).await
    }

    pub async fn update_brand(&self, id: Uuid, payload: &VehicleBrandPayload) -> Result<VehicleBrand, AppError> {
        self.repo.update_brand(&self.pool, id, payload).await
    }

    pub async fn delete_brand(&self, id: Uuid) -> Result<(), AppError> {
        crud::set_active::<VehicleBrand, _>(&self.pool, id, false).await?;
        Ok(())
    }
}
