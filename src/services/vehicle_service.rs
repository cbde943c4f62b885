// src/services/vehicle_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::CustomerRepository,
    middleware::tenancy::SessionContext,
    models::{
        catalog::VehicleBrand,
        customer::{Customer, Vehicle, VehiclePayload, VehicleSearch},
    },
};

#[derive(Clone)]
pub struct VehicleService {
    repo: CustomerRepository,
    pool: PgPool,
}

impl VehicleService {
    pub fn new(repo: CustomerRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // Cliente da própria oficina; marca, se informada, tem que existir
    async fn check_references(
        &self,
        session: &SessionContext,
        payload: &VehiclePayload,
    ) -> Result<(), AppError> {
        crud::fetch_owned::<Customer, _>(&self.pool, payload.customer_id, session.garage_id).await?;

        if let Some(brand_id) = payload.brand_id {
            crud::fetch_by_id::<VehicleBrand, _>(&self.pool, brand_id).await?;
        }
        Ok(())
    }

    pub async fn create(&self, session: &SessionContext, payload: &VehiclePayload) -> Result<Vehicle, AppError> {
        self.check_references(session, payload).await?;
        self.repo
            .create_vehicle(&self.pool, session.garage_id, payload)
            .await
    }

    pub async fn get(&self, session: &SessionContext, id: Uuid) -> Result<Vehicle, AppError> {
        crud::fetch_visible::<Vehicle, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn list(&self, session: &SessionContext) -> Result<Vec<Vehicle>, AppError> {
        crud::list_by_garage::<Vehicle, _>(&self.pool, session.garage_id).await
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        payload: &VehiclePayload,
    ) -> Result<Vehicle, AppError> {
        self.check_references(session, payload).await?;

        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Vehicle, _>(&mut *tx, id, session.garage_id).await?;
        let vehicle = self.repo.update_vehicle(&mut *tx, id, payload).await?;
        tx.commit().await?;
        Ok(vehicle)
    }

    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Vehicle, _>(&mut *tx, id, session.garage_id).await?;
        crud::set_active::<Vehicle, _>(&mut *tx, id, false).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn by_customer(&self, session: &SessionContext, customer_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        crud::fetch_visible::<Customer, _>(&self.pool, customer_id, session.garage_id).await?;
        self.repo
            .list_vehicles_by_customer(session.garage_id, customer_id)
            .await
    }

    pub async fn search(&self, session: &SessionContext, filters: &VehicleSearch) -> Result<Vec<Vehicle>, AppError> {
        self.repo.search_vehicles(session.garage_id, filters).await
    }
}
