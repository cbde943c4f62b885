// src/services/branch_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::{AddressOwner, GarageRepository},
    middleware::tenancy::SessionContext,
    models::{
        address::{LinkAddressPayload, LinkedAddress},
        garage::{Branch, BranchPayload},
    },
    services::address_service::AddressService,
};

#[derive(Clone)]
pub struct BranchService {
    repo: GarageRepository,
    addresses: AddressService,
    pool: PgPool,
}

impl BranchService {
    pub fn new(repo: GarageRepository, addresses: AddressService, pool: PgPool) -> Self {
        Self {
            repo,
            addresses,
            pool,
        }
    }

    pub async fn create(&self, session: &SessionContext, payload: &BranchPayload) -> Result<Branch, AppError> {
        let mut tx = self.pool.begin().await?;
        let branch = self
            .repo
            .create_branch(&mut *tx, session.garage_id, payload)
            .await?;
        if branch.is_main {
            self.repo
                .clear_main_branch(&mut *tx, session.garage_id, branch.id)
                .await?;
        }
        tx.commit().await?;
        Ok(branch)
    }

    pub async fn get(&self, session: &SessionContext, id: Uuid) -> Result<Branch, AppError> {
        crud::fetch_visible::<Branch, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn list(&self, session: &SessionContext) -> Result<Vec<Branch>, AppError> {
        crud::list_by_garage::<Branch, _>(&self.pool, session.garage_id).await
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        payload: &BranchPayload,
    ) -> Result<Branch, AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Branch, _>(&mut *tx, id, session.garage_id).await?;
        let branch = self.repo.update_branch(&mut *tx, id, payload).await?;
        if branch.is_main {
            self.repo
                .clear_main_branch(&mut *tx, session.garage_id, branch.id)
                .await?;
        }
        tx.commit().await?;
        Ok(branch)
    }

    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Branch, _>(&mut *tx, id, session.garage_id).await?;
        crud::set_active::<Branch, _>(&mut *tx, id, false).await?;
        tx.commit().await?;
        Ok(())
    }

    // --- Endereços da filial (um principal por filial) ---

    pub async fn add_address(
        &self,
        session: &SessionContext,
        branch_id: Uuid,
        payload: &LinkAddressPayload,
    ) -> Result<LinkedAddress, AppError> {
        crud::fetch_owned::<Branch, _>(&self.pool, branch_id, session.garage_id).await?;
        self.addresses
            .link(session, AddressOwner::Branch(branch_id), payload)
            .await
    }

    pub async fn list_addresses(
        &self,
        session: &SessionContext,
        branch_id: Uuid,
    ) -> Result<Vec<LinkedAddress>, AppError> {
        crud::fetch_visible::<Branch, _>(&self.pool, branch_id, session.garage_id).await?;
        self.addresses.list_linked(AddressOwner::Branch(branch_id)).await
    }

    pub async fn remove_address(
        &self,
        session: &SessionContext,
        branch_id: Uuid,
        address_id: Uuid,
    ) -> Result<(), AppError> {
        crud::fetch_owned::<Branch, _>(&self.pool, branch_id, session.garage_id).await?;
        self.addresses
            .unlink(AddressOwner::Branch(branch_id), address_id)
            .await
    }
}
