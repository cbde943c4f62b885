// src/services/address_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::{AddressOwner, AddressRepository},
    middleware::tenancy::SessionContext,
    models::address::{Address, AddressPayload, AddressSearch, LinkAddressPayload, LinkedAddress},
};

#[derive(Clone)]
pub struct AddressService {
    repo: AddressRepository,
    pool: PgPool,
}

impl AddressService {
    pub fn new(repo: AddressRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create(&self, session: &SessionContext, payload: &AddressPayload) -> Result<Address, AppError> {
        self.repo.insert(&self.pool, session.garage_id, payload).await
    }

    pub async fn get(&self, session: &SessionContext, id: Uuid) -> Result<Address, AppError> {
        crud::fetch_visible::<Address, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn list(&self, session: &SessionContext) -> Result<Vec<Address>, AppError> {
        crud::list_by_garage::<Address, _>(&self.pool, session.garage_id).await
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        payload: &AddressPayload,
    ) -> Result<Address, AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Address, _>(&mut *tx, id, session.garage_id).await?;
        let address = self.repo.update(&mut *tx, id, payload).await?;
        tx.commit().await?;
        Ok(address)
    }

    /// Exclusão física; os vínculos caem em cascata.
    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Address, _>(&mut *tx, id, session.garage_id).await?;
        crud::delete_by_id::<Address, _>(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn search(&self, session: &SessionContext, filters: &AddressSearch) -> Result<Vec<Address>, AppError> {
        self.repo.search(session.garage_id, filters).await
    }

    // =========================================================================
    //  VÍNCULOS: o dono (cliente/filial) já foi verificado pelo chamador
    // =========================================================================

    /// Cria o endereço e o vínculo. Se for principal, desmarca o anterior
    /// na mesma transação.
    pub async fn link(
        &self,
        session: &SessionContext,
        owner: AddressOwner,
        payload: &LinkAddressPayload,
    ) -> Result<LinkedAddress, AppError> {
        let mut tx = self.pool.begin().await?;

        let address = self
            .repo
            .insert(&mut *tx, session.garage_id, &payload.address)
            .await?;

        if payload.is_primary {
            self.repo
                .clear_primary(&mut *tx, owner, payload.address_type)
                .await?;
        }

        self.repo
            .link(&mut *tx, owner, address.id, payload.address_type, payload.is_primary)
            .await?;

        tx.commit().await?;

        Ok(LinkedAddress {
            address,
            address_type: payload.address_type,
            is_primary: payload.is_primary,
        })
    }

    pub async fn list_linked(&self, owner: AddressOwner) -> Result<Vec<LinkedAddress>, AppError> {
        self.repo.list_linked(owner).await
    }

    pub async fn unlink(&self, owner: AddressOwner, address_id: Uuid) -> Result<(), AppError> {
        self.repo.unlink(&self.pool, owner, address_id).await
    }
}
