// src/services/customer_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::{AddressOwner, CustomerRepository},
    middleware::tenancy::SessionContext,
    models::{
        address::{LinkAddressPayload, LinkedAddress},
        customer::{Customer, CustomerPayload, CustomerSearch},
    },
    services::address_service::AddressService,
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    addresses: AddressService,
    pool: PgPool,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository, addresses: AddressService, pool: PgPool) -> Self {
        Self {
            repo,
            addresses,
            pool,
        }
    }

    pub async fn create(&self, session: &SessionContext, payload: &CustomerPayload) -> Result<Customer, AppError> {
        let customer = self
            .repo
            .create_customer(&self.pool, session.garage_id, payload)
            .await?;
        tracing::debug!("Cliente {} criado na oficina {}", customer.id, session.garage_id);
        Ok(customer)
    }

    pub async fn get(&self, session: &SessionContext, id: Uuid) -> Result<Customer, AppError> {
        crud::fetch_visible::<Customer, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn list(&self, session: &SessionContext) -> Result<Vec<Customer>, AppError> {
        crud::list_by_garage::<Customer, _>(&self.pool, session.garage_id).await
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        payload: &CustomerPayload,
    ) -> Result<Customer, AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Customer, _>(&mut *tx, id, session.garage_id).await?;
        let customer = self.repo.update_customer(&mut *tx, id, payload).await?;
        tx.commit().await?;
        Ok(customer)
    }

    /// Exclusão lógica
    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Customer, _>(&mut *tx, id, session.garage_id).await?;
        crud::set_active::<Customer, _>(&mut *tx, id, false).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn search(&self, session: &SessionContext, filters: &CustomerSearch) -> Result<Vec<Customer>, AppError> {
        self.repo.search_customers(session.garage_id, filters).await
    }

    // =========================================================================
    //  ENDEREÇOS DO CLIENTE
    // =========================================================================

    pub async fn add_address(
        &self,
        session: &SessionContext,
        customer_id: Uuid,
        payload: &LinkAddressPayload,
    ) -> Result<LinkedAddress, AppError> {
        crud::fetch_owned::<Customer, _>(&self.pool, customer_id, session.garage_id).await?;
        self.addresses
            .link(session, AddressOwner::Customer(customer_id), payload)
            .await
    }

    pub async fn list_addresses(
        &self,
        session: &SessionContext,
        customer_id: Uuid,
    ) -> Result<Vec<LinkedAddress>, AppError> {
        crud::fetch_visible::<Customer, _>(&self.pool, customer_id, session.garage_id).await?;
        self.addresses
            .list_linked(AddressOwner::Customer(customer_id))
            .await
    }

    pub async fn remove_address(
        &self,
        session: &SessionContext,
        customer_id: Uuid,
        address_id: Uuid,
    ) -> Result<(), AppError> {
        crud::fetch_owned::<Customer, _>(&self.pool, customer_id, session.garage_id).await?;
        self.addresses
            .unlink(AddressOwner::Customer(customer_id), address_id)
            .await
    }
}
