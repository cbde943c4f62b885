// src/services/finance_service.rs
//
// Formas de pagamento e contas bancárias da oficina.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::FinanceRepository,
    middleware::tenancy::SessionContext,
    models::finance::{BankAccount, BankAccountPayload, PaymentMethod, PaymentMethodPayload},
};

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    pool: PgPool,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // =========================================================================
    //  FORMAS DE PAGAMENTO
    // =========================================================================

    pub async fn create_payment_method(
        &self,
        session: &SessionContext,
        payload: &PaymentMethodPayload,
    ) -> Result<PaymentMethod, AppError> {
        self.repo
            .create_payment_method(&self.pool, session.garage_id, payload)
            .await
    }

    pub async fn get_payment_method(&self, session: &SessionContext, id: Uuid) -> Result<PaymentMethod, AppError> {
        crud::fetch_visible::<PaymentMethod, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn list_payment_methods(
        &self,
        session: &SessionContext,
        active_only: bool,
    ) -> Result<Vec<PaymentMethod>, AppError> {
        self.repo
            .list_payment_methods(session.garage_id, active_only)
            .await
    }

    pub async fn set_payment_method_active(
        &self,
        session: &SessionContext,
        id: Uuid,
        active: bool,
    ) -> Result<PaymentMethod, AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<PaymentMethod, _>(&mut *tx, id, session.garage_id).await?;
        let method = crud::set_active::<PaymentMethod, _>(&mut *tx, id, active).await?;
        tx.commit().await?;
        Ok(method)
    }

    // =========================================================================
    //  CONTAS BANCÁRIAS (uma principal por oficina)
    // =========================================================================

    pub async fn create_bank_account(
        &self,
        session: &SessionContext,
        payload: &BankAccountPayload,
    ) -> Result<BankAccount, AppError> {
        let mut tx = self.pool.begin().await?;
        if payload.is_primary {
            self.repo
                .clear_primary_account(&mut *tx, session.garage_id)
                .await?;
        }
        let account = self
            .repo
            .create_bank_account(&mut *tx, session.garage_id, payload)
            .await?;
        tx.commit().await?;
        Ok(account)
    }

    pub async fn get_bank_account(&self, session: &SessionContext, id: Uuid) -> Result<BankAccount, AppError> {
        crud::fetch_visible::<BankAccount, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn list_bank_accounts(&self, session: &SessionContext) -> Result<Vec<BankAccount>, AppError> {
        crud::list_by_garage::<BankAccount, _>(&self.pool, session.garage_id).await
    }

    pub async fn update_bank_account(
        &self,
        session: &SessionContext,
        id: Uuid,
        payload: &BankAccountPayload,
    ) -> Result<BankAccount, AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<BankAccount, _>(&mut *tx, id, session.garage_id).await?;
        if payload.is_primary {
            self.repo
                .clear_primary_account(&mut *tx, session.garage_id)
                .await?;
        }
        let account = self.repo.update_bank_account(&mut *tx, id, payload).await?;
        tx.commit().await?;
        Ok(account)
    }

    pub async fn delete_bank_account(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<BankAccount, _>(&mut *tx, id, session.garage_id).await?;
        self.repo.deactivate_bank_account(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }
}
