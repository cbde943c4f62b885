// src/services/quotation_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::QuotationRepository,
    middleware::tenancy::SessionContext,
    models::{
        catalog::Tax,
        customer::{Customer, Vehicle},
        garage::Branch,
        quotation::{
            compute_totals, Quotation, QuotationPayload, QuotationSearch, QuotationStatus,
        },
    },
};

/// `QT-20250115-1A2B3C4D`: data + 8 caracteres do UUID.
pub fn quotation_number(date: NaiveDate, seed: Uuid) -> String {
    let suffix: String = seed.simple().to_string().chars().take(8).collect();
    format!("QT-{}-{}", date.format("%Y%m%d"), suffix.to_uppercase())
}

#[derive(Clone)]
pub struct QuotationService {
    repo: QuotationRepository,
    pool: PgPool,
}

impl QuotationService {
    pub fn new(repo: QuotationRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Referências da oficina + alíquota do imposto escolhido.
    async fn resolve_references(
        &self,
        session: &SessionContext,
        payload: &QuotationPayload,
    ) -> Result<Option<rust_decimal::Decimal>, AppError> {
        crud::fetch_owned::<Customer, _>(&self.pool, payload.customer_id, session.garage_id).await?;

        let vehicle =
            crud::fetch_owned::<Vehicle, _>(&self.pool, payload.vehicle_id, session.garage_id).await?;
        if vehicle.customer_id != payload.customer_id {
            return Err(AppError::BusinessRule("vehicle_customer_mismatch"));
        }

        if let Some(branch_id) = payload.branch_id {
            crud::fetch_owned::<Branch, _>(&self.pool, branch_id, session.garage_id).await?;
        }

        match payload.tax_id {
            Some(tax_id) => {
                let tax = crud::fetch_by_id::<Tax, _>(&self.pool, tax_id).await?;
                if !tax.is_active {
                    return Err(AppError::NotFound("Tax"));
                }
                Ok(Some(tax.rate))
            }
            None => Ok(None),
        }
    }

    pub async fn create(&self, session: &SessionContext, payload: &QuotationPayload) -> Result<Quotation, AppError> {
        let tax_rate = self.resolve_references(session, payload).await?;
        let totals = compute_totals(&payload.items, payload.discount_amount, tax_rate)?;

        let number = quotation_number(Utc::now().date_naive(), Uuid::new_v4());
        let quotation = self
            .repo
            .create(&self.pool, session.garage_id, &number, payload, &totals)
            .await?;

        tracing::info!("📝 Orçamento {} criado (total {})", quotation.quotation_number, quotation.total_amount);
        Ok(quotation)
    }

    pub async fn get(&self, session: &SessionContext, id: Uuid) -> Result<Quotation, AppError> {
        crud::fetch_visible::<Quotation, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn list(&self, session: &SessionContext) -> Result<Vec<Quotation>, AppError> {
        crud::list_by_garage::<Quotation, _>(&self.pool, session.garage_id).await
    }

    /// Só rascunhos são editáveis; os totais são recalculados.
    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        payload: &QuotationPayload,
    ) -> Result<Quotation, AppError> {
        let tax_rate = self.resolve_references(session, payload).await?;
        let totals = compute_totals(&payload.items, payload.discount_amount, tax_rate)?;

        let mut tx = self.pool.begin().await?;
        let current = crud::fetch_owned::<Quotation, _>(&mut *tx, id, session.garage_id).await?;
        if current.status != QuotationStatus::Draft {
            return Err(AppError::BusinessRule("quotation_not_editable"));
        }
        let quotation = self.repo.update(&mut *tx, id, payload, &totals).await?;
        tx.commit().await?;
        Ok(quotation)
    }

    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let current = crud::fetch_owned::<Quotation, _>(&mut *tx, id, session.garage_id).await?;
        if current.status != QuotationStatus::Draft {
            return Err(AppError::BusinessRule("quotation_not_editable"));
        }
        crud::delete_by_id::<Quotation, _>(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn change_status(
        &self,
        session: &SessionContext,
        id: Uuid,
        next: QuotationStatus,
    ) -> Result<Quotation, AppError> {
        let mut tx = self.pool.begin().await?;
        let current = crud::fetch_owned::<Quotation, _>(&mut *tx, id, session.garage_id).await?;
        if !current.status.can_transition_to(next) {
            return Err(AppError::BusinessRule("invalid_status_transition"));
        }
        let quotation = self.repo.update_status(&mut *tx, id, next).await?;
        tx.commit().await?;

        tracing::info!("📝 Orçamento {}: {:?} -> {:?}", quotation.quotation_number, current.status, next);
        Ok(quotation)
    }

    pub async fn search(&self, session: &SessionContext, filters: &QuotationSearch) -> Result<Vec<Quotation>, AppError> {
        self.repo.search(session.garage_id, filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_has_date_and_eight_char_suffix() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let seed = Uuid::parse_str("1a2b3c4d-0000-4000-8000-000000000000").unwrap();

        assert_eq!(quotation_number(date, seed), "QT-20250115-1A2B3C4D");
    }

    #[test]
    fn numbers_differ_for_different_seeds() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        assert_ne!(
            quotation_number(date, Uuid::new_v4()),
            quotation_number(date, Uuid::new_v4())
        );
    }
}
