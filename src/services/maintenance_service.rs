// src/services/maintenance_service.rs

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::MaintenanceRepository,
    middleware::tenancy::SessionContext,
    models::{
        customer::Vehicle,
        maintenance::{MaintenancePayload, MaintenanceSchedule, MaintenanceSearch, MaintenanceStatus},
    },
};

/// Janela inclusiva [hoje, hoje + dias].
pub fn upcoming_window(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(days))
}

#[derive(Clone)]
pub struct MaintenanceService {
    repo: MaintenanceRepository,
    pool: PgPool,
}

impl MaintenanceService {
    pub fn new(repo: MaintenanceRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create(
        &self,
        session: &SessionContext,
        payload: &MaintenancePayload,
    ) -> Result<MaintenanceSchedule, AppError> {
        // O cliente vem do veículo
        let vehicle =
            crud::fetch_owned::<Vehicle, _>(&self.pool, payload.vehicle_id, session.garage_id).await?;

        self.repo
            .create(&self.pool, session.garage_id, vehicle.customer_id, payload)
            .await
    }

    pub async fn get(&self, session: &SessionContext, id: Uuid) -> Result<MaintenanceSchedule, AppError> {
        crud::fetch_visible::<MaintenanceSchedule, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn list(&self, session: &SessionContext) -> Result<Vec<MaintenanceSchedule>, AppError> {
        crud::list_by_garage::<MaintenanceSchedule, _>(&self.pool, session.garage_id).await
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        payload: &MaintenancePayload,
    ) -> Result<MaintenanceSchedule, AppError> {
        let vehicle =
            crud::fetch_owned::<Vehicle, _>(&self.pool, payload.vehicle_id, session.garage_id).await?;

        let mut tx = self.pool.begin().await?;
        let current =
            crud::fetch_owned::<MaintenanceSchedule, _>(&mut *tx, id, session.garage_id).await?;
        let status = payload.status.unwrap_or(current.status);
        let schedule = self
            .repo
            .update(&mut *tx, id, vehicle.customer_id, status, payload)
            .await?;
        tx.commit().await?;
        Ok(schedule)
    }

    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<MaintenanceSchedule, _>(&mut *tx, id, session.garage_id).await?;
        crud::delete_by_id::<MaintenanceSchedule, _>(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Concluídas e canceladas não podem ser concluídas de novo.
    pub async fn complete(&self, session: &SessionContext, id: Uuid) -> Result<MaintenanceSchedule, AppError> {
        let mut tx = self.pool.begin().await?;
        let current =
            crud::fetch_owned::<MaintenanceSchedule, _>(&mut *tx, id, session.garage_id).await?;
        if !current.status.is_open() {
            return Err(AppError::BusinessRule("invalid_status_transition"));
        }
        let schedule = self.repo.complete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🔧 Manutenção {} concluída", schedule.id);
        Ok(schedule)
    }

    pub async fn upcoming(&self, session: &SessionContext, days: i64) -> Result<Vec<MaintenanceSchedule>, AppError> {
        let (from, to) = upcoming_window(Utc::now().date_naive(), days);
        self.repo.upcoming(session.garage_id, from, to).await
    }

    pub async fn by_vehicle(
        &self,
        session: &SessionContext,
        vehicle_id: Uuid,
    ) -> Result<Vec<MaintenanceSchedule>, AppError> {
        crud::fetch_visible::<Vehicle, _>(&self.pool, vehicle_id, session.garage_id).await?;

        let filters = MaintenanceSearch {
            vehicle_id: Some(vehicle_id),
            ..Default::default()
        };
        self.repo.search(session.garage_id, &filters).await
    }

    pub async fn search(
        &self,
        session: &SessionContext,
        filters: &MaintenanceSearch,
    ) -> Result<Vec<MaintenanceSchedule>, AppError> {
        self.repo.search(session.garage_id, filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_inclusive_of_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let (from, to) = upcoming_window(today, 7);

        assert_eq!(from, today);
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 3, 8).unwrap());
    }

    #[test]
    fn zero_days_means_today_only() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(upcoming_window(today, 0), (today, today));
    }

    #[test]
    fn open_statuses_can_be_completed() {
        assert!(MaintenanceStatus::Overdue.is_open());
        assert!(MaintenanceStatus::Reminded.is_open());
    }
}
