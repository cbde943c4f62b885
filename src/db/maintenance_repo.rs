// src/db/maintenance_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{criteria::Criteria, error::AppError},
    models::maintenance::{
        MaintenancePayload, MaintenanceSchedule, MaintenanceSearch, MaintenanceStatus,
    },
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        customer_id: Uuid,
        payload: &MaintenancePayload,
    ) -> Result<MaintenanceSchedule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let schedule = sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            INSERT INTO maintenance_schedules (
                garage_id, vehicle_id, customer_id, service_type, description,
                scheduled_date, due_odometer_km, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(payload.vehicle_id)
        .bind(customer_id)
        .bind(&payload.service_type)
        .bind(&payload.description)
        .bind(payload.scheduled_date)
        .bind(payload.due_odometer_km)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await?;

        Ok(schedule)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        customer_id: Uuid,
        status: MaintenanceStatus,
        payload: &MaintenancePayload,
    ) -> Result<MaintenanceSchedule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            UPDATE maintenance_schedules SET
                vehicle_id = $2, customer_id = $3, service_type = $4, description = $5,
                scheduled_date = $6, due_odometer_km = $7, status = $8, notes = $9,
                completed_at = CASE WHEN $8 = 'COMPLETED'::maintenance_status
                                    THEN COALESCE(completed_at, NOW()) END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.vehicle_id)
        .bind(customer_id)
        .bind(&payload.service_type)
        .bind(&payload.description)
        .bind(payload.scheduled_date)
        .bind(payload.due_odometer_km)
        .bind(status)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("MaintenanceSchedule"))
    }

    pub async fn complete<'e, E>(&self, executor: E, id: Uuid) -> Result<MaintenanceSchedule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            UPDATE maintenance_schedules
            SET status = 'COMPLETED', completed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("MaintenanceSchedule"))
    }

    /// Agendadas/lembradas com data em [from, to].
    pub async fn upcoming(
        &self,
        garage_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MaintenanceSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            SELECT * FROM maintenance_schedules
            WHERE garage_id = $1
              AND status IN ('SCHEDULED', 'REMINDED')
              AND scheduled_date BETWEEN $2 AND $3
            ORDER BY scheduled_date ASC
            "#,
        )
        .bind(garage_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    pub async fn search(
        &self,
        garage_id: Uuid,
        filters: &MaintenanceSearch,
    ) -> Result<Vec<MaintenanceSchedule>, AppError> {
        Criteria::select("maintenance_schedules")
            .scoped(garage_id)
            .eq("status", filters.status)
            .eq("vehicle_id", filters.vehicle_id)
            .eq("customer_id", filters.customer_id)
            .between("scheduled_date", filters.from, filters.to)
            .order_by("scheduled_date ASC")
            .fetch_all(&self.pool)
            .await
    }
}
