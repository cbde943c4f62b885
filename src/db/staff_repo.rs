// src/db/staff_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        criteria::Criteria,
        error::{map_unique_violation, AppError},
        pagination::PageRequest,
    },
    models::staff::{Staff, StaffPayload, StaffRole},
};

#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        user_id: Option<Uuid>,
        payload: &StaffPayload,
    ) -> Result<Staff, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (
                garage_id, branch_id, user_id, first_name, last_name, email, phone,
                role, employee_code, hire_date, salary
            )
            VALUES ($1, $2, $3, $4, $5, LOWER($6), $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(payload.branch_id)
        .bind(user_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(payload.role)
        .bind(&payload.employee_code)
        .bind(payload.hire_date)
        .bind(payload.salary)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "email"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &StaffPayload,
    ) -> Result<Staff, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Staff>(
            r#"
            UPDATE staff SET
                branch_id = $2, first_name = $3, last_name = $4, email = LOWER($5),
                phone = $6, role = $7, employee_code = $8, hire_date = $9,
                salary = $10, is_active = COALESCE($11, is_active), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.branch_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(payload.role)
        .bind(&payload.employee_code)
        .bind(payload.hire_date)
        .bind(payload.salary)
        .bind(payload.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "email"))?
        .ok_or(AppError::NotFound("Staff"))
    }

    /// Página de funcionários (ativos e inativos) + total para a paginação.
    pub async fn page(
        &self,
        garage_id: Uuid,
        role: Option<StaffRole>,
        request: &PageRequest,
    ) -> Result<(Vec<Staff>, i64), AppError> {
        let total = Criteria::count("staff")
            .scoped(garage_id)
            .eq("role", role)
            .fetch_count(&self.pool)
            .await?;

        let content = Criteria::select("staff")
            .scoped(garage_id)
            .eq("role", role)
            .order_by("first_name ASC, id ASC")
            .paginate(request.size(), request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((content, total))
    }
}
