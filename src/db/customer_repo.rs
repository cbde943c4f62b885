// src/db/customer_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        criteria::Criteria,
        error::{map_unique_violation, AppError},
    },
    models::customer::{
        Customer, CustomerPayload, CustomerSearch, Vehicle, VehiclePayload, VehicleSearch,
    },
};

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        payload: &CustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                garage_id, full_name, email, phone, alternate_phone, gst_number, notes
            )
            VALUES ($1, $2, $3, $4, $5, UPPER($6), $7)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(&payload.full_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.alternate_phone)
        .bind(&payload.gst_number)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await?;

        Ok(customer)
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &CustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                full_name = $2, email = $3, phone = $4, alternate_phone = $5,
                gst_number = UPPER($6), notes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.full_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.alternate_phone)
        .bind(&payload.gst_number)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Customer"))
    }

    pub async fn search_customers(
        &self,
        garage_id: Uuid,
        filters: &CustomerSearch,
    ) -> Result<Vec<Customer>, AppError> {
        Criteria::select("customers")
            .scoped(garage_id)
            .contains("full_name", filters.name.as_deref())
            .contains("email", filters.email.as_deref())
            .contains("phone", filters.phone.as_deref())
            .eq("is_active", filters.is_active)
            .order_by("full_name ASC")
            .fetch_all(&self.pool)
            .await
    }

    // =========================================================================
    //  VEÍCULOS
    // =========================================================================

    pub async fn create_vehicle<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        payload: &VehiclePayload,
    ) -> Result<Vehicle, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                garage_id, customer_id, brand_id, model, registration_number, vin,
                manufacture_year, color, fuel_type, odometer_km
            )
            VALUES ($1, $2, $3, $4, $5, UPPER($6), $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(payload.customer_id)
        .bind(payload.brand_id)
        .bind(&payload.model)
        .bind(payload.normalized_registration())
        .bind(&payload.vin)
        .bind(payload.manufacture_year)
        .bind(&payload.color)
        .bind(payload.fuel_type)
        .bind(payload.odometer_km)
        .fetch_one(executor)
        .await
        .map_err(vehicle_unique_violation)
    }

    pub async fn update_vehicle<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &VehiclePayload,
    ) -> Result<Vehicle, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                customer_id = $2, brand_id = $3, model = $4, registration_number = $5,
                vin = UPPER($6), manufacture_year = $7, color = $8, fuel_type = $9,
                odometer_km = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.customer_id)
        .bind(payload.brand_id)
        .bind(&payload.model)
        .bind(payload.normalized_registration())
        .bind(&payload.vin)
        .bind(payload.manufacture_year)
        .bind(&payload.color)
        .bind(payload.fuel_type)
        .bind(payload.odometer_km)
        .fetch_optional(executor)
        .await
        .map_err(vehicle_unique_violation)?
        .ok_or(AppError::NotFound("Vehicle"))
    }

    pub async fn list_vehicles_by_customer(
        &self,
        garage_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE garage_id = $1 AND customer_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(garage_id)
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(vehicles)
    }

    pub async fn search_vehicles(
        &self,
        garage_id: Uuid,
        filters: &VehicleSearch,
    ) -> Result<Vec<Vehicle>, AppError> {
        Criteria::select("vehicles")
            .scoped(garage_id)
            .eq("customer_id", filters.customer_id)
            .eq("brand_id", filters.brand_id)
            .eq("fuel_type", filters.fuel_type)
            .contains("registration_number", filters.registration.as_deref())
            .between("manufacture_year", filters.year_from, filters.year_to)
            .order_by("created_at ASC")
            .fetch_all(&self.pool)
            .await
    }
}

// Placa e chassi são únicos no sistema todo
fn vehicle_unique_violation(e: sqlx::Error) -> AppError {
    let field = match &e {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("vehicles_vin_key") => "vin",
        _ => "registration_number",
    };
    map_unique_violation(e, field)
}
