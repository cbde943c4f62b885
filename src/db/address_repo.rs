// src/db/address_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        criteria::Criteria,
        error::{map_unique_violation, AppError},
    },
    models::address::{Address, AddressPayload, AddressSearch, AddressType, LinkedAddress},
};

/// Dono de um vínculo de endereço. Cada um tem sua tabela de junção e sua
/// regra de endereço principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressOwner {
    /// Um principal por (cliente, tipo)
    Customer(Uuid),
    /// Um principal por filial
    Branch(Uuid),
}

impl AddressOwner {
    fn table(&self) -> &'static str {
        match self {
            AddressOwner::Customer(_) => "customer_addresses",
            AddressOwner::Branch(_) => "branch_addresses",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            AddressOwner::Customer(_) => "customer_id",
            AddressOwner::Branch(_) => "branch_id",
        }
    }

    fn id(&self) -> Uuid {
        match self {
            AddressOwner::Customer(id) | AddressOwner::Branch(id) => *id,
        }
    }

    /// UPDATE que desmarca o principal atual no escopo do dono.
    fn clear_primary_sql(&self) -> String {
        match self {
            AddressOwner::Customer(_) => format!(
                "UPDATE {} SET is_primary = FALSE WHERE {} = $1 AND address_type = $2 AND is_primary",
                self.table(),
                self.column()
            ),
            AddressOwner::Branch(_) => format!(
                "UPDATE {} SET is_primary = FALSE WHERE {} = $1 AND is_primary",
                self.table(),
                self.column()
            ),
        }
    }
}

#[derive(Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        payload: &AddressPayload,
    ) -> Result<Address, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (
                garage_id, line1, line2, landmark, city, state, postal_code,
                country, latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'India'), $9, $10)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(&payload.line1)
        .bind(&payload.line2)
        .bind(&payload.landmark)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.postal_code)
        .bind(&payload.country)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .fetch_one(executor)
        .await?;

        Ok(address)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &AddressPayload,
    ) -> Result<Address, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Address>(
            r#"
            UPDATE addresses SET
                line1 = $2, line2 = $3, landmark = $4, city = $5, state = $6,
                postal_code = $7, country = COALESCE($8, 'India'),
                latitude = $9, longitude = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.line1)
        .bind(&payload.line2)
        .bind(&payload.landmark)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.postal_code)
        .bind(&payload.country)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Address"))
    }

    /// Cidade/estado por substring, CEP exato.
    pub async fn search(&self, garage_id: Uuid, filters: &AddressSearch) -> Result<Vec<Address>, AppError> {
        Criteria::select("addresses")
            .scoped(garage_id)
            .contains("city", filters.city.as_deref())
            .contains("state", filters.state.as_deref())
            .eq("postal_code", filters.postal_code.clone())
            .order_by("created_at ASC")
            .fetch_all(&self.pool)
            .await
    }

    // =========================================================================
    //  VÍNCULOS (cliente / filial)
    // =========================================================================

    pub async fn clear_primary<'e, E>(
        &self,
        executor: E,
        owner: AddressOwner,
        address_type: AddressType,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = owner.clear_primary_sql();
        let mut query = sqlx::query(&sql).bind(owner.id());
        if let AddressOwner::Customer(_) = owner {
            query = query.bind(address_type);
        }
        let result = query.execute(executor).await?;
        Ok(result.rows_affected())
    }

    pub async fn link<'e, E>(
        &self,
        executor: E,
        owner: AddressOwner,
        address_id: Uuid,
        address_type: AddressType,
        is_primary: bool,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO {} ({}, address_id, address_type, is_primary) VALUES ($1, $2, $3, $4)",
            owner.table(),
            owner.column()
        );
        sqlx::query(&sql)
            .bind(owner.id())
            .bind(address_id)
            .bind(address_type)
            .bind(is_primary)
            .execute(executor)
            .await
            // Dois vínculos principais concorrentes: o índice parcial barra o segundo
            .map_err(|e| map_unique_violation(e, "is_primary"))?;
        Ok(())
    }

    pub async fn list_linked(&self, owner: AddressOwner) -> Result<Vec<LinkedAddress>, AppError> {
        let sql = format!(
            r#"
            SELECT a.*, l.address_type, l.is_primary
            FROM addresses a
            JOIN {} l ON l.address_id = a.id
            WHERE l.{} = $1
            ORDER BY l.is_primary DESC, l.created_at ASC
            "#,
            owner.table(),
            owner.column()
        );
        let linked = sqlx::query_as::<_, LinkedAddress>(&sql)
            .bind(owner.id())
            .fetch_all(&self.pool)
            .await?;
        Ok(linked)
    }

    /// Remove só o vínculo; o endereço continua existindo.
    pub async fn unlink<'e, E>(
        &self,
        executor: E,
        owner: AddressOwner,
        address_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1 AND address_id = $2",
            owner.table(),
            owner.column()
        );
        let result = sqlx::query(&sql)
            .bind(owner.id())
            .bind(address_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Address"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_primary_is_scoped_by_type() {
        let sql = AddressOwner::Customer(Uuid::new_v4()).clear_primary_sql();

        assert_eq!(
            sql,
            "UPDATE customer_addresses SET is_primary = FALSE WHERE customer_id = $1 AND address_type = $2 AND is_primary"
        );
    }

    #[test]
    fn branch_primary_is_scoped_by_branch_only() {
        let sql = AddressOwner::Branch(Uuid::new_v4()).clear_primary_sql();

        assert_eq!(
            sql,
            "UPDATE branch_addresses SET is_primary = FALSE WHERE branch_id = $1 AND is_primary"
        );
    }
}
