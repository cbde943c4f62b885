// src/common/crud.rs
//
// Acesso a dados genérico. Cada entidade só declara a tabela e o nome usado
// nas mensagens; buscar, listar por oficina, apagar e ativar/desativar são
// iguais para todas.

use sqlx::{postgres::PgRow, Executor, FromRow, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;

/// Descritor de uma entidade persistida.
pub trait Resource: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    const TABLE: &'static str;
    /// Nome exibido nos erros ("Address", "Staff"...)
    const ENTITY: &'static str;
}

/// Entidade que pertence a uma oficina (tenant).
pub trait TenantScoped: Resource {
    fn garage_id(&self) -> Uuid;
}

/// Entidade com exclusão lógica (`is_active`).
pub trait SoftDelete: Resource {}

/// Garante que o registro pertence à oficina do chamador.
pub fn ensure_owned<R: TenantScoped>(record: R, garage_id: Uuid) -> Result<R, AppError> {
    if record.garage_id() != garage_id {
        return Err(AppError::OwnershipViolation(R::ENTITY));
    }
    Ok(record)
}

pub async fn find_by_id<'e, R, E>(executor: E, id: Uuid) -> Result<Option<R>, AppError>
where
    R: Resource,
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("SELECT * FROM {} WHERE id = $1", R::TABLE);
    let record = sqlx::query_as::<_, R>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(record)
}

pub async fn fetch_by_id<'e, R, E>(executor: E, id: Uuid) -> Result<R, AppError>
where
    R: Resource,
    E: Executor<'e, Database = Postgres>,
{
    find_by_id::<R, E>(executor, id)
        .await?
        .ok_or(AppError::NotFound(R::ENTITY))
}

/// Busca para mutação: 404 se não existe, violação de posse se é de outra oficina.
pub async fn fetch_owned<'e, R, E>(executor: E, id: Uuid, garage_id: Uuid) -> Result<R, AppError>
where
    R: TenantScoped,
    E: Executor<'e, Database = Postgres>,
{
    let record = fetch_by_id::<R, E>(executor, id).await?;
    ensure_owned(record, garage_id)
}

/// Busca para leitura: registros de outra oficina respondem como inexistentes.
pub async fn fetch_visible<'e, R, E>(executor: E, id: Uuid, garage_id: Uuid) -> Result<R, AppError>
where
    R: TenantScoped,
    E: Executor<'e, Database = Postgres>,
{
    match find_by_id::<R, E>(executor, id).await? {
        Some(record) if record.garage_id() == garage_id => Ok(record),
        _ => Err(AppError::NotFound(R::ENTITY)),
    }
}

pub async fn list_by_garage<'e, R, E>(executor: E, garage_id: Uuid) -> Result<Vec<R>, AppError>
where
    R: TenantScoped,
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "SELECT * FROM {} WHERE garage_id = $1 ORDER BY created_at ASC",
        R::TABLE
    );
    let records = sqlx::query_as::<_, R>(&sql)
        .bind(garage_id)
        .fetch_all(executor)
        .await?;
    Ok(records)
}

pub async fn delete_by_id<'e, R, E>(executor: E, id: Uuid) -> Result<(), AppError>
where
    R: Resource,
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(R::ENTITY));
    }
    Ok(())
}

pub async fn set_active<'e, R, E>(executor: E, id: Uuid, active: bool) -> Result<R, AppError>
where
    R: SoftDelete,
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "UPDATE {} SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        R::TABLE
    );
    sqlx::query_as::<_, R>(&sql)
        .bind(id)
        .bind(active)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound(R::ENTITY))
}

/// `SELECT EXISTS` por uma coluna de texto (chaves naturais).
pub async fn exists_by<'e, R, E>(executor: E, column: &str, value: &str) -> Result<bool, AppError>
where
    R: Resource,
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1)",
        R::TABLE,
        column
    );
    let exists: bool = sqlx::query_scalar(&sql)
        .bind(value)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, sqlx::FromRow)]
    struct Widget {
        garage_id: Uuid,
    }

    impl Resource for Widget {
        const TABLE: &'static str = "widgets";
        const ENTITY: &'static str = "Widget";
    }

    impl TenantScoped for Widget {
        fn garage_id(&self) -> Uuid {
            self.garage_id
        }
    }

    #[test]
    fn owner_passes_the_check() {
        let garage = Uuid::new_v4();
        let widget = Widget { garage_id: garage };

        assert!(ensure_owned(widget, garage).is_ok());
    }

    #[test]
    fn other_garage_is_an_ownership_violation() {
        let widget = Widget {
            garage_id: Uuid::new_v4(),
        };

        let err = ensure_owned(widget, Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, AppError::OwnershipViolation("Widget")));
    }
}
