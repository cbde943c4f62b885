// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::auth::{User, UserRole},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário; e-mail duplicado vira DuplicateKey
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name, phone)
            VALUES (LOWER($1), $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(phone)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "email"))
    }

    /// Vincula o usuário (ainda sem oficina) a uma oficina com o papel informado.
    /// `None` se ele já tinha oficina.
    pub async fn assign_garage<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        garage_id: Uuid,
        role: UserRole,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET garage_id = $2, role = $3, updated_at = NOW()
            WHERE id = $1 AND garage_id IS NULL
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(garage_id)
        .bind(role)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    /// O destinatário pertence à oficina?
    // Usuário da oficina (None se não existe ou é de outra oficina)
    pub async fn find_in_garage(&self, user_id: Uuid, garage_id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND garage_id = $2")
                .bind(user_id)
                .bind(garage_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_user)
    }
}
