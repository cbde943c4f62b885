// src/db/notification_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notification::{Notification, NotificationPayload, NotificationStatus},
};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        garage_id: Uuid,
        user_id: Uuid,
        payload: &NotificationPayload,
    ) -> Result<Notification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (garage_id, user_id, title, message, notification_type, channel)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(garage_id)
        .bind(user_id)
        .bind(&payload.title)
        .bind(&payload.message)
        .bind(payload.notification_type)
        .bind(payload.channel)
        .fetch_one(executor)
        .await?;

        Ok(notification)
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Notification"))
    }

    pub async fn list_for_user(
        &self,
        garage_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE garage_id = $1 AND user_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(garage_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    pub async fn count_unread(&self, garage_id: Uuid, user_id: Uuid) -> Result<i64, AppError> {
        let unread: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE garage_id = $1 AND user_id = $2 AND read_at IS NULL
            "#,
        )
        .bind(garage_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(unread)
    }

    pub async fn mark_read<'e, E>(&self, executor: E, id: Uuid) -> Result<Notification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET status = 'READ', read_at = COALESCE(read_at, NOW()), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Notification"))
    }

    /// Retorna quantas foram marcadas.
    pub async fn mark_all_read(&self, garage_id: Uuid, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET status = 'READ', read_at = NOW(), updated_at = NOW()
            WHERE garage_id = $1 AND user_id = $2 AND read_at IS NULL
            "#,
        )
        .bind(garage_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
