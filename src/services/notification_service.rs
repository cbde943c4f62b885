// src/services/notification_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::{NotificationRepository, UserRepository},
    middleware::tenancy::SessionContext,
    models::{
        auth::User,
        notification::{
            Notification, NotificationChannel, NotificationPayload, NotificationStatus, UnreadCount,
        },
    },
};

/// Mensagem pronta para entrega (notificação ou código OTP).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub channel: NotificationChannel,
    /// ID do usuário, e-mail ou telefone, conforme o canal
    pub recipient: String,
    pub title: String,
    pub body: String,
}

/// Canal de entrega. A implementação padrão só registra no log.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn dispatch(&self, message: &OutboundMessage) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn dispatch(&self, message: &OutboundMessage) -> anyhow::Result<()> {
        tracing::info!(
            channel = ?message.channel,
            recipient = %message.recipient,
            "📨 {}",
            message.title
        );
        Ok(())
    }
}

/// Endereço de entrega conforme o canal. `None` quando o usuário não tem o contato.
pub fn recipient_address(channel: NotificationChannel, user: &User) -> Option<String> {
    match channel {
        NotificationChannel::InApp => Some(user.id.to_string()),
        NotificationChannel::Email => Some(user.email.clone()),
        NotificationChannel::Sms => user
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
            .map(str::to_string),
    }
}

/// Resultado da entrega -> status persistido.
pub fn delivery_status(result: &anyhow::Result<()>) -> NotificationStatus {
    match result {
        Ok(()) => NotificationStatus::Sent,
        Err(_) => NotificationStatus::Failed,
    }
}

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    user_repo: UserRepository,
    sink: Arc<dyn NotificationSink>,
    pool: PgPool,
}

impl NotificationService {
    pub fn new(
        repo: NotificationRepository,
        user_repo: UserRepository,
        sink: Arc<dyn NotificationSink>,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            user_repo,
            sink,
            pool,
        }
    }

    /// Persiste e depois entrega. Falha de entrega não derruba a requisição.
    pub async fn create(
        &self,
        session: &SessionContext,
        payload: &NotificationPayload,
    ) -> Result<Notification, AppError> {
        let recipient_id = payload.user_id.unwrap_or(session.user_id);

        let recipient = self
            .user_repo
            .find_in_garage(recipient_id, session.garage_id)
            .await?
            .ok_or(AppError::OwnershipViolation("User"))?;

        let notification = self
            .repo
            .create(&self.pool, session.garage_id, recipient.id, payload)
            .await?;

        let result = match recipient_address(notification.channel, &recipient) {
            Some(address) => {
                let message = OutboundMessage {
                    channel: notification.channel,
                    recipient: address,
                    title: notification.title.clone(),
                    body: notification.message.clone(),
                };
                self.sink.dispatch(&message).await
            }
            None => Err(anyhow::anyhow!("destinatário sem contato para {:?}", notification.channel)),
        };
        if let Err(e) = &result {
            tracing::warn!("⚠️ Falha ao entregar notificação {}: {:#}", notification.id, e);
        }

        self.repo.set_status(notification.id, delivery_status(&result)).await
    }

    /// Entrega avulsa (usada pelo OTP).
    pub async fn send(&self, message: &OutboundMessage) -> bool {
        match self.sink.dispatch(message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("⚠️ Falha ao entregar mensagem para {}: {:#}", message.recipient, e);
                false
            }
        }
    }

    pub async fn my_notifications(&self, session: &SessionContext) -> Result<Vec<Notification>, AppError> {
        self.repo.list_for_user(session.garage_id, session.user_id).await
    }

    pub async fn unread_count(&self, session: &SessionContext) -> Result<UnreadCount, AppError> {
        let unread = self.repo.count_unread(session.garage_id, session.user_id).await?;
        Ok(UnreadCount { unread })
    }

    pub async fn mark_read(&self, session: &SessionContext, id: Uuid) -> Result<Notification, AppError> {
        let notification = self.fetch_own(session, id).await?;
        self.repo.mark_read(&self.pool, notification.id).await
    }

    pub async fn mark_all_read(&self, session: &SessionContext) -> Result<UnreadCount, AppError> {
        let marked = self.repo.mark_all_read(session.garage_id, session.user_id).await?;
        tracing::debug!("{} notificações marcadas como lidas", marked);
        Ok(UnreadCount { unread: 0 })
    }

    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let notification = self.fetch_own(session, id).await?;
        crud::delete_by_id::<Notification, _>(&self.pool, notification.id).await
    }

    // Oficina do chamador e destinatário = chamador
    async fn fetch_own(&self, session: &SessionContext, id: Uuid) -> Result<Notification, AppError> {
        let notification =
            crud::fetch_owned::<Notification, _>(&self.pool, id, session.garage_id).await?;

        if notification.user_id != session.user_id {
            return Err(AppError::OwnershipViolation("Notification"));
        }
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use chrono::Utc;
    use rstest::rstest;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<OutboundMessage>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn dispatch(&self, message: &OutboundMessage) -> anyhow::Result<()> {
            self.delivered.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl NotificationSink for BrokenSink {
        async fn dispatch(&self, _message: &OutboundMessage) -> anyhow::Result<()> {
            anyhow::bail!("smtp down")
        }
    }

    fn message() -> OutboundMessage {
        OutboundMessage {
            channel: NotificationChannel::Email,
            recipient: "owner@garage.in".into(),
            title: "Revisão".into(),
            body: "Seu carro está pronto".into(),
        }
    }

    fn user(phone: Option<&str>) -> User {
        User {
            id: Uuid::nil(),
            garage_id: Some(Uuid::new_v4()),
            email: "mechanic@garage.in".into(),
            password_hash: "x".into(),
            full_name: "Asha Rao".into(),
            phone: phone.map(str::to_string),
            role: UserRole::Staff,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(NotificationChannel::InApp, Some("+919800000000"), Some("00000000-0000-0000-0000-000000000000"))]
    #[case(NotificationChannel::Email, None, Some("mechanic@garage.in"))]
    #[case(NotificationChannel::Sms, Some("+919800000000"), Some("+919800000000"))]
    #[case(NotificationChannel::Sms, None, None)]
    #[case(NotificationChannel::Sms, Some("  "), None)]
    fn recipient_follows_the_channel(
        #[case] channel: NotificationChannel,
        #[case] phone: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(recipient_address(channel, &user(phone)).as_deref(), expected);
    }

    #[tokio::test]
    async fn log_sink_always_succeeds() {
        let result = LogNotificationSink.dispatch(&message()).await;
        assert_eq!(delivery_status(&result), NotificationStatus::Sent);
    }

    #[tokio::test]
    async fn failed_delivery_becomes_failed_status() {
        let result = BrokenSink.dispatch(&message()).await;
        assert_eq!(delivery_status(&result), NotificationStatus::Failed);
    }

    #[tokio::test]
    async fn sink_behind_trait_object_receives_the_message() {
        let recording = Arc::new(RecordingSink::default());
        let sink: Arc<dyn NotificationSink> = recording.clone();

        sink.dispatch(&message()).await.unwrap();

        assert_eq!(recording.delivered.lock().unwrap().as_slice(), &[message()]);
    }
}
