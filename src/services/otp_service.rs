// src/services/otp_service.rs

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use rand::{rngs::OsRng, Rng};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{OtpRepository, UserRepository},
    models::{
        notification::NotificationChannel,
        otp::{OtpIssued, OtpType, OtpVerified, RequestOtpPayload, VerifyOtpPayload},
    },
    services::notification_service::{NotificationService, OutboundMessage},
};

pub const OTP_LENGTH: usize = 6;

/// Seis dígitos, com zeros à esquerda.
pub fn generate_code() -> String {
    let value: u32 = OsRng.gen_range(0..1_000_000);
    format!("{:0width$}", value, width = OTP_LENGTH)
}

/// E-mail vai por e-mail; o resto é tratado como telefone.
pub fn channel_for(target: &str) -> NotificationChannel {
    if target.contains('@') {
        NotificationChannel::Email
    } else {
        NotificationChannel::Sms
    }
}

fn normalize_target(target: &str) -> String {
    let target = target.trim();
    if target.contains('@') {
        target.to_lowercase()
    } else {
        target.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

#[derive(Clone)]
pub struct OtpService {
    repo: OtpRepository,
    user_repo: UserRepository,
    notifications: NotificationService,
    ttl: Duration,
    pool: PgPool,
}

impl OtpService {
    pub fn new(
        repo: OtpRepository,
        user_repo: UserRepository,
        notifications: NotificationService,
        ttl: Duration,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            user_repo,
            notifications,
            ttl,
            pool,
        }
    }

    pub async fn request(&self, payload: &RequestOtpPayload) -> Result<OtpIssued, AppError> {
        let target = normalize_target(&payload.target);

        // Vincula ao usuário quando o destino é um e-mail cadastrado
        let user_id = match channel_for(&target) {
            NotificationChannel::Email => self.user_repo.find_by_email(&target).await?.map(|u| u.id),
            _ => None,
        };

        let code = generate_code();
        let expires_at = Utc::now() + self.ttl;

        let mut tx = self.pool.begin().await?;
        self.repo
            .invalidate_previous(&mut *tx, &target, payload.otp_type)
            .await?;
        let otp = self
            .repo
            .create(&mut *tx, user_id, &target, &code, payload.otp_type, expires_at)
            .await?;
        tx.commit().await?;

        let message = OutboundMessage {
            channel: channel_for(&target),
            recipient: target.clone(),
            title: subject_for(payload.otp_type).to_string(),
            body: format!("Código: {} (válido por {} minutos)", code, self.ttl.num_minutes()),
        };
        self.notifications.send(&message).await;

        tracing::info!("🔐 OTP {:?} emitido para {}", otp.otp_type, target);

        Ok(OtpIssued {
            target,
            expires_at: otp.expires_at,
        })
    }

    /// Consome o código mais recente que confere. Inválido, usado ou expirado = `otp_invalid`.
    pub async fn verify(&self, payload: &VerifyOtpPayload) -> Result<OtpVerified, AppError> {
        let target = normalize_target(&payload.target);

        let mut tx = self.pool.begin().await?;
        let otp = self
            .repo
            .find_latest_matching(&mut *tx, &target, payload.otp_type, payload.code.trim())
            .await?
            .filter(|otp| otp.is_valid())
            .ok_or(AppError::BusinessRule("otp_invalid"))?;

        self.repo.mark_used(&mut *tx, otp.id).await?;
        tx.commit().await?;

        Ok(OtpVerified { verified: true })
    }

    /// Tarefa de fundo: apaga códigos expirados ou usados a cada `interval`.
    pub fn spawn_cleanup(self, interval: StdDuration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match self.repo.delete_stale(Utc::now()).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!("🧹 {} códigos OTP removidos", removed),
                    Err(e) => tracing::error!("Falha na limpeza de OTP: {:?}", e),
                }
            }
        })
    }
}

fn subject_for(otp_type: OtpType) -> &'static str {
    match otp_type {
        OtpType::EmailVerification => "Verificação de e-mail",
        OtpType::PhoneVerification => "Verificação de telefone",
        OtpType::PasswordReset => "Redefinição de senha",
        OtpType::Login => "Código de acesso",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn codes_have_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), OTP_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[rstest]
    #[case("owner@garage.in", NotificationChannel::Email)]
    #[case("+91 98200 12345", NotificationChannel::Sms)]
    fn channel_follows_the_target(#[case] target: &str, #[case] channel: NotificationChannel) {
        assert_eq!(channel_for(target), channel);
    }

    #[rstest]
    #[case("  Owner@Garage.IN ", "owner@garage.in")]
    #[case("+91 98200 12345", "+919820012345")]
    fn targets_are_normalized(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_target(raw), expected);
    }
}
