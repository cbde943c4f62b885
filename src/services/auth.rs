// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError},
    db::UserRepository,
    models::auth::{Claims, RegisterUserPayload, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl: Duration,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl: Duration, pool: PgPool) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl,
            pool,
        }
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<String, AppError> {
        // 1. E-mail já cadastrado
        let email = payload.email.trim().to_lowercase();
        if crud::exists_by::<User, _>(&self.pool, "email", &email).await? {
            return Err(AppError::DuplicateKey("email".to_string()));
        }

        // 2. Hashing fora do runtime assíncrono
        let password_clone = payload.password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 3. Cria o usuário (sem oficina até o onboarding)
        let new_user = self
            .user_repo
            .create_user(
                &self.pool,
                &email,
                &hashed_password,
                payload.full_name.trim(),
                payload.phone.as_deref(),
            )
            .await?;

        tracing::info!("👤 Novo usuário registrado: {}", new_user.id);

        create_token(new_user.id, &self.jwt_secret, self.token_ttl)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        create_token(user.id, &self.jwt_secret, self.token_ttl)
    }

    /// Token -> usuário ativo. Qualquer falha responde 401.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(token, &self.jwt_secret)?;

        match self.user_repo.find_by_id(claims.sub).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::InvalidToken),
        }
    }
}

pub fn create_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + ttl;

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_decodes_to_the_same_subject() {
        let user_id = Uuid::new_v4();

        let token = create_token(user_id, SECRET, Duration::days(7)).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = create_token(Uuid::new_v4(), "other-secret", Duration::days(7)).unwrap();

        assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Bem além da tolerância padrão de 60s
        let token = create_token(Uuid::new_v4(), SECRET, Duration::hours(-2)).unwrap();

        assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_token("not-a-jwt", SECRET).is_err());
    }
}
