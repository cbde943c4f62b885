// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro de domínio. Serviços e repositórios só conhecem este tipo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Autenticação necessária")]
    AuthenticationRequired,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário sem oficina associada")]
    TenantNotFound,

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("{0} pertence a outra oficina")]
    OwnershipViolation(&'static str),

    #[error("Valor duplicado para '{0}'")]
    DuplicateKey(String),

    // Regras de negócio esperadas. O código vira a chave do catálogo i18n.
    #[error("Regra de negócio violada: {0}")]
    BusinessRule(&'static str),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Chave do catálogo de mensagens.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::AuthenticationRequired => "authentication_required",
            AppError::UserNotFound => "user_not_found",
            AppError::TenantNotFound => "tenant_not_found",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::OwnershipViolation(_) => "ownership_violation",
            AppError::DuplicateKey(_) => "duplicate_key",
            AppError::BusinessRule(code) => code,
            _ => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::OwnershipViolation(_)
            | AppError::DuplicateKey(_)
            | AppError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::TenantNotFound | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro de domínio na resposta HTTP, traduzida para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        let template = store.translate(&locale.0, self.code());

        let message = match &self {
            AppError::NotFound(entity) | AppError::OwnershipViolation(entity) => {
                template.replace("{entity}", entity)
            }
            AppError::DuplicateKey(field) => template.replace("{field}", field),
            _ => template,
        };

        let details = match &self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            _ => None,
        };

        // 500: o detalhe fica apenas no log, nunca na resposta.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        ApiError {
            status,
            error: message,
            details,
        }
    }
}

// Campo -> lista de códigos/mensagens de validação
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details: HashMap<String, Vec<String>> = HashMap::new();
    collect_field_errors(errors, "", &mut details);
    json!(details)
}

fn collect_field_errors(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut HashMap<String, Vec<String>>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                out.insert(path, messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// Mapeia violação de chave única para `DuplicateKey`; o resto segue como erro de banco.
pub fn map_unique_violation(e: sqlx::Error, field: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::DuplicateKey(field.to_string());
        }
    }
    e.into()
}

// Rejeição HTTP padrão da API
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    // Erro de banco com o `kind` escolhido, sem conexão real
    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "fake database error")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.unique {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }
    }

    fn db_error(unique: bool) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { unique }))
    }

    #[test]
    fn concurrent_primary_link_is_a_duplicate_not_a_500() {
        let error = map_unique_violation(db_error(true), "is_primary");

        assert!(matches!(&error, AppError::DuplicateKey(field) if field == "is_primary"));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let error = map_unique_violation(db_error(false), "is_primary");

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn english() -> Locale {
        Locale("en".to_string())
    }

    #[rstest]
    #[case(AppError::NotFound("Address"), StatusCode::NOT_FOUND)]
    #[case(AppError::TenantNotFound, StatusCode::NOT_FOUND)]
    #[case(AppError::OwnershipViolation("Staff"), StatusCode::BAD_REQUEST)]
    #[case(AppError::DuplicateKey("tax_code".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::BusinessRule("insufficient_points"), StatusCode::BAD_REQUEST)]
    #[case(AppError::InvalidToken, StatusCode::UNAUTHORIZED)]
    #[case(AppError::AuthenticationRequired, StatusCode::UNAUTHORIZED)]
    #[case(AppError::Forbidden("role".into()), StatusCode::FORBIDDEN)]
    #[case(AppError::DatabaseError(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_error_categories_to_status(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.status(), expected);
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let store = I18nStore::load().unwrap();
        let errors = Probe { name: String::new() }.validate().unwrap_err();

        let api_error = AppError::ValidationError(errors).to_api_error(&english(), &store);

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.details.unwrap()["name"][0], "required");
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let store = I18nStore::load().unwrap();
        let error = AppError::InternalServerError(anyhow::anyhow!("connection string leaked"));

        let api_error = error.to_api_error(&english(), &store);

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api_error.error.contains("leaked"));
        assert!(api_error.details.is_none());
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let store = I18nStore::load().unwrap();

        let api_error = AppError::NotFound("Branch").to_api_error(&english(), &store);

        assert_eq!(api_error.error, "Branch not found.");
    }
}
