// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AddressRepository, CatalogRepository, CustomerRepository, FinanceRepository,
        GarageRepository, LoyaltyRepository, MaintenanceRepository, NotificationRepository,
        OtpRepository, QuotationRepository, SnapshotRepository, StaffRepository, UserRepository,
    },
    services::{
        address_service::AddressService,
        auth::AuthService,
        branch_service::BranchService,
        catalog_service::CatalogService,
        customer_service::CustomerService,
        finance_service::FinanceService,
        loyalty_service::LoyaltyService,
        maintenance_service::MaintenanceService,
        notification_service::{LogNotificationSink, NotificationService},
        onboarding_service::OnboardingService,
        otp_service::OtpService,
        quotation_service::QuotationService,
        snapshot_service::SnapshotService,
        staff_service::StaffService,
        vehicle_service::VehicleService,
    },
};

/// Configuração lida do ambiente (`.env` incluso).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub jwt_expiration_days: i64,
    pub otp_ttl_minutes: i64,
    pub otp_cleanup_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            jwt_expiration_days: parse_or("JWT_EXPIRATION_DAYS", 7)?,
            otp_ttl_minutes: parse_or("OTP_TTL_MINUTES", 10)?,
            otp_cleanup_interval_secs: parse_or("OTP_CLEANUP_INTERVAL_SECS", 3600)?,
        })
    }
}

// Variável ausente = padrão; presente mas inválida = erro
fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} inválida: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub otp_service: OtpService,
    pub onboarding_service: OnboardingService,
    pub address_service: AddressService,
    pub customer_service: CustomerService,
    pub vehicle_service: VehicleService,
    pub catalog_service: CatalogService,
    pub branch_service: BranchService,
    pub staff_service: StaffService,
    pub finance_service: FinanceService,
    pub snapshot_service: SnapshotService,
    pub quotation_service: QuotationService,
    pub maintenance_service: MaintenanceService,
    pub notification_service: NotificationService,
    pub loyalty_service: LoyaltyService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let i18n_store = I18nStore::load()?;

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let address_repo = AddressRepository::new(db_pool.clone());
        let garage_repo = GarageRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let staff_repo = StaffRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            chrono::Duration::days(config.jwt_expiration_days),
            db_pool.clone(),
        );

        let notification_service = NotificationService::new(
            NotificationRepository::new(db_pool.clone()),
            user_repo.clone(),
            Arc::new(LogNotificationSink),
            db_pool.clone(),
        );

        let otp_service = OtpService::new(
            OtpRepository::new(db_pool.clone()),
            user_repo.clone(),
            notification_service.clone(),
            chrono::Duration::minutes(config.otp_ttl_minutes),
            db_pool.clone(),
        );

        let onboarding_service = OnboardingService::new(
            garage_repo.clone(),
            user_repo,
            address_repo.clone(),
            staff_repo.clone(),
            finance_repo.clone(),
            db_pool.clone(),
        );

        let address_service = AddressService::new(address_repo, db_pool.clone());

        Ok(Self {
            customer_service: CustomerService::new(
                customer_repo.clone(),
                address_service.clone(),
                db_pool.clone(),
            ),
            vehicle_service: VehicleService::new(customer_repo, db_pool.clone()),
            catalog_service: CatalogService::new(CatalogRepository::new(db_pool.clone()), db_pool.clone()),
            branch_service: BranchService::new(garage_repo, address_service.clone(), db_pool.clone()),
            staff_service: StaffService::new(staff_repo, db_pool.clone()),
            finance_service: FinanceService::new(finance_repo, db_pool.clone()),
            snapshot_service: SnapshotService::new(SnapshotRepository::new(db_pool.clone()), db_pool.clone()),
            quotation_service: QuotationService::new(QuotationRepository::new(db_pool.clone()), db_pool.clone()),
            maintenance_service: MaintenanceService::new(
                MaintenanceRepository::new(db_pool.clone()),
                db_pool.clone(),
            ),
            loyalty_service: LoyaltyService::new(LoyaltyRepository::new(db_pool.clone()), db_pool.clone()),
            address_service,
            notification_service,
            otp_service,
            onboarding_service,
            auth_service,
            i18n_store,
            config,
            db_pool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_variable_uses_the_default() {
        let value: u32 = parse_or("GARAGE_TEST_SURELY_UNSET_VARIABLE", 5).unwrap();
        assert_eq!(value, 5);
    }
}
