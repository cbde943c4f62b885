//src/main.rs

use std::time::Duration;

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::{auth_guard, tenant_guard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let app_state = AppState::new(config).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Limpeza periódica dos códigos OTP vencidos ou usados
    app_state.otp_service.clone().spawn_cleanup(Duration::from_secs(
        app_state.config.otp_cleanup_interval_secs,
    ));

    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/otp/request", post(handlers::auth::request_otp))
        .route("/otp/verify", post(handlers::auth::verify_otp));

    // Rotas que exigem apenas login
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let onboarding_routes = Router::new()
        .route("/onboarding/complete", post(handlers::onboarding::complete_onboarding))
        .route("/onboarding/status", get(handlers::onboarding::onboarding_status))
        .route("/onboarding/next-step", get(handlers::onboarding::next_step))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Dados globais: sem oficina; escrita restrita pelo RequireRole
    let catalog_routes = Router::new()
        .route(
            "/taxes",
            post(handlers::catalog::create_tax).get(handlers::catalog::list_taxes),
        )
        .route("/taxes/by-code/{code}", get(handlers::catalog::tax_by_code))
        .route(
            "/taxes/{id}",
            get(handlers::catalog::get_tax)
                .patch(handlers::catalog::update_tax)
                .delete(handlers::catalog::delete_tax),
        )
        .route(
            "/vehicle-brands",
            post(handlers::catalog::create_brand).get(handlers::catalog::list_brands),
        )
        .route("/vehicle-brands/search", get(handlers::catalog::search_brands))
        .route(
            "/vehicle-brands/{id}",
            get(handlers::catalog::get_brand)
                .patch(handlers::catalog::update_brand)
                .delete(handlers::catalog::delete_brand),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Tudo o que pertence a uma oficina
    let tenant_routes = Router::new()
        // Endereços
        .route("/addresses", post(handlers::addresses::create_address))
        .route("/addresses/my-addresses", get(handlers::addresses::my_addresses))
        .route("/addresses/search", get(handlers::addresses::search_addresses))
        .route(
            "/addresses/{id}",
            get(handlers::addresses::get_address)
                .patch(handlers::addresses::update_address)
                .delete(handlers::addresses::delete_address),
        )
        // Clientes
        .route("/customers", post(handlers::customers::create_customer))
        .route("/customers/my-customers", get(handlers::customers::my_customers))
        .route("/customers/search", get(handlers::customers::search_customers))
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .patch(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/customers/{id}/addresses",
            post(handlers::customers::add_customer_address)
                .get(handlers::customers::list_customer_addresses),
        )
        .route(
            "/customers/{id}/addresses/{address_id}",
            axum::routing::delete(handlers::customers::remove_customer_address),
        )
        // Veículos
        .route("/vehicles", post(handlers::vehicles::create_vehicle))
        .route("/vehicles/my-vehicles", get(handlers::vehicles::my_vehicles))
        .route("/vehicles/search", get(handlers::vehicles::search_vehicles))
        .route(
            "/vehicles/by-customer/{customer_id}",
            get(handlers::vehicles::vehicles_by_customer),
        )
        .route(
            "/vehicles/{id}",
            get(handlers::vehicles::get_vehicle)
                .patch(handlers::vehicles::update_vehicle)
                .delete(handlers::vehicles::delete_vehicle),
        )
        // Filiais
        .route("/branches", post(handlers::branches::create_branch))
        .route("/branches/my-branches", get(handlers::branches::my_branches))
        .route(
            "/branches/{id}",
            get(handlers::branches::get_branch)
                .patch(handlers::branches::update_branch)
                .delete(handlers::branches::delete_branch),
        )
        .route(
            "/branches/{id}/addresses",
            post(handlers::branches::add_branch_address)
                .get(handlers::branches::list_branch_addresses),
        )
        .route(
            "/branches/{id}/addresses/{address_id}",
            axum::routing::delete(handlers::branches::remove_branch_address),
        )
        // Equipe
        .route(
            "/staff",
            post(handlers::staff::create_staff).get(handlers::staff::list_staff),
        )
        .route(
            "/staff/{id}",
            get(handlers::staff::get_staff)
                .patch(handlers::staff::update_staff)
                .delete(handlers::staff::delete_staff),
        )
        // Financeiro
        .route("/payment-methods", post(handlers::finance::create_payment_method))
        .route(
            "/payment-methods/my-payment-methods",
            get(handlers::finance::my_payment_methods),
        )
        .route("/payment-methods/{id}", get(handlers::finance::get_payment_method))
        .route(
            "/payment-methods/{id}/activate",
            patch(handlers::finance::activate_payment_method),
        )
        .route(
            "/payment-methods/{id}/deactivate",
            patch(handlers::finance::deactivate_payment_method),
        )
        .route("/bank-accounts", post(handlers::finance::create_bank_account))
        .route(
            "/bank-accounts/my-bank-accounts",
            get(handlers::finance::my_bank_accounts),
        )
        .route(
            "/bank-accounts/{id}",
            get(handlers::finance::get_bank_account)
                .patch(handlers::finance::update_bank_account)
                .delete(handlers::finance::delete_bank_account),
        )
        .route("/daily-snapshots/generate", post(handlers::finance::generate_snapshot))
        .route("/daily-snapshots/range", get(handlers::finance::snapshot_range))
        .route("/daily-snapshots/summary", get(handlers::finance::snapshot_summary))
        .route("/daily-snapshots/{date}", get(handlers::finance::get_snapshot))
        // Orçamentos
        .route("/quotations", post(handlers::quotations::create_quotation))
        .route("/quotations/my-quotations", get(handlers::quotations::my_quotations))
        .route("/quotations/search", get(handlers::quotations::search_quotations))
        .route(
            "/quotations/{id}",
            get(handlers::quotations::get_quotation)
                .patch(handlers::quotations::update_quotation)
                .delete(handlers::quotations::delete_quotation),
        )
        .route(
            "/quotations/{id}/status",
            patch(handlers::quotations::change_quotation_status),
        )
        // Manutenção
        .route("/maintenance-schedules", post(handlers::maintenance::create_schedule))
        .route(
            "/maintenance-schedules/my-schedules",
            get(handlers::maintenance::my_schedules),
        )
        .route(
            "/maintenance-schedules/upcoming",
            get(handlers::maintenance::upcoming_schedules),
        )
        .route(
            "/maintenance-schedules/search",
            get(handlers::maintenance::search_schedules),
        )
        .route(
            "/maintenance-schedules/by-vehicle/{vehicle_id}",
            get(handlers::maintenance::schedules_by_vehicle),
        )
        .route(
            "/maintenance-schedules/{id}",
            get(handlers::maintenance::get_schedule)
                .patch(handlers::maintenance::update_schedule)
                .delete(handlers::maintenance::delete_schedule),
        )
        .route(
            "/maintenance-schedules/{id}/complete",
            patch(handlers::maintenance::complete_schedule),
        )
        // Notificações
        .route("/notifications", post(handlers::notifications::create_notification))
        .route(
            "/notifications/my-notifications",
            get(handlers::notifications::my_notifications),
        )
        .route("/notifications/unread-count", get(handlers::notifications::unread_count))
        .route("/notifications/read-all", patch(handlers::notifications::mark_all_read))
        .route("/notifications/{id}/read", patch(handlers::notifications::mark_read))
        .route(
            "/notifications/{id}",
            axum::routing::delete(handlers::notifications::delete_notification),
        )
        // Fidelidade
        .route("/loyalty", post(handlers::loyalty::enroll))
        .route("/loyalty/my-programs", get(handlers::loyalty::my_programs))
        .route("/loyalty/summary", get(handlers::loyalty::loyalty_summary))
        .route(
            "/loyalty/by-customer/{customer_id}",
            get(handlers::loyalty::program_by_customer),
        )
        .route(
            "/loyalty/{id}",
            get(handlers::loyalty::get_program).delete(handlers::loyalty::delete_program),
        )
        .route("/loyalty/{id}/earn", patch(handlers::loyalty::earn_points))
        .route("/loyalty/{id}/redeem", patch(handlers::loyalty::redeem_points))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let admin_routes = Router::new()
        .merge(onboarding_routes)
        .merge(catalog_routes)
        .merge(tenant_routes);

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/admin", admin_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state.clone());

    let listener = TcpListener::bind(&app_state.config.server_addr)
        .await
        .with_context(|| format!("Falha ao escutar em {}", app_state.config.server_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
