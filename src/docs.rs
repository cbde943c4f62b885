// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::request_otp,
        handlers::auth::verify_otp,

        // --- Users ---
        handlers::auth::get_me,

        // --- Onboarding ---
        handlers::onboarding::complete_onboarding,
        handlers::onboarding::onboarding_status,
        handlers::onboarding::next_step,

        // --- Addresses ---
        handlers::addresses::create_address,
        handlers::addresses::get_address,
        handlers::addresses::my_addresses,
        handlers::addresses::update_address,
        handlers::addresses::delete_address,
        handlers::addresses::search_addresses,

        // --- Customers ---
        handlers::customers::create_customer,
        handlers::customers::get_customer,
        handlers::customers::my_customers,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::search_customers,
        handlers::customers::add_customer_address,
        handlers::customers::list_customer_addresses,
        handlers::customers::remove_customer_address,

        // --- Vehicles ---
        handlers::vehicles::create_vehicle,
        handlers::vehicles::get_vehicle,
        handlers::vehicles::my_vehicles,
        handlers::vehicles::update_vehicle,
        handlers::vehicles::delete_vehicle,
        handlers::vehicles::vehicles_by_customer,
        handlers::vehicles::search_vehicles,

        // --- Catalog ---
        handlers::catalog::create_tax,
        handlers::catalog::list_taxes,
        handlers::catalog::get_tax,
        handlers::catalog::tax_by_code,
        handlers::catalog::update_tax,
        handlers::catalog::delete_tax,
        handlers::catalog::create_brand,
        handlers::catalog::list_brands,
        handlers::catalog::search_brands,
        handlers::catalog::get_brand,
        handlers::catalog::update_brand,
        handlers::catalog::delete_brand,

        // --- Branches ---
        handlers::branches::create_branch,
        handlers::branches::get_branch,
        handlers::branches::my_branches,
        handlers::branches::update_branch,
        handlers::branches::delete_branch,
        handlers::branches::add_branch_address,
        handlers::branches::list_branch_addresses,
        handlers::branches::remove_branch_address,

        // --- Staff ---
        handlers::staff::create_staff,
        handlers::staff::list_staff,
        handlers::staff::get_staff,
        handlers::staff::update_staff,
        handlers::staff::delete_staff,

        // --- Finance ---
        handlers::finance::create_payment_method,
        handlers::finance::get_payment_method,
        handlers::finance::my_payment_methods,
        handlers::finance::activate_payment_method,
        handlers::finance::deactivate_payment_method,
        handlers::finance::create_bank_account,
        handlers::finance::get_bank_account,
        handlers::finance::my_bank_accounts,
        handlers::finance::update_bank_account,
        handlers::finance::delete_bank_account,
        handlers::finance::generate_snapshot,
        handlers::finance::get_snapshot,
        handlers::finance::snapshot_range,
        handlers::finance::snapshot_summary,

        // --- Quotations ---
        handlers::quotations::create_quotation,
        handlers::quotations::get_quotation,
        handlers::quotations::my_quotations,
        handlers::quotations::update_quotation,
        handlers::quotations::delete_quotation,
        handlers::quotations::change_quotation_status,
        handlers::quotations::search_quotations,

        // --- Maintenance ---
        handlers::maintenance::create_schedule,
        handlers::maintenance::get_schedule,
        handlers::maintenance::my_schedules,
        handlers::maintenance::update_schedule,
        handlers::maintenance::delete_schedule,
        handlers::maintenance::complete_schedule,
        handlers::maintenance::upcoming_schedules,
        handlers::maintenance::schedules_by_vehicle,
        handlers::maintenance::search_schedules,

        // --- Notifications ---
        handlers::notifications::create_notification,
        handlers::notifications::my_notifications,
        handlers::notifications::unread_count,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
        handlers::notifications::delete_notification,

        // --- Loyalty ---
        handlers::loyalty::enroll,
        handlers::loyalty::get_program,
        handlers::loyalty::program_by_customer,
        handlers::loyalty::my_programs,
        handlers::loyalty::earn_points,
        handlers::loyalty::redeem_points,
        handlers::loyalty::delete_program,
        handlers::loyalty::loyalty_summary,
    ),
    components(
        schemas(
            common::pagination::PageInfo,

            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::otp::OtpType,
            models::otp::RequestOtpPayload,
            models::otp::VerifyOtpPayload,
            models::otp::OtpIssued,
            models::otp::OtpVerified,

            // --- Oficina ---
            models::garage::Garage,
            models::garage::Branch,
            models::garage::BranchPayload,
            models::onboarding::OnboardingStep,
            models::onboarding::GarageProfilePayload,
            models::onboarding::MainBranchPayload,
            models::onboarding::CompleteOnboardingPayload,
            models::onboarding::OnboardingResult,
            models::onboarding::OnboardingStatus,
            models::onboarding::NextStep,

            // --- Endereços ---
            models::address::AddressType,
            models::address::Address,
            models::address::AddressPayload,
            models::address::LinkAddressPayload,
            models::address::LinkedAddress,

            // --- Clientes e veículos ---
            models::customer::Customer,
            models::customer::CustomerPayload,
            models::customer::FuelType,
            models::customer::Vehicle,
            models::customer::VehiclePayload,

            // --- Catálogo ---
            models::catalog::TaxType,
            models::catalog::Tax,
            models::catalog::TaxPayload,
            models::catalog::VehicleBrand,
            models::catalog::VehicleBrandPayload,

            // --- Equipe ---
            models::staff::StaffRole,
            models::staff::Staff,
            models::staff::StaffPayload,
            models::staff::StaffPage,

            // --- Financeiro ---
            models::finance::PaymentMethodType,
            models::finance::BankAccountType,
            models::finance::PaymentMethod,
            models::finance::PaymentMethodPayload,
            models::finance::BankAccount,
            models::finance::BankAccountPayload,
            models::finance::DailySnapshot,
            models::finance::SnapshotSummary,

            // --- Orçamentos ---
            models::quotation::QuotationStatus,
            models::quotation::QuotationLine,
            models::quotation::Quotation,
            models::quotation::QuotationLinePayload,
            models::quotation::QuotationPayload,
            models::quotation::QuotationStatusPayload,

            // --- Manutenção ---
            models::maintenance::MaintenanceStatus,
            models::maintenance::MaintenanceSchedule,
            models::maintenance::MaintenancePayload,

            // --- Notificações ---
            models::notification::NotificationType,
            models::notification::NotificationChannel,
            models::notification::NotificationStatus,
            models::notification::Notification,
            models::notification::NotificationPayload,
            models::notification::UnreadCount,

            // --- Fidelidade ---
            models::loyalty::LoyaltyTier,
            models::loyalty::LoyaltyProgram,
            models::loyalty::EnrollPayload,
            models::loyalty::PointsPayload,
            models::loyalty::LoyaltySummary,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, registro e códigos OTP"),
        (name = "Onboarding", description = "Cadastro inicial da oficina"),
        (name = "Addresses", description = "Endereços da oficina"),
        (name = "Customers", description = "Clientes e seus endereços"),
        (name = "Vehicles", description = "Veículos dos clientes"),
        (name = "Catalog", description = "Impostos e marcas (dados globais)"),
        (name = "Branches", description = "Filiais e seus endereços"),
        (name = "Staff", description = "Equipe da oficina"),
        (name = "Finance", description = "Formas de pagamento, contas bancárias e fotografias diárias"),
        (name = "Quotations", description = "Orçamentos"),
        (name = "Maintenance", description = "Agenda de manutenções"),
        (name = "Notifications", description = "Notificações dos usuários"),
        (name = "Loyalty", description = "Programa de fidelidade")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_declares_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();

        assert!(components.security_schemes.contains_key("api_jwt"));
    }

    #[test]
    fn tenant_routes_are_documented() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/admin/quotations/{id}/status"));
        assert!(doc.paths.paths.contains_key("/api/admin/onboarding/complete"));
    }
}
