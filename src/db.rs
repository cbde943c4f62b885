// src/db.rs

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod address_repo;
pub use address_repo::{AddressOwner, AddressRepository};
pub mod garage_repo;
pub use garage_repo::GarageRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod staff_repo;
pub use staff_repo::StaffRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod snapshot_repo;
pub use snapshot_repo::SnapshotRepository;
pub mod quotation_repo;
pub use quotation_repo::QuotationRepository;
pub mod maintenance_repo;
pub use maintenance_repo::MaintenanceRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod loyalty_repo;
pub use loyalty_repo::LoyaltyRepository;
pub mod otp_repo;
pub use otp_repo::OtpRepository;
