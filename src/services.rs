// src/services.rs

pub mod address_service;
pub mod auth;
pub mod branch_service;
pub mod catalog_service;
pub mod customer_service;
pub mod finance_service;
pub mod loyalty_service;
pub mod maintenance_service;
pub mod notification_service;
pub mod onboarding_service;
pub mod otp_service;
pub mod quotation_service;
pub mod snapshot_service;
pub mod staff_service;
pub mod vehicle_service;
