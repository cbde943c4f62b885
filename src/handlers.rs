// src/handlers.rs

pub mod addresses;
pub mod auth;
pub mod branches;
pub mod catalog;
pub mod customers;
pub mod finance;
pub mod loyalty;
pub mod maintenance;
pub mod notifications;
pub mod onboarding;
pub mod quotations;
pub mod staff;
pub mod vehicles;
