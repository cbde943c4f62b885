// src/models.rs

pub mod address;
pub mod auth;
pub mod catalog;
pub mod customer;
pub mod finance;
pub mod garage;
pub mod loyalty;
pub mod maintenance;
pub mod notification;
pub mod onboarding;
pub mod otp;
pub mod quotation;
pub mod staff;
