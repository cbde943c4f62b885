pub mod crud;
pub mod criteria;
pub mod error;
pub mod i18n;
pub mod pagination;
