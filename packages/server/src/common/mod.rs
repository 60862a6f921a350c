// Common types and utilities shared across the application

pub mod actor;
pub mod errors;
pub mod pagination;

pub use actor::Actor;
pub use errors::{DomainError, RecoverableError};
pub use pagination::{Page, PageRequest, ValidatedPage};
