//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`NotApplicable`] thrown when a settlement is requested for a lease that
//!   is not active in the requested year.
//! - [`InvalidAmount`] / [`InvalidSettings`] thrown on rejected writes.
//!
//! Configuration gaps (unknown category codes, missing settings or person
//! counts) and degenerate allocation bases are never errors: the allocation
//! core resolves them through fallbacks.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`NotApplicable`]: EngineError::NotApplicable
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidSettings`]: EngineError::InvalidSettings
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Not applicable: {0}")]
    NotApplicable(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidSettings(a), Self::InvalidSettings(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::NotApplicable(a), Self::NotApplicable(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
