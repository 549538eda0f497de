//! The module contains the errors the engine can throw.
use sea_orm::DbErr;
use thiserror::Error;

/// The kind of entity an error refers to, used by callers to pick
/// entity-specific error codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Card,
    Category,
    Expense,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Category => "category",
            Self::Expense => "expense",
        }
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{} not found", .0.as_str())]
    NotFound(EntityKind),
    #[error("category \"{0}\" already present")]
    DuplicateCategory(String),
    #[error("{} still has associated expenses", .0.as_str())]
    HasExpenses(EntityKind),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("expense date cannot be in the future")]
    FutureDate,
    #[error("invalid report range: {0}")]
    InvalidRange(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::DuplicateCategory(a), Self::DuplicateCategory(b)) => a == b,
            (Self::HasExpenses(a), Self::HasExpenses(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::FutureDate, Self::FutureDate) => true,
            (Self::InvalidRange(a), Self::InvalidRange(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
