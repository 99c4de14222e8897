use crate::core::models::settlement::SettlementStatus;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum SplitLedgerError {
    #[error("Event {0} not found")]
    EventNotFound(String),
    #[error("Settlement {0} not found")]
    SettlementNotFound(String),
    #[error("User {0} is not allowed to perform this action")]
    Forbidden(String),
    #[error("Settlement {id} is {actual}, expected {expected}")]
    InvalidStatus {
        id: String,
        actual: SettlementStatus,
        expected: SettlementStatus,
    },
    #[error("Split amounts for expense {0} do not add up to its total")]
    InvalidSplit(String),
    #[error("Invalid amount {amount} on expense {expense_id}")]
    InvalidAmount { expense_id: String, amount: f64 },
    #[error("Empty entity id in expense {0}")]
    InvalidEntity(String),
    #[error("No exchange rate available from {from} to {to}")]
    RateUnavailable { from: String, to: String },
    #[error("Rate fetch for {base} failed: {reason}")]
    RateFetchFailed { base: String, reason: String },
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Cache error: {0}")]
    CacheError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
}
