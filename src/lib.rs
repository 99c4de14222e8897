pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::SplitLedgerError;
pub use crate::core::orchestrator::SettlementOrchestrator;
pub use crate::infrastructure::logging::in_memory::InMemoryLogging;
pub use crate::infrastructure::rates::in_memory::InMemoryRateCache;
pub use crate::infrastructure::storage::in_memory::InMemoryStore;

#[cfg(test)]
mod tests;
