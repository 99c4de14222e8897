pub mod balance;
pub mod errors;
pub mod fx;
pub mod group_resolver;
pub mod lifecycle;
pub mod models;
pub mod orchestrator;
pub mod planner;
