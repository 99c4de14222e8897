pub mod audit;
pub mod balance;
pub mod entity;
pub mod event;
pub mod expense;
pub mod group;
pub mod rate;
pub mod settlement;

pub use balance::Balance;
pub use entity::{EntityRef, EntityType};
pub use event::{Event, EventStatus, RateMode};
pub use expense::{Expense, Split, SplitType};
pub use group::Group;
pub use rate::{RateQuote, RateSource, RateTable};
pub use settlement::{Settlement, SettlementPlan, SettlementStatus, StatusPatch};
