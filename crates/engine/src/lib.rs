//! Decor inventory allocation engine.
//!
//! The engine owns four pieces of state, all partitioned by tenant:
//!
//! - decor items and their `in_store` / `hired` / `damaged` counters,
//! - the allocation state machine moving single units between counters,
//! - per-customer requirements, accumulated per (customer, item),
//! - the monthly allocation grid, replaced wholesale per month.

pub use customer_requirements::{
    Requirement, RequirementPatch, RequirementStatus, RequirementView, requirements_total,
};
pub use customers::Customer;
pub use decor_items::{InventoryItem, ItemPatch, NewItem};
pub use error::{EngineError, ErrorKind};
pub use money::MoneyCents;
pub use monthly_allocations::{AllocationRow, DecorQuantities, MonthKey};
pub use ops::{CategoryOverview, Engine, EngineBuilder, PREDEFINED_CATEGORIES};
pub use stock::{AllocationAction, StockCounter, StockCounts};

mod customer_requirements;
mod customers;
mod decor_items;
mod error;
mod money;
mod monthly_allocations;
mod ops;
mod stock;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
