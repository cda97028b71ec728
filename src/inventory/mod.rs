//! The inventory ledger: per (slot, product) stock counters.
//!
//! Each row is owned by its own actor, so reserve, release and settle on one
//! row are processed strictly one after another while different rows proceed
//! independently.

pub mod ledger;
pub mod row_service;

pub use ledger::InventoryLedger;
pub use row_service::{InventoryRowClient, InventoryRowService};
