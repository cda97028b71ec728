//! Slot-based sales core: products, time-boxed sales slots with per-slot
//! inventory, orders that reserve stock, and tickets that track payment and
//! delivery.
//!
//! Every store is an actor owned by a tokio task. Callers talk to the core
//! through the typed clients exposed by [`SalesSystem`].

#[macro_use]
mod clients;

pub mod actor_framework;
pub mod app_system;
pub mod config;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod messages;
pub mod order_actor;
pub mod product_actor;
pub mod slot_actor;
pub mod ticket_actor;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, SalesSystem};
pub use clients::{OrderClient, ProductClient, SalesSlotClient, TicketClient};
pub use config::SystemConfig;
pub use error::{EntityKind, SalesError, SalesResult};
