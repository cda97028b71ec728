//! Typed clients: the operations the sales core exposes to its callers.
//!
//! Each client wraps one or more store handles and performs the precondition
//! checks and orchestration for its area.

#[macro_use]
mod macros;

pub mod order_client;
pub mod product_client;
pub mod slot_client;
pub mod ticket_client;

pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use slot_client::SalesSlotClient;
pub use ticket_client::TicketClient;
