//! Business records of the sales core. Plain data plus the rules that can be
//! checked on a single record; nothing in here knows about actors.

pub mod ids;
pub mod inventory;
pub mod order;
pub mod product;
pub mod sales_slot;
pub mod ticket;

pub use ids::*;
pub use inventory::*;
pub use order::*;
pub use product::*;
pub use sales_slot::*;
pub use ticket::*;
