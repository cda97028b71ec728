//! Ticket store. A dedicated service rather than a [`ResourceActor`]
//! because it keeps two unique indexes next to the records.
//!
//! [`ResourceActor`]: crate::actor_framework::ResourceActor

mod service;

pub use service::{TicketService, TicketStoreClient};
