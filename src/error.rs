use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::{OrderId, OrderStatus, ProductId, SalesSlotId, TicketId};

/// The kinds of records the sales core stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Product,
    SalesSlot,
    Inventory,
    Order,
    Ticket,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Product => "Product",
            EntityKind::SalesSlot => "Sales slot",
            EntityKind::Inventory => "Inventory",
            EntityKind::Order => "Order",
            EntityKind::Ticket => "Ticket",
        };
        f.write_str(name)
    }
}

/// Every failure an operation of the sales core can return.
///
/// Business-rule violations are detected before any mutation. `StorageFailure`
/// is the only variant that reflects a problem with the stores themselves, so
/// it is the only one a caller may reasonably retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SalesError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    #[error("Invalid time range: end {end} must be after start {start}")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    #[error("Sales slot {0} is not active")]
    SlotInactive(SalesSlotId),

    #[error("Order {order_id} is {status}, cannot {operation}")]
    InvalidOrderStatus {
        order_id: OrderId,
        status: OrderStatus,
        operation: &'static str,
    },

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Inventory already exists for product {product_id} in sales slot {slot_id}")]
    DuplicateInventory {
        slot_id: SalesSlotId,
        product_id: ProductId,
    },

    #[error("Order {0} already has a ticket")]
    DuplicateTicket(OrderId),

    #[error("Ticket number already in use: {0}")]
    DuplicateTicketNumber(String),

    #[error("Ticket {0} is already paid")]
    AlreadyPaid(TicketId),

    #[error("Ticket {0} is already delivered")]
    AlreadyDelivered(TicketId),

    #[error("Ticket {0} must be paid before delivery")]
    PaymentRequired(TicketId),

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Invalid quantity for product {product_id}: {quantity}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    #[error("Cannot take {requested} units from reservation, only {reserved} reserved")]
    ReservationUnderflow { requested: u32, reserved: u32 },

    #[error("{entity} {id} is still referenced by inventory")]
    InventoryInUse { entity: EntityKind, id: String },

    #[error("Order total overflows")]
    AmountOverflow,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage failure: {0}")]
    StorageFailure(#[from] FrameworkError),
}

impl SalesError {
    pub fn not_found(entity: EntityKind, id: impl fmt::Display) -> Self {
        SalesError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for errors a caller may retry unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, SalesError::StorageFailure(_))
    }
}

pub type SalesResult<T> = Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_renders_entity_and_id() {
        let id = ProductId::new();
        let err = SalesError::not_found(EntityKind::Product, id);
        assert_eq!(err.to_string(), format!("Product not found: {id}"));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_framework_errors_become_storage_failures() {
        let err: SalesError = FrameworkError::ActorClosed(EntityKind::Order).into();
        assert!(matches!(err, SalesError::StorageFailure(_)));
        assert!(err.is_transient());
    }
}
