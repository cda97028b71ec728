use tokio::sync::oneshot;

use crate::domain::{OrderId, OrderTicket, PaymentMethod, ProductInventory, TicketFilter, TicketId, TicketSummary};
use crate::error::SalesResult;

/// Generic type alias for service communication
pub type ServiceResponse<T> = oneshot::Sender<SalesResult<T>>;

// Typed message enums for the dedicated services. Each variant includes
// parameters and a oneshot channel for responses.

/// Requests to a single inventory row's actor. Every counter change answers
/// with the row as it is afterwards.
#[derive(Debug)]
pub enum InventoryRequest {
    Reserve {
        quantity: u32,
        respond_to: ServiceResponse<ProductInventory>,
    },
    Release {
        quantity: u32,
        respond_to: ServiceResponse<ProductInventory>,
    },
    Settle {
        quantity: u32,
        respond_to: ServiceResponse<ProductInventory>,
    },
    Snapshot {
        respond_to: ServiceResponse<ProductInventory>,
    },
    /// Stop accepting counter changes, unless units are reserved or sold.
    Close {
        respond_to: ServiceResponse<ProductInventory>,
    },
    Reopen {
        respond_to: ServiceResponse<ProductInventory>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum TicketRequest {
    Issue {
        order_id: OrderId,
        ticket_number: String,
        payment_method: PaymentMethod,
        respond_to: ServiceResponse<OrderTicket>,
    },
    Get {
        id: TicketId,
        respond_to: ServiceResponse<Option<OrderTicket>>,
    },
    GetByNumber {
        ticket_number: String,
        respond_to: ServiceResponse<Option<OrderTicket>>,
    },
    GetByOrder {
        order_id: OrderId,
        respond_to: ServiceResponse<Option<OrderTicket>>,
    },
    List {
        filter: TicketFilter,
        respond_to: ServiceResponse<Vec<OrderTicket>>,
    },
    UpdatePayment {
        id: TicketId,
        is_paid: bool,
        transaction_id: Option<String>,
        respond_to: ServiceResponse<OrderTicket>,
    },
    UpdateDelivery {
        id: TicketId,
        is_delivered: bool,
        respond_to: ServiceResponse<OrderTicket>,
    },
    Summary {
        respond_to: ServiceResponse<TicketSummary>,
    },
    Shutdown,
}
