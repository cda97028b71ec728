use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Order, OrderId, OrderStatus, OrderTicket, PaymentMethod, TicketFilter, TicketId, TicketSummary};
use crate::error::{EntityKind, SalesError, SalesResult};
use crate::ticket_actor::TicketStoreClient;

/// Client for ticket issuance and fulfillment.
#[derive(Clone)]
pub struct TicketClient {
    store: TicketStoreClient,
    orders: ResourceClient<Order>,
}

impl TicketClient {
    pub fn new(store: TicketStoreClient, orders: ResourceClient<Order>) -> Self {
        Self { store, orders }
    }

    /// Issues the single ticket of a CONFIRMED order. Checks run in order:
    /// the order exists, it is CONFIRMED, it has no ticket yet, and the
    /// number is unused.
    #[instrument(skip(self, ticket_number), fields(ticket_number = %ticket_number.as_ref()))]
    pub async fn create_ticket(
        &self,
        order_id: OrderId,
        ticket_number: impl AsRef<str>,
        payment_method: PaymentMethod,
    ) -> SalesResult<OrderTicket> {
        info!("Processing create_ticket request");

        let order = self.orders.fetch(order_id).await?;
        if order.status != OrderStatus::Confirmed {
            warn!(status = %order.status, "Order is not confirmed");
            return Err(SalesError::InvalidOrderStatus {
                order_id,
                status: order.status,
                operation: "issue a ticket",
            });
        }

        let ticket = self
            .store
            .issue(order_id, ticket_number.as_ref().to_string(), payment_method)
            .await?;
        info!(ticket_id = %ticket.id, "Ticket created successfully");
        Ok(ticket)
    }

    #[instrument(skip(self))]
    pub async fn update_payment_status(
        &self,
        id: TicketId,
        is_paid: bool,
        transaction_id: Option<String>,
    ) -> SalesResult<OrderTicket> {
        debug!("Sending request");
        self.store.update_payment(id, is_paid, transaction_id).await
    }

    #[instrument(skip(self))]
    pub async fn update_delivery_status(&self, id: TicketId, is_delivered: bool) -> SalesResult<OrderTicket> {
        debug!("Sending request");
        self.store.update_delivery(id, is_delivered).await
    }

    #[instrument(skip(self))]
    pub async fn get_ticket(&self, id: TicketId) -> SalesResult<OrderTicket> {
        debug!("Sending request");
        self.store
            .get(id)
            .await?
            .ok_or_else(|| SalesError::not_found(EntityKind::Ticket, id))
    }

    #[instrument(skip(self))]
    pub async fn get_ticket_by_number(&self, ticket_number: &str) -> SalesResult<OrderTicket> {
        debug!("Sending request");
        self.store
            .get_by_number(ticket_number.to_string())
            .await?
            .ok_or_else(|| SalesError::not_found(EntityKind::Ticket, ticket_number))
    }

    #[instrument(skip(self))]
    pub async fn get_ticket_by_order(&self, order_id: OrderId) -> SalesResult<OrderTicket> {
        debug!("Sending request");
        self.store
            .get_by_order(order_id)
            .await?
            .ok_or_else(|| SalesError::not_found(EntityKind::Ticket, format!("order {order_id}")))
    }

    /// The order a presented ticket number belongs to.
    #[instrument(skip(self))]
    pub async fn order_for_ticket_number(&self, ticket_number: &str) -> SalesResult<Order> {
        let ticket = self.get_ticket_by_number(ticket_number).await?;
        self.orders.fetch(ticket.order_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_tickets(&self, filter: TicketFilter) -> SalesResult<Vec<OrderTicket>> {
        debug!("Sending request");
        self.store.list(filter).await
    }

    #[instrument(skip(self))]
    pub async fn ticket_summary(&self) -> SalesResult<TicketSummary> {
        debug!("Sending request");
        self.store.summary().await
    }
}
