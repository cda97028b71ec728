use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::FrameworkError;
use crate::domain::{OrderId, OrderTicket, PaymentMethod, TicketFilter, TicketId, TicketSummary};
use crate::error::{EntityKind, SalesError, SalesResult};
use crate::messages::{ServiceResponse, TicketRequest};

// =============================================================================
// TICKET SERVICE
// =============================================================================

/// Owns every ticket plus the indexes that keep ticket numbers and order
/// references unique. Checking an index and inserting into it happen while
/// handling one message, so two racing issues can never both succeed.
pub struct TicketService {
    receiver: mpsc::Receiver<TicketRequest>,
    tickets: HashMap<TicketId, OrderTicket>,
    by_number: HashMap<String, TicketId>,
    by_order: HashMap<OrderId, TicketId>,
}

impl TicketService {
    pub fn new(buffer_size: usize) -> (Self, TicketStoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            tickets: HashMap::new(),
            by_number: HashMap::new(),
            by_order: HashMap::new(),
        };
        (service, TicketStoreClient::new(sender))
    }

    #[instrument(name = "ticket_service", skip(self))]
    pub async fn run(mut self) {
        info!("TicketService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                TicketRequest::Issue {
                    order_id,
                    ticket_number,
                    payment_method,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_issue(order_id, ticket_number, payment_method));
                }
                TicketRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.tickets.get(&id).cloned()));
                }
                TicketRequest::GetByNumber {
                    ticket_number,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(self.lookup(self.by_number.get(&ticket_number))));
                }
                TicketRequest::GetByOrder { order_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.lookup(self.by_order.get(&order_id))));
                }
                TicketRequest::List { filter, respond_to } => {
                    self.handle_list(filter, respond_to);
                }
                TicketRequest::UpdatePayment {
                    id,
                    is_paid,
                    transaction_id,
                    respond_to,
                } => {
                    let result = self.modify(id, |ticket| ticket.record_payment(is_paid, transaction_id));
                    let _ = respond_to.send(result);
                }
                TicketRequest::UpdateDelivery {
                    id,
                    is_delivered,
                    respond_to,
                } => {
                    let result = self.modify(id, |ticket| ticket.record_delivery(is_delivered));
                    let _ = respond_to.send(result);
                }
                TicketRequest::Summary { respond_to } => {
                    let _ = respond_to.send(Ok(TicketSummary::from_tickets(self.tickets.values())));
                }
                TicketRequest::Shutdown => {
                    info!("TicketService shutting down");
                    break;
                }
            }
        }
        info!(tickets = self.tickets.len(), "TicketService stopped");
    }

    #[instrument(
        fields(order_id = %order_id, ticket_number = %ticket_number),
        skip(self, order_id, ticket_number)
    )]
    fn handle_issue(
        &mut self,
        order_id: OrderId,
        ticket_number: String,
        payment_method: PaymentMethod,
    ) -> SalesResult<OrderTicket> {
        debug!("Processing issue request");

        if self.by_order.contains_key(&order_id) {
            warn!("Order already has a ticket");
            return Err(SalesError::DuplicateTicket(order_id));
        }
        if self.by_number.contains_key(&ticket_number) {
            warn!("Ticket number already in use");
            return Err(SalesError::DuplicateTicketNumber(ticket_number));
        }

        let ticket = OrderTicket::new(TicketId::new(), order_id, ticket_number, payment_method)?;
        self.by_order.insert(order_id, ticket.id);
        self.by_number.insert(ticket.ticket_number.clone(), ticket.id);
        self.tickets.insert(ticket.id, ticket.clone());

        info!(ticket_id = %ticket.id, "Ticket issued");
        Ok(ticket)
    }

    fn handle_list(&self, filter: TicketFilter, respond_to: ServiceResponse<Vec<OrderTicket>>) {
        let mut tickets: Vec<OrderTicket> = self
            .tickets
            .values()
            .filter(|ticket| filter.matches(ticket))
            .cloned()
            .collect();
        tickets.sort_by_key(|ticket| ticket.created_at);
        debug!(count = tickets.len(), "Listing tickets");
        let _ = respond_to.send(Ok(tickets));
    }

    fn lookup(&self, id: Option<&TicketId>) -> Option<OrderTicket> {
        id.and_then(|id| self.tickets.get(id)).cloned()
    }

    // The change is tried on a copy; a rejected change stores nothing.
    fn modify(
        &mut self,
        id: TicketId,
        change: impl FnOnce(&mut OrderTicket) -> SalesResult<()>,
    ) -> SalesResult<OrderTicket> {
        let ticket = self
            .tickets
            .get_mut(&id)
            .ok_or_else(|| SalesError::not_found(EntityKind::Ticket, id))?;
        let mut draft = ticket.clone();
        if let Err(e) = change(&mut draft) {
            warn!(ticket_id = %id, error = %e, "Ticket update rejected");
            return Err(e);
        }
        *ticket = draft.clone();
        info!(ticket_id = %id, is_paid = draft.is_paid, is_delivered = draft.is_delivered, "Ticket updated");
        Ok(draft)
    }
}

// =============================================================================
// TICKET STORE CLIENT
// =============================================================================

#[derive(Clone)]
pub struct TicketStoreClient {
    sender: mpsc::Sender<TicketRequest>,
}

impl TicketStoreClient {
    pub fn new(sender: mpsc::Sender<TicketRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> SalesResult<()> {
        debug!("Sending shutdown request");
        self.sender
            .send(TicketRequest::Shutdown)
            .await
            .map_err(|_| FrameworkError::ActorClosed(EntityKind::Ticket))?;
        Ok(())
    }
}

client_method!(TicketStoreClient => fn issue(order_id: OrderId, ticket_number: String, payment_method: PaymentMethod) -> OrderTicket as TicketRequest::Issue, kind = EntityKind::Ticket);
client_method!(TicketStoreClient => fn get(id: TicketId) -> Option<OrderTicket> as TicketRequest::Get, kind = EntityKind::Ticket);
client_method!(TicketStoreClient => fn get_by_number(ticket_number: String) -> Option<OrderTicket> as TicketRequest::GetByNumber, kind = EntityKind::Ticket);
client_method!(TicketStoreClient => fn get_by_order(order_id: OrderId) -> Option<OrderTicket> as TicketRequest::GetByOrder, kind = EntityKind::Ticket);
client_method!(TicketStoreClient => fn list(filter: TicketFilter) -> Vec<OrderTicket> as TicketRequest::List, kind = EntityKind::Ticket);
client_method!(TicketStoreClient => fn update_payment(id: TicketId, is_paid: bool, transaction_id: Option<String>) -> OrderTicket as TicketRequest::UpdatePayment, kind = EntityKind::Ticket);
client_method!(TicketStoreClient => fn update_delivery(id: TicketId, is_delivered: bool) -> OrderTicket as TicketRequest::UpdateDelivery, kind = EntityKind::Ticket);
client_method!(TicketStoreClient => fn summary() -> TicketSummary as TicketRequest::Summary, kind = EntityKind::Ticket);
