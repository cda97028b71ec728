use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OrderId, TicketId};
use crate::error::{SalesError, SalesResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    PayPay,
    Square,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::PayPay => "PAYPAY",
            PaymentMethod::Square => "SQUARE",
        };
        f.write_str(name)
    }
}

/// The payable, deliverable artifact of a confirmed order.
///
/// Moves from unpaid/undelivered to paid and then to delivered. Neither flag
/// ever goes back to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTicket {
    pub id: TicketId,
    pub ticket_number: String,
    pub order_id: OrderId,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub is_paid: bool,
    pub is_delivered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderTicket {
    pub fn new(
        id: TicketId,
        order_id: OrderId,
        ticket_number: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> SalesResult<Self> {
        let ticket_number = ticket_number.into();
        if ticket_number.trim().is_empty() {
            return Err(SalesError::Validation("Ticket number is required".to_string()));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            ticket_number,
            order_id,
            payment_method,
            transaction_id: None,
            is_paid: false,
            is_delivered: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Marking a paid ticket paid again is rejected. A `false` request is
    /// accepted but never clears a recorded payment. A supplied transaction id
    /// is stored either way.
    pub fn record_payment(&mut self, is_paid: bool, transaction_id: Option<String>) -> SalesResult<()> {
        if is_paid && self.is_paid {
            return Err(SalesError::AlreadyPaid(self.id));
        }
        if is_paid {
            self.is_paid = true;
        }
        if transaction_id.is_some() {
            self.transaction_id = transaction_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Payment is checked before the delivered flag.
    pub fn record_delivery(&mut self, is_delivered: bool) -> SalesResult<()> {
        if !is_delivered {
            return Ok(());
        }
        if !self.is_paid {
            return Err(SalesError::PaymentRequired(self.id));
        }
        if self.is_delivered {
            return Err(SalesError::AlreadyDelivered(self.id));
        }
        self.is_delivered = true;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Narrows a ticket listing; `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    pub payment_method: Option<PaymentMethod>,
    pub is_paid: Option<bool>,
    pub is_delivered: Option<bool>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &OrderTicket) -> bool {
        self.payment_method.map_or(true, |m| m == ticket.payment_method)
            && self.is_paid.map_or(true, |p| p == ticket.is_paid)
            && self.is_delivered.map_or(true, |d| d == ticket.is_delivered)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub total: usize,
    pub paid: usize,
    pub delivered: usize,
    pub by_payment_method: BTreeMap<PaymentMethod, usize>,
}

impl TicketSummary {
    pub fn from_tickets<'a>(tickets: impl IntoIterator<Item = &'a OrderTicket>) -> Self {
        tickets.into_iter().fold(Self::default(), |mut summary, ticket| {
            summary.total += 1;
            summary.paid += usize::from(ticket.is_paid);
            summary.delivered += usize::from(ticket.is_delivered);
            *summary.by_payment_method.entry(ticket.payment_method).or_default() += 1;
            summary
        })
    }
}
