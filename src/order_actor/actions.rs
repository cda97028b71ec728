use crate::domain::{PricedLine, SalesSlotId};

/// Payload for creating a new order. Prices are already captured.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub slot_id: SalesSlotId,
    pub lines: Vec<PricedLine>,
}

/// Custom actions for Order entities.
///
/// Every action answers with the order as it is after the action, which is
/// what callers need to release or settle the right quantities.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Adds lines to a RESERVED order and recomputes its total.
    AppendItems(Vec<PricedLine>),
    /// RESERVED -> CONFIRMED
    Confirm,
    /// RESERVED -> CANCELLED
    Cancel,
    /// CONFIRMED -> COMPLETED
    Complete,
}
