use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct SlotCreate {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Moves the slot's window. Both ends are always given.
#[derive(Debug, Clone)]
pub struct SlotReschedule {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Custom actions for sales slots. Both are idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Activate,
    Deactivate,
}
