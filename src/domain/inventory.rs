use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{InventoryId, ProductId, SalesSlotId};
use crate::error::{SalesError, SalesResult};

/// Identifies an inventory row: one product within one sales slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryKey {
    pub slot_id: SalesSlotId,
    pub product_id: ProductId,
}

impl InventoryKey {
    pub const fn new(slot_id: SalesSlotId, product_id: ProductId) -> Self {
        Self { slot_id, product_id }
    }
}

impl fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.slot_id, self.product_id)
    }
}

/// Stock counters for one product in one sales slot.
///
/// Invariant: `reserved_quantity + sold_quantity <= initial_quantity`. Every
/// mutator checks the guard before touching a counter, so a rejected call
/// leaves the row exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInventory {
    pub id: InventoryId,
    pub slot_id: SalesSlotId,
    pub product_id: ProductId,
    pub initial_quantity: u32,
    pub reserved_quantity: u32,
    pub sold_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductInventory {
    pub fn new(key: InventoryKey, initial_quantity: u32) -> Self {
        let now = Utc::now();
        Self {
            id: InventoryId::new(),
            slot_id: key.slot_id,
            product_id: key.product_id,
            initial_quantity,
            reserved_quantity: 0,
            sold_quantity: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> InventoryKey {
        InventoryKey::new(self.slot_id, self.product_id)
    }

    pub fn available(&self) -> u32 {
        self.initial_quantity
            .saturating_sub(self.reserved_quantity)
            .saturating_sub(self.sold_quantity)
    }

    /// A row with outstanding reservations or sales.
    pub fn is_in_use(&self) -> bool {
        self.reserved_quantity > 0 || self.sold_quantity > 0
    }

    pub fn reserve(&mut self, quantity: u32) -> SalesResult<()> {
        let committed = u64::from(self.reserved_quantity) + u64::from(self.sold_quantity);
        if committed + u64::from(quantity) > u64::from(self.initial_quantity) {
            return Err(SalesError::InsufficientStock {
                product_id: self.product_id,
                requested: quantity,
                available: self.available(),
            });
        }
        self.reserved_quantity += quantity;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn release(&mut self, quantity: u32) -> SalesResult<()> {
        self.check_reserved(quantity)?;
        self.reserved_quantity -= quantity;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves `quantity` from reserved to sold.
    pub fn settle(&mut self, quantity: u32) -> SalesResult<()> {
        self.check_reserved(quantity)?;
        self.reserved_quantity -= quantity;
        self.sold_quantity += quantity;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn check_reserved(&self, quantity: u32) -> SalesResult<()> {
        if quantity > self.reserved_quantity {
            return Err(SalesError::ReservationUnderflow {
                requested: quantity,
                reserved: self.reserved_quantity,
            });
        }
        Ok(())
    }
}
