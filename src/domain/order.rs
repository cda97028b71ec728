use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OrderId, OrderItemId, ProductId, SalesSlotId};
use crate::error::{SalesError, SalesResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Reserved,
    Confirmed,
    Cancelled,
    Completed,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Reserved => "RESERVED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Completed => "COMPLETED",
        };
        f.write_str(name)
    }
}

/// A requested line: what the caller asks for, before prices are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl OrderLine {
    pub const fn new(product_id: ProductId, quantity: u32) -> Self {
        Self { product_id, quantity }
    }
}

/// A line with its unit price captured, ready to be stored on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: u64,
}

impl OrderItem {
    fn from_line(order_id: OrderId, line: PricedLine) -> Self {
        Self {
            id: OrderItemId::new(),
            order_id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }

    pub fn subtotal(&self) -> SalesResult<u64> {
        self.unit_price
            .checked_mul(u64::from(self.quantity))
            .ok_or(SalesError::AmountOverflow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub slot_id: SalesSlotId,
    pub status: OrderStatus,
    pub total_amount: u64,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a RESERVED order. Lines are kept as given; repeated products stay
    /// separate items.
    pub fn new(id: OrderId, slot_id: SalesSlotId, lines: Vec<PricedLine>) -> SalesResult<Self> {
        if lines.is_empty() {
            return Err(SalesError::EmptyOrder);
        }
        let items: Vec<OrderItem> = lines.into_iter().map(|line| OrderItem::from_line(id, line)).collect();
        let total_amount = total_of(&items)?;
        let now = Utc::now();
        Ok(Self {
            id,
            slot_id,
            status: OrderStatus::Reserved,
            total_amount,
            items,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn append_items(&mut self, lines: Vec<PricedLine>) -> SalesResult<()> {
        self.require(OrderStatus::Reserved, "add items")?;
        if lines.is_empty() {
            return Err(SalesError::EmptyOrder);
        }
        let id = self.id;
        let mut items = self.items.clone();
        items.extend(lines.into_iter().map(|line| OrderItem::from_line(id, line)));
        self.total_amount = total_of(&items)?;
        self.items = items;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn confirm(&mut self) -> SalesResult<()> {
        self.require(OrderStatus::Reserved, "confirm")?;
        self.set_status(OrderStatus::Confirmed);
        Ok(())
    }

    /// Only RESERVED orders can be cancelled: a confirmed order has already
    /// been settled into sold stock, which is never handed back.
    pub fn cancel(&mut self) -> SalesResult<()> {
        self.require(OrderStatus::Reserved, "cancel")?;
        self.set_status(OrderStatus::Cancelled);
        Ok(())
    }

    pub fn complete(&mut self) -> SalesResult<()> {
        self.require(OrderStatus::Confirmed, "complete")?;
        self.set_status(OrderStatus::Completed);
        Ok(())
    }

    fn require(&self, expected: OrderStatus, operation: &'static str) -> SalesResult<()> {
        if self.status != expected {
            return Err(SalesError::InvalidOrderStatus {
                order_id: self.id,
                status: self.status,
                operation,
            });
        }
        Ok(())
    }

    fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

fn total_of(items: &[OrderItem]) -> SalesResult<u64> {
    items.iter().try_fold(0u64, |total, item| {
        total.checked_add(item.subtotal()?).ok_or(SalesError::AmountOverflow)
    })
}
