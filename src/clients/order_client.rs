use std::collections::HashMap;

use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{
    Order, OrderId, OrderLine, OrderStatus, PricedLine, Product, ProductId, SalesSlot, SalesSlotId,
};
use crate::error::{SalesError, SalesResult};
use crate::inventory::InventoryLedger;
use crate::order_actor::{OrderAction, OrderCreate};

#[derive(Debug, Clone, Copy)]
enum StockMove {
    Release,
    Settle,
}

/// Client for the order lifecycle.
///
/// Creating an order, or adding items to one, is all-or-nothing: every line's
/// stock is reserved before the order is written, and if any reservation or
/// the order write fails, the reservations already taken are released before
/// the error is returned.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    slots: ResourceClient<SalesSlot>,
    products: ResourceClient<Product>,
    ledger: InventoryLedger,
}

impl_entity_reads!(OrderClient, Order, OrderId, order);

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        slots: ResourceClient<SalesSlot>,
        products: ResourceClient<Product>,
        ledger: InventoryLedger,
    ) -> Self {
        Self {
            inner,
            slots,
            products,
            ledger,
        }
    }

    /// Repeated products in `lines` are reserved and stored as separate items.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn create_order(&self, slot_id: SalesSlotId, lines: Vec<OrderLine>) -> SalesResult<Order> {
        info!("Processing create_order request");

        // Step 1: Validate lines and slot
        validate_lines(&lines)?;
        self.require_active_slot(slot_id).await?;

        // Step 2: Capture prices
        let priced = self.price_lines(&lines).await?;

        // Step 3: Reserve stock
        self.reserve_all(slot_id, &priced).await?;
        info!("Stock reserved successfully");

        // Step 4: Create order
        let order = match self
            .inner
            .create(OrderCreate {
                slot_id,
                lines: priced.clone(),
            })
            .await
        {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "Order write failed, releasing reservations");
                if let Err(rollback) = self.move_stock(slot_id, reserved_lines(&priced), StockMove::Release).await {
                    warn!(error = %rollback, "Rollback incomplete, keeping original error");
                }
                return Err(e);
            }
        };

        info!(order_id = %order.id, total = order.total_amount, "Order created successfully");
        Ok(order)
    }

    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn add_items(&self, order_id: OrderId, lines: Vec<OrderLine>) -> SalesResult<Order> {
        info!("Processing add_items request");

        validate_lines(&lines)?;
        let order = self.inner.fetch(order_id).await?;
        if order.status != OrderStatus::Reserved {
            warn!(status = %order.status, "Order no longer accepts items");
            return Err(SalesError::InvalidOrderStatus {
                order_id,
                status: order.status,
                operation: "add items",
            });
        }
        self.require_active_slot(order.slot_id).await?;

        let priced = self.price_lines(&lines).await?;
        self.reserve_all(order.slot_id, &priced).await?;

        // The status may have moved on since the check above; the action
        // re-checks it inside the order actor.
        match self
            .inner
            .perform_action(order_id, OrderAction::AppendItems(priced.clone()))
            .await
        {
            Ok(order) => {
                info!(total = order.total_amount, "Items added");
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "Append failed, releasing reservations");
                if let Err(rollback) = self
                    .move_stock(order.slot_id, reserved_lines(&priced), StockMove::Release)
                    .await
                {
                    warn!(error = %rollback, "Rollback incomplete, keeping original error");
                }
                Err(e)
            }
        }
    }

    /// RESERVED -> CONFIRMED, then every item's reservation is settled into
    /// sold stock.
    ///
    /// A row holding this order's reservation cannot be closed, so the slot's
    /// rows are still there when the settle runs. An error after the status
    /// change means a row actor died, and is logged per line.
    #[instrument(skip(self))]
    pub async fn confirm_order(&self, order_id: OrderId) -> SalesResult<Order> {
        debug!("Sending request");
        let order = self.inner.perform_action(order_id, OrderAction::Confirm).await?;
        self.move_stock(order.slot_id, item_lines(&order), StockMove::Settle)
            .await?;
        info!("Order confirmed");
        Ok(order)
    }

    /// RESERVED -> CANCELLED, then every item's reservation is released.
    /// Like [`OrderClient::confirm_order`], the release only fails if a row
    /// actor died.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> SalesResult<Order> {
        debug!("Sending request");
        let order = self.inner.perform_action(order_id, OrderAction::Cancel).await?;
        self.move_stock(order.slot_id, item_lines(&order), StockMove::Release)
            .await?;
        info!("Order cancelled");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn complete_order(&self, order_id: OrderId) -> SalesResult<Order> {
        debug!("Sending request");
        let order = self.inner.perform_action(order_id, OrderAction::Complete).await?;
        info!("Order completed");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn list_by_status(&self, status: OrderStatus) -> SalesResult<Vec<Order>> {
        debug!("Sending request");
        let mut orders = self.inner.find(move |order| order.status == status).await?;
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn list_by_slot(&self, slot_id: SalesSlotId) -> SalesResult<Vec<Order>> {
        debug!("Sending request");
        let mut orders = self.inner.find(move |order| order.slot_id == slot_id).await?;
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    async fn require_active_slot(&self, slot_id: SalesSlotId) -> SalesResult<SalesSlot> {
        let slot = self.slots.fetch(slot_id).await?;
        if !slot.is_active {
            warn!(slot_id = %slot_id, "Sales slot is not active");
            return Err(SalesError::SlotInactive(slot_id));
        }
        Ok(slot)
    }

    async fn price_lines(&self, lines: &[OrderLine]) -> SalesResult<Vec<PricedLine>> {
        let mut prices: HashMap<ProductId, u64> = HashMap::new();
        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let unit_price = match prices.get(&line.product_id) {
                Some(price) => *price,
                None => {
                    let product = self.products.fetch(line.product_id).await?;
                    prices.insert(product.id, product.price);
                    product.price
                }
            };
            priced.push(PricedLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price,
            });
        }
        Ok(priced)
    }

    async fn reserve_all(&self, slot_id: SalesSlotId, lines: &[PricedLine]) -> SalesResult<()> {
        for (done, line) in lines.iter().enumerate() {
            if let Err(e) = self.ledger.reserve(slot_id, line.product_id, line.quantity).await {
                warn!(product_id = %line.product_id, error = %e, "Stock reservation failed, rolling back");
                if let Err(rollback) = self
                    .move_stock(slot_id, reserved_lines(&lines[..done]), StockMove::Release)
                    .await
                {
                    warn!(error = %rollback, "Rollback incomplete, keeping original error");
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Applies the move to every line even if one fails, and reports the
    /// first failure.
    async fn move_stock(
        &self,
        slot_id: SalesSlotId,
        lines: Vec<(ProductId, u32)>,
        stock_move: StockMove,
    ) -> SalesResult<()> {
        let mut first_error = None;
        for (product_id, quantity) in lines {
            let result = match stock_move {
                StockMove::Release => self.ledger.release(slot_id, product_id, quantity).await,
                StockMove::Settle => self.ledger.settle(slot_id, product_id, quantity).await,
            };
            if let Err(e) = result {
                error!(product_id = %product_id, quantity, ?stock_move, error = %e, "Inventory update failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn validate_lines(lines: &[OrderLine]) -> SalesResult<()> {
    if lines.is_empty() {
        return Err(SalesError::EmptyOrder);
    }
    if let Some(line) = lines.iter().find(|line| line.quantity == 0) {
        return Err(SalesError::InvalidQuantity {
            product_id: line.product_id,
            quantity: line.quantity,
        });
    }
    Ok(())
}

fn reserved_lines(lines: &[PricedLine]) -> Vec<(ProductId, u32)> {
    lines.iter().map(|line| (line.product_id, line.quantity)).collect()
}

fn item_lines(order: &Order) -> Vec<(ProductId, u32)> {
    order.items.iter().map(|item| (item.product_id, item.quantity)).collect()
}
