use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::{ResourceActor, ResourceClient};
use crate::clients::{OrderClient, ProductClient, SalesSlotClient, TicketClient};
use crate::config::SystemConfig;
use crate::domain::{Order, OrderId, Product, ProductId, SalesSlot, SalesSlotId};
use crate::inventory::InventoryLedger;
use crate::ticket_actor::{TicketService, TicketStoreClient};

/// The sales core with every actor running.
///
/// Starts the stores, wires each client to the stores it depends on, and
/// stops everything again on [`shutdown`](Self::shutdown).
pub struct SalesSystem {
    pub product_client: ProductClient,
    pub slot_client: SalesSlotClient,
    pub order_client: OrderClient,
    pub ticket_client: TicketClient,
    stores: Stores,
    handles: Vec<JoinHandle<()>>,
}

struct Stores {
    products: ResourceClient<Product>,
    slots: ResourceClient<SalesSlot>,
    orders: ResourceClient<Order>,
    tickets: TicketStoreClient,
    ledger: InventoryLedger,
}

impl SalesSystem {
    /// Must be called from within a tokio runtime.
    pub fn new(config: &SystemConfig) -> Self {
        let buffer = config.channel_buffer;

        // 1. Catalogue and slots
        let (product_actor, products) = ResourceActor::<Product>::new(buffer, ProductId::new);
        let product_handle = tokio::spawn(product_actor.run());

        let (slot_actor, slots) = ResourceActor::<SalesSlot>::new(buffer, SalesSlotId::new);
        let slot_handle = tokio::spawn(slot_actor.run());

        // 2. Inventory rows are started on demand by the ledger
        let ledger = InventoryLedger::new(buffer, slots.clone(), products.clone());

        // 3. Orders and tickets
        let (order_actor, orders) = ResourceActor::<Order>::new(buffer, OrderId::new);
        let order_handle = tokio::spawn(order_actor.run());

        let (ticket_service, tickets) = TicketService::new(buffer);
        let ticket_handle = tokio::spawn(ticket_service.run());

        info!(channel_buffer = buffer, "Sales system started");

        Self {
            product_client: ProductClient::new(products.clone(), ledger.clone()),
            slot_client: SalesSlotClient::new(slots.clone(), ledger.clone()),
            order_client: OrderClient::new(orders.clone(), slots.clone(), products.clone(), ledger.clone()),
            ticket_client: TicketClient::new(tickets.clone(), orders.clone()),
            stores: Stores {
                products,
                slots,
                orders,
                tickets,
                ledger,
            },
            handles: vec![product_handle, slot_handle, order_handle, ticket_handle],
        }
    }

    /// Stops the stores, dependents first: tickets, orders, inventory rows,
    /// then slots and products.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down sales system");
        let Self { stores, handles, .. } = self;

        let mut failures = Vec::new();
        if let Err(e) = stores.tickets.shutdown().await {
            failures.push(e.to_string());
        }
        if let Err(e) = stores.orders.shutdown().await {
            failures.push(e.to_string());
        }
        stores.ledger.shutdown().await;
        if let Err(e) = stores.slots.shutdown().await {
            failures.push(e.to_string());
        }
        if let Err(e) = stores.products.shutdown().await {
            failures.push(e.to_string());
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                failures.push(format!("Actor task failed: {e:?}"));
            }
        }

        if !failures.is_empty() {
            return Err(failures.join("; "));
        }
        info!("Sales system shutdown complete");
        Ok(())
    }
}
