#![allow(dead_code)]

use chrono::{Duration, Utc};

use slot_sales::domain::{Product, SalesSlot};
use slot_sales::{SalesSystem, SystemConfig};

/// A running system with one active slot and one product stocked in it.
pub struct Stall {
    pub system: SalesSystem,
    pub slot: SalesSlot,
    pub product: Product,
}

pub fn start_system() -> SalesSystem {
    SalesSystem::new(&SystemConfig::default().with_channel_buffer(16))
}

pub async fn active_slot(system: &SalesSystem) -> SalesSlot {
    let start = Utc::now() - Duration::minutes(5);
    let slot = system
        .slot_client
        .create_slot(start, start + Duration::hours(1))
        .await
        .unwrap();
    system.slot_client.activate(slot.id).await.unwrap()
}

pub async fn stall(price: u64, initial_quantity: u32) -> Stall {
    let system = start_system();
    let slot = active_slot(&system).await;
    let product = system.product_client.create_product("Yakisoba", price).await.unwrap();
    system
        .slot_client
        .add_product(slot.id, product.id, initial_quantity)
        .await
        .unwrap();
    Stall { system, slot, product }
}

impl Stall {
    pub async fn reserved(&self) -> u32 {
        self.row().await.reserved_quantity
    }

    pub async fn row(&self) -> slot_sales::domain::ProductInventory {
        self.system
            .slot_client
            .inventory(self.slot.id, self.product.id)
            .await
            .unwrap()
    }

    /// Adds another product to the stall's slot.
    pub async fn stock(&self, name: &str, price: u64, initial_quantity: u32) -> Product {
        let product = self.system.product_client.create_product(name, price).await.unwrap();
        self.system
            .slot_client
            .add_product(self.slot.id, product.id, initial_quantity)
            .await
            .unwrap();
        product
    }
}
