use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::row_service::{InventoryRowClient, InventoryRowService};
use crate::actor_framework::ResourceClient;
use crate::domain::{InventoryKey, Product, ProductId, ProductInventory, SalesSlot, SalesSlotId};
use crate::error::{EntityKind, SalesError, SalesResult};

/// Registry of inventory rows, one actor per (slot, product).
///
/// The registry lock only guards which rows exist and is never held across a
/// round trip to another actor. Counter changes go straight to the row's
/// actor, so reservations on different rows never contend. Operations that
/// add or retire rows are serialized by `structure` instead.
#[derive(Clone)]
pub struct InventoryLedger {
    rows: Arc<RwLock<HashMap<InventoryKey, InventoryRowClient>>>,
    structure: Arc<Mutex<()>>,
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
    slots: ResourceClient<SalesSlot>,
    products: ResourceClient<Product>,
    buffer_size: usize,
}

impl InventoryLedger {
    pub fn new(
        buffer_size: usize,
        slots: ResourceClient<SalesSlot>,
        products: ResourceClient<Product>,
    ) -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            structure: Arc::new(Mutex::new(())),
            handles: Arc::new(Mutex::new(Vec::new())),
            slots,
            products,
            buffer_size,
        }
    }

    /// Open a row with `initial_quantity` units and nothing reserved or sold.
    ///
    /// Slot and product are looked up while holding the structure lock, so a
    /// concurrent slot or product removal cannot leave a dangling row. The
    /// registry itself is only write-locked for the insert.
    #[instrument(skip(self))]
    pub async fn create_entry(
        &self,
        slot_id: SalesSlotId,
        product_id: ProductId,
        initial_quantity: u32,
    ) -> SalesResult<ProductInventory> {
        let _structure = self.structure.lock().await;
        self.slots.fetch(slot_id).await?;
        self.products.fetch(product_id).await?;

        let key = InventoryKey::new(slot_id, product_id);
        let row = ProductInventory::new(key, initial_quantity);
        {
            let mut rows = self.rows.write().await;
            if rows.contains_key(&key) {
                warn!("Inventory row already exists");
                return Err(SalesError::DuplicateInventory { slot_id, product_id });
            }

            let (service, client) = InventoryRowService::new(self.buffer_size, row.clone());
            let handle = tokio::spawn(service.run());
            rows.insert(key, client);
            self.handles.lock().await.push(handle);
        }

        info!(inventory_id = %row.id, "Inventory row created");
        Ok(row)
    }

    pub async fn reserve(
        &self,
        slot_id: SalesSlotId,
        product_id: ProductId,
        quantity: u32,
    ) -> SalesResult<ProductInventory> {
        let key = InventoryKey::new(slot_id, product_id);
        let row = self.row(key).await?;
        row.reserve(quantity).await.map_err(|e| retired_as_missing(e, key))
    }

    pub async fn release(
        &self,
        slot_id: SalesSlotId,
        product_id: ProductId,
        quantity: u32,
    ) -> SalesResult<ProductInventory> {
        let key = InventoryKey::new(slot_id, product_id);
        let row = self.row(key).await?;
        row.release(quantity).await.map_err(|e| retired_as_missing(e, key))
    }

    /// Move `quantity` units from reserved to sold.
    pub async fn settle(
        &self,
        slot_id: SalesSlotId,
        product_id: ProductId,
        quantity: u32,
    ) -> SalesResult<ProductInventory> {
        let key = InventoryKey::new(slot_id, product_id);
        let row = self.row(key).await?;
        row.settle(quantity).await.map_err(|e| retired_as_missing(e, key))
    }

    pub async fn entry(&self, slot_id: SalesSlotId, product_id: ProductId) -> SalesResult<ProductInventory> {
        let key = InventoryKey::new(slot_id, product_id);
        let row = self.row(key).await?;
        row.snapshot().await.map_err(|e| retired_as_missing(e, key))
    }

    pub async fn entries_for_slot(&self, slot_id: SalesSlotId) -> SalesResult<Vec<ProductInventory>> {
        self.entries_where(move |key| key.slot_id == slot_id).await
    }

    pub async fn entries_for_product(&self, product_id: ProductId) -> SalesResult<Vec<ProductInventory>> {
        self.entries_where(move |key| key.product_id == product_id).await
    }

    /// Run `change` against a product only while no inventory row references
    /// it. No row for the product can be created until `change` finishes.
    pub async fn while_product_unreferenced<R, F, Fut>(&self, product_id: ProductId, change: F) -> SalesResult<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SalesResult<R>>,
    {
        let _structure = self.structure.lock().await;
        let referenced = self.rows.read().await.keys().any(|key| key.product_id == product_id);
        if referenced {
            warn!(product_id = %product_id, "Product is referenced by inventory");
            return Err(SalesError::InventoryInUse {
                entity: EntityKind::Product,
                id: product_id.to_string(),
            });
        }
        change().await
    }

    /// Delete a slot together with its rows, provided none of them has
    /// reserved or sold units. Returns how many rows were retired.
    ///
    /// Every row is closed first. A closed row refuses reservations, so once
    /// all rows are closed no order can start holding units in them. If any
    /// row is in use, or the slot delete fails, the closed rows reopen.
    #[instrument(skip(self))]
    pub async fn remove_slot(&self, slot_id: SalesSlotId) -> SalesResult<usize> {
        let _structure = self.structure.lock().await;
        self.slots.fetch(slot_id).await?;

        let targets: Vec<(InventoryKey, InventoryRowClient)> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|(key, _)| key.slot_id == slot_id)
            .map(|(key, row)| (*key, row.clone()))
            .collect();

        let mut closed = Vec::with_capacity(targets.len());
        for (key, row) in &targets {
            if let Err(e) = row.close().await {
                warn!(product_id = %key.product_id, error = %e, "Slot still has reserved or sold stock");
                reopen_all(&closed).await;
                return Err(retired_as_missing(e, *key));
            }
            closed.push(row.clone());
        }

        if let Err(e) = self.slots.delete(slot_id).await {
            reopen_all(&closed).await;
            return Err(e);
        }

        {
            let mut rows = self.rows.write().await;
            for (key, _) in &targets {
                rows.remove(key);
            }
        }
        for (_, row) in &targets {
            if let Err(e) = row.shutdown().await {
                debug!(error = %e, "Inventory row already stopped");
            }
        }

        info!(retired = targets.len(), "Sales slot removed");
        Ok(targets.len())
    }

    /// Stop every row actor and wait for them to finish.
    pub async fn shutdown(&self) {
        let rows: Vec<InventoryRowClient> = self.rows.write().await.drain().map(|(_, row)| row).collect();
        for row in rows {
            if let Err(e) = row.shutdown().await {
                debug!(error = %e, "Inventory row already stopped");
            }
        }

        let handles = std::mem::take(&mut *self.handles.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Inventory row task failed");
            }
        }
    }

    async fn row(&self, key: InventoryKey) -> SalesResult<InventoryRowClient> {
        self.rows
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| SalesError::not_found(EntityKind::Inventory, key))
    }

    // Rows retired while a listing is in flight are skipped.
    async fn entries_where(
        &self,
        keep: impl Fn(&InventoryKey) -> bool,
    ) -> SalesResult<Vec<ProductInventory>> {
        let rows: Vec<InventoryRowClient> = {
            let guard = self.rows.read().await;
            guard
                .iter()
                .filter(|(key, _)| keep(key))
                .map(|(_, row)| row.clone())
                .collect()
        };

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match row.snapshot().await {
                Ok(entry) => entries.push(entry),
                Err(SalesError::StorageFailure(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        entries.sort_by_key(|entry| entry.created_at);
        Ok(entries)
    }
}

async fn reopen_all(rows: &[InventoryRowClient]) {
    for row in rows {
        if let Err(e) = row.reopen().await {
            error!(error = %e, "Failed to reopen inventory row");
        }
    }
}

/// A row's actor only stops once the row has been retired.
fn retired_as_missing(err: SalesError, key: InventoryKey) -> SalesError {
    match err {
        SalesError::StorageFailure(_) => SalesError::not_found(EntityKind::Inventory, key),
        other => other,
    }
}
