use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{validate_time_range, ProductId, ProductInventory, SalesSlot, SalesSlotId};
use crate::error::SalesResult;
use crate::inventory::InventoryLedger;
use crate::slot_actor::{SlotAction, SlotCreate, SlotReschedule};

/// The Sales Slot Manager: slot lifecycle plus the products allocated to each
/// slot.
#[derive(Clone)]
pub struct SalesSlotClient {
    inner: ResourceClient<SalesSlot>,
    ledger: InventoryLedger,
}

impl_entity_reads!(SalesSlotClient, SalesSlot, SalesSlotId, slot);

impl SalesSlotClient {
    pub fn new(inner: ResourceClient<SalesSlot>, ledger: InventoryLedger) -> Self {
        Self { inner, ledger }
    }

    /// The slot starts inactive.
    #[instrument(skip(self))]
    pub async fn create_slot(&self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> SalesResult<SalesSlot> {
        debug!("Sending request");
        let slot = self.inner.create(SlotCreate { start_time, end_time }).await?;
        info!(slot_id = %slot.id, "Sales slot created");
        Ok(slot)
    }

    #[instrument(skip(self))]
    pub async fn reschedule(
        &self,
        id: SalesSlotId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> SalesResult<SalesSlot> {
        debug!("Sending request");
        self.inner.update(id, SlotReschedule { start_time, end_time }).await
    }

    #[instrument(skip(self))]
    pub async fn activate(&self, id: SalesSlotId) -> SalesResult<SalesSlot> {
        debug!("Sending request");
        self.inner.perform_action(id, SlotAction::Activate).await
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: SalesSlotId) -> SalesResult<SalesSlot> {
        debug!("Sending request");
        self.inner.perform_action(id, SlotAction::Deactivate).await
    }

    #[instrument(skip(self))]
    pub async fn active_slots(&self) -> SalesResult<Vec<SalesSlot>> {
        debug!("Sending request");
        let mut slots = self.inner.find(|slot| slot.is_active).await?;
        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }

    /// The active slot whose window contains `at`. With overlapping windows
    /// the one that started most recently wins.
    #[instrument(skip(self))]
    pub async fn current_slot(&self, at: DateTime<Utc>) -> SalesResult<Option<SalesSlot>> {
        debug!("Sending request");
        let slots = self.inner.find(move |slot| slot.is_active && slot.contains(at)).await?;
        Ok(slots.into_iter().max_by_key(|slot| slot.start_time))
    }

    /// Slots whose window overlaps `[start, end)`, active or not.
    #[instrument(skip(self))]
    pub async fn slots_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> SalesResult<Vec<SalesSlot>> {
        debug!("Sending request");
        validate_time_range(start, end)?;
        let mut slots = self
            .inner
            .find(move |slot| slot.start_time < end && slot.end_time > start)
            .await?;
        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }

    /// The earliest active slot that starts after `at`.
    #[instrument(skip(self))]
    pub async fn next_slot(&self, at: DateTime<Utc>) -> SalesResult<Option<SalesSlot>> {
        debug!("Sending request");
        let slots = self.inner.find(move |slot| slot.is_active && slot.start_time > at).await?;
        Ok(slots.into_iter().min_by_key(|slot| slot.start_time))
    }

    #[instrument(skip(self))]
    pub async fn add_product(
        &self,
        slot_id: SalesSlotId,
        product_id: ProductId,
        initial_quantity: u32,
    ) -> SalesResult<ProductInventory> {
        debug!("Sending request");
        self.ledger.create_entry(slot_id, product_id, initial_quantity).await
    }

    #[instrument(skip(self))]
    pub async fn list_inventories(&self, slot_id: SalesSlotId) -> SalesResult<Vec<ProductInventory>> {
        debug!("Sending request");
        self.inner.fetch(slot_id).await?;
        self.ledger.entries_for_slot(slot_id).await
    }

    #[instrument(skip(self))]
    pub async fn inventory(&self, slot_id: SalesSlotId, product_id: ProductId) -> SalesResult<ProductInventory> {
        debug!("Sending request");
        self.ledger.entry(slot_id, product_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_slot(&self, id: SalesSlotId) -> SalesResult<()> {
        debug!("Sending request");
        self.ledger.remove_slot(id).await?;
        Ok(())
    }
}
