use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::FrameworkError;
use crate::domain::ProductInventory;
use crate::error::{EntityKind, SalesError, SalesResult};
use crate::messages::{InventoryRequest, ServiceResponse};

#[derive(Debug, Clone, Copy)]
enum RowChange {
    Reserve,
    Release,
    Settle,
}

impl fmt::Display for RowChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RowChange::Reserve => "reserve",
            RowChange::Release => "release",
            RowChange::Settle => "settle",
        };
        f.write_str(name)
    }
}

/// Actor owning one inventory row. The guard and the counter change happen
/// while handling a single message, which makes every change atomic.
///
/// A closed row refuses counter changes as if it did not exist. Closing only
/// succeeds on a row with nothing reserved or sold, so no order can hold units
/// in a row that is about to be retired.
pub struct InventoryRowService {
    receiver: mpsc::Receiver<InventoryRequest>,
    row: ProductInventory,
    closed: bool,
}

impl InventoryRowService {
    pub fn new(buffer_size: usize, row: ProductInventory) -> (Self, InventoryRowClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            row,
            closed: false,
        };
        (service, InventoryRowClient::new(sender))
    }

    #[instrument(
        name = "inventory_row",
        skip(self),
        fields(slot_id = %self.row.slot_id, product_id = %self.row.product_id)
    )]
    pub async fn run(mut self) {
        debug!(initial = self.row.initial_quantity, "Inventory row starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                InventoryRequest::Reserve { quantity, respond_to } => {
                    self.handle_change(RowChange::Reserve, quantity, respond_to);
                }
                InventoryRequest::Release { quantity, respond_to } => {
                    self.handle_change(RowChange::Release, quantity, respond_to);
                }
                InventoryRequest::Settle { quantity, respond_to } => {
                    self.handle_change(RowChange::Settle, quantity, respond_to);
                }
                InventoryRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.row.clone()));
                }
                InventoryRequest::Close { respond_to } => {
                    let _ = respond_to.send(self.handle_close());
                }
                InventoryRequest::Reopen { respond_to } => {
                    debug!("Inventory row reopened");
                    self.closed = false;
                    let _ = respond_to.send(Ok(self.row.clone()));
                }
                InventoryRequest::Shutdown => {
                    debug!("Inventory row shutting down");
                    break;
                }
            }
        }

        debug!(
            reserved = self.row.reserved_quantity,
            sold = self.row.sold_quantity,
            "Inventory row stopped"
        );
    }

    #[instrument(fields(change = %change), skip(self, change, respond_to))]
    fn handle_change(
        &mut self,
        change: RowChange,
        quantity: u32,
        respond_to: ServiceResponse<ProductInventory>,
    ) {
        debug!("Processing inventory change");

        if self.closed {
            warn!("Inventory row is closed");
            let _ = respond_to.send(Err(SalesError::not_found(
                EntityKind::Inventory,
                self.row.key(),
            )));
            return;
        }

        let applied = match change {
            RowChange::Reserve => self.row.reserve(quantity),
            RowChange::Release => self.row.release(quantity),
            RowChange::Settle => self.row.settle(quantity),
        };

        let result = match applied {
            Ok(()) => {
                info!(
                    reserved = self.row.reserved_quantity,
                    sold = self.row.sold_quantity,
                    available = self.row.available(),
                    "Inventory updated"
                );
                Ok(self.row.clone())
            }
            Err(e) => {
                warn!(error = %e, "Inventory change rejected");
                Err(e)
            }
        };

        let _ = respond_to.send(result);
    }

    fn handle_close(&mut self) -> SalesResult<ProductInventory> {
        if self.row.is_in_use() {
            warn!(
                reserved = self.row.reserved_quantity,
                sold = self.row.sold_quantity,
                "Inventory row still in use, not closing"
            );
            return Err(SalesError::InventoryInUse {
                entity: EntityKind::SalesSlot,
                id: self.row.slot_id.to_string(),
            });
        }
        debug!("Inventory row closed");
        self.closed = true;
        Ok(self.row.clone())
    }
}

#[derive(Clone)]
pub struct InventoryRowClient {
    sender: mpsc::Sender<InventoryRequest>,
}

impl InventoryRowClient {
    pub fn new(sender: mpsc::Sender<InventoryRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> SalesResult<()> {
        debug!("Sending shutdown request");
        self.sender
            .send(InventoryRequest::Shutdown)
            .await
            .map_err(|_| FrameworkError::ActorClosed(EntityKind::Inventory))?;
        Ok(())
    }
}

client_method!(InventoryRowClient => fn reserve(quantity: u32) -> ProductInventory as InventoryRequest::Reserve, kind = EntityKind::Inventory);
client_method!(InventoryRowClient => fn release(quantity: u32) -> ProductInventory as InventoryRequest::Release, kind = EntityKind::Inventory);
client_method!(InventoryRowClient => fn settle(quantity: u32) -> ProductInventory as InventoryRequest::Settle, kind = EntityKind::Inventory);
client_method!(InventoryRowClient => fn snapshot() -> ProductInventory as InventoryRequest::Snapshot, kind = EntityKind::Inventory);
client_method!(InventoryRowClient => fn close() -> ProductInventory as InventoryRequest::Close, kind = EntityKind::Inventory);
client_method!(InventoryRowClient => fn reopen() -> ProductInventory as InventoryRequest::Reopen, kind = EntityKind::Inventory);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InventoryKey, ProductId, SalesSlotId};
    use crate::error::SalesError;

    fn start_row(initial: u32) -> InventoryRowClient {
        let key = InventoryKey::new(SalesSlotId::new(), ProductId::new());
        let (service, client) = InventoryRowService::new(8, ProductInventory::new(key, initial));
        tokio::spawn(service.run());
        client
    }

    #[tokio::test]
    async fn test_row_lifecycle() {
        let row = start_row(10);

        let after = row.reserve(4).await.unwrap();
        assert_eq!(after.reserved_quantity, 4);

        let after = row.settle(3).await.unwrap();
        assert_eq!((after.reserved_quantity, after.sold_quantity), (1, 3));

        let after = row.release(1).await.unwrap();
        assert_eq!(after.available(), 7);

        assert!(matches!(
            row.release(1).await,
            Err(SalesError::ReservationUnderflow { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_reservations_never_oversell() {
        let row = start_row(3);

        let attempts: Vec<_> = (0..10)
            .map(|_| {
                let row = row.clone();
                tokio::spawn(async move { row.reserve(1).await })
            })
            .collect();

        let mut successes = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(e, SalesError::InsufficientStock { .. })),
            }
        }

        assert_eq!(successes, 3);
        assert_eq!(row.snapshot().await.unwrap().reserved_quantity, 3);
    }

    #[tokio::test]
    async fn test_closed_row_refuses_changes_until_reopened() {
        let row = start_row(5);

        row.close().await.unwrap();
        assert!(matches!(
            row.reserve(1).await,
            Err(SalesError::NotFound { entity: EntityKind::Inventory, .. })
        ));
        assert_eq!(row.snapshot().await.unwrap().reserved_quantity, 0);

        row.reopen().await.unwrap();
        assert_eq!(row.reserve(2).await.unwrap().reserved_quantity, 2);

        // Units are held now, so the row stays open.
        assert!(matches!(
            row.close().await,
            Err(SalesError::InventoryInUse { entity: EntityKind::SalesSlot, .. })
        ));
        assert_eq!(row.reserve(1).await.unwrap().reserved_quantity, 3);
    }

    #[tokio::test]
    async fn test_stopped_row_reports_storage_failure() {
        let row = start_row(1);
        row.shutdown().await.unwrap();
        assert!(matches!(row.snapshot().await, Err(SalesError::StorageFailure(_))));
    }
}
