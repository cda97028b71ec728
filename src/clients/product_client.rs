use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductId, ProductInventory};
use crate::error::SalesResult;
use crate::inventory::InventoryLedger;
use crate::product_actor::{ProductCreate, ProductPatch};

/// Client for the product catalogue.
///
/// Products can be edited or removed only until the first inventory row
/// references them.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
    ledger: InventoryLedger,
}

impl_entity_reads!(ProductClient, Product, ProductId, product);

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>, ledger: InventoryLedger) -> Self {
        Self { inner, ledger }
    }

    #[instrument(skip(self, name), fields(name = %name.as_ref()))]
    pub async fn create_product(&self, name: impl AsRef<str>, price: u64) -> SalesResult<Product> {
        debug!("Sending request");
        let product = self
            .inner
            .create(ProductCreate {
                name: name.as_ref().to_string(),
                price,
            })
            .await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> SalesResult<Product> {
        debug!("Sending request");
        self.ledger
            .while_product_unreferenced(id, || self.inner.update(id, patch))
            .await
    }

    /// Every inventory row stocking the product, across all slots.
    #[instrument(skip(self))]
    pub async fn inventory_for_product(&self, id: ProductId) -> SalesResult<Vec<ProductInventory>> {
        debug!("Sending request");
        self.inner.fetch(id).await?;
        self.ledger.entries_for_product(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> SalesResult<()> {
        debug!("Sending request");
        self.ledger
            .while_product_unreferenced(id, || self.inner.delete(id))
            .await?;
        info!("Product deleted");
        Ok(())
    }
}
