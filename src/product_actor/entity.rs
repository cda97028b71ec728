use chrono::Utc;

use super::dtos::{ProductCreate, ProductPatch};
use crate::actor_framework::Entity;
use crate::domain::product::{validate_name, validate_price};
use crate::domain::{Product, ProductId};
use crate::error::{EntityKind, SalesResult};

impl Entity for Product {
    type Id = ProductId;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ();
    type ActionResult = ();

    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn from_create_params(id: ProductId, params: ProductCreate) -> SalesResult<Self> {
        Product::new(id, params.name, params.price)
    }

    /// Updates name and/or price.
    ///
    /// Whether the product may still change at all is decided by the caller,
    /// which knows about inventory references.
    fn on_update(&mut self, patch: ProductPatch) -> SalesResult<()> {
        if let Some(name) = patch.name {
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
            self.price = price;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> SalesResult<()> {
        Ok(())
    }
}
