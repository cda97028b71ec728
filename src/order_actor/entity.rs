use super::actions::{OrderAction, OrderCreate};
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderId};
use crate::error::{EntityKind, SalesError, SalesResult};

impl Entity for Order {
    type Id = OrderId;
    type CreateParams = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    type ActionResult = Order;

    const KIND: EntityKind = EntityKind::Order;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Creates a RESERVED order from lines whose stock is already reserved.
    fn from_create_params(id: OrderId, params: OrderCreate) -> SalesResult<Self> {
        Order::new(id, params.slot_id, params.lines)
    }

    /// Orders only change through actions.
    fn on_update(&mut self, _patch: ()) -> SalesResult<()> {
        Err(SalesError::Validation(
            "Orders change only through status actions".to_string(),
        ))
    }

    fn handle_action(&mut self, action: OrderAction) -> SalesResult<Order> {
        match action {
            OrderAction::AppendItems(lines) => self.append_items(lines)?,
            OrderAction::Confirm => self.confirm()?,
            OrderAction::Cancel => self.cancel()?,
            OrderAction::Complete => self.complete()?,
        }
        Ok(self.clone())
    }
}
