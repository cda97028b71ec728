use tracing::debug;

use super::actions::{SlotAction, SlotCreate, SlotReschedule};
use crate::actor_framework::Entity;
use crate::domain::{SalesSlot, SalesSlotId};
use crate::error::{EntityKind, SalesResult};

impl Entity for SalesSlot {
    type Id = SalesSlotId;
    type CreateParams = SlotCreate;
    type Patch = SlotReschedule;
    type Action = SlotAction;
    type ActionResult = SalesSlot;

    const KIND: EntityKind = EntityKind::SalesSlot;

    fn id(&self) -> &SalesSlotId {
        &self.id
    }

    fn from_create_params(id: SalesSlotId, params: SlotCreate) -> SalesResult<Self> {
        SalesSlot::new(id, params.start_time, params.end_time)
    }

    fn on_update(&mut self, patch: SlotReschedule) -> SalesResult<()> {
        self.reschedule(patch.start_time, patch.end_time)
    }

    fn handle_action(&mut self, action: SlotAction) -> SalesResult<SalesSlot> {
        let changed = self.set_active(action == SlotAction::Activate);
        debug!(slot_id = %self.id, ?action, changed, "Slot activation applied");
        Ok(self.clone())
    }
}
