pub mod interaction;
pub mod lead;

pub use interaction::{Direction, InteractionSource, TriggerKind};
pub use lead::{
    LeadRef, Stage, TriggerIds, STAGE_ASSIGNED, STAGE_COMMUNICATION_STARTED, STAGE_NEW,
    STAGE_PRECOMMUNICATION,
};
