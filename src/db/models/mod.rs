pub mod call_log;
pub mod email;
pub mod lead;
pub mod legacy_interaction;
pub mod manual_interaction;
pub mod whatsapp_message;

pub use call_log::CallLog;
pub use email::EmailRecord;
pub use lead::{ClientLead, LegacyLead};
pub use legacy_interaction::LegacyInteraction;
pub use manual_interaction::ManualInteraction;
pub use whatsapp_message::WhatsAppMessage;
