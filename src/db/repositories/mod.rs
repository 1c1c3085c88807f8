mod call_logs;
mod emails;
mod leads;
mod legacy_interactions;
mod whatsapp_messages;
