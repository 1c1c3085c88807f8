pub mod aggregator;
pub mod duration;
pub mod engine;
pub mod predicates;
pub mod store;
pub mod summary;
pub mod triggers;

pub use aggregator::{aggregate, summarize, Aggregation};
pub use duration::parse_duration;
pub use engine::{StageEngine, TransitionOutcome};
pub use predicates::{should_precommunicate, should_start_communication, target_stage};
pub use store::{ClientLeadStore, LeadDirectory, LeadStore, LegacyLeadStore, SourceBatch};
pub use summary::{InteractionRecord, InteractionSummary, Vocabulary};
pub use triggers::{TriggerHandle, Triggers};
