use crate::error::TransitionError;
use crate::events::EventLog;
use crate::models::LeadRef;

use super::store::{LeadStore, SourceBatch};
use super::summary::InteractionSummary;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Summary plus the sources that could not be read while building it.
#[derive(Debug)]
pub struct Aggregation {
    pub summary: InteractionSummary,
    pub failures: Vec<TransitionError>,
}

/// Folds every batch into one summary. A failed batch contributes nothing
/// and is reported alongside the result instead of aborting the fold.
pub fn summarize(lead: LeadRef, batches: Vec<SourceBatch>, long_call_minutes: f64) -> Aggregation {
    let mut summary = InteractionSummary::default();
    let mut failures = Vec::new();

    for batch in batches {
        match batch.rows {
            Ok(rows) => {
                log_debug!("{}: {} rows from {}", lead, rows.len(), batch.source.as_str());
                for record in &rows {
                    summary.absorb(record, long_call_minutes);
                }
            }
            Err(err) => {
                log_warn!(
                    "{}: {} unavailable, treating as empty: {err:#}",
                    lead,
                    batch.source.as_str()
                );
                failures.push(TransitionError::source_query(lead, batch.source, &err));
            }
        }
    }

    Aggregation { summary, failures }
}

/// Reads every interaction source for the store's lead and summarizes them.
/// Source failures are recorded in `events`; the summary is always returned.
pub async fn aggregate(
    store: &dyn LeadStore,
    events: &EventLog,
    long_call_minutes: f64,
) -> InteractionSummary {
    let lead = store.lead();
    let batches = store.fetch_interactions().await;
    let aggregation = summarize(lead, batches, long_call_minutes);

    for failure in &aggregation.failures {
        events.record_error(failure).await;
    }

    aggregation.summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::models::InteractionSource;
    use crate::transitions::summary::InteractionRecord;
    use anyhow::anyhow;

    fn ok(source: InteractionSource, rows: Vec<InteractionRecord>) -> SourceBatch {
        SourceBatch {
            source,
            rows: Ok(rows),
        }
    }

    fn failed(source: InteractionSource) -> SourceBatch {
        SourceBatch {
            source,
            rows: Err(anyhow!("connection reset")),
        }
    }

    #[test]
    fn no_rows_means_no_interaction() {
        let aggregation = summarize(
            LeadRef::Legacy(1),
            vec![
                ok(InteractionSource::Emails, vec![]),
                ok(InteractionSource::WhatsApp, vec![]),
            ],
            2.0,
        );
        assert_eq!(aggregation.summary, InteractionSummary::default());
        assert!(aggregation.failures.is_empty());
    }

    #[test]
    fn flags_are_or_reduced_across_sources() {
        let aggregation = summarize(
            LeadRef::Legacy(1),
            vec![
                ok(
                    InteractionSource::Emails,
                    vec![InteractionRecord::Email {
                        direction: "outgoing".into(),
                    }],
                ),
                ok(
                    InteractionSource::WhatsApp,
                    vec![InteractionRecord::WhatsApp {
                        direction: "in".into(),
                    }],
                ),
                ok(
                    InteractionSource::CallLogs,
                    vec![InteractionRecord::CallLog {
                        direction: Some("outgoing".into()),
                        duration_secs: Some(185),
                    }],
                ),
            ],
            2.0,
        );

        assert_eq!(
            aggregation.summary,
            InteractionSummary {
                has_outbound: true,
                has_inbound: true,
                has_call_over_2_min: true,
                has_any_interaction: true,
            }
        );
    }

    #[test]
    fn failed_source_is_skipped_and_reported() {
        let aggregation = summarize(
            LeadRef::Legacy(9),
            vec![
                failed(InteractionSource::Emails),
                ok(
                    InteractionSource::WhatsApp,
                    vec![InteractionRecord::WhatsApp {
                        direction: "out".into(),
                    }],
                ),
                failed(InteractionSource::CallLogs),
            ],
            2.0,
        );

        assert!(aggregation.summary.has_outbound);
        assert!(!aggregation.summary.has_inbound);
        assert_eq!(aggregation.failures.len(), 2);
        assert!(aggregation
            .failures
            .iter()
            .all(|err| err.kind() == FailureKind::SourceQueryFailure));
    }

    #[test]
    fn all_sources_failing_yields_empty_summary() {
        let aggregation = summarize(
            LeadRef::Legacy(9),
            vec![
                failed(InteractionSource::Emails),
                failed(InteractionSource::WhatsApp),
            ],
            2.0,
        );
        assert!(!aggregation.summary.has_any_interaction);
    }
}
