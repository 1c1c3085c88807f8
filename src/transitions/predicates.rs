use crate::models::{
    Stage, STAGE_ASSIGNED, STAGE_COMMUNICATION_STARTED, STAGE_NEW, STAGE_PRECOMMUNICATION,
};

use super::summary::InteractionSummary;

/// Stages from which a lead may enter precommunication.
const PRECOMMUNICATION_FROM: [Stage; 2] = [STAGE_NEW, STAGE_ASSIGNED];
/// Stages from which a lead may enter communication-started.
const COMMUNICATION_STARTED_FROM: [Stage; 3] = [STAGE_NEW, STAGE_ASSIGNED, STAGE_PRECOMMUNICATION];

/// Contact has gone one way only, and no long call has happened.
pub fn should_precommunicate(summary: &InteractionSummary, current_stage: Stage) -> bool {
    PRECOMMUNICATION_FROM.contains(&current_stage)
        && summary.has_any_interaction
        && summary.is_one_directional()
        && !summary.has_call_over_2_min
}

/// Contact has gone both ways and included a long call.
pub fn should_start_communication(summary: &InteractionSummary, current_stage: Stage) -> bool {
    COMMUNICATION_STARTED_FROM.contains(&current_stage)
        && summary.has_any_interaction
        && summary.is_bidirectional()
        && summary.has_call_over_2_min
}

/// The stage a lead should move to, if any. Communication-started wins when
/// both rules hold.
pub fn target_stage(summary: &InteractionSummary, current_stage: Stage) -> Option<Stage> {
    if should_start_communication(summary, current_stage) {
        Some(STAGE_COMMUNICATION_STARTED)
    } else if should_precommunicate(summary, current_stage) {
        Some(STAGE_PRECOMMUNICATION)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_summaries() -> Vec<InteractionSummary> {
        let mut summaries = Vec::new();
        for bits in 0u8..16 {
            summaries.push(InteractionSummary {
                has_outbound: bits & 1 != 0,
                has_inbound: bits & 2 != 0,
                has_call_over_2_min: bits & 4 != 0,
                has_any_interaction: bits & 8 != 0,
            });
        }
        summaries
    }

    const STAGES: [Stage; 8] = [-1, 0, 5, 10, 11, 12, 15, 20];

    #[test]
    fn nothing_fires_without_any_interaction() {
        for summary in all_summaries()
            .into_iter()
            .filter(|summary| !summary.has_any_interaction)
        {
            for stage in STAGES {
                assert!(!should_precommunicate(&summary, stage));
                assert!(!should_start_communication(&summary, stage));
            }
        }
    }

    #[test]
    fn precommunication_only_from_new_or_assigned() {
        let one_way = InteractionSummary {
            has_outbound: true,
            has_any_interaction: true,
            ..InteractionSummary::default()
        };
        for stage in STAGES {
            assert_eq!(
                should_precommunicate(&one_way, stage),
                stage == STAGE_NEW || stage == STAGE_ASSIGNED,
                "stage {stage}"
            );
        }
    }

    #[test]
    fn communication_started_only_below_fifteen() {
        let full = InteractionSummary {
            has_outbound: true,
            has_inbound: true,
            has_call_over_2_min: true,
            has_any_interaction: true,
        };
        for stage in STAGES {
            assert_eq!(
                should_start_communication(&full, stage),
                COMMUNICATION_STARTED_FROM.contains(&stage),
                "stage {stage}"
            );
        }
    }

    #[test]
    fn long_call_blocks_precommunication() {
        let outbound_long_call = InteractionSummary {
            has_outbound: true,
            has_call_over_2_min: true,
            has_any_interaction: true,
            ..InteractionSummary::default()
        };
        assert!(!should_precommunicate(&outbound_long_call, STAGE_NEW));
        assert!(!should_start_communication(&outbound_long_call, STAGE_NEW));
        assert_eq!(target_stage(&outbound_long_call, STAGE_NEW), None);
    }

    #[test]
    fn short_inbound_call_is_precommunication() {
        let short_inbound_call = InteractionSummary {
            has_inbound: true,
            has_any_interaction: true,
            ..InteractionSummary::default()
        };
        assert_eq!(
            target_stage(&short_inbound_call, STAGE_ASSIGNED),
            Some(STAGE_PRECOMMUNICATION)
        );
    }

    #[test]
    fn bidirectional_without_long_call_stays_put() {
        let chatty = InteractionSummary {
            has_outbound: true,
            has_inbound: true,
            has_any_interaction: true,
            ..InteractionSummary::default()
        };
        assert_eq!(target_stage(&chatty, STAGE_ASSIGNED), None);
        assert_eq!(target_stage(&chatty, STAGE_PRECOMMUNICATION), None);
    }

    #[test]
    fn target_never_moves_backwards() {
        for summary in all_summaries() {
            for stage in STAGES {
                if let Some(target) = target_stage(&summary, stage) {
                    assert!(target > stage, "{stage} -> {target}");
                }
            }
        }
    }
}
