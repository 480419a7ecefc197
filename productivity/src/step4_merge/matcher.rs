use crate::step4_merge::{MergedRow, Provenance};
use crate::types::StopRidership;
use common::types::config::pipeline::RetryStrategy;
use log::{debug, info};

/// Second chance for ridership that found no segment on the stop id join
pub trait StopMatcher {
    /// Attaches what it can of `unmatched` to `rows` and returns the ridership that is still
    /// without a segment.
    fn resolve(&self, rows: &mut [MergedRow], unmatched: Vec<StopRidership>) -> Vec<StopRidership>;
}

pub fn matcher_for(strategy: RetryStrategy) -> Box<dyn StopMatcher> {
    match strategy {
        RetryStrategy::None => Box::new(NoRetry),
        RetryStrategy::Sequence => Box::new(SequenceMatcher),
    }
}

pub struct NoRetry;

impl StopMatcher for NoRetry {
    fn resolve(&self, _rows: &mut [MergedRow], unmatched: Vec<StopRidership>) -> Vec<StopRidership> {
        unmatched
    }
}

/// Places ridership on the segment whose stop sequence equals the sequence recorded by the
/// counters. Only segments without any ridership of their own are filled, a matched row is
/// never overwritten. This can attach ridership to the wrong stop if the counter's sequence
/// numbering drifted from the schedule's.
pub struct SequenceMatcher;

impl StopMatcher for SequenceMatcher {
    fn resolve(&self, rows: &mut [MergedRow], unmatched: Vec<StopRidership>) -> Vec<StopRidership> {
        info!(target: "merge", "Attempting sequence-based matching for {} stops", unmatched.len());

        unmatched.into_iter()
            .filter_map(|stop| {
                let target = stop.sequence_hint.and_then(|hint| {
                    rows.iter().position(|row| {
                        row.provenance == Provenance::SegmentOnly
                            && i64::from(row.stop_sequence.0) == hint
                    })
                });

                match target {
                    Some(idx) => {
                        let row = &mut rows[idx];
                        debug!(
                            target: "merge",
                            "Placed ridership of stop {} on stop sequence {} (departing from stop {})",
                            stop.stop_id, row.stop_sequence, row.departing_from_stop_id
                        );
                        row.ridership = stop.ridership;
                        row.provenance = Provenance::MatchedBySequence;
                        None
                    }
                    None => Some(stop),
                }
            })
            .collect()
    }
}
