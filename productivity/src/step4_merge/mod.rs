pub mod eol;
pub mod matcher;

use crate::step4_merge::eol::end_of_line;
use crate::step4_merge::matcher::StopMatcher;
use crate::types::{Ridership, Segment, StopRidership};
use common::types::{SeqNum, StopId};
use common::util::distance::Distance;
use geo::LineString;
use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};
use std::fmt;
use std::fmt::Display;

/// Where the ridership of a merged row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Ridership recorded at the stop the segment departs from
    Matched,
    /// No ridership was recorded at the departing stop. Normal for stops nobody used.
    SegmentOnly,
    /// Ridership placed by a [`StopMatcher`] after the stop id join failed
    MatchedBySequence,
}

/// A segment together with the ridership of the stop it departs from.
///
/// Rows are kept in travel order. `position` is the zero-based index of the row along the
/// route, which is what bin edges refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub position: usize,
    pub stop_sequence: SeqNum,
    pub departing_from_stop_id: StopId,
    pub arriving_stop_id: StopId,
    pub start_stop_name: String,
    pub end_stop_name: String,
    pub distance: Distance,
    pub distance_mi: f64,
    pub runtime_secs: f64,
    pub ridership: Ridership,
    pub provenance: Provenance,
    pub is_eol: bool,
    pub geometry: LineString<f64>,
}

#[derive(Debug)]
pub struct MergeOutput {
    pub rows: Vec<MergedRow>,
    /// Ridership that could not be placed on any segment, neither by stop id nor by the retry
    pub unmatched_ridership: Vec<StopRidership>,
    /// Segments dropped because an earlier segment had the same stop sequence
    pub duplicate_segments: Vec<Segment>,
}

/// Joins the segments of one route + direction with the ridership of their departing stops.
///
/// Segments are ordered by stop sequence and followed by a synthetic end-of-line segment.
/// With `drop_duplicates`, only the first segment of each stop sequence is kept. Ridership for
/// stops that no segment departs from is handed to `matcher`; whatever remains is reported in
/// [`MergeOutput::unmatched_ridership`] and left out of the rows.
pub fn merge(
    segments: Vec<Segment>,
    ridership: Vec<StopRidership>,
    drop_duplicates: bool,
    matcher: &dyn StopMatcher,
) -> Result<MergeOutput, MergeError> {
    info!(target: "merge", "Combining {} segments with ridership of {} stops", segments.len(), ridership.len());

    let mut segments = segments;
    // Stable, so the first segment of a duplicated sequence stays in front
    segments.sort_by_key(|s| s.stop_sequence);

    let (mut segments, duplicate_segments) = if drop_duplicates {
        split_duplicates(segments)
    } else {
        (segments, vec![])
    };
    if !duplicate_segments.is_empty() {
        warn!(target: "merge", "Removing {} segments with duplicated stop sequences", duplicate_segments.len());
        for duplicate in &duplicate_segments {
            warn!(
                target: "merge",
                "  stop sequence {}: {} -> {}",
                duplicate.stop_sequence, duplicate.start_stop_name, duplicate.end_stop_name
            );
        }
    }

    let eol = end_of_line(&segments).ok_or(MergeError::NoSegments)?;
    segments.push(eol);
    let eol_position = segments.len() - 1;

    let mut by_stop: HashMap<StopId, StopRidership> = HashMap::with_capacity(ridership.len());
    for stop in ridership {
        by_stop.entry(stop.stop_id)
            .and_modify(|existing| existing.ridership = existing.ridership + stop.ridership)
            .or_insert(stop);
    }

    let mut departures: HashSet<StopId> = HashSet::with_capacity(segments.len());
    let mut rows: Vec<MergedRow> = Vec::with_capacity(segments.len());
    for (position, segment) in segments.into_iter().enumerate() {
        if !departures.insert(segment.start_stop_id) && by_stop.contains_key(&segment.start_stop_id) {
            warn!(
                target: "merge",
                "Stop {} is departed from more than once, its ridership is counted for each departure",
                segment.start_stop_id
            );
        }

        let (ridership, provenance) = match by_stop.get(&segment.start_stop_id) {
            Some(stop) => (stop.ridership, Provenance::Matched),
            None => (Ridership::ZERO, Provenance::SegmentOnly),
        };

        rows.push(MergedRow {
            position,
            stop_sequence: segment.stop_sequence,
            departing_from_stop_id: segment.start_stop_id,
            arriving_stop_id: segment.end_stop_id,
            distance_mi: segment.distance.miles(),
            distance: segment.distance,
            runtime_secs: segment.runtime_secs,
            ridership,
            provenance,
            is_eol: position == eol_position,
            start_stop_name: segment.start_stop_name,
            end_stop_name: segment.end_stop_name,
            geometry: segment.geometry,
        });
    }
    debug!(target: "merge", "Merged rider info with segment info");

    let mut unmatched: Vec<StopRidership> = by_stop.into_values()
        .filter(|stop| !departures.contains(&stop.stop_id))
        .collect();
    unmatched.sort_by_key(|stop| stop.stop_id);

    let unmatched_ridership = if unmatched.is_empty() {
        unmatched
    } else {
        info!(target: "merge", "The following stops were unmatched on first pass:");
        log_stops(&unmatched);

        let remaining = matcher.resolve(&mut rows, unmatched);
        if !remaining.is_empty() {
            warn!(target: "merge", "Unmatched ridership remains. Are your data sources up-to-date?");
            log_stops(&remaining);
        }
        remaining
    };

    Ok(MergeOutput {
        rows,
        unmatched_ridership,
        duplicate_segments,
    })
}

/// Splits an ordered list of segments into the first segment of each stop sequence and the rest
fn split_duplicates(segments: Vec<Segment>) -> (Vec<Segment>, Vec<Segment>) {
    let mut kept: Vec<Segment> = Vec::with_capacity(segments.len());
    let mut duplicates = vec![];
    for segment in segments {
        match kept.last() {
            Some(previous) if previous.stop_sequence == segment.stop_sequence => duplicates.push(segment),
            _ => kept.push(segment),
        }
    }
    (kept, duplicates)
}

fn log_stops(stops: &[StopRidership]) {
    for stop in stops {
        info!(
            target: "merge",
            "  {} ({}): on {}, off {}, sequence {}",
            stop.stop_name.as_deref().unwrap_or("?"),
            stop.stop_id,
            stop.ridership.boardings,
            stop.ridership.alightings,
            stop.sequence_hint.map(|s| s.to_string()).unwrap_or_else(|| "?".into()),
        );
    }
}

#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    NoSegments,
}

impl Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MergeError::NoSegments => write!(f, "No segments to combine ridership with"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step4_merge::matcher::{NoRetry, SequenceMatcher};
    use crate::tests::route_17;

    fn merged() -> MergeOutput {
        merge(route_17::segments(), route_17::stop_ridership(), true, &NoRetry).unwrap()
    }

    #[test]
    fn test_one_row_per_stop_plus_eol() {
        let output = merged();

        assert_eq!(output.rows.len(), 6);
        assert_eq!(output.rows.iter().map(|r| r.position).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(
            output.rows.iter().map(|r| r.departing_from_stop_id.0).collect::<Vec<_>>(),
            vec![101, 102, 103, 104, 105, 106]
        );
        let eol = output.rows.last().unwrap();
        assert!(eol.is_eol);
        assert_eq!(eol.arriving_stop_id, StopId::END_OF_LINE);
        assert!(output.rows[..5].iter().all(|r| !r.is_eol));
    }

    #[test]
    fn test_unordered_input_is_sorted() {
        let mut segments = route_17::segments();
        segments.reverse();
        let output = merge(segments, route_17::stop_ridership(), true, &NoRetry).unwrap();

        assert_eq!(output.rows, merged().rows);
    }

    #[test]
    fn test_provenance_and_zero_ridership() {
        let output = merged();
        let provenance: Vec<Provenance> = output.rows.iter().map(|r| r.provenance).collect();

        assert_eq!(provenance, vec![
            Provenance::Matched, Provenance::SegmentOnly, Provenance::Matched,
            Provenance::SegmentOnly, Provenance::Matched, Provenance::SegmentOnly,
        ]);
        let unridden = output.rows.iter()
            .filter(|r| !r.is_eol && r.ridership.boardings == 0.0)
            .count();
        assert_eq!(unridden, 2);
        assert_eq!(output.rows[5].ridership, Ridership::ZERO);
    }

    #[test]
    fn test_unmatched_ridership_is_reported_not_merged() {
        let output = merged();

        assert_eq!(output.unmatched_ridership.len(), 1);
        assert_eq!(output.unmatched_ridership[0].stop_id, StopId(999));
        let merged_on: f64 = output.rows.iter().map(|r| r.ridership.boardings).sum();
        assert_eq!(merged_on, route_17::MATCHED_BOARDINGS);
    }

    #[test]
    fn test_boardings_are_conserved_without_unmatched_stops() {
        let ridership: Vec<StopRidership> = route_17::stop_ridership()
            .into_iter()
            .filter(|stop| stop.stop_id != StopId(999))
            .collect();
        let total: f64 = ridership.iter().map(|s| s.ridership.boardings).sum();

        let output = merge(route_17::segments(), ridership, true, &NoRetry).unwrap();
        assert!(output.unmatched_ridership.is_empty());
        assert_eq!(output.rows.iter().map(|r| r.ridership.boardings).sum::<f64>(), total);
    }

    #[test]
    fn test_retry_places_ridership_by_sequence() {
        let output = merge(route_17::segments(), route_17::stop_ridership(), true, &SequenceMatcher).unwrap();

        assert!(output.unmatched_ridership.is_empty());
        let placed = output.rows.iter().find(|r| r.provenance == Provenance::MatchedBySequence).unwrap();
        assert_eq!(placed.departing_from_stop_id, StopId(104));
        let total: f64 = route_17::stop_ridership().iter().map(|s| s.ridership.boardings).sum();
        assert_eq!(output.rows.iter().map(|r| r.ridership.boardings).sum::<f64>(), total);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut segments = route_17::segments();
        let mut detour = segments[2].clone();
        detour.start_stop_name = "Detour".into();
        detour.distance = Distance(9999.0);
        segments.push(detour);

        let output = merge(segments, route_17::stop_ridership(), true, &NoRetry).unwrap();
        assert_eq!(output.rows.len(), 6);
        assert_eq!(output.duplicate_segments.len(), 1);
        assert_eq!(output.duplicate_segments[0].start_stop_name, "Detour");
        assert_eq!(output.rows[2].start_stop_name, "3rd Ave");
    }

    #[test]
    fn test_duplicates_kept_when_asked() {
        let mut segments = route_17::segments();
        segments.push(segments[2].clone());

        let output = merge(segments, route_17::stop_ridership(), false, &NoRetry).unwrap();
        assert_eq!(output.rows.len(), 7);
        assert!(output.duplicate_segments.is_empty());
        assert_eq!(output.rows[3].stop_sequence, output.rows[2].stop_sequence);
    }

    #[test]
    fn test_distance_in_miles() {
        let output = merged();
        assert_eq!(output.rows[2].distance_mi, 1.0);
        assert_eq!(output.rows[5].distance_mi, 0.0);
    }

    #[test]
    fn test_no_segments() {
        let err = merge(vec![], route_17::stop_ridership(), true, &NoRetry).err().unwrap();
        assert!(matches!(err, MergeError::NoSegments));
    }
}
