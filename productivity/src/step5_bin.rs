use crate::step4_merge::MergedRow;
use crate::types::Ridership;
use common::types::{SeqNum, StopId};
use common::util::distance::Distance;
use geo::{Coord, LineString};
use itertools::Itertools;
use log::{info, warn};
use std::fmt;
use std::fmt::Display;

/// One or more consecutive merged rows collapsed into one coarser segment
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSegment {
    /// Index of the bin (or of the merged row, if rows were not binned)
    pub position: usize,
    /// Positions of the first and last merged row in this segment
    pub first_position: usize,
    pub last_position: usize,
    pub start_stop_name: String,
    pub end_stop_name: String,
    pub end_stop_id: StopId,
    pub segment_name: String,
    pub distance: Distance,
    pub distance_mi: f64,
    pub runtime_secs: f64,
    /// Boardings and alightings are summed, load is the median of the rows
    pub ridership: Ridership,
    /// Whether this segment is nothing but the synthetic end-of-line row
    pub is_eol: bool,
    pub geometry: LineString<f64>,
}

impl From<&MergedRow> for AggregatedSegment {
    fn from(row: &MergedRow) -> Self {
        aggregate(row.position, &[row])
    }
}

/// Groups merged rows into the half-open position ranges `[edges[i], edges[i + 1])`.
///
/// A trailing edge one past the last row is appended, so the last bin runs through the end of
/// the route. Edges beyond the last row are therefore harmless: a last edge of 1000 simply means
/// "through the end". Bins without rows are left out, as are rows before the first edge.
pub fn bin_rows(rows: &[MergedRow], edges: &[usize]) -> Result<Vec<AggregatedSegment>, BinError> {
    if edges.is_empty() || !edges.iter().tuple_windows().all(|(a, b)| a < b) {
        return Err(BinError::InvalidBinEdges(edges.to_vec()));
    }
    info!(target: "bin", "Segment bins provided: {:?}", edges);

    let mut bounds = edges.to_vec();
    let trailing = rows.len() + 1;
    if bounds.last().is_some_and(|last| *last < trailing) {
        bounds.push(trailing);
    }

    let skipped = rows.iter().filter(|row| row.position < bounds[0]).count();
    if skipped > 0 {
        warn!(target: "bin", "{} rows before the first bin edge {} are left out", skipped, bounds[0]);
    }

    let bins = bounds.iter()
        .tuple_windows()
        .enumerate()
        .filter_map(|(bin, (lower, upper))| {
            let members = rows.iter()
                .filter(|row| (*lower..*upper).contains(&row.position))
                .collect_vec();
            if members.is_empty() {
                None
            } else {
                Some(aggregate(bin, &members))
            }
        })
        .collect();

    Ok(bins)
}

fn aggregate(position: usize, members: &[&MergedRow]) -> AggregatedSegment {
    // Callers never pass an empty bin
    let first = members[0];
    let last = members[members.len() - 1];

    let ridership = Ridership {
        boardings: members.iter().map(|r| r.ridership.boardings).sum(),
        alightings: members.iter().map(|r| r.ridership.alightings).sum(),
        load: median(members.iter().map(|r| r.ridership.load).collect()),
    };

    AggregatedSegment {
        position,
        first_position: first.position,
        last_position: last.position,
        start_stop_name: first.start_stop_name.clone(),
        end_stop_name: last.end_stop_name.clone(),
        end_stop_id: last.arriving_stop_id,
        segment_name: format!("{}/{}", first.start_stop_name, last.end_stop_name),
        distance: members.iter().map(|r| r.distance).sum(),
        distance_mi: members.iter().map(|r| r.distance_mi).sum(),
        runtime_secs: members.iter().map(|r| r.runtime_secs).sum(),
        ridership,
        is_eol: members.iter().all(|r| r.is_eol),
        geometry: concatenate(members.iter().map(|r| &r.geometry)),
    }
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Chains lines end to end. Where one line starts at the end of the previous, the shared
/// vertex is kept once.
fn concatenate<'a>(lines: impl Iterator<Item = &'a LineString<f64>>) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = vec![];
    for coord in lines.flat_map(|line| line.coords()) {
        if coords.last() != Some(coord) {
            coords.push(*coord);
        }
    }
    LineString::new(coords)
}

/// Edges `0, step, 2 * step, ...` below `stop_count`
pub fn even_edges(stop_count: usize, step: usize) -> Result<Vec<usize>, BinError> {
    if step == 0 {
        return Err(BinError::InvalidStep);
    }
    Ok((0..stop_count).step_by(step).collect())
}

/// Turns the arrival stop sequences a user picked on a map into bin edges. Each picked stop
/// closes a bin, so the next bin starts one position earlier.
pub fn edges_from_stop_sequences(selected: impl IntoIterator<Item = SeqNum>) -> Vec<usize> {
    selected.into_iter()
        .map(|SeqNum(seq)| (seq as usize).saturating_sub(1))
        .chain([0])
        .sorted()
        .dedup()
        .collect()
}

#[derive(thiserror::Error, Debug)]
pub enum BinError {
    InvalidBinEdges(Vec<usize>),
    InvalidStep,
}

impl Display for BinError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinError::InvalidBinEdges(edges) => write!(f, "Bin edges must be a non-empty, strictly increasing list, got {:?}", edges),
            BinError::InvalidStep => write!(f, "Bin step must be at least 1"),
        }
    }
}
