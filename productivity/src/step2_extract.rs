use crate::types::Segment;
use common::types::{f64_from_any_value, DirectionId, RouteId, SeqNum, StopId};
use common::util::df::{floats, integers, strings};
use common::util::distance::Distance;
use common::util::wkt::parse_wkt_linestring;
use itertools::{izip, Itertools};
use log::{debug, info, warn};
use polars::prelude::{col, lit, DataType, Expr, LazyFrame};
use std::fmt;
use std::fmt::Display;

/// Segment averages are only meaningful when the feed was aggregated over one single time
/// window, i.e. exactly two window boundaries.
pub fn validate_time_windows(time_windows: &[u32]) -> Result<(), ExtractError> {
    if time_windows.len() != 2 {
        return Err(ExtractError::InvalidTimeWindowConfiguration(time_windows.to_vec()));
    }
    Ok(())
}

fn route_and_direction(route_id: &RouteId, direction: DirectionId) -> Expr {
    col("route_id").cast(DataType::String).eq(lit(route_id.0.as_str()))
        .and(col("direction_id").cast(DataType::Int64).eq(lit(direction.0 as i64)))
}

/// All segments of a route in one direction, in no particular order
pub fn extract_segments(
    segments: LazyFrame,
    route_id: &RouteId,
    direction: DirectionId,
) -> Result<Vec<Segment>, ExtractError> {
    let frame = segments
        .filter(route_and_direction(route_id, direction))
        .collect()?;
    debug!(target: "extract", "{} segments for route {} in direction {}", frame.height(), route_id, direction);

    let sequences = integers(&frame, "stop_sequence")?;
    let start_ids = integers(&frame, "start_stop_id")?;
    let end_ids = integers(&frame, "end_stop_id")?;
    let start_names = strings(&frame, "start_stop_name")?;
    let end_names = strings(&frame, "end_stop_name")?;
    let distances = floats(&frame, "distance_m")?;
    let runtimes = floats(&frame, "runtime_sec")?;
    let shape_ids = strings(&frame, "shape_id")?;
    let geometries = strings(&frame, "geometry")?;

    izip!(sequences, start_ids, end_ids, start_names, end_names, distances, runtimes, shape_ids, geometries)
        .enumerate()
        .map(|(row, (sequence, start_id, end_id, start_name, end_name, distance, runtime, shape_id, geometry))| -> Result<Segment, ExtractError> {
            let sequence = required(sequence, "stop_sequence", row)?;
            let geometry = geometry.unwrap_or_default();

            Ok(Segment {
                route_id: route_id.clone(),
                direction,
                stop_sequence: SeqNum(u32::try_from(sequence).map_err(|_| ExtractError::InvalidValue {
                    column: "stop_sequence", row,
                })?),
                start_stop_id: StopId(required(start_id, "start_stop_id", row)?),
                end_stop_id: StopId(required(end_id, "end_stop_id", row)?),
                start_stop_name: start_name.unwrap_or_default(),
                end_stop_name: end_name.unwrap_or_default(),
                distance: Distance(required_finite(distance, "distance_m", row)?),
                runtime_secs: required_finite(runtime, "runtime_sec", row)?,
                shape_id: shape_id.unwrap_or_default(),
                geometry: parse_wkt_linestring(&geometry)
                    .ok_or(ExtractError::InvalidValue { column: "geometry", row })?,
            })
        })
        .collect()
}

fn required<T>(value: Option<T>, column: &'static str, row: usize) -> Result<T, ExtractError> {
    value.ok_or(ExtractError::MissingValue { column, row })
}

fn required_finite(value: Option<f64>, column: &'static str, row: usize) -> Result<f64, ExtractError> {
    match required(value, column, row)? {
        value if value.is_finite() => Ok(value),
        _ => Err(ExtractError::InvalidValue { column, row }),
    }
}

/// Total number of scheduled trips of a route in one direction, summed over the frequency table
pub fn trip_count(
    frequencies: LazyFrame,
    route_id: &RouteId,
    direction: DirectionId,
) -> Result<f64, ExtractError> {
    let total = frequencies
        .filter(route_and_direction(route_id, direction))
        .select([col("ntrips").cast(DataType::Float64).sum()])
        .collect()?;

    let trips = f64_from_any_value(total.get_columns()[0].get(0)?).unwrap_or(0.0);
    if trips == 0.0 {
        warn!(target: "extract", "No trips scheduled for route {} in direction {}", route_id, direction);
    } else {
        info!(target: "extract", "Route {} runs {} trips in direction {}", route_id, trips, direction);
    }

    Ok(trips)
}

/// Number of stops served, counting each stop sequence once
pub fn count_stops(segments: &[Segment]) -> usize {
    let count = segments.iter().map(|s| s.stop_sequence).unique().count();
    debug!(target: "extract", "Number of stops (preliminary) {}, (finalized) {}", segments.len(), count);
    count
}

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    Polars(#[from] polars::error::PolarsError),
    InvalidTimeWindowConfiguration(Vec<u32>),
    MissingValue { column: &'static str, row: usize },
    InvalidValue { column: &'static str, row: usize },
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExtractError::Polars(err) => err.fmt(f),
            ExtractError::InvalidTimeWindowConfiguration(windows) => write!(
                f, "The feed must be built with a single time window (two boundaries), got {:?}", windows
            ),
            ExtractError::MissingValue { column, row } => write!(f, "Missing {} in segment row {}", column, row),
            ExtractError::InvalidValue { column, row } => write!(f, "Invalid {} in segment row {}", column, row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use polars::prelude::IntoLazy;

    fn segments_frame() -> LazyFrame {
        df![
            "route_id" => ["5617", "5617", "5617", "5618"],
            "direction_id" => [1i64, 1, 0, 1],
            "stop_sequence" => [2i64, 1, 1, 1],
            "start_stop_id" => [11i64, 10, 12, 10],
            "end_stop_id" => [12i64, 11, 11, 11],
            "start_stop_name" => ["B", "A", "C", "A"],
            "end_stop_name" => ["C", "B", "B", "B"],
            "distance_m" => [500.0, 300.0, 500.0, 300.0],
            "runtime_sec" => [60.0, 45.0, 70.0, 30.0],
            "shape_id" => ["s1", "s1", "s2", "s3"],
            "geometry" => ["LINESTRING (0 1, 0 2)", "LINESTRING (0 0, 0 1)", "LINESTRING (0 2, 0 1)", "LINESTRING (0 0, 0 1)"],
        ].unwrap().lazy()
    }

    #[test]
    fn test_time_windows() {
        assert!(validate_time_windows(&[0, 24]).is_ok());
        assert!(matches!(
            validate_time_windows(&[0, 6, 24]),
            Err(ExtractError::InvalidTimeWindowConfiguration(_))
        ));
        assert!(validate_time_windows(&[]).is_err());
    }

    #[test]
    fn test_extract_filters_route_and_direction() {
        let segments = extract_segments(segments_frame(), &RouteId("5617".into()), DirectionId(1)).unwrap();

        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.route_id.0 == "5617" && s.direction == DirectionId(1)));
        let first = segments.iter().find(|s| s.stop_sequence == SeqNum(1)).unwrap();
        assert_eq!(first.start_stop_id, StopId(10));
        assert_eq!(first.end_stop_name, "B");
        assert_eq!(first.distance, Distance(300.0));
        assert_eq!(first.geometry.0.len(), 2);
    }

    #[test]
    fn test_extract_unknown_route_is_empty() {
        let segments = extract_segments(segments_frame(), &RouteId("1".into()), DirectionId(1)).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_bad_geometry_is_reported() {
        let frame = segments_frame()
            .with_column(lit("POINT (0 0)").alias("geometry"));
        let err = extract_segments(frame, &RouteId("5617".into()), DirectionId(0)).unwrap_err();

        assert!(matches!(err, ExtractError::InvalidValue { column: "geometry", row: 0 }));
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let infinite_distance = segments_frame()
            .with_column(lit(f64::INFINITY).alias("distance_m"));
        let err = extract_segments(infinite_distance, &RouteId("5617".into()), DirectionId(0)).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidValue { column: "distance_m", row: 0 }));

        let unknown_runtime = segments_frame()
            .with_column(lit(f64::NAN).alias("runtime_sec"));
        let err = extract_segments(unknown_runtime, &RouteId("5617".into()), DirectionId(0)).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidValue { column: "runtime_sec", row: 0 }));
    }

    #[test]
    fn test_trip_count_sums_matching_rows() {
        let frequencies = df![
            "route_id" => ["5617", "5617", "5617", "5618"],
            "direction_id" => [1i64, 1, 0, 1],
            "ntrips" => [20i64, 12, 30, 7],
        ].unwrap().lazy();

        assert_eq!(trip_count(frequencies.clone(), &RouteId("5617".into()), DirectionId(1)).unwrap(), 32.0);
        assert_eq!(trip_count(frequencies, &RouteId("42".into()), DirectionId(1)).unwrap(), 0.0);
    }

    #[test]
    fn test_count_stops_ignores_duplicate_sequences() {
        let mut segments = extract_segments(segments_frame(), &RouteId("5617".into()), DirectionId(1)).unwrap();
        segments.push(segments[0].clone());

        assert_eq!(count_stops(&segments), 2);
    }
}
