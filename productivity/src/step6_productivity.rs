use crate::step5_bin::AggregatedSegment;
use common::util::speed::{finite, Speed, SECONDS_PER_HOUR};
use log::debug;

/// A segment with its speed and productivity, i.e. passengers per vehicle hour of service.
/// Every derived value is `None` where it would be infinite or undefined, which happens for
/// segments without runtime (like the end-of-line segment) or routes without trips.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductivityRow {
    pub segment: AggregatedSegment,
    /// In mph
    pub speed: Option<f64>,
    pub vehicle_hours: Option<f64>,
    /// Boardings per vehicle hour
    pub productivity_on: Option<f64>,
    /// Boardings and alightings per vehicle hour, halved so it compares to `productivity_on`
    pub productivity_activity: Option<f64>,
    /// Load per vehicle hour. Not comparable to the other two measures.
    pub productivity_load: Option<f64>,
}

pub fn compute_productivity(segments: Vec<AggregatedSegment>, trip_count: f64) -> Vec<ProductivityRow> {
    debug!(target: "productivity", "Computing productivity for {} segments and {} trips", segments.len(), trip_count);

    segments.into_iter()
        .map(|segment| {
            let hours = segment.runtime_secs / SECONDS_PER_HOUR;
            let vehicle_hours = finite(hours * trip_count);
            let per_vehicle_hour = |value: f64| vehicle_hours.and_then(|vh| finite(value / vh));
            let ridership = segment.ridership;

            ProductivityRow {
                speed: Speed::from_run(segment.distance_mi, segment.runtime_secs).map(|s| s.0),
                vehicle_hours,
                productivity_on: per_vehicle_hour(ridership.boardings),
                productivity_activity: per_vehicle_hour(ridership.boardings + ridership.alightings)
                    .map(|activity| activity / 2.0),
                productivity_load: per_vehicle_hour(ridership.load),
                segment,
            }
        })
        .collect()
}
