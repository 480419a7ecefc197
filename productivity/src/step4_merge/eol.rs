use crate::types::Segment;
use common::types::StopId;
use common::util::distance::Distance;
use geo::LineString;

pub const EOL_NAME: &str = "EOL";

/// Builds the zero-length segment that follows the last stop of a route, so that ridership
/// at the final stop has a segment to attach to.
///
/// Returns `None` for a route without segments.
pub fn end_of_line(segments: &[Segment]) -> Option<Segment> {
    let last = segments.iter().max_by_key(|s| s.stop_sequence)?;

    Some(Segment {
        route_id: last.route_id.clone(),
        direction: last.direction,
        stop_sequence: last.stop_sequence.next(),
        start_stop_id: last.end_stop_id,
        end_stop_id: StopId::END_OF_LINE,
        start_stop_name: last.end_stop_name.clone(),
        end_stop_name: EOL_NAME.into(),
        distance: Distance::ZERO,
        runtime_secs: 0.0,
        shape_id: String::new(),
        geometry: LineString::new(vec![]),
    })
}
