use common::types::{DirectionId, RouteId, SeqNum, StopId};
use common::util::distance::Distance;
use geo::LineString;
use std::ops::Add;

/// One stop-to-next-stop hop of a route in one direction, with the averaged runtime of the
/// trips that serve it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub route_id: RouteId,
    pub direction: DirectionId,
    pub stop_sequence: SeqNum,
    pub start_stop_id: StopId,
    pub end_stop_id: StopId,
    pub start_stop_name: String,
    pub end_stop_name: String,
    pub distance: Distance,
    pub runtime_secs: f64,
    pub shape_id: String,
    pub geometry: LineString<f64>,
}

/// Passenger activity at a stop, averaged per trip and summed over all trips of the route
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ridership {
    pub boardings: f64,
    pub alightings: f64,
    pub load: f64,
}

impl Ridership {
    pub const ZERO: Ridership = Ridership { boardings: 0.0, alightings: 0.0, load: 0.0 };
}

impl Add for Ridership {
    type Output = Ridership;

    fn add(self, rhs: Self) -> Self::Output {
        Ridership {
            boardings: self.boardings + rhs.boardings,
            alightings: self.alightings + rhs.alightings,
            load: self.load + rhs.load,
        }
    }
}

/// Ridership of one stop after all samples of a route + direction were summed up.
/// `sequence_hint` and `stop_name` only serve display and the sequence based retry.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRidership {
    pub stop_id: StopId,
    pub ridership: Ridership,
    pub sequence_hint: Option<i64>,
    pub stop_name: Option<String>,
}
