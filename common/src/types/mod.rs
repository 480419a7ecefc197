use polars::datatypes::AnyValue;
use std::fmt;
use std::fmt::{Display, Formatter};

pub mod config;

/// Stop identifier shared by the schedule data and the ridership source.
/// `StopId(0)` marks the far end of the synthetic end-of-line segment.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct StopId(pub i64);

impl StopId {
    pub const END_OF_LINE: StopId = StopId(0);
}

impl Display for StopId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Sequence number of a stop along one route + direction
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct SeqNum(pub u32);

impl SeqNum {
    pub fn next(self) -> SeqNum {
        SeqNum(self.0 + 1)
    }
}

impl Display for SeqNum {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The internal (GTFS) identifier of a route, as opposed to its public label
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RouteId(pub String);

impl Display for RouteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// GTFS `direction_id`, either 0 or 1
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct DirectionId(pub u8);

impl Display for DirectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn f64_from_any_value(value: AnyValue) -> Option<f64> {
    match value {
        AnyValue::Float64(v) => Some(v),
        AnyValue::Float32(v) => Some(v as f64),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::Int32(v) => Some(v as f64),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::UInt32(v) => Some(v as f64),
        _ => None,
    }
}
