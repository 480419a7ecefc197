use crate::feed::read_csv;
use crate::types::{Ridership, StopRidership};
use common::types::config::pipeline::RidershipColumns;
use common::types::{DirectionId, StopId};
use common::util::df::{floats, integers, strings};
use itertools::izip;
use log::{info, warn};
use polars::error::PolarsResult;
use polars::prelude::{col, lit, DataType, Expr, IntoLazy, LazyFrame, SortMultipleOptions};
use std::fmt;
use std::fmt::Display;
use std::path::Path;

/// Lazily reads a cleaned APC export. Nothing is parsed until the source is aggregated.
pub fn read_ridership_csv(path: &Path) -> Result<LazyFrame, RidershipError> {
    Ok(read_csv(path)?)
}

/// Filters the ridership samples down to one route and direction (and optionally a service
/// type such as "Weekday") and sums all trips per stop.
///
/// Route labels and directions are compared as text, since the export might store them as
/// numbers.
pub fn aggregate_ridership(
    source: LazyFrame,
    columns: &RidershipColumns,
    route_label: &str,
    direction: DirectionId,
    service_type: Option<&str>,
) -> Result<Vec<StopRidership>, RidershipError> {
    let frame = source.select([
        col(columns.line.as_str()).cast(DataType::String).alias("line"),
        col(columns.direction.as_str()).cast(DataType::String).alias("direction"),
        col(columns.service.as_str()).cast(DataType::String).alias("service"),
        col(columns.stop_id.as_str()).alias("stop_id"),
        col(columns.boardings.as_str()).cast(DataType::Float64).alias("boardings"),
        col(columns.alightings.as_str()).cast(DataType::Float64).alias("alightings"),
        col(columns.sequence.as_str()).alias("sequence"),
        col(columns.load.as_str()).cast(DataType::Float64).alias("load"),
        col(columns.stop_name.as_str()).cast(DataType::String).alias("stop_name"),
    ]);

    let frame = match service_type {
        Some(service_type) => {
            info!(target: "ridership", "Filtering ridership by service type {}", service_type);
            check_filter(frame, col("service").eq(lit(service_type)))?
                .ok_or_else(|| RidershipError::ServiceTypeNotFound(service_type.to_string()))?
        }
        None => frame,
    };

    let frame = check_filter(frame, col("line").eq(lit(route_label)))?
        .ok_or_else(|| RidershipError::RouteNotFoundInRidership(route_label.to_string()))?;

    let frame = check_filter(frame, col("direction").eq(lit(direction.to_string())))?
        .ok_or_else(|| RidershipError::DirectionNotFoundInRidership {
            route: route_label.to_string(),
            direction,
        })?;

    let per_stop = frame
        .group_by([col("stop_id").strict_cast(DataType::Int64)])
        .agg([
            col("boardings").sum(),
            col("alightings").sum(),
            col("load").sum(),
            col("sequence").strict_cast(DataType::Int64).max(),
            col("stop_name").max(),
        ])
        .sort(["stop_id"], SortMultipleOptions::default())
        .collect()?;

    let stop_ids = integers(&per_stop, "stop_id")?;
    let boardings = floats(&per_stop, "boardings")?;
    let alightings = floats(&per_stop, "alightings")?;
    let loads = floats(&per_stop, "load")?;
    let sequences = integers(&per_stop, "sequence")?;
    let names = strings(&per_stop, "stop_name")?;

    let mut result = Vec::with_capacity(per_stop.height());
    for (stop_id, on, off, load, sequence, name) in izip!(stop_ids, boardings, alightings, loads, sequences, names) {
        let Some(stop_id) = stop_id else {
            warn!(target: "ridership", "Dropping ridership without a stop id ({} boardings)", on.unwrap_or(0.0));
            continue;
        };
        result.push(StopRidership {
            stop_id: StopId(stop_id),
            ridership: Ridership {
                boardings: on.unwrap_or(0.0),
                alightings: off.unwrap_or(0.0),
                load: load.unwrap_or(0.0),
            },
            sequence_hint: sequence,
            stop_name: name,
        });
    }

    info!(target: "ridership", "Aggregated ridership for {} stops of route {} in direction {}", result.len(), route_label, direction);
    Ok(result)
}

/// Applies `predicate` and returns `None` if no row is left
fn check_filter(frame: LazyFrame, predicate: Expr) -> PolarsResult<Option<LazyFrame>> {
    let filtered = frame.filter(predicate).collect()?;
    if filtered.height() == 0 {
        return Ok(None);
    }
    Ok(Some(filtered.lazy()))
}

#[derive(thiserror::Error, Debug)]
pub enum RidershipError {
    Polars(#[from] polars::error::PolarsError),
    ServiceTypeNotFound(String),
    RouteNotFoundInRidership(String),
    DirectionNotFoundInRidership { route: String, direction: DirectionId },
}

impl Display for RidershipError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RidershipError::Polars(err) => err.fmt(f),
            RidershipError::ServiceTypeNotFound(service) => write!(f, "Service type {} was not found in the ridership data", service),
            RidershipError::RouteNotFoundInRidership(route) => write!(f, "Route {} was not found in the ridership data", route),
            RidershipError::DirectionNotFoundInRidership { route, direction } => write!(
                f, "Route {} has no ridership in direction {}", route, direction
            ),
        }
    }
}
