use common::types::RouteId;
use common::util::df::strings;
use log::info;
use polars::prelude::{col, lit, DataType, LazyFrame};
use std::fmt;
use std::fmt::Display;

/// Looks up the internal route id of a public route label (`route_short_name`).
/// Every label has to map to exactly one route id.
pub fn resolve_route(routes: LazyFrame, label: &str) -> Result<RouteId, ResolveError> {
    let matches = routes
        .filter(col("route_short_name").cast(DataType::String).eq(lit(label)))
        .select([col("route_id").cast(DataType::String)])
        .collect()?;

    let route_ids: Vec<String> = strings(&matches, "route_id")?
        .into_iter()
        .flatten()
        .collect();

    match route_ids.as_slice() {
        [] => Err(ResolveError::RouteNotFound(label.to_string())),
        [route_id] => {
            info!(target: "resolve", "Route ID for route {} is {}", label, route_id);
            Ok(RouteId(route_id.clone()))
        }
        _ => Err(ResolveError::AmbiguousRoute {
            label: label.to_string(),
            route_ids,
        }),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    Polars(#[from] polars::error::PolarsError),
    RouteNotFound(String),
    AmbiguousRoute { label: String, route_ids: Vec<String> },
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResolveError::Polars(err) => err.fmt(f),
            ResolveError::RouteNotFound(label) => write!(f, "Route number {} not found in GTFS", label),
            ResolveError::AmbiguousRoute { label, route_ids } => write!(
                f, "Route number {} refers to multiple route IDs: {}", label, route_ids.join(", ")
            ),
        }
    }
}
