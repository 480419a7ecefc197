use crate::feed::Feed;
use crate::step1_resolve::{resolve_route, ResolveError};
use crate::step2_extract::{count_stops, extract_segments, trip_count, validate_time_windows, ExtractError};
use crate::step3_ridership::{aggregate_ridership, RidershipError};
use crate::step4_merge::matcher::matcher_for;
use crate::step4_merge::{merge, MergeError};
use crate::step5_bin::{bin_rows, even_edges, AggregatedSegment, BinError};
use crate::step6_productivity::{compute_productivity, ProductivityRow};
use crate::types::{Segment, StopRidership};
use common::types::config::pipeline::{BinSpec, MergeSettings, RidershipColumns};
use common::types::{DirectionId, RouteId};
use log::info;
use polars::prelude::LazyFrame;
use std::fmt;
use std::fmt::Display;

/// Everything a pipeline run needs besides its data
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    pub merge: MergeSettings,
    pub columns: RidershipColumns,
}

#[derive(Debug, Clone)]
pub struct ProductivityRequest {
    pub route_label: String,
    pub direction: DirectionId,
    /// Filters the ridership, not the feed. The feed has to be built for the same day type.
    pub service_type: Option<String>,
    pub bins: Option<BinSpec>,
}

#[derive(Debug)]
pub struct ProductivityReport {
    pub route_id: RouteId,
    pub trip_count: f64,
    pub rows: Vec<ProductivityRow>,
    pub unmatched_ridership: Vec<StopRidership>,
    pub duplicate_segments: Vec<Segment>,
}

/// Computes speed, ridership and productivity along one route in one direction.
///
/// Data quality problems (unmatched ridership, duplicated stop sequences) don't fail the run,
/// they are logged and returned with the report.
pub fn aggregate_productivity(
    feed: &Feed,
    ridership: LazyFrame,
    request: &ProductivityRequest,
    settings: &PipelineSettings,
) -> Result<ProductivityReport, PipelineError> {
    validate_time_windows(&feed.time_windows)?;

    let route_id = resolve_route(feed.routes.clone(), &request.route_label)?;
    let trips = trip_count(feed.frequencies.clone(), &route_id, request.direction)?;
    let segments = extract_segments(feed.segments.clone(), &route_id, request.direction)?;
    let edges = match &request.bins {
        Some(BinSpec::Edges { edges }) => Some(edges.clone()),
        Some(BinSpec::Step { step }) => Some(even_edges(count_stops(&segments), *step)?),
        None => None,
    };

    let stops = aggregate_ridership(
        ridership,
        &settings.columns,
        &request.route_label,
        request.direction,
        request.service_type.as_deref(),
    )?;

    let matcher = matcher_for(settings.merge.retry);
    let merged = merge(segments, stops, settings.merge.drop_duplicate_sequences, matcher.as_ref())?;

    let segments = match edges {
        Some(edges) if !edges.is_empty() => bin_rows(&merged.rows, &edges)?,
        _ => merged.rows.iter().map(AggregatedSegment::from).collect(),
    };

    let rows = compute_productivity(segments, trips);
    info!(
        target: "productivity",
        "Route {} direction {}: {} segments, {} stops with unmatched ridership",
        request.route_label, request.direction, rows.len(), merged.unmatched_ridership.len()
    );

    Ok(ProductivityReport {
        route_id,
        trip_count: trips,
        rows,
        unmatched_ridership: merged.unmatched_ridership,
        duplicate_segments: merged.duplicate_segments,
    })
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    Resolve(#[from] ResolveError),
    Extract(#[from] ExtractError),
    Ridership(#[from] RidershipError),
    Merge(#[from] MergeError),
    Bin(#[from] BinError),
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            PipelineError::Resolve(err) => err,
            PipelineError::Extract(err) => err,
            PipelineError::Ridership(err) => err,
            PipelineError::Merge(err) => err,
            PipelineError::Bin(err) => err,
        };
        let prefix = match self {
            PipelineError::Resolve(_) => "Resolving route",
            PipelineError::Extract(_) => "Reading segments",
            PipelineError::Ridership(_) => "Aggregating ridership",
            PipelineError::Merge(_) => "Combining segments and ridership",
            PipelineError::Bin(_) => "Binning segments",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
