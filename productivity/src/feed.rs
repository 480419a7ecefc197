use common::types::config::FeedSource;
use log::debug;
use polars::error::PolarsResult;
use polars::prelude::{IntoLazy, LazyCsvReader, LazyFileListReader, LazyFrame};
use std::path::Path;

/// Tables derived from a GTFS feed that was built for a single day type
#[derive(Clone)]
pub struct Feed {
    /// `route_id`, `route_short_name`
    pub routes: LazyFrame,
    /// One row per stop pair and route + direction, see [`crate::types::Segment`]
    pub segments: LazyFrame,
    /// `route_id`, `direction_id`, `ntrips`
    pub frequencies: LazyFrame,
    /// Hour boundaries of the aggregation windows the segment averages were built with
    pub time_windows: Vec<u32>,
}

impl Feed {
    pub fn read(source: &FeedSource) -> PolarsResult<Feed> {
        Ok(Feed {
            routes: read_csv(&source.routes)?,
            segments: read_csv(&source.segments)?,
            frequencies: read_csv(&source.frequencies)?,
            time_windows: source.time_windows.clone(),
        })
    }

    /// Reads all tables into memory, so that repeated queries don't parse the files again
    pub fn cached(self) -> PolarsResult<Feed> {
        Ok(Feed {
            routes: self.routes.collect()?.lazy(),
            segments: self.segments.collect()?.lazy(),
            frequencies: self.frequencies.collect()?.lazy(),
            ..self
        })
    }
}

pub(crate) fn read_csv(path: &Path) -> PolarsResult<LazyFrame> {
    debug!(target: "feed", "Reading {path:?}");
    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .finish()
}
