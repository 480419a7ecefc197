use crate::pipeline::ProductivityReport;
use crate::step6_productivity::ProductivityRow;
use common::util::df::{create_file, write_csv};
use common::util::wkt::to_wkt_linestring;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use log::info;
use polars::df;
use polars::error::PolarsResult;
use polars::frame::DataFrame;
use std::fmt;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

/// The productivity table handed to the map renderer, one row per (binned) segment in travel
/// order. Geometry is written as WKT.
pub fn to_dataframe(rows: &[ProductivityRow]) -> PolarsResult<DataFrame> {
    fn column<T>(rows: &[ProductivityRow], value: impl Fn(&ProductivityRow) -> T) -> Vec<T> {
        rows.iter().map(value).collect()
    }

    df![
        "position" => column(rows, |r| r.segment.position as u32),
        "start_stop_name" => column(rows, |r| r.segment.start_stop_name.clone()),
        "end_stop_name" => column(rows, |r| r.segment.end_stop_name.clone()),
        "segment_name" => column(rows, |r| r.segment.segment_name.clone()),
        "AverageOn" => column(rows, |r| r.segment.ridership.boardings),
        "AverageOff" => column(rows, |r| r.segment.ridership.alightings),
        "AverageLoad" => column(rows, |r| r.segment.ridership.load),
        "distance_mi" => column(rows, |r| r.segment.distance_mi),
        "runtime_sec" => column(rows, |r| r.segment.runtime_secs),
        "speed" => column(rows, |r| r.speed),
        "vehicle_hours" => column(rows, |r| r.vehicle_hours),
        "productivity_on" => column(rows, |r| r.productivity_on),
        "productivity_activity" => column(rows, |r| r.productivity_activity),
        "productivity_load" => column(rows, |r| r.productivity_load),
        "geometry" => column(rows, |r| to_wkt_linestring(&r.segment.geometry)),
    ]
}

/// One GeoJSON feature per row, tagged with the map layer it belongs to.
/// Missing values become `null`.
pub fn to_features(rows: &[ProductivityRow], layer: &str) -> Vec<Feature> {
    rows.iter()
        .map(|row| {
            let segment = &row.segment;
            let geometry = (!segment.geometry.0.is_empty())
                .then(|| Geometry::new(Value::from(&segment.geometry)));

            let mut feature = Feature {
                bbox: None,
                geometry,
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("layer", layer);
            feature.set_property("seq", segment.position);
            feature.set_property("is_eol", segment.is_eol);
            feature.set_property("start_stop_name", segment.start_stop_name.as_str());
            feature.set_property("end_stop_name", segment.end_stop_name.as_str());
            feature.set_property("segment_name", segment.segment_name.as_str());
            feature.set_property("AverageOn", segment.ridership.boardings);
            feature.set_property("AverageOff", segment.ridership.alightings);
            feature.set_property("AverageLoad", segment.ridership.load);
            feature.set_property("distance_mi", segment.distance_mi);
            feature.set_property("runtime_sec", segment.runtime_secs);
            feature.set_property("speed", row.speed);
            feature.set_property("vehicle_hours", row.vehicle_hours);
            feature.set_property("productivity_on", row.productivity_on);
            feature.set_property("productivity_activity", row.productivity_activity);
            feature.set_property("productivity_load", row.productivity_load);
            feature
        })
        .collect()
}

pub fn write_geojson(path: &Path, features: Vec<Feature>) -> Result<(), OutputError> {
    let gj = GeoJson::FeatureCollection(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    });

    let mut file = create_file(path.to_path_buf())?;
    write!(file, "{}", serde_json::to_string_pretty(&gj)?)?;
    Ok(())
}

/// Writes `<name>.csv` and `<name>.geojson` into `dir`
pub fn write_report(dir: &Path, name: &str, report: &ProductivityReport) -> Result<(), OutputError> {
    let table = to_dataframe(&report.rows)?;
    write_csv(dir.join(format!("{name}.csv")), table)?;
    write_geojson(&dir.join(format!("{name}.geojson")), to_features(&report.rows, name))?;

    info!(target: "output", "Wrote {} segments to {:?}", report.rows.len(), dir.join(name));
    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    Polars(#[from] polars::error::PolarsError),
    IO(#[from] std::io::Error),
    Json(#[from] serde_json::Error),
}

impl Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            OutputError::Polars(err) => err,
            OutputError::IO(err) => err,
            OutputError::Json(err) => err,
        };
        write!(f, "{}", err)
    }
}
