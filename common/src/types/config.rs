use serde::Deserialize;
use std::path::PathBuf;
use crate::types::config::pipeline::{BinSpec, MergeSettings, RidershipColumns};

pub mod pipeline;

#[derive(Debug, Deserialize)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1")]
    Version1 {
        feed: FeedSource,
        ridership: PathBuf,
        #[serde(default = "default_output_dir")]
        output_dir: PathBuf,
        #[serde(default)]
        merge: MergeSettings,
        #[serde(default)]
        columns: RidershipColumns,
        #[serde(default)]
        jobs: Vec<Job>,
        network: Option<NetworkJob>,
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data/out")
}

/// Tables exported from a GTFS feed that was built for a single day type
#[derive(Debug, Deserialize, Clone)]
pub struct FeedSource {
    pub routes: PathBuf,
    pub segments: PathBuf,
    pub frequencies: PathBuf,
    /// Hour boundaries of the aggregation windows the feed was built with
    pub time_windows: Vec<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Job {
    pub route: String,
    pub direction: u8,
    #[serde(default = "default_service_type")]
    pub service_type: Option<String>,
    pub bins: Option<BinSpec>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkJob {
    pub routes: Vec<String>,
    #[serde(default = "default_directions")]
    pub directions: Vec<u8>,
    pub step: usize,
    #[serde(default = "default_service_type")]
    pub service_type: Option<String>,
    #[serde(default = "default_layer_file")]
    pub file_name: String,
}

fn default_service_type() -> Option<String> {
    Some("Weekday".into())
}

fn default_directions() -> Vec<u8> {
    vec![1, 0]
}

fn default_layer_file() -> String {
    "network.geojson".into()
}
