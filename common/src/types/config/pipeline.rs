use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MergeSettings {
    #[serde(default = "default_true")]
    pub drop_duplicate_sequences: bool,
    #[serde(default)]
    pub retry: RetryStrategy,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self { drop_duplicate_sequences: true, retry: RetryStrategy::default() }
    }
}

fn default_true() -> bool {
    true
}

/// How ridership that found no segment on the stop id join gets a second chance
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    #[default]
    None,
    Sequence,
}

/// Column names of the APC ridership export
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RidershipColumns {
    pub line: String,
    pub direction: String,
    pub service: String,
    pub stop_id: String,
    pub boardings: String,
    pub alightings: String,
    pub sequence: String,
    pub load: String,
    pub stop_name: String,
}

impl Default for RidershipColumns {
    fn default() -> Self {
        Self {
            line: "LineAbbr".into(),
            direction: "Direction".into(),
            service: "Service".into(),
            stop_id: "StopId".into(),
            boardings: "AverageOn".into(),
            alightings: "AverageOff".into(),
            sequence: "Sequence".into(),
            load: "AverageLoad".into(),
            stop_name: "StopName".into(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(
    untagged,
    expecting = "Invalid bin definition. Specify either explicit positions with `edges: [0, 4, 10]` or an even width with `step: 4`"
)]
pub enum BinSpec {
    Edges { edges: Vec<usize> },
    Step { step: usize },
}
