use common::types::config::pipeline::BinSpec;
use common::types::config::{Job, NetworkJob};
use common::types::DirectionId;
use common::util::logging::run_with_pb;
use log::{error, info, warn};
use polars::prelude::LazyFrame;
use productivity::feed::Feed;
use productivity::output::{to_features, write_geojson, write_report, OutputError};
use productivity::pipeline::{aggregate_productivity, PipelineError, PipelineSettings, ProductivityRequest};
use std::fmt;
use std::fmt::Display;
use std::path::Path;

/// Runs every job and writes `<route>_<direction>.csv` / `.geojson` for each. A failing job is
/// logged and skipped, the error only reports how many failed.
pub(super) fn run_jobs(
    jobs: &[Job],
    feed: &Feed,
    ridership: &LazyFrame,
    settings: &PipelineSettings,
    output_dir: &Path,
) -> Result<(), JobError> {
    let failed = run_with_pb("jobs", "Computing route productivity", jobs.len() as u64, |pb| {
        let mut failed = 0;

        for job in jobs {
            let request = ProductivityRequest {
                route_label: job.route.clone(),
                direction: DirectionId(job.direction),
                service_type: job.service_type.clone(),
                bins: job.bins.clone(),
            };
            let name = format!("route_{}_{}", job.route, job.direction);

            let result = aggregate_productivity(feed, ridership.clone(), &request, settings)
                .map_err(JobError::from)
                .and_then(|report| Ok(write_report(output_dir, &name, &report)?));

            if let Err(err) = result {
                error!(target: "jobs", "Route {} direction {} failed: {}", job.route, job.direction, err);
                failed += 1;
            }
            pb.inc(1);
        }

        failed
    });

    match failed {
        0 => Ok(()),
        failed => Err(JobError::JobsFailed(failed)),
    }
}

/// Evenly binned productivity for many routes in one GeoJSON, one layer per route and
/// direction. Routes that can't be computed are left out of the map.
pub(super) fn run_network(
    network: &NetworkJob,
    feed: &Feed,
    ridership: &LazyFrame,
    settings: &PipelineSettings,
    output_dir: &Path,
) -> Result<(), JobError> {
    let total = (network.routes.len() * network.directions.len()) as u64;

    let features = run_with_pb("network", "Computing network productivity", total, |pb| {
        let mut features = vec![];

        for route in &network.routes {
            for &direction in &network.directions {
                let request = ProductivityRequest {
                    route_label: route.clone(),
                    direction: DirectionId(direction),
                    service_type: network.service_type.clone(),
                    bins: Some(BinSpec::Step { step: network.step }),
                };

                match aggregate_productivity(feed, ridership.clone(), &request, settings) {
                    Ok(report) => {
                        let layer = format!("Route {route} Direction {direction}");
                        features.extend(to_features(&report.rows, &layer));
                    }
                    Err(err) => warn!(target: "network", "Skipping route {route} direction {direction}: {err}"),
                }
                pb.inc(1);
            }
        }

        features
    });

    info!(target: "network", "Network map has {} segments", features.len());
    write_geojson(&output_dir.join(&network.file_name), features)?;

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum JobError {
    Pipeline(#[from] PipelineError),
    Output(#[from] OutputError),
    JobsFailed(usize),
}

impl Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobError::Pipeline(err) => write!(f, "{}", err),
            JobError::Output(err) => write!(f, "Writing results: {}", err),
            JobError::JobsFailed(count) => write!(f, "{} job(s) failed, see the log for details", count),
        }
    }
}
