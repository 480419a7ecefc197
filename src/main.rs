pub mod bootstrap_config;
mod config;
mod jobs;

use crate::config::{load_config, ConfigError};
use crate::jobs::{run_jobs, run_network, JobError};
use bootstrap_config::BootstrapConfig;
use common::types::config::Config;
use common::util::logging;
use log::{error, info};
use polars::error::PolarsError;
use polars::prelude::IntoLazy;
use productivity::feed::Feed;
use productivity::pipeline::PipelineSettings;
use productivity::step3_ridership::{read_ridership_csv, RidershipError};
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "main", "{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), RidermapError> {
    let bootstrap_config = BootstrapConfig::read();

    logging::init(bootstrap_config.log_level.clone().into())?;

    let Config::Version1 { feed, ridership, output_dir, merge, columns, jobs, network } =
        load_config(&bootstrap_config)?;

    let (feed, ridership) = logging::run_with_spinner("main", "Loading feed and ridership", || {
        let feed = Feed::read(&feed)?.cached()?;
        let ridership = read_ridership_csv(&ridership)?.collect().map_err(RidershipError::from)?.lazy();
        Ok::<_, RidermapError>((feed, ridership))
    })?;

    let settings = PipelineSettings { merge, columns };

    if jobs.is_empty() && network.is_none() {
        info!(target: "main", "Nothing to do, the config has no jobs and no network");
        return Ok(());
    }

    // The network map is written even when single jobs fail
    let jobs_result = run_jobs(&jobs, &feed, &ridership, &settings, &output_dir);
    if let Some(network) = &network {
        run_network(network, &feed, &ridership, &settings, &output_dir)?;
    }
    jobs_result?;

    info!(target: "main", "Results written to {:?}", output_dir);
    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum RidermapError {
    Logging(#[from] log::SetLoggerError),
    Config(#[from] ConfigError),
    Polars(#[from] PolarsError),
    Ridership(#[from] RidershipError),
    Jobs(#[from] JobError),
}

impl Display for RidermapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let err: &dyn Display = match self {
            RidermapError::Logging(err) => err,
            RidermapError::Config(err) => err,
            RidermapError::Polars(err) => err,
            RidermapError::Ridership(err) => err,
            RidermapError::Jobs(err) => err,
        };
        let prefix = match self {
            RidermapError::Logging(_) => "Setting up logging",
            RidermapError::Config(_) => "Reading config file",
            RidermapError::Polars(_) => "Loading feed",
            RidermapError::Ridership(_) => "Loading ridership",
            RidermapError::Jobs(_) => "Running jobs",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
