use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, LevelFilter, SetLoggerError};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static MULTI: OnceLock<MultiProgress> = OnceLock::new();

pub fn init(log_level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env() // Allow overriding log level through RUST_LOG env var
        .build();

    let multi = MULTI.get_or_init(MultiProgress::new).clone();

    LogWrapper::new(multi, logger).try_init()?;
    log::set_max_level(log_level);

    Ok(())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.white} [{elapsed:.green}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed:.green}] {msg} [{wide_bar:.cyan/blue}] {human_pos}/{human_len} [{eta}]")
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Registers a progress bar with the log bridge so that log lines don't tear it.
/// Without an initialized logger (e.g. in tests) the bar is simply drawn on its own.
fn attach(pb: ProgressBar) -> ProgressBar {
    match MULTI.get() {
        Some(multi) => multi.add(pb),
        None => pb,
    }
}

fn detach(pb: &ProgressBar) {
    pb.finish_and_clear();
    if let Some(multi) = MULTI.get() {
        multi.remove(pb);
    }
}

pub fn run_with_spinner<'a, F, Out>(
    target: &'a str, task_desc: &'a str, function: F,
) -> Out where
    F: FnOnce() -> Out,
{
    let start_time = Instant::now();

    let pb = attach(
        ProgressBar::new_spinner()
            .with_message(format!("{}...", task_desc))
            .with_style(spinner_style())
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let out = function();

    detach(&pb);
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}

pub fn run_with_pb<'a, F, Out>(
    target: &'a str, task_desc: &'a str, total: u64, function: F,
) -> Out where
    F: FnOnce(ProgressBar) -> Out,
{
    let start_time = Instant::now();

    let pb = attach(
        ProgressBar::new(total)
            .with_message(format!("{}...", task_desc))
            .with_style(bar_style())
    );
    pb.enable_steady_tick(Duration::from_secs(1));

    let out = function(pb.clone());

    detach(&pb);
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}
