use log::LevelFilter;
use clap::Parser;

/// Settings that have to be known before the config file can be read
#[derive(Parser, Clone)]
#[command(version, about = "Segment-level ridership productivity for transit routes")]
pub struct BootstrapConfig {
    #[clap(short('c'), long("config"), env("RIDERMAP_CONFIG"), default_value_os = "ridermap.yml")]
    pub config_file: String,
    #[clap(short('l'), long("log-level"), env("RIDERMAP_LOG_LEVEL"), default_value_t, value_enum)]
    pub log_level: LogLevel,
}

impl BootstrapConfig {
    pub fn read() -> Self {
        BootstrapConfig::parse()
    }
}

#[derive(clap::ValueEnum, Clone, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}
