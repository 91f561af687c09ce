use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an absent `dashboard.toml` still yields a
/// working dashboard that reproduces the original datasets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub datasets: DatasetSettings,
    pub training: TrainingSettings,
    /// Location of the declarative page list.
    pub navigation_file: Option<PathBuf>,
}

impl Config {
    /// Checks cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.addr()?;
        for (name, params) in self.datasets.iter() {
            if params.start > params.end {
                return Err(ConfigError::ValidationError(format!(
                    "datasets.{name}: start {} is after end {}",
                    params.start, params.end
                )));
            }
        }
        if !(0.0 < self.training.test_size && self.training.test_size < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "training.test_size must be strictly between 0 and 1, got {}",
                self.training.test_size
            )));
        }
        Ok(())
    }
}

/// Where the web server listens.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::ValidationError(format!("server.host is not an IP address: {}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Log verbosity and the optional rolling log file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// Directory for the daily rolling log file. `None` disables file logging.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: Some(PathBuf::from("logs")),
            file_prefix: "dealing.log".to_string(),
        }
    }
}

/// Parameters for one synthetic dataset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatasetParams {
    /// Seed for the pseudo-random generator. Same seed, same dataset.
    pub seed: u64,
    /// Number of rows to draw. Ignored by datasets built as a full Cartesian product.
    pub rows: usize,
    /// First calendar date (inclusive).
    pub start: NaiveDate,
    /// Last calendar date (inclusive).
    pub end: NaiveDate,
}

impl DatasetParams {
    fn new(seed: u64, rows: usize, start: (i32, u32, u32), end: (i32, u32, u32)) -> Self {
        let date = |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        Self {
            seed,
            rows,
            start: date(start),
            end: date(end),
        }
    }
}

/// One entry per page that fabricates data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub broker_flow: DatasetParams,
    pub best_brokers: DatasetParams,
    pub full_report: DatasetParams,
    pub counterparty_flows: DatasetParams,
    pub winning_trades: DatasetParams,
}

impl DatasetSettings {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DatasetParams)> {
        [
            ("broker_flow", &self.broker_flow),
            ("best_brokers", &self.best_brokers),
            ("full_report", &self.full_report),
            ("counterparty_flows", &self.counterparty_flows),
            ("winning_trades", &self.winning_trades),
        ]
        .into_iter()
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            broker_flow: DatasetParams::new(42, 0, (2024, 1, 1), (2024, 12, 31)),
            best_brokers: DatasetParams::new(123, 1000, (2024, 1, 1), (2024, 6, 30)),
            full_report: DatasetParams::new(123, 1000, (2020, 1, 1), (2024, 6, 30)),
            counterparty_flows: DatasetParams::new(123, 1000, (2020, 1, 1), (2024, 6, 30)),
            winning_trades: DatasetParams::new(7, 1000, (2024, 1, 1), (2024, 6, 30)),
        }
    }
}

/// Settings for the model-training page and the `ml-trainer` binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrainingSettings {
    /// CSV file with a `target` column.
    pub sample_path: PathBuf,
    /// Fraction of rows held out for scoring.
    pub test_size: f32,
    pub seed: u64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            sample_path: PathBuf::from("data/sample.csv"),
            test_size: 0.2,
            seed: 42,
        }
    }
}
