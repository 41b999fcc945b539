use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use validator::Validate;

use crate::components::Economics;
use crate::optimizer::SolverKind;
use crate::tariffs::Site;
use crate::telemetry::LogFormat;

pub const DEFAULT_CONFIG: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub run: RunConfig,
    #[serde(default)]
    pub site: Site,
    #[validate(nested)]
    pub finance: FinanceConfig,
    #[validate(nested)]
    pub prices: PricesConfig,
    pub inputs: InputsConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RunConfig {
    #[validate(range(min = 1))]
    pub time_steps: usize,
    /// Hours per time step
    #[validate(range(exclusive_min = 0.0))]
    pub step_hours: f64,
    /// Scales the modelled steps to a year of operation
    #[validate(range(exclusive_min = 0.0))]
    pub operation_weight: f64,
    #[serde(default)]
    pub solver: SolverKind,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FinanceConfig {
    #[validate(range(min = 0.0, max = 1.0))]
    pub interest_rate: f64,
    #[validate(range(min = 1))]
    pub lifetime_years: u32,
}

/// Default energy prices per kWh, overridden by a component's own prices
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PricesConfig {
    #[validate(range(min = 0.0))]
    pub gas: f64,
    #[validate(range(min = 0.0))]
    pub electricity: f64,
    #[validate(range(min = 0.0))]
    pub feed_in: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputsConfig {
    pub topology: PathBuf,
    pub models: PathBuf,
    #[serde(default)]
    pub prices: Option<PathBuf>,
    #[serde(default)]
    pub tariffs: Option<PathBuf>,
    pub profiles: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Load `path`, overridden by `BEMOPT__SECTION__KEY` environment variables
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(path))
                .merge(Env::prefixed("BEMOPT__").split("__")),
        )
        .with_context(|| format!("loading config {}", path.display()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn economics(&self) -> Economics {
        Economics {
            step_hours: self.run.step_hours,
            operation_weight: self.run.operation_weight,
            interest_rate: self.finance.interest_rate,
            lifetime_years: self.finance.lifetime_years,
            gas_price: self.prices.gas,
            electricity_price: self.prices.electricity,
            feed_in_price: self.prices.feed_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
[run]
time_steps = 24
step_hours = 1.0
operation_weight = 365.0
solver = "minilp"

[site]
state = "BY"
city = "Munich"
building_type = "residential"

[finance]
interest_rate = 0.03
lifetime_years = 20

[prices]
gas = 0.08
electricity = 0.30
feed_in = 0.08

[inputs]
topology = "data/sample/topology.csv"
models = "data/sample/models.csv"
profiles = "data/sample/profiles.csv"

[output]
dir = "out"
"#;

    #[test]
    fn test_parses_and_builds_economics() {
        let config = Config::from_figment(Figment::new().merge(Toml::string(TOML))).unwrap();
        assert_eq!(config.run.solver, SolverKind::Minilp);
        assert_eq!(config.inputs.tariffs, None);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.site.city, "Munich");

        let economics = config.economics();
        assert_eq!(economics.step_weight(), 365.0);
        assert_eq!(economics.gas_price, 0.08);
    }

    #[test]
    fn test_rejects_zero_time_steps() {
        let toml = TOML.replace("time_steps = 24", "time_steps = 0");
        assert!(Config::from_figment(Figment::new().merge(Toml::string(&toml))).is_err());
    }
}
