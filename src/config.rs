use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "conversion-early-warning.toml";
pub const ENV_PREFIX: &str = "CONVERSION_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnoseConfig {
    pub detector: DetectorConfig,
    pub severity: SeverityConfig,
    pub cause: CauseConfig,
    pub defaults: MeasureDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// A day qualifies when its change is strictly below this percentage.
    pub drop_threshold_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    pub critical_cost: f64,
    pub high_drop_pct: f64,
    pub medium_drop_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CauseConfig {
    pub tracking_min_clicks: u64,
    pub tracking_max_conversions: u64,
    pub traffic_paused_ratio: f64,
}

/// Values used for optional measures when the column or the cell is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureDefaults {
    pub cost: f64,
    pub revenue: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            drop_threshold_pct: -20.0,
        }
    }
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            critical_cost: 500.0,
            high_drop_pct: -50.0,
            medium_drop_pct: -20.0,
        }
    }
}

impl Default for CauseConfig {
    fn default() -> Self {
        Self {
            tracking_min_clicks: 1000,
            tracking_max_conversions: 5,
            traffic_paused_ratio: 0.5,
        }
    }
}

impl Default for MeasureDefaults {
    fn default() -> Self {
        Self {
            cost: 0.0,
            revenue: 0.0,
        }
    }
}

impl DiagnoseConfig {
    /// Merges compiled defaults, the TOML file at `path` (skipped when absent)
    /// and `CONVERSION_`-prefixed environment variables, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment value cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::figment(path).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(DiagnoseConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
