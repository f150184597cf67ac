use serde::{Deserialize, Serialize};
use std::fmt;

/// Which bike formula a deployment runs.
///
/// The two are not interchangeable: `EmissionsShare` reports lifetime CO2 as
/// a percentage of a fixed ceiling (higher = worse), `LifetimeCo2` reports
/// absolute kilograms with fixed sentinels for electric bikes and bad mileage
/// data (lower = better).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BikeVariant {
    #[default]
    EmissionsShare,
    LifetimeCo2,
}

impl fmt::Display for BikeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BikeVariant::EmissionsShare => f.write_str("emissions_share"),
            BikeVariant::LifetimeCo2 => f.write_str("lifetime_co2"),
        }
    }
}

/// Scoring configuration.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   bike_variant: lifetime_co2
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Bike formula in use (default: emissions_share)
    #[serde(default)]
    pub bike_variant: BikeVariant,
}
