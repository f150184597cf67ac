use super::config::{BikeVariant, ScoringConfig};
use super::constants::{air_conditioner, bike, car, lookup_impact, mobile};
use crate::catalog::{AirConditionerSpec, BikeSpec, CarSpec, MobileSpec, ProductRecord, ProductSpec};

/// Which way a score should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    pub fn describe(&self) -> &'static str {
        match self {
            Direction::HigherIsBetter => "higher is better",
            Direction::LowerIsBetter => "lower is better",
        }
    }
}

/// Fixed scores that flag a special case rather than a computed magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    Electric,
    InvalidMileage,
}

impl Sentinel {
    pub fn describe(&self) -> &'static str {
        match self {
            Sentinel::Electric => "electric (no engine or fuel tank)",
            Sentinel::InvalidMileage => "invalid mileage data",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Material", "Use phase"
    pub description: String, // e.g. "Glass -> 90 x0.25"
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    pub direction: Direction,
    pub sentinel: Option<Sentinel>,
    /// Fields that were missing or unreadable and fell back to a default
    pub defaulted: Vec<&'static str>,
    pub breakdown: Vec<FactorContribution>,
}

impl ScoreResult {
    /// True when any input fell back to a default value
    pub fn incomplete(&self) -> bool {
        !self.defaulted.is_empty()
    }
}

/// Tracks which inputs had to be substituted while a formula runs.
#[derive(Default)]
struct Inputs {
    defaulted: Vec<&'static str>,
    breakdown: Vec<FactorContribution>,
}

impl Inputs {
    fn number(&mut self, field: &'static str, value: Option<f64>, default: f64) -> f64 {
        match value {
            Some(v) => v,
            None => {
                self.defaulted.push(field);
                default
            }
        }
    }

    fn impact(&mut self, field: &'static str, value: Option<&str>, table: &[(&str, f64)]) -> f64 {
        match value.and_then(|v| lookup_impact(table, v)) {
            Some(v) => v,
            None => {
                self.defaulted.push(field);
                mobile::UNKNOWN_IMPACT
            }
        }
    }

    fn factor(&mut self, label: &str, description: String, value: f64) {
        self.breakdown.push(FactorContribution {
            label: label.to_string(),
            description,
            value,
        });
    }

    fn finish(self, score: f64, direction: Direction, sentinel: Option<Sentinel>) -> ScoreResult {
        ScoreResult {
            score,
            direction,
            sentinel,
            defaulted: self.defaulted,
            breakdown: self.breakdown,
        }
    }
}

/// Score a record with its category's formula.
pub fn calculate_score(record: &ProductRecord, config: &ScoringConfig) -> ScoreResult {
    match &record.spec {
        ProductSpec::Mobile(spec) => score_mobile(spec),
        ProductSpec::Car(spec) => score_car(spec),
        ProductSpec::Bike(spec) => score_bike(spec, config.bike_variant),
        ProductSpec::AirConditioner(spec) => score_air_conditioner(spec),
    }
}

/// Weighted sum of material, battery, weight, energy and recyclability.
/// Higher is better. Not clamped.
pub fn score_mobile(spec: &MobileSpec) -> ScoreResult {
    let mut inputs = Inputs::default();

    let material = inputs.impact(
        "body_material",
        spec.body_material.as_deref(),
        mobile::MATERIAL_IMPACT,
    );
    let battery = inputs.impact(
        "battery_type",
        spec.battery_type.as_deref(),
        mobile::BATTERY_IMPACT,
    );
    let weight = inputs.number("body_weight", spec.body_weight, mobile::DEFAULT_BODY_WEIGHT);
    let energy = inputs.number(
        "energy_consumption",
        spec.energy_consumption,
        mobile::DEFAULT_ENERGY_CONSUMPTION,
    );
    let recyclability = inputs.number(
        "recyclability",
        spec.recyclability,
        mobile::DEFAULT_RECYCLABILITY,
    );

    let terms = [
        (
            "Material",
            format!(
                "{} -> {} x{}",
                spec.body_material.as_deref().unwrap_or("unknown"),
                material,
                mobile::WEIGHT_MATERIAL
            ),
            material * mobile::WEIGHT_MATERIAL,
        ),
        (
            "Battery",
            format!(
                "{} -> {} x{}",
                spec.battery_type.as_deref().unwrap_or("unknown"),
                battery,
                mobile::WEIGHT_BATTERY
            ),
            battery * mobile::WEIGHT_BATTERY,
        ),
        (
            "Body weight",
            format!("({} - {}) x{}", mobile::SCALE, weight, mobile::WEIGHT_BODY_WEIGHT),
            (mobile::SCALE - weight) * mobile::WEIGHT_BODY_WEIGHT,
        ),
        (
            "Energy",
            format!("({} - {}) x{}", mobile::SCALE, energy, mobile::WEIGHT_ENERGY),
            (mobile::SCALE - energy) * mobile::WEIGHT_ENERGY,
        ),
        (
            "Recyclability",
            format!("{} x{}", recyclability, mobile::WEIGHT_RECYCLABILITY),
            recyclability * mobile::WEIGHT_RECYCLABILITY,
        ),
    ];

    let mut score = 0.0;
    for (label, description, value) in terms {
        score += value;
        inputs.factor(label, description, value);
    }

    inputs.finish(score, Direction::HigherIsBetter, None)
}

/// Lifetime emissions net of recycling, inverted onto a 0-100 scale.
pub fn score_car(spec: &CarSpec) -> ScoreResult {
    let mut inputs = Inputs::default();

    let production = inputs.number(
        "production_emissions",
        spec.production_emissions,
        car::DEFAULT_PRODUCTION_EMISSIONS,
    );
    let use_phase_per_year = inputs.number(
        "use_phase_emissions",
        spec.use_phase_emissions,
        car::DEFAULT_USE_PHASE_EMISSIONS,
    );
    let years = inputs.number("lifetime_years", spec.lifetime_years, car::DEFAULT_LIFETIME_YEARS);
    let recycling_rate = inputs.number(
        "recycling_rate",
        spec.recycling_rate,
        car::DEFAULT_RECYCLING_RATE,
    );

    let use_phase = use_phase_per_year * years;
    let raw = (production + use_phase) * (1.0 - recycling_rate);
    let score = (100.0 - (raw / car::MAX_IMPACT) * 100.0).max(0.0);

    inputs.factor("Production", format!("{} kg CO2", production), production);
    inputs.factor(
        "Use phase",
        format!("{} kg CO2/yr x {} yr", use_phase_per_year, years),
        use_phase,
    );
    inputs.factor(
        "Recycling",
        format!("rate {} -> x{}", recycling_rate, 1.0 - recycling_rate),
        raw,
    );
    inputs.factor(
        "Normalized",
        format!("100 - {} / {} x 100, floored at 0", raw, car::MAX_IMPACT),
        score,
    );

    inputs.finish(score, Direction::HigherIsBetter, None)
}

pub fn score_bike(spec: &BikeSpec, variant: BikeVariant) -> ScoreResult {
    match variant {
        BikeVariant::EmissionsShare => score_bike_emissions_share(spec),
        BikeVariant::LifetimeCo2 => score_bike_lifetime_co2(spec),
    }
}

/// Lifetime fuel CO2 as a percentage of a fixed ceiling, capped at 100.
/// Higher is worse.
pub fn score_bike_emissions_share(spec: &BikeSpec) -> ScoreResult {
    let mut inputs = Inputs::default();

    let consumption = inputs.number(
        "fuel_consumption",
        spec.fuel_consumption,
        bike::DEFAULT_FUEL_CONSUMPTION,
    );
    let lifetime_km = inputs.number("lifetime_km", spec.lifetime_km, bike::DEFAULT_LIFETIME_KM);

    let co2_per_km = consumption * bike::CO2_PER_LITER / 100.0;
    let total_co2 = co2_per_km * lifetime_km;
    let score = (total_co2 / bike::MAX_IMPACT * 100.0).min(bike::MAX_SCORE);

    inputs.factor(
        "CO2 per km",
        format!("{} L/100km x {} kg/L", consumption, bike::CO2_PER_LITER),
        co2_per_km,
    );
    inputs.factor(
        "Lifetime CO2",
        format!("x {} km", lifetime_km),
        total_co2,
    );
    inputs.factor(
        "Share of ceiling",
        format!("{} / {} x 100, capped at {}", total_co2, bike::MAX_IMPACT, bike::MAX_SCORE),
        score,
    );

    inputs.finish(score, Direction::LowerIsBetter, None)
}

/// Lifetime CO2 in kg from mileage. Electric bikes and rows with unusable
/// mileage get fixed sentinel scores instead. Lower is better.
pub fn score_bike_lifetime_co2(spec: &BikeSpec) -> ScoreResult {
    let mut inputs = Inputs::default();

    let electric = spec.engine_capacity_cc == Some(0.0) || spec.fuel_tank_liters == Some(0.0);
    if electric {
        inputs.factor(
            "Electric",
            "no engine capacity or fuel tank".to_string(),
            bike::ELECTRIC_SENTINEL,
        );
        return inputs.finish(
            bike::ELECTRIC_SENTINEL,
            Direction::LowerIsBetter,
            Some(Sentinel::Electric),
        );
    }

    let mileage = match spec.mileage_kmpl {
        Some(m) if m > 0.0 => m,
        _ => {
            inputs.defaulted.push("mileage_kmpl");
            inputs.factor(
                "Invalid mileage",
                "mileage missing or not positive".to_string(),
                bike::INVALID_MILEAGE_SENTINEL,
            );
            return inputs.finish(
                bike::INVALID_MILEAGE_SENTINEL,
                Direction::LowerIsBetter,
                Some(Sentinel::InvalidMileage),
            );
        }
    };

    let lifetime_km = inputs.number("lifetime_km", spec.lifetime_km, bike::DEFAULT_LIFETIME_KM);
    let litres = lifetime_km / mileage;
    let score = litres * bike::CO2_PER_LITER;

    inputs.factor(
        "Fuel burned",
        format!("{} km / {} km/L", lifetime_km, mileage),
        litres,
    );
    inputs.factor(
        "Lifetime CO2",
        format!("x {} kg/L", bike::CO2_PER_LITER),
        score,
    );

    inputs.finish(score, Direction::LowerIsBetter, None)
}

/// Lifetime electricity emissions inverted onto a 0-100 scale.
pub fn score_air_conditioner(spec: &AirConditionerSpec) -> ScoreResult {
    let mut inputs = Inputs::default();

    let power = inputs.number("power_kw", spec.power_kw, air_conditioner::DEFAULT_POWER_KW);
    let hours = inputs.number(
        "hours_per_day",
        spec.hours_per_day,
        air_conditioner::DEFAULT_HOURS_PER_DAY,
    );
    let years = inputs.number(
        "lifetime_years",
        spec.lifetime_years,
        air_conditioner::DEFAULT_LIFETIME_YEARS,
    );

    let total_kwh = power * hours * air_conditioner::DAYS_PER_YEAR * years;
    let total_co2 = total_kwh * air_conditioner::CO2_PER_KWH;
    let score = (100.0 - (total_co2 / air_conditioner::MAX_IMPACT) * 100.0).max(0.0);

    inputs.factor(
        "Energy",
        format!(
            "{} kW x {} h/day x {} days x {} yr",
            power,
            hours,
            air_conditioner::DAYS_PER_YEAR,
            years
        ),
        total_kwh,
    );
    inputs.factor(
        "Lifetime CO2",
        format!("x {} kg/kWh", air_conditioner::CO2_PER_KWH),
        total_co2,
    );
    inputs.factor(
        "Normalized",
        format!(
            "100 - {} / {} x 100, floored at 0",
            total_co2,
            air_conditioner::MAX_IMPACT
        ),
        score,
    );

    inputs.finish(score, Direction::HigherIsBetter, None)
}
