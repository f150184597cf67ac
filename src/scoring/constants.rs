//! Named inputs to the sustainability formulas, grouped per category.
//!
//! Every fallback, weight and ceiling a formula uses lives here so each can be
//! audited (and tested) on its own.

/// Look up a categorical impact value. Matching is exact, as the catalog
/// tables spell these values consistently.
pub fn lookup_impact(table: &[(&str, f64)], key: &str) -> Option<f64> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub mod mobile {
    /// Body material impact (higher = better)
    pub const MATERIAL_IMPACT: &[(&str, f64)] = &[
        ("Plastic", 60.0), // high footprint, low recyclability
        ("Metal", 80.0),   // lower footprint, mining impact
        ("Glass", 90.0),   // recyclable, lower mining impact
    ];

    /// Battery chemistry impact (higher = better)
    pub const BATTERY_IMPACT: &[(&str, f64)] = &[
        ("Li-Ion", 70.0),
        ("NiMH", 85.0),
        ("Li-Poly", 60.0),
    ];

    /// Used for unrecognized materials and battery types
    pub const UNKNOWN_IMPACT: f64 = 50.0;

    pub const DEFAULT_BODY_WEIGHT: f64 = 0.0;
    pub const DEFAULT_ENERGY_CONSUMPTION: f64 = 50.0;
    pub const DEFAULT_RECYCLABILITY: f64 = 50.0;

    /// Weight and energy are subtracted from this before weighting
    pub const SCALE: f64 = 100.0;

    pub const WEIGHT_MATERIAL: f64 = 0.25;
    pub const WEIGHT_BATTERY: f64 = 0.30;
    pub const WEIGHT_BODY_WEIGHT: f64 = 0.15;
    pub const WEIGHT_ENERGY: f64 = 0.15;
    pub const WEIGHT_RECYCLABILITY: f64 = 0.15;
}

pub mod car {
    pub const DEFAULT_PRODUCTION_EMISSIONS: f64 = 0.0;
    pub const DEFAULT_USE_PHASE_EMISSIONS: f64 = 0.0;
    pub const DEFAULT_LIFETIME_YEARS: f64 = 1.0;
    pub const DEFAULT_RECYCLING_RATE: f64 = 0.0;

    /// Raw lifetime impact that maps to a score of zero
    pub const MAX_IMPACT: f64 = 50_000.0;
}

pub mod bike {
    /// kg CO2 per litre of petrol burned
    pub const CO2_PER_LITER: f64 = 2.31;

    pub const DEFAULT_FUEL_CONSUMPTION: f64 = 2.5; // L/100km
    pub const DEFAULT_LIFETIME_KM: f64 = 50_000.0;

    /// Lifetime kg CO2 that maps to 100 in the emissions-share variant
    pub const MAX_IMPACT: f64 = 8_000.0;
    pub const MAX_SCORE: f64 = 100.0;

    /// Fixed lifetime-CO2 score for bikes with no engine or no fuel tank
    pub const ELECTRIC_SENTINEL: f64 = 200.0;
    /// Lifetime-CO2 score for rows whose mileage is missing or not positive
    pub const INVALID_MILEAGE_SENTINEL: f64 = 9999.0;
}

pub mod air_conditioner {
    pub const DEFAULT_POWER_KW: f64 = 1.5;
    pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;
    pub const DEFAULT_LIFETIME_YEARS: f64 = 10.0;

    pub const DAYS_PER_YEAR: f64 = 365.0;
    /// Grid emission factor, kg CO2 per kWh
    pub const CO2_PER_KWH: f64 = 0.5;

    /// Lifetime kg CO2 that maps to a score of zero
    pub const MAX_IMPACT: f64 = 10_000.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_values() {
        assert_eq!(lookup_impact(mobile::MATERIAL_IMPACT, "Glass"), Some(90.0));
        assert_eq!(lookup_impact(mobile::BATTERY_IMPACT, "NiMH"), Some(85.0));
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(lookup_impact(mobile::MATERIAL_IMPACT, "glass"), None);
        assert_eq!(lookup_impact(mobile::BATTERY_IMPACT, "Wood"), None);
    }

    #[test]
    fn test_mobile_weights_sum_to_one() {
        let total = mobile::WEIGHT_MATERIAL
            + mobile::WEIGHT_BATTERY
            + mobile::WEIGHT_BODY_WEIGHT
            + mobile::WEIGHT_ENERGY
            + mobile::WEIGHT_RECYCLABILITY;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentinels_are_out_of_range() {
        assert!(bike::ELECTRIC_SENTINEL > bike::MAX_SCORE);
        assert!(bike::INVALID_MILEAGE_SENTINEL > bike::ELECTRIC_SENTINEL);
    }
}
