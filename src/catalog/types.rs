use std::fmt;

use super::decode;

/// One row as returned by the data store: column name to JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Category {
    #[value(alias = "mobiles", alias = "phone")]
    Mobile,
    #[value(alias = "cars")]
    Car,
    #[value(alias = "bikes")]
    Bike,
    #[value(name = "ac", alias = "air-conditioner", alias = "air-conditioners")]
    AirConditioner,
}

impl Category {
    /// Home screen order
    pub const ALL: [Category; 4] = [
        Category::Mobile,
        Category::Car,
        Category::Bike,
        Category::AirConditioner,
    ];

    /// Backend table holding this category's rows
    pub fn table(&self) -> &'static str {
        match self {
            Category::Mobile => "record",
            Category::Car => "cars",
            Category::Bike => "bikes",
            Category::AirConditioner => "air_conditioners",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Mobile => "Mobile",
            Category::Car => "Car",
            Category::Bike => "Bike",
            Category::AirConditioner => "Air Conditioner",
        }
    }

    /// Heading shown above the category's product list
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Mobile => "Mobile Specifications",
            Category::Car => "Car Sustainability Ratings",
            Category::Bike => "Bike Specifications",
            Category::AirConditioner => "AC Sustainability Ratings",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobileSpec {
    pub body_material: Option<String>,
    pub battery_type: Option<String>,
    pub body_weight: Option<f64>,
    pub energy_consumption: Option<f64>,
    pub recyclability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarSpec {
    pub production_emissions: Option<f64>,
    pub use_phase_emissions: Option<f64>,
    pub lifetime_years: Option<f64>,
    pub recycling_rate: Option<f64>, // fraction 0-1
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BikeSpec {
    pub fuel_consumption: Option<f64>, // L/100km
    pub lifetime_km: Option<f64>,
    pub engine_capacity_cc: Option<f64>,
    pub fuel_tank_liters: Option<f64>,
    pub mileage_kmpl: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirConditionerSpec {
    pub power_kw: Option<f64>,
    pub hours_per_day: Option<f64>,
    pub lifetime_years: Option<f64>,
}

/// Category-specific attributes. Each variant carries only the fields its
/// scoring formula reads.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductSpec {
    Mobile(MobileSpec),
    Car(CarSpec),
    Bike(BikeSpec),
    AirConditioner(AirConditionerSpec),
}

impl ProductSpec {
    pub fn category(&self) -> Category {
        match self {
            ProductSpec::Mobile(_) => Category::Mobile,
            ProductSpec::Car(_) => Category::Car,
            ProductSpec::Bike(_) => Category::Bike,
            ProductSpec::AirConditioner(_) => Category::AirConditioner,
        }
    }

    /// Decode the category's fields from a raw row
    pub fn from_row(category: Category, row: &Row) -> Self {
        let num = |key: &str| decode::number(row.get(key));
        match category {
            Category::Mobile => ProductSpec::Mobile(MobileSpec {
                body_material: decode::text(row.get("body_material")),
                battery_type: decode::text(row.get("battery_type")),
                body_weight: num("body_weight"),
                energy_consumption: num("energy_consumption"),
                recyclability: num("recyclability"),
            }),
            Category::Car => ProductSpec::Car(CarSpec {
                production_emissions: num("production_emissions"),
                use_phase_emissions: num("use_phase_emissions"),
                lifetime_years: num("lifetime_years"),
                recycling_rate: num("recycling_rate"),
            }),
            Category::Bike => ProductSpec::Bike(BikeSpec {
                fuel_consumption: num("fuel_consumption"),
                lifetime_km: num("lifetime_km"),
                engine_capacity_cc: num("engine_capacity_cc"),
                fuel_tank_liters: num("fuel_tank_liters"),
                mileage_kmpl: num("mileage_kmpl"),
            }),
            Category::AirConditioner => ProductSpec::AirConditioner(AirConditionerSpec {
                power_kw: num("power_kw"),
                hours_per_day: num("hours_per_day"),
                lifetime_years: num("lifetime_years"),
            }),
        }
    }
}

/// A catalog item fetched from one category table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub spec: ProductSpec,
}

impl ProductRecord {
    pub fn from_row(category: Category, row: &Row) -> Self {
        Self {
            id: decode::identifier(row.get("id")),
            name: decode::text(row.get("name")),
            image_url: decode::text(row.get("image_url")),
            spec: ProductSpec::from_row(category, row),
        }
    }

    pub fn category(&self) -> Category {
        self.spec.category()
    }

    /// Name for display, falling back to a placeholder for unnamed rows
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_tables() {
        assert_eq!(Category::Mobile.table(), "record");
        assert_eq!(Category::Car.table(), "cars");
        assert_eq!(Category::Bike.table(), "bikes");
        assert_eq!(Category::AirConditioner.table(), "air_conditioners");
    }

    #[test]
    fn test_mobile_from_row() {
        let r = row(json!({
            "id": 3,
            "name": "Pixel 8",
            "image_url": "https://example.com/p8.png",
            "body_material": "Glass",
            "battery_type": "Li-Ion",
            "body_weight": "187g",
            "energy_consumption": 4,
            "recyclability": null
        }));
        let record = ProductRecord::from_row(Category::Mobile, &r);
        assert_eq!(record.id.as_deref(), Some("3"));
        assert_eq!(record.display_name(), "Pixel 8");
        assert_eq!(record.category(), Category::Mobile);
        assert_eq!(
            record.spec,
            ProductSpec::Mobile(MobileSpec {
                body_material: Some("Glass".to_string()),
                battery_type: Some("Li-Ion".to_string()),
                body_weight: Some(187.0),
                energy_consumption: Some(4.0),
                recyclability: None,
            })
        );
    }

    #[test]
    fn test_bike_from_row_keeps_zero() {
        let r = row(json!({ "engine_capacity_cc": 0, "mileage_kmpl": "45" }));
        let record = ProductRecord::from_row(Category::Bike, &r);
        match record.spec {
            ProductSpec::Bike(spec) => {
                assert_eq!(spec.engine_capacity_cc, Some(0.0));
                assert_eq!(spec.mileage_kmpl, Some(45.0));
                assert_eq!(spec.fuel_tank_liters, None);
            }
            other => panic!("expected bike spec, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_row_decodes_to_all_missing() {
        let record = ProductRecord::from_row(Category::AirConditioner, &Row::new());
        assert!(record.id.is_none());
        assert_eq!(record.display_name(), "(unnamed)");
        assert_eq!(
            record.spec,
            ProductSpec::AirConditioner(AirConditionerSpec::default())
        );
    }

    #[test]
    fn test_category_value_enum_aliases() {
        use clap::ValueEnum;
        assert_eq!(Category::from_str("ac", true).unwrap(), Category::AirConditioner);
        assert_eq!(Category::from_str("cars", true).unwrap(), Category::Car);
        assert_eq!(Category::from_str("mobile", true).unwrap(), Category::Mobile);
        assert!(Category::from_str("boat", true).is_err());
    }
}
