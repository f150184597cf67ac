use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::Category;
use crate::fetch::ScoredProduct;
use crate::scoring::{Direction, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with two decimals.
/// If incomplete is true, appends asterisk to indicate defaulted inputs
pub fn format_score(score: f64, incomplete: bool) -> String {
    // Avoid printing "-0.00"
    let score = if score == 0.0 { 0.0 } else { score };
    let formatted = format!("{:.2}", score);
    if incomplete {
        format!("{}*", formatted)
    } else {
        formatted
    }
}

/// Score cell text for a result, including the incomplete marker
pub fn format_result(result: &ScoreResult) -> String {
    format_score(result.score, result.incomplete())
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format products as a table with columns: Index, Score, Name
/// No headers. Index column: 3 chars (fits "99."), right-aligned.
/// Score column is right-aligned, 9 chars wide (fits "9999.00*").
pub fn format_product_table(products: &[ScoredProduct], use_colors: bool) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 9;
    let separator = "  ";
    let fixed_width = index_width + 1 + score_width + separator.len();

    products
        .iter()
        .enumerate()
        .map(|(idx, (product, result))| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!("{:>width$}", format_result(result), width = score_width);

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(product.display_name(), width - fixed_width)
                }
                Some(_) => truncate_name(product.display_name(), 20),
                None => product.display_name().to_string(),
            };

            if use_colors {
                let score_colored = if result.sentinel.is_some() {
                    score_padded.yellow().to_string()
                } else {
                    score_padded.bold().to_string()
                };
                format!("{} {}{}{}", index_str.dimmed(), score_colored, separator, name)
            } else {
                format!("{} {}{}{}", index_str, score_padded, separator, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Section heading for a category listing, noting how to read the score
pub fn format_heading(category: Category, direction: Option<Direction>, use_colors: bool) -> String {
    let suffix = direction
        .map(|d| format!(" ({})", d.describe()))
        .unwrap_or_default();
    if use_colors {
        format!("{}{}", category.heading().bold(), suffix.dimmed())
    } else {
        format!("{}{}", category.heading(), suffix)
    }
}

/// Format products as tab-separated values for scripting
/// Columns: category, id, score, name, defaulted fields (no headers, no colors).
/// The score stays a bare number; the fields that took a default are listed
/// comma-separated in the last column instead of the `*` marker.
pub fn format_tsv(products: &[ScoredProduct]) -> String {
    products
        .iter()
        .map(|(product, result)| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                product.category().table(),
                product.id.as_deref().unwrap_or(""),
                format_score(result.score, false),
                product.display_name().replace(['\t', '\n'], " "),
                result.defaulted.join(",")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line score breakdown for one product (for verbose mode)
pub fn format_product_detail(product: &ScoredProduct, use_colors: bool) -> String {
    let (record, result) = product;
    let mut lines = Vec::new();

    let name = record.display_name();
    if use_colors {
        lines.push(format!("{}", name.bold()));
    } else {
        lines.push(name.to_string());
    }

    lines.push(format!(
        "  Score: {} ({})",
        format_result(result),
        result.direction.describe()
    ));
    if let Some(sentinel) = result.sentinel {
        lines.push(format!("  Flag: {}", sentinel.describe()));
    }
    for factor in &result.breakdown {
        lines.push(format!(
            "  {}: {} = {:.2}",
            factor.label, factor.description, factor.value
        ));
    }
    if result.incomplete() {
        lines.push(format!("  Defaulted: {}", result.defaulted.join(", ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductRecord, Row};
    use crate::fetch::score_rows;
    use crate::scoring::{BikeVariant, ScoringConfig};
    use serde_json::json;

    fn scored(category: Category, value: serde_json::Value, scoring: &ScoringConfig) -> Vec<ScoredProduct> {
        let rows: Vec<Row> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect();
        score_rows(category, &rows, scoring)
    }

    #[test]
    fn test_format_score_two_decimals() {
        assert_eq!(format_score(85.0, false), "85.00");
        assert_eq!(format_score(55.05, false), "55.05");
        assert_eq!(format_score(36.09375, false), "36.09");
        assert_eq!(format_score(2887.5, false), "2887.50");
    }

    #[test]
    fn test_format_score_incomplete() {
        assert_eq!(format_score(72.5, true), "72.50*");
    }

    #[test]
    fn test_format_score_negative_zero() {
        assert_eq!(format_score(-0.0, false), "0.00");
    }

    #[test]
    fn test_format_score_negative() {
        assert_eq!(format_score(-12.5, false), "-12.50");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Galaxy S24", 20), "Galaxy S24");
        assert_eq!(truncate_name("Galaxy S24 Ultra 512GB", 10), "Galaxy ...");
        assert_eq!(truncate_name("Galaxy", 3), "Gal");
    }

    #[test]
    fn test_format_product_table_empty() {
        assert_eq!(format_product_table(&[], false), "No products found.");
    }

    #[test]
    fn test_format_product_table_rows() {
        let products = scored(
            Category::Car,
            json!([
                {"id": 1, "name": "Corolla", "production_emissions": 10000, "use_phase_emissions": 0, "lifetime_years": 1, "recycling_rate": 0},
                {"id": 2, "name": "Civic", "production_emissions": 25000}
            ]),
            &ScoringConfig::default(),
        );
        let table = format_product_table(&products, false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("80.00"));
        assert!(lines[0].contains("Corolla"));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[1].contains("50.00*"));
    }

    #[test]
    fn test_format_tsv_columns() {
        let products = scored(
            Category::AirConditioner,
            json!([
                {"id": "ac-1", "name": "Inverter\tX", "power_kw": 1.0, "hours_per_day": 8, "lifetime_years": 10},
                {"name": "Unnamed power"}
            ]),
            &ScoringConfig::default(),
        );
        let tsv = format_tsv(&products);
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.split('\t').count(), 5);
        }
        assert!(lines[0].starts_with("air_conditioners\tac-1\t"));
        assert!(lines[0].ends_with("Inverter X\t"));
        assert!(lines[1].starts_with("air_conditioners\t\t"));
    }

    #[test]
    fn test_format_tsv_lists_defaulted_fields() {
        let products = scored(
            Category::Mobile,
            json!([{"id": 3, "name": "Pixel", "body_material": "Glass"}]),
            &ScoringConfig::default(),
        );
        let (_, result) = &products[0];
        let tsv = format_tsv(&products);
        let columns: Vec<&str> = tsv.split('\t').collect();

        // Score column stays numeric; the marker moves to its own column
        assert!(!columns[2].ends_with('*'));
        assert!(columns[2].parse::<f64>().is_ok());
        assert_eq!(columns[4], result.defaulted.join(","));
        assert!(columns[4].contains("battery_type"));
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_product_detail() {
        let products = scored(
            Category::Mobile,
            json!([{ "name": "Pixel", "body_material": "Glass" }]),
            &ScoringConfig::default(),
        );
        let detail = format_product_detail(&products[0], false);
        assert!(detail.starts_with("Pixel"));
        assert!(detail.contains("higher is better"));
        assert!(detail.contains("Defaulted:"));
        assert!(detail.contains("battery_type"));
    }

    #[test]
    fn test_format_product_detail_sentinel() {
        let scoring = ScoringConfig {
            bike_variant: BikeVariant::LifetimeCo2,
        };
        let products = scored(
            Category::Bike,
            json!([{ "name": "E-Scooter", "engine_capacity_cc": 0, "fuel_tank_liters": 0 }]),
            &scoring,
        );
        let detail = format_product_detail(&products[0], false);
        assert!(detail.contains("Score: 200.00"));
        assert!(detail.contains("Flag: electric"));
    }

    #[test]
    fn test_format_heading() {
        let heading = format_heading(Category::Car, Some(Direction::HigherIsBetter), false);
        assert!(heading.ends_with("(higher is better)"));
        assert_eq!(
            format_heading(Category::Car, None, false),
            Category::Car.heading()
        );
    }

    #[test]
    fn test_unnamed_product_display() {
        let record = ProductRecord::from_row(Category::Car, &Row::new());
        assert_eq!(record.display_name(), "(unnamed)");
    }
}
