use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{
    get_config_path, validate_config, Config, PurchaseConfig, StoreConfig, ThemeMode,
    DEFAULT_SEARCH_URL,
};
use crate::scoring::{BikeVariant, ScoringConfig};

/// Prompt user with a message and return their trimmed input.
pub(crate) fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
pub(crate) fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
pub(crate) fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn parse_bike_variant(input: &str) -> Option<BikeVariant> {
    match input.trim().to_lowercase().as_str() {
        "a" | "share" | "emissions_share" => Some(BikeVariant::EmissionsShare),
        "b" | "absolute" | "lifetime_co2" => Some(BikeVariant::LifetimeCo2),
        _ => None,
    }
}

fn parse_theme(input: &str) -> Option<ThemeMode> {
    match input.trim().to_lowercase().as_str() {
        "auto" => Some(ThemeMode::Auto),
        "dark" => Some(ThemeMode::Dark),
        "light" => Some(ThemeMode::Light),
        _ => None,
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("eco-catalog configuration");
    println!("=========================");
    println!();

    // 1. Backend
    println!("Products and accounts live in a Supabase project.");
    println!("Find the URL and anon key under Project Settings -> API.");
    let store = loop {
        let url = loop {
            let u = prompt("Project URL: ")?;
            if !u.is_empty() {
                break u;
            }
            println!("  Project URL is required.");
        };
        let anon_key = loop {
            let k = prompt("Anon key: ")?;
            if !k.is_empty() {
                break k;
            }
            println!("  Anon key is required.");
        };
        let store = StoreConfig { url, anon_key };
        let candidate = Config {
            store: store.clone(),
            scoring: None,
            purchase: None,
            theme: ThemeMode::Auto,
        };
        match validate_config(&candidate) {
            Ok(()) => break store,
            Err(errors) => {
                for error in errors {
                    println!("  Invalid: {}", error);
                }
                println!("  Try again.");
            }
        }
    };

    // 2. Bike formula
    println!();
    println!("Bikes can be scored two ways. Pick one for this deployment:");
    println!("  a) emissions_share -- lifetime fuel CO2 as % of 8000 kg (higher is worse)");
    println!("  b) lifetime_co2    -- lifetime CO2 in kg; 200 for electric, 9999 for bad mileage");
    let bike_variant = loop {
        let input = prompt_with_default("Bike formula", "a")?;
        match parse_bike_variant(&input) {
            Some(v) => break v,
            None => println!("  Invalid: enter a or b. Try again."),
        }
    };

    // 3. Purchase search
    println!();
    let search_url = loop {
        let input = prompt_with_default("Store to search for \"Buy From Others\"", DEFAULT_SEARCH_URL)?;
        match reqwest::Url::parse(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };
    let purchase = if search_url == DEFAULT_SEARCH_URL {
        None
    } else {
        Some(PurchaseConfig { search_url })
    };

    // 4. Theme
    let theme = loop {
        let input = prompt_with_default("Theme (auto/dark/light)", "auto")?;
        match parse_theme(&input) {
            Some(t) => break t,
            None => println!("  Invalid: enter auto, dark or light. Try again."),
        }
    };

    // 5. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 6. Write config
    let config = Config {
        store,
        scoring: Some(ScoringConfig { bike_variant }),
        purchase,
        theme,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `eco-catalog login` (or `eco-catalog signup`) to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bike_variant() {
        assert_eq!(parse_bike_variant("a"), Some(BikeVariant::EmissionsShare));
        assert_eq!(parse_bike_variant(" B "), Some(BikeVariant::LifetimeCo2));
        assert_eq!(parse_bike_variant("lifetime_co2"), Some(BikeVariant::LifetimeCo2));
        assert_eq!(parse_bike_variant("c"), None);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(parse_theme("Dark"), Some(ThemeMode::Dark));
        assert_eq!(parse_theme("auto"), Some(ThemeMode::Auto));
        assert_eq!(parse_theme("sepia"), None);
    }
}
