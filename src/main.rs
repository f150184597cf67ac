use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use eco_catalog::catalog::Category;
use eco_catalog::credentials::{AuthClient, CredentialError};
use eco_catalog::fetch::ScoredProduct;
use eco_catalog::scoring::ScoringConfig;
use eco_catalog::store::{StoreClient, StoreError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse categories in the interactive UI (default if no subcommand)
    Browse {
        /// Order each list best-first instead of store order
        #[arg(long)]
        sort: bool,
    },
    /// Print a category's products with their scores
    List {
        /// Category to list (mobile, car, bike, ac)
        #[arg(value_enum, required_unless_present = "all")]
        category: Option<Category>,
        /// List every category, fetched concurrently
        #[arg(long, conflicts_with = "category")]
        all: bool,
        /// Order best-first instead of store order
        #[arg(long)]
        sort: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Search for a product at the configured store, by its list index
    Open {
        #[arg(value_enum)]
        category: Category,
        /// Index number of the product (1-based, as shown in list)
        index: usize,
        /// Use the best-first order (match `list --sort`)
        #[arg(long)]
        sort: bool,
    },
    /// Sign in and store the session
    Login,
    /// Create an account
    Signup,
    /// Sign out and remove the stored session
    Logout,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "eco-catalog")]
#[command(about = "Product catalog browser with sustainability scores", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/eco-catalog/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Exit code for a failed login/session step
fn auth_exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<CredentialError>() {
        Some(CredentialError::Unavailable(_)) => EXIT_NETWORK,
        _ => EXIT_AUTH,
    }
}

/// Fetch one category; a rejected token triggers one re-authentication.
async fn fetch_category(
    client: &mut StoreClient,
    auth: &AuthClient,
    session_path: &Path,
    category: Category,
    scoring: &ScoringConfig,
    verbose: bool,
) -> Vec<ScoredProduct> {
    let mut reauthenticated = false;
    loop {
        match eco_catalog::fetch::fetch_and_score(client, category, scoring, verbose).await {
            Ok(products) => return products,
            Err(e) => handle_unauthorized(client, auth, session_path, &e, &mut reauthenticated, verbose).await,
        }
    }
}

async fn fetch_every_category(
    client: &mut StoreClient,
    auth: &AuthClient,
    session_path: &Path,
    scoring: &ScoringConfig,
    verbose: bool,
) -> Vec<(Category, Vec<ScoredProduct>)> {
    let mut reauthenticated = false;
    loop {
        match eco_catalog::fetch::fetch_all(client, scoring, verbose).await {
            Ok(sections) => return sections,
            Err(e) => handle_unauthorized(client, auth, session_path, &e, &mut reauthenticated, verbose).await,
        }
    }
}

/// Re-authenticate once after a rejected token; exits on a second rejection.
async fn handle_unauthorized(
    client: &mut StoreClient,
    auth: &AuthClient,
    session_path: &Path,
    error: &StoreError,
    reauthenticated: &mut bool,
    verbose: bool,
) {
    if *reauthenticated {
        eprintln!("Credential error: {}", error);
        std::process::exit(EXIT_AUTH);
    }
    match eco_catalog::credentials::reauthenticate(auth, session_path, verbose).await {
        Ok(token) => {
            *client = client.with_access_token(&token);
            *reauthenticated = true;
        }
        Err(e) => {
            eprintln!("Credential error: {:#}", e);
            std::process::exit(auth_exit_code(&e));
        }
    }
}

fn print_products(products: &[ScoredProduct], verbose: bool, use_colors: bool) {
    if verbose && !products.is_empty() {
        // Verbose mode: per-product breakdown
        for product in products {
            println!(
                "{}",
                eco_catalog::output::format_product_detail(product, use_colors)
            );
            println!();
        }
    } else {
        println!(
            "{}",
            eco_catalog::output::format_product_table(products, use_colors)
        );
    }
}

#[tokio::main]
async fn main() {
    eco_catalog::install_crypto_provider();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse { sort: false });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = eco_catalog::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match eco_catalog::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = eco_catalog::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let scoring = config.effective_scoring();
    if cli.verbose {
        eprintln!("Store: {}", config.store.url);
        eprintln!("Bike formula: {}", scoring.bike_variant);
    }

    let http = match eco_catalog::store::create_http_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };
    let auth = AuthClient::new(http.clone(), &config.store);
    let session_path = eco_catalog::credentials::get_session_path();

    // Session management commands don't need a data client
    let session_result = match &command {
        Commands::Login => Some(
            eco_catalog::credentials::login(&auth, &session_path)
                .await
                .map(|_| ()),
        ),
        Commands::Signup => Some(
            eco_catalog::credentials::signup(&auth, &session_path)
                .await
                .map(|_| ()),
        ),
        Commands::Logout => Some(
            eco_catalog::credentials::logout(&auth, &session_path, cli.verbose).await,
        ),
        _ => None,
    };
    if let Some(result) = session_result {
        if let Err(e) = result {
            eprintln!("Credential error: {:#}", e);
            std::process::exit(auth_exit_code(&e));
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let token = match eco_catalog::credentials::ensure_session(&auth, &session_path, cli.verbose).await {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Credential error: {:#}", e);
            std::process::exit(auth_exit_code(&e));
        }
    };
    let mut client = StoreClient::new(http, &config.store, &token);

    let use_colors = eco_catalog::output::should_use_colors();

    match command {
        Commands::Browse { sort } => {
            let theme = eco_catalog::tui::resolve_theme(config.theme);
            let app = eco_catalog::tui::App::new(&config, theme, sort, cli.verbose);
            if let Err(e) = eco_catalog::tui::run_tui(app, client, auth, session_path).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_NETWORK);
            }
        }
        Commands::List {
            category,
            all,
            sort,
            format,
        } => {
            let mut sections = match category {
                Some(category) if !all => vec![(
                    category,
                    fetch_category(&mut client, &auth, &session_path, category, &scoring, cli.verbose)
                        .await,
                )],
                _ => fetch_every_category(&mut client, &auth, &session_path, &scoring, cli.verbose).await,
            };

            if sort {
                for (_, products) in sections.iter_mut() {
                    eco_catalog::fetch::rank_products(products);
                }
            }

            match format {
                OutputFormat::Tsv => {
                    let lines: Vec<String> = sections
                        .iter()
                        .map(|(_, products)| eco_catalog::output::format_tsv(products))
                        .filter(|s| !s.is_empty())
                        .collect();
                    if !lines.is_empty() {
                        println!("{}", lines.join("\n"));
                    }
                }
                OutputFormat::Table => {
                    let multiple = sections.len() > 1;
                    for (i, (category, products)) in sections.iter().enumerate() {
                        if multiple {
                            if i > 0 {
                                println!();
                            }
                            let direction = products.first().map(|(_, r)| r.direction);
                            println!(
                                "{}",
                                eco_catalog::output::format_heading(*category, direction, use_colors)
                            );
                        }
                        print_products(products, cli.verbose, use_colors);
                    }
                }
            }

            if cli.verbose {
                let total: usize = sections.iter().map(|(_, p)| p.len()).sum();
                eprintln!();
                eprintln!("Total: {} products in {:?}", total, start_time.elapsed());
            }
        }
        Commands::Open {
            category,
            index,
            sort,
        } => {
            let mut products =
                fetch_category(&mut client, &auth, &session_path, category, &scoring, cli.verbose).await;
            if sort {
                eco_catalog::fetch::rank_products(&mut products);
            }

            // Validate index bounds (1-based)
            if index < 1 || index > products.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    products.len()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let (product, _result) = &products[index - 1];
            let url = match eco_catalog::browser::purchase_url(config.search_url(), product.display_name()) {
                Ok(url) => url,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            if let Err(e) = eco_catalog::browser::open_url(&url) {
                eprintln!("Failed to open browser: {:#}", e);
                std::process::exit(EXIT_NETWORK);
            }

            println!("Searching for {} in browser: {}", product.display_name(), url);
        }
        Commands::Login | Commands::Signup | Commands::Logout | Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
