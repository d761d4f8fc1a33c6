//! dietplan - Main Entry Point

use clap::{Parser, Subcommand};
use dietplan::api;
use dietplan::catalog;
use dietplan::config::DietConfig;
use dietplan::models::MealType;
use dietplan::observability::init_default_logging;
use dietplan::{DietService, MemoryStore, SystemClock};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Diet planning backend
#[derive(Parser)]
#[command(name = "dietplan")]
#[command(about = "Diet planning backend: calorie targets, weekly meal plans and shopping lists")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Print the recipe catalog
    Recipes {
        /// Only recipes of this meal type (e.g. breakfast, cena)
        #[arg(long, value_name = "TYPE")]
        meal_type: Option<MealType>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Config { show } => handle_config_command(&config, show),
        Commands::Recipes { meal_type } => print_recipes(meal_type),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<DietConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(DietConfig::load_from_file(path)?)
        }
        None => {
            let default_paths = ["dietplan.toml", "config/dietplan.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(DietConfig::load_from_file(&path)?);
                }
            }

            info!("No configuration file found, using defaults");
            Ok(DietConfig::from_env()?)
        }
    }
}

async fn serve(config: DietConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting dietplan v{}", env!("CARGO_PKG_VERSION"));

    let store = match &config.storage.path {
        Some(path) => MemoryStore::open(path).await?,
        None => {
            warn!("No storage.path configured, data is lost on restart");
            MemoryStore::new()
        }
    };

    let service = Arc::new(DietService::new(
        Arc::new(store),
        Arc::new(SystemClock),
        &config.planner,
    ));

    api::serve(service, config.bind_address()?, shutdown_signal()).await?;

    info!("Application shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down gracefully..."),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully..."),
    }
}

fn handle_config_command(
    config: &DietConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}

fn print_recipes(meal_type: Option<MealType>) -> Result<(), Box<dyn std::error::Error>> {
    let recipes: Vec<_> = match meal_type {
        Some(meal_type) => catalog::by_meal_type(meal_type).collect(),
        None => catalog::all().iter().collect(),
    };

    for recipe in recipes {
        println!(
            "{:>3}  {:<16} {:>4} kcal  P{:>3} C{:>3} F{:>3}  {:<10} {}",
            recipe.id,
            recipe.meal_type.as_str(),
            recipe.macros.calories,
            recipe.macros.protein,
            recipe.macros.carbs,
            recipe.macros.fat,
            recipe.supermarket.as_str(),
            recipe.name
        );
    }

    Ok(())
}
