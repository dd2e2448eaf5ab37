mod api_routes;
mod api_state;
mod models;
mod repo;
mod service;
mod utils;

use crate::models::api::{QueryMode, QueryParams};
use crate::models::config::{parse_level_filter, setup_config, Config};
use crate::repo::sqlite::SqliteRepo;
use crate::service::log_query::LogQuery;
use crate::utils::db_logger::init_service_logger;
use crate::utils::log_handler::LogHandler;
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::sync::Arc;

#[macro_use]
extern crate rocket;

use api_state::AppState;

fn build_rocket(config: &Config, app_state: AppState) -> rocket::Rocket<rocket::Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port));

    rocket::custom(figment).manage(app_state).mount(
        "/api",
        routes![api_routes::get_log_data, api_routes::health_check],
    )
}

#[rocket::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Strip any surrounding quotes from config file path
    let config_file_path = args
        .config_file
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();

    // The logger needs the config, so a load failure is reported once it is up
    let (config, config_error) = match setup_config(config_file_path.clone()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_level = args
        .log_level
        .as_deref()
        .map(parse_level_filter)
        .unwrap_or_else(|| config.log_level_filter());

    let handler = Arc::new(LogHandler::new(config.tail_buffer_size));
    let error_log_sink = init_service_logger(log_level, handler.clone())
        .context("Failed to install logger")?;

    match config_error {
        None => info!("Loaded configuration from: {}", config_file_path),
        Some(e) => {
            warn!(
                "Failed to load config from: {}. Error: {}",
                config_file_path, e
            );
            warn!("Starting with default configuration and an in-memory database.");
        }
    }
    if config.uses_memory_database() {
        info!("Using in-memory database (no database_file specified)");
    }
    if config.has_large_tail_buffer() {
        warn!(
            "tail_buffer_size ({}) is very large; every entry is held in memory",
            config.tail_buffer_size
        );
    }

    let repo = SqliteRepo::open(&config.database_file)
        .context("Failed to initialize database connection pool")?;
    repo.setup_database()
        .context("Failed to set up database schema")?;
    error_log_sink.start(repo.clone());

    let query = LogQuery::new(Arc::new(repo), handler);

    if args.api_mode {
        build_rocket(&config, AppState::new(query)).launch().await?;
        Ok(())
    } else {
        cli_query(&args, &query)
    }
}

#[derive(Parser)]
#[command(name = "RustyLogData")]
#[command(about = "Page, tail and parse backup logs", long_about = None)]
struct Cli {
    #[arg(
        short = 'c',
        long = "config",
        default_value = "config.json",
        env = "RUSTYLOGDATA_CONFIG"
    )]
    config_file: String,

    /// Overrides the log level from the config file
    #[arg(short = 'l', long = "log-level", env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long = "api")]
    api_mode: bool,

    /// poll, pretty, or anything else for a raw dump
    #[arg(short = 'm', long = "mode", default_value = "dump")]
    mode: String,

    #[arg(short = 'o', long = "offset")]
    offset: Option<String>,

    #[arg(short = 'p', long = "pagesize")]
    pagesize: Option<String>,

    #[arg(long = "id")]
    id: Option<String>,

    #[arg(long = "level")]
    level: Option<String>,
}

fn query_params(args: &Cli) -> QueryParams {
    QueryParams {
        level: args.level.clone(),
        id: args.id.clone(),
        pagesize: args.pagesize.clone(),
        offset: args.offset.clone(),
    }
}

fn cli_query(args: &Cli, query: &LogQuery) -> Result<()> {
    let mode = QueryMode::from_key(&args.mode);
    let response = query
        .query(mode, &query_params(args))
        .context("Log query failed")?;

    if response.is_empty() {
        info!("{:?} query returned no rows", mode);
    } else {
        info!("{:?} query returned {} rows", mode, response.len());
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialize response")?
    );
    Ok(())
}
