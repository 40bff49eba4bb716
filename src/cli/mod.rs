use std::sync::Arc;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    core::TripPlanner,
    server::{run_serve, AppState},
    store::{MemoryTripStore, SqliteTripStore, TripStore},
    types::TripRequestPayload,
};

/// CLI entry point for the trip-planner binary
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = command().get_matches();
    let mut config = AppConfig::from_env()?;

    match matches.subcommand() {
        Some(("plan", args)) => {
            apply_model_override(&mut config, args);
            plan(config, args).await
        }
        Some(("serve", args)) => {
            apply_model_override(&mut config, args);
            if let Some(bind) = args.get_one::<String>("bind") {
                config.bind = bind.clone();
            }
            if let Some(url) = args.get_one::<String>("database-url") {
                config.database_url = Some(url.clone());
            }
            if args.get_flag("place-images") {
                config.place_images = true;
            }
            serve(config).await
        }
        _ => serve(config).await,
    }
}

fn command() -> Command {
    let model_arg = Arg::new("model")
        .short('m')
        .long("model")
        .value_name("MODEL")
        .help("Gemini model for itinerary generation (or set TRIP_MODEL)");

    Command::new("trip-planner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate, store and serve AI travel itineraries")
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API (default)")
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("Address to listen on (or set TRIP_BIND)"),
                )
                .arg(
                    Arg::new("database-url")
                        .short('d')
                        .long("database-url")
                        .value_name("URL")
                        .help(
                            "SQLite URL for saved trips (or set DATABASE_URL); \
                             in-memory when unset",
                        ),
                )
                .arg(
                    Arg::new("place-images")
                        .long("place-images")
                        .action(ArgAction::SetTrue)
                        .help(
                            "Illustrate activities with generated images \
                             (needs Cloudinary settings)",
                        ),
                )
                .arg(model_arg.clone()),
        )
        .subcommand(
            Command::new("plan")
                .about("Generate one itinerary and print it as JSON")
                .arg(
                    Arg::new("destination")
                        .help("Where to go")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("group-type")
                        .short('g')
                        .long("group-type")
                        .value_name("GROUP")
                        .help("solo, couple, friends or family")
                        .default_value("solo"),
                )
                .arg(
                    Arg::new("people")
                        .short('p')
                        .long("people")
                        .value_name("COUNT")
                        .value_parser(value_parser!(u32))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_name("DAYS")
                        .value_parser(value_parser!(u32))
                        .default_value("3"),
                )
                .arg(
                    Arg::new("budget")
                        .long("budget")
                        .value_name("LABEL")
                        .help("Low, Medium or High")
                        .default_value("Medium"),
                )
                .arg(model_arg),
        )
}

fn apply_model_override(config: &mut AppConfig, args: &ArgMatches) {
    if let Some(model) = args.get_one::<String>("model") {
        config.gemini.model = model.clone();
    }
}

async fn plan(config: AppConfig, args: &ArgMatches) -> anyhow::Result<()> {
    let request = TripRequestPayload {
        destination: args.get_one::<String>("destination").cloned(),
        group_type: args.get_one::<String>("group-type").cloned(),
        number_of_people: args.get_one::<u32>("people").copied(),
        days: args.get_one::<u32>("days").copied(),
        budget: args.get_one::<String>("budget").cloned(),
    }
    .validate()?;

    let planner = TripPlanner::from_config(&config)?;
    info!(model = planner.model(), destination = %request.destination, "planning trip");

    let trip = planner.plan_trip(&request).await?;
    println!("{}", serde_json::to_string_pretty(&trip)?);
    Ok(())
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    if config.place_images && !config.place_images_enabled() {
        warn!("place images requested but Cloudinary is not configured; skipping images");
    }

    let planner = TripPlanner::from_config(&config)?;
    let store = open_store(&config).await?;
    info!(
        model = planner.model(),
        place_images = planner.place_images_enabled(),
        "planner ready"
    );

    run_serve(AppState::new(planner, store), &config.bind).await
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn TripStore>> {
    match &config.database_url {
        Some(url) => {
            let store = SqliteTripStore::connect(url)
                .await
                .with_context(|| format!("failed to open trip database at {url}"))?;
            info!(url = %url, "using sqlite trip store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; trips are kept in memory only");
            Ok(Arc::new(MemoryTripStore::new()))
        }
    }
}
