use anyhow::Context;
use clap::Parser;
use neighborhood_map::core::coordinator::CoordinatorSettings;
use neighborhood_map::domain::ports::MapSurface;
use neighborhood_map::utils::{logger, validation::Validate};
use neighborhood_map::{
    AppConfig, CliArgs, FoursquareClient, HeadlessMap, MapAdapter, SubmitOutcome, ViewCoordinator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match AppConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 {}", e.recovery_suggestion());
                    std::process::exit(1);
                }
            }
        }
        None => AppConfig::default(),
    };
    args.apply_to(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let provider = FoursquareClient::new(config.provider_settings())
        .context("failed to build the venue provider client")?;
    let surface = HeadlessMap::new(config.map.center).with_zoom(config.map.zoom);
    let map = MapAdapter::with_options(surface, config.map_options());
    let settings: CoordinatorSettings = config.coordinator_settings();
    let mut view = ViewCoordinator::new(provider, map, settings);

    tracing::info!("🔍 Searching for \"{}\"", view.filter());
    if view.start().await == SubmitOutcome::Failed {
        for alert in view.alerts() {
            eprintln!("❌ [{}] {}", alert.css_class(), alert.message);
        }
        std::process::exit(2);
    }

    if let Some(filter) = &args.filter {
        view.set_filter(filter.clone());
    }

    if args.details {
        for i in 0..view.locations().len() {
            view.load_details(i).await;
        }
    }

    let center = view.map().surface().center();
    println!(
        "📍 {} venues around {} ({} shown)",
        view.locations().len(),
        center,
        view.filtered_locations().len()
    );
    for venue in view.filtered_locations() {
        let rating = venue
            .rating
            .as_ref()
            .map(|r| format!(" ★ {}/10", r.score))
            .unwrap_or_default();
        let address = venue.first_address_line().unwrap_or("-");
        println!("  • {}{} | {}", venue.name, rating, address);
        if let Some(details) = &venue.details {
            println!("      ☎ {}  🌐 {}", details.phone, details.website);
        }
    }

    Ok(())
}
