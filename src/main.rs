use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use f1_telemetry::grouping::FILTER_OPTIONS;
use f1_telemetry::{
    ClientConfig, DataOrchestrator, DriverListView, HttpGateway, SessionDetailView,
    SessionListView, TelemetryView,
};

#[derive(Parser)]
#[command(name = "f1-telemetry")]
#[command(about = "Browse OpenF1 sessions, drivers and telemetry", long_about = None)]
struct Cli {
    /// API root (overrides OPENF1_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a season's sessions grouped by meeting
    Sessions {
        /// Season (defaults to OPENF1_DEFAULT_YEAR or the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Session type filter: All, Practice, Qualifying, Sprint or Race
        #[arg(short, long, default_value = "All")]
        filter: String,
    },

    /// List a season's drivers
    Drivers {
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show one session with its drivers and weather
    Session {
        /// Session key
        key: u32,
    },

    /// Show lap statistics for a driver, optionally with one lap's speed trace
    Telemetry {
        session_key: u32,
        driver_number: u32,

        /// Lap to load car data for
        #[arg(short, long)]
        lap: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "f1_telemetry=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.base_url {
        config = ClientConfig::builder()
            .base_url(url)
            .timeout(config.timeout)
            .max_retries(config.max_retries)
            .retry_delay(config.retry_delay)
            .default_year(config.default_year)
            .build();
    }

    let gateway = Arc::new(HttpGateway::new(config.clone())?);
    let orchestrator = Arc::new(DataOrchestrator::with_gateway(gateway));

    match cli.command {
        Commands::Sessions { year, filter } => {
            let view = SessionListView::new(orchestrator, year.unwrap_or(config.default_year));
            view.load().await;
            view.set_filter(&filter);
            print_soft_error(view.error_message());

            let groups = view.groups();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
                return Ok(());
            }

            if groups.is_empty() {
                println!(
                    "No sessions match filter '{}' (try one of: {})",
                    view.filter(),
                    FILTER_OPTIONS.join(", ")
                );
            }
            let now = Utc::now();
            for group in &groups {
                println!("{}  {}  ({})", group.header(), group.formatted_date(), group.session_count_label());
                for session in &group.sessions {
                    println!(
                        "  {:>6}  {:<20} {} {}  {}",
                        session.session_key,
                        session.session_name,
                        session.formatted_date(),
                        session.formatted_time(),
                        session.status(now)
                    );
                }
            }
        }

        Commands::Drivers { year } => {
            let view = DriverListView::new(orchestrator, year.unwrap_or(config.default_year));
            view.load().await;
            print_soft_error(view.error_message());

            let drivers = view.drivers();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&drivers)?);
                return Ok(());
            }

            println!("Drivers {} ({}):", view.year(), drivers.len());
            for driver in &drivers {
                println!(
                    "  {:>3}  {:<4} {:<25} {}",
                    driver.driver_number,
                    driver.name_acronym,
                    driver.full_name,
                    driver.team_name.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Session { key } => {
            let view = SessionDetailView::new(orchestrator, key);
            view.load().await;
            print_soft_error(view.error_message());

            let Some(session) = view.session() else {
                bail!("Session {} not found", key);
            };
            let drivers = view.drivers();
            let weather = view.current_weather();

            if cli.json {
                let out = serde_json::json!({
                    "session": &*session,
                    "drivers": drivers,
                    "weather": weather,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!("{} - {} ({})", session.session_name, session.location, session.country_name);
            println!("  Circuit:  {}", session.circuit_short_name);
            println!("  Start:    {} {}", session.formatted_date(), session.formatted_time());
            println!("  Status:   {}", session.status(Utc::now()));
            if let Some(w) = weather {
                println!(
                    "  Weather:  {}, air {}, track {}, wind {}",
                    w.condition(),
                    w.formatted_air_temp(),
                    w.formatted_track_temp(),
                    w.formatted_wind()
                );
            }
            println!("  Drivers ({}):", drivers.len());
            for driver in &drivers {
                println!("    {:>3}  {}", driver.driver_number, driver.broadcast_name);
            }
        }

        Commands::Telemetry {
            session_key,
            driver_number,
            lap,
        } => {
            let view = TelemetryView::new(orchestrator, session_key, driver_number);
            view.load().await;
            print_soft_error(view.error_message());

            if let Some(lap_number) = lap {
                view.select_lap(lap_number).await;
                print_soft_error(view.error_message());
            }

            if cli.json {
                let out = serde_json::json!({
                    "driver": view.driver(),
                    "statistics": view.statistics(),
                    "lap_chart": view.lap_chart(),
                    "sector_chart": view.sector_chart(),
                    "telemetry_chart": view.telemetry_chart(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!("{}", view.title());
            if let Some(stats) = view.statistics() {
                println!("  Laps:     {}", stats.total_lap_count);
                println!(
                    "  Fastest:  {}",
                    stats.fastest_lap_formatted().unwrap_or_else(|| "N/A".to_string())
                );
                println!("  Average:  {}", stats.average_lap_formatted);
            }
            for entry in view.sector_chart() {
                println!("  {}  {}", entry.label, entry.value_label);
            }
            for entry in view.lap_chart() {
                println!("  {:>4}  {}", entry.label, entry.value_label);
            }

            if let Some(lap_number) = view.selected_lap() {
                let trace = view.telemetry_chart();
                println!("Lap {} speed trace ({} samples):", lap_number, trace.len());
                for entry in trace {
                    println!("  {:>3}  {:>9}  {:?}", entry.label, entry.value_label, entry.color);
                }
            }
        }
    }

    Ok(())
}

/// Views never fail hard; show what went wrong and print whatever loaded
fn print_soft_error(message: Option<String>) {
    if let Some(message) = message {
        eprintln!("warning: {}", message);
    }
}
