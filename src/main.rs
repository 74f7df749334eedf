use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soloq_tracker::api::state::AppState;
use soloq_tracker::config::AppConfig;
use soloq_tracker::pipeline::Pipeline;
use soloq_tracker::riot::{LeagueApi, RiotClient};
use soloq_tracker::snapshot::SnapshotCache;
use soloq_tracker::store::identity::IdentityStore;
use soloq_tracker::store::matches::MatchStore;
use soloq_tracker::store::CacheConfig;

#[derive(Parser)]
#[command(name = "soloq-tracker")]
#[command(about = "SoloQ leaderboard and rank tracker for a fixed roster")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Resolve every roster identity and print the mapping
    Resolve,

    /// Run one refresh cycle and print the payload as JSON
    Snapshot {
        /// Which payload: "stats" or "standings"
        #[arg(default_value = "stats")]
        endpoint: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting soloq-tracker v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_file(&PathBuf::from(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    let api_key =
        std::env::var("RIOT_API_KEY").context("RIOT_API_KEY environment variable is not set")?;

    let api: Arc<dyn LeagueApi> = Arc::new(RiotClient::new(&config.riot, &api_key)?);
    let cache = CacheConfig::new(config.cache_dir.clone());
    let identities = IdentityStore::open(&cache)?;
    let matches = MatchStore::new(&cache);
    let pipeline = Arc::new(Pipeline::new(
        api,
        identities,
        matches,
        config.tracking.clone(),
        config.roster.clone(),
    ));

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState {
                pipeline,
                stats_cache: Arc::new(SnapshotCache::new(config.tracking.stats_ttl_duration())),
                standings_cache: Arc::new(SnapshotCache::new(
                    config.tracking.standings_ttl_duration(),
                )),
            };
            let app = soloq_tracker::api::build_router(state);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!("Dashboard API: http://{}", addr);
            tracing::info!(
                "Queue={} ({} tracked players, {} matches/player)",
                config.tracking.queue_id,
                config.roster.len(),
                config.tracking.sample_per_player
            );
            axum::serve(listener, app).await?;
        }
        Commands::Resolve => {
            let resolved = pipeline.resolve_roster().await?;
            println!("\n=== Resolved Identities ===");
            for (key, puuid) in &resolved {
                println!("{:<12} {}", key, puuid);
            }
        }
        Commands::Snapshot { endpoint } => match endpoint.as_str() {
            "stats" => {
                let payload = pipeline.stats_snapshot().await?;
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            "standings" => {
                let payload = pipeline.standings_snapshot().await?;
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            other => {
                eprintln!("Unknown endpoint: {}. Use 'stats' or 'standings'.", other);
            }
        },
    }

    Ok(())
}
