/// Encore host - drives the playback engine from a timer loop
use clap::{Parser, Subcommand};
use encore_host::{
    config::HostConfig,
    session::{run_session, SessionPlan},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore-host")]
#[command(about = "Drive the Encore playback engine against simulated collaborators", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ENCORE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a demo release until it finishes
    Play {
        /// Number of tracks in the demo release
        #[arg(short, long, default_value_t = 3)]
        tracks: usize,

        /// Initial volume (0-100), overrides the configuration
        #[arg(short, long)]
        volume: Option<u8>,

        /// Pause the first track after this many milliseconds
        #[arg(long)]
        pause_at_ms: Option<u64>,

        /// Stay paused this many milliseconds
        #[arg(long, default_value_t = 1000)]
        pause_for_ms: u64,

        /// Stop the session after this many seconds
        #[arg(long, default_value_t = 600)]
        limit_secs: u64,
    },
    /// Print the effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_playback=info,encore_host=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = HostConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Play {
            tracks,
            volume,
            pause_at_ms,
            pause_for_ms,
            limit_secs,
        } => {
            if let Some(volume) = volume {
                config.playback.volume = volume;
                config.validate()?;
            }

            let plan = SessionPlan {
                tracks,
                pause_at: pause_at_ms.map(Duration::from_millis),
                pause_for: Duration::from_millis(pause_for_ms),
                limit: Duration::from_secs(limit_secs),
            };
            play(&config, &plan).await?;
        }
        Commands::ShowConfig => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn play(config: &HostConfig, plan: &SessionPlan) -> anyhow::Result<()> {
    tracing::info!("Starting Encore host");
    tracing::info!("Tick rate: {} Hz", config.host.tick_hz);
    tracing::info!("Demo release: {} tracks", plan.tracks);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let report = run_session(config, plan, shutdown).await?;

    tracing::info!("Played: {}", report.played.join(", "));
    for failure in &report.failures {
        tracing::warn!("Failure: {}", failure);
    }
    if report.interrupted {
        tracing::warn!("Session interrupted");
    }

    Ok(())
}
