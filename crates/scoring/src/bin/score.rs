use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scoring::{SessionProcessor, SessionResultDocument, StandingsCalculator};
use storage::models::LeagueSeason;
use storage::{Database, PgSessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "league-score")]
#[command(about = "League session scoring and season standings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one provider session-result JSON document into the database.
    Session { file: PathBuf },
    /// Recompute the standings of a season from its stored results.
    Standings {
        #[arg(long)]
        league: i64,

        #[arg(long)]
        season: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("scoring={log_level},storage={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url).await?;
    db.run_migrations().await?;
    let store = PgSessionStore::new(db.pool().clone());

    match cli.command {
        Commands::Session { file } => {
            tracing::info!("Loading session results from: {}", file.display());
            let json = tokio::fs::read_to_string(&file).await?;
            let document: SessionResultDocument = serde_json::from_str(&json)?;

            tracing::info!(
                "Scoring session {} ({} simsessions)",
                document.subsession_id,
                document.session_results.len()
            );

            let processor = SessionProcessor::new(&store);
            let report = processor.process_session(&document).await?;

            tracing::info!(
                "Stored {} rows, {} skipped, {} fastest-lap bonuses",
                report.scored,
                report.skipped.len(),
                report.fast_laps
            );
        }
        Commands::Standings { league, season } => {
            let season = LeagueSeason {
                league_id: league,
                season_id: season,
                season_name: None,
                no_drops_on_or_after_race_num: None,
            };

            let calculator = StandingsCalculator::new(&store);
            let standings = calculator.calculate(&season).await?;

            tracing::info!(
                "Recomputed standings for {} drivers in season {}",
                standings.len(),
                season.season_id
            );
        }
    }

    Ok(())
}
