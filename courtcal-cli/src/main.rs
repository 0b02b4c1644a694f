mod client;
mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courtcal")]
#[command(about = "Track NBA teams and publish their schedules as calendar feeds", version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive first-run setup
    Init,
    /// List NBA teams
    Teams {
        /// Filter by conference (East/West)
        #[arg(short, long)]
        conference: Option<String>,

        /// Filter by division (e.g. Atlantic, Pacific)
        #[arg(short, long)]
        division: Option<String>,

        /// Search by team name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List conferences and divisions
    Conferences,
    /// Track a team, conference, or division
    Track { name: String },
    /// Stop tracking a team, conference, or division
    Untrack { name: String },
    /// Show the current configuration
    Status,
    /// Show upcoming games for the tracked teams
    Schedule {
        /// Number of games to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Fetch the schedule and regenerate calendar files
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Teams {
            conference,
            division,
            search,
        } => commands::teams::run(conference.as_deref(), division.as_deref(), search.as_deref()),
        Commands::Conferences => commands::conferences::run(),
        Commands::Track { name } => commands::track::run(&name),
        Commands::Untrack { name } => commands::untrack::run(&name),
        Commands::Status => commands::status::run(),
        Commands::Schedule { limit } => commands::schedule::run(limit).await,
        Commands::Sync => commands::sync::run().await,
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
