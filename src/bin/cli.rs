use clap::{Parser, Subcommand};
use elenco_game_engine::{
    DailyStatus, GameEngine, MatchResult, MemoryProvider, ReferenceEntry, ReferenceSet,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "elenco-cli")]
#[command(about = "Elenco Game Engine CLI (demo squad)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path
    #[arg(short, long, default_value = "elenco.db")]
    db: String,

    /// Acting user id
    #[arg(short, long, default_value = "demo-user")]
    user: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start (or resume) the roster-guessing session against the demo squad
    Start,

    /// Guess a player in the roster session
    Guess {
        /// Attempt id returned by `start`
        attempt: i64,
        /// Guessed name
        text: String,
    },

    /// Reset a session back to the beginning
    Reset { attempt: i64 },

    /// Abandon a session
    Abandon { attempt: i64 },

    /// Guess today's player of the day
    Daily {
        /// Guessed name
        text: String,
    },

    /// Show engine statistics
    Stats,
}

const DEMO_SET_ID: i64 = 1;
const DEMO_SCOPE: &str = "corinthians";

fn demo_provider() -> Arc<MemoryProvider> {
    let provider = MemoryProvider::new();

    let mut set = ReferenceSet::new(DEMO_SET_ID, "Corinthians 2012 — Libertadores");
    set.season = Some("2012".to_string());
    set.competition = Some("Copa Libertadores".to_string());

    let squad = [
        (1, "Cássio", 12, vec![]),
        (2, "Alessandro", 2, vec![]),
        (3, "Chicão", 4, vec![]),
        (4, "Leandro Castán", 5, vec!["Castan"]),
        (5, "Fábio Santos", 6, vec![]),
        (6, "Ralf", 8, vec![]),
        (7, "Paulinho", 17, vec![]),
        (8, "Danilo", 20, vec![]),
        (9, "Alex", 10, vec![]),
        (10, "Jorge Henrique", 23, vec![]),
        (11, "Emerson", 11, vec!["Emerson Sheik", "Sheik"]),
        (12, "Romarinho", 31, vec![]),
    ];

    let entries: Vec<ReferenceEntry> = squad
        .into_iter()
        .map(|(id, name, shirt, aliases)| {
            ReferenceEntry::new(id, DEMO_SET_ID, name)
                .with_shirt_number(shirt)
                .with_aliases(aliases.into_iter().map(String::from).collect())
        })
        .collect();

    let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
    provider.seed_set(set, entries);
    provider.seed_scope(DEMO_SCOPE, ids);

    Arc::new(provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let engine = GameEngine::new(&cli.db, demo_provider()).await?;

    match cli.command {
        Commands::Start => {
            let state = engine.start_attempt(&cli.user, DEMO_SET_ID).await?;
            println!("⚽ Session {} — {} of {} solved", state.attempt.id, state.solved_entry_ids.len(), state.total_entries);
            println!("   Status: {:?}", state.attempt.status);
        }

        Commands::Guess { attempt, text } => {
            let outcome = engine.guess_roster(attempt, &cli.user, &text).await?;
            match outcome.result {
                MatchResult::Matched { entry_id, score } => {
                    println!("✅ Matched entry {} (score {:.2})", entry_id, score);
                }
                MatchResult::NoMatch { reason } => {
                    println!("❌ No new match: {:?}", reason);
                }
            }
            println!(
                "   {}/{} solved, {} wrong, status {:?}",
                outcome.solved_count, outcome.total_entries, outcome.wrong_guesses, outcome.status
            );
        }

        Commands::Reset { attempt } => {
            if engine.reset_attempt(attempt, &cli.user).await? {
                println!("🔄 Session {} reset", attempt);
            } else {
                println!("❌ No such session for this user");
            }
        }

        Commands::Abandon { attempt } => {
            if engine.abandon_attempt(attempt, &cli.user).await? {
                println!("🏳️ Session {} abandoned", attempt);
            } else {
                println!("❌ No such session for this user");
            }
        }

        Commands::Daily { text } => {
            let outcome = engine.daily_guess_today(&cli.user, DEMO_SCOPE, &text).await?;
            match outcome.status {
                DailyStatus::Won => {
                    println!("🎉 Correct! It was {}", outcome.revealed_name.unwrap_or_default());
                }
                DailyStatus::Lost => {
                    println!("💀 Out of attempts. It was {}", outcome.revealed_name.unwrap_or_default());
                }
                DailyStatus::Playing => {
                    println!("❌ {:?} — {} wrong so far, blur {}%", outcome.feedback, outcome.wrong_attempts, outcome.blur_percent);
                }
            }
        }

        Commands::Stats => {
            let stats = engine.stats().await?;
            println!("📊 Engine Statistics:");
            println!("   Attempts in progress: {}", stats.attempts_in_progress);
            println!("   Attempts completed:   {}", stats.attempts_completed);
            println!("   Attempts abandoned:   {}", stats.attempts_abandoned);
            println!("   Daily players:        {}", stats.daily_players);
            println!("   Daily wins/losses:    {}/{}", stats.daily_wins, stats.daily_losses);
            println!("   Daily win rate:       {:.0}%", stats.daily_win_rate() * 100.0);
        }
    }

    Ok(())
}
