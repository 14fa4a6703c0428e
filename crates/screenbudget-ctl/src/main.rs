use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "screenbudget-ctl")]
#[command(about = "ScreenBudget CLI control tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    App {
        #[command(subcommand)]
        action: AppAction,
    },

    Usage {
        #[command(subcommand)]
        action: UsageAction,
    },

    Challenge {
        #[command(subcommand)]
        action: ChallengeAction,
    },

    Status {
        #[arg(short, long, default_value = "default")]
        user: String,
    },

    Stats {
        #[arg(short, long, default_value_t = 30)]
        days: u32,
    },
}

#[derive(Subcommand)]
enum AppAction {
    List {
        #[arg(short, long, default_value = "default")]
        user: String,
    },
    Add {
        package: String,
        name: String,
        #[arg(short, long, help = "Daily limit in minutes")]
        limit: i64,
        #[arg(short, long, default_value = "default")]
        user: String,
    },
    Remove {
        app_id: Uuid,
    },
}

#[derive(Subcommand)]
enum UsageAction {
    Record {
        app_id: Uuid,
        minutes: i64,
    },
    Set {
        app_id: Uuid,
        minutes: i64,
    },
    Credit {
        app_id: Uuid,
        minutes: i64,
    },
}

#[derive(Subcommand)]
enum ChallengeAction {
    New {
        #[arg(default_value = "auto", help = "easy, medium, hard, or auto")]
        tier: String,
        #[arg(
            long,
            help = "Recent outcomes as a string of 1s and 0s, most recent last, e.g. 10110"
        )]
        history: Option<String>,
    },
    Answer {
        challenge_id: Uuid,
        answer: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::App { action } => match action {
            AppAction::List { user } => commands::app::list(&user).await?,
            AppAction::Add { package, name, limit, user } => {
                commands::app::add(&user, &package, &name, limit).await?
            }
            AppAction::Remove { app_id } => commands::app::remove(app_id).await?,
        },
        Commands::Usage { action } => match action {
            UsageAction::Record { app_id, minutes } => {
                commands::usage::record(app_id, minutes).await?
            }
            UsageAction::Set { app_id, minutes } => commands::usage::set(app_id, minutes).await?,
            UsageAction::Credit { app_id, minutes } => {
                commands::usage::credit(app_id, minutes).await?
            }
        },
        Commands::Challenge { action } => match action {
            ChallengeAction::New { tier, history } => {
                commands::challenge::new(&tier, history.as_deref()).await?
            }
            ChallengeAction::Answer { challenge_id, answer } => {
                commands::challenge::answer(challenge_id, answer).await?
            }
        },
        Commands::Status { user } => commands::status::show(&user).await?,
        Commands::Stats { days } => commands::stats::show(days).await?,
    }

    Ok(())
}
