use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "studytrack", version, about = "Study tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-subject timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Study session log management
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Test result tracking
    Test {
        #[command(subcommand)]
        action: commands::test::TestAction,
    },
    /// Today's statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Study streak
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Daily question goal
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Exam profile and streak settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Identity management for cloud sync
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Cloud synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Test { action } => commands::test::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Sync { action } => commands::sync::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
