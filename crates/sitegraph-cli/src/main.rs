use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sitegraph-cli", version, about = "Sitegraph CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a schedule for conflicts
    Analyze(commands::analyze::AnalyzeArgs),
    /// Suggest schedule adjustments
    Resolve(commands::resolve::ResolveArgs),
    /// Principle catalog, recommendations and feedback
    Principles {
        #[command(subcommand)]
        action: commands::principles::PrinciplesAction,
    },
    /// Trade dependency graph lookups
    Trades {
        #[command(subcommand)]
        action: commands::trades::TradesAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Resolve(args) => commands::resolve::run(args),
        Commands::Principles { action } => commands::principles::run(action),
        Commands::Trades { action } => commands::trades::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
