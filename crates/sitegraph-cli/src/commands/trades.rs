use clap::Subcommand;
use sitegraph_core::{ActivityType, TradeGraph};

#[derive(Subcommand)]
pub enum TradesAction {
    /// Show the dependency record for one activity type
    Show {
        /// Activity type (snake_case, e.g. drywall)
        event_type: String,
    },
}

pub fn run(action: TradesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TradesAction::Show { event_type } => {
            let graph = TradeGraph::standard();
            let ty = ActivityType::parse(&event_type);
            match graph.dependency(ty) {
                Some(dep) => println!("{}", serde_json::to_string_pretty(dep)?),
                None => println!("{ty}: no constraints (permissive default)"),
            }
        }
    }
    Ok(())
}
