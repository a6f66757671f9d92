use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Subcommand;
use sitegraph_core::principles::{submit_feedback, HttpLearningClient, NoopLearningClient};
use sitegraph_core::{ActivityType, PrincipleFeedback, PrinciplesEngine};

#[derive(Subcommand)]
pub enum PrinciplesAction {
    /// List the built-in principle catalog
    List {
        /// Filter by category (e.g. sequencing, safety)
        #[arg(long)]
        category: Option<String>,
    },
    /// Advisory principles for an activity type
    Recommend {
        /// Activity type (snake_case, e.g. concrete_pour)
        event_type: String,
    },
    /// Export principles to a JSON file
    Export { file: PathBuf },
    /// Import principles from a JSON file (with trust discount) and print them
    Import { file: PathBuf },
    /// Record one feedback entry from a JSON file and optionally submit it
    Feedback {
        file: PathBuf,
        /// Learning backend URL; omitted means record locally only
        #[arg(long)]
        endpoint: Option<String>,
    },
}

pub fn run(action: PrinciplesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PrinciplesAction::List { category } => {
            let engine = PrinciplesEngine::new();
            let mut principles = engine.export_principles();
            if let Some(filter) = category {
                let filter = filter.to_lowercase();
                principles.retain(|p| format!("{:?}", p.category).to_lowercase() == filter);
            }
            println!("{}", serde_json::to_string_pretty(&principles)?);
        }
        PrinciplesAction::Recommend { event_type } => {
            let engine = PrinciplesEngine::new();
            let ty = ActivityType::parse(&event_type);
            for principle in engine.get_recommendations(ty) {
                println!(
                    "[{}] {} (confidence {:.2}): {}",
                    principle.importance, principle.name, principle.confidence,
                    principle.description
                );
            }
        }
        PrinciplesAction::Export { file } => {
            let engine = PrinciplesEngine::new();
            let json = serde_json::to_string_pretty(&engine.export_principles())?;
            std::fs::write(&file, json)?;
            println!("exported to {}", file.display());
        }
        PrinciplesAction::Import { file } => {
            let mut engine = PrinciplesEngine::new();
            let data = std::fs::read_to_string(&file)?;
            match engine.import_json(&data) {
                Ok(count) => println!("imported {count} principles"),
                // A bad file leaves the engine untouched
                Err(e) => eprintln!("Warning: import skipped: {e}"),
            }
        }
        PrinciplesAction::Feedback { file, endpoint } => {
            let data = std::fs::read_to_string(&file)?;
            let feedback: PrincipleFeedback = serde_json::from_str(&data)?;
            let principle_id = feedback.principle_id.clone();

            let engine = Arc::new(Mutex::new(PrinciplesEngine::new()));
            let outcome = engine
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .record_feedback(feedback);

            for learned in &outcome.newly_learned {
                println!("learned new principle: {}", learned.id);
            }
            {
                let guard = engine.lock().unwrap_or_else(|p| p.into_inner());
                if let Some(principle) = guard.principle(&principle_id) {
                    println!("confidence for {principle_id}: {:.2}", principle.confidence);
                }
            }

            // The submission is fire and forget in-process; the CLI exits
            // right after, so it waits for the handle here.
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let handle = match endpoint {
                    Some(url) => submit_feedback(
                        engine.clone(),
                        Arc::new(HttpLearningClient::new(url)),
                        outcome.request,
                    ),
                    None => submit_feedback(
                        engine.clone(),
                        Arc::new(NoopLearningClient),
                        outcome.request,
                    ),
                };
                let _ = handle.await;
            });
        }
    }
    Ok(())
}
