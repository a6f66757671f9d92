use std::path::PathBuf;

use clap::{Args, ValueEnum};
use sitegraph_core::{ConflictDetector, Perspective};

#[derive(Clone, Copy, ValueEnum)]
pub enum PerspectiveArg {
    Strict,
    Balanced,
    Flexible,
}

impl From<PerspectiveArg> for Perspective {
    fn from(arg: PerspectiveArg) -> Self {
        match arg {
            PerspectiveArg::Strict => Perspective::Strict,
            PerspectiveArg::Balanced => Perspective::Balanced,
            PerspectiveArg::Flexible => Perspective::Flexible,
        }
    }
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Schedule file (JSON array of scheduled events)
    #[arg(long)]
    pub schedule: PathBuf,

    /// Which rules are active
    #[arg(long, value_enum, default_value = "balanced")]
    pub perspective: PerspectiveArg,

    /// Optional weather feed file (JSON array of {time, condition})
    #[arg(long)]
    pub weather: Option<PathBuf>,

    /// Emit the full analysis as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let events = super::load_schedule(&args.schedule)?;
    let weather = match &args.weather {
        Some(path) => Some(super::load_weather(path)?),
        None => None,
    };

    let detector = ConflictDetector::standard();
    let analysis =
        detector.analyze_schedule(&events, args.perspective.into(), weather.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("score: {}/100", analysis.score);
    for conflict in &analysis.conflicts {
        println!(
            "[{:?}] {} ({} / {}): {}",
            conflict.severity, conflict.rule_name, conflict.event_a, conflict.event_b,
            conflict.description
        );
        println!("  -> {}", conflict.resolution);
    }
    for suggestion in &analysis.suggestions {
        println!("* {suggestion}");
    }
    Ok(())
}
