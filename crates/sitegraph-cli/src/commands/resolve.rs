use std::path::PathBuf;

use chrono::{Utc, Weekday};
use clap::Args;
use sitegraph_core::{ScheduleConstraints, ScheduleResolver};

#[derive(Args)]
pub struct ResolveArgs {
    /// Schedule file (JSON array of scheduled events)
    #[arg(long)]
    pub schedule: PathBuf,

    /// Allowed weekdays, comma separated (e.g. mon,tue,wed,thu,fri)
    #[arg(long, value_delimiter = ',')]
    pub work_days: Option<Vec<String>>,

    /// Earliest working hour (0-23)
    #[arg(long)]
    pub work_hours_start: Option<u32>,

    /// Emit adjustments as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_weekday(s: &str) -> Result<Weekday, Box<dyn std::error::Error>> {
    s.parse::<Weekday>()
        .map_err(|_| format!("invalid weekday: {s}").into())
}

pub fn run(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let events = super::load_schedule(&args.schedule)?;

    let preferred_work_days = match &args.work_days {
        Some(days) => Some(
            days.iter()
                .map(|d| parse_weekday(d))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };
    let constraints = ScheduleConstraints {
        preferred_work_days,
        work_hours_start: args.work_hours_start,
        work_hours_end: None,
    };

    let resolver = ScheduleResolver::standard();
    let adjustments = resolver.suggest_schedule(&events, Some(&constraints), Utc::now());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&adjustments)?);
        return Ok(());
    }

    if adjustments.is_empty() {
        println!("no adjustments needed");
        return Ok(());
    }
    for adj in &adjustments {
        println!(
            "{}: {} -> {} ({})",
            adj.event_id, adj.original_start, adj.suggested_start, adj.reason
        );
    }
    Ok(())
}
