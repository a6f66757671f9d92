//! Built-in conflict rules.
//!
//! Each rule is a stateless strategy object: given an ordered pair of
//! scheduled events and the trade graph, it either produces a violation or
//! nothing. The detector owns pairing, perspective filtering, and scoring.

use serde::{Deserialize, Serialize};

use crate::events::ScheduledEvent;
use crate::trades::{ActivityType, TradeGraph};

/// Violation severity, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Score penalty charged per conflict at this severity.
    pub fn penalty(&self) -> u32 {
        match self {
            Self::Low => 3,
            Self::Medium => 8,
            Self::High => 15,
            Self::Critical => 25,
        }
    }
}

/// What kind of violation a rule detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Sequence,
    Resource,
    Space,
    Weather,
    Inspection,
    Safety,
}

/// Shared read-only context handed to every rule evaluation.
pub struct RuleContext<'a> {
    pub graph: &'a TradeGraph,
}

/// A rule's positive finding for one ordered pair.
#[derive(Debug, Clone)]
pub struct Violation {
    pub description: String,
    pub resolution: String,
}

/// A named, typed predicate over an ordered pair of scheduled events.
///
/// Rules are pure; direction-sensitive rules are evaluated by the detector on
/// both orderings of each pair.
pub trait ConflictRule: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn severity(&self) -> Severity;
    fn kind(&self) -> RuleKind;
    fn evaluate(&self, a: &ScheduledEvent, b: &ScheduledEvent, ctx: &RuleContext<'_>)
        -> Option<Violation>;
}

/// The default rule set, in evaluation order.
pub fn builtin_rules() -> Vec<Box<dyn ConflictRule>> {
    vec![
        Box::new(SequenceRule),
        Box::new(OverlapRule),
        Box::new(CuringRule),
        Box::new(InspectionRule),
        Box::new(WeatherRule),
        Box::new(ResourceRule),
        Box::new(SafetyRule),
    ]
}

/// Dependent work recorded to start at or before its prerequisite's start.
///
/// Compares start against start, not end: this catches gross misordering
/// only; insufficient lag is [`CuringRule`]'s job.
pub struct SequenceRule;

impl ConflictRule for SequenceRule {
    fn id(&self) -> &'static str {
        "sequence_violation"
    }
    fn name(&self) -> &'static str {
        "Sequence violation"
    }
    fn description(&self) -> &'static str {
        "Dependent work must start strictly after its prerequisite starts"
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn kind(&self) -> RuleKind {
        RuleKind::Sequence
    }

    fn evaluate(
        &self,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
        ctx: &RuleContext<'_>,
    ) -> Option<Violation> {
        // A dependent starting at the same instant as its prerequisite is
        // just as misordered as one starting earlier.
        if ctx.graph.depends_on(b.event_type, a.event_type) && b.start_time <= a.start_time {
            return Some(Violation {
                description: format!(
                    "{} is scheduled no later than {}, which it depends on",
                    b.event_type.label(),
                    a.event_type.label()
                ),
                resolution: format!(
                    "Reschedule {} after {} completes",
                    b.event_type.label(),
                    a.event_type.label()
                ),
            });
        }
        None
    }
}

/// Mutually exclusive trades with intersecting `[start, end)` intervals.
pub struct OverlapRule;

impl ConflictRule for OverlapRule {
    fn id(&self) -> &'static str {
        "overlap_violation"
    }
    fn name(&self) -> &'static str {
        "Overlap violation"
    }
    fn description(&self) -> &'static str {
        "Mutually exclusive trades must not share the site"
    }
    fn severity(&self) -> Severity {
        Severity::High
    }
    fn kind(&self) -> RuleKind {
        RuleKind::Space
    }

    fn evaluate(
        &self,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
        ctx: &RuleContext<'_>,
    ) -> Option<Violation> {
        if ctx.graph.cannot_overlap(a.event_type, b.event_type) && a.overlaps(b) {
            return Some(Violation {
                description: format!(
                    "{} and {} cannot run concurrently but their schedules overlap",
                    a.event_type.label(),
                    b.event_type.label()
                ),
                resolution: format!(
                    "Reschedule {} or {} so the two do not overlap",
                    a.event_type.label(),
                    b.event_type.label()
                ),
            });
        }
        None
    }
}

/// Dependent work starting before the prerequisite's cure/dry lag elapses.
pub struct CuringRule;

impl ConflictRule for CuringRule {
    fn id(&self) -> &'static str {
        "curing_violation"
    }
    fn name(&self) -> &'static str {
        "Curing/lag violation"
    }
    fn description(&self) -> &'static str {
        "Cure and dry lag must elapse before dependent work starts"
    }
    fn severity(&self) -> Severity {
        Severity::High
    }
    fn kind(&self) -> RuleKind {
        RuleKind::Sequence
    }

    fn evaluate(
        &self,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
        ctx: &RuleContext<'_>,
    ) -> Option<Violation> {
        if !ctx.graph.depends_on(b.event_type, a.event_type) {
            return None;
        }
        let required = ctx.graph.minimum_days_after(a.event_type)?;
        let elapsed = (b.start_time - a.end_time).num_days();
        if elapsed < required {
            return Some(Violation {
                description: format!(
                    "{} needs {} days after {} ends, but only {} elapse",
                    b.event_type.label(),
                    required,
                    a.event_type.label(),
                    elapsed.max(0)
                ),
                resolution: format!(
                    "Reschedule {} after {} completes",
                    b.event_type.label(),
                    a.event_type.label()
                ),
            });
        }
        None
    }
}

/// Prerequisite requiring an inspection that has not been recorded.
pub struct InspectionRule;

impl ConflictRule for InspectionRule {
    fn id(&self) -> &'static str {
        "inspection_pending"
    }
    fn name(&self) -> &'static str {
        "Inspection pending"
    }
    fn description(&self) -> &'static str {
        "Prerequisites needing inspection must have one recorded"
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn kind(&self) -> RuleKind {
        RuleKind::Inspection
    }

    fn evaluate(
        &self,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
        ctx: &RuleContext<'_>,
    ) -> Option<Violation> {
        if ctx.graph.requires_inspection(a.event_type)
            && ctx.graph.depends_on(b.event_type, a.event_type)
            && a.event_type != ActivityType::Inspection
            && !a.inspection_completed
        {
            return Some(Violation {
                description: format!(
                    "{} requires an inspection before {} can proceed, and none is recorded",
                    a.event_type.label(),
                    b.event_type.label()
                ),
                resolution: format!(
                    "Schedule and complete the {} inspection before {} starts",
                    a.event_type.label(),
                    b.event_type.label()
                ),
            });
        }
        None
    }
}

/// Weather-sensitive work intersected by an alert or adverse condition.
pub struct WeatherRule;

impl ConflictRule for WeatherRule {
    fn id(&self) -> &'static str {
        "weather_conflict"
    }
    fn name(&self) -> &'static str {
        "Weather conflict"
    }
    fn description(&self) -> &'static str {
        "Weather-sensitive work must avoid adverse conditions"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn kind(&self) -> RuleKind {
        RuleKind::Weather
    }

    fn evaluate(
        &self,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
        ctx: &RuleContext<'_>,
    ) -> Option<Violation> {
        if !ctx.graph.is_weather_sensitive(a.event_type) {
            return None;
        }
        let adverse = b.event_type == ActivityType::WeatherAlert
            || b.weather_condition.map(|c| c.is_adverse()).unwrap_or(false);
        if adverse && a.contains(b.start_time) {
            let condition = b
                .weather_condition
                .map(|c| format!("{c:?}").to_lowercase())
                .unwrap_or_else(|| "adverse weather".to_string());
            return Some(Violation {
                description: format!(
                    "{} is weather sensitive and coincides with {}",
                    a.event_type.label(),
                    condition
                ),
                resolution: format!(
                    "Move {} to a day with better conditions",
                    a.event_type.label()
                ),
            });
        }
        None
    }
}

/// Two events sharing a crew with overlapping intervals.
pub struct ResourceRule;

impl ConflictRule for ResourceRule {
    fn id(&self) -> &'static str {
        "resource_conflict"
    }
    fn name(&self) -> &'static str {
        "Resource conflict"
    }
    fn description(&self) -> &'static str {
        "One crew cannot work two overlapping events"
    }
    fn severity(&self) -> Severity {
        Severity::High
    }
    fn kind(&self) -> RuleKind {
        RuleKind::Resource
    }

    fn evaluate(
        &self,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
        _ctx: &RuleContext<'_>,
    ) -> Option<Violation> {
        match (&a.team_member_id, &b.team_member_id) {
            (Some(x), Some(y)) if x == y && a.overlaps(b) => Some(Violation {
                description: format!(
                    "Team member {x} is assigned to both {} and {} at the same time",
                    a.event_type.label(),
                    b.event_type.label()
                ),
                resolution: "Reassign or reschedule to avoid contention".to_string(),
            }),
            _ => None,
        }
    }
}

/// Any work overlapping the hazardous trade, regardless of type
/// compatibility otherwise. Intentionally redundant with [`OverlapRule`] for
/// demolition pairs; both findings are surfaced.
pub struct SafetyRule;

impl SafetyRule {
    const HAZARDOUS: ActivityType = ActivityType::Demolition;
}

impl ConflictRule for SafetyRule {
    fn id(&self) -> &'static str {
        "safety_violation"
    }
    fn name(&self) -> &'static str {
        "Safety violation"
    }
    fn description(&self) -> &'static str {
        "No other trade shares the site with hazardous work"
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn kind(&self) -> RuleKind {
        RuleKind::Safety
    }

    fn evaluate(
        &self,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
        _ctx: &RuleContext<'_>,
    ) -> Option<Violation> {
        let hazardous = a.event_type == Self::HAZARDOUS || b.event_type == Self::HAZARDOUS;
        if hazardous && a.overlaps(b) {
            return Some(Violation {
                description: format!(
                    "{} overlaps {} while demolition hazards are active",
                    a.event_type.label(),
                    b.event_type.label()
                ),
                resolution: "Clear the site of other trades while demolition is in progress"
                    .to_string(),
            });
        }
        None
    }
}
