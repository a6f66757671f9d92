//! Schedule resolver: single forward-pass adjustment proposals.
//!
//! Given a candidate event set, proposes per-event start/end times that
//! satisfy dependency ordering and minimum lag, honoring optional calendar
//! constraints. One pass, no iterative relaxation: the output is not
//! re-checked against overlap or resource rules, so callers wanting a fully
//! validated schedule re-run the conflict detector on the adjusted result.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::events::ScheduledEvent;
use crate::trades::TradeGraph;

/// Optional calendar constraints for suggested times.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConstraints {
    /// Allowed weekdays; candidate starts advance day-by-day until allowed
    pub preferred_work_days: Option<Vec<Weekday>>,
    /// Earliest working hour (0-23); earlier candidate starts clamp forward
    pub work_hours_start: Option<u32>,
    /// Latest working hour; carried for callers, not enforced by the pass
    pub work_hours_end: Option<u32>,
}

/// Proposed adjustment for one event. Duration is always preserved.
///
/// Carries its own id so a UI can reference individual proposals in an
/// "apply suggested changes" action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAdjustment {
    pub id: String,
    pub event_id: String,
    pub original_start: DateTime<Utc>,
    pub original_end: DateTime<Utc>,
    pub suggested_start: DateTime<Utc>,
    pub suggested_end: DateTime<Utc>,
    pub reason: String,
}

/// Forward-pass schedule resolver over a trade graph.
pub struct ScheduleResolver {
    graph: TradeGraph,
}

impl ScheduleResolver {
    pub fn new(graph: TradeGraph) -> Self {
        Self { graph }
    }

    pub fn standard() -> Self {
        Self::new(TradeGraph::standard())
    }

    /// Propose adjusted `[start, end)` windows for `events`.
    ///
    /// `now` seeds the running end-time floor for dependent events. Inputs
    /// are never mutated; only events whose suggested start differs from the
    /// original produce an entry.
    pub fn suggest_schedule(
        &self,
        events: &[ScheduledEvent],
        constraints: Option<&ScheduleConstraints>,
        now: DateTime<Utc>,
    ) -> Vec<ScheduleAdjustment> {
        let ordered = self.dependency_order(events);

        // Possibly-adjusted windows, keyed by event id; dependents read the
        // adjusted end of earlier-placed prerequisites.
        let mut windows: HashMap<&str, (DateTime<Utc>, DateTime<Utc>)> = events
            .iter()
            .map(|e| (e.id.as_str(), (e.start_time, e.end_time)))
            .collect();

        let mut adjustments = Vec::new();
        let mut last_end = now;

        for event in &ordered {
            let deps: Vec<&ScheduledEvent> = events
                .iter()
                .filter(|other| {
                    other.id != event.id && self.graph.depends_on(event.event_type, other.event_type)
                })
                .collect();

            let (mut candidate, reason) = match deps
                .iter()
                .map(|d| (*d, windows[d.id.as_str()].1))
                .max_by_key(|(_, end)| *end)
            {
                None => (event.start_time, String::new()),
                // The governing prerequisite is the one whose (possibly
                // already-adjusted) end is latest; its cure/dry lag, if
                // defined, pushes the candidate out past it.
                Some((governing, latest_end)) => {
                    match self.graph.minimum_days_after(governing.event_type) {
                        Some(days) => (
                            latest_end + Duration::days(days),
                            format!(
                                "Waits out the {days}-day lag after {}",
                                governing.event_type.label()
                            ),
                        ),
                        None => (
                            latest_end.max(last_end),
                            format!("Follows completion of {}", governing.event_type.label()),
                        ),
                    }
                }
            };

            if let Some(c) = constraints {
                candidate = apply_constraints(candidate, c);
            }

            let duration = event.duration();
            let suggested_end = candidate + duration;
            windows.insert(event.id.as_str(), (candidate, suggested_end));
            last_end = last_end.max(suggested_end);

            if candidate != event.start_time {
                let reason = if reason.is_empty() {
                    "Moved to satisfy calendar constraints".to_string()
                } else {
                    reason
                };
                adjustments.push(ScheduleAdjustment {
                    id: uuid::Uuid::new_v4().to_string(),
                    event_id: event.id.clone(),
                    original_start: event.start_time,
                    original_end: event.end_time,
                    suggested_start: candidate,
                    suggested_end,
                    reason,
                });
            }
        }

        adjustments
    }

    /// Order events so every direct prerequisite places before its dependent,
    /// ties broken by original start time. This is a partial order: events
    /// with no direct relation keep their relative original-time order.
    ///
    /// A dependency cycle is a configuration error; remaining events are
    /// appended in start order rather than looping.
    fn dependency_order<'a>(&self, events: &'a [ScheduledEvent]) -> Vec<&'a ScheduledEvent> {
        let mut by_start: Vec<&ScheduledEvent> = events.iter().collect();
        by_start.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));

        let mut ordered: Vec<&ScheduledEvent> = Vec::with_capacity(events.len());
        let mut placed: Vec<&str> = Vec::with_capacity(events.len());

        while ordered.len() < by_start.len() {
            let next = by_start.iter().find(|e| {
                !placed.contains(&e.id.as_str())
                    && by_start.iter().all(|other| {
                        other.id == e.id
                            || placed.contains(&other.id.as_str())
                            || !self.graph.depends_on(e.event_type, other.event_type)
                    })
            });
            match next {
                Some(e) => {
                    placed.push(e.id.as_str());
                    ordered.push(*e);
                }
                None => {
                    // Cycle: emit whatever remains in start order
                    for e in &by_start {
                        if !placed.contains(&e.id.as_str()) {
                            ordered.push(*e);
                        }
                    }
                    break;
                }
            }
        }

        ordered
    }
}

impl Default for ScheduleResolver {
    fn default() -> Self {
        Self::standard()
    }
}

/// Advance to an allowed weekday, then clamp the hour forward.
fn apply_constraints(mut candidate: DateTime<Utc>, c: &ScheduleConstraints) -> DateTime<Utc> {
    if let Some(days) = &c.preferred_work_days {
        if !days.is_empty() {
            // At most a week of day-by-day advances
            for _ in 0..7 {
                if days.contains(&candidate.weekday()) {
                    break;
                }
                candidate += Duration::days(1);
            }
        }
    }
    if let Some(start_hour) = c.work_hours_start {
        if candidate.hour() < start_hour {
            if let Some(clamped) = candidate.with_hour(start_hour) {
                candidate = clamped;
            }
        }
    }
    candidate
}
