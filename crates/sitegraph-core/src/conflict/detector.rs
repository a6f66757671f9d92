//! Pairwise conflict detection over a candidate schedule.
//!
//! Scans all pairs of scheduled events, applies the active rule set filtered
//! by an analysis perspective, and produces violations, a 0-100 health score,
//! and human-readable suggestions. Detection is pure and idempotent; the
//! detector holds no per-call state.

use serde::{Deserialize, Serialize};

use crate::conflict::rules::{builtin_rules, ConflictRule, RuleContext, RuleKind, Severity};
use crate::events::{ScheduledEvent, WeatherSnapshot};
use crate::trades::{ActivityType, TradeGraph};

/// Analysis perspective: which rules are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    /// All rules active
    Strict,
    /// All rules except low-severity weather rules (recommended)
    #[default]
    Balanced,
    /// Only critical-severity rules
    Flexible,
}

impl Perspective {
    /// Whether `rule` participates under this perspective.
    pub fn is_active(&self, rule: &dyn ConflictRule) -> bool {
        match self {
            Self::Strict => true,
            Self::Flexible => rule.severity() == Severity::Critical,
            Self::Balanced => {
                !(rule.kind() == RuleKind::Weather && rule.severity() == Severity::Low)
            }
        }
    }
}

/// One pairwise rule violation between two scheduled events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub event_a: String,
    pub event_b: String,
    pub rule_id: String,
    pub rule_name: String,
    pub kind: RuleKind,
    pub severity: Severity,
    pub description: String,
    pub resolution: String,
}

/// Detector output: conflicts, free-text suggestions, and a health score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictAnalysis {
    pub conflicts: Vec<Conflict>,
    pub suggestions: Vec<String>,
    /// 0-100; 100 means no detected conflicts
    pub score: u8,
}

impl ConflictAnalysis {
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.conflicts.iter().filter(|c| c.severity == severity).count()
    }
}

/// Conflict detector over a trade graph and an ordered rule list.
pub struct ConflictDetector {
    graph: TradeGraph,
    rules: Vec<Box<dyn ConflictRule>>,
}

impl ConflictDetector {
    /// Detector with the built-in rule set over the given graph.
    pub fn new(graph: TradeGraph) -> Self {
        Self {
            graph,
            rules: builtin_rules(),
        }
    }

    /// Detector over the standard trade catalog.
    pub fn standard() -> Self {
        Self::new(TradeGraph::standard())
    }

    /// Append a custom rule after the built-ins.
    pub fn with_rule(mut self, rule: Box<dyn ConflictRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn graph(&self) -> &TradeGraph {
        &self.graph
    }

    /// Analyze the full candidate event set for one project.
    ///
    /// Event order is irrelevant. Adverse records in `weather` become
    /// synthetic weather-alert events before pairing; an absent feed disables
    /// weather-conflict detection. O(n^2) over the input, which is fine for
    /// the tens of concurrently relevant events a project carries.
    pub fn analyze_schedule(
        &self,
        events: &[ScheduledEvent],
        perspective: Perspective,
        weather: Option<&[WeatherSnapshot]>,
    ) -> ConflictAnalysis {
        let mut all: Vec<ScheduledEvent> = events.to_vec();
        if let Some(snapshots) = weather {
            all.extend(snapshots.iter().filter(|s| s.condition.is_adverse()).enumerate().map(
                |(i, s)| {
                    ScheduledEvent::at(format!("weather-{i}"), ActivityType::WeatherAlert, s.time)
                        .with_weather(s.condition)
                },
            ));
        }

        let ctx = RuleContext { graph: &self.graph };
        let active: Vec<&dyn ConflictRule> = self
            .rules
            .iter()
            .map(|r| r.as_ref())
            .filter(|r| perspective.is_active(*r))
            .collect();

        let mut conflicts = Vec::new();
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                let (a, b) = (&all[i], &all[j]);
                for rule in &active {
                    // Both orderings, at most one conflict per (rule, pair):
                    // direction-sensitive rules fire for whichever ordering
                    // applies, symmetric rules report once.
                    let hit = rule
                        .evaluate(a, b, &ctx)
                        .map(|v| (a, b, v))
                        .or_else(|| rule.evaluate(b, a, &ctx).map(|v| (b, a, v)));
                    if let Some((first, second, violation)) = hit {
                        conflicts.push(Conflict {
                            event_a: first.id.clone(),
                            event_b: second.id.clone(),
                            rule_id: rule.id().to_string(),
                            rule_name: rule.name().to_string(),
                            kind: rule.kind(),
                            severity: rule.severity(),
                            description: violation.description,
                            resolution: violation.resolution,
                        });
                    }
                }
            }
        }

        let score = score_conflicts(&conflicts);
        let suggestions = build_suggestions(&conflicts);

        ConflictAnalysis {
            conflicts,
            suggestions,
            score,
        }
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::standard()
    }
}

/// Start at 100, subtract a fixed penalty per conflict by severity, clamp.
fn score_conflicts(conflicts: &[Conflict]) -> u8 {
    let penalty: u32 = conflicts.iter().map(|c| c.severity.penalty()).sum();
    100u32.saturating_sub(penalty) as u8
}

fn build_suggestions(conflicts: &[Conflict]) -> Vec<String> {
    if conflicts.is_empty() {
        return vec!["No conflicts detected; the schedule respects all active rules".to_string()];
    }

    let mut suggestions = Vec::new();
    let critical = conflicts.iter().filter(|c| c.severity == Severity::Critical).count();
    let high = conflicts.iter().filter(|c| c.severity == Severity::High).count();

    if critical > 0 {
        suggestions.push(format!(
            "{critical} critical conflicts require immediate attention"
        ));
    }
    if high > 0 {
        suggestions.push(format!(
            "{high} high-severity conflicts should be resolved before work begins"
        ));
    }
    if conflicts.iter().any(|c| c.kind == RuleKind::Sequence) {
        suggestions.push(
            "Review trade sequencing; some activities are scheduled out of dependency order"
                .to_string(),
        );
    }
    if conflicts.iter().any(|c| c.kind == RuleKind::Weather) {
        suggestions.push(
            "Check the forecast and consider moving weather-sensitive work".to_string(),
        );
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::rules::Violation;
    use crate::events::WeatherCondition;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_clean_schedule_scores_100() {
        let detector = ConflictDetector::standard();
        // Unrelated, non-overlapping, non-dependent types
        let events = vec![
            ScheduledEvent::new("a", ActivityType::Painting, day(1), day(2)),
            ScheduledEvent::new("b", ActivityType::Landscaping, day(5), day(6)),
        ];
        let analysis = detector.analyze_schedule(&events, Perspective::Strict, None);
        assert!(analysis.conflicts.is_empty());
        assert_eq!(analysis.score, 100);
        assert_eq!(analysis.suggestions.len(), 1);
    }

    #[test]
    fn test_misordered_framing_reports_sequence_and_curing() {
        let detector = ConflictDetector::standard();
        let foundation = ScheduledEvent::new("f", ActivityType::Foundation, day(2), day(3))
            .with_inspection_completed(true);
        let framing = ScheduledEvent::new("fr", ActivityType::Framing, day(1), day(4));

        let analysis = detector.analyze_schedule(&[foundation, framing], Perspective::Strict, None);

        let sequence: Vec<_> = analysis
            .conflicts
            .iter()
            .filter(|c| c.rule_id == "sequence_violation")
            .collect();
        let curing: Vec<_> = analysis
            .conflicts
            .iter()
            .filter(|c| c.rule_id == "curing_violation")
            .collect();
        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence[0].severity, Severity::Critical);
        assert_eq!(curing.len(), 1);
        assert_eq!(analysis.conflicts.len(), 2);
        assert_eq!(analysis.score, 100 - 25 - 15);
        assert!(analysis
            .suggestions
            .iter()
            .any(|s| s.contains("sequencing")));
    }

    #[test]
    fn test_simultaneous_start_with_prerequisite_is_sequence_violation() {
        let detector = ConflictDetector::standard();
        let foundation = ScheduledEvent::new("f", ActivityType::Foundation, day(1), day(2))
            .with_inspection_completed(true);
        let framing = ScheduledEvent::new("fr", ActivityType::Framing, day(1), day(3));

        let analysis = detector.analyze_schedule(&[foundation, framing], Perspective::Strict, None);

        let sequence = analysis
            .conflicts
            .iter()
            .filter(|c| c.rule_id == "sequence_violation")
            .count();
        assert_eq!(sequence, 1);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let detector = ConflictDetector::standard();
        let events = vec![
            ScheduledEvent::new("d", ActivityType::Demolition, day(1), day(3)),
            ScheduledEvent::new("fr", ActivityType::Framing, day(2), day(5)),
        ];
        let first = detector.analyze_schedule(&events, Perspective::Balanced, None);
        let second = detector.analyze_schedule(&events, Perspective::Balanced, None);
        assert_eq!(first.score, second.score);
        assert_eq!(first.conflicts.len(), second.conflicts.len());
        assert_eq!(first.suggestions, second.suggestions);
    }

    #[test]
    fn test_one_pair_can_trigger_multiple_rules() {
        let detector = ConflictDetector::standard();
        // Demolition overlapping framing violates both the mutual-exclusion
        // rule and the safety rule; the redundancy is intentional.
        let events = vec![
            ScheduledEvent::new("d", ActivityType::Demolition, day(1), day(3)),
            ScheduledEvent::new("fr", ActivityType::Framing, day(2), day(5)),
        ];
        let analysis = detector.analyze_schedule(&events, Perspective::Strict, None);
        let ids: Vec<_> = analysis.conflicts.iter().map(|c| c.rule_id.as_str()).collect();
        assert!(ids.contains(&"overlap_violation"));
        assert!(ids.contains(&"safety_violation"));
    }

    #[test]
    fn test_weather_feed_becomes_synthetic_events() {
        let detector = ConflictDetector::standard();
        let roofing = ScheduledEvent::new("r", ActivityType::Roofing, day(1), day(4));
        let feed = vec![
            WeatherSnapshot {
                time: day(2),
                condition: WeatherCondition::Rain,
            },
            WeatherSnapshot {
                time: day(3),
                condition: WeatherCondition::Clear,
            },
        ];

        let without = detector.analyze_schedule(
            std::slice::from_ref(&roofing),
            Perspective::Strict,
            None,
        );
        assert!(without.conflicts.is_empty());

        let with = detector.analyze_schedule(&[roofing], Perspective::Strict, Some(&feed));
        assert_eq!(with.conflicts.len(), 1);
        assert_eq!(with.conflicts[0].rule_id, "weather_conflict");
        assert!(with.suggestions.iter().any(|s| s.contains("forecast")));
    }

    #[test]
    fn test_symmetric_rules_fire_once_per_pair() {
        let detector = ConflictDetector::standard();
        let events = vec![
            ScheduledEvent::new("a", ActivityType::Electrical, day(1), day(3))
                .with_team_member("crew-1"),
            ScheduledEvent::new("b", ActivityType::Plumbing, day(2), day(4))
                .with_team_member("crew-1"),
        ];
        let analysis = detector.analyze_schedule(&events, Perspective::Strict, None);
        let resource = analysis
            .conflicts
            .iter()
            .filter(|c| c.rule_id == "resource_conflict")
            .count();
        assert_eq!(resource, 1);
    }

    /// Always-firing low-severity weather rule, for perspective filtering.
    struct DrizzleRule;

    impl ConflictRule for DrizzleRule {
        fn id(&self) -> &'static str {
            "drizzle_advisory"
        }
        fn name(&self) -> &'static str {
            "Drizzle advisory"
        }
        fn description(&self) -> &'static str {
            "Light rain advisory for outdoor work"
        }
        fn severity(&self) -> Severity {
            Severity::Low
        }
        fn kind(&self) -> RuleKind {
            RuleKind::Weather
        }
        fn evaluate(
            &self,
            a: &ScheduledEvent,
            b: &ScheduledEvent,
            _ctx: &RuleContext<'_>,
        ) -> Option<Violation> {
            if a.overlaps(b) {
                Some(Violation {
                    description: "light rain possible".to_string(),
                    resolution: "keep tarps on site".to_string(),
                })
            } else {
                None
            }
        }
    }

    #[test]
    fn test_perspective_sets_are_nested() {
        let detector = ConflictDetector::standard().with_rule(Box::new(DrizzleRule));
        let events = vec![
            ScheduledEvent::new("d", ActivityType::Demolition, day(1), day(3)),
            ScheduledEvent::new("fr", ActivityType::Framing, day(2), day(5)),
        ];

        let strict = detector.analyze_schedule(&events, Perspective::Strict, None);
        let balanced = detector.analyze_schedule(&events, Perspective::Balanced, None);
        let flexible = detector.analyze_schedule(&events, Perspective::Flexible, None);

        let ids =
            |a: &ConflictAnalysis| a.conflicts.iter().map(|c| c.rule_id.clone()).collect::<Vec<_>>();
        let (s, b, f) = (ids(&strict), ids(&balanced), ids(&flexible));

        assert!(f.iter().all(|id| b.contains(id)));
        assert!(b.iter().all(|id| s.contains(id)));
        // The low-severity weather advisory only survives under strict
        assert!(s.contains(&"drizzle_advisory".to_string()));
        assert!(!b.contains(&"drizzle_advisory".to_string()));
        // Flexible keeps critical rules only
        assert!(flexible
            .conflicts
            .iter()
            .all(|c| c.severity == Severity::Critical));
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let detector = ConflictDetector::standard();
        // Pile up overlapping demolition against every excluded trade
        let mut events = vec![ScheduledEvent::new(
            "d",
            ActivityType::Demolition,
            day(1),
            day(20),
        )];
        for (i, ty) in [
            ActivityType::Framing,
            ActivityType::Roofing,
            ActivityType::Plumbing,
            ActivityType::Electrical,
            ActivityType::Drywall,
            ActivityType::Painting,
        ]
        .into_iter()
        .enumerate()
        {
            events.push(ScheduledEvent::new(format!("e{i}"), ty, day(2), day(10)));
        }
        let analysis = detector.analyze_schedule(&events, Perspective::Strict, None);
        assert_eq!(analysis.score, 0);
    }
}
