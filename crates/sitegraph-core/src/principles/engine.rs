//! Adaptive construction principles engine.
//!
//! A confidence-weighted variant of the conflict rule set: each principle
//! carries a static importance and a mutable confidence that user feedback
//! nudges up or down. A repeatedly rejected (type, type) pattern synthesizes
//! a new learned principle. One engine instance per tenant/project context;
//! there is deliberately no process-wide shared instance.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::ScheduledEvent;
use crate::principles::catalog::builtin_principles;
use crate::principles::learning::{LearningContext, LearningRequest, LearningResponse};
use crate::trades::ActivityType;

/// Confidence bump on accepted feedback.
const ACCEPT_STEP: f64 = 0.05;
/// Confidence cut on rejected feedback.
const REJECT_STEP: f64 = 0.10;
/// Confidence never drops below this.
const CONFIDENCE_FLOOR: f64 = 0.3;
/// Feedback entries inspected for repeated patterns.
const PATTERN_WINDOW: usize = 50;
/// Minimum entries for a (type, type) group to count as a pattern.
const PATTERN_MIN_SAMPLES: usize = 5;
/// Rejection rate a group must exceed to synthesize a principle.
const PATTERN_REJECTION_RATE: f64 = 0.7;
/// Fixed importance for synthesized principles.
const LEARNED_IMPORTANCE: u8 = 5;
/// Starting confidence for synthesized principles.
const LEARNED_CONFIDENCE: f64 = 0.6;
/// Trust discount applied to imported principles.
const IMPORT_DISCOUNT: f64 = 0.8;
/// Trailing history entries shipped to the learning backend.
const CONTEXT_HISTORY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipleCategory {
    Sequencing,
    Safety,
    Quality,
    Efficiency,
    Compliance,
    Resource,
    Environmental,
}

/// A confidence-weighted, adaptively tuned rule used for advisory
/// recommendations, distinct from the fixed conflict rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionPrinciple {
    pub id: String,
    pub name: String,
    pub category: PrincipleCategory,
    pub description: String,
    /// 1-10, fixed at authoring time
    pub importance: u8,
    /// 0.0-1.0, the only field mutated after creation
    pub confidence: f64,
    /// Free text, advisory only; recommendation lookup matches against these
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub exceptions: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub learned: bool,
}

impl ConstructionPrinciple {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: PrincipleCategory,
        description: impl Into<String>,
        importance: u8,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            importance,
            confidence,
            conditions: Vec::new(),
            exceptions: Vec::new(),
            examples: Vec::new(),
            learned: false,
        }
    }

    pub fn with_conditions(mut self, conditions: &[&str]) -> Self {
        self.conditions = conditions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_exceptions(mut self, exceptions: &[&str]) -> Self {
        self.exceptions = exceptions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples = examples.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Ranking weight for assessments.
    pub fn weight(&self) -> f64 {
        self.importance as f64 * self.confidence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackAction {
    Accepted,
    Rejected,
    Modified,
}

/// One user reaction to a surfaced principle. Append-only; never mutated or
/// deleted by this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipleFeedback {
    pub principle_id: String,
    pub event_type_a: ActivityType,
    pub event_type_b: ActivityType,
    pub action: FeedbackAction,
    #[serde(default)]
    pub context: String,
    pub timestamp: DateTime<Utc>,
}

/// One violated principle for a pair of events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipleAssessment {
    pub principle: ConstructionPrinciple,
    pub violated: bool,
    pub confidence: f64,
    pub reason: String,
}

/// Local outcome of recording feedback: the prepared learning-backend
/// request plus any principles synthesized from a repeated pattern.
#[derive(Debug, Clone)]
pub struct FeedbackOutcome {
    pub request: LearningRequest,
    pub newly_learned: Vec<ConstructionPrinciple>,
}

/// Caller-owned principles engine. See the module docs for the ownership
/// rule: never share one instance's mutable state across tenants.
pub struct PrinciplesEngine {
    principles: HashMap<String, ConstructionPrinciple>,
    feedback_history: Vec<PrincipleFeedback>,
    /// dependent -> prerequisites, for the sequencing category check
    sequencing: HashMap<ActivityType, Vec<ActivityType>>,
    /// cure/dry days per trade, for the quality category check
    cure_days: HashMap<ActivityType, i64>,
}

impl PrinciplesEngine {
    /// Engine seeded from the built-in catalog.
    pub fn new() -> Self {
        use ActivityType::*;

        let principles = builtin_principles()
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let sequencing = HashMap::from([
            (Framing, vec![Foundation]),
            (Roofing, vec![Framing]),
            (Electrical, vec![Framing]),
            (Plumbing, vec![Framing]),
            (Hvac, vec![Framing]),
            (Drywall, vec![Electrical, Plumbing, Insulation]),
            (Painting, vec![Drywall]),
            (Flooring, vec![Painting]),
        ]);

        let cure_days = HashMap::from([(Foundation, 7), (ConcretePour, 3), (Drywall, 2)]);

        Self {
            principles,
            feedback_history: Vec::new(),
            sequencing,
            cure_days,
        }
    }

    pub fn principle(&self, id: &str) -> Option<&ConstructionPrinciple> {
        self.principles.get(id)
    }

    pub fn principle_count(&self) -> usize {
        self.principles.len()
    }

    pub fn feedback_history(&self) -> &[PrincipleFeedback] {
        &self.feedback_history
    }

    /// Evaluate every principle's category check against the pair, returning
    /// only violated ones, strongest (importance x confidence) first.
    pub fn apply_principles(
        &self,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
    ) -> Vec<PrincipleAssessment> {
        let mut assessments: Vec<PrincipleAssessment> = self
            .principles
            .values()
            .filter_map(|p| {
                self.category_check(p.category, a, b).map(|reason| PrincipleAssessment {
                    principle: p.clone(),
                    violated: true,
                    confidence: p.confidence,
                    reason,
                })
            })
            .collect();

        assessments.sort_by(|x, y| {
            y.principle
                .weight()
                .partial_cmp(&x.principle.weight())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| x.principle.id.cmp(&y.principle.id))
        });
        assessments
    }

    fn category_check(
        &self,
        category: PrincipleCategory,
        a: &ScheduledEvent,
        b: &ScheduledEvent,
    ) -> Option<String> {
        match category {
            PrincipleCategory::Sequencing => self
                .sequencing_issue(a, b)
                .or_else(|| self.sequencing_issue(b, a)),
            PrincipleCategory::Safety => self.overhead_issue(a, b).or_else(|| self.overhead_issue(b, a)),
            PrincipleCategory::Quality => self.cure_issue(a, b).or_else(|| self.cure_issue(b, a)),
            _ => None,
        }
    }

    /// Dependent starting before its prerequisite is finished.
    fn sequencing_issue(&self, pre: &ScheduledEvent, dep: &ScheduledEvent) -> Option<String> {
        let prereqs = self.sequencing.get(&dep.event_type)?;
        if prereqs.contains(&pre.event_type) && dep.start_time < pre.end_time {
            Some(format!(
                "{} starts before {} is finished",
                dep.event_type.label(),
                pre.event_type.label()
            ))
        } else {
            None
        }
    }

    /// Any trade working under an active overhead hazard.
    fn overhead_issue(&self, hazard: &ScheduledEvent, below: &ScheduledEvent) -> Option<String> {
        let overhead = matches!(
            hazard.event_type,
            ActivityType::Roofing | ActivityType::Demolition
        );
        if overhead && hazard.event_type != below.event_type && hazard.overlaps(below) {
            Some(format!(
                "{} is scheduled while {} is active overhead",
                below.event_type.label(),
                hazard.event_type.label()
            ))
        } else {
            None
        }
    }

    /// Dependent work inside a prerequisite's cure/dry window.
    fn cure_issue(&self, pre: &ScheduledEvent, dep: &ScheduledEvent) -> Option<String> {
        let days = *self.cure_days.get(&pre.event_type)?;
        let prereqs = self.sequencing.get(&dep.event_type)?;
        if !prereqs.contains(&pre.event_type) {
            return None;
        }
        let elapsed = (dep.start_time - pre.end_time).num_days();
        if elapsed < days {
            Some(format!(
                "{} needs {} cure days before {}, only {} scheduled",
                pre.event_type.label(),
                days,
                dep.event_type.label(),
                elapsed.max(0)
            ))
        } else {
            None
        }
    }

    /// Record one feedback entry. Three local effects, always in this order:
    /// append to history, nudge the named principle's confidence, then mine
    /// the trailing window for a repeated rejection pattern. Returns the
    /// prepared learning-backend request; submitting it is the caller's
    /// (detached) concern and its failure never rolls anything back here.
    pub fn record_feedback(&mut self, feedback: PrincipleFeedback) -> FeedbackOutcome {
        self.feedback_history.push(feedback.clone());

        if let Some(principle) = self.principles.get_mut(&feedback.principle_id) {
            match feedback.action {
                FeedbackAction::Accepted => {
                    principle.confidence = (principle.confidence + ACCEPT_STEP).min(1.0);
                }
                FeedbackAction::Rejected => {
                    principle.confidence =
                        (principle.confidence - REJECT_STEP).max(CONFIDENCE_FLOOR);
                }
                FeedbackAction::Modified => {}
            }
        }

        let newly_learned = self.mine_rejection_patterns();

        let request = LearningRequest::new(
            feedback,
            LearningContext {
                principles: self.export_principles(),
                recent_history: self
                    .feedback_history
                    .iter()
                    .rev()
                    .take(CONTEXT_HISTORY)
                    .rev()
                    .cloned()
                    .collect(),
            },
        );

        FeedbackOutcome {
            request,
            newly_learned,
        }
    }

    /// Group the trailing window by (type, type); any group rejected often
    /// enough yields one learned sequencing principle, deduplicated by the
    /// pair-derived id.
    fn mine_rejection_patterns(&mut self) -> Vec<ConstructionPrinciple> {
        let window = self
            .feedback_history
            .iter()
            .rev()
            .take(PATTERN_WINDOW)
            .collect::<Vec<_>>();

        let mut groups: HashMap<(ActivityType, ActivityType), (usize, usize)> = HashMap::new();
        for entry in &window {
            let counts = groups
                .entry((entry.event_type_a, entry.event_type_b))
                .or_default();
            counts.0 += 1;
            if entry.action == FeedbackAction::Rejected {
                counts.1 += 1;
            }
        }

        let mut learned = Vec::new();
        let mut pairs: Vec<_> = groups.into_iter().collect();
        pairs.sort_by_key(|((a, b), _)| (*a, *b));

        for ((type_a, type_b), (total, rejected)) in pairs {
            if total < PATTERN_MIN_SAMPLES {
                continue;
            }
            if (rejected as f64 / total as f64) <= PATTERN_REJECTION_RATE {
                continue;
            }
            let id = format!("learned_{}_{}", type_a.as_str(), type_b.as_str());
            if self.principles.contains_key(&id) {
                continue;
            }

            let examples: Vec<String> = self
                .feedback_history
                .iter()
                .rev()
                .take(PATTERN_WINDOW)
                .filter(|f| {
                    f.event_type_a == type_a
                        && f.event_type_b == type_b
                        && !f.context.is_empty()
                })
                .take(3)
                .map(|f| f.context.clone())
                .collect();

            let mut principle = ConstructionPrinciple::new(
                id.clone(),
                format!("Learned: {} and {} scheduling", type_a.label(), type_b.label()),
                PrincipleCategory::Sequencing,
                format!(
                    "Suggestions pairing {} with {} were rejected {rejected} of {total} times; \
                     these trades need different sequencing",
                    type_a.label(),
                    type_b.label()
                ),
                LEARNED_IMPORTANCE,
                LEARNED_CONFIDENCE,
            )
            .with_conditions(&[&type_a.label(), &type_b.label()]);
            principle.examples = examples;
            principle.learned = true;

            self.principles.insert(id, principle.clone());
            learned.push(principle);
        }

        learned
    }

    /// Advisory lookup: principles whose conditions mention the type
    /// (case-insensitive, underscores as spaces), most important first.
    pub fn get_recommendations(&self, event_type: ActivityType) -> Vec<&ConstructionPrinciple> {
        let needle = event_type.label().to_lowercase();
        let mut matches: Vec<&ConstructionPrinciple> = self
            .principles
            .values()
            .filter(|p| {
                p.conditions
                    .iter()
                    .any(|c| c.to_lowercase().contains(&needle))
            })
            .collect();
        matches.sort_by(|a, b| b.importance.cmp(&a.importance).then_with(|| a.id.cmp(&b.id)));
        matches
    }

    /// Merge a learning-backend response: updated principles replace by id,
    /// new ones are added as learned.
    pub fn merge_remote(&mut self, response: LearningResponse) {
        if let Some(updated) = response.updated_principles {
            for principle in updated {
                if let Some(existing) = self.principles.get_mut(&principle.id) {
                    *existing = principle;
                }
            }
        }
        if let Some(new) = response.new_principles {
            for mut principle in new {
                principle.learned = true;
                self.principles
                    .entry(principle.id.clone())
                    .or_insert(principle);
            }
        }
    }

    /// Flat snapshot of all principles, ordered by id.
    pub fn export_principles(&self) -> Vec<ConstructionPrinciple> {
        let mut all: Vec<_> = self.principles.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Import principles learned in another context, applying a fixed trust
    /// discount to each confidence. Returns the number imported.
    pub fn import_principles(&mut self, principles: Vec<ConstructionPrinciple>) -> usize {
        let mut count = 0;
        for mut principle in principles {
            principle.confidence = (principle.confidence * IMPORT_DISCOUNT).clamp(0.0, 1.0);
            self.principles.insert(principle.id.clone(), principle);
            count += 1;
        }
        count
    }

    /// JSON import. On a parse error the engine is untouched; the caller
    /// decides whether to log or surface it.
    pub fn import_json(&mut self, data: &str) -> Result<usize> {
        let principles: Vec<ConstructionPrinciple> = serde_json::from_str(data)?;
        Ok(self.import_principles(principles))
    }
}

impl Default for PrinciplesEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 8, 0, 0).unwrap()
    }

    fn feedback(
        principle_id: &str,
        a: ActivityType,
        b: ActivityType,
        action: FeedbackAction,
    ) -> PrincipleFeedback {
        PrincipleFeedback {
            principle_id: principle_id.to_string(),
            event_type_a: a,
            event_type_b: b,
            action,
            context: String::new(),
            timestamp: day(1),
        }
    }

    #[test]
    fn test_apply_principles_flags_misordered_framing() {
        let engine = PrinciplesEngine::new();
        let foundation = ScheduledEvent::new("f", ActivityType::Foundation, day(5), day(7));
        let framing = ScheduledEvent::new("fr", ActivityType::Framing, day(1), day(3));

        let assessments = engine.apply_principles(&foundation, &framing);
        assert!(!assessments.is_empty());
        assert!(assessments.iter().all(|a| a.violated));
        // Sequencing and quality both trip for this pair
        assert!(assessments
            .iter()
            .any(|a| a.principle.category == PrincipleCategory::Sequencing));
        assert!(assessments
            .iter()
            .any(|a| a.principle.category == PrincipleCategory::Quality));
        // Sorted by importance x confidence, descending
        let weights: Vec<f64> = assessments.iter().map(|a| a.principle.weight()).collect();
        assert!(weights.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_apply_principles_clean_pair_is_empty() {
        let engine = PrinciplesEngine::new();
        let foundation = ScheduledEvent::new("f", ActivityType::Foundation, day(1), day(2));
        let framing = ScheduledEvent::new("fr", ActivityType::Framing, day(12), day(14));
        assert!(engine.apply_principles(&foundation, &framing).is_empty());
    }

    #[test]
    fn test_overhead_check_is_direction_free() {
        let engine = PrinciplesEngine::new();
        let roofing = ScheduledEvent::new("r", ActivityType::Roofing, day(1), day(3));
        let painting = ScheduledEvent::new("p", ActivityType::Painting, day(2), day(4));

        let forward = engine.apply_principles(&roofing, &painting);
        let reverse = engine.apply_principles(&painting, &roofing);
        assert_eq!(forward.len(), reverse.len());
        assert!(forward
            .iter()
            .any(|a| a.principle.category == PrincipleCategory::Safety));
    }

    #[test]
    fn test_confidence_caps_at_one() {
        let mut engine = PrinciplesEngine::new();
        let id = "seq_foundation_before_framing";
        for _ in 0..40 {
            engine.record_feedback(feedback(
                id,
                ActivityType::Foundation,
                ActivityType::Framing,
                FeedbackAction::Accepted,
            ));
        }
        assert_eq!(engine.principle(id).unwrap().confidence, 1.0);
    }

    #[test]
    fn test_confidence_floors_at_point_three() {
        let mut engine = PrinciplesEngine::new();
        let id = "eff_group_trade_visits";
        for _ in 0..40 {
            engine.record_feedback(feedback(
                id,
                ActivityType::Electrical,
                ActivityType::Painting,
                FeedbackAction::Modified,
            ));
        }
        // Modified never moves confidence
        assert_eq!(engine.principle(id).unwrap().confidence, 0.7);

        for _ in 0..40 {
            engine.record_feedback(feedback(
                id,
                ActivityType::Hvac,
                ActivityType::Flooring,
                FeedbackAction::Rejected,
            ));
        }
        assert_eq!(engine.principle(id).unwrap().confidence, CONFIDENCE_FLOOR);
    }

    proptest! {
        #[test]
        fn prop_confidence_stays_in_bounds(actions in prop::collection::vec(0u8..3, 0..120)) {
            let mut engine = PrinciplesEngine::new();
            let id = "seq_drywall_before_paint";
            for a in actions {
                let action = match a {
                    0 => FeedbackAction::Accepted,
                    1 => FeedbackAction::Rejected,
                    _ => FeedbackAction::Modified,
                };
                engine.record_feedback(feedback(
                    id,
                    ActivityType::Drywall,
                    ActivityType::Painting,
                    action,
                ));
                let c = engine.principle(id).unwrap().confidence;
                prop_assert!((CONFIDENCE_FLOOR..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_feedback_history_is_append_only_even_for_unknown_ids() {
        let mut engine = PrinciplesEngine::new();
        engine.record_feedback(feedback(
            "no_such_principle",
            ActivityType::Framing,
            ActivityType::Roofing,
            FeedbackAction::Accepted,
        ));
        assert_eq!(engine.feedback_history().len(), 1);
    }

    #[test]
    fn test_repeated_rejections_synthesize_one_learned_principle() {
        let mut engine = PrinciplesEngine::new();
        let before = engine.principle_count();

        let mut outcomes = Vec::new();
        for _ in 0..5 {
            outcomes.push(engine.record_feedback(feedback(
                "seq_drywall_before_paint",
                ActivityType::Drywall,
                ActivityType::Flooring,
                FeedbackAction::Rejected,
            )));
        }

        assert_eq!(engine.principle_count(), before + 1);
        let learned = engine.principle("learned_drywall_flooring").unwrap();
        assert!(learned.learned);
        assert_eq!(learned.importance, LEARNED_IMPORTANCE);
        assert_eq!(learned.confidence, LEARNED_CONFIDENCE);
        assert_eq!(learned.category, PrincipleCategory::Sequencing);
        // Only the fifth entry crossed the threshold
        assert!(outcomes[..4].iter().all(|o| o.newly_learned.is_empty()));
        assert_eq!(outcomes[4].newly_learned.len(), 1);

        // The same pattern again does not duplicate
        for _ in 0..5 {
            engine.record_feedback(feedback(
                "seq_drywall_before_paint",
                ActivityType::Drywall,
                ActivityType::Flooring,
                FeedbackAction::Rejected,
            ));
        }
        assert_eq!(engine.principle_count(), before + 1);
    }

    #[test]
    fn test_low_rejection_rate_does_not_synthesize() {
        let mut engine = PrinciplesEngine::new();
        let before = engine.principle_count();
        // 3 of 5 rejected: 60% is under the 70% bar
        for action in [
            FeedbackAction::Rejected,
            FeedbackAction::Rejected,
            FeedbackAction::Rejected,
            FeedbackAction::Accepted,
            FeedbackAction::Accepted,
        ] {
            engine.record_feedback(feedback(
                "seq_drywall_before_paint",
                ActivityType::Painting,
                ActivityType::Flooring,
                action,
            ));
        }
        assert_eq!(engine.principle_count(), before);
    }

    #[test]
    fn test_pattern_window_is_trailing_fifty() {
        let mut engine = PrinciplesEngine::new();
        let before = engine.principle_count();

        // Four rejections, then enough unrelated entries to push them out
        for _ in 0..4 {
            engine.record_feedback(feedback(
                "x",
                ActivityType::Hvac,
                ActivityType::Insulation,
                FeedbackAction::Rejected,
            ));
        }
        for _ in 0..50 {
            engine.record_feedback(feedback(
                "y",
                ActivityType::Painting,
                ActivityType::Painting,
                FeedbackAction::Accepted,
            ));
        }
        // A fifth rejection, but the earlier four are outside the window now
        engine.record_feedback(feedback(
            "x",
            ActivityType::Hvac,
            ActivityType::Insulation,
            FeedbackAction::Rejected,
        ));
        assert!(engine.principle("learned_hvac_insulation").is_none());
        assert_eq!(engine.principle_count(), before);
    }

    #[test]
    fn test_recommendations_match_conditions_and_sort_by_importance() {
        let engine = PrinciplesEngine::new();
        let recs = engine.get_recommendations(ActivityType::Framing);
        assert!(!recs.is_empty());
        assert!(recs
            .iter()
            .all(|p| p.conditions.iter().any(|c| c.contains("framing"))));
        let importances: Vec<u8> = recs.iter().map(|p| p.importance).collect();
        assert!(importances.windows(2).all(|w| w[0] >= w[1]));

        // concrete_pour matches via its spaced label
        let recs = engine.get_recommendations(ActivityType::ConcretePour);
        assert!(recs.iter().any(|p| p.id == "quality_concrete_cure"));
    }

    #[test]
    fn test_export_import_applies_trust_discount() {
        let mut source = PrinciplesEngine::new();
        for _ in 0..5 {
            source.record_feedback(feedback(
                "seq_drywall_before_paint",
                ActivityType::Drywall,
                ActivityType::Flooring,
                FeedbackAction::Rejected,
            ));
        }
        let exported = source.export_principles();

        let mut fresh = PrinciplesEngine::new();
        let imported = fresh.import_principles(exported.clone());
        assert_eq!(imported, exported.len());
        for principle in &exported {
            let got = fresh.principle(&principle.id).unwrap();
            let expected = (principle.confidence * IMPORT_DISCOUNT).clamp(0.0, 1.0);
            assert!((got.confidence - expected).abs() < 1e-9);
        }
        assert!(fresh.principle("learned_drywall_flooring").is_some());
    }

    #[test]
    fn test_import_json_error_leaves_engine_untouched() {
        let mut engine = PrinciplesEngine::new();
        let before = engine.export_principles();
        assert!(engine.import_json("{not json").is_err());
        assert_eq!(engine.export_principles(), before);
    }

    #[test]
    fn test_merge_remote_replaces_and_adds() {
        let mut engine = PrinciplesEngine::new();
        let mut updated = engine.principle("seq_drywall_before_paint").unwrap().clone();
        updated.confidence = 0.42;

        let incoming = ConstructionPrinciple::new(
            "remote_tip",
            "Remote tip",
            PrincipleCategory::Efficiency,
            "From the backend",
            3,
            0.5,
        );
        // Unknown ids in updated_principles are ignored, not inserted
        let stranger = ConstructionPrinciple::new(
            "never_seen",
            "Stranger",
            PrincipleCategory::Safety,
            "",
            9,
            0.9,
        );

        engine.merge_remote(LearningResponse {
            updated_principles: Some(vec![updated, stranger]),
            new_principles: Some(vec![incoming]),
        });

        assert_eq!(
            engine.principle("seq_drywall_before_paint").unwrap().confidence,
            0.42
        );
        assert!(engine.principle("never_seen").is_none());
        let added = engine.principle("remote_tip").unwrap();
        assert!(added.learned);
    }

    #[test]
    fn test_record_feedback_prepares_request_with_context() {
        let mut engine = PrinciplesEngine::new();
        let outcome = engine.record_feedback(feedback(
            "seq_foundation_before_framing",
            ActivityType::Foundation,
            ActivityType::Framing,
            FeedbackAction::Accepted,
        ));
        assert_eq!(outcome.request.kind, "construction_principle");
        assert_eq!(outcome.request.context.recent_history.len(), 1);
        assert_eq!(
            outcome.request.context.principles.len(),
            engine.principle_count()
        );
    }
}
