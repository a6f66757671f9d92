//! Trade dependency graph.
//!
//! Static lookup describing, per activity type, which trades must precede it,
//! which may never run concurrently with it, required lag before/after, and
//! weather/inspection sensitivities. Read-only after construction; the
//! detector and resolver only ever borrow it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of construction work.
///
/// Unknown inputs deserialize to [`ActivityType::Other`], which has no entry
/// in the graph -- absence is a valid, permissive default, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Excavation,
    Foundation,
    ConcretePour,
    Framing,
    Roofing,
    Plumbing,
    Electrical,
    Hvac,
    Insulation,
    Drywall,
    Painting,
    Flooring,
    Landscaping,
    Inspection,
    Demolition,
    WeatherAlert,
    #[serde(other)]
    Other,
}

impl ActivityType {
    /// Snake_case identifier, matching the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excavation => "excavation",
            Self::Foundation => "foundation",
            Self::ConcretePour => "concrete_pour",
            Self::Framing => "framing",
            Self::Roofing => "roofing",
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
            Self::Hvac => "hvac",
            Self::Insulation => "insulation",
            Self::Drywall => "drywall",
            Self::Painting => "painting",
            Self::Flooring => "flooring",
            Self::Landscaping => "landscaping",
            Self::Inspection => "inspection",
            Self::Demolition => "demolition",
            Self::WeatherAlert => "weather_alert",
            Self::Other => "other",
        }
    }

    /// Human-readable label (underscores replaced by spaces).
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Parse a snake_case identifier. Unknown strings map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "excavation" => Self::Excavation,
            "foundation" => Self::Foundation,
            "concrete_pour" => Self::ConcretePour,
            "framing" => Self::Framing,
            "roofing" => Self::Roofing,
            "plumbing" => Self::Plumbing,
            "electrical" => Self::Electrical,
            "hvac" => Self::Hvac,
            "insulation" => Self::Insulation,
            "drywall" => Self::Drywall,
            "painting" => Self::Painting,
            "flooring" => Self::Flooring,
            "landscaping" => Self::Landscaping,
            "inspection" => Self::Inspection,
            "demolition" => Self::Demolition,
            "weather_alert" => Self::WeatherAlert,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dependency record for one activity type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeDependency {
    /// Types that must finish (subject to lag) before this type starts
    #[serde(default)]
    pub depends_on: Vec<ActivityType>,

    /// Types this one may never run concurrently with (symmetric)
    #[serde(default)]
    pub cannot_overlap_with: Vec<ActivityType>,

    /// Lag in days required before this type may start, relative to a
    /// dependency's end
    pub minimum_days_before: Option<i64>,

    /// Lag in days this type's completion imposes on dependents
    /// (e.g. concrete cure time)
    pub minimum_days_after: Option<i64>,

    #[serde(default)]
    pub weather_sensitive: bool,

    #[serde(default)]
    pub requires_inspection: bool,
}

impl TradeDependency {
    fn new(depends_on: &[ActivityType]) -> Self {
        Self {
            depends_on: depends_on.to_vec(),
            ..Default::default()
        }
    }

    fn cannot_overlap(mut self, types: &[ActivityType]) -> Self {
        self.cannot_overlap_with = types.to_vec();
        self
    }

    fn days_before(mut self, days: i64) -> Self {
        self.minimum_days_before = Some(days);
        self
    }

    fn days_after(mut self, days: i64) -> Self {
        self.minimum_days_after = Some(days);
        self
    }

    fn weather_sensitive(mut self) -> Self {
        self.weather_sensitive = true;
        self
    }

    fn requires_inspection(mut self) -> Self {
        self.requires_inspection = true;
        self
    }
}

/// Static map from activity type to its prerequisites, exclusions, lag
/// requirements, and sensitivities.
///
/// The `depends_on` relation must be acyclic; the resolver assumes a valid
/// topological order exists. A cycle is a configuration error, not a runtime
/// condition this crate recovers from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeGraph {
    entries: HashMap<ActivityType, TradeDependency>,
}

impl TradeGraph {
    /// Empty graph: every type gets the permissive default.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Built-in catalog for standard residential construction trades.
    pub fn standard() -> Self {
        use ActivityType::*;

        let mut entries = HashMap::new();

        entries.insert(Excavation, TradeDependency::default().weather_sensitive());
        entries.insert(
            Foundation,
            TradeDependency::new(&[Excavation])
                .cannot_overlap(&[Demolition])
                .days_after(7) // concrete cure
                .weather_sensitive()
                .requires_inspection(),
        );
        entries.insert(
            ConcretePour,
            TradeDependency::new(&[Excavation])
                .days_after(3)
                .weather_sensitive(),
        );
        entries.insert(
            Framing,
            TradeDependency::new(&[Foundation])
                .cannot_overlap(&[Demolition])
                .days_before(3)
                .requires_inspection(),
        );
        entries.insert(
            Roofing,
            TradeDependency::new(&[Framing])
                .cannot_overlap(&[Demolition])
                .weather_sensitive(),
        );
        entries.insert(
            Plumbing,
            TradeDependency::new(&[Framing])
                .cannot_overlap(&[Drywall, Demolition])
                .requires_inspection(),
        );
        entries.insert(
            Electrical,
            TradeDependency::new(&[Framing])
                .cannot_overlap(&[Drywall, Demolition])
                .requires_inspection(),
        );
        entries.insert(
            Hvac,
            TradeDependency::new(&[Framing]).cannot_overlap(&[Drywall, Demolition]),
        );
        entries.insert(
            Insulation,
            TradeDependency::new(&[Plumbing, Electrical, Hvac]),
        );
        entries.insert(
            Drywall,
            TradeDependency::new(&[Electrical, Plumbing, Insulation])
                .days_after(2) // joint compound dry time
                .requires_inspection(),
        );
        entries.insert(Painting, TradeDependency::new(&[Drywall]).days_after(1));
        entries.insert(Flooring, TradeDependency::new(&[Painting]));
        entries.insert(
            Landscaping,
            TradeDependency::new(&[Excavation]).weather_sensitive(),
        );
        entries.insert(
            Demolition,
            TradeDependency::default().cannot_overlap(&[
                Foundation, Framing, Roofing, Plumbing, Electrical, Hvac, Insulation, Drywall,
                Painting, Flooring,
            ]),
        );

        Self { entries }
    }

    /// Add or replace an entry (custom graphs, tests).
    pub fn with_dependency(mut self, ty: ActivityType, dep: TradeDependency) -> Self {
        self.entries.insert(ty, dep);
        self
    }

    /// Look up a type's record. `None` means the permissive default.
    pub fn dependency(&self, ty: ActivityType) -> Option<&TradeDependency> {
        self.entries.get(&ty)
    }

    /// Does `dependent` list `prerequisite` as a direct dependency?
    pub fn depends_on(&self, dependent: ActivityType, prerequisite: ActivityType) -> bool {
        self.entries
            .get(&dependent)
            .map(|d| d.depends_on.contains(&prerequisite))
            .unwrap_or(false)
    }

    /// Mutual-exclusion check, enforced in both directions.
    pub fn cannot_overlap(&self, a: ActivityType, b: ActivityType) -> bool {
        let listed = |x: ActivityType, y: ActivityType| {
            self.entries
                .get(&x)
                .map(|d| d.cannot_overlap_with.contains(&y))
                .unwrap_or(false)
        };
        listed(a, b) || listed(b, a)
    }

    /// Cure/dry lag (days) that `ty`'s completion imposes on dependents.
    pub fn minimum_days_after(&self, ty: ActivityType) -> Option<i64> {
        self.entries.get(&ty).and_then(|d| d.minimum_days_after)
    }

    pub fn is_weather_sensitive(&self, ty: ActivityType) -> bool {
        self.entries
            .get(&ty)
            .map(|d| d.weather_sensitive)
            .unwrap_or(false)
    }

    pub fn requires_inspection(&self, ty: ActivityType) -> bool {
        self.entries
            .get(&ty)
            .map(|d| d.requires_inspection)
            .unwrap_or(false)
    }
}

impl Default for TradeGraph {
    fn default() -> Self {
        Self::standard()
    }
}
