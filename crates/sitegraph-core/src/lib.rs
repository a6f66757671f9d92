//! # Sitegraph Core Library
//!
//! Core scheduling intelligence for construction projects: detects when two
//! scheduled trade activities violate domain rules and proposes adjustments
//! that resolve the violations. All operations are available from this
//! library directly; the CLI binary is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Trade Dependency Graph**: static lookup of prerequisites, exclusions,
//!   cure/dry lag, and weather/inspection sensitivities per activity type
//! - **Conflict Detector**: scans all pairs of scheduled events with a
//!   pluggable rule set filtered by an analysis perspective, producing
//!   violations, suggestions, and a 0-100 health score
//! - **Schedule Resolver**: single forward pass proposing start/end
//!   adjustments that satisfy dependency ordering and minimum lag
//! - **Principles Engine**: confidence-weighted advisory rules tuned by user
//!   feedback, with learned-principle synthesis and an injected learning
//!   backend
//!
//! Detection and resolution are pure and synchronous; the only suspension
//! point in the crate is the detached learning submission.
//!
//! ## Key Components
//!
//! - [`TradeGraph`]: the dependency catalog
//! - [`ConflictDetector`]: schedule analysis
//! - [`ScheduleResolver`]: adjustment proposals
//! - [`PrinciplesEngine`]: adaptive recommendations and feedback

pub mod conflict;
pub mod error;
pub mod events;
pub mod principles;
pub mod resolver;
pub mod trades;

pub use conflict::{Conflict, ConflictAnalysis, ConflictDetector, Perspective, RuleKind, Severity};
pub use error::{CoreError, LearningError, Result, ValidationError};
pub use events::{ScheduledEvent, WeatherCondition, WeatherSnapshot};
pub use principles::{
    ConstructionPrinciple, FeedbackAction, FeedbackOutcome, PrincipleAssessment,
    PrincipleCategory, PrincipleFeedback, PrinciplesEngine,
};
pub use resolver::{ScheduleAdjustment, ScheduleConstraints, ScheduleResolver};
pub use trades::{ActivityType, TradeDependency, TradeGraph};
