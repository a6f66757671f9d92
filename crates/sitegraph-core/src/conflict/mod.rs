//! Conflict rules and the pairwise schedule detector.

pub mod detector;
pub mod rules;

pub use detector::{Conflict, ConflictAnalysis, ConflictDetector, Perspective};
pub use rules::{builtin_rules, ConflictRule, RuleContext, RuleKind, Severity, Violation};
