//! Adaptive principles: catalog, engine, and the learning-backend boundary.

pub mod catalog;
pub mod engine;
pub mod learning;

pub use catalog::builtin_principles;
pub use engine::{
    ConstructionPrinciple, FeedbackAction, FeedbackOutcome, PrincipleAssessment,
    PrincipleCategory, PrincipleFeedback, PrinciplesEngine,
};
pub use learning::{
    submit_feedback, HttpLearningClient, LearningClient, LearningContext, LearningRequest,
    LearningResponse, NoopLearningClient,
};
