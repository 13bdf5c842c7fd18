//! Yoga rule engine.
//!
//! Rulesets are JSON documents in one of two dialects. The weighted dialect
//! scores named signals and classifies the result with `strong_if` /
//! `active_if`; the conditions dialect requires every listed condition to
//! hold. See [`ruleset`] for the document shape.

pub mod conditions;
pub mod context;
pub mod engine;
pub mod expr;
pub mod patterns;
pub mod predicates;
pub mod ruleset;

pub use context::YogaContext;
pub use engine::{evaluate, evaluate_all, TraceEntry, YogaResult, YogaStatus};
pub use patterns::NamedPattern;
pub use predicates::{Predicate, Reference};
pub use ruleset::{Dialect, Ruleset, RulesetStore};
