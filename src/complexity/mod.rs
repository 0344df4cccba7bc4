//! Complexity inference shared by every extraction strategy
//!
//! - [`builtins`]: immutable name tables (keywords, globals, array methods)
//! - [`local`]: rules that turn a body's observed shape into a local estimate
//! - [`propagation`]: the call-graph fixed point over a function inventory

pub mod builtins;
pub mod local;
pub mod propagation;

pub use local::{
    estimate, halving_bounds_loop, mentions_identifier, Assignment, HalvingStep, LocalEstimate,
    LoopNesting, RecursiveArgument, RecursiveCall, ShapeFindings,
};
pub use propagation::{
    default_pass_limit, propagate, propagate_with_limit, PropagationOutcome,
};
