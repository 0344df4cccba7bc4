// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod complexity;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod io;

// Re-export commonly used types
pub use crate::core::{
    ComplexityClass, FunctionKind, FunctionRecord, FunctionResult, JsLanguageVariant,
    SourcePosition,
};

pub use crate::analyzers::{
    get_strategy, ExtractionOptions, ExtractionStrategy, PatternStrategy, StrategyKind,
    SyntaxTreeStrategy,
};

pub use crate::complexity::{propagate, propagate_with_limit, PropagationOutcome};

pub use crate::engine::{
    analyze, analyze_path, analyze_source, try_analyze, Analysis, AnalysisOptions, FileAnalysis,
};

pub use crate::errors::{Error, Result};
