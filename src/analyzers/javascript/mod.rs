//! TypeScript/JavaScript syntax tree strategy
//!
//! Builds the function inventory from a tree-sitter parse:
//!
//! - [`parser`]: grammar selection and node helpers
//! - [`inventory`]: function discovery and naming
//! - [`calls`]: callee name extraction
//! - [`classifier`]: loop, sort, halving and recursion shape collection
//!
//! # Example
//!
//! ```ignore
//! use bigo::analyzers::{ExtractionOptions, ExtractionStrategy, SyntaxTreeStrategy};
//! use bigo::core::JsLanguageVariant;
//!
//! let strategy = SyntaxTreeStrategy::new(JsLanguageVariant::JavaScript, ExtractionOptions::default());
//! let records = strategy.extract("function id(x) { return x; }")?;
//! ```

pub mod calls;
pub mod classifier;
pub mod inventory;
pub mod parser;

use super::{finalize_inventory, ExtractionOptions, ExtractionStrategy};
use crate::core::{FunctionRecord, JsLanguageVariant};
use crate::errors::Result;
use tracing::{debug, debug_span, warn};

/// Extraction over a tree-sitter syntax tree.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTreeStrategy {
    variant: JsLanguageVariant,
    options: ExtractionOptions,
}

impl SyntaxTreeStrategy {
    pub fn new(variant: JsLanguageVariant, options: ExtractionOptions) -> Self {
        Self { variant, options }
    }

    pub fn variant(&self) -> JsLanguageVariant {
        self.variant
    }
}

impl ExtractionStrategy for SyntaxTreeStrategy {
    fn extract(&self, source: &str) -> Result<Vec<FunctionRecord>> {
        let _span = debug_span!("syntax_tree_extract", variant = ?self.variant).entered();

        let start = std::time::Instant::now();
        let ast = parser::parse_source(source, self.variant)?;
        if ast.tree.root_node().has_error() {
            warn!("Source contains syntax errors; functions that failed to parse are skipped");
        }

        let records = finalize_inventory(inventory::extract_inventory(&ast, &self.options));

        debug!(
            functions = records.len(),
            time_ms = start.elapsed().as_millis(),
            bytes = source.len(),
            "Built function inventory"
        );
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "syntax-tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ComplexityClass;

    #[test]
    fn test_extract_classifies_each_function() {
        let strategy = SyntaxTreeStrategy::default();
        let records = strategy
            .extract("function a(xs) { for (const x of xs) {} }\nfunction b() { return a([]); }")
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].local_complexity, ComplexityClass::Linear);
        assert_eq!(records[1].local_complexity, ComplexityClass::Constant);
        assert!(records[1].calls.contains("a"));
    }

    #[test]
    fn test_extract_typescript_variant() {
        let strategy =
            SyntaxTreeStrategy::new(JsLanguageVariant::TypeScript, ExtractionOptions::default());
        let records = strategy
            .extract("const sum = (xs: number[]): number => xs.reduce((a, b) => a + b, 0);")
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "sum");
        assert_eq!(records[0].local_complexity, ComplexityClass::Linear);
        assert_eq!(strategy.variant(), JsLanguageVariant::TypeScript);
    }
}
