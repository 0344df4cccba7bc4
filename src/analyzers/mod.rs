//! Function inventory extraction
//!
//! An [`ExtractionStrategy`] turns document text into a function inventory:
//! one [`FunctionRecord`] per named function-like unit, in document order,
//! each carrying its callee names and local estimate. Propagation only ever
//! sees the inventory, so strategies are interchangeable.

use crate::core::{FunctionRecord, JsLanguageVariant};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

pub mod javascript;
pub mod pattern;

pub use javascript::SyntaxTreeStrategy;
pub use pattern::PatternStrategy;

pub trait ExtractionStrategy: Send + Sync {
    /// Build the classified inventory for one document.
    fn extract(&self, source: &str) -> Result<Vec<FunctionRecord>>;

    fn name(&self) -> &'static str;
}

/// Which extraction strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// tree-sitter syntax tree traversal
    #[default]
    #[serde(alias = "syntax-tree")]
    Ast,
    /// Regex matching on raw text
    Pattern,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Ast => f.write_str("ast"),
            StrategyKind::Pattern => f.write_str("pattern"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ast" | "syntax-tree" => Ok(StrategyKind::Ast),
            "pattern" | "regex" => Ok(StrategyKind::Pattern),
            other => Err(format!("unknown extraction strategy: {}", other)),
        }
    }
}

/// Settings shared by all strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOptions {
    /// Callee names never recorded, on top of the built-in tables.
    pub ignored_callees: BTreeSet<String>,
}

impl ExtractionOptions {
    pub fn with_ignored_callees<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_callees.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_callees.contains(name)
    }
}

/// Create the strategy for `kind`.
pub fn get_strategy(
    kind: StrategyKind,
    variant: JsLanguageVariant,
    options: ExtractionOptions,
) -> Box<dyn ExtractionStrategy> {
    match kind {
        StrategyKind::Ast => Box::new(SyntaxTreeStrategy::new(variant, options)),
        StrategyKind::Pattern => Box::new(PatternStrategy::new(options)),
    }
}

/// Drop records that repeat an earlier `(name, line)` and restore document order.
pub(crate) fn finalize_inventory(records: Vec<FunctionRecord>) -> Vec<FunctionRecord> {
    let mut seen = HashSet::new();
    let mut unique: Vec<FunctionRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect();
    unique.sort_by_key(|record| record.position);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FunctionKind, SourcePosition};

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!("ast".parse::<StrategyKind>(), Ok(StrategyKind::Ast));
        assert_eq!("Pattern".parse::<StrategyKind>(), Ok(StrategyKind::Pattern));
        assert_eq!("regex".parse::<StrategyKind>(), Ok(StrategyKind::Pattern));
        assert!("llm".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::default().to_string(), "ast");
    }

    #[test]
    fn test_get_strategy_names() {
        let options = ExtractionOptions::default();
        let ast = get_strategy(
            StrategyKind::Ast,
            JsLanguageVariant::JavaScript,
            options.clone(),
        );
        let pattern = get_strategy(StrategyKind::Pattern, JsLanguageVariant::JavaScript, options);
        assert_eq!(ast.name(), "syntax-tree");
        assert_eq!(pattern.name(), "pattern");
    }

    #[test]
    fn test_finalize_inventory_dedups_and_sorts() {
        let make = |name: &str, line: usize, column: usize| {
            FunctionRecord::new(
                name,
                SourcePosition::new(line, column),
                FunctionKind::Declaration,
                "",
            )
        };
        let records = vec![
            make("b", 7, 1),
            make("a", 2, 1),
            make("b", 7, 5),
            make("b", 9, 1),
        ];
        let finalized = finalize_inventory(records);
        let keys: Vec<(String, usize)> = finalized.iter().map(|r| r.dedup_key()).collect();
        assert_eq!(
            keys,
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 7),
                ("b".to_string(), 9)
            ]
        );
        assert_eq!(finalized[1].position.column, 1);
    }

    #[test]
    fn test_ignored_callees() {
        let options = ExtractionOptions::default().with_ignored_callees(["assert", "log"]);
        assert!(options.is_ignored("assert"));
        assert!(!options.is_ignored("merge"));
    }
}
