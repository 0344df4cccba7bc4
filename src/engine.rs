//! Analysis entry points
//!
//! One analysis owns its inventory from extraction to report: extract with a
//! strategy, propagate over the call graph, convert to results. Nothing is
//! shared between runs, so files can be analyzed in parallel.

use crate::analyzers::{get_strategy, ExtractionOptions, ExtractionStrategy, StrategyKind};
use crate::complexity::{default_pass_limit, propagate_with_limit, PropagationOutcome};
use crate::core::{FunctionResult, JsLanguageVariant};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, warn};

/// Settings for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub strategy: StrategyKind,
    /// Propagation pass ceiling; `None` uses [`default_pass_limit`].
    pub max_passes: Option<usize>,
    pub extraction: ExtractionOptions,
}

/// Results of one document together with how propagation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub functions: Vec<FunctionResult>,
    pub outcome: PropagationOutcome,
}

/// Results for one file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub functions: Vec<FunctionResult>,
}

/// Analyze a document, reporting one result per named function in document order.
///
/// Never fails: when the strategy cannot produce an inventory the failure is
/// logged and the result list is empty.
pub fn analyze(source: &str, strategy: &dyn ExtractionStrategy) -> Vec<FunctionResult> {
    match try_analyze(source, strategy, None) {
        Ok(analysis) => analysis.functions,
        Err(e) => {
            warn!(strategy = strategy.name(), "Analysis failed: {}", e);
            Vec::new()
        }
    }
}

/// Analyze a document, surfacing extraction failures and the propagation outcome.
pub fn try_analyze(
    source: &str,
    strategy: &dyn ExtractionStrategy,
    max_passes: Option<usize>,
) -> Result<Analysis> {
    let _span = debug_span!("analyze", strategy = strategy.name()).entered();

    let mut records = strategy.extract(source)?;
    let limit = max_passes.unwrap_or_else(|| default_pass_limit(records.len()));
    let outcome = propagate_with_limit(&mut records, limit);

    debug!(
        functions = records.len(),
        passes = outcome.passes,
        promotions = outcome.promotions,
        "Analysis complete"
    );

    Ok(Analysis {
        functions: records.iter().map(|record| record.to_result()).collect(),
        outcome,
    })
}

/// Analyze source text of a known language variant.
pub fn analyze_source(
    source: &str,
    variant: JsLanguageVariant,
    options: &AnalysisOptions,
) -> Result<Analysis> {
    let strategy = get_strategy(options.strategy, variant, options.extraction.clone());
    try_analyze(source, strategy.as_ref(), options.max_passes)
}

/// Read and analyze one file, choosing the grammar from its extension.
///
/// A file the parser cannot handle yields an empty function list; only I/O
/// failures and unsupported extensions are errors. Bytes that are not UTF-8
/// are replaced rather than failing the file.
pub fn analyze_path(path: &Path, options: &AnalysisOptions) -> Result<FileAnalysis> {
    let variant = JsLanguageVariant::from_path(path)
        .ok_or_else(|| Error::UnsupportedLanguage(path.to_path_buf()))?;
    let bytes = std::fs::read(path)
        .map_err(|e| Error::file_system("Failed to read source file", path, e))?;
    let source = decode_source(path, bytes);

    let functions = match analyze_source(&source, variant, options) {
        Ok(analysis) => analysis.functions,
        Err(Error::Parse(message)) => {
            warn!(path = %path.display(), "Skipping unparsable file: {}", message);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    Ok(FileAnalysis {
        path: path.to_path_buf(),
        functions,
    })
}

fn decode_source(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(e) => {
            warn!(
                path = %path.display(),
                offset = e.utf8_error().valid_up_to(),
                "Source is not valid UTF-8, replacing invalid bytes"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{PatternStrategy, SyntaxTreeStrategy};
    use crate::core::ComplexityClass;
    use indoc::indoc;
    use std::io::Write;

    const SOURCE: &str = indoc! {r#"
        function helper(items) {
            for (const a of items) {
                for (const b of items) {}
            }
        }
        function entry(items) {
            return helper(items);
        }
    "#};

    struct FailingStrategy;

    impl ExtractionStrategy for FailingStrategy {
        fn extract(&self, _source: &str) -> Result<Vec<crate::core::FunctionRecord>> {
            Err(Error::parse("no tree"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_analyze_propagates_across_calls() {
        let results = analyze(SOURCE, &SyntaxTreeStrategy::default());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "helper");
        assert_eq!(results[1].complexity, ComplexityClass::Quadratic);
        assert!(results[1]
            .evidence
            .iter()
            .any(|e| e.contains("via call to helper")));
    }

    #[test]
    fn test_strategies_agree_on_simple_source() {
        let ast = analyze(SOURCE, &SyntaxTreeStrategy::default());
        let pattern = analyze(SOURCE, &PatternStrategy::default());
        let classes = |results: &[FunctionResult]| {
            results
                .iter()
                .map(|r| (r.name.clone(), r.complexity))
                .collect::<Vec<_>>()
        };
        assert_eq!(classes(&ast), classes(&pattern));
    }

    #[test]
    fn test_analyze_swallows_extraction_failure() {
        assert!(analyze(SOURCE, &FailingStrategy).is_empty());
        assert!(matches!(
            try_analyze(SOURCE, &FailingStrategy, None),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_empty_source() {
        let analysis = try_analyze("", &SyntaxTreeStrategy::default(), None).unwrap();
        assert!(analysis.functions.is_empty());
        assert!(analysis.outcome.converged);
    }

    #[test]
    fn test_pass_ceiling_is_respected() {
        let analysis = try_analyze(SOURCE, &SyntaxTreeStrategy::default(), Some(1)).unwrap();
        assert_eq!(analysis.outcome.passes, 1);
    }

    #[test]
    fn test_analyze_path_picks_variant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sum.ts");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "const sum = (xs: number[]) => xs.reduce((a, b) => a + b, 0);").unwrap();

        let analysis = analyze_path(&path, &AnalysisOptions::default()).unwrap();
        assert_eq!(analysis.path, path);
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.functions[0].complexity, ComplexityClass::Linear);
    }

    #[test]
    fn test_analyze_path_tolerates_latin1_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.js");
        let mut bytes = b"// caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\nfunction label(items) {\n  return items.map((i) => \"");
        bytes.push(0xB0);
        bytes.extend_from_slice(b"\" + i);\n}\n");
        std::fs::write(&path, bytes).unwrap();

        let analysis = analyze_path(&path, &AnalysisOptions::default()).unwrap();
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.functions[0].name, "label");
        assert_eq!(analysis.functions[0].position.line, 2);
        assert_eq!(analysis.functions[0].complexity, ComplexityClass::Linear);
    }

    #[test]
    fn test_analyze_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let unsupported = dir.path().join("notes.txt");
        std::fs::write(&unsupported, "hello").unwrap();
        assert!(matches!(
            analyze_path(&unsupported, &AnalysisOptions::default()),
            Err(Error::UnsupportedLanguage(_))
        ));

        let missing = dir.path().join("missing.js");
        let err = analyze_path(&missing, &AnalysisOptions::default()).unwrap_err();
        assert_eq!(err.path(), Some(&missing));
    }
}
