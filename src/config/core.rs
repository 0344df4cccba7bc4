use serde::{Deserialize, Serialize};

use crate::analyzers::{ExtractionOptions, StrategyKind};
use crate::engine::AnalysisOptions;
use crate::errors::{Error, Result};
use crate::io::output::OutputFormat;

/// Root configuration structure for bigo
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BigoConfig {
    /// Extraction and propagation settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Call extraction settings
    #[serde(default)]
    pub calls: CallsConfig,

    /// File discovery settings
    #[serde(default)]
    pub files: FilesConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Extraction strategy: "ast" (default) or "pattern"
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Propagation pass ceiling (defaults to 8 x number of functions + 1)
    #[serde(default)]
    pub max_passes: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CallsConfig {
    /// Callee names never treated as call-graph edges
    #[serde(default)]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FilesConfig {
    /// Glob patterns excluded from directory walks
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Print the evidence behind every estimate
    #[serde(default)]
    pub evidence: bool,
}

impl BigoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.analysis.max_passes == Some(0) {
            return Err(Error::config("analysis.max_passes must be at least 1"));
        }
        for pattern in &self.files.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                Error::config(format!("invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }

    pub fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions::default().with_ignored_callees(self.calls.ignore.iter().cloned())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            strategy: self.analysis.strategy,
            max_passes: self.analysis.max_passes,
            extraction: self.extraction_options(),
        }
    }
}

/// Contents written by `bigo init`.
pub const DEFAULT_CONFIG: &str = r#"# bigo configuration

[analysis]
# "ast" parses with tree-sitter; "pattern" matches function shapes with regexes
strategy = "ast"
# max_passes = 100

[calls]
# Callee names that never count as calls to your own functions
ignore = []

[files]
exclude = [
    "**/*.min.js",
    "dist/**",
    "build/**",
]

[output]
format = "text"
evidence = false
"#;
