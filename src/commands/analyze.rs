use crate::analyzers::StrategyKind;
use crate::config::{self, BigoConfig};
use crate::core::JsLanguageVariant;
use crate::engine::{analyze_path, AnalysisOptions, FileAnalysis};
use crate::io::{output, walker};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct AnalyzeConfig {
    pub paths: Vec<PathBuf>,
    pub format: Option<output::OutputFormat>,
    pub strategy: Option<StrategyKind>,
    pub evidence: bool,
    pub max_passes: Option<usize>,
    pub config: Option<PathBuf>,
}

/// Settings after layering command-line flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub options: AnalysisOptions,
    pub format: output::OutputFormat,
    pub evidence: bool,
    pub exclude: Vec<String>,
}

pub fn resolve_settings(config: &AnalyzeConfig, file_config: &BigoConfig) -> ResolvedSettings {
    let mut options = file_config.analysis_options();
    if let Some(strategy) = config.strategy {
        options.strategy = strategy;
    }
    if config.max_passes.is_some() {
        options.max_passes = config.max_passes;
    }

    ResolvedSettings {
        options,
        format: config.format.unwrap_or(file_config.output.format),
        evidence: config.evidence || file_config.output.evidence,
        exclude: file_config.files.exclude.clone(),
    }
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let file_config = match &config.config {
        Some(path) => config::load_config_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::load_config(),
    };
    let settings = resolve_settings(&config, &file_config);

    let files = collect_files(&config.paths, &settings.exclude)?;
    info!(files = files.len(), strategy = %settings.options.strategy, "Analyzing");
    let results = analyze_files(&files, &settings.options)?;

    let mut writer = output::create_writer(settings.format, settings.evidence);
    writer.write_results(&results)?;
    Ok(())
}

/// Expand directories into their source files; explicit files are kept as given.
pub fn collect_files(paths: &[PathBuf], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let found = walker::find_source_files(path, exclude.to_vec())
                .with_context(|| format!("Failed to walk {}", path.display()))?;
            debug!(root = %path.display(), files = found.len(), "Discovered source files");
            files.extend(found);
        } else if path.is_file() {
            if is_supported(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping {}: not a JavaScript or TypeScript file", path.display());
            }
        } else {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    JsLanguageVariant::from_path(path).is_some()
}

/// Analyze every file in parallel; each file owns its inventory.
pub fn analyze_files(files: &[PathBuf], options: &AnalysisOptions) -> Result<Vec<FileAnalysis>> {
    let mut results = files
        .par_iter()
        .map(|path| {
            analyze_path(path, options)
                .with_context(|| format!("Failed to analyze {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    results.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(results)
}
