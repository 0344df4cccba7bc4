use crate::core::{ComplexityClass, FunctionResult};
use crate::engine::FileAnalysis;
use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait OutputWriter {
    fn write_results(&mut self, results: &[FileAnalysis]) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_results(&mut self, results: &[FileAnalysis]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }
}

/// One line per function: `path:line:col  name  O(..)`, evidence indented below.
pub struct TextWriter<W: Write> {
    writer: W,
    evidence: bool,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            evidence: false,
        }
    }

    pub fn with_evidence(mut self, evidence: bool) -> Self {
        self.evidence = evidence;
        self
    }

    fn write_function(&mut self, file: &FileAnalysis, function: &FunctionResult) -> anyhow::Result<()> {
        let location = format!(
            "{}:{}:{}",
            file.path.display(),
            function.position.line,
            function.position.column
        );
        writeln!(
            self.writer,
            "{}  {}  {}",
            location.dimmed(),
            function.name.bold(),
            paint_class(function.complexity)
        )?;
        if self.evidence {
            for line in &function.evidence {
                writeln!(self.writer, "    - {}", line)?;
            }
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TextWriter<W> {
    fn write_results(&mut self, results: &[FileAnalysis]) -> anyhow::Result<()> {
        let mut total = 0;
        for file in results {
            for function in &file.functions {
                self.write_function(file, function)?;
                total += 1;
            }
        }
        writeln!(
            self.writer,
            "{} function(s) in {} file(s)",
            total,
            results.len()
        )?;
        Ok(())
    }
}

fn paint_class(class: ComplexityClass) -> ColoredString {
    let text = class.as_str();
    match class {
        ComplexityClass::Constant | ComplexityClass::Logarithmic => text.green(),
        ComplexityClass::Linear | ComplexityClass::Linearithmic => text.yellow(),
        ComplexityClass::Quadratic | ComplexityClass::Cubic => text.red(),
        ComplexityClass::Exponential | ComplexityClass::Factorial => text.red().bold(),
    }
}

pub fn create_writer(format: OutputFormat, evidence: bool) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Text => Box::new(TextWriter::new(std::io::stdout()).with_evidence(evidence)),
    }
}
