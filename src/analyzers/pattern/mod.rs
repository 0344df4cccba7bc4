//! Regex-based extraction strategy
//!
//! A fallback for text the syntax tree strategy cannot serve. Function headers
//! are found with four structural matchers (declarations, function
//! expressions, arrow functions, methods); bodies are closed by bracket
//! matching on a copy of the document with comments and string contents
//! blanked, so byte offsets always refer to the source text.

pub mod calls;
pub mod classifier;
pub mod scanner;

use super::{finalize_inventory, ExtractionOptions, ExtractionStrategy};
use crate::complexity::builtins::is_control_keyword;
use crate::complexity::estimate;
use crate::core::{FunctionKind, FunctionRecord};
use crate::errors::Result;
use classifier::BodyText;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scanner::{expression_end, mask_source, matching_close, skip_whitespace, LineIndex};
use std::collections::HashSet;
use tracing::{debug, debug_span};

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfunction\b\s*(\*)?\s*([A-Za-z_$][\w$]*)\s*(?:<[^>]*>\s*)?\(").unwrap()
});
static FUNCTION_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([A-Za-z_$][\w$]*)\s*(?::\s*[^=;(){}]+?)?\s*[=:]\s*(?:async\s+)?function\b\s*(\*)?\s*(?:[A-Za-z_$][\w$]*)?\s*\(",
    )
    .unwrap()
});
static ARROW_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([A-Za-z_$][\w$]*)\s*(?::\s*[^=;(){}]+?)?\s*[=:]\s*(?:async\s+)?(?:\([^()]*\)|[A-Za-z_$][\w$]*)\s*(?::\s*[^=;{}]+?)?\s*=>",
    )
    .unwrap()
});
static METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*((?:(?:static|async|get|set|public|private|protected|readonly|override)\s+)*)\*?\s*(#?[A-Za-z_$][\w$]*)\s*(?:<[^>]*>\s*)?\(",
    )
    .unwrap()
});

/// Extraction by textual patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternStrategy {
    options: ExtractionOptions,
}

impl PatternStrategy {
    pub fn new(options: ExtractionOptions) -> Self {
        Self { options }
    }
}

/// A matched function header and the extent of its body.
#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    kind: FunctionKind,
    /// Offset reported as the function's position.
    anchor: usize,
    /// Start of the whole construct, header included.
    start: usize,
    body: (usize, usize),
}

impl Candidate {
    fn encloses(&self, other: &Candidate) -> bool {
        self.body.0 <= other.start && other.body.1 <= self.body.1 && self.start != other.start
    }
}

/// First `{` after a parameter list, allowing only a return type in between.
fn block_after_params(code: &str, params_close: usize) -> Option<usize> {
    let open = skip_whitespace(code, params_close + 1);
    if code[open..].starts_with('{') {
        return Some(open);
    }
    if !code[open..].starts_with(':') {
        return None;
    }
    let rest = &code[open..];
    let brace = rest.find(['{', ';', '}', '='])?;
    rest[brace..].starts_with('{').then_some(open + brace)
}

fn block_body(code: &str, open: usize) -> Option<(usize, usize)> {
    matching_close(code, open).map(|close| (open, close + 1))
}

/// Body of a function whose parameter list opens at `paren`.
fn params_then_block(code: &str, paren: usize) -> Option<(usize, usize)> {
    let close = matching_close(code, paren)?;
    block_body(code, block_after_params(code, close)?)
}

fn preceding_char(code: &str, offset: usize) -> Option<char> {
    code[..offset].trim_end().chars().next_back()
}

fn declaration(code: &str, caps: &Captures) -> Option<Candidate> {
    let m = caps.get(0)?;
    let name = caps.get(2)?;
    let kind = match preceding_char(code, m.start()) {
        // Bound function expressions are named by their binding
        Some('=' | ':') => return None,
        Some('(' | ',' | '[' | '!' | '&' | '|' | '?') => FunctionKind::Expression,
        _ if code[..m.start()].trim_end().ends_with("return") => FunctionKind::Expression,
        _ if caps.get(1).is_some() => FunctionKind::Generator,
        _ => FunctionKind::Declaration,
    };
    Some(Candidate {
        name: name.as_str().to_string(),
        kind,
        anchor: m.start(),
        start: m.start(),
        body: params_then_block(code, m.end() - 1)?,
    })
}

fn function_expression(code: &str, caps: &Captures) -> Option<Candidate> {
    let m = caps.get(0)?;
    let name = caps.get(1)?;
    let kind = if caps.get(2).is_some() {
        FunctionKind::Generator
    } else {
        FunctionKind::Expression
    };
    Some(Candidate {
        name: name.as_str().to_string(),
        kind,
        anchor: name.start(),
        start: name.start(),
        body: params_then_block(code, m.end() - 1)?,
    })
}

fn arrow_function(code: &str, caps: &Captures) -> Option<Candidate> {
    let m = caps.get(0)?;
    let name = caps.get(1)?;
    let body_start = skip_whitespace(code, m.end());
    let body = if code[body_start..].starts_with('{') {
        block_body(code, body_start)?
    } else {
        (body_start, expression_end(code, body_start))
    };
    Some(Candidate {
        name: name.as_str().to_string(),
        kind: FunctionKind::Arrow,
        anchor: name.start(),
        start: name.start(),
        body,
    })
}

fn method(code: &str, caps: &Captures) -> Option<Candidate> {
    let m = caps.get(0)?;
    let modifiers = caps.get(1)?;
    let name = caps.get(2)?;
    if is_control_keyword(name.as_str()) {
        return None;
    }
    let kind = match modifiers.as_str().split_whitespace().last() {
        Some("get") => FunctionKind::Getter,
        Some("set") => FunctionKind::Setter,
        _ => FunctionKind::Method,
    };
    Some(Candidate {
        name: name.as_str().to_string(),
        kind,
        anchor: modifiers.start(),
        start: modifiers.start(),
        body: params_then_block(code, m.end() - 1)?,
    })
}

fn find_candidates(code: &str) -> Vec<Candidate> {
    let matchers: [(&Lazy<Regex>, fn(&str, &Captures) -> Option<Candidate>); 4] = [
        (&DECLARATION, declaration),
        (&FUNCTION_EXPRESSION, function_expression),
        (&ARROW_FUNCTION, arrow_function),
        (&METHOD, method),
    ];

    matchers
        .iter()
        .flat_map(|(pattern, build)| {
            pattern
                .captures_iter(code)
                .filter_map(|caps| build(code, &caps))
                .collect::<Vec<_>>()
        })
        .filter(|candidate| !is_control_keyword(&candidate.name))
        .collect()
}

/// Replace the given ranges (relative to `base`) with spaces.
fn blank_ranges(text: &str, base: usize, ranges: &[(usize, usize)]) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for &(start, end) in ranges {
        for byte in &mut bytes[start - base..end - base] {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
    }
    // Ranges start and end on ASCII brackets or identifiers
    String::from_utf8(bytes).unwrap_or_else(|_| text.to_string())
}

impl PatternStrategy {
    fn build_record(
        &self,
        candidate: &Candidate,
        nested: &[(usize, usize)],
        masked: &scanner::MaskedSource,
        lines: &LineIndex,
    ) -> Result<FunctionRecord> {
        let (start, end) = candidate.body;
        let code = blank_ranges(&masked.code_only[start..end], start, nested);
        let plain = blank_ranges(&masked.without_comments[start..end], start, nested);
        let body = BodyText {
            code: &code,
            plain: &plain,
            offset: start,
        };

        let findings = classifier::collect_findings(&body, &candidate.name, lines)?;
        let local = estimate(&findings);
        let calls = calls::extract_calls(&code, &self.options);

        Ok(FunctionRecord::new(
            candidate.name.clone(),
            lines.position(candidate.anchor),
            candidate.kind,
            masked.without_comments[start..end].to_string(),
        )
        .with_calls(calls)
        .with_local_estimate(local.complexity, local.evidence))
    }
}

impl ExtractionStrategy for PatternStrategy {
    fn extract(&self, source: &str) -> Result<Vec<FunctionRecord>> {
        let _span = debug_span!("pattern_extract").entered();
        let start = std::time::Instant::now();

        let masked = mask_source(source);
        let lines = LineIndex::new(source);

        let mut seen = HashSet::new();
        let mut candidates: Vec<Candidate> = find_candidates(&masked.code_only)
            .into_iter()
            .filter(|c| seen.insert((c.name.clone(), lines.line(c.anchor))))
            .collect();
        candidates.sort_by_key(|c| c.start);

        let records = candidates
            .iter()
            .map(|candidate| {
                let nested: Vec<(usize, usize)> = candidates
                    .iter()
                    .filter(|other| candidate.encloses(other))
                    .map(|other| (other.start, other.body.1))
                    .collect();
                self.build_record(candidate, &nested, &masked, &lines)
            })
            .collect::<Result<Vec<_>>>()?;
        let records = finalize_inventory(records);

        debug!(
            functions = records.len(),
            time_ms = start.elapsed().as_millis(),
            bytes = source.len(),
            "Built function inventory"
        );
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}
