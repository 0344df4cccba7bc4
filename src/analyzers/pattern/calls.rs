//! Call reference extraction over masked text

use crate::analyzers::ExtractionOptions;
use crate::complexity::builtins::is_control_keyword;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static CALL_SITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*\(").unwrap());

/// Distinct bare-identifier callees in `code`.
///
/// Member calls, constructor calls and function headers are skipped, as are
/// control-flow keywords that read like calls (`if (`, `while (`).
pub fn extract_calls(code: &str, options: &ExtractionOptions) -> BTreeSet<String> {
    CALL_SITE
        .captures_iter(code)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            let before = code[..name.start()].trim_end();
            if before.ends_with('.')
                || ends_with_word(before, "function")
                || ends_with_word(before, "new")
            {
                return None;
            }
            let name = name.as_str();
            (!is_control_keyword(name) && !options.is_ignored(name)).then(|| name.to_string())
        })
        .collect()
}

fn ends_with_word(text: &str, word: &str) -> bool {
    text.strip_suffix(word).is_some_and(|rest| {
        !rest.ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    })
}
