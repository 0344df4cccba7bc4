use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source dialect of a JavaScript-family document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JsLanguageVariant {
    #[default]
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl JsLanguageVariant {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Variant for a path, if its extension is one we analyze.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn is_typescript(self) -> bool {
        matches!(self, Self::TypeScript | Self::Tsx)
    }
}

/// A parsed document: the tree-sitter tree plus the text it was built from.
#[derive(Clone, Debug)]
pub struct JsAst {
    pub tree: tree_sitter::Tree,
    pub source: String,
    pub variant: JsLanguageVariant,
}
