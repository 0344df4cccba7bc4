//! Tree-sitter parser integration for JavaScript/TypeScript
//!
//! Provides parsing using tree-sitter grammars for JS/TS/JSX/TSX.

use crate::core::{JsAst, JsLanguageVariant, SourcePosition};
use crate::errors::{Error, Result};
use tree_sitter::{Language as TsLanguage, Node, Parser};

/// Get the tree-sitter language for a JS variant
fn get_language(variant: JsLanguageVariant) -> TsLanguage {
    match variant {
        JsLanguageVariant::JavaScript | JsLanguageVariant::Jsx => {
            tree_sitter_javascript::LANGUAGE.into()
        }
        JsLanguageVariant::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        JsLanguageVariant::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// Parse JavaScript/TypeScript source code into a tree-sitter AST
pub fn parse_source(content: &str, variant: JsLanguageVariant) -> Result<JsAst> {
    let mut parser = Parser::new();
    let language = get_language(variant);

    parser
        .set_language(&language)
        .map_err(|e| Error::parse(format!("failed to set tree-sitter language: {}", e)))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| Error::parse("tree-sitter returned no tree"))?;

    Ok(JsAst {
        tree,
        source: content.to_string(),
        variant,
    })
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Get the column number for a tree-sitter node (1-indexed)
pub fn node_column(node: &Node) -> usize {
    node.start_position().column + 1
}

pub fn node_position(node: &Node) -> SourcePosition {
    SourcePosition::new(node_line(node), node_column(node))
}

/// Node text with every comment inside it removed
pub fn text_without_comments(node: &Node, source: &str) -> String {
    let mut comments = Vec::new();
    collect_comment_ranges(node, &mut comments);

    let mut text = String::with_capacity(node.end_byte() - node.start_byte());
    let mut cursor = node.start_byte();
    for (start, end) in comments {
        text.push_str(&source[cursor..start]);
        cursor = end;
    }
    text.push_str(&source[cursor..node.end_byte()]);
    text
}

fn collect_comment_ranges(node: &Node, ranges: &mut Vec<(usize, usize)>) {
    if node.kind() == "comment" {
        ranges.push((node.start_byte(), node.end_byte()));
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_comment_ranges(&child, ranges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_javascript() {
        let ast = parse_source(
            "function hello() { return 'world'; }",
            JsLanguageVariant::JavaScript,
        )
        .unwrap();
        assert!(!ast.tree.root_node().has_error());
        assert_eq!(ast.variant, JsLanguageVariant::JavaScript);
    }

    #[test]
    fn test_parse_typescript() {
        let source = "function hello(name: string): string { return `Hello ${name}`; }";
        let ast = parse_source(source, JsLanguageVariant::TypeScript).unwrap();
        assert!(!ast.tree.root_node().has_error());
    }

    #[test]
    fn test_parse_tsx() {
        let source = "const App: React.FC = () => <div>Hello</div>;";
        let ast = parse_source(source, JsLanguageVariant::Tsx).unwrap();
        assert_eq!(ast.variant, JsLanguageVariant::Tsx);
    }

    #[test]
    fn test_broken_source_still_yields_tree() {
        let ast = parse_source("function (( {", JsLanguageVariant::JavaScript).unwrap();
        assert!(ast.tree.root_node().has_error());
    }

    #[test]
    fn test_node_text_and_position() {
        let source = "const x = 42;\n  let y = 24;";
        let ast = parse_source(source, JsLanguageVariant::JavaScript).unwrap();
        let root = ast.tree.root_node();
        assert_eq!(node_text(&root, &ast.source), source);

        let second = root.named_child(1).unwrap();
        assert_eq!(node_position(&second), SourcePosition::new(2, 3));
    }

    #[test]
    fn test_text_without_comments() {
        let source = "function f() {\n  // for (;;) {}\n  return /* inline */ 1;\n}";
        let ast = parse_source(source, JsLanguageVariant::JavaScript).unwrap();
        let root = ast.tree.root_node();
        let stripped = text_without_comments(&root, &ast.source);
        assert!(!stripped.contains("for"));
        assert!(!stripped.contains("inline"));
        assert!(stripped.contains("return  1;"));
    }
}
