//! Tree-sitter parsing of script bodies

use crate::language::{ScriptLang, get_tree_sitter_language};
use anyhow::{Result, anyhow};
use tree_sitter::{Node, Parser, Tree};

/// Parse a script body. The resulting tree may contain ERROR nodes; the
/// adapter tolerates in-progress edits and only needs the outer structure.
pub fn parse_script(text: &str, lang: ScriptLang) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&get_tree_sitter_language(lang))
        .map_err(|e| anyhow!("Failed to set parser language: {}", e))?;

    parser
        .parse(text, None)
        .ok_or_else(|| anyhow!("Failed to parse {:?} script", lang))
}

/// Parse a script body and reject it when tree-sitter had to recover from
/// any syntax error.
pub fn parse_script_strict(text: &str, lang: ScriptLang) -> Result<Tree> {
    let tree = parse_script(text, lang)?;
    if tree.root_node().has_error() {
        return Err(anyhow!("Script contains syntax errors"));
    }
    Ok(tree)
}

/// Text covered by `node`
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Named children of `node`, collected so callers can iterate freely
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Depth-first search for a descendant whose kind starts with `prefix`
pub fn contains_kind_prefix(node: &Node, prefix: &str) -> bool {
    if node.kind().starts_with(prefix) {
        return true;
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| contains_kind_prefix(&child, prefix));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typescript_generic_call() {
        let tree = parse_script_strict(
            "const props = defineProps<{ msg: string }>()",
            ScriptLang::TypeScript,
        )
        .unwrap();
        assert_eq!(tree.root_node().kind(), "program");
    }

    #[test]
    fn test_strict_parse_rejects_broken_code() {
        assert!(parse_script_strict("const a = {", ScriptLang::JavaScript).is_err());
        assert!(parse_script("const a = {", ScriptLang::JavaScript).is_ok());
    }

    #[test]
    fn test_contains_jsx() {
        let code = "function App() { return <div>hi</div> }";
        let tree = parse_script(code, ScriptLang::JavaScript).unwrap();
        assert!(contains_kind_prefix(&tree.root_node(), "jsx_"));
    }
}
