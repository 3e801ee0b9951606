//! Named extraction patterns, one table per component dialect
//!
//! Every regex the adapter and the scanners rely on lives here, keyed by a
//! `PatternName`, so a dialect only sees the patterns that make sense for it.

use crate::language::LanguageTag;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternName {
    /// `<script setup></script>` with an all-whitespace body, or `<script setup />`
    EmptySetupBlock,
    /// `const x =`, `let x: T =`, `var x =`
    Binding,
    /// `const [a, setA] =`
    ArrayPatternBinding,
    /// `const { a, b: c } =`
    ObjectPatternBinding,
    /// `function name`
    FunctionDecl,
    /// the clause between `import` and `from`
    ImportClause,
    /// a whole import statement, multi-line clauses included
    ImportStatement,
    /// `onMounted(`, `watch(` and friends
    LifecycleCall,
    /// `const name = (...) =>`
    ArrowFunctionDecl,
    /// `function name(`
    FunctionHead,
    /// `'name'`, `"name"` or `` `name` ``
    QuotedName,
    StyleOpen,
    StyleClose,
}

const IDENT: &str = r"[A-Za-z_$][\w$]*";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("pattern table regexes are compile-time constants")
}

fn script_patterns() -> Vec<(PatternName, Regex)> {
    vec![
        (
            PatternName::Binding,
            compile(&format!(r"\b(?:const|let|var)\s+({IDENT})\s*(?::[^=;\n]+)?="))
        ),
        (
            PatternName::ArrayPatternBinding,
            compile(r"\b(?:const|let|var)\s+\[([^\]]*)\]\s*(?::[^=;\n]+)?="),
        ),
        (
            PatternName::ObjectPatternBinding,
            compile(r"\b(?:const|let|var)\s+\{([^}]*)\}\s*(?::[^=;\n]+)?="),
        ),
        (
            PatternName::FunctionDecl,
            compile(&format!(r"\bfunction\s*\*?\s*({IDENT})")),
        ),
        (
            PatternName::ImportClause,
            compile(r#"\bimport\s+(?:type\s+)?([^'";]+?)\s+from\s*['"]"#),
        ),
        (
            PatternName::ImportStatement,
            compile(r#"(?m)^[ \t]*import\b[^'"]*?['"][^'"\n]*['"][ \t]*;?"#),
        ),
        (
            PatternName::ArrowFunctionDecl,
            compile(&format!(
                r"\b(?:const|let|var)\s+{IDENT}\s*(?::[^=;\n]+)?=\s*(?:async\s*)?(?:\([^)]*\)|{IDENT})\s*=>"
            )),
        ),
        (
            PatternName::FunctionHead,
            compile(&format!(r"\b(?:async\s+)?function\s*\*?\s*{IDENT}\s*\(")),
        ),
        (PatternName::QuotedName, compile(r#"['"`]([^'"`\s]+)['"`]"#)),
    ]
}

fn style_patterns() -> Vec<(PatternName, Regex)> {
    vec![
        (PatternName::StyleOpen, compile(r"<style\b([^>]*)>")),
        (PatternName::StyleClose, compile(r"</style\s*>")),
    ]
}

/// Compiled patterns for one language tag
#[derive(Debug)]
pub struct PatternTable {
    language: LanguageTag,
    patterns: HashMap<PatternName, Regex>,
}

static VUE_TABLE: LazyLock<PatternTable> = LazyLock::new(|| {
    let mut patterns: HashMap<_, _> = script_patterns().into_iter().collect();
    patterns.extend(style_patterns());
    patterns.insert(
        PatternName::EmptySetupBlock,
        compile(r"<script\b[^>]*\bsetup\b[^>]*?(?:\s*/>|>(\s*)</script\s*>)"),
    );
    patterns.insert(
        PatternName::LifecycleCall,
        compile(
            r"(?m)^[ \t]*(?:watch|watchEffect|onMounted|onBeforeMount|onBeforeUnmount|onUnmounted|onBeforeUpdate|onUpdated|onActivated|onDeactivated)\s*\(",
        ),
    );
    PatternTable {
        language: LanguageTag::Vue,
        patterns,
    }
});

static SVELTE_TABLE: LazyLock<PatternTable> = LazyLock::new(|| {
    let mut patterns: HashMap<_, _> = script_patterns().into_iter().collect();
    patterns.extend(style_patterns());
    patterns.insert(
        PatternName::LifecycleCall,
        compile(r"(?m)^[ \t]*(?:onMount|onDestroy|beforeUpdate|afterUpdate)\s*\("),
    );
    PatternTable {
        language: LanguageTag::Svelte,
        patterns,
    }
});

static JSX_TABLE: LazyLock<PatternTable> = LazyLock::new(|| PatternTable {
    language: LanguageTag::Jsx,
    patterns: script_patterns().into_iter().collect(),
});

static TSX_TABLE: LazyLock<PatternTable> = LazyLock::new(|| PatternTable {
    language: LanguageTag::Tsx,
    patterns: script_patterns().into_iter().collect(),
});

impl PatternTable {
    pub fn for_language(language: LanguageTag) -> &'static PatternTable {
        match language {
            LanguageTag::Vue => &VUE_TABLE,
            LanguageTag::Svelte => &SVELTE_TABLE,
            LanguageTag::Jsx => &JSX_TABLE,
            LanguageTag::Tsx => &TSX_TABLE,
        }
    }

    pub fn language(&self) -> LanguageTag {
        self.language
    }

    pub fn get(&self, name: PatternName) -> Option<&Regex> {
        self.patterns.get(&name)
    }

    /// First capture group of every match of `name` in `text`
    pub fn captures(&self, name: PatternName, text: &str) -> Vec<String> {
        let Some(re) = self.get(name) else {
            return Vec::new();
        };
        re.captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_pattern_accepts_type_annotations() {
        let table = PatternTable::for_language(LanguageTag::Vue);
        let names = table.captures(
            PatternName::Binding,
            "const count = ref(0)\nlet total: number = 1\nvar $el = null",
        );
        assert_eq!(names, vec!["count", "total", "$el"]);
    }

    #[test]
    fn test_empty_setup_block_variants() {
        let table = PatternTable::for_language(LanguageTag::Vue);
        let re = table.get(PatternName::EmptySetupBlock).unwrap();
        assert!(re.is_match("<script setup>\n\n</script>"));
        assert!(re.is_match(r#"<script setup lang="ts"></script>"#));
        assert!(re.is_match("<script setup />"));
        assert!(!re.is_match("<script setup>\nconst a = 1\n</script>"));
        assert!(!re.is_match("<script>\n</script>"));
    }

    #[test]
    fn test_import_statement_spans_multiline_clause() {
        let table = PatternTable::for_language(LanguageTag::Vue);
        let code = "import { ref,\n  computed } from 'vue'\nimport './style.css'\nconst a = 1";
        let re = table.get(PatternName::ImportStatement).unwrap();
        let matches: Vec<&str> = re.find_iter(code).map(|m| m.as_str()).collect();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].ends_with("'vue'"));
    }

    #[test]
    fn test_lifecycle_call_starts_a_statement() {
        let table = PatternTable::for_language(LanguageTag::Vue);
        let re = table.get(PatternName::LifecycleCall).unwrap();
        assert!(re.is_match("const a = 1\n  onMounted(() => {})"));
        assert!(re.is_match("watch(source, cb)"));
        assert!(!re.is_match("const stop = store.watch(getter)"));
        assert!(!re.is_match("const unwatch = watch(source, cb)"));
    }

    #[test]
    fn test_jsx_table_has_no_style_patterns() {
        let table = PatternTable::for_language(LanguageTag::Jsx);
        assert!(table.get(PatternName::StyleClose).is_none());
        assert!(table.get(PatternName::Binding).is_some());
    }
}
