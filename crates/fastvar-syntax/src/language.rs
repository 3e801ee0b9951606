//! Language tags and tree-sitter language lookup
//!
//! The editor host tells us which structural language the active file is in;
//! that tag only decides which dialect entry point runs.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tree_sitter::Language;

/// Structural language of the whole component file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    Vue,
    Svelte,
    /// `.jsx` / `.js` function components
    Jsx,
    /// `.tsx` function components
    Tsx,
}

impl LanguageTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageTag::Vue => "vue",
            LanguageTag::Svelte => "svelte",
            LanguageTag::Jsx => "jsx",
            LanguageTag::Tsx => "tsx",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "vue" => Ok(LanguageTag::Vue),
            "svelte" => Ok(LanguageTag::Svelte),
            "jsx" | "javascriptreact" | "javascript" | "js" => Ok(LanguageTag::Jsx),
            "tsx" | "typescriptreact" => Ok(LanguageTag::Tsx),
            other => Err(anyhow!("Unsupported language tag: {}", other)),
        }
    }
}

/// Detect the language tag from a file path's extension
pub fn detect_language_from_extension(path: &Path) -> Option<LanguageTag> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "vue" => Some(LanguageTag::Vue),
        "svelte" => Some(LanguageTag::Svelte),
        "jsx" | "js" | "mjs" => Some(LanguageTag::Jsx),
        "tsx" => Some(LanguageTag::Tsx),
        _ => None,
    }
}

/// Flavor of a script body handed to tree-sitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptLang {
    /// JavaScript, JSX included
    JavaScript,
    TypeScript,
    Tsx,
}

impl ScriptLang {
    /// Map a `lang="..."` attribute value; anything unknown is JavaScript
    pub fn from_lang_attr(lang: Option<&str>) -> Self {
        match lang.map(|l| l.to_ascii_lowercase()) {
            Some(l) if l == "ts" || l == "typescript" => ScriptLang::TypeScript,
            Some(l) if l == "tsx" => ScriptLang::Tsx,
            _ => ScriptLang::JavaScript,
        }
    }

    pub fn is_typescript(&self) -> bool {
        matches!(self, ScriptLang::TypeScript | ScriptLang::Tsx)
    }
}

/// Get the tree-sitter grammar for a script flavor
pub fn get_tree_sitter_language(lang: ScriptLang) -> Language {
    match lang {
        ScriptLang::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        ScriptLang::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        ScriptLang::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}
