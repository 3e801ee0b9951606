//! fastvar structural parser adapter
//!
//! Reads component source files (Vue single file components, Svelte
//! components, JSX/TSX function components) well enough to tell where a new
//! declaration belongs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fastvar_syntax::{classify, LanguageTag};
//!
//! let classified = classify(text, LanguageTag::Vue);
//! if let Some(script) = classified.classification.script() {
//!     // regions::find_option_member(&script.tree, script.source(), script.base(), "methods")
//! }
//! ```

// Core infrastructure
pub mod document;
pub mod language;
pub mod patterns;

// Parsing layers
pub mod classify;
pub mod regions;
pub mod script;
pub mod sfc;

pub use classify::{BlockClassification, Classified, ScriptBlock, StagedEdit, classify, classify_with};
pub use document::{Position, Range, SourceDocument};
pub use language::{LanguageTag, ScriptLang, detect_language_from_extension, get_tree_sitter_language};
pub use patterns::{PatternName, PatternTable};
pub use regions::{ObjectRegion, OptionsFlavor, Region};

// Tests module (only compiled during testing)
#[cfg(test)]
pub mod tests;
