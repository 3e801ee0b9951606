// fastvar - create variables, methods and styles from where you use them
//!
//! Given a cursor inside a Vue, Svelte or JSX/TSX component, fastvar works
//! out where a declaration for the name under the cursor belongs (an options
//! object member, the setup script, the enclosing component function or the
//! style block), checks the name is free there and plans the edit that
//! creates it. Parsing lives in the `fastvar-syntax` crate.

pub mod applier;
pub mod cli;
pub mod collision;
pub mod config;
pub mod dialects;
pub mod errors;
pub mod indentation;
pub mod kinds;
pub mod plan;
pub mod resolver;
pub mod session;
pub mod transaction;

#[cfg(test)]
pub mod tests;

// Re-export common types
pub use config::FastVarConfig;
pub use errors::CreateError;
pub use kinds::{DeclarationKind, DialectKey, InitialValue};
pub use plan::InsertionPlan;
pub use session::{CreateRequest, CreateVariable, EditorHost, PresetAnswers};
