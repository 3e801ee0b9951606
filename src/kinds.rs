//! Declaration kinds, dialects and the menus offered to the user

use fastvar_syntax::{BlockClassification, OptionsFlavor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Component-authoring style of the active file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialectKey {
    /// `export default { ... }`
    LegacyExport,
    /// `export default defineComponent({ ... })`
    LegacyDefineComponent,
    /// `<script setup>`
    Composition,
    /// Svelte markup plus instance script
    Markup,
    /// JSX/TSX function components
    FunctionComponent,
}

impl DialectKey {
    pub fn of(classification: &BlockClassification) -> Option<Self> {
        match classification {
            BlockClassification::LegacyOptions(_, OptionsFlavor::ExportObject) => {
                Some(DialectKey::LegacyExport)
            }
            BlockClassification::LegacyOptions(_, OptionsFlavor::DefineComponent) => {
                Some(DialectKey::LegacyDefineComponent)
            }
            BlockClassification::CompositionSetup(_) => Some(DialectKey::Composition),
            BlockClassification::MarkupWithStyle(_) => Some(DialectKey::Markup),
            BlockClassification::FunctionComponent(_) => Some(DialectKey::FunctionComponent),
            BlockClassification::Unrecognized => None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, DialectKey::LegacyExport | DialectKey::LegacyDefineComponent)
    }

    /// Full vocabulary of the dialect in its default menu order
    pub fn vocabulary(&self) -> &'static [DeclarationKind] {
        use DeclarationKind::*;
        match self {
            DialectKey::LegacyExport | DialectKey::LegacyDefineComponent => {
                &[DataProperty, Method, ComputedProperty, Watcher, ScopedStyleRule]
            }
            DialectKey::Composition => &[
                Ref,
                Computed,
                Reactive,
                PlainFunction,
                ArrowFunction,
                ShallowRef,
                ShallowReactive,
                DeclaredProp,
                DeclaredEmit,
                ScopedStyleRule,
            ],
            DialectKey::Markup => &[
                LetBinding,
                ConstBinding,
                VarBinding,
                PlainFunction,
                ArrowFunction,
                ScopedStyleRule,
            ],
            DialectKey::FunctionComponent => &[StateHook, RefHook, PlainFunction, ArrowFunction],
        }
    }

    /// Look a picker label up in this dialect's vocabulary
    pub fn kind_from_label(&self, label: &str) -> Option<DeclarationKind> {
        self.vocabulary()
            .iter()
            .copied()
            .find(|kind| kind.label() == label)
    }
}

impl fmt::Display for DialectKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DialectKey::LegacyExport => "legacy-export",
            DialectKey::LegacyDefineComponent => "legacy-define-component",
            DialectKey::Composition => "composition",
            DialectKey::Markup => "markup",
            DialectKey::FunctionComponent => "function-component",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationKind {
    // legacy options
    DataProperty,
    Method,
    ComputedProperty,
    Watcher,
    // composition
    Ref,
    ShallowRef,
    Reactive,
    ShallowReactive,
    Computed,
    DeclaredProp,
    DeclaredEmit,
    // shared
    PlainFunction,
    ArrowFunction,
    ScopedStyleRule,
    // function components
    StateHook,
    RefHook,
    // svelte
    LetBinding,
    ConstBinding,
    VarBinding,
}

impl DeclarationKind {
    /// The label shown in the picker
    pub fn label(&self) -> &'static str {
        match self {
            DeclarationKind::DataProperty => "data",
            DeclarationKind::Method => "methods",
            DeclarationKind::ComputedProperty => "computed",
            DeclarationKind::Watcher => "watch",
            DeclarationKind::Ref => "ref",
            DeclarationKind::ShallowRef => "shallowRef",
            DeclarationKind::Reactive => "reactive",
            DeclarationKind::ShallowReactive => "shallowReactive",
            DeclarationKind::Computed => "computed",
            DeclarationKind::DeclaredProp => "defineProps",
            DeclarationKind::DeclaredEmit => "defineEmits",
            DeclarationKind::PlainFunction => "function",
            DeclarationKind::ArrowFunction => "arrowFunction",
            DeclarationKind::ScopedStyleRule => "scopedCss",
            DeclarationKind::StateHook => "useState",
            DeclarationKind::RefHook => "useRef",
            DeclarationKind::LetBinding => "let",
            DeclarationKind::ConstBinding => "const",
            DeclarationKind::VarBinding => "var",
        }
    }

    /// Kinds whose candidate may carry a call-site argument list
    pub fn is_function(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Method | DeclarationKind::PlainFunction | DeclarationKind::ArrowFunction
        )
    }

    pub fn is_style(&self) -> bool {
        matches!(self, DeclarationKind::ScopedStyleRule)
    }

    /// Kinds that prompt for an initial value
    pub fn takes_initial_value(&self) -> bool {
        matches!(
            self,
            DeclarationKind::DataProperty
                | DeclarationKind::Ref
                | DeclarationKind::ShallowRef
                | DeclarationKind::Reactive
                | DeclarationKind::ShallowReactive
                | DeclarationKind::StateHook
                | DeclarationKind::RefHook
                | DeclarationKind::LetBinding
                | DeclarationKind::ConstBinding
                | DeclarationKind::VarBinding
        )
    }

    /// Initial values offered for this kind
    pub fn initial_values(&self) -> &'static [InitialValue] {
        match self {
            DeclarationKind::Reactive | DeclarationKind::ShallowReactive => &OBJECT_VALUES,
            _ => &ALL_VALUES,
        }
    }

    /// Values offered for a candidate; a dotted candidate's value belongs to
    /// the member, not the container
    pub fn values_for(&self, dotted: bool) -> &'static [InitialValue] {
        if dotted { &ALL_VALUES } else { self.initial_values() }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A literal the new declaration starts out with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct InitialValue(&'static str);

pub const ALL_VALUES: [InitialValue; 8] = [
    InitialValue("[]"),
    InitialValue("{}"),
    InitialValue("''"),
    InitialValue("null"),
    InitialValue("undefined"),
    InitialValue("0"),
    InitialValue("true"),
    InitialValue("false"),
];

const OBJECT_VALUES: [InitialValue; 2] = [InitialValue("[]"), InitialValue("{}")];

impl InitialValue {
    pub fn literal(&self) -> &'static str {
        self.0
    }

    /// Accepts the literal itself; `""` is read as `''`
    pub fn parse(text: &str) -> Option<Self> {
        let text = match text.trim() {
            "\"\"" => "''",
            other => other,
        };
        ALL_VALUES.iter().copied().find(|v| v.0 == text)
    }

    /// TypeScript type inferred from the literal
    pub fn ts_type(&self) -> &'static str {
        match self.0 {
            "[]" => "any[]",
            "{}" => "Record<string, any>",
            "''" => "string",
            "0" => "number",
            "true" | "false" => "boolean",
            _ => "any",
        }
    }
}

impl fmt::Display for InitialValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

const VUE_STYLE_PREFIXES: &[&str] = &["class", ":class", "v-bind:class", "id", ":id", "v-bind:id"];
const VALUE_MODIFIERS: &[&str] = &[".trim", ".number", ".sync", ".lazy"];

/// Declaration kinds to offer, in order, for a dialect and attribute prefix
pub fn menu(dialect: DialectKey, prefix: Option<&str>, dotted: bool) -> Vec<DeclarationKind> {
    use DeclarationKind::*;
    let prefix = prefix.unwrap_or("");

    if dotted {
        return match dialect {
            DialectKey::LegacyExport | DialectKey::LegacyDefineComponent => vec![DataProperty],
            DialectKey::Composition => vec![Reactive, Ref],
            DialectKey::Markup => vec![ConstBinding, LetBinding],
            DialectKey::FunctionComponent => vec![StateHook],
        };
    }

    let mut kinds = dialect.vocabulary().to_vec();
    match dialect {
        DialectKey::FunctionComponent => {
            if is_jsx_event_attr(prefix) {
                kinds.retain(|k| k.is_function());
            }
        }
        DialectKey::Markup => {
            if prefix.starts_with("on:") {
                kinds.retain(|k| k.is_function());
            } else if prefix.starts_with("bind:") {
                kinds.retain(|k| !k.is_function());
            } else if prefix == "class" || prefix.starts_with("class:") || prefix == "id" {
                move_to_front(&mut kinds, |k| k.is_style());
            }
        }
        _ => {
            if prefix.starts_with('@') || prefix.starts_with("v-on:") {
                move_to_front(&mut kinds, |k| k.is_function());
            } else if VUE_STYLE_PREFIXES.contains(&prefix) {
                move_to_front(&mut kinds, |k| k.is_style());
            }
            if prefix.starts_with("v-model") || VALUE_MODIFIERS.iter().any(|m| prefix.contains(m)) {
                kinds.retain(|k| !k.is_function());
            }
        }
    }
    kinds
}

fn is_jsx_event_attr(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    chars.next() == Some('o')
        && chars.next() == Some('n')
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Stable partition: matching kinds first, relative order kept
fn move_to_front(kinds: &mut Vec<DeclarationKind>, matches: impl Fn(&DeclarationKind) -> bool) {
    let (mut front, back): (Vec<_>, Vec<_>) = kinds.iter().copied().partition(|k| matches(k));
    front.extend(back);
    *kinds = front;
}

#[cfg(test)]
mod tests {
    use super::*;
    use DeclarationKind::*;

    #[test]
    fn test_event_prefix_puts_functions_first() {
        let kinds = menu(DialectKey::Composition, Some("@click"), false);
        assert_eq!(&kinds[..2], &[PlainFunction, ArrowFunction]);
        assert_eq!(kinds.len(), DialectKey::Composition.vocabulary().len());

        let legacy = menu(DialectKey::LegacyExport, Some("@submit"), false);
        assert_eq!(legacy[0], Method);
    }

    #[test]
    fn test_class_prefix_puts_scoped_css_first() {
        assert_eq!(menu(DialectKey::LegacyExport, Some(":class"), false)[0], ScopedStyleRule);
        assert_eq!(menu(DialectKey::Markup, Some("class"), false)[0], ScopedStyleRule);
    }

    #[test]
    fn test_v_model_removes_function_kinds() {
        let kinds = menu(DialectKey::Composition, Some("v-model"), false);
        assert!(kinds.iter().all(|k| !k.is_function()));
        let kinds = menu(DialectKey::LegacyExport, Some("v-model.trim"), false);
        assert!(!kinds.contains(&Method));
    }

    #[test]
    fn test_svelte_and_jsx_event_prefixes() {
        assert_eq!(
            menu(DialectKey::Markup, Some("on:click"), false),
            vec![PlainFunction, ArrowFunction]
        );
        assert_eq!(
            menu(DialectKey::FunctionComponent, Some("onClick"), false),
            vec![PlainFunction, ArrowFunction]
        );
        assert_eq!(
            menu(DialectKey::FunctionComponent, Some("one"), false),
            DialectKey::FunctionComponent.vocabulary().to_vec()
        );
    }

    #[test]
    fn test_dotted_candidates_limit_menu() {
        assert_eq!(menu(DialectKey::LegacyExport, None, true), vec![DataProperty]);
        assert_eq!(menu(DialectKey::Composition, None, true), vec![Reactive, Ref]);
    }

    #[test]
    fn test_labels_resolve_per_dialect() {
        assert_eq!(DialectKey::LegacyExport.kind_from_label("computed"), Some(ComputedProperty));
        assert_eq!(DialectKey::Composition.kind_from_label("computed"), Some(Computed));
        assert_eq!(DialectKey::FunctionComponent.kind_from_label("data"), None);
    }

    #[test]
    fn test_initial_values_and_types() {
        assert_eq!(Reactive.initial_values().len(), 2);
        assert_eq!(Ref.initial_values().len(), 8);
        assert_eq!(Reactive.values_for(true).len(), 8);
        assert_eq!(InitialValue::parse("\"\"").unwrap().ts_type(), "string");
        assert_eq!(InitialValue::parse("{}").unwrap().ts_type(), "Record<string, any>");
        assert!(InitialValue::parse("42").is_none());
    }
}
