//! Region extraction
//!
//! Turns a parsed script body into the named, offset-bounded slices the
//! planner anchors edits into: the options object and its members, reactive
//! initializers, define-macro calls and the enclosing component function.
//! Every offset handed out here is a byte offset into the whole document;
//! `base` is where the script body starts inside that document.

use crate::language::ScriptLang;
use crate::script::{contains_kind_prefix, named_children, node_text, parse_script_strict};
use serde::Serialize;
use tree_sitter::{Node, Tree};

/// A named structural slice of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub raw: String,
}

impl Region {
    fn from_node(name: impl Into<String>, node: &Node, source: &str, base: usize) -> Self {
        Self {
            name: name.into(),
            start: base + node.start_byte(),
            end: base + node.end_byte(),
            raw: node_text(node, source).to_string(),
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerShape {
    /// `{ a: 1, b() {} }`
    Object,
    /// `['a', 'b']`
    Array,
    /// TypeScript `{ a: string; b?: number }`
    TypeLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Separator {
    Comma,
    Semicolon,
}

impl Separator {
    pub fn as_char(&self) -> char {
        match self {
            Separator::Comma => ',',
            Separator::Semicolon => ';',
        }
    }
}

/// One member of a container literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    pub start: usize,
    pub end: usize,
    /// Set when the member's value is itself an object literal
    pub nested: Option<ObjectRegion>,
}

/// An object, array or type literal with its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRegion {
    pub region: Region,
    pub shape: ContainerShape,
    /// Offset of the opening bracket
    pub open: usize,
    /// Offset of the closing bracket
    pub close: usize,
    pub entries: Vec<Entry>,
    pub trailing_separator: bool,
    pub separator: Separator,
}

impl ObjectRegion {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn first(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }
}

/// How the legacy options object is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionsFlavor {
    /// `export default { ... }`
    ExportObject,
    /// `export default defineComponent({ ... })` / `Vue.extend({ ... })`
    DefineComponent,
}

pub fn strip_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for quote in ['\'', '"', '`'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

fn member_key(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "pair" => node
            .child_by_field_name("key")
            .map(|k| strip_quotes(node_text(&k, source)).to_string()),
        "method_definition" | "property_signature" | "method_signature" => node
            .child_by_field_name("name")
            .map(|k| strip_quotes(node_text(&k, source)).to_string()),
        "shorthand_property_identifier" | "identifier" => Some(node_text(node, source).to_string()),
        "string" | "template_string" => Some(strip_quotes(node_text(node, source)).to_string()),
        "comment" => None,
        _ => Some(node_text(node, source).trim().to_string()),
    }
}

/// Build an `ObjectRegion` from an `object`, `array` or `object_type` node
pub fn container_region(node: &Node, name: &str, source: &str, base: usize) -> Option<ObjectRegion> {
    let shape = match node.kind() {
        "object" | "object_pattern" => ContainerShape::Object,
        "array" => ContainerShape::Array,
        "object_type" => ContainerShape::TypeLiteral,
        _ => return None,
    };

    let mut entries = Vec::new();
    for child in named_children(node) {
        let Some(key) = member_key(&child, source) else {
            continue;
        };
        let nested = if child.kind() == "pair" {
            child
                .child_by_field_name("value")
                .filter(|v| v.kind() == "object")
                .and_then(|v| container_region(&v, &key, source, base))
        } else {
            None
        };
        entries.push(Entry {
            key,
            start: base + child.start_byte(),
            end: base + child.end_byte(),
            nested,
        });
    }

    let open = base + node.start_byte();
    let close = base + node.end_byte().saturating_sub(1);

    let tail_start = entries.last().map(|e| e.end - base).unwrap_or(node.start_byte() + 1);
    let tail = source.get(tail_start..close - base).unwrap_or("");
    let between_first = entries
        .get(1)
        .and_then(|second| source.get(entries[0].end - base..second.start - base))
        .unwrap_or("");

    let separator = if shape == ContainerShape::TypeLiteral
        && !between_first.contains(',')
        && !tail.contains(',')
    {
        Separator::Semicolon
    } else {
        Separator::Comma
    };
    let trailing_separator = !entries.is_empty() && tail.trim_start().starts_with(separator.as_char());

    Some(ObjectRegion {
        region: Region::from_node(name, node, source, base),
        shape,
        open,
        close,
        entries,
        trailing_separator,
        separator,
    })
}

fn walk_preorder<'t>(node: Node<'t>, visit: &mut dyn FnMut(Node<'t>) -> bool) -> bool {
    if visit(node) {
        return true;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    for child in children {
        if walk_preorder(child, visit) {
            return true;
        }
    }
    false
}

fn find_first<'t>(root: Node<'t>, predicate: impl Fn(&Node<'t>) -> bool) -> Option<Node<'t>> {
    let mut found = None;
    walk_preorder(root, &mut |node| {
        if predicate(&node) {
            found = Some(node);
            true
        } else {
            false
        }
    });
    found
}

// ---------------------------------------------------------------------------
// Legacy options object

/// The exported options object, unwrapped from `defineComponent(...)` if needed
fn options_node<'t>(tree: &'t Tree, source: &str) -> Option<(Node<'t>, OptionsFlavor)> {
    let export = find_first(tree.root_node(), |n| {
        n.kind() == "export_statement" && n.child_by_field_name("value").is_some()
    })?;
    let value = export.child_by_field_name("value")?;

    match value.kind() {
        "object" => Some((value, OptionsFlavor::ExportObject)),
        "call_expression" => {
            let callee = value.child_by_field_name("function")?;
            let callee_text = node_text(&callee, source);
            if callee_text != "defineComponent" && !callee_text.ends_with(".extend") {
                return None;
            }
            let args = value.child_by_field_name("arguments")?;
            named_children(&args)
                .into_iter()
                .find(|a| a.kind() == "object")
                .map(|obj| (obj, OptionsFlavor::DefineComponent))
        }
        _ => None,
    }
}

/// Locate the legacy options object
pub fn find_options_object(tree: &Tree, source: &str, base: usize) -> Option<(ObjectRegion, OptionsFlavor)> {
    let (node, flavor) = options_node(tree, source)?;
    container_region(&node, "options", source, base).map(|r| (r, flavor))
}

/// The object holding the entries of one option member.
///
/// `data` may be written as an object, a function returning an object, or an
/// arrow function with an object body; the other members are plain objects.
pub fn find_option_member(tree: &Tree, source: &str, base: usize, member: &str) -> Option<ObjectRegion> {
    let (options, _) = options_node(tree, source)?;
    let node = named_children(&options)
        .into_iter()
        .find(|child| member_key(child, source).as_deref() == Some(member))?;

    let object = match node.kind() {
        "method_definition" => node
            .child_by_field_name("body")
            .and_then(|body| returned_object(&body)),
        "pair" => {
            let value = node.child_by_field_name("value")?;
            match value.kind() {
                "object" => Some(value),
                "function_expression" | "function" | "arrow_function" => {
                    let body = value.child_by_field_name("body")?;
                    match body.kind() {
                        "statement_block" => returned_object(&body),
                        _ => unwrap_parens(body).filter(|b| b.kind() == "object"),
                    }
                }
                _ => None,
            }
        }
        _ => None,
    }?;

    container_region(&object, member, source, base)
}

fn unwrap_parens(mut node: Node) -> Option<Node> {
    while node.kind() == "parenthesized_expression" {
        node = node.named_child(0)?;
    }
    Some(node)
}

/// The object literal returned by the last `return` of a statement block
fn returned_object<'t>(body: &Node<'t>) -> Option<Node<'t>> {
    named_children(body)
        .into_iter()
        .rev()
        .find(|s| s.kind() == "return_statement")
        .and_then(|ret| ret.named_child(0))
        .and_then(unwrap_parens)
        .filter(|n| n.kind() == "object")
}

// ---------------------------------------------------------------------------
// Define macros and bindings

/// A `defineProps(...)` / `defineEmits(...)` call and its surroundings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefineCall {
    pub callee: String,
    pub call: Region,
    /// The statement holding the call
    pub statement: Region,
    /// `props` in `const props = defineProps(...)`
    pub binding: Option<String>,
    /// Object or array passed as the first argument
    pub argument: Option<ObjectRegion>,
    /// Type literal passed as the generic argument
    pub type_argument: Option<ObjectRegion>,
    /// Offsets of the argument list's parentheses
    pub args_open: usize,
    pub args_close: usize,
}

pub fn find_define_call(tree: &Tree, source: &str, base: usize, callee: &str) -> Option<DefineCall> {
    let call = find_first(tree.root_node(), |n| {
        n.kind() == "call_expression"
            && n.child_by_field_name("function")
                .is_some_and(|f| node_text(&f, source) == callee)
    })?;

    let args = call.child_by_field_name("arguments")?;
    let argument = named_children(&args)
        .into_iter()
        .find(|a| a.kind() != "comment")
        .and_then(|a| container_region(&a, callee, source, base));
    let type_argument = call
        .child_by_field_name("type_arguments")
        .and_then(|t| named_children(&t).into_iter().find(|n| n.kind() == "object_type"))
        .and_then(|t| container_region(&t, callee, source, base));

    let mut statement = call;
    let mut binding = None;
    while let Some(parent) = statement.parent() {
        if parent.kind() == "variable_declarator" && binding.is_none() {
            binding = parent
                .child_by_field_name("name")
                .map(|n| node_text(&n, source).to_string());
        }
        if parent.kind() == "program" {
            break;
        }
        statement = parent;
    }

    Some(DefineCall {
        callee: callee.to_string(),
        call: Region::from_node(callee, &call, source, base),
        statement: Region::from_node("statement", &statement, source, base),
        binding,
        argument,
        type_argument,
        args_open: base + args.start_byte(),
        args_close: base + args.end_byte().saturating_sub(1),
    })
}

/// A `const name = ...` binding and the object literal it was initialized with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingInit {
    pub name: String,
    pub declarator: Region,
    /// `reactive` in `const state = reactive({...})`
    pub callee: Option<String>,
    /// The object literal: the value itself or the call's first argument
    pub object: Option<ObjectRegion>,
    /// Set when the declarator has a value that could not be read as an object
    pub has_value: bool,
}

/// `name` itself, or the first element of `[name, setName]`
fn binds_name(pattern: &Node, source: &str, name: &str) -> bool {
    match pattern.kind() {
        "identifier" => node_text(pattern, source) == name,
        "array_pattern" => pattern
            .named_child(0)
            .is_some_and(|first| first.kind() == "identifier" && node_text(&first, source) == name),
        _ => false,
    }
}

/// Declarators of the statements directly inside `scope`; nested function
/// scopes are not searched
fn scope_declarators<'t>(scope: Node<'t>) -> Vec<Node<'t>> {
    named_children(&scope)
        .into_iter()
        .filter_map(|statement| match statement.kind() {
            "export_statement" => statement.child_by_field_name("declaration"),
            _ => Some(statement),
        })
        .filter(|statement| matches!(statement.kind(), "lexical_declaration" | "variable_declaration"))
        .flat_map(|declaration| named_children(&declaration))
        .filter(|n| n.kind() == "variable_declarator")
        .collect()
}

/// Top-level binding of `name` in a script block
pub fn find_binding_init(tree: &Tree, source: &str, base: usize, name: &str) -> Option<BindingInit> {
    binding_in_scope(tree.root_node(), source, base, name)
}

/// Binding of `name` declared directly in the block whose `{` is at document
/// offset `block_open`
pub fn find_local_binding_init(
    tree: &Tree,
    source: &str,
    base: usize,
    block_open: usize,
    name: &str,
) -> Option<BindingInit> {
    let local = block_open.checked_sub(base)?;
    let block = find_first(tree.root_node(), |n| {
        n.kind() == "statement_block" && n.start_byte() == local
    })?;
    binding_in_scope(block, source, base, name)
}

fn binding_in_scope(scope: Node, source: &str, base: usize, name: &str) -> Option<BindingInit> {
    let declarator = scope_declarators(scope).into_iter().find(|n| {
        n.child_by_field_name("name")
            .is_some_and(|pattern| binds_name(&pattern, source, name))
    })?;

    let value = declarator.child_by_field_name("value");
    let (callee, object_node) = match value {
        Some(v) if v.kind() == "call_expression" => {
            let callee = v
                .child_by_field_name("function")
                .map(|f| node_text(&f, source).to_string());
            let object = v
                .child_by_field_name("arguments")
                .and_then(|args| named_children(&args).into_iter().next())
                .filter(|a| a.kind() == "object");
            (callee, object)
        }
        Some(v) => (None, unwrap_parens(v).filter(|o| o.kind() == "object")),
        None => (None, None),
    };

    Some(BindingInit {
        name: name.to_string(),
        declarator: Region::from_node(name, &declarator, source, base),
        callee,
        object: object_node.and_then(|o| container_region(&o, name, source, base)),
        has_value: value.is_some(),
    })
}

/// Keys of an object literal, read with a strict parse. `None` when the text
/// is not a well-formed object literal.
pub fn object_literal_keys(text: &str) -> Option<Vec<String>> {
    let wrapped = format!("({})", text.trim());
    let tree = parse_script_strict(&wrapped, ScriptLang::TypeScript).ok()?;
    let object = find_first(tree.root_node(), |n| n.kind() == "object")?;
    let region = container_region(&object, "literal", &wrapped, 0)?;
    Some(region.entries.into_iter().map(|e| e.key).collect())
}

// ---------------------------------------------------------------------------
// Function components

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub kind: String,
    pub start: usize,
    pub end: usize,
}

impl Statement {
    pub fn is_declaration(&self) -> bool {
        matches!(self.kind.as_str(), "lexical_declaration" | "variable_declaration")
    }

    pub fn is_return(&self) -> bool {
        self.kind == "return_statement"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FunctionBody {
    /// `{ ... }` with its statements
    Block {
        open: usize,
        close: usize,
        statements: Vec<Statement>,
    },
    /// Arrow function with an expression body, e.g. `() => (<div/>)`
    Expression { expr: Region },
}

/// The function scope a new hook or local belongs in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFunction {
    pub name: Option<String>,
    pub region: Region,
    pub body: FunctionBody,
}

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "arrow_function",
    "method_definition",
    "generator_function_declaration",
];

fn renders_markup(node: &Node) -> bool {
    FUNCTION_KINDS.contains(&node.kind())
        && node
            .child_by_field_name("body")
            .is_some_and(|b| contains_kind_prefix(&b, "jsx_"))
}

/// True when some function in the tree renders markup
pub fn renders_markup_anywhere(tree: &Tree) -> bool {
    find_first(tree.root_node(), renders_markup).is_some()
}

/// Outermost function that contains `cursor` and renders markup.
///
/// `cursor` is a document offset. When no function contains the cursor, the
/// first function rendering markup is used.
pub fn find_component_function(tree: &Tree, source: &str, base: usize, cursor: usize) -> Option<ComponentFunction> {
    let local = cursor.checked_sub(base);
    let node = local
        .and_then(|c| {
            find_first(tree.root_node(), |n| {
                renders_markup(n) && n.start_byte() <= c && c <= n.end_byte()
            })
        })
        .or_else(|| find_first(tree.root_node(), renders_markup))?;

    let body = node.child_by_field_name("body")?;
    let name = node
        .child_by_field_name("name")
        .or_else(|| {
            node.parent()
                .filter(|p| p.kind() == "variable_declarator")
                .and_then(|p| p.child_by_field_name("name"))
        })
        .map(|n| node_text(&n, source).to_string());

    let body = if body.kind() == "statement_block" {
        FunctionBody::Block {
            open: base + body.start_byte(),
            close: base + body.end_byte().saturating_sub(1),
            statements: named_children(&body)
                .into_iter()
                .filter(|s| s.kind() != "comment")
                .map(|s| Statement {
                    kind: s.kind().to_string(),
                    start: base + s.start_byte(),
                    end: base + s.end_byte(),
                })
                .collect(),
        }
    } else {
        FunctionBody::Expression {
            expr: Region::from_node("body", &body, source, base),
        }
    };

    Some(ComponentFunction {
        name,
        region: Region::from_node("component", &node, source, base),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'submit'"), "submit");
        assert_eq!(strip_quotes("\"a-b\""), "a-b");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn test_object_literal_keys_strict() {
        assert_eq!(
            object_literal_keys("{ a: 1, 'b': 2, c() {}, d }"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()])
        );
        assert_eq!(object_literal_keys("{ a: 1, b: }"), None);
    }

    #[test]
    fn test_type_literal_separator() {
        let code = "const p = defineProps<{ a: string; b: number }>()";
        let tree = parse_script(code, ScriptLang::TypeScript).unwrap();
        let call = find_define_call(&tree, code, 0, "defineProps").unwrap();
        let ty = call.type_argument.unwrap();
        assert_eq!(ty.separator, Separator::Semicolon);
        assert_eq!(ty.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(call.binding.as_deref(), Some("p"));
    }
}
