//! Collision scanning
//!
//! Resolves where a declaration kind lives (`DeclarationTarget`) and checks
//! that the candidate name is not already bound there. Script regions are
//! scanned with the dialect's pattern table; option objects use the member
//! keys read by the adapter.

use crate::errors::{CreateError, Result};
use crate::kinds::{DeclarationKind, DialectKey};
use crate::resolver::CandidateName;
use fastvar_syntax::regions::{
    BindingInit, FunctionBody, Region, find_binding_init, find_component_function, find_define_call,
    find_local_binding_init, find_option_member, strip_quotes,
};
use fastvar_syntax::{BlockClassification, Classified, PatternName, PatternTable, ScriptBlock, regions};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

static SELECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.#][A-Za-z_][\w-]*)").unwrap());
static FALLBACK_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:async\s+)?(['"]?)([\w$-]+)(['"]?)\s*(?:[:(]|$)"#).unwrap());

/// The resolved location of a new declaration and the names already bound there
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationTarget {
    pub kind: DeclarationKind,
    pub region: Region,
    pub existing_names: Vec<String>,
}

impl DeclarationTarget {
    fn new(kind: DeclarationKind, region: Region, existing_names: Vec<String>) -> Self {
        Self {
            kind,
            region,
            existing_names,
        }
    }

    /// Human name of the container, used in messages
    pub fn container(&self) -> &str {
        &self.region.name
    }
}

/// Keys read out of an existing object initializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedObject {
    pub keys: Vec<String>,
    /// False when the line-oriented fallback had to be used
    pub strict: bool,
}

/// Selector character for a scoped style rule
pub fn selector_char(prefix: Option<&str>) -> char {
    if prefix.is_some_and(|p| p.contains("class")) {
        '.'
    } else {
        '#'
    }
}

fn script_of<'a>(classified: &'a Classified) -> Result<&'a ScriptBlock> {
    classified
        .classification
        .script()
        .ok_or_else(|| CreateError::missing("<script>"))
}

/// Resolve the target container for `kind`
pub fn resolve_target(
    classified: &Classified,
    dialect: DialectKey,
    kind: DeclarationKind,
    cursor: usize,
) -> Result<DeclarationTarget> {
    let patterns = PatternTable::for_language(classified.language);

    if kind.is_style() {
        return Ok(style_target(classified));
    }

    let script = match (dialect, classified.classification.script()) {
        (DialectKey::Markup, None) => {
            let region = Region {
                name: "script".to_string(),
                start: 0,
                end: 0,
                raw: String::new(),
            };
            return Ok(DeclarationTarget::new(kind, region, Vec::new()));
        }
        _ => script_of(classified)?,
    };
    let target = match (dialect, kind) {
        (d, _) if d.is_legacy() => {
            let member = kind.label();
            let object = find_option_member(&script.tree, script.source(), script.base(), member)
                .ok_or_else(|| CreateError::missing(member))?;
            let names = object.keys().map(str::to_string).collect();
            DeclarationTarget::new(kind, object.region, names)
        }
        (_, DeclarationKind::DeclaredProp) | (_, DeclarationKind::DeclaredEmit) => {
            let callee = kind.label();
            match find_define_call(&script.tree, script.source(), script.base(), callee) {
                Some(call) => {
                    let mut names: Vec<String> = call
                        .argument
                        .iter()
                        .chain(call.type_argument.iter())
                        .flat_map(|arg| arg.keys().map(str::to_string))
                        .collect();
                    if kind == DeclarationKind::DeclaredEmit {
                        // `(e: 'submit'): void` signatures in the type literal
                        names.extend(patterns.captures(PatternName::QuotedName, &call.call.raw));
                    }
                    DeclarationTarget::new(kind, call.call, names)
                }
                None => DeclarationTarget::new(kind, renamed(&script.region, callee), Vec::new()),
            }
        }
        (DialectKey::FunctionComponent, _) => {
            let component =
                find_component_function(&script.tree, script.source(), script.base(), cursor)
                    .ok_or_else(|| CreateError::missing("component function"))?;
            let mut region = component.region;
            region.name = component.name.unwrap_or_else(|| "component".to_string());
            let names = scan_script_names(&region.raw, patterns);
            DeclarationTarget::new(kind, region, names)
        }
        _ => {
            let region = renamed(&script.region, "script");
            let names = scan_script_names(&region.raw, patterns);
            DeclarationTarget::new(kind, region, names)
        }
    };

    debug!(
        "Target for {} is {} ({} existing names)",
        kind,
        target.container(),
        target.existing_names.len()
    );
    Ok(target)
}

fn renamed(region: &Region, name: &str) -> Region {
    Region {
        name: name.to_string(),
        ..region.clone()
    }
}

fn style_target(classified: &Classified) -> DeclarationTarget {
    let text = classified.document.text();
    let styles = classified
        .sfc
        .as_ref()
        .map(|sfc| sfc.styles.as_slice())
        .unwrap_or_default();

    let names = styles
        .iter()
        .flat_map(|block| SELECTOR_RE.captures_iter(block.content_text(text)))
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();

    let region = match styles.first() {
        Some(block) => Region {
            name: "style".to_string(),
            start: block.content.start,
            end: block.content.end,
            raw: block.content_text(text).to_string(),
        },
        None => Region {
            name: "style".to_string(),
            start: text.len(),
            end: text.len(),
            raw: String::new(),
        },
    };
    DeclarationTarget::new(DeclarationKind::ScopedStyleRule, region, names)
}

pub fn has_collision(target: &DeclarationTarget, name: &str) -> bool {
    target.existing_names.iter().any(|n| n == name)
}

/// Names bound at any depth of a script region: bindings, destructured
/// names, function declarations and imports
pub fn scan_script_names(raw: &str, patterns: &PatternTable) -> Vec<String> {
    let mut names = patterns.captures(PatternName::Binding, raw);

    for list in patterns.captures(PatternName::ArrayPatternBinding, raw) {
        names.extend(list.split(',').filter_map(pattern_element));
    }
    for list in patterns.captures(PatternName::ObjectPatternBinding, raw) {
        names.extend(list.split(',').filter_map(|item| {
            let bound = item.rsplit(':').next().unwrap_or(item);
            pattern_element(bound)
        }));
    }
    names.extend(patterns.captures(PatternName::FunctionDecl, raw));
    for clause in patterns.captures(PatternName::ImportClause, raw) {
        names.extend(import_clause_names(&clause));
    }
    names
}

fn pattern_element(item: &str) -> Option<String> {
    let name = item
        .split('=')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches("...")
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// `Default, { a, b as c }`, `* as ns`
fn import_clause_names(clause: &str) -> Vec<String> {
    clause
        .split([',', '{', '}'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let local = part.rsplit(" as ").next().unwrap_or(part).trim();
            let local = local.trim_start_matches("type ").trim();
            (local != "*" && !local.is_empty()).then(|| local.to_string())
        })
        .collect()
}

/// The binding a dotted candidate's container refers to: a top-level
/// declaration, or a local of the component function around `anchor` in
/// function components
pub fn scoped_binding(classified: &Classified, name: &str, anchor: usize) -> Option<BindingInit> {
    let script = classified.classification.script()?;
    if !matches!(classified.classification, BlockClassification::FunctionComponent(_)) {
        return find_binding_init(&script.tree, script.source(), script.base(), name);
    }
    let component = find_component_function(&script.tree, script.source(), script.base(), anchor)?;
    match component.body {
        FunctionBody::Block { open, .. } => {
            find_local_binding_init(&script.tree, script.source(), script.base(), open, name)
        }
        FunctionBody::Expression { .. } => None,
    }
}

/// Keys of the object a container binding was initialized with.
///
/// `Ok(None)` means the container itself does not exist yet and will be created.
pub fn lookup_nested(binding: Option<&BindingInit>, container: &str) -> Result<Option<ParsedObject>> {
    let Some(binding) = binding else {
        return Ok(None);
    };
    let object = binding
        .object
        .as_ref()
        .ok_or_else(|| CreateError::MalformedContainer(container.to_string()))?;
    read_object_literal(&object.region.raw, container).map(Some)
}

pub fn has_nested_collision(binding: Option<&BindingInit>, container: &str, property: &str) -> Result<bool> {
    Ok(lookup_nested(binding, container)?.is_some_and(|object| object.keys.iter().any(|k| k == property)))
}

/// Read the keys of an object literal: strict parse first, then a line
/// oriented `key: value` splitter for text that does not parse.
pub fn read_object_literal(text: &str, container: &str) -> Result<ParsedObject> {
    if let Some(keys) = regions::object_literal_keys(text) {
        return Ok(ParsedObject { keys, strict: true });
    }

    let inner = text
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}');
    let mut keys = Vec::new();
    for line in inner.lines() {
        let line = line.trim().trim_end_matches(',').trim();
        if line.is_empty() || line.starts_with("//") || line.chars().all(|c| "{}[](),".contains(c)) {
            continue;
        }
        let Some(caps) = FALLBACK_KEY_RE.captures(line) else {
            return Err(CreateError::MalformedContainer(container.to_string()));
        };
        if let Some(key) = caps.get(2) {
            keys.push(strip_quotes(key.as_str()).to_string());
        }
    }
    Ok(ParsedObject { keys, strict: false })
}

/// Validate the candidate against its target; `NameCollision` when taken
pub fn check(
    classified: &Classified,
    target: &DeclarationTarget,
    candidate: &CandidateName,
    prefix: Option<&str>,
) -> Result<()> {
    let patterns = PatternTable::for_language(classified.language);

    if target.kind.is_style() {
        let selector = format!("{}{}", selector_char(prefix), candidate.name);
        if has_collision(target, &selector) {
            return Err(CreateError::collision(&selector, "the style block"));
        }
        return Ok(());
    }

    match &candidate.member {
        Some(member) if target.kind == DeclarationKind::DataProperty => {
            let data = classified
                .classification
                .script()
                .and_then(|s| find_option_member(&s.tree, s.source(), s.base(), "data"))
                .ok_or_else(|| CreateError::missing("data"))?;
            if let Some(entry) = data.entry(&candidate.name) {
                let nested = entry
                    .nested
                    .as_ref()
                    .ok_or_else(|| CreateError::MalformedContainer(candidate.name.clone()))?;
                if nested.entry(member).is_some() {
                    return Err(CreateError::collision(&candidate.display(), "data"));
                }
            }
            Ok(())
        }
        Some(member) => {
            let binding = scoped_binding(classified, &candidate.name, target.region.start);
            if has_nested_collision(binding.as_ref(), &candidate.name, member)? {
                return Err(CreateError::collision(&candidate.display(), target.container()));
            }
            Ok(())
        }
        None => {
            if has_collision(target, &candidate.name) {
                return Err(CreateError::collision(&candidate.name, target.container()));
            }
            if matches!(target.kind, DeclarationKind::DeclaredProp | DeclarationKind::DeclaredEmit) {
                // props and emits share the template namespace with script bindings
                let script = script_of(classified)?;
                if scan_script_names(script.source(), patterns).contains(&candidate.name) {
                    return Err(CreateError::collision(&candidate.name, "script"));
                }
            }
            Ok(())
        }
    }
}
