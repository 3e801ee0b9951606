//! Insertion recipes, one per (dialect, declaration kind) cell
//!
//! Each recipe is a small function from a `PlanRequest` to an
//! `InsertionPlan`. `plan()` looks the cell up in the dispatch table; a kind
//! the dialect does not offer has no cell.

pub mod composition;
pub mod jsx;
pub mod legacy;
pub mod markup;
pub mod style;

use crate::collision::scoped_binding;
use crate::errors::{CreateError, Result};
use crate::kinds::{DeclarationKind, DialectKey};
use crate::plan::{CURSOR_MARK, InsertionPlan, PlanRequest, Splice, entry_splice};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, info};

pub type Recipe = fn(&PlanRequest<'_>) -> Result<InsertionPlan>;

static RECIPES: LazyLock<HashMap<(DialectKey, DeclarationKind), Recipe>> = LazyLock::new(|| {
    use DeclarationKind::*;
    let mut table: HashMap<(DialectKey, DeclarationKind), Recipe> = HashMap::new();

    for dialect in [DialectKey::LegacyExport, DialectKey::LegacyDefineComponent] {
        table.insert((dialect, DataProperty), legacy::data_property);
        table.insert((dialect, Method), legacy::method);
        table.insert((dialect, ComputedProperty), legacy::computed_property);
        table.insert((dialect, Watcher), legacy::watcher);
        table.insert((dialect, ScopedStyleRule), style::scoped_rule);
    }

    let composition = DialectKey::Composition;
    for kind in [Ref, ShallowRef, Reactive, ShallowReactive] {
        table.insert((composition, kind), composition::state);
    }
    table.insert((composition, Computed), composition::computed);
    table.insert((composition, PlainFunction), composition::function);
    table.insert((composition, ArrowFunction), composition::function);
    table.insert((composition, DeclaredProp), composition::declared_prop);
    table.insert((composition, DeclaredEmit), composition::declared_emit);
    table.insert((composition, ScopedStyleRule), style::scoped_rule);

    let markup = DialectKey::Markup;
    for kind in [LetBinding, ConstBinding, VarBinding] {
        table.insert((markup, kind), markup::binding);
    }
    table.insert((markup, PlainFunction), markup::function);
    table.insert((markup, ArrowFunction), markup::function);
    table.insert((markup, ScopedStyleRule), style::scoped_rule);

    let component = DialectKey::FunctionComponent;
    table.insert((component, StateHook), jsx::state_hook);
    table.insert((component, RefHook), jsx::ref_hook);
    table.insert((component, PlainFunction), jsx::function);
    table.insert((component, ArrowFunction), jsx::function);

    table
});

pub fn recipe(dialect: DialectKey, kind: DeclarationKind) -> Option<Recipe> {
    RECIPES.get(&(dialect, kind)).copied()
}

/// Plan the edit for a validated request
pub fn plan(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let recipe = recipe(request.dialect, request.kind).ok_or_else(|| {
        CreateError::MissingContainer(format!(
            "`{}` cannot be created in {} components",
            request.kind, request.dialect
        ))
    })?;

    let plan = recipe(request)?;
    info!(
        "Planned {} `{}` at {} ({} bytes)",
        request.kind,
        request.candidate.display(),
        plan.insert_position(),
        plan.literal_text.len()
    );
    debug!("Plan text: {:?}", plan.literal_text);
    Ok(plan)
}

/// `function name(params) { | }`
pub(crate) fn function_snippet(name: &str, params: &str, unit: &str) -> String {
    format!("function {}({}) {{\n{}{}\n}}", name, params, unit, CURSOR_MARK)
}

/// `const name = (params) => { | }`
pub(crate) fn arrow_snippet(name: &str, params: &str, unit: &str) -> String {
    format!("const {} = ({}) => {{\n{}{}\n}}", name, params, unit, CURSOR_MARK)
}

/// `{ member: value| }` spread over three lines
pub(crate) fn object_snippet(member: &str, value: &str, unit: &str) -> String {
    format!("{{\n{}{}: {}{}\n}}", unit, member, value, CURSOR_MARK)
}

/// Dotted candidates: add the member to an existing object initializer.
///
/// `None` when the container is not declared yet; the caller declares it.
pub(crate) fn merge_into_binding(request: &PlanRequest<'_>) -> Result<Option<Splice>> {
    let candidate = request.candidate;
    let Some(member) = candidate.member.as_deref() else {
        return Ok(None);
    };
    let Some(binding) = scoped_binding(request.classified, &candidate.name, request.cursor) else {
        return Ok(None);
    };
    let object = binding
        .object
        .ok_or_else(|| CreateError::MalformedContainer(candidate.name.clone()))?;

    debug!(
        "Merging `{}` into existing {} initializer",
        member,
        binding.callee.as_deref().unwrap_or("object")
    );
    let entry = format!("{}: {}{}", member, request.value(), CURSOR_MARK);
    Ok(Some(entry_splice(
        request.document(),
        &object,
        &entry,
        false,
        &request.unit(),
    )))
}

/// `setTitle` for `title`
pub(crate) fn setter_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}
