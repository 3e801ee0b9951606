//! JSX/TSX function components
//!
//! Hooks and handlers go inside the component function enclosing the cursor,
//! after its last local declaration.

use super::{arrow_snippet, function_snippet, merge_into_binding, object_snippet, setter_name};
use crate::errors::{CreateError, Result};
use crate::kinds::DeclarationKind;
use crate::plan::{CURSOR_MARK, InsertionPlan, PlanRequest, component_splice};
use fastvar_syntax::regions::{ComponentFunction, find_component_function};

fn component(request: &PlanRequest<'_>) -> Result<ComponentFunction> {
    let script = request.script()?;
    find_component_function(&script.tree, script.source(), script.base(), request.cursor)
        .ok_or_else(|| CreateError::missing("component function"))
}

fn add_statement(request: &PlanRequest<'_>, statement: &str) -> Result<InsertionPlan> {
    let component = component(request)?;
    let splice = component_splice(request.document(), &component, statement, &request.unit());
    request.finish(splice)
}

pub fn state_hook(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let candidate = request.candidate;

    if let Some(splice) = merge_into_binding(request)? {
        return request.finish(splice);
    }

    let setter = setter_name(&candidate.name);
    let statement = match candidate.member.as_deref() {
        Some(member) => format!(
            "const [{}, {}] = useState({})",
            candidate.name,
            setter,
            object_snippet(member, request.value(), &request.unit())
        ),
        None => format!(
            "const [{}, {}] = useState{}({}){}",
            candidate.name,
            setter,
            request.type_argument(),
            request.value(),
            CURSOR_MARK
        ),
    };
    add_statement(request, &statement)
}

pub fn ref_hook(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let statement = format!(
        "const {} = useRef{}({}){}",
        request.candidate.name,
        request.type_argument(),
        request.value(),
        CURSOR_MARK
    );
    add_statement(request, &statement)
}

pub fn function(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let candidate = request.candidate;
    let unit = request.unit();
    let statement = match request.kind {
        DeclarationKind::ArrowFunction => arrow_snippet(&candidate.name, &candidate.param_list(), &unit),
        _ => function_snippet(&candidate.name, &candidate.param_list(), &unit),
    };
    add_statement(request, &statement)
}
