//! Svelte components: instance-script bindings and functions

use super::{arrow_snippet, function_snippet, merge_into_binding, object_snippet};
use crate::errors::Result;
use crate::indentation::indent_continuation;
use crate::kinds::DeclarationKind;
use crate::plan::{CURSOR_MARK, InsertionPlan, Placement, PlanRequest, Splice, script_splice};

/// Put `statement` in the instance script, creating one at the top of the
/// file when the component has none
fn statement_splice(request: &PlanRequest<'_>, statement: &str, placement: Placement) -> Splice {
    match request.classified.classification.script() {
        Some(script) => script_splice(request.document(), script, request.patterns(), statement, placement),
        None => Splice::insert(
            0,
            format!("<script>\n{}\n</script>\n\n", indent_continuation(statement, "")),
        ),
    }
}

/// `let`, `const` and `var`
pub fn binding(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let candidate = request.candidate;
    let keyword = request.kind.label();

    if let Some(splice) = merge_into_binding(request)? {
        return request.finish(splice);
    }

    let statement = match candidate.member.as_deref() {
        Some(member) => format!(
            "{} {} = {}",
            keyword,
            candidate.name,
            object_snippet(member, request.value(), &request.unit())
        ),
        None => {
            let annotation = request
                .annotation()
                .map(|t| format!(": {}", t))
                .unwrap_or_default();
            format!(
                "{} {}{} = {}{}",
                keyword,
                candidate.name,
                annotation,
                request.value(),
                CURSOR_MARK
            )
        }
    };
    request.finish(statement_splice(request, &statement, Placement::BeforeFirstFunction))
}

pub fn function(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let candidate = request.candidate;
    let unit = request.unit();
    let statement = match request.kind {
        DeclarationKind::ArrowFunction => arrow_snippet(&candidate.name, &candidate.param_list(), &unit),
        _ => function_snippet(&candidate.name, &candidate.param_list(), &unit),
    };
    request.finish(statement_splice(request, &statement, Placement::End))
}
