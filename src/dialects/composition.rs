//! `<script setup>` components

use super::{arrow_snippet, function_snippet, merge_into_binding, object_snippet};
use crate::collision::scan_script_names;
use crate::errors::{CreateError, Result};
use crate::indentation::indent_continuation;
use crate::kinds::DeclarationKind;
use crate::plan::{CURSOR_MARK, InsertionPlan, Placement, PlanRequest, Splice, entry_splice, script_splice};
use fastvar_syntax::ScriptBlock;
use fastvar_syntax::regions::{ContainerShape, DefineCall, find_define_call};
use tracing::debug;

/// `ref`, `shallowRef`, `reactive` and `shallowReactive`
pub fn state(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let script = request.script()?;
    let candidate = request.candidate;
    let callee = request.kind.label();

    if let Some(splice) = merge_into_binding(request)? {
        return request.finish(splice);
    }

    let statement = match candidate.member.as_deref() {
        Some(member) => format!(
            "const {} = {}({})",
            candidate.name,
            callee,
            object_snippet(member, request.value(), &request.unit())
        ),
        None => format!(
            "const {} = {}{}({}){}",
            candidate.name,
            callee,
            request.type_argument(),
            request.value(),
            CURSOR_MARK
        ),
    };
    let splice = script_splice(
        request.document(),
        script,
        request.patterns(),
        &statement,
        Placement::BeforeFirstFunction,
    );
    request.finish(splice)
}

pub fn computed(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let script = request.script()?;
    let statement = format!(
        "const {} = computed(() => {{\n{}return {}\n}})",
        request.candidate.name,
        request.unit(),
        CURSOR_MARK
    );
    let splice = script_splice(
        request.document(),
        script,
        request.patterns(),
        &statement,
        Placement::BeforeFirstFunction,
    );
    request.finish(splice)
}

/// `function` declarations go to the end of the block; arrow functions are
/// bindings and sit with the other state, before the first function
pub fn function(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let script = request.script()?;
    let candidate = request.candidate;
    let unit = request.unit();
    let (statement, placement) = match request.kind {
        DeclarationKind::ArrowFunction => (
            arrow_snippet(&candidate.name, &candidate.param_list(), &unit),
            Placement::BeforeFirstFunction,
        ),
        _ => (
            function_snippet(&candidate.name, &candidate.param_list(), &unit),
            Placement::End,
        ),
    };
    let splice = script_splice(request.document(), script, request.patterns(), &statement, placement);
    request.finish(splice)
}

/// Splice into the argument of an existing define call, or fill an empty
/// argument list. `None` when there is no call yet.
fn splice_into_call(
    request: &PlanRequest<'_>,
    call: &DefineCall,
    array_entry: &str,
    object_entry: &str,
    type_entry: &str,
    empty_argument: &str,
) -> Result<Splice> {
    let document = request.document();
    let unit = request.unit();

    if let Some(type_literal) = &call.type_argument {
        return Ok(entry_splice(document, type_literal, type_entry, false, &unit));
    }
    match &call.argument {
        Some(argument) if argument.shape == ContainerShape::Array => {
            Ok(entry_splice(document, argument, array_entry, false, &unit))
        }
        Some(argument) => Ok(entry_splice(document, argument, object_entry, false, &unit)),
        None => {
            let inner = document.slice(call.args_open + 1, call.args_close);
            if !inner.trim().is_empty() {
                return Err(CreateError::MalformedContainer(call.callee.clone()));
            }
            let indent = document.indentation_at(call.args_open);
            Ok(Splice::replace(
                call.args_open + 1,
                call.args_close,
                indent_continuation(empty_argument, indent),
            ))
        }
    }
}

/// `const props = defineProps(...)`, or the bare call when `binding` is
/// already taken in the script
fn define_statement(request: &PlanRequest<'_>, script: &ScriptBlock, binding: &str, call: String) -> String {
    if scan_script_names(script.source(), request.patterns()).iter().any(|n| n == binding) {
        debug!("`{}` is already bound, declaring {} without a binding", binding, request.kind);
        call
    } else {
        format!("const {} = {}", binding, call)
    }
}

pub fn declared_prop(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let script = request.script()?;
    let name = &request.candidate.name;
    let unit = request.unit();
    let object_argument = format!("{{\n{}{}: null{}\n}}", unit, name, CURSOR_MARK);

    let splice = match find_define_call(&script.tree, script.source(), script.base(), "defineProps") {
        Some(call) => splice_into_call(
            request,
            &call,
            &format!("'{}'{}", name, CURSOR_MARK),
            &format!("{}: null{}", name, CURSOR_MARK),
            &format!("{}?: any{}", name, CURSOR_MARK),
            &object_argument,
        )?,
        None => script_splice(
            request.document(),
            script,
            request.patterns(),
            &define_statement(request, script, "props", format!("defineProps({})", object_argument)),
            Placement::AfterImports,
        ),
    };
    request.finish(splice)
}

pub fn declared_emit(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let script = request.script()?;
    let name = &request.candidate.name;
    let quoted = format!("'{}'{}", name, CURSOR_MARK);

    let splice = match find_define_call(&script.tree, script.source(), script.base(), "defineEmits") {
        Some(call) => splice_into_call(
            request,
            &call,
            &quoted,
            &format!("{}: null{}", name, CURSOR_MARK),
            &format!("(e: '{}'{}): void", name, CURSOR_MARK),
            &format!("[{}]", quoted),
        )?,
        None => script_splice(
            request.document(),
            script,
            request.patterns(),
            &define_statement(request, script, "emit", format!("defineEmits([{}])", quoted)),
            Placement::AfterImports,
        ),
    };
    request.finish(splice)
}
