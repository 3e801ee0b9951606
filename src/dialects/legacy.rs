//! Options-object components (`export default { ... }` and `defineComponent({ ... })`)

use super::object_snippet;
use crate::errors::{CreateError, Result};
use crate::plan::{CURSOR_MARK, InsertionPlan, PlanRequest, entry_splice};
use fastvar_syntax::ObjectRegion;
use fastvar_syntax::regions::find_option_member;

fn option_object(request: &PlanRequest<'_>, member: &str) -> Result<ObjectRegion> {
    let script = request.script()?;
    find_option_member(&script.tree, script.source(), script.base(), member)
        .ok_or_else(|| CreateError::missing(member))
}

fn add_entry(request: &PlanRequest<'_>, member: &str, entry: &str) -> Result<InsertionPlan> {
    let object = option_object(request, member)?;
    let splice = entry_splice(
        request.document(),
        &object,
        entry,
        request.config.at_top,
        &request.unit(),
    );
    request.finish(splice)
}

pub fn data_property(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let candidate = request.candidate;
    let value = request.value();

    let Some(member) = candidate.member.as_deref() else {
        let entry = format!("{}: {}{}", candidate.name, value, CURSOR_MARK);
        return add_entry(request, "data", &entry);
    };

    let data = option_object(request, "data")?;
    let unit = request.unit();
    let splice = match data.entry(&candidate.name) {
        Some(existing) => {
            let nested = existing
                .nested
                .as_ref()
                .ok_or_else(|| CreateError::MalformedContainer(candidate.name.clone()))?;
            let entry = format!("{}: {}{}", member, value, CURSOR_MARK);
            entry_splice(request.document(), nested, &entry, request.config.at_top, &unit)
        }
        None => {
            let entry = format!("{}: {}", candidate.name, object_snippet(member, value, &unit));
            entry_splice(request.document(), &data, &entry, request.config.at_top, &unit)
        }
    };
    request.finish(splice)
}

pub fn method(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let entry = format!(
        "{}({}) {{\n{}{}\n}}",
        request.candidate.name,
        request.candidate.param_list(),
        request.unit(),
        CURSOR_MARK
    );
    add_entry(request, "methods", &entry)
}

pub fn computed_property(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let entry = format!(
        "{}() {{\n{}return {}\n}}",
        request.candidate.name,
        request.unit(),
        CURSOR_MARK
    );
    add_entry(request, "computed", &entry)
}

pub fn watcher(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let entry = format!(
        "{}(newVal, oldVal) {{\n{}{}\n}}",
        request.candidate.name,
        request.unit(),
        CURSOR_MARK
    );
    add_entry(request, "watch", &entry)
}
