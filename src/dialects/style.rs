//! Scoped style rules, shared by every dialect with a style block

use crate::collision::selector_char;
use crate::config::DeepSelector;
use crate::errors::Result;
use crate::indentation::indent_continuation;
use crate::plan::{CURSOR_MARK, InsertionPlan, PlanRequest, Splice};
use fastvar_syntax::LanguageTag;

/// Picker labels for the deep-scope prompt
pub const DEEP_CHOICES: [&str; 2] = ["use deep scope", "not deep scope"];

fn deep_form(request: &PlanRequest<'_>, selector: &str) -> String {
    match (request.classified.language, request.config.deep_selector) {
        (LanguageTag::Svelte, _) => format!(":global({})", selector),
        (_, DeepSelector::DeepFunction) => format!(":deep({})", selector),
        (_, DeepSelector::VDeep) => format!("::v-deep {}", selector),
    }
}

pub fn scoped_rule(request: &PlanRequest<'_>) -> Result<InsertionPlan> {
    let document = request.document();
    let text = document.text();
    let unit = request.unit();

    let selector = format!("{}{}", selector_char(request.prefix), request.candidate.name);
    let selector = if request.deep {
        deep_form(request, &selector)
    } else {
        selector
    };
    let rule = format!("{} {{\n{}{}\n}}", selector, unit, CURSOR_MARK);

    let styles = request
        .classified
        .sfc
        .as_ref()
        .map(|sfc| sfc.styles.as_slice())
        .unwrap_or_default();
    let block = styles
        .iter()
        .rev()
        .find(|b| b.close_tag.is_some() && b.is_scoped())
        .or_else(|| styles.iter().rev().find(|b| b.close_tag.is_some()));

    let splice = match block {
        Some(block) => {
            let content = block.content_text(text);
            let code_end = block.content.start + content.trim_end().len();
            let indent = content
                .lines()
                .find(|l| !l.trim().is_empty())
                .map(|l| &l[..l.len() - l.trim_start().len()])
                .unwrap_or("");
            let lead = if content.trim().is_empty() { "\n" } else { "\n\n" };
            Splice::replace(
                code_end,
                block.content.end,
                format!("{}{}{}\n", lead, indent, indent_continuation(&rule, indent)),
            )
        }
        None => {
            let tag = match request.classified.language {
                LanguageTag::Svelte => "<style>",
                _ => "<style scoped>",
            };
            let lead = if text.is_empty() || text.ends_with('\n') { "\n" } else { "\n\n" };
            Splice::insert(text.len(), format!("{}{}\n{}\n</style>\n", lead, tag, rule))
        }
    };
    request.finish(splice)
}
