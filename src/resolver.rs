//! Name resolution
//!
//! Works out which identifier the user wants to create from the selection or
//! the token under the cursor, and which markup attribute (if any) it sits in.

use crate::errors::{CreateError, Result};
use crate::kinds::DeclarationKind;
use fastvar_syntax::{Position, SourceDocument};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// `attrName="` or `attrName={` left open before the token
static ATTRIBUTE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([@:A-Za-z_][\w:.\-@]*)\s*=\s*(?:["']|\{)[^"']*$"#).unwrap()
});
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap());
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

/// What the host reports about the selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSelection {
    /// Selected text; empty when there is only a cursor
    pub selected: String,
    pub position: Position,
}

impl EditorSelection {
    pub fn cursor(position: Position) -> Self {
        Self {
            selected: String::new(),
            position,
        }
    }
}

/// Raw resolution result, before a declaration kind is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedName {
    pub raw: String,
    /// Enclosing markup attribute, e.g. `@click`, `:class`, `onChange`
    pub prefix: Option<String>,
}

impl ResolvedName {
    pub fn is_dotted(&self) -> bool {
        self.raw.contains('.')
    }
}

fn is_token_boundary(c: char) -> bool {
    matches!(c, '\'' | '"' | '`' | '{' | '}') || c.is_whitespace()
}

pub fn resolve(document: &SourceDocument, selection: &EditorSelection) -> Result<ResolvedName> {
    let line = document.line_text(selection.position.line);
    let chars: Vec<char> = line.chars().collect();

    let (raw, token_start) = if selection.selected.trim().is_empty() {
        let cursor = selection.position.character.min(chars.len());
        let mut start = cursor;
        while start > 0 && !is_token_boundary(chars[start - 1]) {
            start -= 1;
        }
        let mut end = cursor;
        while end < chars.len() && !is_token_boundary(chars[end]) {
            end += 1;
        }
        (chars[start..end].iter().collect::<String>(), start)
    } else {
        let raw: String = selection
            .selected
            .chars()
            .filter(|c| !matches!(c, '\'' | '"' | '`') && !c.is_whitespace())
            .collect();
        (raw, selection.position.character.min(chars.len()))
    };

    let raw = raw.trim().to_string();
    if raw.is_empty() || !raw.is_ascii() {
        return Err(CreateError::InvalidIdentifier(raw));
    }

    let before: String = chars[..token_start].iter().collect();
    let prefix = ATTRIBUTE_PREFIX_RE
        .captures(&before)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    debug!("Resolved candidate '{}' (prefix: {:?})", raw, prefix);
    Ok(ResolvedName { raw, prefix })
}

/// A candidate name normalised for one declaration kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateName {
    /// The identifier (container name for dotted candidates)
    pub name: String,
    /// `prop` in `obj.prop`
    pub member: Option<String>,
    /// Parameter list synthesized from a call site, function kinds only
    pub params: Option<Vec<String>>,
}

impl CandidateName {
    /// Normalise `raw` for `kind`, rejecting names the kind cannot hold
    pub fn normalize(raw: &str, kind: DeclarationKind) -> Result<Self> {
        let raw = raw.replacen('=', "", 1);

        if kind.is_style() {
            let name = raw.trim_start_matches(['.', '#']).to_string();
            if name.is_empty() || name.contains(['\'', '"', '[', ']', '(', ')', '{', '}']) {
                return Err(CreateError::InvalidIdentifier(raw));
            }
            return Ok(Self {
                name,
                member: None,
                params: None,
            });
        }

        let (stripped, params) = match CALL_RE.captures(&raw) {
            Some(call) => {
                let whole = call.get(0).map(|m| m.as_str()).unwrap_or_default();
                let args = call.get(1).map(|m| m.as_str()).unwrap_or_default();
                let params = kind.is_function().then(|| synthesize_params(args));
                (raw.replacen(whole, "", 1), params)
            }
            None => (raw.clone(), kind.is_function().then(Vec::new)),
        };
        let stripped = stripped.split(' ').next().unwrap_or_default().to_string();

        let forbidden: &[char] = if kind.is_function() {
            &['\'', '"', '-', '+', '[', ']']
        } else {
            &['\'', '"', '-', '[', ']']
        };
        if stripped.contains(forbidden) || stripped.contains(char::is_whitespace) {
            return Err(CreateError::InvalidIdentifier(stripped));
        }

        let (name, member) = match stripped.split_once('.') {
            Some((name, member)) if !kind.is_function() => {
                let member = member.split('.').next().unwrap_or_default();
                (name.to_string(), Some(member.to_string()))
            }
            _ => (stripped.clone(), None),
        };

        let valid = IDENTIFIER_RE.is_match(&name)
            && member.as_deref().is_none_or(|m| IDENTIFIER_RE.is_match(m));
        if !valid {
            return Err(CreateError::InvalidIdentifier(stripped));
        }

        Ok(Self {
            name,
            member,
            params,
        })
    }

    pub fn is_dotted(&self) -> bool {
        self.member.is_some()
    }

    /// `obj.prop` or `name`
    pub fn display(&self) -> String {
        match &self.member {
            Some(member) => format!("{}.{}", self.name, member),
            None => self.name.clone(),
        }
    }

    pub fn param_list(&self) -> String {
        self.params.as_ref().map(|p| p.join(", ")).unwrap_or_default()
    }
}

/// Identifier arguments are reused as parameter names; anything else becomes
/// a positional `p0`, `p1`, ...
pub fn synthesize_params(args: &str) -> Vec<String> {
    let mut positional = 0;
    args.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|arg| {
            if IDENTIFIER_RE.is_match(arg) && !matches!(arg, "true" | "false" | "null" | "undefined") {
                arg.to_string()
            } else {
                let name = format!("p{}", positional);
                positional += 1;
                name
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_at(text: &str, needle: &str, offset_in_needle: usize) -> ResolvedName {
        let doc = SourceDocument::new(text);
        let offset = text.find(needle).unwrap() + offset_in_needle;
        resolve(&doc, &EditorSelection::cursor(doc.position_at(offset))).unwrap()
    }

    #[test]
    fn test_cursor_expansion_inside_event_attribute() {
        let resolved = resolve_at("  <button @click=\"increment\">+</button>", "increment", 3);
        assert_eq!(resolved.raw, "increment");
        assert_eq!(resolved.prefix.as_deref(), Some("@click"));
    }

    #[test]
    fn test_cursor_expansion_in_mustache_and_jsx() {
        let resolved = resolve_at("<p>{{ count }}</p>", "count", 0);
        assert_eq!(resolved.raw, "count");
        assert_eq!(resolved.prefix, None);

        let resolved = resolve_at("<input onChange={handleChange} />", "handleChange", 5);
        assert_eq!(resolved.raw, "handleChange");
        assert_eq!(resolved.prefix.as_deref(), Some("onChange"));
    }

    #[test]
    fn test_prefix_of_class_binding_object() {
        let resolved = resolve_at("<div id=\"a\" :class=\"{ active: isActive }\">", "isActive", 2);
        assert_eq!(resolved.raw, "isActive");
        assert_eq!(resolved.prefix.as_deref(), Some(":class"));
    }

    #[test]
    fn test_selection_strips_quotes_and_whitespace() {
        let doc = SourceDocument::new("emit('submit')");
        let selection = EditorSelection {
            selected: " 'submit' ".to_string(),
            position: Position::new(0, 5),
        };
        assert_eq!(resolve(&doc, &selection).unwrap().raw, "submit");
    }

    #[test]
    fn test_non_latin_names_are_rejected() {
        let doc = SourceDocument::new("{{ 名字 }}");
        let err = resolve(&doc, &EditorSelection::cursor(Position::new(0, 3))).unwrap_err();
        assert!(matches!(err, CreateError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_normalize_function_call_site() {
        let candidate =
            CandidateName::normalize("handle(item,'x',0)", DeclarationKind::Method).unwrap();
        assert_eq!(candidate.name, "handle");
        assert_eq!(candidate.param_list(), "item, p0, p1");

        let candidate = CandidateName::normalize("toggle()", DeclarationKind::Ref).unwrap();
        assert_eq!(candidate.name, "toggle");
        assert_eq!(candidate.params, None);
    }

    #[test]
    fn test_normalize_dotted_and_assignment() {
        let candidate = CandidateName::normalize("form.name=", DeclarationKind::Reactive).unwrap();
        assert_eq!(candidate.name, "form");
        assert_eq!(candidate.member.as_deref(), Some("name"));
        assert_eq!(candidate.display(), "form.name");
    }

    #[test]
    fn test_normalize_rejects_hyphens_except_for_styles() {
        assert!(CandidateName::normalize("is-open", DeclarationKind::Ref).is_err());
        assert!(CandidateName::normalize("a+b", DeclarationKind::PlainFunction).is_err());
        let style = CandidateName::normalize("card-title", DeclarationKind::ScopedStyleRule).unwrap();
        assert_eq!(style.name, "card-title");
    }
}
