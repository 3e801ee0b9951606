// Component file (SFC) section scanning
//
// Splits a .vue or .svelte file into its top-level <template>, <script> and
// <style> blocks, keeping byte offsets for the open tag, the content and the
// close tag. Offsets are what the planner anchors into, so unlike a
// line-oriented splitter this one never normalises or re-joins content.

use anyhow::{Result, anyhow, bail};
use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

static BLOCK_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(template|script|style)\b([^>]*?)(/?)>").unwrap()
});
static TEMPLATE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<template\b[^>]*?(/?)>|</template\s*>").unwrap());
static SCRIPT_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</script\s*>").unwrap());
static STYLE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</style\s*>").unwrap());
static LANG_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\blang\s*=\s*["']?([^"'\s>]+)"#).unwrap());
static SETUP_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)setup(?:\s|=|$)").unwrap());
static SCOPED_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)scoped(?:\s|=|$)").unwrap());
static MODULE_CONTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:\bcontext\s*=\s*["']module["']|(?:^|\s)module(?:\s|$))"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Template,
    Script,
    Style,
}

impl BlockKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "template" => Some(BlockKind::Template),
            "script" => Some(BlockKind::Script),
            "style" => Some(BlockKind::Style),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Template => "template",
            BlockKind::Script => "script",
            BlockKind::Style => "style",
        }
    }
}

/// One top-level block of a component file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock {
    pub kind: BlockKind,
    pub attrs: String,
    pub lang: Option<String>,
    pub open_tag: Range<usize>,
    pub content: Range<usize>,
    /// `None` for a self-closing block such as `<script setup />`
    pub close_tag: Option<Range<usize>>,
}

impl SfcBlock {
    pub fn is_setup(&self) -> bool {
        SETUP_ATTR_RE.is_match(&self.attrs)
    }

    pub fn is_scoped(&self) -> bool {
        SCOPED_ATTR_RE.is_match(&self.attrs)
    }

    /// Svelte `<script context="module">` / `<script module>`
    pub fn is_module_context(&self) -> bool {
        MODULE_CONTEXT_RE.is_match(&self.attrs)
    }

    pub fn content_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.content.clone()]
    }
}

impl fmt::Display for SfcBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}@{}..{}{}",
            self.kind.tag(),
            self.content.start,
            self.content.end,
            self.lang.as_deref().map(|l| format!("({})", l)).unwrap_or_default()
        )
    }
}

/// Descriptor of a parsed component file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfcDescriptor {
    pub template: Option<SfcBlock>,
    /// Vue `<script>` (options API) / Svelte instance script
    pub script: Option<SfcBlock>,
    /// Vue `<script setup>`
    pub script_setup: Option<SfcBlock>,
    /// Svelte `<script context="module">`
    pub module_script: Option<SfcBlock>,
    pub styles: Vec<SfcBlock>,
}

/// Which flavor of component file is being scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Vue,
    Svelte,
}

/// Parse a Vue single file component into its blocks
pub fn parse_vue_sfc(text: &str) -> Result<SfcDescriptor> {
    let blocks = scan_blocks(text, Flavor::Vue)?;
    let mut descriptor = SfcDescriptor::default();

    for block in blocks {
        match block.kind {
            BlockKind::Template => {
                if descriptor.template.is_some() {
                    bail!("A component can contain only one <template> block");
                }
                descriptor.template = Some(block);
            }
            BlockKind::Script if block.is_setup() => {
                if descriptor.script_setup.is_some() {
                    bail!("A component can contain only one <script setup> block");
                }
                descriptor.script_setup = Some(block);
            }
            BlockKind::Script => {
                if descriptor.script.is_some() {
                    bail!("A component can contain only one <script> block");
                }
                descriptor.script = Some(block);
            }
            BlockKind::Style => descriptor.styles.push(block),
        }
    }

    debug!(
        "Parsed Vue SFC: script={} setup={} styles={}",
        descriptor.script.is_some(),
        descriptor.script_setup.is_some(),
        descriptor.styles.len()
    );
    Ok(descriptor)
}

/// Parse a Svelte component: instance script, module script and styles.
/// Svelte has no `<template>` wrapper, markup lives at the top level.
pub fn parse_svelte(text: &str) -> Result<SfcDescriptor> {
    let blocks = scan_blocks(text, Flavor::Svelte)?;
    let mut descriptor = SfcDescriptor::default();

    for block in blocks {
        match block.kind {
            BlockKind::Script if block.is_module_context() => {
                if descriptor.module_script.is_some() {
                    bail!("A component can contain only one module <script> block");
                }
                descriptor.module_script = Some(block);
            }
            BlockKind::Script => {
                if descriptor.script.is_some() {
                    bail!("A component can contain only one instance <script> block");
                }
                descriptor.script = Some(block);
            }
            BlockKind::Style => descriptor.styles.push(block),
            BlockKind::Template => {}
        }
    }
    Ok(descriptor)
}

fn scan_blocks(text: &str, flavor: Flavor) -> Result<Vec<SfcBlock>> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let Some(open) = BLOCK_OPEN_RE.captures_at(text, pos) else {
            break;
        };
        let whole = open.get(0).map(|m| m.range()).unwrap_or(pos..pos);

        // Skip tags that sit inside an HTML comment
        if let Some(comment_end) = enclosing_comment_end(text, pos, whole.start) {
            pos = comment_end;
            continue;
        }

        let tag = open.get(1).map(|m| m.as_str()).unwrap_or_default();
        let Some(kind) = BlockKind::from_tag(tag) else {
            pos = whole.end;
            continue;
        };
        if flavor == Flavor::Svelte && kind == BlockKind::Template {
            pos = whole.end;
            continue;
        }

        let attrs = open.get(2).map(|m| m.as_str()).unwrap_or_default().to_string();
        let self_closing = open.get(3).is_some_and(|m| !m.as_str().is_empty());
        let lang = LANG_ATTR_RE
            .captures(&attrs)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let (content, close_tag) = if self_closing {
            (whole.end..whole.end, None)
        } else {
            let close = match kind {
                BlockKind::Template => find_template_close(text, whole.end)?,
                BlockKind::Script => SCRIPT_CLOSE_RE
                    .find_at(text, whole.end)
                    .map(|m| m.range())
                    .ok_or_else(|| anyhow!("Unclosed <script> block at byte {}", whole.start))?,
                BlockKind::Style => STYLE_CLOSE_RE
                    .find_at(text, whole.end)
                    .map(|m| m.range())
                    .ok_or_else(|| anyhow!("Unclosed <style> block at byte {}", whole.start))?,
            };
            (whole.end..close.start, Some(close))
        };

        pos = close_tag.as_ref().map(|c| c.end).unwrap_or(whole.end);
        blocks.push(SfcBlock {
            kind,
            attrs,
            lang,
            open_tag: whole,
            content,
            close_tag,
        });
    }

    Ok(blocks)
}

/// Nested `<template>` tags are legal inside the root template
fn find_template_close(text: &str, from: usize) -> Result<Range<usize>> {
    let mut depth = 0usize;
    for caps in TEMPLATE_TAG_RE.captures_iter(&text[from..]) {
        let Some(m) = caps.get(0) else { continue };
        let range = (from + m.start())..(from + m.end());
        if m.as_str().starts_with("</") {
            if depth == 0 {
                return Ok(range);
            }
            depth -= 1;
        } else if caps.get(1).is_none_or(|s| s.as_str().is_empty()) {
            depth += 1;
        }
    }
    Err(anyhow!("Unclosed <template> block"))
}

/// If `tag_start` lies inside an HTML comment opened after `from`, return the
/// offset just past that comment.
fn enclosing_comment_end(text: &str, from: usize, tag_start: usize) -> Option<usize> {
    let mut search = from;
    while let Some(rel) = text[search..tag_start].find("<!--") {
        let open = search + rel;
        let close = text[open + 4..]
            .find("-->")
            .map(|i| open + 4 + i + 3)
            .unwrap_or(text.len());
        if close > tag_start {
            return Some(close);
        }
        search = close;
    }
    None
}
