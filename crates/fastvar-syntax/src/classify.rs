//! Block classification
//!
//! `classify()` is the only entry point the rest of the tool needs: it takes
//! the raw buffer text and the host's language tag and decides which
//! component-authoring style the file uses. It never fails; anything it
//! cannot make sense of is `Unrecognized`.

use crate::document::{Range, SourceDocument};
use crate::language::{LanguageTag, ScriptLang};
use crate::patterns::{PatternName, PatternTable};
use crate::regions::{OptionsFlavor, Region, find_options_object, renders_markup_anywhere};
use crate::script::parse_script;
use crate::sfc::{SfcBlock, SfcDescriptor, parse_svelte, parse_vue_sfc};
use anyhow::{Result, anyhow};
use std::fmt;
use tracing::debug;
use tree_sitter::Tree;

/// A parsed script body located inside the working document
#[derive(Debug, Clone)]
pub struct ScriptBlock {
    /// Content of the script block; the whole file for function components
    pub region: Region,
    pub lang: ScriptLang,
    pub tree: Tree,
    /// Offset of the `</script>` tag, when there is one
    pub close_tag: Option<usize>,
}

impl ScriptBlock {
    pub fn source(&self) -> &str {
        &self.region.raw
    }

    pub fn base(&self) -> usize {
        self.region.start
    }

    fn parse(block: &SfcBlock, text: &str, name: &str) -> Result<Self> {
        let lang = ScriptLang::from_lang_attr(block.lang.as_deref());
        Self::parse_range(text, block.content.start, block.content.end, lang, name)
            .map(|mut script| {
                script.close_tag = block.close_tag.as_ref().map(|c| c.start);
                script
            })
    }

    fn parse_range(text: &str, start: usize, end: usize, lang: ScriptLang, name: &str) -> Result<Self> {
        let raw = &text[start..end];
        let tree = parse_script(raw, lang)?;
        if tree.root_node().has_error() {
            return Err(anyhow!("{} block has syntax errors", name));
        }
        Ok(Self {
            region: Region {
                name: name.to_string(),
                start,
                end,
                raw: raw.to_string(),
            },
            lang,
            tree,
            close_tag: None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum BlockClassification {
    /// `<script>` exporting an options object
    LegacyOptions(ScriptBlock, OptionsFlavor),
    /// `<script setup>`
    CompositionSetup(ScriptBlock),
    /// A script file whose functions render markup
    FunctionComponent(ScriptBlock),
    /// Svelte markup with an optional instance script
    MarkupWithStyle(Option<ScriptBlock>),
    Unrecognized,
}

impl BlockClassification {
    pub fn variant_name(&self) -> &'static str {
        match self {
            BlockClassification::LegacyOptions(..) => "legacy-options",
            BlockClassification::CompositionSetup(_) => "composition-setup",
            BlockClassification::FunctionComponent(_) => "function-component",
            BlockClassification::MarkupWithStyle(_) => "markup-with-style",
            BlockClassification::Unrecognized => "unrecognized",
        }
    }

    pub fn script(&self) -> Option<&ScriptBlock> {
        match self {
            BlockClassification::LegacyOptions(script, _)
            | BlockClassification::CompositionSetup(script)
            | BlockClassification::FunctionComponent(script) => Some(script),
            BlockClassification::MarkupWithStyle(script) => script.as_ref(),
            BlockClassification::Unrecognized => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, BlockClassification::Unrecognized)
    }
}

impl fmt::Display for BlockClassification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.variant_name())
    }
}

/// Edit that must land before the planned edit: an empty `<script setup>`
/// block rewritten so its body has non-zero width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEdit {
    /// Replaced span in the original buffer
    pub range: Range,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Result of one classification pass
#[derive(Debug, Clone)]
pub struct Classified {
    pub language: LanguageTag,
    /// The buffer text with the staged edit already applied. All regions and
    /// every plan computed from them refer to this document.
    pub document: SourceDocument,
    pub staged_edit: Option<StagedEdit>,
    pub sfc: Option<SfcDescriptor>,
    pub classification: BlockClassification,
}

impl Classified {
    pub fn unrecognized(language: LanguageTag, document: SourceDocument) -> Self {
        Self {
            language,
            document,
            staged_edit: None,
            sfc: None,
            classification: BlockClassification::Unrecognized,
        }
    }
}

/// Classify `text` with the pattern table of its language
pub fn classify(text: &str, language: LanguageTag) -> Classified {
    classify_with(text, language, PatternTable::for_language(language))
}

pub fn classify_with(text: &str, language: LanguageTag, patterns: &PatternTable) -> Classified {
    let original = SourceDocument::new(text);
    let staged_edit = stage_empty_setup(&original, patterns);
    let working = match &staged_edit {
        Some(edit) => {
            let mut staged = String::with_capacity(text.len() + edit.text.len());
            staged.push_str(&text[..edit.start]);
            staged.push_str(&edit.text);
            staged.push_str(&text[edit.end..]);
            SourceDocument::new(staged)
        }
        None => original,
    };

    let result = match language {
        LanguageTag::Vue => classify_vue(working.text()),
        LanguageTag::Svelte => classify_svelte(working.text()),
        LanguageTag::Jsx | LanguageTag::Tsx => classify_function_component(working.text(), language),
    };

    match result {
        Ok((classification, sfc)) => {
            debug!("Classified {} file as {}", language, classification);
            Classified {
                language,
                document: working,
                staged_edit,
                sfc,
                classification,
            }
        }
        Err(e) => {
            debug!("Classification of {} file failed: {}", language, e);
            Classified::unrecognized(language, working)
        }
    }
}

fn stage_empty_setup(document: &SourceDocument, patterns: &PatternTable) -> Option<StagedEdit> {
    let re = patterns.get(PatternName::EmptySetupBlock)?;
    let m = re.find(document.text())?;
    let matched = m.as_str();

    let open_end = matched.find('>')? + 1;
    let open_tag = matched[..open_end]
        .trim_end_matches('>')
        .trim_end_matches('/')
        .trim_end();
    let replacement = format!("{}>\n</script>", open_tag);
    if replacement == matched {
        return None;
    }

    debug!("Staging placeholder body for empty <script setup> block");
    Some(StagedEdit {
        range: document.range_of(m.start(), m.end()),
        start: m.start(),
        end: m.end(),
        text: replacement,
    })
}

type ClassifyResult = Result<(BlockClassification, Option<SfcDescriptor>)>;

fn classify_vue(text: &str) -> ClassifyResult {
    let sfc = parse_vue_sfc(text)?;

    let classification = if let Some(setup) = &sfc.script_setup {
        BlockClassification::CompositionSetup(ScriptBlock::parse(setup, text, "script setup")?)
    } else if let Some(script) = &sfc.script {
        let block = ScriptBlock::parse(script, text, "script")?;
        let (_, flavor) = find_options_object(&block.tree, block.source(), block.base())
            .ok_or_else(|| anyhow!("<script> does not export an options object"))?;
        BlockClassification::LegacyOptions(block, flavor)
    } else {
        return Err(anyhow!("Component has no script block"));
    };

    Ok((classification, Some(sfc)))
}

fn classify_svelte(text: &str) -> ClassifyResult {
    let sfc = parse_svelte(text)?;
    let script = sfc
        .script
        .as_ref()
        .map(|block| ScriptBlock::parse(block, text, "script"))
        .transpose()?;
    Ok((BlockClassification::MarkupWithStyle(script), Some(sfc)))
}

fn classify_function_component(text: &str, language: LanguageTag) -> ClassifyResult {
    let lang = match language {
        LanguageTag::Tsx => ScriptLang::Tsx,
        _ => ScriptLang::JavaScript,
    };
    let block = ScriptBlock::parse_range(text, 0, text.len(), lang, "module")?;
    if !renders_markup_anywhere(&block.tree) {
        return Err(anyhow!("No function in the file renders markup"));
    }
    Ok((BlockClassification::FunctionComponent(block), None))
}
