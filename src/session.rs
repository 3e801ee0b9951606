//! The create-variable command
//!
//! One invocation is one async task: classify the buffer, resolve the
//! candidate, then walk the prompts (declaration kind, initial value, deep
//! scope) in order. Every check runs before the first buffer mutation, and a
//! dismissed prompt ends the command without an edit.

use crate::applier::{self, TextEdit};
use crate::collision;
use crate::config::FastVarConfig;
use crate::dialects;
use crate::dialects::style::DEEP_CHOICES;
use crate::errors::CreateError;
use crate::kinds::{self, DeclarationKind, DialectKey, InitialValue};
use crate::plan::{InsertionPlan, PlanRequest};
use crate::resolver::{self, CandidateName, EditorSelection};
use anyhow::Result;
use async_trait::async_trait;
use fastvar_syntax::{Classified, LanguageTag, Position, SourceDocument, classify};
use tracing::{debug, error, info};

/// What the core needs from the editor
#[async_trait]
pub trait EditorHost: Send {
    /// Show a picker; `None` when it was dismissed
    async fn pick(&mut self, title: &str, options: &[String]) -> Option<usize>;

    /// Apply edits in order, each against the buffer left by the previous one
    async fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<()>;

    async fn jump_to(&mut self, position: Position) -> Result<()>;

    async fn show_info(&mut self, message: &str);

    async fn show_error(&mut self, message: &str);
}

/// Buffer snapshot and selection handed over by the host
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub text: String,
    pub language: LanguageTag,
    pub selection: EditorSelection,
}

/// Answers known up front; each one skips its prompt
#[derive(Debug, Clone, Default)]
pub struct PresetAnswers {
    /// Picker label, e.g. `methods` or `ref`
    pub kind: Option<String>,
    pub value: Option<InitialValue>,
    pub deep: Option<bool>,
}

/// A validated command ready to plan
struct Prepared {
    dialect: DialectKey,
    kind: DeclarationKind,
    candidate: CandidateName,
    target: collision::DeclarationTarget,
    value: Option<InitialValue>,
    deep: bool,
    prefix: Option<String>,
    cursor: usize,
}

pub struct CreateVariable<'c> {
    config: &'c FastVarConfig,
    presets: PresetAnswers,
}

impl<'c> CreateVariable<'c> {
    pub fn new(config: &'c FastVarConfig) -> Self {
        Self {
            config,
            presets: PresetAnswers::default(),
        }
    }

    pub fn with_presets(mut self, presets: PresetAnswers) -> Self {
        self.presets = presets;
        self
    }

    /// Run the command. Returns the applied plan, or `None` when the command
    /// stopped without editing (the user has been told why, unless the
    /// reason is silent).
    pub async fn run<H>(&self, host: &mut H, request: &CreateRequest) -> Result<Option<InsertionPlan>>
    where
        H: EditorHost + ?Sized,
    {
        let classified = classify(&request.text, request.language);

        let plan = self
            .prepare(host, request, &classified)
            .await
            .and_then(|prepared| self.plan(&classified, &prepared));

        let plan = match plan {
            Ok(plan) => plan,
            Err(e) if e.is_silent() => {
                debug!("Create variable aborted: {}", e);
                return Ok(None);
            }
            Err(e) => {
                info!("Create variable refused: {}", e);
                host.show_error(&e.to_string()).await;
                return Ok(None);
            }
        };

        if let Err(e) = applier::apply(host, &classified, &plan).await {
            error!("Failed to apply edit: {:#}", e);
            return Err(e);
        }
        Ok(Some(plan))
    }

    async fn prepare<H>(
        &self,
        host: &mut H,
        request: &CreateRequest,
        classified: &Classified,
    ) -> Result<Prepared, CreateError>
    where
        H: EditorHost + ?Sized,
    {
        let dialect = DialectKey::of(&classified.classification).ok_or(CreateError::ParseFailure)?;

        let original = SourceDocument::new(request.text.as_str());
        let resolved = resolver::resolve(&original, &request.selection)?;
        let cursor = working_offset(classified, original.offset_at(request.selection.position));

        let kind = self
            .pick_kind(host, dialect, resolved.prefix.as_deref(), resolved.is_dotted())
            .await?;
        debug!("Chosen kind: {} ({})", kind, dialect);

        let candidate = CandidateName::normalize(&resolved.raw, kind)?;
        let target = collision::resolve_target(classified, dialect, kind, cursor)?;
        collision::check(classified, &target, &candidate, resolved.prefix.as_deref())?;

        let value = if kind.takes_initial_value() {
            Some(self.pick_value(host, kind, candidate.is_dotted()).await?)
        } else {
            None
        };
        let deep = if kind.is_style() {
            self.pick_deep(host).await?
        } else {
            false
        };

        Ok(Prepared {
            dialect,
            kind,
            candidate,
            target,
            value,
            deep,
            prefix: resolved.prefix,
            cursor,
        })
    }

    fn plan(&self, classified: &Classified, prepared: &Prepared) -> Result<InsertionPlan, CreateError> {
        let request = PlanRequest {
            classified,
            dialect: prepared.dialect,
            kind: prepared.kind,
            candidate: &prepared.candidate,
            target: &prepared.target,
            value: prepared.value,
            deep: prepared.deep,
            prefix: prepared.prefix.as_deref(),
            cursor: prepared.cursor,
            config: self.config,
        };
        dialects::plan(&request)
    }

    async fn pick_kind<H>(
        &self,
        host: &mut H,
        dialect: DialectKey,
        prefix: Option<&str>,
        dotted: bool,
    ) -> Result<DeclarationKind, CreateError>
    where
        H: EditorHost + ?Sized,
    {
        if let Some(label) = &self.presets.kind {
            return dialect.kind_from_label(label).ok_or_else(|| {
                CreateError::MissingContainer(format!(
                    "`{}` is not offered in {} components",
                    label, dialect
                ))
            });
        }

        let menu = kinds::menu(dialect, prefix, dotted);
        let labels: Vec<String> = menu.iter().map(|k| k.label().to_string()).collect();
        let choice = host
            .pick("Select the declaration kind", &labels)
            .await
            .ok_or(CreateError::UserCancelled)?;
        menu.get(choice).copied().ok_or(CreateError::UserCancelled)
    }

    async fn pick_value<H>(
        &self,
        host: &mut H,
        kind: DeclarationKind,
        dotted: bool,
    ) -> Result<InitialValue, CreateError>
    where
        H: EditorHost + ?Sized,
    {
        if let Some(value) = self.presets.value {
            return Ok(value);
        }
        let values = kind.values_for(dotted);
        let labels: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let choice = host
            .pick("Select the initial value", &labels)
            .await
            .ok_or(CreateError::UserCancelled)?;
        values.get(choice).copied().ok_or(CreateError::UserCancelled)
    }

    async fn pick_deep<H>(&self, host: &mut H) -> Result<bool, CreateError>
    where
        H: EditorHost + ?Sized,
    {
        if let Some(deep) = self.presets.deep {
            return Ok(deep);
        }
        let labels: Vec<String> = DEEP_CHOICES.iter().map(|s| s.to_string()).collect();
        let choice = host
            .pick("Select the selector scope", &labels)
            .await
            .ok_or(CreateError::UserCancelled)?;
        Ok(choice == 0)
    }
}

/// Map an offset in the host's buffer to the working document
fn working_offset(classified: &Classified, offset: usize) -> usize {
    match &classified.staged_edit {
        Some(staged) if offset >= staged.end => {
            offset + staged.text.len() - (staged.end - staged.start)
        }
        Some(staged) if offset > staged.start => staged.start,
        _ => offset,
    }
}
