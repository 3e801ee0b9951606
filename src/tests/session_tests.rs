//! Prompt flow: dismissed pickers, preset answers and silent aborts

use super::helpers::{ScriptedHost, cursor_in, run};
use crate::config::FastVarConfig;
use crate::kinds::InitialValue;
use crate::resolver::EditorSelection;
use crate::session::{CreateRequest, CreateVariable, PresetAnswers};
use fastvar_syntax::{LanguageTag, Position};

const SETUP: &str = "<script setup>
import { ref } from 'vue'
</script>

<template>
  <p>{{ count }}</p>
  <p>{{ first-name }}</p>
</template>
";

#[tokio::test]
async fn test_dismissed_kind_picker_changes_nothing() {
    let (host, plan) = run(SETUP, LanguageTag::Vue, "count }}", &[]).await;

    assert!(plan.is_none());
    assert_eq!(host.text(), SETUP);
    assert_eq!(host.prompts.len(), 1);
    assert_eq!(host.prompts[0].0, "Select the declaration kind");
    assert!(host.errors.is_empty());
    assert!(host.infos.is_empty());
    assert_eq!(host.cursor, None);
}

#[tokio::test]
async fn test_dismissed_value_picker_changes_nothing() {
    let (host, plan) = run(SETUP, LanguageTag::Vue, "count }}", &["ref"]).await;

    assert!(plan.is_none());
    assert_eq!(host.prompts.len(), 2);
    assert_eq!(host.prompts[1].0, "Select the initial value");
    assert_eq!(host.prompts[1].1.len(), 8);
    assert!(host.edit_batches.is_empty());
    assert!(host.errors.is_empty());
}

#[tokio::test]
async fn test_invalid_identifier_is_reported_after_kind_pick() {
    let (host, plan) = run(SETUP, LanguageTag::Vue, "first-name", &["ref"]).await;

    assert!(plan.is_none());
    assert_eq!(host.errors, vec!["'first-name' is not a valid name here"]);
}

#[tokio::test]
async fn test_unrecognized_file_aborts_silently() {
    let source = "<template>\n  <p>{{ count }}</p>\n</template>\n";
    let (host, plan) = run(source, LanguageTag::Vue, "count }}", &["ref"]).await;

    assert!(plan.is_none());
    assert!(host.prompts.is_empty());
    assert!(host.errors.is_empty());
}

#[tokio::test]
async fn test_script_with_syntax_errors_aborts_silently() {
    let source = "<script setup>\nconst a = (\n</script>\n<template>{{ count }}</template>\n";
    let (host, plan) = run(source, LanguageTag::Vue, "count }}", &["ref"]).await;

    assert!(plan.is_none());
    assert!(host.prompts.is_empty());
    assert_eq!(host.text(), source);
}

fn request_at(needle: &str) -> CreateRequest {
    CreateRequest {
        text: SETUP.to_string(),
        language: LanguageTag::Vue,
        selection: EditorSelection::cursor(cursor_in(SETUP, needle, 1)),
    }
}

#[tokio::test]
async fn test_presets_skip_every_prompt() {
    let config = FastVarConfig::default();
    let presets = PresetAnswers {
        kind: Some("shallowRef".to_string()),
        value: InitialValue::parse("[]"),
        deep: None,
    };
    let mut host = ScriptedHost::new(SETUP, &[]);
    let plan = CreateVariable::new(&config)
        .with_presets(presets)
        .run(&mut host, &request_at("count }}"))
        .await
        .unwrap();

    assert!(plan.is_some());
    assert!(host.prompts.is_empty());
    assert!(host.text().contains("import { ref } from 'vue'\nconst count = shallowRef([])\n"));
    assert_eq!(host.cursor, Some(Position::new(2, 28)));
}

#[tokio::test]
async fn test_preset_kind_outside_vocabulary_is_refused() {
    let config = FastVarConfig::default();
    let presets = PresetAnswers {
        kind: Some("useState".to_string()),
        ..Default::default()
    };
    let mut host = ScriptedHost::new(SETUP, &[]);
    let plan = CreateVariable::new(&config)
        .with_presets(presets)
        .run(&mut host, &request_at("count }}"))
        .await
        .unwrap();

    assert!(plan.is_none());
    assert_eq!(host.errors, vec!["`useState` is not offered in composition components"]);
}

#[tokio::test]
async fn test_selection_wins_over_cursor_token() {
    let config = FastVarConfig::default();
    let request = CreateRequest {
        text: SETUP.to_string(),
        language: LanguageTag::Vue,
        selection: EditorSelection {
            selected: " 'total' ".to_string(),
            position: cursor_in(SETUP, "count }}", 0),
        },
    };
    let mut host = ScriptedHost::new(SETUP, &["ref", "0"]);
    CreateVariable::new(&config).run(&mut host, &request).await.unwrap();

    assert!(host.text().contains("const total = ref(0)"));
}
