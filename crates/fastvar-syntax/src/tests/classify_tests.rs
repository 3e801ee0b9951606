use crate::classify::{BlockClassification, classify};
use crate::language::LanguageTag;
use crate::regions::OptionsFlavor;

const LEGACY_COMPONENT: &str = r#"<template>
  <button @click="increment">{{ count }}</button>
</template>

<script>
export default {
  data() {
    return {
      count: 0
    }
  },
  methods: {
    increment() {
      this.count++
    }
  }
}
</script>
"#;

#[test]
fn test_legacy_export_object_is_classified() {
    let classified = classify(LEGACY_COMPONENT, LanguageTag::Vue);
    match &classified.classification {
        BlockClassification::LegacyOptions(script, flavor) => {
            assert_eq!(*flavor, OptionsFlavor::ExportObject);
            assert!(script.source().contains("methods"));
            assert_eq!(
                &classified.document.text()[script.region.start..script.region.end],
                script.source()
            );
        }
        other => panic!("expected legacy options, got {}", other),
    }
}

#[test]
fn test_define_component_flavor() {
    let text = "<script lang=\"ts\">\nimport { defineComponent } from 'vue'\nexport default defineComponent({\n  methods: {}\n})\n</script>";
    let classified = classify(text, LanguageTag::Vue);
    assert!(matches!(
        classified.classification,
        BlockClassification::LegacyOptions(_, OptionsFlavor::DefineComponent)
    ));
}

#[test]
fn test_classification_is_idempotent() {
    let first = classify(LEGACY_COMPONENT, LanguageTag::Vue);
    let second = classify(LEGACY_COMPONENT, LanguageTag::Vue);
    assert_eq!(
        first.classification.variant_name(),
        second.classification.variant_name()
    );
    let a = first.classification.script().unwrap();
    let b = second.classification.script().unwrap();
    assert_eq!(a.region, b.region);
    assert_eq!(first.document, second.document);
}

#[test]
fn test_plain_script_without_options_object_is_unrecognized() {
    let text = "<script>\nconsole.log('hi')\n</script>";
    assert!(!classify(text, LanguageTag::Vue).classification.is_recognized());
}

#[test]
fn test_whitespace_only_setup_block_is_staged() {
    let text = "<template>\n  <div>{{ msg }}</div>\n</template>\n\n<script setup>\n\n\n</script>\n";
    let classified = classify(text, LanguageTag::Vue);
    let edit = classified.staged_edit.as_ref().unwrap();
    assert_eq!(edit.text, "<script setup>\n</script>");
    assert_eq!(edit.range.start.line, 4);

    let script = classified.classification.script().unwrap();
    assert_eq!(script.source(), "\n");
    assert!(script.close_tag.is_some());
}

#[test]
fn test_svelte_markup_with_script() {
    let text = "<script>\n  let count = 0\n</script>\n\n<button on:click={increment}>{count}</button>\n";
    let classified = classify(text, LanguageTag::Svelte);
    match &classified.classification {
        BlockClassification::MarkupWithStyle(Some(script)) => {
            assert!(script.source().contains("let count"));
        }
        other => panic!("expected svelte markup, got {}", other),
    }
}

#[test]
fn test_svelte_without_script_is_still_markup() {
    let text = "<h1 class=\"title\">Hello</h1>\n";
    let classified = classify(text, LanguageTag::Svelte);
    assert!(matches!(
        classified.classification,
        BlockClassification::MarkupWithStyle(None)
    ));
}

#[test]
fn test_function_component_detection() {
    let text = "import React from 'react'\n\nexport default function App() {\n  return <div>Hello</div>\n}\n";
    assert!(matches!(
        classify(text, LanguageTag::Jsx).classification,
        BlockClassification::FunctionComponent(_)
    ));

    let plain = "export function add(a, b) {\n  return a + b\n}\n";
    assert!(!classify(plain, LanguageTag::Jsx).classification.is_recognized());
}

#[test]
fn test_tsx_component_with_types() {
    let text = "type Props = { name: string }\n\nconst Hello = ({ name }: Props) => {\n  return <h1>{name}</h1>\n}\n";
    assert!(matches!(
        classify(text, LanguageTag::Tsx).classification,
        BlockClassification::FunctionComponent(_)
    ));
}
