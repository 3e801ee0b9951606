//! Scoped style rules in Vue and Svelte components

use super::helpers::{run, run_with};
use crate::config::{DeepSelector, FastVarConfig};
use fastvar_syntax::{LanguageTag, Position};

#[tokio::test]
async fn test_style_block_appended_when_missing() {
    let source = "<template>
  <div class=\"card\"></div>
</template>

<script>
export default {
  data() {
    return {}
  }
}
</script>
";
    let (host, _) = run(source, LanguageTag::Vue, "card\"", &["scopedCss", "not deep scope"]).await;

    // class attributes put scopedCss first
    assert_eq!(host.options(0)[0], "scopedCss");
    assert_eq!(host.prompts[1].0, "Select the selector scope");

    let expected = format!("{}\n<style scoped>\n.card {{\n  \n}}\n</style>\n", source);
    assert_eq!(host.text(), expected);
    assert_eq!(host.cursor, Some(Position::new(14, 2)));
    assert_eq!(host.infos, vec!["Created scopedCss `card` in style"]);
}

#[tokio::test]
async fn test_deep_rule_appended_to_scoped_block() {
    let source = "<template>
  <div :id=\"panel\"></div>
</template>

<script setup>
const panel = 'x'
</script>

<style scoped>
.wrapper {
  margin: 0;
}
</style>
";
    let config = FastVarConfig {
        deep_selector: DeepSelector::VDeep,
        ..Default::default()
    };
    let (host, _) = run_with(
        source,
        LanguageTag::Vue,
        "panel\"",
        &["scopedCss", "use deep scope"],
        &config,
    )
    .await;

    let expected = concat!(
        "<style scoped>\n",
        ".wrapper {\n",
        "  margin: 0;\n",
        "}\n",
        "\n",
        "::v-deep #panel {\n",
        "  \n",
        "}\n",
        "</style>\n",
    );
    assert!(host.text().ends_with(expected), "{}", host.text());
    assert_eq!(host.cursor, Some(Position::new(14, 2)));
}

#[tokio::test]
async fn test_svelte_global_rule_keeps_block_indentation() {
    let source = "<div class=\"title\">Hi</div>

<style>
  div { margin: 0; }
</style>
";
    let (host, _) = run(source, LanguageTag::Svelte, "title\"", &["scopedCss", "use deep scope"]).await;

    let expected = concat!(
        "<style>\n",
        "  div { margin: 0; }\n",
        "\n",
        "  :global(.title) {\n",
        "    \n",
        "  }\n",
        "</style>\n",
    );
    assert!(host.text().ends_with(expected), "{}", host.text());
    assert_eq!(host.cursor, Some(Position::new(6, 4)));
}

#[tokio::test]
async fn test_existing_selector_collides() {
    let source = "<template>
  <div class=\"card\"></div>
</template>

<script setup>
</script>

<style scoped>
.card { padding: 0; }
</style>
";
    let (host, plan) = run(source, LanguageTag::Vue, "card\"", &["scopedCss"]).await;

    assert!(plan.is_none());
    assert_eq!(host.text(), source);
    assert_eq!(host.errors, vec!["`.card` already exists in the style block"]);
}
