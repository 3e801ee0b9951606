//! JSX/TSX function components: hooks and handlers inside the component

use super::helpers::run;
use fastvar_syntax::{LanguageTag, Position};

#[tokio::test]
async fn test_state_hook_at_top_of_component() {
    let source = "export default function Header() {
  return <h1>{title}</h1>
}
";
    let (host, _) = run(source, LanguageTag::Jsx, "title}", &["useState", "''"]).await;

    let expected = "export default function Header() {
  const [title, setTitle] = useState('')
  return <h1>{title}</h1>
}
";
    assert_eq!(host.text(), expected);
    assert_eq!(host.cursor, Some(Position::new(1, 40)));
    assert_eq!(host.infos, vec!["Created useState `title` in Header"]);
}

const COUNTER: &str = "import { useState } from 'react'

export function Counter() {
  const [count, setCount] = useState(0)
  return <button onClick={increment}>{count}</button>
}
";

#[tokio::test]
async fn test_handler_after_last_declaration() {
    let (host, _) = run(COUNTER, LanguageTag::Tsx, "increment}", &["arrowFunction"]).await;

    // onClick only offers function kinds
    assert_eq!(host.options(0), vec!["function", "arrowFunction"]);
    let expected = concat!(
        "  const [count, setCount] = useState(0)\n",
        "  const increment = () => {\n",
        "    \n",
        "  }\n",
        "  return <button",
    );
    assert!(host.text().contains(expected), "{}", host.text());
    assert_eq!(host.cursor, Some(Position::new(5, 4)));
}

#[tokio::test]
async fn test_typed_ref_hook_in_tsx() {
    let source = "export function Search() {
  const [query, setQuery] = useState('')
  return <input ref={field} value={query} />
}
";
    let (host, _) = run(source, LanguageTag::Tsx, "field}", &["useRef", "null"]).await;

    assert!(host.text().contains(
        "  const [query, setQuery] = useState('')\n  const field = useRef<any>(null)\n  return"
    ));
    assert_eq!(host.cursor, Some(Position::new(2, 33)));
}

#[tokio::test]
async fn test_destructured_state_collides() {
    let source = COUNTER.replace("onClick={increment}", "onChange={setCount}");
    let (host, plan) = run(&source, LanguageTag::Tsx, "setCount}", &["function"]).await;

    assert!(plan.is_none());
    assert_eq!(host.errors, vec!["`setCount` already exists in Counter"]);
}

#[tokio::test]
async fn test_expression_body_becomes_block() {
    let source = "const Badge = () => <span>{label}</span>

export default Badge
";
    let (host, _) = run(source, LanguageTag::Jsx, "label}", &["useState", "''"]).await;

    let expected = "const Badge = () => {
  const [label, setLabel] = useState('')
  return <span>{label}</span>
}

export default Badge
";
    assert_eq!(host.text(), expected);
    assert_eq!(host.cursor, Some(Position::new(1, 40)));
    assert_eq!(host.infos, vec!["Created useState `label` in Badge"]);
}

#[tokio::test]
async fn test_dotted_state_merges_into_existing_object() {
    let source = "export function Profile() {
  const [user, setUser] = useState({ name: '' })
  return <p>{user.email}</p>
}
";
    let (host, _) = run(source, LanguageTag::Jsx, "user.email", &["useState", "''"]).await;

    assert_eq!(host.options(0), vec!["useState"]);
    assert!(host.text().contains("useState({ name: '', email: '' })"));
}

#[tokio::test]
async fn test_doc_comment_does_not_set_indent_unit() {
    let source = "/**
 * Header component
 */
export function Header() {
  return <button onClick={go}>Go</button>
}
";
    let (host, _) = run(source, LanguageTag::Jsx, "go}", &["function"]).await;

    let expected = concat!(
        "export function Header() {\n",
        "  function go() {\n",
        "    \n",
        "  }\n",
        "  return <button",
    );
    assert!(host.text().contains(expected), "{}", host.text());
    assert_eq!(host.cursor, Some(Position::new(5, 4)));
}
