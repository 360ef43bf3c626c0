use crate::ast::import_export::ImportNames;
use crate::ast::import_export::ImportStmt;
use crate::ast::jsx::JsxElem;
use crate::ast::jsx::JsxElemName;
use crate::ast::node::Node;
use crate::ast::stx::Stmt;
use crate::error::SyntaxErrorType;
use crate::parse;
use crate::parse::SyntaxTree;
use derive_visitor::Drive;
use derive_visitor::Visitor;

type JsxElemNode = Node<JsxElem>;

#[derive(Default, Visitor)]
#[visitor(JsxElemNode(enter))]
struct ElemNames {
  names: Vec<String>,
}

impl ElemNames {
  fn enter_jsx_elem_node(&mut self, node: &JsxElemNode) {
    self.names.push(match &node.stx.name {
      None => "<>".to_string(),
      Some(JsxElemName::Id(n)) => n.stx.name.clone(),
      Some(JsxElemName::Member(n)) => format!("{}.{}", n.stx.base, n.stx.path.join(".")),
      Some(JsxElemName::Namespaced(n)) => {
        format!("{}:{}", n.stx.namespace.as_deref().unwrap_or(""), n.stx.name)
      }
    });
  }
}

fn elems(tree: &SyntaxTree) -> Vec<String> {
  let mut v = ElemNames::default();
  tree.top_level.drive(&mut v);
  v.names
}

fn codes(tree: &SyntaxTree) -> Vec<&'static str> {
  tree.errors.iter().map(|e| e.typ.code()).collect()
}

fn imports(tree: &SyntaxTree) -> Vec<&ImportStmt> {
  tree
    .top_level
    .stx
    .body
    .iter()
    .filter_map(|s| match s.stx.as_ref() {
      Stmt::Import(i) => Some(i.stx.as_ref()),
      Stmt::Code(_) => None,
    })
    .collect()
}

fn parse_tsx(source: &str) -> SyntaxTree {
  parse(source, "test.tsx").unwrap()
}

#[test]
fn test_parse_import_clauses() {
  let tree = parse_tsx(concat!(
    "import React, { useState as useS, \"kebab-name\" as kebab, default as Def } from 'react';\n",
    "import * as UI from \"ui\"\n",
    "import './side-effect.css'\n",
  ));
  assert!(tree.errors.is_empty(), "{:?}", tree.errors);
  let imports = imports(&tree);
  assert_eq!(imports.len(), 3);

  let first = imports[0];
  assert_eq!(first.module.as_deref(), Some("react"));
  assert_eq!(first.default_value_name(), Some("React"));
  let Some(ImportNames::Specific(names)) = &first.names else {
    panic!("expected specific names");
  };
  let pairs: Vec<_> = names
    .iter()
    .map(|n| (n.stx.importable.as_str(), n.stx.alias.stx.name.as_str()))
    .collect();
  assert_eq!(pairs, vec![
    ("useState", "useS"),
    ("kebab-name", "kebab"),
    ("default", "Def")
  ]);

  let Some(ImportNames::All(ns)) = &imports[1].names else {
    panic!("expected namespace import");
  };
  assert_eq!(ns.stx.name, "UI");

  assert!(imports[2].default.is_none());
  assert!(imports[2].names.is_none());
  assert_eq!(imports[2].module.as_deref(), Some("./side-effect.css"));
}

#[test]
fn test_parse_type_only_imports() {
  let tree = parse_tsx(concat!(
    "import type { A } from 'a'\n",
    "import type from 'type-default'\n",
    "import { type B, type, type as T } from 'b'\n",
  ));
  assert!(tree.errors.is_empty(), "{:?}", tree.errors);
  let imports = imports(&tree);
  assert!(imports[0].type_only);
  assert_eq!(imports[0].specific_value_names().count(), 0);
  assert!(!imports[1].type_only);
  assert_eq!(imports[1].default_value_name(), Some("type"));
  assert_eq!(imports[2].specific_value_names().collect::<Vec<_>>(), vec![
    "type", "T"
  ]);
}

#[test]
fn test_parse_import_attributes() {
  let tree = parse_tsx("import data from './data.json' with { type: 'json' };\nconst x = <A />;");
  assert!(tree.errors.is_empty(), "{:?}", tree.errors);
  assert_eq!(imports(&tree)[0].module.as_deref(), Some("./data.json"));
  assert_eq!(elems(&tree), vec!["A"]);
}

#[test]
fn test_parse_dynamic_import_is_code() {
  let tree = parse_tsx("import('./lazy').then(m => m);\nconst u = import.meta.url;");
  assert!(imports(&tree).is_empty());
  assert!(tree.errors.is_empty(), "{:?}", tree.errors);
}

#[test]
fn test_parse_truncated_import() {
  let tree = parse_tsx("import { Button, Card");
  let imports = imports(&tree);
  assert_eq!(imports.len(), 1);
  assert_eq!(imports[0].specific_value_names().collect::<Vec<_>>(), vec![
    "Button", "Card"
  ]);
  assert_eq!(imports[0].module, None);
  assert!(!tree.errors.is_empty());
}

#[test]
fn test_parse_jsx_nesting() {
  let tree = parse_tsx(concat!(
    "export function App() {\n",
    "  return (\n",
    "    <Layout title=\"a > b\" {...props}>\n",
    "      <>\n",
    "        <Nav.Item icon={<Icon />} />\n",
    "        {list.map((x) => <Row key={x}>{x}</Row>)}\n",
    "        <svg:rect />\n",
    "      </>\n",
    "    </Layout>\n",
    "  );\n",
    "}\n",
  ));
  assert!(tree.errors.is_empty(), "{:?}", tree.errors);
  assert_eq!(elems(&tree), vec![
    "Layout", "<>", "Nav.Item", "Icon", "Row", "svg:rect"
  ]);
}

#[test]
fn test_parse_comparisons_are_not_jsx() {
  let tree = parse_tsx("if (a < b && c > d) { x = a<b ? 1 : 2 }\nfor (let i = 0; i < n; i++) {}");
  assert!(elems(&tree).is_empty());
  assert!(tree.errors.is_empty(), "{:?}", tree.errors);
}

#[test]
fn test_parse_tsx_generics_are_not_jsx() {
  let tree = parse_tsx(concat!(
    "const id = <T,>(x: T) => x;\n",
    "const f = <T extends object>(x: T) => x;\n",
    "type Fn = <T>(x: T) => Array<Map<string, Set<T>>>\n",
    "interface Props { render: <P>(p: P) => void }\n",
    "const el = <Card />;\n",
  ));
  assert_eq!(elems(&tree), vec!["Card"]);
}

#[test]
fn test_parse_generic_function_type_annotations_are_not_jsx() {
  let tree = parse_tsx(concat!(
    "let f: <T>(x: T) => T = (x) => x;\n",
    "function g(cb: <K>(k: (K)) => void) {}\n",
    "const el = ready ? <Card /> : <Badge>(new)</Badge>;\n",
  ));
  assert!(tree.errors.is_empty(), "{:?}", tree.errors);
  assert_eq!(elems(&tree), vec!["Card", "Badge"]);
}

#[test]
fn test_parse_regex_and_templates() {
  let tree = parse_tsx(concat!(
    "const r = /\"[<]/g;\n",
    "const t = `a ${<Inner />} b ${`nested ${<Deep />}`}`;\n",
    "const x = <Outer />;\n",
  ));
  assert!(tree.errors.is_empty(), "{:?}", tree.errors);
  assert_eq!(elems(&tree), vec!["Inner", "Deep", "Outer"]);
}

#[test]
fn test_parse_plain_ts_never_has_jsx() {
  let tree = parse("const a = <Foo>bar;\nconst b = <Bar />;", "test.ts").unwrap();
  assert!(elems(&tree).is_empty());
}

#[test]
fn test_parse_js_allows_jsx() {
  let tree = parse("export default () => <Foo />", "test.js").unwrap();
  assert_eq!(elems(&tree), vec!["Foo"]);
}

#[test]
fn test_parse_recovers_from_mismatched_closing_tag() {
  let tree = parse_tsx("const a = <A><B></C></A>;\nconst b = <D />;");
  assert_eq!(elems(&tree), vec!["A", "B", "D"]);
  assert!(codes(&tree).contains(&SyntaxErrorType::JsxClosingTagMismatch.code()));
}

#[test]
fn test_parse_recovers_from_unterminated_markup() {
  let tree = parse_tsx("const a = <A><B />");
  assert_eq!(elems(&tree), vec!["A", "B"]);
  assert_eq!(codes(&tree), vec![SyntaxErrorType::UnterminatedJsxElement.code()]);
}

#[test]
fn test_parse_recovers_from_unclosed_groups_and_strings() {
  let tree = parse_tsx("const s = \"oops\nfunction f() {\n  return <A />\n");
  assert_eq!(elems(&tree), vec!["A"]);
  let codes = codes(&tree);
  assert!(codes.contains(&SyntaxErrorType::InvalidToken.code()));
  assert!(codes.contains(&SyntaxErrorType::UnclosedDelimiter(crate::token::TT::BraceOpen).code()));
}

#[test]
fn test_parse_stray_closer() {
  let tree = parse_tsx("}\nconst x = <A />;");
  assert_eq!(elems(&tree), vec!["A"]);
  assert_eq!(codes(&tree), vec![SyntaxErrorType::UnexpectedToken.code()]);
}

#[test]
fn test_parse_nesting_limit() {
  // Unoptimised builds use much larger stack frames than release builds.
  std::thread::Builder::new()
    .stack_size(64 << 20)
    .spawn(|| {
      let source = "(".repeat(super::MAX_NESTING_DEPTH + 10);
      let err = parse(&source, "deep.tsx").unwrap_err();
      assert_eq!(err.typ, SyntaxErrorType::NestingTooDeep);

      let markup = "<a>".repeat(super::MAX_NESTING_DEPTH + 1);
      let err = parse(&format!("x = {markup}"), "deep.tsx").unwrap_err();
      assert_eq!(err.typ, SyntaxErrorType::NestingTooDeep);

      let ok = format!("{}{}", "(".repeat(100), ")".repeat(100));
      assert!(parse(&ok, "shallow.tsx").unwrap().errors.is_empty());
    })
    .unwrap()
    .join()
    .unwrap();
}

#[test]
fn test_parse_import_after_code() {
  let tree = parse_tsx("const a = 1\nimport { B } from 'b'\nfoo(); import C from 'c'");
  let imports = imports(&tree);
  assert_eq!(imports.len(), 2);
  assert_eq!(imports[1].default_value_name(), Some("C"));
}
