use crate::ast::jsx::JsxElem;
use crate::ast::jsx::JsxElemName;
use crate::ast::node::Node;
use crate::parse::SyntaxTree;
use ahash::HashSet;
use derive_visitor::Drive;
use derive_visitor::Visitor;

type JsxElemNode = Node<JsxElem>;

/// Distinct component names used as markup tag names, in order of first use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsedComponents {
  seen: HashSet<String>,
  order: Vec<String>,
}

impl UsedComponents {
  pub fn insert(&mut self, name: &str) -> bool {
    if self.seen.contains(name) {
      return false;
    };
    self.seen.insert(name.to_string());
    self.order.push(name.to_string());
    true
  }

  pub fn contains(&self, name: &str) -> bool {
    self.seen.contains(name)
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.order.iter().map(String::as_str)
  }
}

impl<'a> FromIterator<&'a str> for UsedComponents {
  fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
    let mut used = UsedComponents::default();
    for name in iter {
      used.insert(name);
    }
    used
  }
}

#[derive(Default, Visitor)]
#[visitor(JsxElemNode(enter))]
struct TagNameCollector {
  used: UsedComponents,
}

impl TagNameCollector {
  fn enter_jsx_elem_node(&mut self, node: &JsxElemNode) {
    // Member tags (`Foo.Bar`), namespaced tags and fragments don't name a single importable binding.
    if let Some(JsxElemName::Id(id)) = &node.stx.name {
      self.used.insert(&id.stx.name);
    };
  }
}

/// Collects the name of every element with a plain identifier tag, at any depth. Intrinsic
/// lowercase tags like `div` are included; whether they mean anything is up to the configuration.
pub fn collect_used_components(tree: &SyntaxTree) -> UsedComponents {
  let mut collector = TagNameCollector::default();
  tree.top_level.drive(&mut collector);
  collector.used
}

#[cfg(test)]
mod tests {
  use super::collect_used_components;
  use crate::parse;

  fn used(source: &str, file_name: &str) -> Vec<String> {
    let tree = parse(source, file_name).unwrap();
    collect_used_components(&tree)
      .iter()
      .map(str::to_string)
      .collect()
  }

  #[test]
  fn collects_in_first_use_order_without_duplicates() {
    let names = used(
      "const App = () => <Layout><Button /><Card>{items.map(i => <Button key={i} />)}</Card></Layout>;",
      "app.tsx",
    );
    assert_eq!(names, vec!["Layout", "Button", "Card"]);
  }

  #[test]
  fn includes_lowercase_and_hyphenated_tags() {
    let names = used("export default () => <div><my-widget /></div>", "a.jsx");
    assert_eq!(names, vec!["div", "my-widget"]);
  }

  #[test]
  fn skips_member_namespaced_and_fragment_tags() {
    let names = used(
      "const x = <><Foo.Bar /><svg:rect /><Baz /></>;",
      "a.tsx",
    );
    assert_eq!(names, vec!["Baz"]);
  }

  #[test]
  fn finds_markup_inside_attributes_and_templates() {
    let names = used(
      "const a = <Tooltip content={<Icon />} render={() => `${<Label />}`} />;",
      "a.tsx",
    );
    assert_eq!(names, vec!["Tooltip", "Icon", "Label"]);
  }

  #[test]
  fn plain_typescript_has_no_markup() {
    let names = used("const a = <Foo>bar;\nfunction f<T>(x: T) { return x < y }", "a.ts");
    assert!(names.is_empty());
  }

  #[test]
  fn closing_tag_names_are_not_separate_uses() {
    let names = used("const a = <Outer><Inner></Inner></Outer>", "a.tsx");
    assert_eq!(names, vec!["Outer", "Inner"]);
  }
}
