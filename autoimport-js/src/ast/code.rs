use super::jsx::JsxElem;
use super::node::Node;
use crate::token::TT;
use derive_more::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// A run of code reduced to the structure that can contain markup. Plain tokens are dropped.
#[derive(Debug, Default, Drive, DriveMut, Serialize)]
pub struct Code {
  pub items: Vec<CodeItem>,
}

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum CodeItem {
  Element(Node<JsxElem>),
  Group(Node<Group>),
  Template(Node<TemplateLit>),
}

/// A `(...)`, `[...]` or `{...}` group.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Group {
  #[drive(skip)]
  pub open: TT,
  pub body: Node<Code>,
  // False if input ended (or an outer group was closed) first.
  #[drive(skip)]
  pub closed: bool,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TemplateLit {
  pub substitutions: Vec<Node<Code>>,
}
