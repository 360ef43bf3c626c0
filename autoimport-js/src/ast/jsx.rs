use super::code::Code;
use super::node::Node;
use crate::loc::Loc;
use derive_more::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum JsxAttrVal {
  Expression(Node<JsxExprContainer>),
  Text(Node<JsxText>),
  Element(Node<JsxElem>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum JsxAttr {
  Named {
    name: Node<JsxName>,
    value: Option<JsxAttrVal>,
  },
  Spread {
    value: Node<JsxExprContainer>,
  },
}

/// A plain identifier tag name like `Button`, `div` or `my-element`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct JsxIdName {
  #[drive(skip)]
  pub name: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum JsxElemName {
  Id(Node<JsxIdName>),
  Member(Node<JsxMemberExpr>),
  Namespaced(Node<JsxName>),
}

impl JsxElemName {
  pub fn loc(&self) -> Loc {
    match self {
      JsxElemName::Id(n) => n.loc,
      JsxElemName::Member(n) => n.loc,
      JsxElemName::Namespaced(n) => n.loc,
    }
  }
}

impl PartialEq for JsxElemName {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (JsxElemName::Member(a), JsxElemName::Member(b)) => {
        a.stx.base == b.stx.base && a.stx.path == b.stx.path
      }
      (JsxElemName::Namespaced(a), JsxElemName::Namespaced(b)) => {
        a.stx.namespace == b.stx.namespace && a.stx.name == b.stx.name
      }
      (JsxElemName::Id(a), JsxElemName::Id(b)) => a.stx.name == b.stx.name,
      _ => false,
    }
  }
}

impl Eq for JsxElemName {}

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum JsxElemChild {
  Element(Node<JsxElem>),
  Expr(Node<JsxExprContainer>),
  Text(Node<JsxText>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct JsxElem {
  pub name: Option<JsxElemName>, // None if fragment
  pub attributes: Vec<JsxAttr>,  // Always empty if fragment
  pub children: Vec<JsxElemChild>,
  #[drive(skip)]
  pub self_closing: bool,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct JsxExprContainer {
  #[drive(skip)]
  pub spread: bool,
  pub value: Node<Code>,
}

/// `a.b.c`
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct JsxMemberExpr {
  #[drive(skip)]
  pub base: String,
  #[drive(skip)]
  pub path: Vec<String>,
}

/// An attribute name or a namespaced tag name (`ns:name`).
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct JsxName {
  #[drive(skip)]
  pub namespace: Option<String>,
  #[drive(skip)]
  pub name: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct JsxText {
  #[drive(skip)]
  pub value: String,
}
