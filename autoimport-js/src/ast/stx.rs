use super::code::Code;
use super::import_export::ImportStmt;
use super::node::Node;
use derive_more::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum Stmt {
  Import(Node<ImportStmt>),
  // Everything else, down to the granularity of bracketed groups and markup.
  Code(Node<Code>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TopLevel {
  pub body: Vec<Node<Stmt>>,
}
