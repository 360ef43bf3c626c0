use super::node::Node;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// A local name introduced by an import clause.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportBinding {
  #[drive(skip)]
  pub name: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportName {
  #[drive(skip)]
  pub type_only: bool, // TypeScript: import { type Foo }
  // The exported name; may have been written as a string literal (`"a-b" as c`).
  #[drive(skip)]
  pub importable: String,
  // This is always set, even when no explicit alias is provided.
  pub alias: Node<ImportBinding>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ImportNames {
  // `import * as name`
  All(Node<ImportBinding>),
  // `import {a as b, c, default as e}`
  Specific(Vec<Node<ImportName>>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportStmt {
  #[drive(skip)]
  pub type_only: bool,
  pub default: Option<Node<ImportBinding>>,
  pub names: Option<ImportNames>,
  // None if the statement was cut short before its module specifier.
  #[drive(skip)]
  pub module: Option<String>,
}

impl ImportStmt {
  /// Local names bound by the specific (braced) elements, skipping type-only elements.
  pub fn specific_value_names(&self) -> impl Iterator<Item = &str> {
    let names = match &self.names {
      Some(ImportNames::Specific(names)) if !self.type_only => names.as_slice(),
      _ => &[][..],
    };
    names
      .iter()
      .filter(|n| !n.stx.type_only)
      .map(|n| n.stx.alias.stx.name.as_str())
  }

  pub fn default_value_name(&self) -> Option<&str> {
    if self.type_only {
      return None;
    };
    self.default.as_ref().map(|d| d.stx.name.as_str())
  }
}
