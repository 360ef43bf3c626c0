use crate::ast::stx::Stmt;
use crate::parse::SyntaxTree;
use ahash::HashSet;

/// Names already bound by the top-level import declarations of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportInventory {
  named_bound: HashSet<String>,
  default_bound: HashSet<String>,
}

impl ImportInventory {
  /// Local names bound by `{ ... }` elements, i.e. the alias in `{ a as b }`.
  pub fn named_bound(&self) -> &HashSet<String> {
    &self.named_bound
  }

  pub fn default_bound(&self) -> &HashSet<String> {
    &self.default_bound
  }

  pub fn is_named_bound(&self, name: &str) -> bool {
    self.named_bound.contains(name)
  }

  pub fn is_default_bound(&self, name: &str) -> bool {
    self.default_bound.contains(name)
  }

  pub fn is_bound(&self, name: &str) -> bool {
    self.is_named_bound(name) || self.is_default_bound(name)
  }
}

/// Scans the direct top-level statements for import declarations. Namespace imports, type-only
/// imports and type-only elements bind nothing here; neither do re-exports.
pub fn extract_imports(tree: &SyntaxTree) -> ImportInventory {
  let mut inventory = ImportInventory::default();
  for stmt in tree.top_level.stx.body.iter() {
    let Stmt::Import(import) = stmt.stx.as_ref() else {
      continue;
    };
    let import = import.stx.as_ref();
    inventory
      .named_bound
      .extend(import.specific_value_names().map(str::to_string));
    if let Some(name) = import.default_value_name() {
      inventory.default_bound.insert(name.to_string());
    };
  }
  inventory
}
