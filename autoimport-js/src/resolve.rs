use crate::config::BindingConfiguration;
use crate::config::StatementFormat;
use crate::inventory::ImportInventory;
use crate::lex::is_binding_identifier;
use crate::usage::UsedComponents;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
  Named,
  Default,
}

/// One import statement to add.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissingBinding {
  pub name: String,
  pub module: String,
  pub kind: ImportKind,
}

impl MissingBinding {
  /// The statement without any line terminator; the planner joins statements into lines.
  pub fn statement(&self, format: &StatementFormat) -> String {
    let q = format.quote_style.quote();
    let mut module = String::with_capacity(self.module.len());
    for c in self.module.chars() {
      if c == q || c == '\\' {
        module.push('\\');
      };
      module.push(c);
    }
    let mut out = match self.kind {
      ImportKind::Named => format!("import {{ {} }} from {q}{module}{q}", self.name),
      ImportKind::Default => format!("import {} from {q}{module}{q}", self.name),
    };
    if format.semicolons {
      out.push(';');
    };
    out
  }
}

/// Missing bindings in insertion order: named imports first, then default imports, each in order of
/// first use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MissingBindingPlan {
  entries: Vec<MissingBinding>,
}

impl MissingBindingPlan {
  pub fn entries(&self) -> &[MissingBinding] {
    &self.entries
  }

  pub fn iter(&self) -> impl Iterator<Item = &MissingBinding> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Works out which used components need an import.
///
/// The named and default passes are independent: a name is checked against `named_bound` for the
/// named pass and against `default_bound` for the default pass, so a name mapped in both tables and
/// bound by neither form gets two statements. Names that can't be an import binding, like
/// `my-widget`, are never planned.
pub fn resolve(
  inventory: &ImportInventory,
  used: &UsedComponents,
  config: &BindingConfiguration,
) -> MissingBindingPlan {
  let mut entries = Vec::new();
  let importable = || used.iter().filter(|name| is_binding_identifier(name));
  for name in importable() {
    if inventory.is_named_bound(name) {
      continue;
    };
    if let Some(module) = config.named_module(name) {
      entries.push(MissingBinding {
        name: name.to_string(),
        module: module.to_string(),
        kind: ImportKind::Named,
      });
    };
  }
  for name in importable() {
    if inventory.is_default_bound(name) {
      continue;
    };
    if let Some(module) = config.default_module(name) {
      entries.push(MissingBinding {
        name: name.to_string(),
        module: module.to_string(),
        kind: ImportKind::Default,
      });
    };
  }
  MissingBindingPlan { entries }
}

/// Used component names that no import will bind: unmapped and unbound names, plus mapped names
/// that can't be written as an import binding. Unmapped lowercase names are intrinsic elements like
/// `div` by JSX convention and are never reported.
pub fn unresolved(
  inventory: &ImportInventory,
  used: &UsedComponents,
  config: &BindingConfiguration,
) -> Vec<String> {
  used
    .iter()
    .filter(|name| !inventory.is_bound(name))
    .filter(|name| {
      if config.is_mapped(name) {
        !is_binding_identifier(name)
      } else {
        !name.starts_with(|c: char| c.is_ascii_lowercase())
      }
    })
    .map(str::to_string)
    .collect()
}
