//! Automatic import resolution for JSX/TSX modules.
//!
//! Given a module's source text, finds component identifiers used as markup tag names that no
//! import binds yet, maps them through a configured name -> module table, and plans the import
//! statements to insert at the top of the file.
//!
//! ```
//! use autoimport_js::config::Settings;
//! use autoimport_js::resolve_source;
//!
//! let settings = Settings::from_json_str(r#"{ "namedImports": { "Button": "react-bootstrap" } }"#).unwrap();
//! let source = "export const App = () => <Button />;\n";
//! let resolution = resolve_source(source, "App.tsx", &settings);
//! assert_eq!(
//!   resolution.apply(source),
//!   "import { Button } from \"react-bootstrap\"\nexport const App = () => <Button />;\n",
//! );
//! ```

use ast::node::Node;
use ast::stx::TopLevel;
use config::Settings;
use diagnostic::Diagnostic;
use error::SyntaxError;
use error::SyntaxResult;
use inventory::extract_imports;
use lex::Lexer;
use parse::Parser;
use parse::SyntaxTree;
use plan::apply_edits;
use plan::TextEdit;
use resolve::MissingBindingPlan;
use serde::Serialize;
use std::path::Path;
use usage::collect_used_components;

pub mod ast;
pub mod char;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod inventory;
pub mod lex;
pub mod loc;
pub mod parse;
pub mod plan;
pub mod resolve;
pub mod token;
pub mod usage;

/// Source language variant, which decides whether `<` can start markup.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub enum Dialect {
  Js,
  Jsx,
  Ts,
  #[default]
  Tsx,
}

impl Dialect {
  /// Infers the dialect from a file name's extension. Unknown extensions are treated as TSX, the
  /// most permissive dialect that still understands type declarations.
  pub fn from_file_name(file_name: &str) -> Dialect {
    let ext = Path::new(file_name)
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
      Some("js" | "mjs" | "cjs") => Dialect::Js,
      Some("jsx") => Dialect::Jsx,
      Some("ts" | "mts" | "cts") => Dialect::Ts,
      _ => Dialect::Tsx,
    }
  }

  /// Plain `.ts` files use `<T>x` for type assertions, so they never contain markup. JSX in `.js`
  /// files is common enough to allow.
  pub fn allows_jsx(self) -> bool {
    self != Dialect::Ts
  }

  pub fn is_typescript(self) -> bool {
    matches!(self, Dialect::Ts | Dialect::Tsx)
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ParseOptions {
  pub dialect: Dialect,
}

/// Parses with the dialect inferred from `file_name`.
pub fn parse(source: &str, file_name: &str) -> SyntaxResult<SyntaxTree> {
  parse_with_options(source, file_name, ParseOptions {
    dialect: Dialect::from_file_name(file_name),
  })
}

/// Parses a whole file. Syntax errors are recovered from and reported in `SyntaxTree::errors`; only
/// input nested too deeply to walk fails outright.
pub fn parse_with_options(
  source: &str,
  file_name: &str,
  options: ParseOptions,
) -> SyntaxResult<SyntaxTree> {
  let lexer = Lexer::new(source);
  let mut parser = Parser::new(lexer, options);
  let top_level: Node<TopLevel> = parser.parse_top_level()?;
  Ok(SyntaxTree {
    file_name: file_name.to_string(),
    dialect: options.dialect,
    top_level,
    errors: parser.take_errors(),
  })
}

/// Everything one pass over a document produced. Nothing here refers back to the document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
  pub plan: MissingBindingPlan,
  pub edits: Vec<TextEdit>,
  /// Component names used in markup that no import binds and no configured mapping covers.
  pub unresolved: Vec<String>,
  pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
  pub fn is_noop(&self) -> bool {
    self.edits.is_empty()
  }

  /// One message per inserted import, for a host to show to the user.
  pub fn status_messages(&self) -> Vec<String> {
    self
      .plan
      .iter()
      .map(|binding| format!("Auto-imported {} from \"{}\"", binding.name, binding.module))
      .collect()
  }

  pub fn apply(&self, source: &str) -> String {
    apply_edits(source, &self.edits)
  }
}

/// Runs one full pass: parse, collect imports and usages, resolve, and plan edits.
pub fn resolve_source(source: &str, file_name: &str, settings: &Settings) -> Resolution {
  let span = tracing::debug_span!("resolve_source", file = file_name);
  let _guard = span.enter();

  let tree = match parse(source, file_name) {
    Ok(tree) => tree,
    Err(err) => {
      tracing::debug!(code = err.typ.code(), "parse failed, no edits planned");
      return Resolution {
        diagnostics: vec![err.to_diagnostic()],
        ..Resolution::default()
      };
    }
  };

  let inventory = extract_imports(&tree);
  let used = collect_used_components(&tree);
  tracing::debug!(
    dialect = ?tree.dialect,
    named_bound = inventory.named_bound().len(),
    default_bound = inventory.default_bound().len(),
    used = used.len(),
    syntax_errors = tree.errors.len(),
    "scanned document"
  );

  let plan = resolve::resolve(&inventory, &used, &settings.bindings);
  let unresolved = resolve::unresolved(&inventory, &used, &settings.bindings);
  let edits = plan::plan(&plan, &settings.format);
  tracing::debug!(
    entries = plan.len(),
    edits = edits.len(),
    unresolved = unresolved.len(),
    "planned imports"
  );

  Resolution {
    plan,
    edits,
    unresolved,
    diagnostics: tree.errors.iter().map(SyntaxError::to_diagnostic).collect(),
  }
}
