use super::Parser;
use crate::ast::import_export::ImportBinding;
use crate::ast::import_export::ImportName;
use crate::ast::import_export::ImportNames;
use crate::ast::import_export::ImportStmt;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

/// Strips the quotes from a string literal. Module specifiers don't need escape handling.
fn unquote(raw: &str) -> String {
  raw
    .get(1..raw.len().saturating_sub(1))
    .unwrap_or_default()
    .to_string()
}

impl<'a> Parser<'a> {
  /// `import` not followed by `(` or `.`, which are dynamic imports and `import.meta`.
  pub fn is_import_decl(&mut self) -> bool {
    let (kw, next) = self.peek_2();
    kw.typ == TT::KeywordImport && !matches!(next.typ, TT::ParenthesisOpen | TT::Dot)
  }

  fn import_binding(&mut self) -> Option<Node<ImportBinding>> {
    let t = self.peek();
    if !t.typ.is_binding_name() {
      return None;
    };
    self.consume();
    Some(Node::new(t.loc, ImportBinding {
      name: self.string(t.loc),
    }))
  }

  fn module_specifier(&mut self) -> Option<String> {
    let t = self.peek();
    if t.typ != TT::LiteralString {
      self.record(t.error(SyntaxErrorType::ExpectedSyntax("module specifier")));
      return None;
    };
    self.consume();
    Some(unquote(self.str(t.loc)))
  }

  /// Parses one element of `{ ... }`, like `a`, `a as b`, `type a`, `default as a` or `"a-b" as a`.
  fn import_name(&mut self) -> Option<Node<ImportName>> {
    let start = self.checkpoint();
    let (a, b) = self.peek_2();
    // `type` is the imported name itself in `{ type }` and `{ type as t }`.
    let type_only = a.typ == TT::KeywordType
      && !matches!(b.typ, TT::Comma | TT::BraceClose | TT::KeywordAs);
    if type_only {
      self.consume();
    };
    let t = self.peek();
    let importable = match t.typ {
      TT::LiteralString => unquote(self.str(t.loc)),
      typ if typ == TT::Identifier || typ.is_keyword() => self.string(t.loc),
      _ => {
        self.restore_checkpoint(start);
        return None;
      }
    };
    self.consume();
    let alias = if self.consume_if(TT::KeywordAs).is_match() {
      self.import_binding().unwrap_or_else(|| {
        let at = self.peek();
        self.record(at.error(SyntaxErrorType::ExpectedSyntax("import alias")));
        Node::new(t.loc, ImportBinding {
          name: importable.clone(),
        })
      })
    } else {
      Node::new(t.loc, ImportBinding {
        name: importable.clone(),
      })
    };
    let loc = self.since_checkpoint(&start);
    Some(Node::new(loc, ImportName {
      type_only,
      importable,
      alias,
    }))
  }

  fn import_names_specific(&mut self) -> Vec<Node<ImportName>> {
    let open = self.consume();
    let mut names = Vec::new();
    loop {
      let t = self.peek();
      match t.typ {
        TT::BraceClose => {
          self.consume();
          break;
        }
        TT::EOF => {
          self.record(open.error(SyntaxErrorType::UnclosedDelimiter(TT::BraceOpen)));
          break;
        }
        _ => {}
      };
      let Some(name) = self.import_name() else {
        // Leave the token for whatever follows the broken statement.
        self.record(t.error(SyntaxErrorType::ExpectedSyntax("import name")));
        break;
      };
      names.push(name);
      if !self.consume_if(TT::Comma).is_match() {
        self.expect(TT::BraceClose);
        break;
      };
    }
    names
  }

  fn import_names(&mut self) -> Option<ImportNames> {
    let t = self.peek();
    match t.typ {
      TT::Asterisk => {
        self.consume();
        self.expect(TT::KeywordAs);
        let binding = self.import_binding();
        if binding.is_none() {
          let at = self.peek();
          self.record(at.error(SyntaxErrorType::ExpectedSyntax("namespace import name")));
        };
        binding.map(ImportNames::All)
      }
      TT::BraceOpen => Some(ImportNames::Specific(self.import_names_specific())),
      _ => None,
    }
  }

  // Import attributes (`with { type: "json" }`) and the optional semicolon.
  fn finish_import(&mut self) {
    let (a, b) = self.peek_2();
    if a.typ == TT::Identifier
      && !a.preceded_by_line_terminator
      && matches!(self.str(a.loc), "with" | "assert")
      && b.typ == TT::BraceOpen
    {
      self.consume();
      self.consume();
      while !matches!(self.consume().typ, TT::BraceClose | TT::EOF) {}
    };
    let _ = self.consume_if(TT::Semicolon);
  }

  /// Parses an import declaration, recovering from anything missing. The caller has checked
  /// `is_import_decl`.
  pub fn import_stmt(&mut self) -> SyntaxResult<Node<ImportStmt>> {
    self.with_loc(|p| {
      p.require(TT::KeywordImport)?;
      let (a, b) = p.peek_2();
      // `import type from "m"` imports a default export named `type`.
      let type_only = a.typ == TT::KeywordType
        && match b.typ {
          TT::BraceOpen | TT::Asterisk => true,
          TT::KeywordFrom => false,
          typ => typ.is_binding_name(),
        };
      if type_only {
        p.consume();
      };

      // Side-effect import.
      if p.peek().typ == TT::LiteralString {
        let module = p.module_specifier();
        p.finish_import();
        return Ok(ImportStmt {
          type_only,
          default: None,
          names: None,
          module,
        });
      };

      let default = p.import_binding();
      let names = if default.is_none() || p.consume_if(TT::Comma).is_match() {
        p.import_names()
      } else {
        None
      };
      if default.is_none() && names.is_none() {
        let at = p.peek();
        p.record(at.error(SyntaxErrorType::ExpectedSyntax("import clause")));
      };
      let module = if p.expect(TT::KeywordFrom) {
        p.module_specifier()
      } else {
        None
      };
      p.finish_import();
      Ok(ImportStmt {
        type_only,
        default,
        names,
        module,
      })
    })
  }
}
