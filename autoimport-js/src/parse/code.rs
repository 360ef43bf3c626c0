use super::Parser;
use crate::ast::code::Code;
use crate::ast::code::Group;
use crate::ast::code::TemplateLit;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::token::Token;
use crate::token::TT;

/// Where a run of code stops.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CodeEnd {
  /// A top-level statement: after `;`, or before an import declaration that starts a new statement.
  Statement,
  /// Before this closing token, which the caller consumes.
  Close(TT),
}

fn closing_of(open: TT) -> TT {
  match open {
    TT::BraceOpen => TT::BraceClose,
    TT::BracketOpen => TT::BracketClose,
    _ => TT::ParenthesisClose,
  }
}

// Tokens that carry on a type across a line break, e.g. `=\n | A\n | B`.
fn continues_type(typ: TT) -> bool {
  matches!(
    typ,
    TT::Operator
      | TT::EqualsChevronRight
      | TT::Dot
      | TT::Question
      | TT::Colon
      | TT::KeywordExtends
      | TT::BraceOpen
  )
}

impl<'a> Parser<'a> {
  pub fn code(&mut self, end: CodeEnd) -> SyntaxResult<Node<Code>> {
    self.with_loc(|p| {
      let mut items = Vec::new();
      // Whether an expression may start at the next token.
      let mut expr_start = true;
      // Whether the next token starts a statement, as far as a token scan can tell.
      let mut stmt_start = true;
      let mut prev: Option<Token> = None;
      loop {
        let mode = if expr_start || stmt_start {
          LexMode::SlashIsRegex
        } else {
          LexMode::Standard
        };
        let t = p.peek_with_mode(mode);
        let at_stmt_start = stmt_start || t.preceded_by_line_terminator;
        match t.typ {
          TT::EOF => break,
          TT::Semicolon if end == CodeEnd::Statement => {
            p.consume_with_mode(mode);
            break;
          }
          TT::KeywordImport
            if end == CodeEnd::Statement
              && prev.is_some()
              && at_stmt_start
              && p.is_import_decl() =>
          {
            break;
          }
          TT::BraceClose | TT::BracketClose | TT::ParenthesisClose => {
            if end == CodeEnd::Close(t.typ) || p.closes_open_group(t.typ) {
              break;
            };
            p.consume_with_mode(mode);
            p.record(t.error(SyntaxErrorType::UnexpectedToken));
            expr_start = false;
            stmt_start = t.typ == TT::BraceClose;
          }
          TT::BraceOpen | TT::BracketOpen | TT::ParenthesisOpen => {
            let group = p.group()?;
            // A block may be followed by a statement.
            stmt_start = group.stx.open == TT::BraceOpen;
            expr_start = false;
            items.push(group.into());
          }
          TT::LiteralTemplatePartString => {
            items.push(p.template()?.into());
            expr_start = false;
            stmt_start = false;
          }
          TT::ChevronLeft
            if (expr_start || stmt_start) && p.at_jsx_start(prev.as_ref().map(|t| t.typ)) =>
          {
            items.push(p.jsx_elem()?.into());
            expr_start = false;
            stmt_start = false;
          }
          TT::KeywordType | TT::KeywordInterface
            if (at_stmt_start || prev.as_ref().is_some_and(|prev| p.is_decl_modifier(prev)))
              && p.at_type_decl() =>
          {
            p.skip_type_decl();
            expr_start = true;
            stmt_start = true;
          }
          TT::Invalid => {
            p.consume_with_mode(mode);
            p.record(t.error(SyntaxErrorType::InvalidToken));
            expr_start = false;
            stmt_start = false;
          }
          typ => {
            p.consume_with_mode(mode);
            expr_start = typ.precedes_expression();
            stmt_start = typ == TT::Semicolon;
          }
        };
        prev = Some(t);
      }
      Ok(Code { items })
    })
  }

  /// Parses a `(...)`, `[...]` or `{...}` group. An unclosed group ends at the end of input or at
  /// the closing token of an enclosing group.
  pub fn group(&mut self) -> SyntaxResult<Node<Group>> {
    self.with_loc(|p| {
      let open = p.consume();
      let close = closing_of(open.typ);
      p.nested(&open, |p| {
        let body = p.inside_group(close, |p| p.code(CodeEnd::Close(close)))?;
        let closed = p.consume_if(close).is_match();
        if !closed {
          p.record(open.error(SyntaxErrorType::UnclosedDelimiter(open.typ)));
        };
        Ok(Group {
          open: open.typ,
          body,
          closed,
        })
      })
    })
  }

  /// Parses a template literal with at least one substitution. Each substitution is parsed as code
  /// so markup inside `${}` is found.
  pub fn template(&mut self) -> SyntaxResult<Node<TemplateLit>> {
    self.with_loc(|p| {
      let head = p.consume();
      p.nested(&head, |p| {
        let mut substitutions = Vec::new();
        loop {
          let sub = p.inside_group(TT::BraceClose, |p| p.code(CodeEnd::Close(TT::BraceClose)))?;
          substitutions.push(sub);
          if !p.expect(TT::BraceClose) {
            break;
          };
          let part = p.consume_with_mode(LexMode::TemplateStrContinue);
          match part.typ {
            TT::LiteralTemplatePartString => {}
            TT::LiteralTemplatePartStringEnd => break,
            _ => {
              p.record(part.error(SyntaxErrorType::InvalidToken));
              break;
            }
          };
        }
        Ok(TemplateLit { substitutions })
      })
    })
  }

  fn is_decl_modifier(&self, prev: &Token) -> bool {
    match prev.typ {
      TT::KeywordExport | TT::KeywordDefault => true,
      TT::Identifier => self.str(prev.loc) == "declare",
      _ => false,
    }
  }

  /// Whether the next tokens are `type Name =`, `type Name<`, or `interface Name`.
  pub fn at_type_decl(&mut self) -> bool {
    let (kw, name, after) = self.peek_3();
    if !name.typ.is_binding_name() || name.preceded_by_line_terminator {
      return false;
    };
    match kw.typ {
      TT::KeywordInterface => true,
      TT::KeywordType => matches!(after.typ, TT::Equals | TT::ChevronLeft),
      _ => false,
    }
  }

  /// Skips a type alias or interface declaration without interpreting it, so that type syntax like
  /// `<T>() => T` is never mistaken for markup.
  pub fn skip_type_decl(&mut self) {
    let kw = self.consume();
    let is_interface = kw.typ == TT::KeywordInterface;
    // Counts brackets and angle brackets.
    let mut depth = 0usize;
    // Whether the previous token expects more type syntax after it.
    let mut continues = true;
    loop {
      let t = self.peek();
      if t.typ == TT::EOF {
        break;
      };
      if depth == 0 {
        if t.typ == TT::Semicolon {
          self.consume();
          break;
        };
        if matches!(
          t.typ,
          TT::BraceClose | TT::BracketClose | TT::ParenthesisClose
        ) {
          break;
        };
        if t.preceded_by_line_terminator && !continues && !continues_type(t.typ) {
          break;
        };
      };
      self.consume();
      let mut closes_angle = false;
      match t.typ {
        TT::BraceOpen | TT::BracketOpen | TT::ParenthesisOpen | TT::ChevronLeft => depth += 1,
        TT::ChevronRight => {
          depth = depth.saturating_sub(1);
          closes_angle = true;
        }
        TT::BraceClose | TT::BracketClose | TT::ParenthesisClose => {
          depth = depth.saturating_sub(1)
        }
        // `Map<K, Set<V>>` lexes its end as a single shift operator.
        TT::Operator if self.str(t.loc).starts_with(">>") => {
          let n = self.str(t.loc).bytes().filter(|&b| b == b'>').count();
          depth = depth.saturating_sub(n);
          closes_angle = true;
        }
        TT::LiteralTemplatePartString => self.skip_template_substitutions(),
        _ => {}
      };
      if is_interface && depth == 0 && t.typ == TT::BraceClose {
        break;
      };
      continues = !closes_angle && t.typ.precedes_expression();
    }
  }

  // Called after a template head; skips up to and including the template's end.
  fn skip_template_substitutions(&mut self) {
    loop {
      let mut depth = 0usize;
      loop {
        let t = self.peek();
        match t.typ {
          TT::EOF => return,
          TT::BraceClose if depth == 0 => break,
          TT::BraceOpen => depth += 1,
          TT::BraceClose => depth -= 1,
          _ => {}
        };
        self.consume();
      }
      self.consume();
      let part = self.consume_with_mode(LexMode::TemplateStrContinue);
      if part.typ != TT::LiteralTemplatePartString {
        return;
      };
    }
  }
}
