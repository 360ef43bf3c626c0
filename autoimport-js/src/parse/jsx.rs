use super::code::CodeEnd;
use super::Parser;
use crate::ast::jsx::JsxAttr;
use crate::ast::jsx::JsxAttrVal;
use crate::ast::jsx::JsxElem;
use crate::ast::jsx::JsxElemChild;
use crate::ast::jsx::JsxElemName;
use crate::ast::jsx::JsxExprContainer;
use crate::ast::jsx::JsxIdName;
use crate::ast::jsx::JsxMemberExpr;
use crate::ast::jsx::JsxName;
use crate::ast::jsx::JsxText;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Whether the `<` at the current position opens an element. The caller has already checked that
  /// an expression may start here, and passes the token before the `<`.
  pub fn at_jsx_start(&mut self, prev: Option<TT>) -> bool {
    if !self.dialect().allows_jsx() {
      return false;
    };
    // `</` can't open an element.
    if self.peek_with_mode(LexMode::JsxTag).typ != TT::ChevronLeft {
      return false;
    };
    if self.dialect().is_typescript() {
      let (_, name, after) = self.peek_3();
      if name.typ.is_binding_name() {
        // Generic arrow function heads: `<T,>(x: T) => x` and `<T extends U>(x: T) => x`.
        if matches!(after.typ, TT::Comma | TT::KeywordExtends) {
          return false;
        };
        // Generic function types in annotations: `let f: <T>(x: T) => T`.
        if prev == Some(TT::Colon) && after.typ == TT::ChevronRight && self.at_generic_fn_type() {
          return false;
        };
      };
    };
    true
  }

  /// Whether the next tokens are `<T>(...) =>`. Never consumes anything.
  fn at_generic_fn_type(&mut self) -> bool {
    let cp = self.checkpoint();
    for _ in 0..3 {
      self.consume();
    }
    let mut arrow = false;
    if self.consume_if(TT::ParenthesisOpen).is_match() {
      let mut depth = 1usize;
      while depth > 0 {
        match self.consume().typ {
          TT::EOF => break,
          TT::ParenthesisOpen => depth += 1,
          TT::ParenthesisClose => depth -= 1,
          _ => {}
        };
      }
      arrow = depth == 0 && self.peek().typ == TT::EqualsChevronRight;
    };
    self.restore_checkpoint(cp);
    arrow
  }

  fn jsx_name_part(&mut self) -> Option<String> {
    let t = self
      .maybe_consume_with_mode(TT::Identifier, LexMode::JsxTag)
      .match_loc()?;
    Some(self.string(t))
  }

  /// Parses an attribute name like `onClick`, `data-id` or `xlink:href`.
  pub fn jsx_name(&mut self) -> SyntaxResult<Node<JsxName>> {
    self.with_loc(|p| {
      let start = p.jsx_name_part().unwrap_or_default();
      Ok(
        if p
          .maybe_consume_with_mode(TT::Colon, LexMode::JsxTag)
          .is_match()
        {
          let name = p.jsx_name_part().unwrap_or_default();
          JsxName {
            namespace: Some(start),
            name,
          }
        } else {
          JsxName {
            namespace: None,
            name: start,
          }
        },
      )
    })
  }

  /// Parses an element name like `div`, `ab-cd`, `MyComponent`, `a.b.c`, or `ns:div`. Returns None
  /// for fragments, and for anything that isn't a name at all.
  pub fn jsx_elem_name(&mut self) -> Option<JsxElemName> {
    let first = self.peek_with_mode(LexMode::JsxTag);
    if first.typ != TT::Identifier {
      return None;
    };
    self.consume_with_mode(LexMode::JsxTag);
    let base = self.string(first.loc);
    let mut loc = first.loc;

    if self
      .maybe_consume_with_mode(TT::Colon, LexMode::JsxTag)
      .is_match()
    {
      let name = self.peek_with_mode(LexMode::JsxTag);
      let name = if name.typ == TT::Identifier {
        self.consume_with_mode(LexMode::JsxTag);
        loc += name.loc;
        self.string(name.loc)
      } else {
        self.record(name.error(SyntaxErrorType::ExpectedSyntax("JSX namespaced name")));
        String::new()
      };
      return Some(JsxElemName::Namespaced(Node::new(loc, JsxName {
        namespace: Some(base),
        name,
      })));
    };

    let mut path = Vec::<String>::new();
    while self
      .maybe_consume_with_mode(TT::Dot, LexMode::JsxTag)
      .is_match()
    {
      let part = self.peek_with_mode(LexMode::JsxTag);
      if part.typ != TT::Identifier {
        self.record(part.error(SyntaxErrorType::ExpectedSyntax("JSX member name")));
        break;
      };
      self.consume_with_mode(LexMode::JsxTag);
      loc += part.loc;
      path.push(self.string(part.loc));
    }
    if !path.is_empty() {
      return Some(JsxElemName::Member(Node::new(loc, JsxMemberExpr {
        base,
        path,
      })));
    };

    Some(JsxElemName::Id(Node::new(loc, JsxIdName { name: base })))
  }

  /// Parses `{...}` in attribute or child position. The opening brace is the next token.
  pub fn jsx_expr_container(&mut self) -> SyntaxResult<Node<JsxExprContainer>> {
    self.with_loc(|p| {
      let open = p.consume_with_mode(LexMode::JsxTag);
      p.nested(&open, |p| {
        let spread = p.consume_if(TT::DotDotDot).is_match();
        let value =
          p.inside_group(TT::BraceClose, |p| p.code(CodeEnd::Close(TT::BraceClose)))?;
        if !p.consume_if(TT::BraceClose).is_match() {
          p.record(open.error(SyntaxErrorType::UnclosedDelimiter(TT::BraceOpen)));
        };
        Ok(JsxExprContainer { spread, value })
      })
    })
  }

  /// Parses an attribute value (comes after the equals sign).
  pub fn jsx_attr_val(&mut self) -> SyntaxResult<Option<JsxAttrVal>> {
    let next = self.peek_with_mode(LexMode::JsxTag);
    Ok(Some(match next.typ {
      TT::LiteralString => {
        self.consume_with_mode(LexMode::JsxTag);
        let raw = self.str(next.loc);
        let value = raw
          .get(1..raw.len().saturating_sub(1))
          .unwrap_or_default()
          .to_string();
        JsxAttrVal::Text(Node::new(next.loc, JsxText { value }))
      }
      TT::BraceOpen => JsxAttrVal::Expression(self.jsx_expr_container()?),
      TT::ChevronLeft => JsxAttrVal::Element(self.jsx_elem()?),
      _ => {
        self.record(next.error(SyntaxErrorType::ExpectedSyntax("JSX attribute value")));
        return Ok(None);
      }
    }))
  }

  pub fn jsx_elem_attrs(&mut self) -> SyntaxResult<Vec<JsxAttr>> {
    let mut attrs = Vec::<JsxAttr>::new();
    loop {
      let next = self.peek_with_mode(LexMode::JsxTag);
      match next.typ {
        TT::ChevronRight | TT::Slash | TT::ChevronLeftSlash | TT::EOF => break,
        TT::ChevronLeft => self.skip_jsx_type_arguments(),
        TT::BraceOpen => {
          let value = self.jsx_expr_container()?;
          attrs.push(JsxAttr::Spread { value });
        }
        TT::Identifier => {
          let name = self.jsx_name()?;
          let value = if self
            .maybe_consume_with_mode(TT::Equals, LexMode::JsxTag)
            .is_match()
          {
            self.jsx_attr_val()?
          } else {
            None
          };
          attrs.push(JsxAttr::Named { name, value });
        }
        _ => {
          // Consume unexpected tokens to avoid infinite loops.
          self.consume_with_mode(LexMode::JsxTag);
          self.record(next.error(SyntaxErrorType::UnexpectedToken));
        }
      };
    }
    Ok(attrs)
  }

  /// Skips over a sequence like `<T, U>` that appears after a tag name in TSX.
  fn skip_jsx_type_arguments(&mut self) {
    self.consume_with_mode(LexMode::JsxTag);
    let mut depth = 1usize;
    while depth > 0 {
      let tok = self.consume_with_mode(LexMode::JsxTag);
      match tok.typ {
        TT::ChevronLeft => depth += 1,
        TT::ChevronRight => depth -= 1,
        TT::EOF => break,
        _ => {}
      };
    }
  }

  /// Parses text, elements and expressions up to the closing tag (or the end of input).
  pub fn jsx_elem_children(&mut self) -> SyntaxResult<Vec<JsxElemChild>> {
    let mut children = Vec::<JsxElemChild>::new();
    loop {
      let text = self.consume_with_mode(LexMode::JsxTextContent);
      if !text.loc.is_empty() {
        children.push(JsxElemChild::Text(Node::new(text.loc, JsxText {
          value: self.string(text.loc),
        })));
      };
      let next = self.peek_with_mode(LexMode::JsxTag);
      match next.typ {
        TT::ChevronLeftSlash | TT::EOF => break,
        TT::ChevronLeft => children.push(self.jsx_elem()?.into()),
        TT::BraceOpen => children.push(self.jsx_expr_container()?.into()),
        _ => {
          self.consume_with_mode(LexMode::JsxTag);
          self.record(next.error(SyntaxErrorType::UnexpectedToken));
        }
      };
    }
    Ok(children)
  }

  // https://facebook.github.io/jsx/
  pub fn jsx_elem(&mut self) -> SyntaxResult<Node<JsxElem>> {
    self.with_loc(|p| {
      let open = p.require_with_mode(TT::ChevronLeft, LexMode::JsxTag)?;
      p.nested(&open, |p| {
        let name = p.jsx_elem_name();
        let attributes = if name.is_some() {
          p.jsx_elem_attrs()?
        } else {
          Vec::new()
        };
        let self_closing = p
          .maybe_consume_with_mode(TT::Slash, LexMode::JsxTag)
          .is_match();
        if !p.expect_with_mode(TT::ChevronRight, LexMode::JsxTag) || self_closing {
          // An unfinished opening tag gets no children, so the rest of the file isn't swallowed.
          return Ok(JsxElem {
            name,
            attributes,
            children: Vec::new(),
            self_closing,
          });
        };

        let children = p.jsx_elem_children()?;
        let closing = p.maybe_consume_with_mode(TT::ChevronLeftSlash, LexMode::JsxTag);
        if let Some(closing) = closing.match_loc() {
          let end_name = p.jsx_elem_name();
          if end_name != name {
            let mut at = closing;
            if let Some(end_name) = &end_name {
              at += end_name.loc();
            };
            p.record(at.error(SyntaxErrorType::JsxClosingTagMismatch, None));
          };
          p.expect_with_mode(TT::ChevronRight, LexMode::JsxTag);
        } else {
          p.record(open.error(SyntaxErrorType::UnterminatedJsxElement));
        };
        Ok(JsxElem {
          name,
          attributes,
          children,
          self_closing: false,
        })
      })
    })
  }
}
