use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use crate::Dialect;
use crate::ParseOptions;

pub mod code;
pub mod drive;
pub mod import_export;
pub mod jsx;
#[cfg(test)]
mod tests;
pub mod top_level;

/// Brackets and markup deeper than this abort the parse instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// The result of parsing one file. Errors the parser recovered from are kept alongside the tree.
#[derive(Debug)]
pub struct SyntaxTree {
  pub file_name: String,
  pub dialect: Dialect,
  pub top_level: Node<TopLevel>,
  pub errors: Vec<SyntaxError>,
}

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    if self.matched {
      Some(self.loc)
    } else {
      None
    }
  }

  pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(err, Some(self.typ))
  }
}

pub struct ParserCheckpoint {
  next_tok_i: usize,
}

/// To get the lexer's `next` after this token was lexed, use `token.loc.1`.
struct BufferedToken {
  token: Token,
  lex_mode: LexMode,
}

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  buf: Vec<BufferedToken>,
  next_tok_i: usize,
  options: ParseOptions,
  errors: Vec<SyntaxError>,
  depth: usize,
  // Closing tokens of the groups currently open, innermost last.
  open_delims: Vec<TT>,
}

// Like the lexer, parsing methods are spread over the submodules as `impl Parser` blocks.
impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>, options: ParseOptions) -> Parser<'a> {
    Parser {
      lexer,
      buf: Vec::new(),
      next_tok_i: 0,
      options,
      errors: Vec::new(),
      depth: 0,
      open_delims: Vec::new(),
    }
  }

  pub fn dialect(&self) -> Dialect {
    self.options.dialect
  }

  pub fn source_range(&self) -> Loc {
    self.lexer.source_range()
  }

  pub fn str(&self, loc: Loc) -> &str {
    &self.lexer[loc]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  /// Records a recoverable error and keeps going.
  pub fn record(&mut self, err: SyntaxError) {
    tracing::trace!(code = err.typ.code(), start = err.loc.0, end = err.loc.1, "recovered from syntax error");
    self.errors.push(err);
  }

  pub fn take_errors(&mut self) -> Vec<SyntaxError> {
    std::mem::take(&mut self.errors)
  }

  pub fn enter_nesting(&mut self, at: &Token) -> SyntaxResult<()> {
    self.depth += 1;
    if self.depth > MAX_NESTING_DEPTH {
      return Err(at.error(SyntaxErrorType::NestingTooDeep));
    };
    Ok(())
  }

  pub fn leave_nesting(&mut self) {
    self.depth -= 1;
  }

  /// Whether `typ` closes a group that is currently open.
  pub fn closes_open_group(&self, typ: TT) -> bool {
    self.open_delims.contains(&typ)
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  /// The range covered by the tokens consumed since the checkpoint.
  pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> Loc {
    if self.next_tok_i <= checkpoint.next_tok_i {
      let at = self.prev_end();
      return Loc(at, at);
    };
    let start = self.buf[checkpoint.next_tok_i].token.loc.0;
    let end = self.buf[self.next_tok_i - 1].token.loc.1;
    Loc(start, end)
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.next_tok_i = checkpoint.next_tok_i;
  }

  fn prev_end(&self) -> usize {
    match self.next_tok_i {
      0 => 0,
      i => self.buf[i - 1].token.loc.1,
    }
  }

  fn reset_to(&mut self, n: usize) {
    self.next_tok_i = n;
    self.buf.truncate(n);
    match self.buf.last() {
      Some(t) => self.lexer.set_next(t.token.loc.1),
      None => self.lexer.set_next(0),
    };
  }

  fn forward<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> (bool, Token) {
    if self
      .buf
      .get(self.next_tok_i)
      .is_some_and(|t| t.lex_mode != mode)
    {
      self.reset_to(self.next_tok_i);
    }
    if self.buf.len() == self.next_tok_i {
      let token = lex_next(&mut self.lexer, mode);
      self.buf.push(BufferedToken {
        token,
        lex_mode: mode,
      });
    }
    let t = self.buf[self.next_tok_i].token.clone();
    let k = keep(&t);
    if k {
      self.next_tok_i += 1;
    };
    (k, t)
  }

  pub fn consume_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| true).1
  }

  pub fn consume(&mut self) -> Token {
    self.consume_with_mode(LexMode::Standard)
  }

  pub fn peek_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| false).1
  }

  pub fn peek(&mut self) -> Token {
    self.peek_with_mode(LexMode::Standard)
  }

  pub fn peek_2(&mut self) -> (Token, Token) {
    let cp = self.checkpoint();
    let a = self.forward(LexMode::Standard, |_| true);
    let b = self.forward(LexMode::Standard, |_| true);
    self.restore_checkpoint(cp);
    (a.1, b.1)
  }

  pub fn peek_3(&mut self) -> (Token, Token, Token) {
    let cp = self.checkpoint();
    let a = self.forward(LexMode::Standard, |_| true);
    let b = self.forward(LexMode::Standard, |_| true);
    let c = self.forward(LexMode::Standard, |_| true);
    self.restore_checkpoint(cp);
    (a.1, b.1, c.1)
  }

  pub fn maybe_consume_with_mode(&mut self, typ: TT, mode: LexMode) -> MaybeToken {
    let (matched, t) = self.forward(mode, |t| t.typ == typ);
    MaybeToken {
      typ: t.typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    self.maybe_consume_with_mode(typ, LexMode::Standard)
  }

  /// Like `consume_if`, but a missing token is recorded as an error instead of failing the parse.
  pub fn expect_with_mode(&mut self, typ: TT, mode: LexMode) -> bool {
    let t = self.maybe_consume_with_mode(typ, mode);
    if !t.is_match() {
      let err = t.error(SyntaxErrorType::RequiredTokenNotFound(typ));
      self.record(err);
    };
    t.is_match()
  }

  pub fn expect(&mut self, typ: TT) -> bool {
    self.expect_with_mode(typ, LexMode::Standard)
  }

  pub fn require_with_mode(&mut self, typ: TT, mode: LexMode) -> SyntaxResult<Token> {
    let t = self.consume_with_mode(mode);
    if t.typ != typ {
      Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    self.require_with_mode(typ, LexMode::Standard)
  }
}
