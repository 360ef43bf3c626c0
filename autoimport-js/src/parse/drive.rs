use super::Parser;
use crate::ast::node::Node;
use crate::error::SyntaxResult;
use crate::token::Token;
use crate::token::TT;
use derive_visitor::Drive;
use derive_visitor::DriveMut;

impl<'a> Parser<'a> {
  pub fn with_loc<S: Drive + DriveMut, F>(&mut self, f: F) -> SyntaxResult<Node<S>>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<S>,
  {
    let start = self.checkpoint();
    let stx = f(self)?;
    Ok(Node::new(self.since_checkpoint(&start), stx))
  }

  /// Runs `f` one nesting level deeper than `at`, failing the parse once the limit is exceeded.
  pub fn nested<R, F>(&mut self, at: &Token, f: F) -> SyntaxResult<R>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<R>,
  {
    self.enter_nesting(at)?;
    let res = f(self);
    self.leave_nesting();
    res
  }

  /// Runs `f` with `close` registered as the closing token of an open group.
  pub fn inside_group<R, F>(&mut self, close: TT, f: F) -> SyntaxResult<R>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<R>,
  {
    self.open_delims.push(close);
    let res = f(self);
    self.open_delims.pop();
    res
  }
}
