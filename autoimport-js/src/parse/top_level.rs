use super::code::CodeEnd;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stx::Stmt;
use crate::ast::stx::TopLevel;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn parse_top_level(&mut self) -> SyntaxResult<Node<TopLevel>> {
    let mut body = Vec::new();
    loop {
      let t = self.peek_with_mode(LexMode::SlashIsRegex);
      if t.typ == TT::EOF {
        break;
      };
      let stmt: Stmt = if t.typ == TT::KeywordImport && self.is_import_decl() {
        self.import_stmt()?.into()
      } else {
        self.code(CodeEnd::Statement)?.into()
      };
      let loc = match &stmt {
        Stmt::Import(n) => n.loc,
        Stmt::Code(n) => n.loc,
      };
      body.push(Node::new(loc, stmt));
    }
    Ok(Node::new(self.source_range(), TopLevel { body }))
  }
}
