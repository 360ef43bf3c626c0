use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // Special token used to represent the end of the source code. Easier than using and handling Option everywhere.
  EOF,
  // Special token used to represent invalid source code (e.g. an unterminated string). The lexer never fails; the parser decides how to recover.
  Invalid,
  // These are only used by lexer.
  CommentMultilineEnd,
  LineTerminator,
  Whitespace,
  CommentMultiline,
  CommentSingle,

  At,
  Asterisk,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  ChevronLeft,
  // Only produced in `LexMode::JsxTag`.
  ChevronLeftSlash,
  ChevronRight,
  Colon,
  Comma,
  Dot,
  DotDotDot,
  Equals,
  EqualsChevronRight,
  Exclamation,
  HyphenHyphen,
  Identifier,
  JsxTextContent,
  KeywordAs,
  KeywordAwait,
  KeywordCase,
  KeywordDefault,
  KeywordDelete,
  KeywordDo,
  KeywordElse,
  KeywordExport,
  KeywordExtends,
  KeywordFrom,
  KeywordImport,
  KeywordIn,
  KeywordInstanceof,
  KeywordInterface,
  KeywordNew,
  KeywordOf,
  KeywordReturn,
  KeywordSuper,
  KeywordThis,
  KeywordThrow,
  KeywordType,
  KeywordTypeof,
  KeywordVoid,
  KeywordYield,
  LiteralFalse,
  LiteralNull,
  LiteralNumber,
  LiteralRegex,
  LiteralString,
  LiteralTemplatePartString,
  LiteralTemplatePartStringEnd,
  LiteralTrue,
  // Any other punctuator. The resolver never needs to tell them apart beyond "an operator precedes this".
  Operator,
  ParenthesisClose,
  ParenthesisOpen,
  PlusPlus,
  PrivateMember,
  Question,
  QuestionDot,
  Semicolon,
  Slash,
  SlashEquals,
}

impl TT {
  pub fn is_keyword(self) -> bool {
    matches!(
      self,
      TT::KeywordAs
        | TT::KeywordAwait
        | TT::KeywordCase
        | TT::KeywordDefault
        | TT::KeywordDelete
        | TT::KeywordDo
        | TT::KeywordElse
        | TT::KeywordExport
        | TT::KeywordExtends
        | TT::KeywordFrom
        | TT::KeywordImport
        | TT::KeywordIn
        | TT::KeywordInstanceof
        | TT::KeywordInterface
        | TT::KeywordNew
        | TT::KeywordOf
        | TT::KeywordReturn
        | TT::KeywordSuper
        | TT::KeywordThis
        | TT::KeywordThrow
        | TT::KeywordType
        | TT::KeywordTypeof
        | TT::KeywordVoid
        | TT::KeywordYield
        | TT::LiteralFalse
        | TT::LiteralNull
        | TT::LiteralTrue
    )
  }

  /// Contextual keywords that are just as often plain identifiers (`const type = ...`, `x.from`).
  pub fn is_contextual_keyword(self) -> bool {
    matches!(
      self,
      TT::KeywordAs | TT::KeywordFrom | TT::KeywordInterface | TT::KeywordOf | TT::KeywordType
    )
  }

  /// Whether this token can be used as a binding name in an import clause.
  pub fn is_binding_name(self) -> bool {
    self == TT::Identifier || self.is_contextual_keyword() || self == TT::KeywordAwait || self == TT::KeywordYield
  }

  /// Whether an expression may begin immediately after this token. This decides whether `/` starts a
  /// regex and whether `<` starts a JSX element rather than being a comparison or type argument list.
  pub fn precedes_expression(self) -> bool {
    match self {
      TT::Identifier
      | TT::PrivateMember
      | TT::LiteralFalse
      | TT::LiteralNull
      | TT::LiteralNumber
      | TT::LiteralRegex
      | TT::LiteralString
      | TT::LiteralTemplatePartStringEnd
      | TT::LiteralTrue
      | TT::KeywordSuper
      | TT::KeywordThis
      | TT::BraceClose
      | TT::BracketClose
      | TT::ParenthesisClose
      | TT::PlusPlus
      | TT::HyphenHyphen
      | TT::JsxTextContent
      | TT::Invalid => false,
      t if t.is_contextual_keyword() => false,
      _ => true,
    }
  }
}

#[derive(Clone, Debug)]
pub struct Token {
  pub loc: Loc,
  // Whether one or more whitespace characters appear immediately before this token, and at least
  // one of those whitespace characters is a line terminator.
  pub preceded_by_line_terminator: bool,
  pub typ: TT,
}

impl Token {
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, Some(self.typ))
  }
}

#[cfg(test)]
mod tests {
  use super::TT;

  #[test]
  fn markup_may_follow_operators_and_keywords_but_not_operands() {
    assert!(TT::Equals.precedes_expression());
    assert!(TT::ParenthesisOpen.precedes_expression());
    assert!(TT::KeywordReturn.precedes_expression());
    assert!(TT::EqualsChevronRight.precedes_expression());
    assert!(!TT::Identifier.precedes_expression());
    assert!(!TT::ParenthesisClose.precedes_expression());
    assert!(!TT::KeywordType.precedes_expression());
  }
}
