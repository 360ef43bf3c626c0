use crate::diagnostic::Diagnostic;
use crate::loc::Loc;
use crate::token::TT;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of syntax errors produced by the parser.
///
/// Diagnostic codes (prefix `PS`) are assigned per variant and are stable:
/// - `PS0001`: [`SyntaxErrorType::ExpectedSyntax`]
/// - `PS0002`: [`SyntaxErrorType::InvalidToken`]
/// - `PS0003`: [`SyntaxErrorType::JsxClosingTagMismatch`]
/// - `PS0004`: [`SyntaxErrorType::NestingTooDeep`]
/// - `PS0005`: [`SyntaxErrorType::RequiredTokenNotFound`]
/// - `PS0006`: [`SyntaxErrorType::UnclosedDelimiter`]
/// - `PS0007`: [`SyntaxErrorType::UnexpectedEnd`]
/// - `PS0008`: [`SyntaxErrorType::UnexpectedToken`]
/// - `PS0009`: [`SyntaxErrorType::UnterminatedJsxElement`]
///
/// Every variant except `NestingTooDeep` is recoverable: the parser records it and keeps going.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedSyntax(&'static str),
  InvalidToken,
  JsxClosingTagMismatch,
  NestingTooDeep,
  RequiredTokenNotFound(TT),
  UnclosedDelimiter(TT),
  UnexpectedEnd,
  UnexpectedToken,
  UnterminatedJsxElement,
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }

  /// Convert this syntax error into a [`Diagnostic`]. Recovered errors are warnings since the
  /// engine still produces a result; a fatal error is reported with `Severity::Error`.
  pub fn to_diagnostic(&self) -> Diagnostic {
    let message = self.typ.message(self.actual_token);
    let mut diagnostic = if self.typ.is_fatal() {
      Diagnostic::error(self.typ.code(), message, self.loc.as_range())
    } else {
      Diagnostic::warning(self.typ.code(), message, self.loc.as_range())
    };
    if let Some(expected) = self.typ.expected_note() {
      diagnostic = diagnostic.with_note(expected);
    }
    if let Some(actual) = self.actual_token {
      diagnostic = diagnostic.with_note(format!("found token: {:?}", actual));
    }
    diagnostic
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} [token={:?}]", self.typ, self.actual_token)
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl SyntaxErrorType {
  /// Stable diagnostic code for this syntax error variant.
  pub fn code(&self) -> &'static str {
    match self {
      SyntaxErrorType::ExpectedSyntax(_) => "PS0001",
      SyntaxErrorType::InvalidToken => "PS0002",
      SyntaxErrorType::JsxClosingTagMismatch => "PS0003",
      SyntaxErrorType::NestingTooDeep => "PS0004",
      SyntaxErrorType::RequiredTokenNotFound(_) => "PS0005",
      SyntaxErrorType::UnclosedDelimiter(_) => "PS0006",
      SyntaxErrorType::UnexpectedEnd => "PS0007",
      SyntaxErrorType::UnexpectedToken => "PS0008",
      SyntaxErrorType::UnterminatedJsxElement => "PS0009",
    }
  }

  pub fn is_fatal(&self) -> bool {
    matches!(self, SyntaxErrorType::NestingTooDeep)
  }

  /// Human-readable message describing this syntax error.
  pub fn message(&self, actual_token: Option<TT>) -> String {
    match self {
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {}", expected),
      SyntaxErrorType::InvalidToken => {
        "invalid or unterminated token (string, template, regex or character)".into()
      }
      SyntaxErrorType::JsxClosingTagMismatch => "JSX closing tag does not match opening tag".into(),
      SyntaxErrorType::NestingTooDeep => "brackets or JSX elements are nested too deeply".into(),
      SyntaxErrorType::RequiredTokenNotFound(token) => format!("expected token {:?}", token),
      SyntaxErrorType::UnclosedDelimiter(token) => format!("unclosed {:?}", token),
      SyntaxErrorType::UnexpectedEnd => actual_token
        .map(|tok| format!("unexpected end before {:?}", tok))
        .unwrap_or_else(|| "unexpected end of input".into()),
      SyntaxErrorType::UnexpectedToken => actual_token
        .map(|tok| format!("unexpected token {:?}", tok))
        .unwrap_or_else(|| "unexpected token".into()),
      SyntaxErrorType::UnterminatedJsxElement => "JSX element has no closing tag".into(),
    }
  }

  fn expected_note(&self) -> Option<String> {
    match self {
      SyntaxErrorType::ExpectedSyntax(expected) => Some(format!("expected {}", expected)),
      SyntaxErrorType::RequiredTokenNotFound(token) => Some(format!("expected token {:?}", token)),
      SyntaxErrorType::UnclosedDelimiter(_) => Some("the delimiter is closed at end of input".into()),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::diagnostic::Severity;
  use crate::loc::TextRange;

  #[test]
  fn recovered_errors_become_warnings() {
    let err = SyntaxError::new(SyntaxErrorType::UnexpectedEnd, Loc(2, 5), None);
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.code, "PS0007");
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(diagnostic.range, TextRange::new(2, 5));
    assert!(diagnostic.notes.is_empty());
  }

  #[test]
  fn fatal_errors_carry_notes() {
    let err = SyntaxError::new(
      SyntaxErrorType::NestingTooDeep,
      Loc(0, 1),
      Some(TT::BraceOpen),
    );
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.code, "PS0004");
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.notes, vec!["found token: BraceOpen".to_string()]);
  }
}
