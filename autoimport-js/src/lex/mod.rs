use crate::char::is_line_terminator;
use crate::char::CharFilter;
use crate::char::DIGIT;
use crate::char::ID_CONTINUE;
use crate::char::ID_CONTINUE_JSX;
use crate::char::ID_START;
use crate::char::UNICODE_WHITESPACE;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use ahash::HashMap;
use ahash::HashMapExt;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr;
use memchr::memchr2;
use memchr::memchr3;
use once_cell::sync::Lazy;


#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexMode {
  JsxTag,
  JsxTextContent,
  SlashIsRegex,
  Standard,
  TemplateStrContinue,
}

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
  next: usize,
}

// Contains the match length.
#[derive(Copy, Clone)]
struct Match(usize);

impl Match {
  pub fn len(&self) -> usize {
    self.0
  }

  pub fn prefix(&self, n: usize) -> Match {
    debug_assert!(n <= self.len());
    Match(n)
  }
}

struct PatternMatcher {
  patterns: Vec<TT>,
  matcher: AhoCorasick,
  anchored: bool,
}

impl PatternMatcher {
  pub fn new(anchored: bool, patterns: &[(TT, &str)]) -> Self {
    let (tts, syns): (Vec<_>, Vec<_>) = patterns.iter().copied().unzip();
    let matcher = AhoCorasickBuilder::new()
      .start_kind(if anchored {
        StartKind::Anchored
      } else {
        StartKind::Unanchored
      })
      .kind(Some(AhoCorasickKind::DFA))
      .match_kind(MatchKind::LeftmostLongest)
      .build(syns)
      // The pattern sets are static and known to be valid.
      .expect("build pattern matcher");
    PatternMatcher {
      patterns: tts,
      matcher,
      anchored,
    }
  }

  /// For anchored matchers the match starts at the lexer position; otherwise the match length
  /// includes everything skipped before the pattern.
  pub fn find(&self, lexer: &Lexer) -> Option<(TT, Match)> {
    self
      .matcher
      .find(Input::new(&lexer.source[lexer.next..]).anchored(if self.anchored {
        Anchored::Yes
      } else {
        Anchored::No
      }))
      .map(|m| (self.patterns[m.pattern().as_usize()], Match(m.end())))
  }
}

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(code: &'a str) -> Lexer<'a> {
    Lexer {
      source: code,
      next: 0,
    }
  }

  pub fn next(&self) -> usize {
    self.next
  }

  fn end(&self) -> usize {
    self.source.len()
  }

  fn remaining(&self) -> usize {
    self.end() - self.next
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.end())
  }

  fn eof_range(&self) -> Loc {
    Loc(self.end(), self.end())
  }

  fn peek_or_eof(&self, n: usize) -> Option<char> {
    self.source[self.next..].chars().nth(n)
  }

  /// WARNING: Prefer checkpoints instead. Only use this if you know what you're doing.
  pub fn set_next(&mut self, next: usize) {
    self.next = next;
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> Loc {
    Loc(checkpoint.next, self.next)
  }

  pub fn apply_checkpoint(&mut self, checkpoint: LexerCheckpoint) {
    self.next = checkpoint.next;
  }

  fn through_char_or_end(&self, c: u8) -> Match {
    memchr(c, self.source[self.next..].as_bytes())
      .map(|pos| Match(pos + 1))
      .unwrap_or_else(|| Match(self.remaining()))
  }

  fn while_not_2_chars(&self, a: u8, b: u8) -> Match {
    Match(memchr2(a, b, self.source[self.next..].as_bytes()).unwrap_or(self.remaining()))
  }

  fn while_not_3_chars(&self, a: u8, b: u8, c: u8) -> Match {
    Match(memchr3(a, b, c, self.source[self.next..].as_bytes()).unwrap_or(self.remaining()))
  }

  fn while_chars(&self, chars: &CharFilter) -> Match {
    let mut len = 0;
    for ch in self.source[self.next..].chars() {
      if chars.has(ch) {
        len += ch.len_utf8();
      } else {
        break;
      }
    }
    Match(len)
  }

  fn consume(&mut self, m: Match) -> Match {
    self.next += m.len();
    m
  }

  fn skip_expect(&mut self, n: usize) {
    debug_assert!(self.next + n <= self.end());
    self.next += n;
  }

  fn skip_char(&mut self) {
    if let Some(c) = self.peek_or_eof(0) {
      self.skip_expect(c.len_utf8());
    }
  }

  fn drive(&mut self, preceded_by_line_terminator: bool, f: impl FnOnce(&mut Self) -> TT) -> Token {
    let cp = self.checkpoint();
    let typ = f(self);
    Token {
      loc: self.since_checkpoint(cp),
      typ,
      preceded_by_line_terminator,
    }
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

#[rustfmt::skip]
const PUNCTUATORS: &[(TT, &str)] = &[
  (TT::At, "@"),
  (TT::Asterisk, "*"),
  (TT::BraceClose, "}"),
  (TT::BraceOpen, "{"),
  (TT::BracketClose, "]"),
  (TT::BracketOpen, "["),
  (TT::ChevronLeft, "<"),
  (TT::ChevronRight, ">"),
  (TT::Colon, ":"),
  (TT::Comma, ","),
  (TT::Dot, "."),
  (TT::DotDotDot, "..."),
  (TT::Equals, "="),
  (TT::EqualsChevronRight, "=>"),
  (TT::Exclamation, "!"),
  (TT::HyphenHyphen, "--"),
  (TT::ParenthesisClose, ")"),
  (TT::ParenthesisOpen, "("),
  (TT::PlusPlus, "++"),
  (TT::Question, "?"),
  (TT::QuestionDot, "?."),
  (TT::Semicolon, ";"),
  (TT::Slash, "/"),
  (TT::SlashEquals, "/="),
  (TT::Operator, "&"),
  (TT::Operator, "&&"),
  (TT::Operator, "&&="),
  (TT::Operator, "&="),
  (TT::Operator, "**"),
  (TT::Operator, "**="),
  (TT::Operator, "*="),
  (TT::Operator, "|"),
  (TT::Operator, "||"),
  (TT::Operator, "||="),
  (TT::Operator, "|="),
  (TT::Operator, "^"),
  (TT::Operator, "^="),
  (TT::Operator, "<<"),
  (TT::Operator, "<<="),
  (TT::Operator, "<="),
  (TT::Operator, ">>"),
  (TT::Operator, ">>="),
  (TT::Operator, ">>>"),
  (TT::Operator, ">>>="),
  (TT::Operator, ">="),
  (TT::Operator, "=="),
  (TT::Operator, "==="),
  (TT::Operator, "!="),
  (TT::Operator, "!=="),
  (TT::Operator, "-"),
  (TT::Operator, "-="),
  (TT::Operator, "%"),
  (TT::Operator, "%="),
  (TT::Operator, "+"),
  (TT::Operator, "+="),
  (TT::Operator, "??"),
  (TT::Operator, "??="),
  (TT::Operator, "~"),
];

// Inside a JSX tag every punctuator is a single character, so `>>` in `<A>>` is two tokens.
#[rustfmt::skip]
const JSX_TAG_PUNCTUATORS: &[(TT, &str)] = &[
  (TT::ChevronLeftSlash, "</"),
  (TT::ChevronLeft, "<"),
  (TT::ChevronRight, ">"),
  (TT::Slash, "/"),
  (TT::BraceOpen, "{"),
  (TT::BraceClose, "}"),
  (TT::Equals, "="),
  (TT::Colon, ":"),
  (TT::Dot, "."),
  (TT::Comma, ","),
];

static SIG: Lazy<PatternMatcher> = Lazy::new(|| PatternMatcher::new(true, PUNCTUATORS));

static JSX_SIG: Lazy<PatternMatcher> = Lazy::new(|| PatternMatcher::new(true, JSX_TAG_PUNCTUATORS));

static ML_COMMENT: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new(false, &[
    (TT::CommentMultilineEnd, "*/"),
    // WARNING: Does not consider Unicode line terminators.
    (TT::LineTerminator, "\r"),
    (TT::LineTerminator, "\n"),
  ])
});

static INSIG: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new(true, &[
    (TT::LineTerminator, "\r"),
    (TT::LineTerminator, "\n"),
    (TT::LineTerminator, "\u{2028}"),
    (TT::LineTerminator, "\u{2029}"),
    (TT::Whitespace, "\x09"),
    (TT::Whitespace, "\x0b"),
    (TT::Whitespace, "\x0c"),
    (TT::Whitespace, "\x20"),
    (TT::Whitespace, "\u{00A0}"),
    (TT::Whitespace, "\u{1680}"),
    (TT::Whitespace, "\u{2000}"),
    (TT::Whitespace, "\u{2001}"),
    (TT::Whitespace, "\u{2002}"),
    (TT::Whitespace, "\u{2003}"),
    (TT::Whitespace, "\u{2004}"),
    (TT::Whitespace, "\u{2005}"),
    (TT::Whitespace, "\u{2006}"),
    (TT::Whitespace, "\u{2007}"),
    (TT::Whitespace, "\u{2008}"),
    (TT::Whitespace, "\u{2009}"),
    (TT::Whitespace, "\u{200A}"),
    (TT::Whitespace, "\u{202F}"),
    (TT::Whitespace, "\u{205F}"),
    (TT::Whitespace, "\u{3000}"),
    (TT::Whitespace, "\u{FEFF}"),
    (TT::CommentMultiline, "/*"),
    (TT::CommentSingle, "//"),
  ])
});

pub static KEYWORDS: Lazy<HashMap<&'static str, TT>> = Lazy::new(|| {
  let mut map = HashMap::<&'static str, TT>::new();
  map.insert("as", TT::KeywordAs);
  map.insert("await", TT::KeywordAwait);
  map.insert("case", TT::KeywordCase);
  map.insert("default", TT::KeywordDefault);
  map.insert("delete", TT::KeywordDelete);
  map.insert("do", TT::KeywordDo);
  map.insert("else", TT::KeywordElse);
  map.insert("export", TT::KeywordExport);
  map.insert("extends", TT::KeywordExtends);
  map.insert("false", TT::LiteralFalse);
  map.insert("from", TT::KeywordFrom);
  map.insert("import", TT::KeywordImport);
  map.insert("in", TT::KeywordIn);
  map.insert("instanceof", TT::KeywordInstanceof);
  map.insert("interface", TT::KeywordInterface);
  map.insert("new", TT::KeywordNew);
  map.insert("null", TT::LiteralNull);
  map.insert("of", TT::KeywordOf);
  map.insert("return", TT::KeywordReturn);
  map.insert("super", TT::KeywordSuper);
  map.insert("this", TT::KeywordThis);
  map.insert("throw", TT::KeywordThrow);
  map.insert("true", TT::LiteralTrue);
  map.insert("type", TT::KeywordType);
  map.insert("typeof", TT::KeywordTypeof);
  map.insert("void", TT::KeywordVoid);
  map.insert("yield", TT::KeywordYield);
  map
});

/// Returns whether the comment includes a line terminator.
fn lex_multiline_comment(lexer: &mut Lexer<'_>) -> bool {
  // Consume `/*`.
  lexer.skip_expect(2);
  let mut contains_newline = false;
  loop {
    // An unterminated comment swallows the rest of the source.
    let (tt, mat) = ML_COMMENT
      .find(lexer)
      .unwrap_or((TT::EOF, Match(lexer.remaining())));
    lexer.consume(mat);
    match tt {
      TT::LineTerminator => contains_newline = true,
      _ => break,
    };
  }
  contains_newline
}

fn lex_single_comment(lexer: &mut Lexer<'_>) {
  lexer.skip_expect(2);
  lexer.consume(lexer.through_char_or_end(b'\n'));
}

fn lex_unicode_escape(lexer: &mut Lexer<'_>) -> bool {
  if lexer.peek_or_eof(0) != Some('\\') || lexer.peek_or_eof(1) != Some('u') {
    return false;
  }
  lexer.skip_expect(2);
  if lexer.peek_or_eof(0) == Some('{') {
    lexer.skip_expect(1);
    let digits = lexer.source[lexer.next..]
      .bytes()
      .take_while(u8::is_ascii_hexdigit)
      .count();
    lexer.skip_expect(digits);
    if digits == 0 || lexer.peek_or_eof(0) != Some('}') {
      return false;
    }
    lexer.skip_expect(1);
    return true;
  }
  for _ in 0..4 {
    match lexer.peek_or_eof(0) {
      Some(c) if c.is_ascii_hexdigit() => lexer.skip_expect(1),
      _ => return false,
    }
  }
  true
}

fn is_identifier_start(c: char) -> bool {
  ID_START.has(c) || c == '\\' || (!c.is_ascii() && !UNICODE_WHITESPACE.has(c))
}

fn lex_identifier(lexer: &mut Lexer<'_>, mode: LexMode) -> TT {
  let start = lexer.next();
  let mut valid = true;
  loop {
    lexer.consume(lexer.while_chars(if mode == LexMode::JsxTag {
      &ID_CONTINUE_JSX
    } else {
      &ID_CONTINUE
    }));
    match lexer.peek_or_eof(0) {
      Some('\\') => {
        if !lex_unicode_escape(lexer) {
          valid = false;
          break;
        }
      }
      // We assume a non-ASCII character is part of an identifier unless it's whitespace.
      Some(c) if !c.is_ascii() && !UNICODE_WHITESPACE.has(c) => lexer.skip_expect(c.len_utf8()),
      _ => break,
    }
  }
  if !valid {
    // Always make progress, even on a lone backslash.
    if lexer.next() == start {
      lexer.skip_char();
    };
    return TT::Invalid;
  }
  // JSX names accept any keyword, and keywords never matter inside tags.
  if mode == LexMode::JsxTag {
    return TT::Identifier;
  }
  KEYWORDS
    .get(&lexer[Loc(start, lexer.next())])
    .copied()
    .unwrap_or(TT::Identifier)
}

/// Numbers are only lexed precisely enough to skip them: digits, radix prefixes, separators,
/// exponents and the bigint suffix are all identifier-continue characters.
fn lex_number(lexer: &mut Lexer<'_>) -> TT {
  let start = lexer.next();
  let leading_dot = lexer.peek_or_eof(0) == Some('.');
  if leading_dot {
    lexer.skip_expect(1);
  };
  lexer.consume(lexer.while_chars(&ID_CONTINUE));
  let integer = &lexer[Loc(start, lexer.next())];
  let has_radix_prefix = integer.len() > 1
    && integer.starts_with('0')
    && integer[1..].starts_with(|c: char| matches!(c, 'x' | 'X' | 'b' | 'B' | 'o' | 'O'));
  if !leading_dot && !has_radix_prefix && lexer.peek_or_eof(0) == Some('.') {
    lexer.skip_expect(1);
    lexer.consume(lexer.while_chars(&ID_CONTINUE));
  }
  let lexed = &lexer[Loc(start, lexer.next())];
  if !has_radix_prefix
    && lexed.ends_with(['e', 'E'])
    && matches!(lexer.peek_or_eof(0), Some('+' | '-'))
  {
    lexer.skip_expect(1);
    lexer.consume(lexer.while_chars(&DIGIT));
  }
  TT::LiteralNumber
}

fn lex_private_member(lexer: &mut Lexer<'_>) -> TT {
  // Include the `#` in the token.
  lexer.skip_expect(1);
  match lexer.peek_or_eof(0) {
    Some(c) if is_identifier_start(c) => {
      lex_identifier(lexer, LexMode::Standard);
      TT::PrivateMember
    }
    _ => TT::Invalid,
  }
}

fn lex_regex(lexer: &mut Lexer<'_>) -> TT {
  // Consume slash.
  lexer.skip_expect(1);
  let mut in_charset = false;
  loop {
    let Some(c) = lexer.peek_or_eof(0) else {
      return TT::Invalid;
    };
    // A regex cannot span lines; leave the line terminator for the next token.
    if is_line_terminator(c) {
      return TT::Invalid;
    }
    lexer.skip_expect(c.len_utf8());
    match c {
      '\\' => match lexer.peek_or_eof(0) {
        Some('\n') | Some('\r') | None => return TT::Invalid,
        Some(escaped) => lexer.skip_expect(escaped.len_utf8()),
      },
      '/' if !in_charset => break,
      '[' => in_charset = true,
      ']' if in_charset => in_charset = false,
      _ => {}
    };
  }
  // Flags.
  lexer.consume(lexer.while_chars(&ID_CONTINUE));
  TT::LiteralRegex
}

fn lex_string(lexer: &mut Lexer<'_>) -> TT {
  let quote = lexer.source.as_bytes()[lexer.next];
  lexer.skip_expect(1);
  loop {
    lexer.consume(lexer.while_not_3_chars(b'\\', b'\n', quote));
    match lexer.source.as_bytes().get(lexer.next) {
      None => return TT::Invalid,
      // Unterminated string. Stop at the line terminator so the next line lexes normally.
      Some(b'\n') => return TT::Invalid,
      Some(b'\\') => {
        lexer.skip_expect(1);
        // Escapes include line continuations.
        lexer.skip_char();
      }
      Some(_) => {
        lexer.skip_expect(1);
        break;
      }
    };
  }
  TT::LiteralString
}

// JSX attribute strings have no escapes and may span lines.
fn lex_jsx_string(lexer: &mut Lexer<'_>) -> TT {
  let quote = lexer.source.as_bytes()[lexer.next];
  lexer.skip_expect(1);
  let rest = &lexer.source.as_bytes()[lexer.next..];
  match memchr(quote, rest) {
    Some(pos) => {
      lexer.skip_expect(pos + 1);
      TT::LiteralString
    }
    None => {
      lexer.skip_expect(rest.len());
      TT::Invalid
    }
  }
}

/// Ends with `${` or backtick.
fn lex_template_string_continue(lexer: &mut Lexer<'_>) -> TT {
  loop {
    lexer.consume(lexer.while_not_3_chars(b'\\', b'`', b'$'));
    match lexer.source.as_bytes().get(lexer.next) {
      None => return TT::Invalid,
      Some(b'\\') => {
        lexer.skip_expect(1);
        lexer.skip_char();
      }
      Some(b'`') => {
        lexer.skip_expect(1);
        return TT::LiteralTemplatePartStringEnd;
      }
      Some(_) => {
        if lexer.peek_or_eof(1) == Some('{') {
          lexer.skip_expect(2);
          return TT::LiteralTemplatePartString;
        }
        lexer.skip_expect(1);
      }
    };
  }
}

fn lex_template(lexer: &mut Lexer<'_>) -> TT {
  // Consume backtick.
  lexer.skip_expect(1);
  lex_template_string_continue(lexer)
}

/// Skips whitespace and comments, returning whether a line terminator was crossed.
fn skip_insignificant(lexer: &mut Lexer<'_>) -> bool {
  let mut preceded_by_line_terminator = false;
  // Hashbang comment.
  if lexer.next() == 0 && lexer.source.starts_with("#!") {
    lexer.consume(lexer.while_not_2_chars(b'\n', b'\r'));
  }
  while let Some((tt, mat)) = INSIG.find(lexer) {
    match tt {
      TT::LineTerminator => {
        lexer.consume(mat);
        preceded_by_line_terminator = true;
      }
      TT::Whitespace => {
        lexer.consume(mat);
      }
      TT::CommentMultiline => {
        preceded_by_line_terminator |= lex_multiline_comment(lexer);
      }
      TT::CommentSingle => {
        preceded_by_line_terminator = true;
        lex_single_comment(lexer);
      }
      _ => unreachable!(),
    };
  }
  preceded_by_line_terminator
}

pub fn lex_next(lexer: &mut Lexer<'_>, mode: LexMode) -> Token {
  if mode == LexMode::JsxTextContent {
    return lexer.drive(false, |lexer| {
      lexer.consume(lexer.while_not_2_chars(b'{', b'<'));
      TT::JsxTextContent
    });
  };

  if mode == LexMode::TemplateStrContinue {
    return lexer.drive(false, lex_template_string_continue);
  };

  let preceded_by_line_terminator = skip_insignificant(lexer);

  // EOF is different from Invalid, so we should emit this specifically.
  let Some(c) = lexer.peek_or_eof(0) else {
    return Token {
      loc: lexer.eof_range(),
      typ: TT::EOF,
      preceded_by_line_terminator,
    };
  };

  lexer.drive(preceded_by_line_terminator, |lexer| {
    let jsx = mode == LexMode::JsxTag;
    if is_identifier_start(c) {
      return lex_identifier(lexer, mode);
    };
    let starts_number =
      DIGIT.has(c) || (c == '.' && lexer.peek_or_eof(1).is_some_and(|n| DIGIT.has(n)));
    if starts_number && !jsx {
      return lex_number(lexer);
    };
    match c {
      '"' | '\'' if jsx => return lex_jsx_string(lexer),
      '"' | '\'' => return lex_string(lexer),
      '`' if !jsx => return lex_template(lexer),
      '#' if !jsx => return lex_private_member(lexer),
      '/' if mode == LexMode::SlashIsRegex => return lex_regex(lexer),
      _ => {}
    };
    let matcher = if jsx { &*JSX_SIG } else { &*SIG };
    match matcher.find(lexer) {
      Some((mut typ, mut mat)) => {
        // `?.5` is a conditional followed by a number, not optional chaining.
        if typ == TT::QuestionDot && lexer.peek_or_eof(2).is_some_and(|n| DIGIT.has(n)) {
          typ = TT::Question;
          mat = mat.prefix(1);
        };
        lexer.consume(mat);
        typ
      }
      None => {
        lexer.skip_char();
        TT::Invalid
      }
    }
  })
}

// Reserved words the lexer has no token for, since the resolver never needs to tell them apart.
const RESERVED_WORDS: &[&str] = &[
  "break", "catch", "class", "const", "continue", "debugger", "enum", "finally", "for", "function",
  "if", "switch", "try", "var", "while", "with",
];

/// Whether `name` can appear as a local binding in an import statement. Hyphenated JSX names like
/// `my-widget` and reserved words can't.
pub fn is_binding_identifier(name: &str) -> bool {
  if RESERVED_WORDS.contains(&name) {
    return false;
  };
  let mut lexer = Lexer::new(name);
  let t = lex_next(&mut lexer, LexMode::Standard);
  t.typ.is_binding_name() && t.loc == Loc(0, name.len())
}
