use ahash::HashSet;
use ahash::HashSetExt;
use core::ops::RangeInclusive;
use once_cell::sync::Lazy;

#[derive(Clone)]
pub struct CharFilter {
  chars: HashSet<char>,
}

impl CharFilter {
  pub fn new() -> CharFilter {
    CharFilter {
      chars: HashSet::new(),
    }
  }

  pub fn add_char(&mut self, c: char) {
    self.chars.insert(c);
  }

  pub fn add_chars(&mut self, chars: RangeInclusive<char>) {
    for c in chars {
      self.chars.insert(c);
    }
  }

  pub fn add_filter(&mut self, other: &CharFilter) {
    self.chars.extend(other.chars.iter().copied());
  }

  pub fn has(&self, c: char) -> bool {
    self.chars.contains(&c)
  }
}

pub const ECMASCRIPT_LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

#[inline]
pub fn is_line_terminator(c: char) -> bool {
  ECMASCRIPT_LINE_TERMINATORS.contains(&c)
}

pub static DIGIT: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('0'..='9');
  filter
});

pub static ID_START: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('a'..='z');
  filter.add_chars('A'..='Z');
  filter.add_char('_');
  filter.add_char('$');
  filter
});

pub static ID_CONTINUE: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = (*ID_START).clone();
  filter.add_filter(&DIGIT);
  // ZWNJ and ZWJ.
  filter.add_char('\u{200C}');
  filter.add_char('\u{200D}');
  filter
});

// JSX identifiers may contain hyphens, e.g. `<my-element data-id>`.
pub static ID_CONTINUE_JSX: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = (*ID_CONTINUE).clone();
  filter.add_char('-');
  filter
});

// Non-ASCII whitespace that must never be absorbed into an identifier.
pub static UNICODE_WHITESPACE: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_char('\u{00A0}');
  filter.add_char('\u{1680}');
  filter.add_chars('\u{2000}'..='\u{200A}');
  filter.add_char('\u{202F}');
  filter.add_char('\u{205F}');
  filter.add_char('\u{3000}');
  filter.add_char('\u{FEFF}');
  filter.add_char('\u{2028}');
  filter.add_char('\u{2029}');
  filter
});
