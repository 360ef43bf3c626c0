use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;
use serde::Serialize;
use std::cmp::max;
use std::cmp::min;
use std::ops::Add;
use std::ops::AddAssign;

/// A half-open byte range within a single file.
///
/// Offsets are UTF-8 byte offsets, clamped to `u32` so they can be handed to
/// editors and serialized compactly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct TextRange {
  pub start: u32,
  pub end: u32,
}

impl TextRange {
  pub const fn new(start: u32, end: u32) -> Self {
    Self { start, end }
  }

  pub fn len(&self) -> u32 {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }
}

impl From<Loc> for TextRange {
  /// Converts a `Loc` into a `TextRange`, clamping to `u32::MAX` on overflow.
  fn from(value: Loc) -> Self {
    TextRange {
      start: clamp_to_u32(value.0),
      end: clamp_to_u32(value.1),
    }
  }
}

/// A location within the current source file expressed as UTF-8 byte offsets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn as_range(&self) -> TextRange {
    (*self).into()
  }

  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}

/// A zero-based line and column, the way editors address document positions.
/// `character` counts UTF-16 code units, matching what LSP-style hosts expect.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Position {
  pub line: u32,
  pub character: u32,
}

impl Position {
  pub const fn new(line: u32, character: u32) -> Self {
    Self { line, character }
  }

  /// Computes the position of a byte offset. Offsets past the end (or inside a
  /// multi-byte character) are clamped to the preceding character boundary.
  pub fn of_offset(source: &str, offset: usize) -> Position {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
      offset -= 1;
    }
    let before = &source[..offset];
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = before.matches('\n').count();
    let character: usize = before[line_start..].chars().map(char::len_utf16).sum();
    Position {
      line: clamp_to_u32(line),
      character: clamp_to_u32(character),
    }
  }
}

fn clamp_to_u32(value: usize) -> u32 {
  u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn converts_loc_into_range() {
    assert_eq!(Loc(4, 10).as_range(), TextRange::new(4, 10));
    assert_eq!(TextRange::new(4, 10).len(), 6);
  }

  #[test]
  fn loc_to_range_clamps_on_overflow() {
    let range = Loc(usize::MAX - 1, usize::MAX).as_range();
    assert_eq!(range.start, u32::MAX);
    assert_eq!(range.end, u32::MAX);
  }

  #[test]
  fn extending_loc_covers_both() {
    let mut loc = Loc(5, 6);
    loc += Loc(1, 2);
    assert_eq!(loc, Loc(1, 6));
    assert_eq!(Loc(3, 4) + Loc(8, 9), Loc(3, 9));
  }

  #[test]
  fn position_of_offset_counts_lines_and_utf16_units() {
    let source = "ab\nc\u{1F600}d\n";
    assert_eq!(Position::of_offset(source, 0), Position::new(0, 0));
    assert_eq!(Position::of_offset(source, 3), Position::new(1, 0));
    // The emoji is 4 bytes but 2 UTF-16 code units.
    assert_eq!(Position::of_offset(source, 8), Position::new(1, 3));
    assert_eq!(Position::of_offset(source, 100), Position::new(2, 0));
  }
}
