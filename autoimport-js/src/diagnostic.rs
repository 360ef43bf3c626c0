//! Diagnostics reported alongside a resolution and a plain-text renderer for them.
//!
//! ```
//! use autoimport_js::diagnostic::render_diagnostic;
//! use autoimport_js::diagnostic::Diagnostic;
//! use autoimport_js::loc::TextRange;
//!
//! let diag = Diagnostic::error("TEST0001", "an example error", TextRange::new(4, 5));
//! let rendered = render_diagnostic("example.jsx", "let x = 1;", &diag);
//! assert!(rendered.contains("TEST0001"));
//! assert!(rendered.contains("--> example.jsx:1:5"));
//! ```

use crate::loc::TextRange;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

/// Diagnostic severity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Error,
  Warning,
  Note,
}

impl Severity {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
      Severity::Note => "note",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A user-facing diagnostic for one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub code: &'static str,
  pub severity: Severity,
  pub message: String,
  pub range: TextRange,
  pub notes: Vec<String>,
}

impl Diagnostic {
  pub fn new(
    severity: Severity,
    code: &'static str,
    message: impl Into<String>,
    range: TextRange,
  ) -> Self {
    Self {
      code,
      severity,
      message: message.into(),
      range,
      notes: Vec::new(),
    }
  }

  pub fn error(code: &'static str, message: impl Into<String>, range: TextRange) -> Self {
    Self::new(Severity::Error, code, message, range)
  }

  pub fn warning(code: &'static str, message: impl Into<String>, range: TextRange) -> Self {
    Self::new(Severity::Warning, code, message, range)
  }

  pub fn note(code: &'static str, message: impl Into<String>, range: TextRange) -> Self {
    Self::new(Severity::Note, code, message, range)
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.notes.push(note.into());
    self
  }
}

fn clamp_to_char_boundary(text: &str, offset: usize) -> usize {
  let mut offset = offset.min(text.len());
  while !text.is_char_boundary(offset) {
    offset -= 1;
  }
  offset
}

/// Byte ranges of each line, excluding the line terminator.
fn line_bounds(text: &str) -> Vec<(usize, usize)> {
  let mut lines = Vec::new();
  let mut start = 0;
  for (i, b) in text.bytes().enumerate() {
    if b == b'\n' {
      let end = if i > start && text.as_bytes()[i - 1] == b'\r' {
        i - 1
      } else {
        i
      };
      lines.push((start, end));
      start = i + 1;
    }
  }
  lines.push((start, text.len()));
  lines
}

fn line_index_at(lines: &[(usize, usize)], offset: usize) -> usize {
  lines
    .iter()
    .rposition(|&(start, _)| start <= offset)
    .unwrap_or(0)
}

/// Render a diagnostic into a human-readable string with caret highlighting.
pub fn render_diagnostic(file_name: &str, text: &str, diagnostic: &Diagnostic) -> String {
  let mut output = String::new();
  writeln!(
    output,
    "{}[{}]: {}",
    diagnostic.severity, diagnostic.code, diagnostic.message
  )
  .unwrap();

  let lines = line_bounds(text);
  let start = clamp_to_char_boundary(text, diagnostic.range.start as usize);
  let end = clamp_to_char_boundary(text, diagnostic.range.end as usize).max(start);
  let start_line = line_index_at(&lines, start);
  let end_line = line_index_at(&lines, if end > start { end - 1 } else { end }).max(start_line);
  let column = text[lines[start_line].0..start].chars().count() + 1;
  writeln!(output, " --> {}:{}:{}", file_name, start_line + 1, column).unwrap();

  let gutter_width = (end_line + 1).to_string().len();
  writeln!(output, "{:>width$} |", "", width = gutter_width).unwrap();
  for line_idx in start_line..=end_line {
    let (line_start, line_end) = lines[line_idx];
    let line = &text[line_start..line_end];
    writeln!(output, "{:>width$} | {}", line_idx + 1, line, width = gutter_width).unwrap();

    let from = start.clamp(line_start, line_end);
    let to = end.clamp(from, line_end);
    let pad = text[line_start..from].chars().count();
    let len = text[from..to].chars().count().max(1);
    write!(
      output,
      "{:>width$} | {}{}",
      "",
      " ".repeat(pad),
      "^".repeat(len),
      width = gutter_width
    )
    .unwrap();
    if line_idx == start_line && !diagnostic.message.is_empty() {
      write!(output, " {}", diagnostic.message).unwrap();
    }
    output.push('\n');
  }

  for note in &diagnostic.notes {
    writeln!(output, "= note: {}", note).unwrap();
  }
  output
}
