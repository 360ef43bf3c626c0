use crate::config::StatementFormat;
use crate::loc::Position;
use crate::resolve::MissingBindingPlan;
use serde::Serialize;

/// An insertion into the document. `offset` is the UTF-8 byte offset that `position` refers to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextEdit {
  pub position: Position,
  pub offset: usize,
  pub text: String,
}

/// Turns a plan into edits. All statements go into a single insertion at the very start of the
/// document, one per line in plan order, so the resulting file order never depends on how a host
/// orders insertions that share a position.
pub fn plan(missing: &MissingBindingPlan, format: &StatementFormat) -> Vec<TextEdit> {
  if missing.is_empty() {
    return Vec::new();
  };
  let mut text = missing
    .iter()
    .map(|binding| binding.statement(format))
    .collect::<Vec<_>>()
    .join("\n");
  if format.include_trailing_newline {
    text.push('\n');
  };
  vec![TextEdit {
    position: Position::new(0, 0),
    offset: 0,
    text,
  }]
}

/// Applies insertions to `source`. Edits at the same offset end up in list order. Offsets past the
/// end or inside a character are moved back to the nearest valid boundary.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
  let mut order = (0..edits.len()).collect::<Vec<_>>();
  // Back to front, so earlier offsets stay valid.
  order.sort_by(|&a, &b| edits[b].offset.cmp(&edits[a].offset).then(b.cmp(&a)));
  let mut out = source.to_string();
  for i in order {
    let mut at = edits[i].offset.min(out.len());
    while !out.is_char_boundary(at) {
      at -= 1;
    }
    out.insert_str(at, &edits[i].text);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::apply_edits;
  use super::plan;
  use super::TextEdit;
  use crate::config::StatementFormat;
  use crate::inventory::ImportInventory;
  use crate::loc::Position;
  use crate::resolve::resolve;
  use crate::resolve::MissingBindingPlan;
  use crate::usage::UsedComponents;

  fn sample_plan() -> MissingBindingPlan {
    let used: UsedComponents = ["Button", "Icon"].into_iter().collect();
    let config = crate::config::BindingConfiguration {
      named_imports: [("Button".to_string(), "rb".to_string())].into_iter().collect(),
      default_imports: [("Icon".to_string(), "icons".to_string())].into_iter().collect(),
    };
    resolve(&ImportInventory::default(), &used, &config)
  }

  #[test]
  fn empty_plan_has_no_edits() {
    assert!(plan(&MissingBindingPlan::default(), &StatementFormat::default()).is_empty());
  }

  #[test]
  fn statements_are_batched_at_the_start() {
    let edits = plan(&sample_plan(), &StatementFormat::default());
    assert_eq!(edits, vec![TextEdit {
      position: Position::new(0, 0),
      offset: 0,
      text: "import { Button } from \"rb\"\nimport Icon from \"icons\"\n".to_string(),
    }]);
  }

  #[test]
  fn trailing_newline_is_optional() {
    let format = StatementFormat {
      include_trailing_newline: false,
      ..StatementFormat::default()
    };
    let edits = plan(&sample_plan(), &format);
    assert!(edits[0].text.ends_with("from \"icons\""));
  }

  #[test]
  fn apply_keeps_list_order_at_equal_offsets() {
    let edit = |offset: usize, text: &str| TextEdit {
      position: Position::new(0, offset as u32),
      offset,
      text: text.to_string(),
    };
    let out = apply_edits("abc", &[edit(0, "1"), edit(3, "!"), edit(0, "2"), edit(1, "-")]);
    assert_eq!(out, "12a-bc!");
  }

  #[test]
  fn apply_clamps_bad_offsets() {
    let edit = |offset: usize| TextEdit {
      position: Position::new(0, 0),
      offset,
      text: "|".to_string(),
    };
    assert_eq!(apply_edits("é", &[edit(1)]), "|é");
    assert_eq!(apply_edits("ab", &[edit(10)]), "ab|");
  }
}
