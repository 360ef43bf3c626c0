//! Settings for one resolution pass: which module each component comes from, and how inserted
//! statements are written.
//!
//! Settings are plain JSON. The same keys are accepted at the top level, nested under the
//! [`SETTINGS_SECTION`] object, or as editor-style dotted keys:
//!
//! ```json
//! {
//!   "import-specific-elements-on-save.namedImports": { "Button": "react-bootstrap" },
//!   "import-specific-elements-on-save.defaultImports": { "Icon": "icon-lib" },
//!   "quoteStyle": "single"
//! }
//! ```

use ahash::HashMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// The settings section editors group these keys under.
pub const SETTINGS_SECTION: &str = "import-specific-elements-on-save";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read settings from {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("invalid settings: {0}")]
  Json(#[from] serde_json::Error),
  #[error("settings must be a JSON object")]
  NotAnObject,
  #[error("\"import-specific-elements-on-save\" must be a JSON object")]
  InvalidSection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
  #[default]
  Double,
  Single,
}

impl QuoteStyle {
  pub fn quote(self) -> char {
    match self {
      QuoteStyle::Double => '"',
      QuoteStyle::Single => '\'',
    }
  }
}

/// How inserted import statements are spelled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatementFormat {
  pub quote_style: QuoteStyle,
  pub semicolons: bool,
  /// Whether the inserted block ends with a line break, keeping it on its own lines.
  pub include_trailing_newline: bool,
}

impl Default for StatementFormat {
  fn default() -> Self {
    StatementFormat {
      quote_style: QuoteStyle::Double,
      semicolons: false,
      include_trailing_newline: true,
    }
  }
}

/// Component name to module specifier, one map per import form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BindingConfiguration {
  pub named_imports: HashMap<String, String>,
  pub default_imports: HashMap<String, String>,
}

impl BindingConfiguration {
  /// An empty module specifier counts as unmapped.
  pub fn named_module(&self, name: &str) -> Option<&str> {
    self
      .named_imports
      .get(name)
      .map(String::as_str)
      .filter(|m| !m.is_empty())
  }

  pub fn default_module(&self, name: &str) -> Option<&str> {
    self
      .default_imports
      .get(name)
      .map(String::as_str)
      .filter(|m| !m.is_empty())
  }

  pub fn is_mapped(&self, name: &str) -> bool {
    self.named_module(name).is_some() || self.default_module(name).is_some()
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
  #[serde(flatten)]
  pub bindings: BindingConfiguration,
  #[serde(flatten)]
  pub format: StatementFormat,
}

// `null` reads as "not set" everywhere, as it does in editor settings.
fn drop_nulls(value: &mut Value) {
  if let Value::Object(map) = value {
    map.retain(|_, v| !v.is_null());
    for v in map.values_mut() {
      drop_nulls(v);
    }
  };
}

impl Settings {
  pub fn from_json_str(json: &str) -> Result<Settings, ConfigError> {
    let value: Value = serde_json::from_str(json)?;
    Settings::from_value(value)
  }

  pub fn from_value(mut value: Value) -> Result<Settings, ConfigError> {
    drop_nulls(&mut value);
    let Value::Object(raw) = value else {
      return Err(ConfigError::NotAnObject);
    };

    // Later sources win: top-level keys, then the section object, then dotted keys.
    let mut flat = Map::new();
    let mut section = None;
    let mut dotted = Vec::new();
    let prefix = format!("{SETTINGS_SECTION}.");
    for (key, v) in raw {
      if key == SETTINGS_SECTION {
        match v {
          Value::Object(map) => section = Some(map),
          _ => return Err(ConfigError::InvalidSection),
        };
      } else if let Some(key) = key.strip_prefix(&prefix) {
        dotted.push((key.to_string(), v));
      } else {
        flat.insert(key, v);
      };
    }
    flat.extend(section.unwrap_or_default());
    flat.extend(dotted);

    let settings: Settings = serde_json::from_value(Value::Object(flat))?;
    tracing::debug!(
      named = settings.bindings.named_imports.len(),
      default = settings.bindings.default_imports.len(),
      "loaded settings"
    );
    Ok(settings)
  }

  pub fn load(path: &Path) -> Result<Settings, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Settings::from_json_str(&json)
  }
}

#[cfg(test)]
mod tests {
  use super::ConfigError;
  use super::QuoteStyle;
  use super::Settings;
  use super::StatementFormat;

  #[test]
  fn empty_object_gives_defaults() {
    let settings = Settings::from_json_str("{}").unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.format, StatementFormat {
      quote_style: QuoteStyle::Double,
      semicolons: false,
      include_trailing_newline: true,
    });
  }

  #[test]
  fn flat_keys() {
    let settings = Settings::from_json_str(
      r#"{
        "namedImports": { "Button": "react-bootstrap" },
        "defaultImports": { "Icon": "icon-lib" },
        "quoteStyle": "single",
        "semicolons": true,
        "unrelated": 1
      }"#,
    )
    .unwrap();
    assert_eq!(settings.bindings.named_module("Button"), Some("react-bootstrap"));
    assert_eq!(settings.bindings.default_module("Icon"), Some("icon-lib"));
    assert_eq!(settings.format.quote_style, QuoteStyle::Single);
    assert!(settings.format.semicolons);
    assert!(settings.format.include_trailing_newline);
  }

  #[test]
  fn sectioned_and_dotted_keys() {
    let sectioned = Settings::from_json_str(
      r#"{ "import-specific-elements-on-save": { "namedImports": { "Card": "ui" } } }"#,
    )
    .unwrap();
    assert_eq!(sectioned.bindings.named_module("Card"), Some("ui"));

    let dotted = Settings::from_json_str(
      r#"{
        "import-specific-elements-on-save.defaultImports": { "Logo": "./logo" },
        "editor.formatOnSave": true
      }"#,
    )
    .unwrap();
    assert_eq!(dotted.bindings.default_module("Logo"), Some("./logo"));
    assert!(dotted.bindings.named_imports.is_empty());
  }

  #[test]
  fn dotted_keys_override_section() {
    let settings = Settings::from_json_str(
      r#"{
        "import-specific-elements-on-save": { "namedImports": { "A": "old" } },
        "import-specific-elements-on-save.namedImports": { "A": "new" }
      }"#,
    )
    .unwrap();
    assert_eq!(settings.bindings.named_module("A"), Some("new"));
  }

  #[test]
  fn nulls_and_empty_modules_are_unmapped() {
    let settings = Settings::from_json_str(
      r#"{ "namedImports": { "A": null, "B": "" }, "defaultImports": null }"#,
    )
    .unwrap();
    assert_eq!(settings.bindings.named_module("A"), None);
    assert_eq!(settings.bindings.named_module("B"), None);
    assert!(!settings.bindings.is_mapped("B"));
  }

  #[test]
  fn wrong_shapes_are_errors() {
    assert!(matches!(
      Settings::from_json_str("[]"),
      Err(ConfigError::NotAnObject)
    ));
    assert!(matches!(
      Settings::from_json_str(r#"{ "import-specific-elements-on-save": 3 }"#),
      Err(ConfigError::InvalidSection)
    ));
    assert!(matches!(
      Settings::from_json_str(r#"{ "namedImports": ["Button"] }"#),
      Err(ConfigError::Json(_))
    ));
    assert!(matches!(
      Settings::from_json_str("{ nope"),
      Err(ConfigError::Json(_))
    ));
  }

  #[test]
  fn missing_file_is_a_read_error() {
    let err = Settings::load(std::path::Path::new("/nonexistent/autoimport.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/autoimport.json"));
  }
}
