use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AuditError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Dataset layout and audit rules, usually read from `feataudit.toml`.
///
/// Every field has a default matching the historical `./data` layout, so an
/// empty file (or no file at all) is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    pub name: String,
    /// Directory that relative table files resolve against.
    pub data_dir: PathBuf,
    /// Directory issue logs and the counts summary are written to.
    pub results_dir: PathBuf,
    pub reference: TableSource,
    pub renamed: TableSource,
    pub edited: TableSource,
    /// Output tables in lookup priority order. The first table holding a
    /// feature wins.
    pub outputs: Vec<OutputSource>,
    /// Output names in the order the backward pass walks them. When unset,
    /// indoor, buildings, outdoor come first and any other outputs follow.
    pub backward_order: Option<Vec<String>>,
    pub fields: FieldNames,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            name: "alignment audit".into(),
            data_dir: PathBuf::from("./data"),
            results_dir: PathBuf::from("./results"),
            reference: TableSource::new("Alignment.csv"),
            renamed: TableSource::new("renamed.csv"),
            edited: TableSource::new("edited.csv"),
            outputs: vec![
                OutputSource::new("indoor", "indoor.csv"),
                OutputSource::new("outdoor", "outdoor.csv"),
                OutputSource::new("buildings", "buildings.csv"),
            ],
            backward_order: None,
            fields: FieldNames::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSource {
    pub file: PathBuf,
    /// Collect row diagnostics (name-less rows, too many attributes).
    #[serde(default)]
    pub validate_rows: bool,
}

impl TableSource {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into(), validate_rows: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSource {
    pub name: String,
    pub file: PathBuf,
    #[serde(default = "default_true")]
    pub validate_rows: bool,
}

impl OutputSource {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), file: file.into(), validate_rows: true }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Distinguished fields
// ---------------------------------------------------------------------------

/// Column names with special meaning in the rename and edit tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldNames {
    /// Rename table column holding the feature's new name.
    pub new_name: String,
    /// Edit table column holding the correction code.
    pub correction: String,
    /// Substring of a correction code that documents a deletion.
    pub deletion_marker: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            new_name: "neuer Name".into(),
            correction: "Korrektur".into(),
            deletion_marker: "Loeschung".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, AuditError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| AuditError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if self.outputs.is_empty() {
            return Err(AuditError::ConfigValidation(
                "at least one output table is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for output in &self.outputs {
            if output.name.trim().is_empty() {
                return Err(AuditError::ConfigValidation(format!(
                    "output table '{}' has an empty name",
                    output.file.display()
                )));
            }
            if !seen.insert(output.name.as_str()) {
                return Err(AuditError::ConfigValidation(format!(
                    "duplicate output table name '{}'",
                    output.name
                )));
            }
        }

        if let Some(order) = &self.backward_order {
            let mut listed = HashSet::new();
            for name in order {
                if !seen.contains(name.as_str()) {
                    return Err(AuditError::ConfigValidation(format!(
                        "backward_order names unknown output table '{name}'"
                    )));
                }
                if !listed.insert(name.as_str()) {
                    return Err(AuditError::ConfigValidation(format!(
                        "backward_order lists '{name}' twice"
                    )));
                }
            }
        }

        for (what, value) in [
            ("fields.new_name", &self.fields.new_name),
            ("fields.correction", &self.fields.correction),
            ("fields.deletion_marker", &self.fields.deletion_marker),
        ] {
            if value.is_empty() {
                return Err(AuditError::ConfigValidation(format!("{what} must not be empty")));
            }
        }

        Ok(())
    }

    /// Resolve relative `data_dir` / `results_dir` against `base`
    /// (normally the config file's directory).
    pub fn rebase(&mut self, base: &Path) {
        if self.data_dir.is_relative() {
            self.data_dir = base.join(&self.data_dir);
        }
        if self.results_dir.is_relative() {
            self.results_dir = base.join(&self.results_dir);
        }
    }

    /// Full path of a table file.
    pub fn table_path(&self, file: &Path) -> PathBuf {
        self.data_dir.join(file)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
