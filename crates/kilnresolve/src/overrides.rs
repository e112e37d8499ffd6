// kiln: Configuration and dependency resolution for package assembly.
// Copyright (C) 2024 International Digital Economy Academy
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//
// For inquiries, you can contact us via e-mail at jichuruanjian@idea.edu.cn.

//! Version overrides.
//!
//! An override source is a mapping from component name to either a bare
//! version string or a table with `version` and/or `source`:
//!
//! ```toml
//! zlib = "1.3.1"
//!
//! [openssl]
//! version = "3.0.13"
//! source = { url = "https://mirror.example.com/openssl-3.0.13.tar.gz" }
//! ```
//!
//! JSON documents (`.json`) of the same shape are accepted as well.

use std::path::Path;

use indexmap::IndexMap;
use kilnutil::{config::Config, definition::SourceDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ResolveError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Override {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceDefinition>,
}

impl Override {
    pub fn version(version: impl Into<String>) -> Self {
        Override {
            version: Some(version.into()),
            source: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: IndexMap<String, Override>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, ov: Override) -> &mut Self {
        self.entries.insert(name.into(), ov);
        self
    }

    /// The override for `name`. `None` simply means "not overridden".
    pub fn get(&self, name: &str) -> Option<&Override> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Override)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a table from a parsed document. `path` is only used for error
    /// reporting.
    pub fn from_value(path: &Path, value: Value) -> Result<Self, ResolveError> {
        let Value::Object(object) = value else {
            return Err(ResolveError::invalid_overrides(
                path,
                format!("expected a mapping at the top level, found {}", kind_of(&value)),
            ));
        };

        let mut table = OverrideTable::new();
        for (name, entry) in object {
            let ov = match entry {
                Value::String(version) => Override::version(version),
                entry @ Value::Object(_) => serde_json::from_value(entry).map_err(|e| {
                    ResolveError::invalid_overrides(path, format!("entry `{name}`: {e}"))
                })?,
                other => {
                    return Err(ResolveError::invalid_overrides(
                        path,
                        format!(
                            "entry `{name}` must be a version string or a mapping, found {}",
                            kind_of(&other)
                        ),
                    ));
                }
            };
            if let Some(src) = &ov.source {
                src.check().map_err(|e| {
                    ResolveError::invalid_overrides(path, format!("entry `{name}`: {e}"))
                })?;
            }
            table.insert(name, ov);
        }
        Ok(table)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Parse the override source at `path`. `.json` files are read as JSON,
/// anything else as TOML.
pub fn read_overrides(path: &Path) -> Result<OverrideTable, ResolveError> {
    let content = std::fs::read_to_string(path).map_err(|e| ResolveError::ReadOverrides {
        path: path.to_owned(),
        source: e,
    })?;
    let value: Value = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .map_err(|e| ResolveError::invalid_overrides(path, e.to_string()))?
    } else {
        let table: toml::Table = toml::from_str(&content)
            .map_err(|e| ResolveError::invalid_overrides(path, e.message().to_owned()))?;
        serde_json::to_value(table)
            .map_err(|e| ResolveError::invalid_overrides(path, e.to_string()))?
    };
    OverrideTable::from_value(path, value)
}

/// The run's override table: empty unless `override_file` is configured.
pub fn load_overrides(config: &Config) -> Result<OverrideTable, ResolveError> {
    match config.override_path()? {
        None => {
            log::debug!("no override file configured");
            Ok(OverrideTable::new())
        }
        Some(path) => {
            let table = read_overrides(&path)?;
            log::debug!("loaded {} overrides from {}", table.len(), path.display());
            Ok(table)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use expect_test::expect;
    use std::path::PathBuf;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, content).unwrap();
        p
    }

    #[test]
    fn test_unconfigured_is_empty() {
        let config = Config::default();
        assert!(load_overrides(&config).unwrap().is_empty());
    }

    #[test]
    fn test_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "overrides.toml",
            r#"
            zlib = "1.3.1"

            [openssl]
            version = "3.0.13"
            source = { url = "https://mirror.example.com/openssl.tar.gz" }
            "#,
        );
        let mut config = Config::default();
        config.project_root = Some(dir.path().to_owned());
        config.override_file = Some("overrides.toml".into());

        let table = load_overrides(&config).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("zlib"), Some(&Override::version("1.3.1")));
        let openssl = table.get("openssl").unwrap();
        assert_eq!(openssl.version.as_deref(), Some("3.0.13"));
        assert_eq!(
            openssl.source.as_ref().and_then(|s| s.url.as_deref()),
            Some("https://mirror.example.com/openssl.tar.gz")
        );
        assert!(table.get("curl").is_none());
    }

    #[test]
    fn test_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(
            dir.path(),
            "overrides.json",
            r#"{ "zlib": "1.3.1", "curl": { "version": "8.6.0" } }"#,
        );
        let table = read_overrides(&p).unwrap();
        let listed = table
            .iter()
            .map(|(k, v)| format!("{k}={}", v.version.as_deref().unwrap_or("-")))
            .collect::<Vec<_>>();
        expect![[r#"
            [
                "zlib=1.3.1",
                "curl=8.6.0",
            ]
        "#]]
        .assert_debug_eq(&listed);
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        let err = OverrideTable::from_value(
            Path::new("overrides.json"),
            serde_json::json!(["zlib", "1.3.1"]),
        )
        .unwrap_err();
        expect!["invalid override data in `overrides.json`: expected a mapping at the top level, found a list"]
            .assert_eq(&err.to_string());
    }

    #[test]
    fn test_bad_entry_is_rejected() {
        let err = OverrideTable::from_value(
            Path::new("overrides.toml"),
            serde_json::json!({ "zlib": 13 }),
        )
        .unwrap_err();
        expect!["invalid override data in `overrides.toml`: entry `zlib` must be a version string or a mapping, found a number"]
            .assert_eq(&err.to_string());

        let err = OverrideTable::from_value(
            Path::new("overrides.toml"),
            serde_json::json!({ "zlib": { "verison": "1.0" } }),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidOverrides { .. }));
    }

    #[test]
    fn test_missing_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.project_root = Some(dir.path().to_owned());
        config.override_file = Some("absent.toml".into());
        let err = load_overrides(&config).unwrap_err();
        assert!(matches!(err, ResolveError::ReadOverrides { .. }));
    }
}
