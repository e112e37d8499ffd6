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

//! Project and software definition files.
//!
//! Definitions are TOML documents. The raw `*Toml` shapes mirror the files
//! one to one; reading a file converts them into the checked
//! [`ProjectDefinition`] and [`SoftwareDefinition`], whose `name` always
//! equals the file stem.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("failed to load definition `{}`", path.display())]
pub struct DefinitionError {
    pub path: Box<Path>,
    #[source]
    pub kind: DefinitionErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum DefinitionErrorKind {
    #[error("I/O error")]
    IO(#[from] std::io::Error),
    #[error("Parse error")]
    Parse(#[from] toml::de::Error),
    #[error("file name has no usable stem")]
    NoStem,
    #[error("declared name `{declared}` does not match file name `{stem}`")]
    NameMismatch { declared: String, stem: String },
    #[error("`source` bad format: {0}")]
    Source(String),
}

/// Where a component's source comes from. At most one of `url`, `git` and
/// `path` may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl SourceDefinition {
    pub fn check(&self) -> Result<(), String> {
        let kinds = [self.url.is_some(), self.git.is_some(), self.path.is_some()]
            .into_iter()
            .filter(|x| *x)
            .count();
        if kinds > 1 {
            return Err("only one of `url`, `git` and `path` may be given".into());
        }
        if (self.sha256.is_some() || self.md5.is_some()) && self.url.is_none() {
            return Err("checksums are only meaningful for `url` sources".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDefinitionToml {
    pub name: Option<String>,
    pub description: Option<String>,
    pub maintainer: Option<String>,
    pub homepage: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub build_version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDefinition {
    pub name: String,
    pub description: Option<String>,
    pub maintainer: Option<String>,
    pub homepage: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub build_version: Option<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoftwareDefinitionToml {
    pub name: Option<String>,
    pub default_version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub license: Option<String>,
    pub description: Option<String>,
    pub relative_path: Option<String>,
    pub source: Option<SourceDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoftwareDefinition {
    pub name: String,
    pub default_version: Option<String>,
    pub dependencies: Vec<String>,
    pub license: Option<String>,
    pub description: Option<String>,
    pub relative_path: Option<String>,
    pub source: Option<SourceDefinition>,
}

/// The component name a definition file provides: its file stem.
pub fn definition_name(path: &Path) -> Option<&str> {
    path.file_stem()?.to_str()
}

fn checked_name(path: &Path, declared: Option<String>) -> Result<String, DefinitionErrorKind> {
    let stem = definition_name(path).ok_or(DefinitionErrorKind::NoStem)?;
    match declared {
        Some(declared) if declared != stem => Err(DefinitionErrorKind::NameMismatch {
            declared,
            stem: stem.to_owned(),
        }),
        _ => Ok(stem.to_owned()),
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DefinitionErrorKind> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn project_from_toml(
    path: &Path,
    j: ProjectDefinitionToml,
) -> Result<ProjectDefinition, DefinitionErrorKind> {
    let ProjectDefinitionToml {
        name,
        description,
        maintainer,
        homepage,
        install_dir,
        build_version,
        dependencies,
    } = j;
    Ok(ProjectDefinition {
        name: checked_name(path, name)?,
        description,
        maintainer,
        homepage,
        install_dir,
        build_version,
        dependencies,
    })
}

pub fn software_from_toml(
    path: &Path,
    j: SoftwareDefinitionToml,
) -> Result<SoftwareDefinition, DefinitionErrorKind> {
    let SoftwareDefinitionToml {
        name,
        default_version,
        dependencies,
        license,
        description,
        relative_path,
        source,
    } = j;
    if let Some(src) = &source {
        src.check().map_err(DefinitionErrorKind::Source)?;
    }
    Ok(SoftwareDefinition {
        name: checked_name(path, name)?,
        default_version,
        dependencies,
        license,
        description,
        relative_path,
        source,
    })
}

pub fn read_project_definition(path: &Path) -> Result<ProjectDefinition, DefinitionError> {
    read_toml(path)
        .and_then(|j| project_from_toml(path, j))
        .map_err(|kind| DefinitionError {
            path: path.into(),
            kind,
        })
}

pub fn read_software_definition(path: &Path) -> Result<SoftwareDefinition, DefinitionError> {
    read_toml(path)
        .and_then(|j| software_from_toml(path, j))
        .map_err(|kind| DefinitionError {
            path: path.into(),
            kind,
        })
}
