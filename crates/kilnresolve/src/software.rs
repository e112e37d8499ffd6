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

use std::path::{Path, PathBuf};

use kilnutil::definition::{SoftwareDefinition, SourceDefinition};

use crate::overrides::{Override, OverrideTable};

/// How a component's source is obtained. Selected once per component from
/// its effective source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FetcherKind {
    /// Download an archive from a URL.
    Net,
    /// Clone a git repository.
    Git,
    /// Copy a local directory.
    Path,
    /// Nothing to fetch.
    Null,
}

impl FetcherKind {
    pub fn of(source: Option<&SourceDefinition>) -> Self {
        match source {
            Some(s) if s.git.is_some() => FetcherKind::Git,
            Some(s) if s.url.is_some() => FetcherKind::Net,
            Some(s) if s.path.is_some() => FetcherKind::Path,
            _ => FetcherKind::Null,
        }
    }
}

impl std::fmt::Display for FetcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FetcherKind::Net => "net",
            FetcherKind::Git => "git",
            FetcherKind::Path => "path",
            FetcherKind::Null => "null",
        };
        f.write_str(s)
    }
}

/// A software component resolved for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Software {
    name: String,
    project: String,
    path: PathBuf,
    definition: SoftwareDefinition,
    applied_override: Option<Override>,
    fetcher: FetcherKind,
}

impl Software {
    /// Bind a definition to `project`, applying the entry for its name in
    /// `overrides`, if any.
    pub fn new(
        definition: SoftwareDefinition,
        path: impl Into<PathBuf>,
        project: impl Into<String>,
        overrides: &OverrideTable,
    ) -> Self {
        let applied_override = overrides.get(&definition.name).cloned();
        let source = applied_override
            .as_ref()
            .and_then(|o| o.source.as_ref())
            .or(definition.source.as_ref());
        let fetcher = FetcherKind::of(source);
        Software {
            name: definition.name.clone(),
            project: project.into(),
            path: path.into(),
            definition,
            applied_override,
            fetcher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning project.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The definition file this component was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dependencies(&self) -> &[String] {
        &self.definition.dependencies
    }

    pub fn default_version(&self) -> Option<&str> {
        self.definition.default_version.as_deref()
    }

    /// The version to build: the overridden one if present, else the
    /// definition's default.
    pub fn version(&self) -> Option<&str> {
        self.applied_override
            .as_ref()
            .and_then(|o| o.version.as_deref())
            .or(self.default_version())
    }

    pub fn source(&self) -> Option<&SourceDefinition> {
        self.applied_override
            .as_ref()
            .and_then(|o| o.source.as_ref())
            .or(self.definition.source.as_ref())
    }

    pub fn applied_override(&self) -> Option<&Override> {
        self.applied_override.as_ref()
    }

    pub fn is_overridden(&self) -> bool {
        self.applied_override.is_some()
    }

    pub fn fetcher_kind(&self) -> FetcherKind {
        self.fetcher
    }

    pub fn license(&self) -> Option<&str> {
        self.definition.license.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    pub fn relative_path(&self) -> Option<&str> {
        self.definition.relative_path.as_deref()
    }
}

impl std::fmt::Display for Software {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.version() {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}
