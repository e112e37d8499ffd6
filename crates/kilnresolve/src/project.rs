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

use kilnutil::definition::ProjectDefinition;

use crate::library::Library;

/// A top-level buildable unit and its resolved component library.
#[derive(Debug, Clone)]
pub struct Project {
    path: PathBuf,
    definition: ProjectDefinition,
    library: Library,
}

impl Project {
    pub fn new(definition: ProjectDefinition, path: impl Into<PathBuf>) -> Self {
        Project {
            path: path.into(),
            definition,
            library: Library::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The definition file this project was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Direct dependency names, in declaration order.
    pub fn dependencies(&self) -> &[String] {
        &self.definition.dependencies
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    pub fn maintainer(&self) -> Option<&str> {
        self.definition.maintainer.as_deref()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.definition.homepage.as_deref()
    }

    pub fn install_dir(&self) -> Option<&Path> {
        self.definition.install_dir.as_deref()
    }

    pub fn build_version(&self) -> Option<&str> {
        self.definition.build_version.as_deref()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub(crate) fn set_library(&mut self, library: Library) {
        self.library = library;
    }
}
