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

//! Turning definition files into [`Project`]s and [`Software`].

#[cfg(test)]
pub mod mock;

use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use kilnutil::definition::{SoftwareDefinition, read_project_definition, read_software_definition};

use crate::{ResolveError, overrides::OverrideTable, project::Project, software::Software};

pub trait ProjectLoader {
    /// Parse the project definition at `path`.
    fn load_project(&self, path: &Path) -> Result<Project, ResolveError>;
}

pub trait SoftwareLoader {
    /// Parse the software definition at `path`, bound to `project` and
    /// reflecting any entry for it in `overrides`.
    fn load_software(
        &self,
        path: &Path,
        project: &Project,
        overrides: &OverrideTable,
    ) -> Result<Software, ResolveError>;

    /// Forget anything cached from earlier loads.
    fn invalidate(&self) {}
}

/// Loads both kinds of definitions.
pub trait DefinitionSource: ProjectLoader + SoftwareLoader {}

impl<T> DefinitionSource for T where T: ProjectLoader + SoftwareLoader {}

/// Reads TOML definition files from disk.
///
/// Software definitions are parsed at most once per path; the parsed
/// definition is shared by every project that uses it.
#[derive(Debug, Default)]
pub struct DefinitionLoader {
    software_cache: RefCell<HashMap<PathBuf, Rc<SoftwareDefinition>>>,
}

impl DefinitionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn software_definition(&self, path: &Path) -> Result<Rc<SoftwareDefinition>, ResolveError> {
        if let Some(def) = self.software_cache.borrow().get(path) {
            return Ok(Rc::clone(def));
        }

        let def = Rc::new(read_software_definition(path)?);
        self.software_cache
            .borrow_mut()
            .insert(path.to_owned(), Rc::clone(&def));
        Ok(def)
    }
}

impl ProjectLoader for DefinitionLoader {
    fn load_project(&self, path: &Path) -> Result<Project, ResolveError> {
        let def = read_project_definition(path)?;
        Ok(Project::new(def, path))
    }
}

impl SoftwareLoader for DefinitionLoader {
    fn load_software(
        &self,
        path: &Path,
        project: &Project,
        overrides: &OverrideTable,
    ) -> Result<Software, ResolveError> {
        let def = self.software_definition(path)?;
        Ok(Software::new(
            SoftwareDefinition::clone(&def),
            path,
            project.name(),
            overrides,
        ))
    }

    fn invalidate(&self) {
        self.software_cache.borrow_mut().clear();
    }
}
