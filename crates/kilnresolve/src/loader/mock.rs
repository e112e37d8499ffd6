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

use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
};

use kilnutil::definition::{ProjectDefinition, SoftwareDefinition};

use crate::{
    ResolveError, name_map::NameMap, overrides::OverrideTable, project::Project,
    software::Software,
};

use super::{ProjectLoader, SoftwareLoader};

/// In-memory definitions for exercising the expander without touching disk.
#[derive(Debug, Default)]
pub struct MockLoader {
    software: HashMap<PathBuf, SoftwareDefinition>,
    projects: HashMap<PathBuf, ProjectDefinition>,
    loads: RefCell<HashMap<String, usize>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_of(dir: &str, name: &str) -> PathBuf {
        PathBuf::from(format!("/mock/{dir}/{name}.toml"))
    }

    /// Add a software definition under `/mock/software`.
    pub fn add_software<'a>(
        &mut self,
        name: &str,
        version: &str,
        deps: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.add_software_in("software", name, version, deps)
    }

    pub fn add_software_in<'a>(
        &mut self,
        dir: &str,
        name: &str,
        version: &str,
        deps: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        let def = SoftwareDefinition {
            name: name.into(),
            default_version: Some(version.into()),
            dependencies: deps.into_iter().map(String::from).collect(),
            ..Default::default()
        };
        self.software.insert(Self::path_of(dir, name), def);
        self
    }

    pub fn add_project<'a>(
        &mut self,
        name: &str,
        deps: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        let def = ProjectDefinition {
            name: name.into(),
            dependencies: deps.into_iter().map(String::from).collect(),
            ..Default::default()
        };
        self.projects.insert(Self::path_of("projects", name), def);
        self
    }

    /// A name map over every software definition in `dir`.
    pub fn name_map(&self, dir: &str) -> NameMap {
        let prefix = PathBuf::from(format!("/mock/{dir}"));
        let mut files = self
            .software
            .keys()
            .filter(|p| p.parent() == Some(prefix.as_path()))
            .collect::<Vec<_>>();
        files.sort();
        NameMap::from_files(files).unwrap()
    }

    pub fn project(&self, name: &str) -> Project {
        self.load_project(&Self::path_of("projects", name)).unwrap()
    }

    /// How many times the definition named `name` was loaded.
    pub fn load_count(&self, name: &str) -> usize {
        self.loads.borrow().get(name).copied().unwrap_or(0)
    }
}

impl ProjectLoader for MockLoader {
    fn load_project(&self, path: &Path) -> Result<Project, ResolveError> {
        let def = self
            .projects
            .get(path)
            .unwrap_or_else(|| panic!("no mock project at {}", path.display()));
        Ok(Project::new(def.clone(), path))
    }
}

impl SoftwareLoader for MockLoader {
    fn load_software(
        &self,
        path: &Path,
        project: &Project,
        overrides: &OverrideTable,
    ) -> Result<Software, ResolveError> {
        let def = self
            .software
            .get(path)
            .unwrap_or_else(|| panic!("no mock software at {}", path.display()));
        *self.loads.borrow_mut().entry(def.name.clone()).or_default() += 1;
        Ok(Software::new(def.clone(), path, project.name(), overrides))
    }
}
