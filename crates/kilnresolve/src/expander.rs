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

//! Recursive expansion of a project's dependencies into its [`Library`].
//!
//! Dependencies are resolved depth first in declaration order and appended
//! post-order, so a component always lands after everything it depends on.
//! A component already in the library is reused instead of being loaded
//! again, and a name that is reached again while it is still being resolved
//! is reported as a cycle.

use std::{path::PathBuf, rc::Rc};

use indexmap::IndexSet;
use kilnutil::logger::Logger;
use tracing::{Level, instrument};

use crate::{
    ResolveError, library::Library, loader::SoftwareLoader, name_map::NameMap,
    overrides::OverrideTable, project::Project,
};

/// Everything that stays fixed while the projects of a run are expanded.
pub struct DependencyExpander<'a, L: SoftwareLoader + ?Sized> {
    names: &'a NameMap,
    overrides: &'a OverrideTable,
    searched: &'a [PathBuf],
    loader: &'a L,
    logger: &'a Logger,
}

impl<'a, L: SoftwareLoader + ?Sized> DependencyExpander<'a, L> {
    /// `searched` lists the directories `names` was built from; it is only
    /// used to explain a missing dependency.
    pub fn new(
        names: &'a NameMap,
        overrides: &'a OverrideTable,
        searched: &'a [PathBuf],
        loader: &'a L,
        logger: &'a Logger,
    ) -> Self {
        DependencyExpander {
            names,
            overrides,
            searched,
            loader,
            logger,
        }
    }

    /// Resolve the transitive dependencies of `project`.
    ///
    /// On error nothing is recorded on the project.
    pub fn library_for(&self, project: &Project) -> Result<Library, ResolveError> {
        let mut walk = Walk {
            expander: self,
            project,
            library: Library::new(),
            resolving: IndexSet::new(),
        };
        for dep in project.dependencies() {
            walk.resolve(dep, project.name())?;
        }
        Ok(walk.library)
    }

    /// Resolve `project` and store the result as its library.
    #[instrument(level = Level::DEBUG, skip_all, fields(project = project.name()))]
    pub fn expand(&self, project: &mut Project) -> Result<(), ResolveError> {
        let library = self.library_for(project)?;
        self.logger.info(format_args!(
            "{}: resolved {} components",
            project.name(),
            library.len()
        ));
        project.set_library(library);
        Ok(())
    }
}

struct Walk<'w, 'a, L: SoftwareLoader + ?Sized> {
    expander: &'w DependencyExpander<'a, L>,
    project: &'w Project,
    library: Library,
    /// Names on the current resolution path, outermost first.
    resolving: IndexSet<String>,
}

impl<L: SoftwareLoader + ?Sized> Walk<'_, '_, L> {
    fn resolve(&mut self, name: &str, required_by: &str) -> Result<(), ResolveError> {
        let logger = self.expander.logger;

        if self.library.contains(name) {
            logger.debug(format_args!("-- {name} already resolved"));
            return Ok(());
        }

        if let Some(start) = self.resolving.get_index_of(name) {
            let mut cycle = self
                .resolving
                .iter()
                .skip(start)
                .cloned()
                .collect::<Vec<_>>();
            cycle.push(name.to_owned());
            return Err(ResolveError::DependencyCycle { cycle });
        }

        let path = self
            .expander
            .names
            .get(name)
            .ok_or_else(|| ResolveError::MissingDependency {
                name: name.to_owned(),
                required_by: required_by.to_owned(),
                searched: self.expander.searched.to_vec(),
            })?;

        logger.debug(format_args!(
            "-- resolving {name} (required by {required_by}) from {}",
            path.display()
        ));
        let software =
            self.expander
                .loader
                .load_software(path, self.project, self.expander.overrides)?;
        if software.is_overridden() {
            logger.debug(format_args!("---- {software} is overridden"));
        }

        self.resolving.insert(name.to_owned());
        for dep in software.dependencies() {
            self.resolve(dep, software.name())?;
        }
        self.resolving.pop();

        self.library.component_added(Rc::new(software));
        Ok(())
    }
}
