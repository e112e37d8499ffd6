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

//! The state of one resolution run.
//!
//! A [`RunContext`] owns the configuration, the resolved projects and the
//! logger handle of a run. Runs move strictly forward through [`RunState`];
//! any failure stops the run where it is. [`RunContext::reset`] starts over,
//! optionally keeping the logger handle.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use kilnutil::{
    config::Config,
    discovery::{
        InstalledPackages, PackageMetadata, base_library_software_dir, list_definition_files,
        locate_base_library_root,
    },
    logger::Logger,
};
use once_cell::unsync::OnceCell;
use tracing::instrument;

use crate::{
    ResolveError,
    expander::DependencyExpander,
    loader::{DefinitionLoader, DefinitionSource},
    name_map::{NameMap, merge_with_local_precedence},
    overrides::load_overrides,
    project::Project,
};

/// Log target of the run logger.
pub const LOG_TARGET: &str = "kiln::run";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RunState {
    Unconfigured,
    ConfigLoaded,
    Validated,
    ProjectsDiscovered,
    SoftwareExpanded,
}

pub struct RunContext {
    config: Config,
    state: RunState,
    projects: Vec<Project>,
    logger: OnceCell<Arc<Logger>>,
    metadata: Box<dyn PackageMetadata>,
    loader: Box<dyn DefinitionSource>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    /// A context that reads definitions from disk and looks the base library
    /// up among the installed packages.
    pub fn new() -> Self {
        Self::with_parts(
            Box::new(InstalledPackages::from_env()),
            Box::new(DefinitionLoader::new()),
        )
    }

    pub fn with_parts(
        metadata: Box<dyn PackageMetadata>,
        loader: Box<dyn DefinitionSource>,
    ) -> Self {
        RunContext {
            config: Config::default(),
            state: RunState::Unconfigured,
            projects: Vec::new(),
            logger: OnceCell::new(),
            metadata,
            loader,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Settings may be adjusted until the configuration is validated.
    pub fn config_mut(&mut self) -> Result<&mut Config, ResolveError> {
        self.expect_before("change the configuration", RunState::Validated)?;
        Ok(&mut self.config)
    }

    /// The run logger, created on first use.
    pub fn logger(&self) -> Arc<Logger> {
        Arc::clone(self.logger.get_or_init(|| Arc::new(Logger::new(LOG_TARGET))))
    }

    /// Carry a logger over from another context.
    pub fn set_logger(&mut self, logger: Arc<Logger>) {
        self.logger = OnceCell::with_value(logger);
    }

    /// Accept the built-in defaults (plus any adjustments made through
    /// [`RunContext::config_mut`]) as the run's configuration.
    pub fn configure(&mut self) -> Result<(), ResolveError> {
        self.expect_before("configure", RunState::Validated)?;
        self.state = RunState::ConfigLoaded;
        Ok(())
    }

    /// Layer a configuration file over the current settings.
    pub fn load_configuration(&mut self, path: &Path) -> Result<(), ResolveError> {
        self.expect_before("load configuration", RunState::Validated)?;
        self.config.load(path)?;
        self.state = RunState::ConfigLoaded;
        Ok(())
    }

    /// Validate the configuration, then discover projects and expand their
    /// dependencies.
    #[instrument(skip_all)]
    pub fn process_configuration(&mut self) -> Result<(), ResolveError> {
        self.validate()?;
        self.expand_projects()?;
        self.expand_software()
    }

    pub fn validate(&mut self) -> Result<(), ResolveError> {
        self.expect_state("validate the configuration", RunState::ConfigLoaded)?;
        self.config.validate()?;
        self.state = RunState::Validated;
        Ok(())
    }

    /// Load one project per project definition file.
    #[instrument(skip_all)]
    pub fn expand_projects(&mut self) -> Result<(), ResolveError> {
        self.expect_state("discover projects", RunState::Validated)?;
        let logger = self.logger();

        let mut projects: Vec<Project> = Vec::new();
        for file in self.project_files()? {
            let project = self.loader.load_project(&file)?;
            if let Some(first) = projects.iter().find(|p| p.name() == project.name()) {
                return Err(ResolveError::DuplicateProject {
                    name: project.name().to_owned(),
                    first: first.path().to_owned(),
                    second: file,
                });
            }
            logger.debug(format_args!(
                "discovered project {} at {}",
                project.name(),
                file.display()
            ));
            projects.push(project);
        }

        self.projects = projects;
        self.state = RunState::ProjectsDiscovered;
        Ok(())
    }

    /// Resolve every project's transitive dependencies into its library.
    ///
    /// Projects are expanded on a copy, which replaces the stored projects
    /// only once every project resolved.
    #[instrument(skip_all)]
    pub fn expand_software(&mut self) -> Result<(), ResolveError> {
        self.expect_state("expand software", RunState::ProjectsDiscovered)?;
        let logger = self.logger();

        let names = self.name_map()?;
        let searched = self.software_dirs()?;
        let overrides = load_overrides(&self.config)?;
        logger.debug(format_args!(
            "resolving against {} definitions and {} overrides",
            names.len(),
            overrides.len()
        ));

        let expander =
            DependencyExpander::new(&names, &overrides, &searched, &*self.loader, &logger);
        let mut expanded = self.projects.clone();
        for project in &mut expanded {
            expander.expand(project)?;
        }
        self.projects = expanded;

        self.state = RunState::SoftwareExpanded;
        Ok(())
    }

    /// Return to [`RunState::Unconfigured`] with default settings and no
    /// projects. The logger handle survives unless `include_logger` is set.
    pub fn reset(&mut self, include_logger: bool) {
        self.config.reset();
        self.projects.clear();
        self.loader.invalidate();
        self.state = RunState::Unconfigured;
        if include_logger {
            self.logger = OnceCell::new();
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project_names(&self) -> Vec<&str> {
        self.projects.iter().map(Project::name).collect()
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name() == name)
    }

    /// Like [`RunContext::project`], but a missing project is an error.
    pub fn require_project(&self, name: &str) -> Result<&Project, ResolveError> {
        self.project(name)
            .ok_or_else(|| ResolveError::UnknownProject(name.to_owned()))
    }

    /// Project definition files, in discovery order.
    pub fn project_files(&self) -> Result<Vec<PathBuf>, ResolveError> {
        Ok(list_definition_files(&self.config.project_path()?)?)
    }

    /// The base library's software directory, if the base library is
    /// configured and installed.
    pub fn base_software_dir(&self) -> Option<PathBuf> {
        let identifier = self.config.base_library.as_deref()?;
        locate_base_library_root(&*self.metadata, identifier)
            .map(|root| base_library_software_dir(&root))
    }

    /// Directories searched for software definitions, base library first.
    pub fn software_dirs(&self) -> Result<Vec<PathBuf>, ResolveError> {
        let mut dirs = Vec::new();
        dirs.extend(self.base_software_dir());
        dirs.push(self.config.software_path()?);
        Ok(dirs)
    }

    /// Every software definition file across [`RunContext::software_dirs`].
    pub fn software_files(&self) -> Result<Vec<PathBuf>, ResolveError> {
        let mut files = Vec::new();
        for dir in self.software_dirs()? {
            files.extend(list_definition_files(&dir)?);
        }
        Ok(files)
    }

    /// Base library definitions merged with the local ones, local first.
    pub fn name_map(&self) -> Result<NameMap, ResolveError> {
        let base = match self.base_software_dir() {
            Some(dir) => NameMap::from_files(list_definition_files(&dir)?)?,
            None => NameMap::new(),
        };
        let local = NameMap::from_files(list_definition_files(&self.config.software_path()?)?)?;
        Ok(merge_with_local_precedence(&base, &local))
    }

    fn expect_state(&self, action: &'static str, expected: RunState) -> Result<(), ResolveError> {
        if self.state != expected {
            return Err(ResolveError::InvalidState {
                action,
                expected,
                found: self.state,
            });
        }
        Ok(())
    }

    fn expect_before(&self, action: &'static str, limit: RunState) -> Result<(), ResolveError> {
        if self.state >= limit {
            return Err(ResolveError::StageClosed {
                action,
                limit,
                found: self.state,
            });
        }
        Ok(())
    }
}
