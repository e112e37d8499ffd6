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

use kilnutil::{config::ConfigError, definition::DefinitionError, discovery::DiscoveryError};
use thiserror::Error;

use crate::context::RunState;

fn display_dirs(dirs: &[PathBuf]) -> String {
    if dirs.is_empty() {
        return "(no directories)".into();
    }
    dirs.iter()
        .map(|d| format!("`{}`", d.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Any error that may abort a resolution run.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(
        "no definition found for software `{name}` required by `{required_by}`; searched {}",
        display_dirs(searched)
    )]
    MissingDependency {
        name: String,
        required_by: String,
        searched: Vec<PathBuf>,
    },
    #[error("dependency cycle detected: {}", cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },
    #[error(
        "software `{name}` is defined more than once in the same directory: `{}` and `{}`",
        first.display(),
        second.display()
    )]
    DuplicateDefinition {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error(
        "project `{name}` is defined more than once: `{}` and `{}`",
        first.display(),
        second.display()
    )]
    DuplicateProject {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("failed to read overrides `{}`", path.display())]
    ReadOverrides {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid override data in `{}`: {reason}", path.display())]
    InvalidOverrides { path: PathBuf, reason: String },
    #[error("project `{0}` not found")]
    UnknownProject(String),
    #[error("cannot {action} while the run is {found:?}, expected {expected:?}")]
    InvalidState {
        action: &'static str,
        expected: RunState,
        found: RunState,
    },
    #[error("cannot {action} while the run is {found:?}, must happen before {limit:?}")]
    StageClosed {
        action: &'static str,
        limit: RunState,
        found: RunState,
    },
}

impl ResolveError {
    pub(crate) fn invalid_overrides(path: &Path, reason: impl Into<String>) -> Self {
        ResolveError::InvalidOverrides {
            path: path.to_owned(),
            reason: reason.into(),
        }
    }
}
