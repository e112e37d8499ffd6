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

//! Finds definition files on disk and locates the installed base library.
//!
//! Discovery is tolerant: a directory that does not exist simply contains no
//! definitions, and a base library that is not installed means there are no
//! base definitions to fall back on.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::common::{BASE_LIBRARY_SOFTWARE_DIR, DEFINITION_EXT, ENV_BASE_LIBRARY_PATH};
use crate::kiln_dir;

#[derive(Debug, thiserror::Error)]
#[error("unable to list definitions in `{}`", path.display())]
pub struct DiscoveryError {
    pub path: PathBuf,
    #[source]
    pub source: walkdir::Error,
}

/// Definition files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched. Symlinks to files count as files.
/// Returns an empty list if `dir` does not exist.
pub fn list_definition_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.is_dir() {
        log::debug!("{} does not exist, no definitions there", dir.display());
        return Ok(vec![]);
    }

    let mut files = vec![];
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| DiscoveryError {
            path: dir.to_owned(),
            source: e,
        })?;
        // `Path::is_file` follows symlinks; dangling links are skipped.
        if !entry.path().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path.extension().is_some_and(|ext| ext == DEFINITION_EXT) {
            log::trace!("found definition {}", path.display());
            files.push(path);
        }
    }
    Ok(files)
}

/// Host package metadata: maps an installed package identifier to its root.
pub trait PackageMetadata {
    /// Returns the installed root of `identifier`, or `None` if it is not
    /// installed.
    fn locate(&self, identifier: &str) -> Option<PathBuf>;
}

impl<F> PackageMetadata for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn locate(&self, identifier: &str) -> Option<PathBuf> {
        self(identifier)
    }
}

/// Packages installed under the kiln home (`$KILN_HOME/lib/<identifier>`).
///
/// `KILN_BASE_LIBRARY_PATH` takes precedence over the home lookup.
#[derive(Debug, Clone, Default)]
pub struct InstalledPackages {
    explicit: Option<PathBuf>,
    lib_dir: Option<PathBuf>,
}

impl InstalledPackages {
    pub fn from_env() -> Self {
        InstalledPackages {
            explicit: std::env::var_os(ENV_BASE_LIBRARY_PATH).map(PathBuf::from),
            lib_dir: kiln_dir::lib(),
        }
    }

    /// Look packages up in `lib_dir` only, ignoring the environment.
    pub fn in_lib_dir(lib_dir: impl Into<PathBuf>) -> Self {
        InstalledPackages {
            explicit: None,
            lib_dir: Some(lib_dir.into()),
        }
    }
}

impl PackageMetadata for InstalledPackages {
    fn locate(&self, identifier: &str) -> Option<PathBuf> {
        let candidate = match &self.explicit {
            Some(p) => p.clone(),
            None => self.lib_dir.as_ref()?.join(identifier),
        };
        if candidate.is_dir() {
            Some(dunce::canonicalize(&candidate).unwrap_or(candidate))
        } else {
            None
        }
    }
}

/// Installed root of the base library `identifier`, if it is installed.
pub fn locate_base_library_root(
    metadata: &dyn PackageMetadata,
    identifier: &str,
) -> Option<PathBuf> {
    let root = metadata.locate(identifier);
    match &root {
        Some(p) => log::debug!("base library {identifier} found at {}", p.display()),
        None => log::debug!("base library {identifier} is not installed"),
    }
    root
}

/// The software definitions directory bundled with a base library.
pub fn base_library_software_dir(root: &Path) -> PathBuf {
    root.join(BASE_LIBRARY_SOFTWARE_DIR)
}
