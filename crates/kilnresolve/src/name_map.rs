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

//! Component name → definition file mapping.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use kilnutil::definition::definition_name;

use crate::ResolveError;

/// Maps each component name to the definition file providing it.
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    entries: IndexMap<String, PathBuf>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map keyed by file stem.
    ///
    /// Files within one set must not share a stem; that would make the
    /// winner depend on listing order, so it is reported instead.
    pub fn from_files<I, P>(files: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut entries: IndexMap<String, PathBuf> = IndexMap::new();
        for file in files {
            let file = file.as_ref();
            let Some(name) = definition_name(file) else {
                log::warn!("skipping definition with unusable name: {}", file.display());
                continue;
            };
            if let Some(first) = entries.get(name) {
                return Err(ResolveError::DuplicateDefinition {
                    name: name.to_owned(),
                    first: first.clone(),
                    second: file.to_owned(),
                });
            }
            entries.insert(name.to_owned(), file.to_owned());
        }
        Ok(NameMap { entries })
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

/// Shorthand for [`NameMap::from_files`].
pub fn build_name_map<I, P>(files: I) -> Result<NameMap, ResolveError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    NameMap::from_files(files)
}

/// Merge two maps, keeping `local`'s path for names present in both.
///
/// Base entries keep their position; names only `local` knows are appended.
pub fn merge_with_local_precedence(base: &NameMap, local: &NameMap) -> NameMap {
    let mut entries = base.entries.clone();
    for (name, path) in &local.entries {
        if let Some(shadowed) = entries.insert(name.clone(), path.clone()) {
            log::debug!(
                "local definition {} shadows {}",
                path.display(),
                shadowed.display()
            );
        }
    }
    NameMap { entries }
}
