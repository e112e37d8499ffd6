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

use std::rc::Rc;

use indexmap::IndexMap;

use crate::software::Software;

/// A project's resolved components, in build order.
///
/// Every component appears after all of its own dependencies, and at most
/// once.
#[derive(Debug, Clone, Default)]
pub struct Library {
    components: IndexMap<String, Rc<Software>>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `software` unless a component with the same name is already
    /// present. Returns whether it was added.
    pub fn component_added(&mut self, software: Rc<Software>) -> bool {
        if self.components.contains_key(software.name()) {
            return false;
        }
        self.components
            .insert(software.name().to_owned(), software);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Software>> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Position of `name` in build order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.components.get_index_of(name)
    }

    pub fn components(&self) -> impl Iterator<Item = &Rc<Software>> {
        self.components.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
