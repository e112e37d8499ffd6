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

//! Dependency resolution for kiln projects.
//!
//! The entry point is [`RunContext`]: load a configuration, then
//! [`RunContext::process_configuration`] discovers every project, merges the
//! base library's software definitions with the project-local ones (local
//! wins), loads version overrides and expands each project's transitive
//! dependencies into its [`Library`] in build order.

pub mod context;
pub mod error;
pub mod expander;
pub mod library;
pub mod loader;
pub mod name_map;
pub mod overrides;
pub mod project;
pub mod software;

pub use context::{RunContext, RunState};
pub use error::ResolveError;
pub use library::Library;
pub use name_map::NameMap;
pub use overrides::{Override, OverrideTable};
pub use project::Project;
pub use software::{FetcherKind, Software};
