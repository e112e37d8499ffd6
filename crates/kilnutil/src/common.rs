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

/// The default configuration file name, looked up in the working directory.
pub const KILN_TOML: &str = "kiln.toml";

/// Extension shared by project and software definition files.
pub const DEFINITION_EXT: &str = "toml";

pub const DEFAULT_PROJECT_DIR: &str = "config/projects";
pub const DEFAULT_SOFTWARE_DIR: &str = "config/software";

/// Package identifier of the base library installed alongside kiln.
pub const DEFAULT_BASE_LIBRARY: &str = "kiln-software";

/// Where a base library keeps its software definitions, relative to its root.
pub const BASE_LIBRARY_SOFTWARE_DIR: &str = "config/software";

pub const DEFAULT_BUILD_RETRIES: u32 = 3;
pub const DEFAULT_FETCHER_RETRIES: u32 = 5;

/// Base directory used when `base_dir` is not configured.
pub const DEFAULT_BASE_DIR: &str = "/var/cache/kiln";

pub const ENV_KILN_HOME: &str = "KILN_HOME";
pub const ENV_BASE_LIBRARY_PATH: &str = "KILN_BASE_LIBRARY_PATH";
