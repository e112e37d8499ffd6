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

use kilnutil::cli::UniversalFlags;

use super::resolved_context;

/// List the projects defined under the project root
#[derive(Debug, clap::Parser)]
pub struct ProjectsSubcommand {
    /// Also print the direct dependencies of each project
    #[clap(long)]
    pub deps: bool,
}

pub fn run_projects(cli: &UniversalFlags, cmd: ProjectsSubcommand) -> anyhow::Result<i32> {
    let ctx = resolved_context(cli)?;
    for project in ctx.projects() {
        if cmd.deps {
            println!("{}: {}", project.name(), project.dependencies().join(", "));
        } else {
            println!("{}", project.name());
        }
    }
    Ok(0)
}
