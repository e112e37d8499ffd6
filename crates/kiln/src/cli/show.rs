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

/// Print the components of a project in build order
#[derive(Debug, clap::Parser)]
pub struct ShowSubcommand {
    /// The project to show
    pub project: String,

    /// Print the definition file of each component
    #[clap(long)]
    pub paths: bool,
}

pub fn run_show(cli: &UniversalFlags, cmd: ShowSubcommand) -> anyhow::Result<i32> {
    let ctx = resolved_context(cli)?;
    let project = ctx.require_project(&cmd.project)?;

    for software in project.library().components() {
        let mut line = format!(
            "{} {} {}",
            software.name(),
            software.version().unwrap_or("-"),
            software.fetcher_kind()
        );
        if software.is_overridden() {
            line.push_str(" (overridden)");
        }
        if cmd.paths {
            line.push_str(&format!(" {}", software.path().display()));
        }
        println!("{line}");
    }
    Ok(0)
}
