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

use super::configured_context;

/// Print the definition files and directories a run would read
#[derive(Debug, clap::Parser)]
pub struct FilesSubcommand {}

pub fn run_files(cli: &UniversalFlags, _cmd: FilesSubcommand) -> anyhow::Result<i32> {
    let mut ctx = configured_context(cli)?;
    ctx.validate()?;

    println!("project files:");
    for file in ctx.project_files()? {
        println!("  {}", file.display());
    }
    println!("software dirs:");
    for dir in ctx.software_dirs()? {
        println!("  {}", dir.display());
    }
    println!("software files:");
    for file in ctx.software_files()? {
        println!("  {}", file.display());
    }
    Ok(0)
}
