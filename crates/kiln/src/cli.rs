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

pub mod config;
pub mod files;
pub mod projects;
pub mod show;

pub use config::*;
pub use files::*;
pub use projects::*;
pub use show::*;

use std::path::PathBuf;

use anyhow::Context;
use kilnresolve::RunContext;
use kilnutil::{cli::UniversalFlags, common::KILN_TOML};

#[derive(Debug, clap::Parser)]
#[clap(
    name = "kiln",
    about = "Configuration and dependency resolution for package assembly."
)]
pub struct KilnCli {
    #[clap(subcommand)]
    pub subcommand: KilnSubcommands,

    #[clap(flatten)]
    pub flags: UniversalFlags,
}

#[derive(Debug, clap::Parser)]
pub enum KilnSubcommands {
    Projects(ProjectsSubcommand),
    Show(ShowSubcommand),
    Files(FilesSubcommand),
    Config(ConfigSubcommand),
}

/// A run configured from the universal flags, ready to be validated.
///
/// The configuration file is `--config` if given, else `kiln.toml` in the
/// current directory if it exists. `--directory` then replaces the project
/// root; when neither sets one, the current directory is used.
pub fn configured_context(flags: &UniversalFlags) -> anyhow::Result<RunContext> {
    let mut ctx = RunContext::new();

    let config_file = match &flags.config {
        Some(path) => Some(path.clone()),
        None => {
            let default = PathBuf::from(KILN_TOML);
            default.is_file().then_some(default)
        }
    };
    match config_file {
        Some(path) => ctx
            .load_configuration(&path)
            .with_context(|| format!("failed to load configuration from `{}`", path.display()))?,
        None => ctx.configure()?,
    }

    let config = ctx.config_mut()?;
    if let Some(root) = &flags.project_root {
        let root = dunce::canonicalize(root)
            .with_context(|| format!("project root `{}` does not exist", root.display()))?;
        config.project_root = Some(root);
    } else if config.project_root.is_none() {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        config.project_root = Some(cwd);
    }
    log::debug!("project root: {:?}", config.project_root);

    Ok(ctx)
}

/// Like [`configured_context`], with every project discovered and expanded.
pub fn resolved_context(flags: &UniversalFlags) -> anyhow::Result<RunContext> {
    let mut ctx = configured_context(flags)?;
    ctx.process_configuration()?;
    Ok(ctx)
}
