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

#![warn(clippy::clone_on_ref_ptr)]

use std::io::IsTerminal;

use clap::Parser;
use cli::KilnSubcommands;
use kilnutil::cli::UniversalFlags;

mod cli;

use colored::*;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging.
///
/// `RUST_LOG` filters log output, printed to stderr. Without it the level is
/// `warn`, raised to `debug` by `--verbose` and lowered to `error` by
/// `--quiet`. Records emitted through the `log` facade are forwarded to the
/// same subscriber.
fn init_tracing(flags: &UniversalFlags) {
    // usage example: only show resolution details
    // env RUST_LOG=kiln::run=debug cargo run -- show demo

    let log_env_set = std::env::var("RUST_LOG").is_ok();
    let level = if flags.verbose {
        tracing::Level::DEBUG
    } else if flags.quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::WARN
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt = tracing_subscriber::fmt::layer()
        .with_ansi(std::io::stderr().is_terminal())
        .with_line_number(log_env_set)
        .with_level(true)
        .with_writer(std::io::stderr);
    let fmt = if !log_env_set {
        fmt.with_target(false).without_time().boxed()
    } else {
        fmt.compact().boxed()
    };

    let registry = tracing_subscriber::registry().with(fmt.with_filter(filter));
    if let Err(e) = registry.try_init() {
        eprintln!("Warning: Failed to set global tracing subscriber: {}", e);
    }
}

pub fn main() {
    let cli = cli::KilnCli::parse();
    let flags = cli.flags;

    init_tracing(&flags);

    use KilnSubcommands::*;
    let res = match cli.subcommand {
        Projects(p) => cli::run_projects(&flags, p),
        Show(s) => cli::run_show(&flags, s),
        Files(f) => cli::run_files(&flags, f),
        Config(c) => cli::run_config(&flags, c),
    };

    match res {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:?}", "error".red().bold(), e);
            std::process::exit(-1);
        }
    }
}
