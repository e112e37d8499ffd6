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

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LOGGER_ID: AtomicU64 = AtomicU64::new(1);

/// A run-scoped logging handle.
///
/// Records go through the `log` facade under a fixed target, so the
/// subscriber installed by the binary decides where they end up. A handle may
/// outlive the run it was created for and be carried into the next one.
#[derive(Debug)]
pub struct Logger {
    id: u64,
    target: String,
}

impl Logger {
    pub fn new(target: impl Into<String>) -> Self {
        Logger {
            id: NEXT_LOGGER_ID.fetch_add(1, Ordering::Relaxed),
            target: target.into(),
        }
    }

    /// Process-unique id of this handle.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn log(&self, level: log::Level, args: fmt::Arguments<'_>) {
        log::log!(target: self.target.as_str(), level, "{}", args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(log::Level::Debug, args)
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(log::Level::Info, args)
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(log::Level::Warn, args)
    }
}
