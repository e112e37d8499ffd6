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

use std::path::PathBuf;

use crate::common::ENV_KILN_HOME;

/// The kiln home directory: `$KILN_HOME`, or `~/.kiln`.
///
/// Unlike most of kiln this never creates anything on disk.
pub fn home() -> Option<PathBuf> {
    if let Some(kiln_home) = std::env::var_os(ENV_KILN_HOME) {
        return Some(PathBuf::from(kiln_home));
    }
    home::home_dir().map(|h| h.join(".kiln"))
}

/// Where installed packages such as base libraries live.
pub fn lib() -> Option<PathBuf> {
    home().map(|h| h.join("lib"))
}

#[test]
fn test_kiln_dir() {
    use expect_test::expect;

    let Some(home) = home() else {
        return;
    };
    let dirs = [lib().unwrap()];
    let dirs = dirs
        .iter()
        .map(|p| {
            p.strip_prefix(&home)
                .unwrap()
                .to_str()
                .unwrap()
                .replace(['\\', '/'], "|")
        })
        .collect::<Vec<_>>();
    expect![[r#"
        [
            "lib",
        ]
    "#]]
    .assert_debug_eq(&dirs);
}
