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

use std::path::{Path, PathBuf};

use expect_test::Expect;

pub fn check<S: AsRef<str>>(actual: S, expect: Expect) {
    expect.assert_eq(actual.as_ref())
}

pub fn kiln_bin() -> PathBuf {
    snapbox::cmd::cargo_bin!("kiln").to_path_buf()
}

pub fn replace_dir(s: &str, dir: impl AsRef<Path>) -> String {
    let dir = dir.as_ref();
    let canonical = dunce::canonicalize(dir).unwrap();
    let s = s.replace(canonical.to_str().unwrap(), "$ROOT");
    let s = s.replace(dir.to_str().unwrap(), "$ROOT");
    s.replace("\r\n", "\n").replace('\\', "/")
}

/// Write `content` to `rel` under `root`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
