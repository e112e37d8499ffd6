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

mod util;

use std::path::{Path, PathBuf};

use expect_test::expect;
use util::*;

struct TestDir {
    // the temporary directory is removed on drop
    path: tempfile::TempDir,
}

impl TestDir {
    /// A project tree with a base library installed under its own kiln home:
    ///
    /// - projects `demo` (app) and `tools` (curl)
    /// - local software `app` and `zlib`, the latter shadowing the base one
    /// - base software `curl`, `openssl` and `zlib`
    fn new() -> Self {
        let dir = Self::new_empty();
        let root = dir.as_ref();
        write(root, "config/projects/demo.toml", "dependencies = [\"app\"]\n");
        write(
            root,
            "config/projects/tools.toml",
            "description = \"command line tools\"\ndependencies = [\"curl\"]\n",
        );
        write(
            root,
            "config/software/app.toml",
            "default_version = \"0.1.0\"\ndependencies = [\"openssl\", \"zlib\"]\n\n[source]\npath = \"src/app\"\n",
        );
        write(
            root,
            "config/software/zlib.toml",
            "default_version = \"1.3.1\"\n\n[source]\ngit = \"https://github.com/madler/zlib.git\"\n",
        );
        let base = "home/lib/kiln-software/config/software";
        write(
            root,
            &format!("{base}/curl.toml"),
            "default_version = \"8.6.0\"\ndependencies = [\"openssl\"]\n\n[source]\nurl = \"https://curl.se/download/curl-8.6.0.tar.gz\"\n",
        );
        write(
            root,
            &format!("{base}/openssl.toml"),
            "default_version = \"3.0.13\"\ndependencies = [\"zlib\"]\n\n[source]\nurl = \"https://www.openssl.org/source/openssl-3.0.13.tar.gz\"\n",
        );
        write(
            root,
            &format!("{base}/zlib.toml"),
            "default_version = \"1.2.13\"\n",
        );
        dir
    }

    fn new_empty() -> Self {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        Self { path: tmp_dir }
    }

    fn join(&self, sub: impl AsRef<str>) -> PathBuf {
        self.path.path().join(sub.as_ref())
    }
}

impl AsRef<Path> for TestDir {
    fn as_ref(&self) -> &Path {
        self.path.path()
    }
}

fn kiln_cmd(dir: &TestDir) -> snapbox::cmd::Command {
    snapbox::cmd::Command::new(kiln_bin())
        .current_dir(dir)
        .env("KILN_HOME", dir.join("home"))
        .env_remove("KILN_BASE_LIBRARY_PATH")
        .env_remove("RUST_LOG")
        .env_remove("RUST_BACKTRACE")
        .env_remove("RUST_LIB_BACKTRACE")
        .env("NO_COLOR", "1")
}

#[track_caller]
fn get_stdout(dir: &TestDir, args: &[&str]) -> String {
    let out = kiln_cmd(dir)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .to_owned();
    replace_dir(std::str::from_utf8(&out).unwrap(), dir)
}

#[track_caller]
fn get_err_stderr(dir: &TestDir, args: &[&str]) -> String {
    let out = kiln_cmd(dir)
        .args(args)
        .assert()
        .failure()
        .get_output()
        .stderr
        .to_owned();
    replace_dir(std::str::from_utf8(&out).unwrap(), dir)
}

#[test]
fn test_projects() {
    let dir = TestDir::new();
    check(
        get_stdout(&dir, &["projects"]),
        expect![[r#"
            demo
            tools
        "#]],
    );
    check(
        get_stdout(&dir, &["projects", "--deps"]),
        expect![[r#"
            demo: app
            tools: curl
        "#]],
    );
}

#[test]
fn test_show_build_order() {
    let dir = TestDir::new();
    check(
        get_stdout(&dir, &["show", "demo"]),
        expect![[r#"
            zlib 1.3.1 git
            openssl 3.0.13 net
            app 0.1.0 path
        "#]],
    );
    check(
        get_stdout(&dir, &["show", "tools", "--paths"]),
        expect![[r#"
            zlib 1.3.1 git $ROOT/config/software/zlib.toml
            openssl 3.0.13 net $ROOT/home/lib/kiln-software/config/software/openssl.toml
            curl 8.6.0 net $ROOT/home/lib/kiln-software/config/software/curl.toml
        "#]],
    );
}

#[test]
fn test_show_with_overrides() {
    let dir = TestDir::new();
    write(
        dir.as_ref(),
        "overrides.toml",
        "openssl = { version = \"3.2.1\" }\n",
    );
    write(dir.as_ref(), "kiln.toml", "override_file = \"overrides.toml\"\n");
    check(
        get_stdout(&dir, &["show", "demo"]),
        expect![[r#"
            zlib 1.3.1 git
            openssl 3.2.1 net (overridden)
            app 0.1.0 path
        "#]],
    );
}

#[test]
fn test_show_unknown_project() {
    let dir = TestDir::new();
    check(
        get_err_stderr(&dir, &["show", "nope"]),
        expect![[r#"
            error: project `nope` not found
        "#]],
    );
}

#[test]
fn test_missing_dependency() {
    let dir = TestDir::new();
    write(
        dir.as_ref(),
        "config/projects/broken.toml",
        "dependencies = [\"bar\"]\n",
    );
    check(
        get_err_stderr(&dir, &["projects"]),
        expect![[r#"
            error: no definition found for software `bar` required by `broken`; searched `$ROOT/home/lib/kiln-software/config/software`, `$ROOT/config/software`
        "#]],
    );
}

#[test]
fn test_directory_flag() {
    let dir = TestDir::new();
    let elsewhere = TestDir::new_empty();
    let out = kiln_cmd(&elsewhere)
        .env("KILN_HOME", dir.join("home"))
        .args(["projects", "-C"])
        .arg(dir.path.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .to_owned();
    check(
        std::str::from_utf8(&out).unwrap(),
        expect![[r#"
            demo
            tools
        "#]],
    );
}

#[test]
fn test_files() {
    let dir = TestDir::new();
    check(
        get_stdout(&dir, &["files"]),
        expect![[r#"
            project files:
              $ROOT/config/projects/demo.toml
              $ROOT/config/projects/tools.toml
            software dirs:
              $ROOT/home/lib/kiln-software/config/software
              $ROOT/config/software
            software files:
              $ROOT/home/lib/kiln-software/config/software/curl.toml
              $ROOT/home/lib/kiln-software/config/software/openssl.toml
              $ROOT/home/lib/kiln-software/config/software/zlib.toml
              $ROOT/config/software/app.toml
              $ROOT/config/software/zlib.toml
        "#]],
    );
}

#[test]
fn test_config() {
    let dir = TestDir::new();
    write(
        dir.as_ref(),
        "kiln.toml",
        "software_dir = \"defs\"\nbase_dir = \"/srv/kiln\"\nbuild_retries = 1\n",
    );
    check(
        get_stdout(&dir, &["config"]),
        expect![[r#"
            project_root = $ROOT
            project_dir = config/projects
            software_dir = defs
            override_file = (unset)
            base_library = kiln-software
            base_dir = /srv/kiln
            cache_dir = /srv/kiln/cache
            build_dir = /srv/kiln/build
            package_dir = /srv/kiln/pkg
            build_retries = 1
            fetcher_retries = 5
            append_timestamp = true
            use_git_caching = true
        "#]],
    );
}

#[test]
fn test_invalid_config() {
    let dir = TestDir::new();
    write(dir.as_ref(), "kiln.toml", "fetcher_retries = 0\n");
    check(
        get_err_stderr(&dir, &["config"]),
        expect![[r#"
            error: setting `fetcher_retries` is invalid: must be at least 1
        "#]],
    );

    let out = get_err_stderr(&dir, &["config", "--config", "missing.toml"]);
    assert!(out.starts_with("error: failed to load configuration from `missing.toml`"));
}
