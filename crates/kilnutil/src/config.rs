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

//! The configuration store.
//!
//! A [`Config`] starts out with built-in defaults. Configuration files are
//! layered on top with [`Config::load`]: every key present in a file replaces
//! the current value, keys absent from the file are left untouched. Nothing
//! downstream may rely on a configuration until [`Config::validate`] succeeded.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::{
    DEFAULT_BASE_DIR, DEFAULT_BASE_LIBRARY, DEFAULT_BUILD_RETRIES, DEFAULT_FETCHER_RETRIES,
    DEFAULT_PROJECT_DIR, DEFAULT_SOFTWARE_DIR,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required setting `{0}` is not set")]
    Missing(&'static str),
    #[error("setting `{name}` is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to read config file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the project tree. Required.
    pub project_root: Option<PathBuf>,
    /// Project definitions directory, relative to `project_root`.
    pub project_dir: String,
    /// Local software definitions directory, relative to `project_root`.
    pub software_dir: String,
    /// Optional override source. Relative paths resolve against `project_root`.
    pub override_file: Option<PathBuf>,
    /// Package identifier of the base library, if any.
    pub base_library: Option<String>,

    pub base_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub package_dir: Option<PathBuf>,
    pub build_retries: u32,
    pub fetcher_retries: u32,
    pub append_timestamp: bool,
    pub use_git_caching: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project_root: None,
            project_dir: DEFAULT_PROJECT_DIR.into(),
            software_dir: DEFAULT_SOFTWARE_DIR.into(),
            override_file: None,
            base_library: Some(DEFAULT_BASE_LIBRARY.into()),
            base_dir: None,
            cache_dir: None,
            build_dir: None,
            package_dir: None,
            build_retries: DEFAULT_BUILD_RETRIES,
            fetcher_retries: DEFAULT_FETCHER_RETRIES,
            append_timestamp: true,
            use_git_caching: true,
        }
    }
}

/// The on-disk shape of a configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub project_root: Option<PathBuf>,
    pub project_dir: Option<String>,
    pub software_dir: Option<String>,
    pub override_file: Option<PathBuf>,
    pub base_library: Option<String>,
    pub base_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub package_dir: Option<PathBuf>,
    pub build_retries: Option<u32>,
    pub fetcher_retries: Option<u32>,
    pub append_timestamp: Option<bool>,
    pub use_git_caching: Option<bool>,
}

/// A typed setting value, as listed by [`Config::settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Path(Option<PathBuf>),
    Str(Option<String>),
    Int(u32),
    Bool(bool),
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValue::Path(Some(p)) => write!(f, "{}", p.display()),
            SettingValue::Str(Some(s)) => write!(f, "{s}"),
            SettingValue::Path(None) | SettingValue::Str(None) => write!(f, "(unset)"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the built-in defaults.
    pub fn reset(&mut self) {
        *self = Config::default();
    }

    /// Layer the configuration file at `path` over the current settings.
    ///
    /// A relative `project_root` in the file is taken relative to the
    /// directory containing the file.
    pub fn load(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_owned(),
            source: e,
        })?;
        let mut file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })?;
        if let Some(root) = file.project_root.take() {
            let root = if root.is_relative() {
                path.parent().unwrap_or(Path::new("")).join(root)
            } else {
                root
            };
            file.project_root = Some(root);
        }
        log::debug!("loaded config file {}", path.display());
        self.merge(file);
        Ok(())
    }

    /// Apply every setting present in `file` over the current values.
    pub fn merge(&mut self, file: ConfigFile) {
        let ConfigFile {
            project_root,
            project_dir,
            software_dir,
            override_file,
            base_library,
            base_dir,
            cache_dir,
            build_dir,
            package_dir,
            build_retries,
            fetcher_retries,
            append_timestamp,
            use_git_caching,
        } = file;

        if project_root.is_some() {
            self.project_root = project_root;
        }
        if let Some(v) = project_dir {
            self.project_dir = v;
        }
        if let Some(v) = software_dir {
            self.software_dir = v;
        }
        if override_file.is_some() {
            self.override_file = override_file;
        }
        if base_library.is_some() {
            self.base_library = base_library;
        }
        if base_dir.is_some() {
            self.base_dir = base_dir;
        }
        if cache_dir.is_some() {
            self.cache_dir = cache_dir;
        }
        if build_dir.is_some() {
            self.build_dir = build_dir;
        }
        if package_dir.is_some() {
            self.package_dir = package_dir;
        }
        if let Some(v) = build_retries {
            self.build_retries = v;
        }
        if let Some(v) = fetcher_retries {
            self.fetcher_retries = v;
        }
        if let Some(v) = append_timestamp {
            self.append_timestamp = v;
        }
        if let Some(v) = use_git_caching {
            self.use_git_caching = v;
        }
    }

    /// Check that every required setting is present and well-formed.
    ///
    /// Settings are checked in declaration order and the first failure is
    /// reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_root.is_none() {
            return Err(ConfigError::Missing("project_root"));
        }
        check_relative_dir("project_dir", &self.project_dir)?;
        check_relative_dir("software_dir", &self.software_dir)?;
        if let Some(base) = &self.base_library {
            if base.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    name: "base_library",
                    reason: "package identifier must not be empty".into(),
                });
            }
        }
        if let Some(file) = &self.override_file {
            if file.as_os_str().is_empty() {
                return Err(ConfigError::Invalid {
                    name: "override_file",
                    reason: "path must not be empty".into(),
                });
            }
        }
        if self.fetcher_retries == 0 {
            return Err(ConfigError::Invalid {
                name: "fetcher_retries",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn project_root(&self) -> Result<&Path, ConfigError> {
        self.project_root
            .as_deref()
            .ok_or(ConfigError::Missing("project_root"))
    }

    /// Directory holding project definitions.
    pub fn project_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.project_root()?.join(&self.project_dir))
    }

    /// Directory holding the project-local software definitions.
    pub fn software_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.project_root()?.join(&self.software_dir))
    }

    /// The override source, if one is configured.
    pub fn override_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        match &self.override_file {
            None => Ok(None),
            Some(p) if p.is_absolute() => Ok(Some(p.clone())),
            Some(p) => Ok(Some(self.project_root()?.join(p))),
        }
    }

    pub fn base_dir(&self) -> PathBuf {
        self.base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.base_dir().join("cache"))
    }

    pub fn build_dir(&self) -> PathBuf {
        self.build_dir
            .clone()
            .unwrap_or_else(|| self.base_dir().join("build"))
    }

    pub fn package_dir(&self) -> PathBuf {
        self.package_dir
            .clone()
            .unwrap_or_else(|| self.base_dir().join("pkg"))
    }

    /// All settings with their current values, in declaration order.
    pub fn settings(&self) -> Vec<(&'static str, SettingValue)> {
        use SettingValue::*;
        vec![
            ("project_root", Path(self.project_root.clone())),
            ("project_dir", Str(Some(self.project_dir.clone()))),
            ("software_dir", Str(Some(self.software_dir.clone()))),
            ("override_file", Path(self.override_file.clone())),
            ("base_library", Str(self.base_library.clone())),
            ("base_dir", Path(Some(self.base_dir()))),
            ("cache_dir", Path(Some(self.cache_dir()))),
            ("build_dir", Path(Some(self.build_dir()))),
            ("package_dir", Path(Some(self.package_dir()))),
            ("build_retries", Int(self.build_retries)),
            ("fetcher_retries", Int(self.fetcher_retries)),
            ("append_timestamp", Bool(self.append_timestamp)),
            ("use_git_caching", Bool(self.use_git_caching)),
        ]
    }
}

fn check_relative_dir(name: &'static str, dir: &str) -> Result<(), ConfigError> {
    if dir.trim().is_empty() {
        return Err(ConfigError::Invalid {
            name,
            reason: "directory must not be empty".into(),
        });
    }
    if Path::new(dir).is_absolute() {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("`{dir}` must be relative to `project_root`"),
        });
    }
    Ok(())
}
