//! Finds and loads `gripe.toml`.
//!
//! Lookup order:
//!
//! 1. `--config`
//! 2. `gripe.toml`, then `.gripe.toml`, in the project directory
//!    (`--analyze-dir` when given, else the working directory)
//! 3. `config.toml` in the user directory (`$GRIPE_CONFIG_DIR`, else `~/.gripe`)
//! 4. built-in defaults

use anyhow::{Context, Result};
use gripe_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order. `init` writes the first.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["gripe.toml", ".gripe.toml"];

const USER_CONFIG_NAME: &str = "config.toml";

/// How the configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Named with `--config`.
    Flag,
    /// Found in the project directory.
    Project,
    /// Found in the user directory.
    User,
    /// No file; built-in defaults.
    Defaults,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "--config",
            Self::Project => "project config",
            Self::User => "user config",
            Self::Defaults => "built-in defaults",
        })
    }
}

/// A parsed configuration and the file it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    /// Parsed settings.
    pub config: Config,
    /// File the settings were read from; `None` for defaults.
    pub file: Option<PathBuf>,
    /// How `file` was found.
    pub origin: Origin,
}

impl LoadedConfig {
    /// Directory to scan.
    ///
    /// `--analyze-dir` wins. Otherwise `[scanner] root`, which is relative
    /// to the directory of the config file it was written in.
    #[must_use]
    pub fn scan_root(&self, analyze_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = analyze_dir {
            return dir.to_path_buf();
        }
        let root = &self.config.scanner.root;
        match self.file.as_deref().and_then(Path::parent) {
            Some(base) if root.is_relative() => base.join(root),
            _ => root.clone(),
        }
    }

    /// One-line description for logs, e.g. `project config ./gripe.toml`.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.file {
            Some(file) => format!("{} {}", self.origin, file.display()),
            None => self.origin.to_string(),
        }
    }
}

/// Locates and parses the configuration for a run.
///
/// # Errors
///
/// Returns an error if the located file cannot be read or parsed. A
/// `--config` path that does not exist is an error too.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<LoadedConfig> {
    let (file, origin) = locate(project_dir, explicit, user_config_dir());
    let config = match &file {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };
    Ok(LoadedConfig {
        config,
        file,
        origin,
    })
}

/// Takes the user directory as a parameter so tests need no env vars.
fn locate(
    project_dir: &Path,
    explicit: Option<&Path>,
    user_dir: Option<PathBuf>,
) -> (Option<PathBuf>, Origin) {
    if let Some(path) = explicit {
        return (Some(path.to_path_buf()), Origin::Flag);
    }

    let project = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file());
    if let Some(path) = project {
        tracing::debug!("Found project config: {}", path.display());
        return (Some(path), Origin::Project);
    }

    match user_dir.map(|dir| dir.join(USER_CONFIG_NAME)) {
        Some(path) if path.is_file() => {
            tracing::debug!("Found user config: {}", path.display());
            (Some(path), Origin::User)
        }
        _ => (None, Origin::Defaults),
    }
}

fn user_config_dir() -> Option<PathBuf> {
    match std::env::var_os("GRIPE_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".gripe")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn loaded(file: Option<&str>, root: &str) -> LoadedConfig {
        let mut config = Config::default();
        config.scanner.root = PathBuf::from(root);
        LoadedConfig {
            config,
            file: file.map(PathBuf::from),
            origin: if file.is_some() {
                Origin::Project
            } else {
                Origin::Defaults
            },
        }
    }

    #[test]
    fn flag_wins_without_checking_existence() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("gripe.toml"), "").unwrap();

        let (file, origin) = locate(project.path(), Some(Path::new("/nowhere.toml")), None);
        assert_eq!(file, Some(PathBuf::from("/nowhere.toml")));
        assert_eq!(origin, Origin::Flag);
    }

    #[test]
    fn project_names_in_order() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(".gripe.toml"), "").unwrap();
        assert_eq!(
            locate(project.path(), None, None),
            (Some(project.path().join(".gripe.toml")), Origin::Project)
        );

        fs::write(project.path().join("gripe.toml"), "").unwrap();
        assert_eq!(
            locate(project.path(), None, None).0,
            Some(project.path().join("gripe.toml"))
        );
    }

    #[test]
    fn user_config_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        assert_eq!(
            locate(project.path(), None, Some(user.path().to_path_buf())),
            (None, Origin::Defaults)
        );

        fs::write(user.path().join("config.toml"), "").unwrap();
        assert_eq!(
            locate(project.path(), None, Some(user.path().to_path_buf())),
            (Some(user.path().join("config.toml")), Origin::User)
        );
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join("gripe.toml")).unwrap();
        assert_eq!(locate(project.path(), None, None).1, Origin::Defaults);
    }

    #[test]
    fn load_reports_the_failing_file() {
        let project = TempDir::new().unwrap();
        let path = project.path().join("gripe.toml");
        fs::write(&path, "[scanner]\ncontext_lines = \"many\"\n").unwrap();

        let err = load(project.path(), Some(&path)).err().unwrap();
        assert!(format!("{err:#}").contains("gripe.toml"));
    }

    #[test]
    fn scan_root_is_relative_to_the_config_file() {
        let config = loaded(Some("/work/repo/gripe.toml"), "src");
        assert_eq!(config.scan_root(None), PathBuf::from("/work/repo/src"));
        assert_eq!(
            config.scan_root(Some(Path::new("other"))),
            PathBuf::from("other")
        );
        assert_eq!(
            loaded(Some("/work/repo/gripe.toml"), "/abs").scan_root(None),
            PathBuf::from("/abs")
        );
        assert_eq!(loaded(None, ".").scan_root(None), PathBuf::from("."));
    }

    #[test]
    fn describe_names_origin_and_file() {
        assert_eq!(
            loaded(Some("gripe.toml"), ".").describe(),
            "project config gripe.toml"
        );
        assert_eq!(loaded(None, ".").describe(), "built-in defaults");
    }
}
