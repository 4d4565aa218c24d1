//! watercooler configuration.
//!
//! Loaded from `~/.watercooler/config.toml`. The file is optional.
//!
//! The threads base directory is resolved once, at the process boundary,
//! through a chain:
//!
//! 1. `--threads-base <dir>`: explicit per-command override
//! 2. `WATERCOOLER_THREADS_BASE` env var
//! 3. `threads-base` in `~/.watercooler/config.toml`
//! 4. `~/.watercooler-threads`

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Environment variable naming the threads base directory.
pub const THREADS_BASE_ENV: &str = "WATERCOOLER_THREADS_BASE";

/// watercooler configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Directory holding the `<repo>-threads` collections.
    pub threads_base: Option<PathBuf>,
}

impl Config {
    /// Load config from `~/.watercooler/config.toml`.
    /// A missing file (or home directory) yields the defaults.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.watercooler/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".watercooler").join("config.toml"))
    }
}

/// Resolve the threads base directory from the resolution chain.
pub fn resolve_threads_base(explicit: Option<&Path>, config: &Config) -> Result<PathBuf, String> {
    let from_env = env::var(THREADS_BASE_ENV).ok();
    choose_threads_base(
        explicit,
        from_env.as_deref(),
        config,
        dirs::home_dir().as_deref(),
    )
    .ok_or_else(|| {
        format!("could not determine home directory: pass --threads-base or set {THREADS_BASE_ENV}")
    })
}

/// The first configured source wins. Empty values don't count.
fn choose_threads_base(
    explicit: Option<&Path>,
    from_env: Option<&str>,
    config: &Config,
    home: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = from_env
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }

    if let Some(path) = &config.threads_base
        && !path.as_os_str().is_empty()
    {
        return Some(path.clone());
    }

    home.map(|h| h.join(".watercooler-threads"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn config_with(base: &str) -> Config {
        Config {
            threads_base: Some(PathBuf::from(base)),
        }
    }

    #[test]
    fn explicit_wins() {
        let chosen = choose_threads_base(
            Some(Path::new("/explicit")),
            Some("/env"),
            &config_with("/config"),
            Some(Path::new("/home/me")),
        );
        assert_eq!(chosen, Some(PathBuf::from("/explicit")));
    }

    #[test]
    fn env_beats_config() {
        let chosen = choose_threads_base(
            None,
            Some("/env"),
            &config_with("/config"),
            Some(Path::new("/home/me")),
        );
        assert_eq!(chosen, Some(PathBuf::from("/env")));
    }

    #[test]
    fn empty_env_falls_through_to_config() {
        let chosen = choose_threads_base(
            None,
            Some(""),
            &config_with("/config"),
            Some(Path::new("/home/me")),
        );
        assert_eq!(chosen, Some(PathBuf::from("/config")));
    }

    #[test]
    fn home_default_is_last() {
        let chosen = choose_threads_base(None, None, &Config::default(), Some(Path::new("/home/me")));
        assert_eq!(chosen, Some(PathBuf::from("/home/me/.watercooler-threads")));

        assert_eq!(choose_threads_base(None, None, &Config::default(), None), None);
    }

    #[test]
    fn loads_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "threads-base = \"/srv/threads\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.threads_base, Some(PathBuf::from("/srv/threads")));
    }

    #[test]
    fn missing_config_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.threads_base, None);
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "threads-base = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.starts_with("invalid config at"));
    }
}
