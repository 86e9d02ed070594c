//! `ved.toml` loading.
//!
//! Discovery prefers a `ved.toml` in the working directory, then the
//! platform config dir. Unknown fields are tolerated and a file that does
//! not parse falls back to defaults so a typo never blocks startup.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use core_editor::Options;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tabwidth")]
    pub tabwidth: usize,
    #[serde(default)]
    pub expandtab: bool,
    #[serde(default)]
    pub autoindent: bool,
}

impl EditorConfig {
    const fn default_tabwidth() -> usize {
        8
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tabwidth: Self::default_tabwidth(),
            expandtab: false,
            autoindent: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Insert-mode idle seconds before an automatic undo snapshot.
    #[serde(default = "InputConfig::default_idle_timeout", rename = "idle-timeout")]
    pub idle_timeout: u64,
}

impl InputConfig {
    const fn default_idle_timeout() -> u64 {
        3
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Self::default_idle_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub input: InputConfig,
}

pub fn discover() -> PathBuf {
    let local = PathBuf::from("ved.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ved").join("ved.toml");
    }
    PathBuf::from("ved.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<ConfigFile> {
    let path = path.unwrap_or_else(discover);
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Ok(file),
            Err(err) => {
                warn!(target: "config", file = %path.display(), %err, "parse_failed_using_defaults");
                Ok(ConfigFile::default())
            }
        },
        Err(_) => Ok(ConfigFile::default()),
    }
}

pub fn to_options(file: &ConfigFile) -> Options {
    Options {
        tabwidth: file.editor.tabwidth.clamp(1, 8),
        expandtab: file.editor.expandtab,
        autoindent: file.editor.autoindent,
        insert_idle: Duration::from_secs(file.input.idle_timeout.max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing() {
        let cfg = load_from(Some(PathBuf::from("__no_such_ved_config__.toml"))).unwrap();
        assert_eq!(cfg.editor.tabwidth, 8);
        assert!(!cfg.editor.expandtab);
        assert_eq!(cfg.input.idle_timeout, 3);
    }

    #[test]
    fn parses_options() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[editor]\ntabwidth = 4\nexpandtab = true\n[input]\nidle-timeout = 5\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.editor.tabwidth, 4);
        assert!(cfg.editor.expandtab);
        let opts = to_options(&cfg);
        assert_eq!(opts.insert_idle.as_secs(), 5);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor\ntabwidth = oops").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.editor.tabwidth, 8);
    }
}
