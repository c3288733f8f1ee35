use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub fallback_editor: Option<String>,
    pub line_offset: Option<i64>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Loads `path`, or the default location when `None`. The default file is
    /// created from the bundled config on first run.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load(&path),
            None => {
                let path = get_config_path()?;
                if !path.is_file() {
                    fs::write(&path, DEFAULT_CONFIG)
                        .with_context(|| format!("Fail to write file `{}`", path.display()))?;
                    return Self::bundled();
                }
                Self::load(&path)
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("Fail to open file `{}`", path.display()))?;
        serde_yaml_ng::from_reader(file)
            .with_context(|| format!("Fail to deserialize file `{}`", path.display()))
    }

    fn bundled() -> Result<Self> {
        serde_yaml_ng::from_str(DEFAULT_CONFIG).context("Fail to parse bundled config")
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let dir = get_project_dir()?.config_dir().to_owned();
    if !dir.is_dir() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Fail to create directory `{}`", dir.display()))?;
    }

    Ok(dir.join("config.yaml"))
}

pub fn get_project_dir() -> Result<ProjectDirs> {
    ProjectDirs::from("io.github", "", env!("CARGO_PKG_NAME"))
        .ok_or_else(|| anyhow!("Fail to get project directory"))
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_config_bundled() {
        let config = Config::bundled().unwrap();
        assert_eq!(config.fallback_editor, Some("vi".to_owned()));
        assert_eq!(config.line_offset, Some(0));
        assert_eq!(config.log_file, None);
        assert_eq!(config.log_level, Some("warn".to_owned()));
    }

    #[test]
    fn test_config_existing_file() {
        let temp = TempDir::new().unwrap();

        let cfg_path = temp.path().join("config.yaml");
        let custom_config = r#"
fallback-editor: nano
line-offset: 12
log-file: /tmp/log.log
log-level: "debug"
"#;
        fs::write(&cfg_path, custom_config).unwrap();

        let config = Config::new(Some(cfg_path)).unwrap();
        assert_eq!(config.fallback_editor, Some("nano".to_owned()));
        assert_eq!(config.line_offset, Some(12));
        assert_eq!(config.log_file, Some("/tmp/log.log".to_owned()));
        assert_eq!(config.log_level, Some("debug".to_owned()));

        temp.close().unwrap();
    }

    #[test]
    fn test_config_partial_file() {
        let temp = TempDir::new().unwrap();

        let cfg_path = temp.path().join("config.yaml");
        fs::write(&cfg_path, "fallback-editor: ed\n").unwrap();

        let config = Config::load(&cfg_path).unwrap();
        assert_eq!(config.fallback_editor, Some("ed".to_owned()));
        assert_eq!(config.line_offset, None);

        temp.close().unwrap();
    }

    #[test]
    fn test_config_ser_error() {
        let temp = TempDir::new().unwrap();

        let cfg_path = temp.path().join("config.yaml");
        let bad_config = r#"
fallback-editor: nano
line-offset: ["twelve"]
"#;
        fs::write(&cfg_path, bad_config).unwrap();

        let result = Config::load(&cfg_path);
        assert!(result.is_err(), "expected error, got {:?}", result);

        let err_msg = result.unwrap_err().to_string();
        assert!(
            err_msg.contains("Fail to deserialize file"),
            "expected contains `Fail to deserialize file`, but got {}",
            err_msg
        );

        temp.close().unwrap();
    }

    #[test]
    fn test_config_missing_file() {
        let result = Config::new(Some(PathBuf::from("/definitely/not/here/config.yaml")));
        assert!(result.unwrap_err().to_string().contains("Fail to open file"));
    }
}
