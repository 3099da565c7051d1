use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use kotoba_config::Config;
use serde::{Deserialize, Serialize};

const REPO_DEFAULT_CONFIG: &str = "config.json";

/// Represents a named profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// A profile file is either a named profile or a bare config
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileFile {
    Named(Profile),
    Bare(Config),
}

/// Where the loaded config came from, for the startup log
#[derive(Debug, PartialEq)]
pub enum ConfigSource {
    Profile { name: String, path: PathBuf },
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Profile { name, path } => {
                write!(f, "profile '{}' from {}", name, path.display())
            }
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

fn read_profile(path: &Path) -> anyhow::Result<(Config, ConfigSource)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let file: ProfileFile = serde_json::from_reader(reader)?;

    Ok(match file {
        ProfileFile::Named(profile) => (
            profile.value,
            ConfigSource::Profile {
                name: profile.name,
                path: path.to_path_buf(),
            },
        ),
        ProfileFile::Bare(config) => (config, ConfigSource::File(path.to_path_buf())),
    })
}

/// Explicit profile, else `./config.json` if present, else defaults.
/// Environment overrides are applied last.
///
/// Runs before tracing is up, so the source is returned for the caller to log.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, ConfigSource)> {
    let (mut config, source) = match path {
        Some(path) => read_profile(path)?,
        None => {
            let repo_default = Path::new(REPO_DEFAULT_CONFIG);
            if repo_default.exists() {
                read_profile(repo_default)?
            } else {
                (Config::new(), ConfigSource::Defaults)
            }
        }
    };

    config.apply_env();
    Ok((config, source))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn reads_named_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.json");
        fs::write(
            &path,
            r#"{ "name": "main", "value": { "dictionary": { "timeout_secs": 5 } } }"#,
        )
        .unwrap();

        let (config, source) = load_config(Some(&path)).unwrap();

        assert_eq!(config.dictionary.timeout_secs, 5);
        assert_eq!(config.storage.database, "kotoba");
        assert_eq!(
            source,
            ConfigSource::Profile {
                name: "main".to_string(),
                path: path.clone(),
            }
        );
        assert_eq!(source.to_string(), format!("profile 'main' from {}", path.display()));
    }

    #[test]
    fn reads_bare_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "watchdog": { "enabled": false } }"#).unwrap();

        let (config, source) = read_profile(&path).unwrap();

        assert_eq!(source, ConfigSource::File(path));
        assert!(!config.watchdog.enabled);
        assert_eq!(config.translator.enrich_limit, 3);
    }

    #[test]
    fn missing_explicit_profile_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.json"))).is_err());
    }
}
