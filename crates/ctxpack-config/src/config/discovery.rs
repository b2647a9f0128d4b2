use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ctxpack_selectors::Exclusions;
use ctxpack_utils::error::{ConfigError, CtxpackError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CONFIG_DIR, CONFIG_FILE, CliArgs, Config, ConfigSource, FileDefaults};

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlConfig {
    pub(crate) defaults: Option<FileDefaults>,
    pub(crate) exclusions: Option<Exclusions>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config file cannot be found,
    /// read, parsed or validated.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, CtxpackError> {
        let start_dir = std::env::current_dir()
            .map_err(|e| ConfigError::DiscoveryFailed {
                reason: format!("cannot determine current directory: {e}"),
            })
            .and_then(|dir| {
                Utf8PathBuf::try_from(dir).map_err(|e| ConfigError::DiscoveryFailed {
                    reason: format!("current directory is not valid UTF-8: {e}"),
                })
            })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// Path-driven variant used by tests to avoid process-global state.
    ///
    /// # Errors
    ///
    /// See [`Config::discover`].
    pub fn discover_from(start_dir: &Utf8Path, cli_args: &CliArgs) -> Result<Self, CtxpackError> {
        let mut config = Self::default();
        let mut source_attribution = HashMap::new();

        for key in [
            "root",
            "output_file",
            "names_file",
            "replay_output_file",
            "decode",
            "verbose",
            "exclusions",
        ] {
            source_attribution.insert(key.to_string(), ConfigSource::Defaults);
        }

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit.to_string(),
                    }
                    .into());
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            tracing::debug!(config = %path, "loading config file");
            let file_config = Self::load_config_file(path)
                .map_err(|e| ConfigError::InvalidFile(format!("{e:#}")))?;
            let source = ConfigSource::ConfigFile(path.clone());

            if let Some(defaults) = file_config.defaults {
                if let Some(root) = defaults.root {
                    config.root = if root.is_absolute() {
                        root
                    } else {
                        project_dir_of(path).join(root)
                    };
                    source_attribution.insert("root".to_string(), source.clone());
                }
                if let Some(name) = defaults.output_file {
                    config.output_file = name;
                    source_attribution.insert("output_file".to_string(), source.clone());
                }
                if let Some(name) = defaults.names_file {
                    config.names_file = name;
                    source_attribution.insert("names_file".to_string(), source.clone());
                }
                if let Some(name) = defaults.replay_output_file {
                    config.replay_output_file = name;
                    source_attribution.insert("replay_output_file".to_string(), source.clone());
                }
                if let Some(decode) = defaults.decode {
                    config.decode = decode;
                    source_attribution.insert("decode".to_string(), source.clone());
                }
                if let Some(verbose) = defaults.verbose {
                    config.verbose = verbose;
                    source_attribution.insert("verbose".to_string(), source.clone());
                }
            }

            if let Some(exclusions) = file_config.exclusions
                && exclusions != Exclusions::default()
            {
                config.exclusions = exclusions;
                source_attribution.insert("exclusions".to_string(), source.clone());
            }
        }

        // Apply CLI overrides (highest precedence)
        if let Some(root) = &cli_args.root {
            config.root = root.clone();
            source_attribution.insert("root".to_string(), ConfigSource::Cli);
        }
        if let Some(decode) = cli_args.decode {
            config.decode = decode;
            source_attribution.insert("decode".to_string(), ConfigSource::Cli);
        }
        if let Some(verbose) = cli_args.verbose {
            config.verbose = verbose;
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }

        config.source_attribution = source_attribution;
        config.config_file = config_path;
        config.validate()?;

        Ok(config)
    }

    /// Search upward from `start_dir` for `.ctxpack/config.toml`
    ///
    /// Stops at the first repository root (`.git`, `.hg`, `.svn`) or at the
    /// filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }

            current_dir = dir.parent();
        }

        None
    }

    /// Load configuration from a TOML file
    pub(crate) fn load_config_file(path: &Utf8Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {path}"))?;
        Ok(config)
    }
}

/// Directory a relative `root` in the config file is resolved against: the
/// directory holding `.ctxpack/`, or the file's own directory otherwise.
fn project_dir_of(config_path: &Utf8Path) -> Utf8PathBuf {
    let parent = config_path.parent().unwrap_or(Utf8Path::new(""));
    let base = if parent.file_name() == Some(CONFIG_DIR) {
        parent.parent().unwrap_or(Utf8Path::new(""))
    } else {
        parent
    };
    if base.as_str().is_empty() {
        Utf8PathBuf::from(".")
    } else {
        base.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxpack_utils::decode::DecodePolicy;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_temp_dir() -> Result<(TempDir, Utf8PathBuf)> {
        let temp_dir = TempDir::new()?;
        let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf())?;
        Ok((temp_dir, path))
    }

    fn write_config(dir: &Utf8Path, content: &str) -> Result<Utf8PathBuf> {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir)?;
        let path = config_dir.join(CONFIG_FILE);
        fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn test_defaults_without_config_file() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        fs::create_dir(dir.join(".git"))?;

        let config = Config::discover_from(&dir, &CliArgs::default())?;

        assert_eq!(config.root, Utf8PathBuf::from("."));
        assert_eq!(config.output_file, "project_context.txt");
        assert_eq!(config.names_file, "file_names.txt");
        assert_eq!(config.replay_output_file, "filtered_project_context.txt");
        assert_eq!(config.decode, DecodePolicy::Drop);
        assert!(config.config_file.is_none());
        assert_eq!(config.source_attribution.get("root"), Some(&ConfigSource::Defaults));
        Ok(())
    }

    #[test]
    fn test_config_file_overrides_defaults() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        fs::create_dir(dir.join(".git"))?;
        let path = write_config(
            &dir,
            r#"
[defaults]
root = "src"
output_file = "context.txt"
decode = "replace"

[exclusions]
extra_dirs = ["target"]
extra_extensions = ["lock"]
"#,
        )?;

        let config = Config::discover_from(&dir, &CliArgs::default())?;

        assert_eq!(config.root, dir.join("src"));
        assert_eq!(config.output_file, "context.txt");
        assert_eq!(config.names_file, "file_names.txt");
        assert_eq!(config.decode, DecodePolicy::Replace);
        assert_eq!(config.exclusions.extra_dirs, vec!["target".to_string()]);
        assert_eq!(config.config_file.as_ref(), Some(&path));
        assert_eq!(
            config.source_attribution.get("output_file"),
            Some(&ConfigSource::ConfigFile(path.clone()))
        );
        assert_eq!(
            config.source_attribution.get("names_file"),
            Some(&ConfigSource::Defaults)
        );
        Ok(())
    }

    #[test]
    fn test_cli_root_beats_config_file() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        fs::create_dir(dir.join(".git"))?;
        write_config(&dir, "[defaults]\nroot = \"src\"\n")?;

        let cli_args = CliArgs {
            root: Some(Utf8PathBuf::from("elsewhere")),
            ..CliArgs::default()
        };
        let config = Config::discover_from(&dir, &cli_args)?;

        assert_eq!(config.root, Utf8PathBuf::from("elsewhere"));
        assert_eq!(config.source_attribution.get("root"), Some(&ConfigSource::Cli));
        Ok(())
    }

    #[test]
    fn test_discovery_searches_upward() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        fs::create_dir(dir.join(".git"))?;
        let path = write_config(&dir, "")?;
        let nested = dir.join("a").join("b");
        fs::create_dir_all(&nested)?;

        assert_eq!(Config::discover_config_file_from(&nested), Some(path));
        Ok(())
    }

    #[test]
    fn test_discovery_stops_at_repository_root() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        write_config(&dir, "")?;
        let repo = dir.join("repo");
        fs::create_dir_all(repo.join(".git"))?;

        assert_eq!(Config::discover_config_file_from(&repo), None);
        Ok(())
    }

    #[test]
    fn test_explicit_missing_config_is_not_found() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        let cli_args = CliArgs {
            config_path: Some(dir.join("nope.toml")),
            ..CliArgs::default()
        };

        let err = Config::discover_from(&dir, &cli_args).unwrap_err();
        assert!(matches!(
            err,
            CtxpackError::Config(ConfigError::NotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_explicit_config_outside_ctxpack_dir() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        let path = dir.join("custom.toml");
        fs::write(&path, "[defaults]\nroot = \"proj\"\n")?;
        let cli_args = CliArgs {
            config_path: Some(path),
            ..CliArgs::default()
        };

        let config = Config::discover_from(&dir, &cli_args)?;
        assert_eq!(config.root, dir.join("proj"));
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_invalid_file() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        fs::create_dir(dir.join(".git"))?;
        write_config(&dir, "[defaults]\nmodel = \"x\"\n")?;

        let err = Config::discover_from(&dir, &CliArgs::default()).unwrap_err();
        assert!(matches!(err, CtxpackError::Config(ConfigError::InvalidFile(_))));
        Ok(())
    }

    #[test]
    fn test_malformed_toml_is_invalid_file() -> Result<()> {
        let (_temp_dir, dir) = utf8_temp_dir()?;
        fs::create_dir(dir.join(".git"))?;
        write_config(&dir, "[defaults\nroot = ")?;

        let err = Config::discover_from(&dir, &CliArgs::default()).unwrap_err();
        assert_eq!(err.to_exit_code().as_i32(), 2);
        Ok(())
    }

    #[test]
    fn test_project_dir_of() {
        assert_eq!(
            project_dir_of(Utf8Path::new("/p/.ctxpack/config.toml")),
            Utf8PathBuf::from("/p")
        );
        assert_eq!(
            project_dir_of(Utf8Path::new(".ctxpack/config.toml")),
            Utf8PathBuf::from(".")
        );
        assert_eq!(
            project_dir_of(Utf8Path::new("conf/x.toml")),
            Utf8PathBuf::from("conf")
        );
    }
}
