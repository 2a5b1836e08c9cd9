//! Finding and loading the TOML configuration.
//!
//! svgtex is usually run on drawings kept together in one directory, often by
//! an editor extension that cannot pass extra flags. Besides `--config`, a
//! configuration is therefore picked up from `SVGTEX_CONFIG`, from a
//! `.svgtex.toml` next to the drawings, and from the user's config directory.

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use svgtex::{SvgTexError, config::AppConfig};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "SVGTEX_CONFIG";

/// File name of a configuration kept next to the drawings.
pub const DOCUMENT_CONFIG: &str = ".svgtex.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration {source_kind} `{}`: {message}", path.display())]
    Parse {
        source_kind: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("Configuration file from {source_kind} does not exist: {}", path.display())]
    MissingFile {
        source_kind: &'static str,
        path: PathBuf,
    },
}

impl From<ConfigError> for SvgTexError {
    fn from(err: ConfigError) -> Self {
        SvgTexError::Config(err.to_string())
    }
}

/// Where the configuration of a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config`
    Argument(PathBuf),
    /// `SVGTEX_CONFIG`
    Environment(PathBuf),
    /// `.svgtex.toml` in the directory of the first input
    Document(PathBuf),
    /// `config.toml` in the user's config directory
    User(PathBuf),
    Builtin,
}

impl ConfigSource {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::Argument(path)
            | Self::Environment(path)
            | Self::Document(path)
            | Self::User(path) => Some(path),
            Self::Builtin => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Argument(_) => "--config",
            Self::Environment(_) => CONFIG_ENV,
            Self::Document(_) => "the document directory",
            Self::User(_) => "the user config directory",
            Self::Builtin => "built-in defaults",
        }
    }

    /// Named sources must exist; discovered ones are only used when they do.
    fn is_required(&self) -> bool {
        matches!(self, Self::Argument(_) | Self::Environment(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{} ({})", self.kind(), path.display()),
            None => f.write_str(self.kind()),
        }
    }
}

/// The places a configuration may come from, most specific first.
#[derive(Debug, Clone, Default)]
pub struct ConfigSearch {
    argument: Option<PathBuf>,
    environment: Option<PathBuf>,
    document_dir: Option<PathBuf>,
    user_dir: Option<PathBuf>,
}

impl ConfigSearch {
    /// Searches the way a CLI run does: `--config`, then `SVGTEX_CONFIG`,
    /// then the directory of the first input, then the user config directory.
    pub fn for_run(argument: Option<&Path>, inputs: &[PathBuf]) -> Self {
        let document_dir = inputs
            .first()
            .and_then(|input| input.parent())
            .map(|dir| if dir.as_os_str().is_empty() { Path::new(".") } else { dir })
            .map(Path::to_path_buf);

        Self {
            argument: argument.map(Path::to_path_buf),
            environment: env::var_os(CONFIG_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            document_dir,
            user_dir: ProjectDirs::from("", "", "svgtex").map(|dirs| dirs.config_dir().to_path_buf()),
        }
    }

    pub fn with_argument(mut self, path: impl Into<PathBuf>) -> Self {
        self.argument = Some(path.into());
        self
    }

    pub fn with_environment(mut self, path: impl Into<PathBuf>) -> Self {
        self.environment = Some(path.into());
        self
    }

    pub fn with_document_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.document_dir = Some(dir.into());
        self
    }

    pub fn with_user_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(dir.into());
        self
    }

    /// Returns the first source that applies.
    pub fn source(&self) -> ConfigSource {
        if let Some(path) = &self.argument {
            return ConfigSource::Argument(path.clone());
        }
        if let Some(path) = &self.environment {
            return ConfigSource::Environment(path.clone());
        }

        let discovered = [
            self.document_dir
                .as_ref()
                .map(|dir| ConfigSource::Document(dir.join(DOCUMENT_CONFIG))),
            self.user_dir
                .as_ref()
                .map(|dir| ConfigSource::User(dir.join("config.toml"))),
        ];
        discovered
            .into_iter()
            .flatten()
            .find(|source| {
                let found = source.path().is_some_and(Path::is_file);
                debug!(source:% = source, found; "Looking for configuration");
                found
            })
            .unwrap_or(ConfigSource::Builtin)
    }

    /// Loads the configuration from the first source that applies.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` or `SVGTEX_CONFIG` names a missing file,
    /// or if the chosen file cannot be read or parsed.
    pub fn load(&self) -> Result<AppConfig, SvgTexError> {
        let source = self.source();
        info!(source:% = source; "Using configuration");

        let Some(path) = source.path() else {
            return Ok(AppConfig::default());
        };
        if source.is_required() && !path.is_file() {
            return Err(ConfigError::MissingFile {
                source_kind: source.kind(),
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|err| ConfigError::Parse {
            source_kind: source.kind(),
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(config)
    }
}
