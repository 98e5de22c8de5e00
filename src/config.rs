use crate::options::Options;
use crate::theme::StyleOverrides;
use crate::util::{LoadError, SaveError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Default options when no options file is present
    #[serde(default)]
    pub(crate) options: Options,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    /// Adjustments to the styles of the selected theme
    #[serde(default)]
    pub(crate) styles: StyleOverrides,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("hurdlesnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the directory in which high scores, the save slot, and
    /// options are stored: the directory given in the configuration or, if
    /// that is not set, the default local data directory.  Returns `None` if
    /// neither is available.
    pub(crate) fn data_dir(&self) -> Option<PathBuf> {
        self.files
            .data_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|p| p.join("hurdlesnake")))
    }

    pub(crate) fn high_scores_file(&self) -> Option<PathBuf> {
        self.data_dir().map(|p| p.join("highscores.json"))
    }

    pub(crate) fn save_file(&self) -> Option<PathBuf> {
        self.data_dir().map(|p| p.join("savegame.toml"))
    }

    fn options_file(&self) -> Option<PathBuf> {
        self.data_dir().map(|p| p.join("options.json"))
    }

    /// Does the save slot currently hold a game?
    pub(crate) fn has_saved_game(&self) -> bool {
        self.save_file().is_some_and(|p| p.exists())
    }

    /// Load gameplay options from a file.  If the file does not exist,
    /// `self.options` is returned.
    ///
    /// If `self.files.save_options` is `false`, `self.options` is returned
    /// without reading anything from disk.
    pub(crate) fn load_options(&self) -> Result<Options, LoadError> {
        let r = if !self.files.save_options {
            Ok(None)
        } else if let Some(p) = self.options_file() {
            Options::load(&p)
        } else {
            Err(LoadError::no_path("options"))
        };
        match r {
            Ok(Some(opts)) => Ok(opts),
            Ok(None) => Ok(self.options),
            Err(e) => Err(e),
        }
    }

    /// Save the given gameplay options to a file.
    ///
    /// If `self.files.save_options` is `false`, nothing is saved.
    pub(crate) fn save_options(&self, options: Options) -> Result<(), SaveError> {
        if !self.files.save_options {
            return Ok(());
        }
        if let Some(p) = self.options_file() {
            options.save(&p)
        } else {
            Err(SaveError::no_path("options"))
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Directory in which to store high scores, the save slot, and options
    pub(crate) data_dir: Option<PathBuf>,

    /// Whether to load & save gameplay options in a file
    pub(crate) save_options: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            data_dir: None,
            save_options: true,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
