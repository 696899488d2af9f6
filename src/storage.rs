use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const THEME_KEY: &str = "theme";
pub const SAVED_EMAIL_KEY: &str = "savedEmail";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("unknown theme '{s}' (expected light or dark)")),
        }
    }
}

#[derive(Debug)]
pub enum StorageError {
    EmptyInput,
    Io(std::io::Error),
    Corrupt(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::EmptyInput => write!(f, "Please enter an email thread first"),
            StorageError::Io(e) => write!(f, "Storage error: {e}"),
            StorageError::Corrupt(msg) => write!(f, "Storage file is not readable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// A small persistent string map kept in one JSON file. Every write replaces the
/// whole file.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl LocalStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt(e.to_string()))?
            }
        } else {
            BTreeMap::new()
        };

        log::debug!("opened {} with {} keys", path.display(), values.len());
        Ok(LocalStore { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Memory only changes once the new contents are on disk.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)?;
        self.values = values;
        Ok(())
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(values)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let staging = self.path.with_extension("tmp");
        fs::write(&staging, contents)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// Blank threads are refused and leave the store untouched.
    pub fn save_email(&mut self, email_thread: &str) -> Result<(), StorageError> {
        if email_thread.trim().is_empty() {
            return Err(StorageError::EmptyInput);
        }
        self.set(SAVED_EMAIL_KEY, email_thread)
    }

    pub fn saved_email(&self) -> Option<&str> {
        self.get(SAVED_EMAIL_KEY).filter(|x| !x.is_empty())
    }

    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY)
            .and_then(|x| x.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.set(THEME_KEY, theme.as_str())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, StorageError> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}
