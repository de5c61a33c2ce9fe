//! Directory settings.
//!
//! # Responsibility
//! - Provide process-wide search settings (page size, activity depth).
//! - Load them from defaults, JSON and environment overrides.
//!
//! # Invariants
//! - Validated settings always have `page_size >= 1` and
//!   `activity_depth >= 1`.
//! - Settings are passed to services explicitly; there is no global copy.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_ACTIVITY_DEPTH: u32 = 2;

pub const ENV_PAGE_SIZE: &str = "DIRECTORY_PAGE_SIZE";
pub const ENV_ACTIVITY_DEPTH: &str = "DIRECTORY_ACTIVITY_DEPTH";
pub const ENV_DB_PATH: &str = "DIRECTORY_DB_PATH";

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Settings load or validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A key holds a value outside its allowed range or format.
    InvalidValue { key: &'static str, value: String },
    /// Settings document is not valid JSON for [`DirectorySettings`].
    Parse(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for setting `{key}`")
            }
            Self::Parse(message) => write!(f, "invalid settings document: {message}"),
        }
    }
}

impl Error for SettingsError {}

/// Search settings shared by every request of one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// Companies returned per search page.
    pub page_size: u32,
    /// Levels below the requested activity included by child search.
    pub activity_depth: u32,
    /// SQLite file; `None` means the caller picks (e.g. in-memory).
    pub database_path: Option<PathBuf>,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            activity_depth: DEFAULT_ACTIVITY_DEPTH,
            database_path: None,
        }
    }
}

impl DirectorySettings {
    /// Defaults with process environment overrides applied.
    pub fn from_env() -> SettingsResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Parses a JSON settings document; absent keys keep defaults.
    pub fn from_json_str(document: &str) -> SettingsResult<Self> {
        let settings: Self =
            serde_json::from_str(document).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Applies `DIRECTORY_*` environment variables on top of `self`.
    pub fn with_env_overrides(self) -> SettingsResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides resolved by `lookup` on top of `self`.
    ///
    /// Blank values are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> SettingsResult<Self> {
        let resolve = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = resolve(ENV_PAGE_SIZE) {
            self.page_size = parse_positive(ENV_PAGE_SIZE, &value)?;
        }
        if let Some(value) = resolve(ENV_ACTIVITY_DEPTH) {
            self.activity_depth = parse_positive(ENV_ACTIVITY_DEPTH, &value)?;
        }
        if let Some(value) = resolve(ENV_DB_PATH) {
            self.database_path = Some(PathBuf::from(value.trim()));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_activity_depth(mut self, activity_depth: u32) -> Self {
        self.activity_depth = activity_depth;
        self
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Rejects zero page size and zero activity depth.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.page_size == 0 {
            return Err(SettingsError::InvalidValue {
                key: "page_size",
                value: self.page_size.to_string(),
            });
        }
        if self.activity_depth == 0 {
            return Err(SettingsError::InvalidValue {
                key: "activity_depth",
                value: self.activity_depth.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_positive(key: &'static str, value: &str) -> SettingsResult<u32> {
    match value.trim().parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(SettingsError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
