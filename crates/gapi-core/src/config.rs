use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const KEY_PATH_ENV: &str = "GAPI_KEY_PATH";
const PROJECT_ID_ENV: &str = "GAPI_PROJECT_ID";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service-account key and the project it must belong to
    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub sheets: SheetsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Path to the service-account JSON key file
    #[serde(default)]
    pub key_path: String,

    /// Expected `project_id` of the key file
    #[serde(default)]
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// IANA zone attached to event start and end times
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    #[serde(default = "default_calendar_scopes")]
    pub scopes: Vec<String>,
}

fn default_time_zone() -> String {
    "Europe/Amsterdam".to_string()
}

fn default_calendar_scopes() -> Vec<String> {
    vec![gapi_auth::CALENDAR_SCOPE.to_string()]
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            scopes: default_calendar_scopes(),
        }
    }
}

impl CalendarConfig {
    /// Parsed [`Self::time_zone`].
    ///
    /// # Errors
    /// Fails when the name is not an IANA zone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone(self.time_zone.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default = "default_sheets_scopes")]
    pub scopes: Vec<String>,

    /// Spreadsheet read by the `gapi` binary, if any
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
}

fn default_sheets_scopes() -> Vec<String> {
    vec![gapi_auth::SPREADSHEETS_READONLY_SCOPE.to_string()]
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            scopes: default_sheets_scopes(),
            spreadsheet_id: None,
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist.
    /// `GAPI_KEY_PATH` and `GAPI_PROJECT_ID` take precedence over the file.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default configuration to {}", config_path.display());
            config
        };

        config.apply_overrides(
            std::env::var(KEY_PATH_ENV).ok(),
            std::env::var(PROJECT_ID_ENV).ok(),
        );
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Replace credential settings with any non-empty override.
    pub fn apply_overrides(&mut self, key_path: Option<String>, project_id: Option<String>) {
        if let Some(key_path) = key_path.filter(|v| !v.is_empty()) {
            self.credentials.key_path = key_path;
        }
        if let Some(project_id) = project_id.filter(|v| !v.is_empty()) {
            self.credentials.project_id = project_id;
        }
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings
    /// are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.credentials.key_path.is_empty() {
            result.add_error(
                "credentials.key_path",
                format!("Path to the service-account key is required (or set {})", KEY_PATH_ENV),
            );
        } else if !Path::new(&self.credentials.key_path).is_file() {
            result.add_warning(
                "credentials.key_path",
                format!("File does not exist: {}", self.credentials.key_path),
            );
        }

        if self.credentials.project_id.is_empty() {
            result.add_error(
                "credentials.project_id",
                format!("Project id is required (or set {})", PROJECT_ID_ENV),
            );
        }

        if let Err(e) = self.calendar.tz() {
            result.add_error("calendar.time_zone", e.to_string());
        }

        if self.calendar.scopes.is_empty() {
            result.add_warning("calendar.scopes", "No scopes - calendar requests will be rejected");
        }
        if self.sheets.scopes.is_empty() {
            result.add_warning("sheets.scopes", "No scopes - sheets requests will be rejected");
        }

        if let Some(id) = &self.sheets.spreadsheet_id {
            if id.trim().is_empty() {
                result.add_error("sheets.spreadsheet_id", "Spreadsheet id cannot be blank");
            }
        }

        result
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)?;

        std::fs::write(config_path, contents).map_err(|source| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("gapi").join("config.toml"))
    }
}
