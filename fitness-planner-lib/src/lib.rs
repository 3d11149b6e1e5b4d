// src/lib.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

// --- Declare modules ---
mod config;
pub mod form;
pub mod logging;
pub mod planner;
pub mod toast;
pub mod workflow;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, ApiConfig, Config, ConfigError, StandardColor, Theme,
    DEFAULT_BASE_URL, DEFAULT_USER,
};
pub use form::{
    ExerciseFrequency, FieldError, FitnessLevel, FormField, FormInput, FormValues, Gender,
    ValidationErrors, MAX_AGE, MIN_AGE,
};
pub use planner::{
    ForeignSubmission, LastOutcome, PendingSubmission, PlannerForm, SettledSubmission,
    SubmissionGate, SubmissionPhase, SubmitBlocked, ERROR_TOAST_MESSAGE, ERROR_TOAST_TITLE,
};
pub use toast::{Toast, ToastConfig, ToastKind, ToastQueue};
pub use workflow::{PlanError, WorkflowApi, WorkflowClient};

pub struct PlannerService {
    pub config: Config,
    pub config_path: PathBuf,
}

impl PlannerService {
    /// Initializes the planner service from the config file.
    /// # Errors
    /// Returns `anyhow::Error` if the config path cannot be determined or the file cannot be loaded.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the workflow API base URL.
    /// # Errors
    /// - `ConfigError::InvalidBaseUrl` if the URL is not http(s).
    /// - `ConfigError` variants if saving fails.
    pub fn set_base_url(&mut self, url: &str) -> Result<(), ConfigError> {
        let trimmed = url.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(trimmed.to_string()));
        }
        self.config.api.base_url = trimmed.trim_end_matches('/').to_string();
        self.save_config()
    }

    /// Stores the API key, or removes it with `None`.
    /// # Errors
    /// - `ConfigError::EmptyApiKey` if a blank key is given.
    /// - `ConfigError` variants if saving fails.
    pub fn set_api_key(&mut self, key: Option<&str>) -> Result<(), ConfigError> {
        let key = match key.map(str::trim) {
            Some("") => return Err(ConfigError::EmptyApiKey),
            other => other.map(str::to_string),
        };
        self.config.api.api_key = key;
        self.save_config()
    }

    /// The API settings in effect right now: the file values with
    /// environment overrides applied.
    pub fn api_config(&self) -> ApiConfig {
        self.config.api.clone().with_env_overrides()
    }

    pub fn workflow_client(&self) -> WorkflowClient {
        WorkflowClient::new(&self.api_config())
    }

    /// A freshly mounted form with default values.
    pub fn new_form(&self) -> PlannerForm {
        PlannerForm::new(self.config.toasts)
    }
}
