//! Configuration management for the cesantías agent.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Config files (.cesantias/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default minimum number of digits for a number to count as a document id.
pub const DEFAULT_MIN_DOCUMENT_DIGITS: usize = 4;

/// Default maximum accepted question length, in characters.
pub const DEFAULT_MAX_QUESTION_CHARS: usize = 2000;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .cesantias/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Severance dataset (CSV); relative paths resolve against the workspace
    pub data_file: Option<PathBuf>,

    /// CSV delimiter; auto-detected from the header line when unset
    pub delimiter: Option<char>,

    /// Optional YAML file replacing the built-in knowledge corpus
    pub knowledge_file: Option<PathBuf>,

    /// Minimum digit count for a number to be read as a document identifier
    pub min_document_digits: usize,

    /// Questions longer than this are rejected
    pub max_question_chars: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    workspace: Option<WorkspaceSection>,
    data: Option<DataSection>,
    classifier: Option<ClassifierSection>,
    knowledge: Option<KnowledgeSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DataSection {
    path: Option<String>,
    delimiter: Option<char>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifierSection {
    min_document_digits: Option<usize>,
    max_question_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KnowledgeSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            data_file: None,
            delimiter: None,
            knowledge_file: None,
            min_document_digits: DEFAULT_MIN_DOCUMENT_DIGITS,
            max_question_chars: DEFAULT_MAX_QUESTION_CHARS,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// `workspace` and `config_file` come from the command line (clap already
    /// falls back to `CESANTIAS_WORKSPACE` / `CESANTIAS_CONFIG`). They are
    /// applied first because they decide which YAML file is read. Resolution
    /// order for everything else is defaults, then YAML, then environment;
    /// remaining CLI flags go through [`AppConfig::with_overrides`].
    ///
    /// Environment variables:
    /// - `CESANTIAS_WORKSPACE`: Override workspace path
    /// - `CESANTIAS_CONFIG`: Path to config file
    /// - `CESANTIAS_DATA`: Severance dataset path
    /// - `CESANTIAS_KNOWLEDGE`: Knowledge corpus path
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use cesantias_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None, None).expect("Failed to load config");
    /// println!("Data file: {:?}", config.resolved_data_file());
    /// ```
    pub fn load(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        Self::load_with_env(workspace, config_file, |key| std::env::var(key).ok())
    }

    /// [`AppConfig::load`] with an explicit environment lookup.
    pub fn load_with_env<F>(
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        env: F,
    ) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env("CESANTIAS_WORKSPACE").map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file = config_file.or_else(|| env("CESANTIAS_CONFIG").map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        match config.config_file.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let default_path = config.config_dir().join("config.yaml");
                if default_path.exists() {
                    config = config.merge_yaml(&default_path)?;
                }
            }
        }

        // Environment variables override YAML config
        if let Some(data) = env("CESANTIAS_DATA") {
            config.data_file = Some(PathBuf::from(data));
        }

        if let Some(knowledge) = env("CESANTIAS_KNOWLEDGE") {
            config.knowledge_file = Some(PathBuf::from(knowledge));
        }

        if let Some(level) = env("RUST_LOG") {
            config.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(data) = config_file.data {
            if let Some(path) = data.path {
                result.data_file = Some(PathBuf::from(path));
            }
            if data.delimiter.is_some() {
                result.delimiter = data.delimiter;
            }
        }

        if let Some(classifier) = config_file.classifier {
            if let Some(digits) = classifier.min_document_digits {
                result.min_document_digits = digits;
            }
            if let Some(max_chars) = classifier.max_question_chars {
                result.max_question_chars = max_chars;
            }
        }

        if let Some(path) = config_file.knowledge.and_then(|k| k.path) {
            result.knowledge_file = Some(PathBuf::from(path));
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        data_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(data_file) = data_file {
            self.data_file = Some(data_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .cesantias directory.
    pub fn config_dir(&self) -> PathBuf {
        self.workspace.join(".cesantias")
    }

    /// Dataset path, resolved against the workspace.
    pub fn resolved_data_file(&self) -> PathBuf {
        match &self.data_file {
            Some(path) => self.resolve(path),
            None => self.workspace.join("data").join("cesantias.csv"),
        }
    }

    /// Knowledge corpus path, resolved against the workspace.
    pub fn resolved_knowledge_file(&self) -> Option<PathBuf> {
        self.knowledge_file.as_ref().map(|path| self.resolve(path))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=20).contains(&self.min_document_digits) {
            return Err(AppError::Config(format!(
                "minDocumentDigits must be between 1 and 20, got {}",
                self.min_document_digits
            )));
        }

        if self.max_question_chars == 0 {
            return Err(AppError::Config(
                "maxQuestionChars must be greater than zero".to_string(),
            ));
        }

        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() || delimiter.is_ascii_alphanumeric() || delimiter == '"' {
                return Err(AppError::Config(format!(
                    "Unsupported CSV delimiter: {:?}",
                    delimiter
                )));
            }
        }

        Ok(())
    }
}
