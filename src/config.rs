//! Layered configuration for floorwatch.
//!
//! Settings are read from `.floorwatch/floorwatch.toml` and can be overridden
//! by environment variables and then by CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! permissive_cors = true
//!
//! [data]
//! path = "data/factory.csv"
//!
//! [bot]
//! production_target = 600.0
//! answer_url = "http://localhost:9000/answer"
//! answer_timeout_secs = 10
//!
//! [logging]
//! format = "compact"
//! directory = ".floorwatch/logs"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_DIR: &str = ".floorwatch";
pub const CONFIG_FILE: &str = "floorwatch.toml";

pub const ENV_DATA_PATH: &str = "FLOORWATCH_DATA_PATH";
pub const ENV_PORT: &str = "FLOORWATCH_PORT";
pub const ENV_ANSWER_URL: &str = "FLOORWATCH_ANSWER_URL";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format '{}'. Valid values: compact, json", s),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allow any origin, method and header (the dashboard is served separately)
    #[serde(default = "default_permissive_cors")]
    pub permissive_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_permissive_cors() -> bool {
    true
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            permissive_cors: default_permissive_cors(),
        }
    }
}

/// Location of the factory dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/factory.csv")
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

/// Chatbot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSection {
    /// Production volume the bot compares the current average against
    #[serde(default = "default_production_target")]
    pub production_target: f64,
    /// Optional remote question-answering service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_url: Option<String>,
    #[serde(default = "default_answer_timeout_secs")]
    pub answer_timeout_secs: u64,
}

fn default_production_target() -> f64 {
    600.0
}

fn default_answer_timeout_secs() -> u64 {
    10
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            production_target: default_production_target(),
            answer_url: None,
            answer_timeout_secs: default_answer_timeout_secs(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// The complete floorwatch.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub bot: BotSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl FloorToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse floorwatch.toml")
    }

    /// Load `floorwatch.toml` from `config_dir`, or defaults if it doesn't exist.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize floorwatch.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Data path, with the environment taking precedence over the file.
    pub fn data_path(&self) -> PathBuf {
        std::env::var(ENV_DATA_PATH)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data.path.clone())
    }

    /// Listen port, with the environment taking precedence over the file.
    pub fn port(&self) -> u16 {
        std::env::var(ENV_PORT)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(self.server.port)
    }

    /// Remote answer provider URL, with the environment taking precedence.
    pub fn answer_url(&self) -> Option<String> {
        std::env::var(ENV_ANSWER_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.bot.answer_url.clone())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; an ephemeral port will be chosen".to_string());
        }
        if self.data.path.as_os_str().is_empty() {
            warnings.push("data.path is empty; fallback data will always be served".to_string());
        }
        if !(self.bot.production_target > 0.0) {
            warnings.push(format!(
                "bot.production_target should be positive, got {}",
                self.bot.production_target
            ));
        }
        if self.bot.answer_timeout_secs == 0 {
            warnings.push("bot.answer_timeout_secs is 0; remote answers will always time out".to_string());
        }
        if let Some(url) = &self.bot.answer_url
            && !is_http_url(url)
        {
            warnings.push(format!(
                "Invalid bot.answer_url '{}': must start with http:// or https://",
                url
            ));
        }
        if let Ok(url) = std::env::var(ENV_ANSWER_URL)
            && !url.trim().is_empty()
            && !is_http_url(url.trim())
        {
            warnings.push(format!(
                "Invalid {} '{}': must start with http:// or https://",
                ENV_ANSWER_URL, url
            ));
        }

        warnings
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Runtime configuration: floorwatch.toml merged with environment and CLI.
#[derive(Debug, Clone)]
pub struct FloorConfig {
    pub project_dir: PathBuf,
    pub config_dir: PathBuf,
    pub toml: FloorToml,
    pub cli_host: Option<String>,
    pub cli_port: Option<u16>,
    pub cli_data_path: Option<PathBuf>,
    pub cli_no_cors: bool,
}

impl FloorConfig {
    /// Create a new FloorConfig from a project directory.
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let config_dir = project_dir.join(CONFIG_DIR);
        let toml = FloorToml::load_or_default(&config_dir)?;

        Ok(Self {
            project_dir,
            config_dir,
            toml,
            cli_host: None,
            cli_port: None,
            cli_data_path: None,
            cli_no_cors: false,
        })
    }

    /// Create FloorConfig with CLI overrides.
    pub fn with_cli_args(
        project_dir: PathBuf,
        host: Option<String>,
        port: Option<u16>,
        data_path: Option<PathBuf>,
        no_cors: bool,
    ) -> Result<Self> {
        let mut config = Self::new(project_dir)?;
        config.cli_host = host;
        config.cli_port = port;
        config.cli_data_path = data_path;
        config.cli_no_cors = no_cors;
        Ok(config)
    }

    /// Path to floorwatch.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Host (CLI → file → default).
    pub fn host(&self) -> String {
        self.cli_host
            .clone()
            .unwrap_or_else(|| self.toml.server.host.clone())
    }

    /// Port (CLI → env → file → default).
    pub fn port(&self) -> u16 {
        self.cli_port.unwrap_or_else(|| self.toml.port())
    }

    pub fn permissive_cors(&self) -> bool {
        !self.cli_no_cors && self.toml.server.permissive_cors
    }

    /// Data path (CLI → env → file), resolved against the project directory.
    pub fn data_path(&self) -> PathBuf {
        let path = self
            .cli_data_path
            .clone()
            .unwrap_or_else(|| self.toml.data_path());
        if path.is_absolute() || path.as_os_str().is_empty() {
            path
        } else {
            self.project_dir.join(path)
        }
    }

    pub fn production_target(&self) -> f64 {
        self.toml.bot.production_target
    }

    pub fn answer_url(&self) -> Option<String> {
        self.toml.answer_url()
    }

    pub fn answer_timeout(&self) -> Duration {
        Duration::from_secs(self.toml.bot.answer_timeout_secs)
    }

    /// Log directory, resolved against the project directory.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.toml.logging.directory.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                self.project_dir.join(dir)
            }
        })
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_log_format_display_and_parse() {
        assert_eq!(LogFormat::Compact.to_string(), "compact");
        assert_eq!(LogFormat::Json.to_string(), "json");
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_defaults() {
        let toml = FloorToml::default();
        assert_eq!(toml.server.host, "0.0.0.0");
        assert_eq!(toml.server.port, 8080);
        assert!(toml.server.permissive_cors);
        assert_eq!(toml.data.path, PathBuf::from("data/factory.csv"));
        assert_eq!(toml.bot.production_target, 600.0);
        assert!(toml.bot.answer_url.is_none());
        assert_eq!(toml.bot.answer_timeout_secs, 10);
        assert_eq!(toml.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let content = r#"
[server]
port = 9090

[bot]
production_target = 750.0
"#;
        let toml = FloorToml::parse(content).unwrap();
        assert_eq!(toml.server.port, 9090);
        assert_eq!(toml.server.host, "0.0.0.0");
        assert_eq!(toml.bot.production_target, 750.0);
        assert_eq!(toml.bot.answer_timeout_secs, 10);
        assert_eq!(toml.data.path, PathBuf::from("data/factory.csv"));
    }

    #[test]
    fn test_parse_invalid_toml_errors() {
        let result = FloorToml::parse("[server\nport = ");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut toml = FloorToml::default();
        toml.server.port = 7000;
        toml.logging.format = LogFormat::Json;
        toml.save(&path).unwrap();

        let loaded = FloorToml::load(&path).unwrap();
        assert_eq!(loaded.server.port, 7000);
        assert_eq!(loaded.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let toml = FloorToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.server.port, 8080);
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved_path = std::env::var(ENV_DATA_PATH).ok();
        let saved_port = std::env::var(ENV_PORT).ok();

        let toml = FloorToml::parse("[data]\npath = \"file.csv\"\n[server]\nport = 1234\n").unwrap();

        unsafe { std::env::remove_var(ENV_DATA_PATH) };
        unsafe { std::env::remove_var(ENV_PORT) };
        assert_eq!(toml.data_path(), PathBuf::from("file.csv"));
        assert_eq!(toml.port(), 1234);

        unsafe { std::env::set_var(ENV_DATA_PATH, "/env/data.csv") };
        unsafe { std::env::set_var(ENV_PORT, "4321") };
        assert_eq!(toml.data_path(), PathBuf::from("/env/data.csv"));
        assert_eq!(toml.port(), 4321);

        unsafe { std::env::remove_var(ENV_DATA_PATH) };
        unsafe { std::env::remove_var(ENV_PORT) };
        if let Some(val) = saved_path {
            unsafe { std::env::set_var(ENV_DATA_PATH, val) };
        }
        if let Some(val) = saved_port {
            unsafe { std::env::set_var(ENV_PORT, val) };
        }
    }

    #[test]
    fn test_cli_overrides_and_relative_data_path() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved = std::env::var(ENV_DATA_PATH).ok();
        unsafe { std::env::remove_var(ENV_DATA_PATH) };

        let dir = tempdir().unwrap();
        let config = FloorConfig::with_cli_args(
            dir.path().to_path_buf(),
            Some("127.0.0.1".to_string()),
            Some(3000),
            None,
            true,
        )
        .unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 3000);
        assert!(!config.permissive_cors());
        assert_eq!(config.data_path(), root.join("data/factory.csv"));
        assert_eq!(config.config_file(), root.join(".floorwatch/floorwatch.toml"));

        let config = FloorConfig::with_cli_args(
            dir.path().to_path_buf(),
            None,
            None,
            Some(PathBuf::from("/abs/rows.csv")),
            false,
        )
        .unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/abs/rows.csv"));
        assert!(config.permissive_cors());

        if let Some(val) = saved {
            unsafe { std::env::set_var(ENV_DATA_PATH, val) };
        }
    }

    #[test]
    fn test_config_reads_file_from_config_dir() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join(CONFIG_FILE),
            "[bot]\nproduction_target = 900.0\nanswer_timeout_secs = 3\n",
        )
        .unwrap();

        let config = FloorConfig::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.production_target(), 900.0);
        assert_eq!(config.answer_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_validate_valid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved = std::env::var(ENV_ANSWER_URL).ok();
        unsafe { std::env::remove_var(ENV_ANSWER_URL) };

        assert!(FloorToml::default().validate().is_empty());

        if let Some(val) = saved {
            unsafe { std::env::set_var(ENV_ANSWER_URL, val) };
        }
    }

    #[test]
    fn test_validate_checks_answer_url_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved = std::env::var(ENV_ANSWER_URL).ok();

        let toml = FloorToml::parse("[bot]\nanswer_url = \"http://file.example/answer\"\n").unwrap();

        unsafe { std::env::set_var(ENV_ANSWER_URL, "graph.local:9000") };
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(ENV_ANSWER_URL));
        assert!(warnings[0].contains("graph.local:9000"));

        unsafe { std::env::set_var(ENV_ANSWER_URL, "https://graph.local/answer") };
        assert!(toml.validate().is_empty());

        unsafe { std::env::remove_var(ENV_ANSWER_URL) };
        if let Some(val) = saved {
            unsafe { std::env::set_var(ENV_ANSWER_URL, val) };
        }
    }

    #[test]
    fn test_validate_reports_problems() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved = std::env::var(ENV_ANSWER_URL).ok();
        unsafe { std::env::remove_var(ENV_ANSWER_URL) };

        let content = r#"
[server]
port = 0

[bot]
production_target = -5.0
answer_url = "ftp://example.com"
answer_timeout_secs = 0
"#;
        let toml = FloorToml::parse(content).unwrap();
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("server.port")));
        assert!(warnings.iter().any(|w| w.contains("production_target")));
        assert!(warnings.iter().any(|w| w.contains("ftp://example.com")));
        assert!(warnings.iter().any(|w| w.contains("answer_timeout_secs")));

        if let Some(val) = saved {
            unsafe { std::env::set_var(ENV_ANSWER_URL, val) };
        }
    }
}
