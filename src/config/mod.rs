use crate::cli::Args;
use crate::core::error::ChatError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4-1106-preview".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1792x1024".to_string()
}

fn default_image_quality() -> String {
    "hd".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_history_limit() -> usize {
    12
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 7860))
}

fn default_reply_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Pause before a submitted message is answered on the page
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            reply_delay_ms: default_reply_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
    #[serde(default = "default_image_quality")]
    pub image_quality: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_true")]
    pub preview_images: bool,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub web: WebConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            image_quality: default_image_quality(),
            output_dir: default_output_dir(),
            preview_images: true,
            history_limit: default_history_limit(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            web: WebConfig::default(),
        }
    }
}

/// Validates the credential read from the environment.
pub fn resolve_api_key(value: Option<String>) -> Result<String, ChatError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ChatError::Config(format!(
            "OpenAI API key not found: set {} in the environment or a .env file",
            API_KEY_VAR
        ))),
    }
}

pub fn api_key_from_env() -> Result<String, ChatError> {
    resolve_api_key(std::env::var(API_KEY_VAR).ok())
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dchat")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    pub fn load() -> Result<Config, ChatError> {
        let path = Self::config_path();

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            return Self::from_yaml(&contents)
                .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)));
        }

        let config = Config::default();
        if let Err(e) = config.save() {
            log::debug!("could not write default config to {}: {}", path.display(), e);
        }
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Config, ChatError> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yml::from_str::<Config>(contents)?)
    }

    pub fn save(&self) -> Result<(), ChatError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(&path, yaml_content)?;
        Ok(())
    }

    /// Command-line flags take precedence over the file.
    pub fn merge_args(mut self, args: &Args) -> Self {
        if let Some(bind) = args.bind {
            self.web.bind = bind;
        }
        if let Some(model) = &args.model {
            self.chat_model = model.clone();
        }
        if let Some(model) = &args.image_model {
            self.image_model = model.clone();
        }
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if args.no_preview {
            self.preview_images = false;
        }
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.web.reply_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_key_is_rejected() {
        assert!(matches!(resolve_api_key(None), Err(ChatError::Config(_))));
        assert!(matches!(
            resolve_api_key(Some("   ".into())),
            Err(ChatError::Config(_))
        ));
        assert_eq!(resolve_api_key(Some(" sk-test\n".into())).unwrap(), "sk-test");
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.chat_model, "gpt-4-1106-preview");
        assert_eq!(config.image_model, "dall-e-3");
        assert_eq!(config.image_size, "1792x1024");
        assert_eq!(config.image_quality, "hd");
        assert_eq!(config.history_limit, 12);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.reply_delay(), Duration::from_secs(2));
        assert_eq!(config.web.bind.port(), 7860);
        assert!(config.preview_images);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_yaml(
            "chat_model: gpt-4o\nhistory_limit: 6\nweb:\n  bind: \"0.0.0.0:8080\"\n",
        )
        .unwrap();
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(config.history_limit, 6);
        assert_eq!(config.web.bind.port(), 8080);
        assert_eq!(config.web.reply_delay_ms, 2000);
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_yaml("history_limit: [1, 2").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let args = Args {
            model: Some("gpt-4o-mini".into()),
            base_url: Some("http://localhost:9000/v1".into()),
            output_dir: Some(PathBuf::from("/tmp/images")),
            no_preview: true,
            ..Args::default()
        };
        let config = Config::default().merge_args(&args);
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/images"));
        assert!(!config.preview_images);
        assert_eq!(config.image_model, "dall-e-3");
    }
}
