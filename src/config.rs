//! TOML configuration for the `hub` binary and the library entry points.
//!
//! Every section has defaults, so an empty file is a valid configuration
//! that talks to the production webhooks and reads content over HTTP once
//! `store.base_url` is set.
//!
//! ```toml
//! [store]
//! provider = "http"
//! base_url = "https://cms.example.com/api"
//! api_key_env = "HUB_STORE_TOKEN"
//!
//! [chat]
//! webhook_url = "https://n8n.swadhindigitalhub.com/webhook/chat"
//!
//! [contact]
//! webhook_url = "https://n8n.swadhindigitalhub.com/webhook/contact"
//!
//! [session]
//! path = "./data/session.json"
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_provider")]
    pub provider: String,
    #[serde(default)]
    pub base_url: Option<String>,
    /// JSON fixture read by the `file` provider.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Name of the environment variable holding a bearer token.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Unset means the transport default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_store_provider(),
            base_url: None,
            path: None,
            api_key_env: None,
            timeout_secs: None,
        }
    }
}

fn default_store_provider() -> String {
    "http".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_chat_webhook")]
    pub webhook_url: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: default_chat_webhook(),
            greeting: default_greeting(),
            fallback_reply: default_fallback_reply(),
            error_reply: default_error_reply(),
            timeout_secs: None,
        }
    }
}

fn default_chat_webhook() -> String {
    "https://n8n.swadhindigitalhub.com/webhook/chat".to_string()
}
fn default_greeting() -> String {
    "Hello! How can I help you today?".to_string()
}
fn default_fallback_reply() -> String {
    "Thank you for your message. Our team will get back to you soon!".to_string()
}
fn default_error_reply() -> String {
    "Sorry, I encountered an error. Please try again or contact us directly at info@swadhindigitalhub.com".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContactConfig {
    #[serde(default = "default_contact_webhook")]
    pub webhook_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            webhook_url: default_contact_webhook(),
            timeout_secs: None,
        }
    }
}

fn default_contact_webhook() -> String {
    "https://n8n.swadhindigitalhub.com/webhook/contact".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from("./data/session.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl Config {
    /// All-defaults configuration, used when no config file is present.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    match config.store.provider.as_str() {
        "http" => {
            if let Some(url) = &config.store.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("store.base_url must be an http(s) URL, got '{}'", url);
                }
            }
        }
        "file" => {
            if config.store.path.is_none() {
                anyhow::bail!("store.path must be set when provider is 'file'");
            }
        }
        other => anyhow::bail!(
            "Unknown store provider: '{}'. Must be http or file.",
            other
        ),
    }

    if config.store.timeout_secs == Some(0) {
        anyhow::bail!("store.timeout_secs must be > 0 when set");
    }

    if config.chat.webhook_url.trim().is_empty() {
        anyhow::bail!("chat.webhook_url must not be empty");
    }
    if config.contact.webhook_url.trim().is_empty() {
        anyhow::bail!("contact.webhook_url must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.store.provider, "http");
        assert!(cfg.chat.webhook_url.ends_with("/webhook/chat"));
        assert!(cfg.contact.webhook_url.ends_with("/webhook/contact"));
        assert_eq!(cfg.chat.greeting, "Hello! How can I help you today?");
        assert!(cfg.chat.timeout_secs.is_none());
    }

    #[test]
    fn test_file_provider_requires_path() {
        let cfg: Config = toml::from_str("[store]\nprovider = \"file\"\n").unwrap();
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("store.path"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let cfg: Config = toml::from_str("[store]\nprovider = \"ftp\"\n").unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_base_url_must_be_http() {
        let cfg: Config =
            toml::from_str("[store]\nbase_url = \"cms.example.com\"\n").unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_load_config_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("hub.toml");
        std::fs::write(
            &path,
            "[server]\nbind = \"0.0.0.0:9000\"\n[chat]\nwebhook_url = \"http://localhost:1/chat\"\n",
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
        assert_eq!(cfg.chat.webhook_url, "http://localhost:1/chat");
    }
}
