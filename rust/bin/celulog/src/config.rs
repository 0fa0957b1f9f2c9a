//! Client-side context management.
//!
//! Reads/writes `~/.celulog/config.toml`.

use std::path::{Path, PathBuf};

use celulog_client::FilterWire;
use serde::{Deserialize, Serialize};

/// Fallback timezone recorded with new loads when a context does not
/// set one. The plant runs on São Paulo time.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// A single context — connection to one load-service instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Context name (e.g. "plant-2").
    pub name: String,

    /// Server base URL (e.g. "http://10.20.0.5:8080/api").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// IANA timezone recorded with new loads.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Field spelling this server expects in search payloads.
    #[serde(default, rename = "filter-wire")]
    pub filter_wire: FilterWire,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: String::new(),
            timezone: default_timezone(),
            filter_wire: FilterWire::default(),
        }
    }
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    /// List of configured contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Default config file path: ~/.celulog/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the currently active context, if any.
    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    /// Get a mutable reference to a context by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn upsert_context(&mut self, ctx: Context) {
        if let Some(existing) = self.get_mut(&ctx.name) {
            *existing = ctx;
        } else {
            self.contexts.push(ctx);
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }
}

/// Connection settings after all overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Server base URL. Empty when nothing is configured.
    pub server: String,
    pub timezone: String,
    pub filter_wire: FilterWire,
}

/// Resolve connection settings. The server URL comes from, in order:
/// the `--server` flag, the `CELULOG_SERVER` environment variable, the
/// current context. Timezone and wire spelling always come from the
/// current context when one exists.
pub fn settings(
    config: &ClientConfig,
    flag_server: Option<&str>,
    env_server: Option<&str>,
) -> Settings {
    let ctx = config.current();
    let server = flag_server
        .or(env_server)
        .map(str::to_string)
        .or_else(|| ctx.map(|c| c.server.clone()))
        .unwrap_or_default();
    Settings {
        server,
        timezone: ctx
            .map(|c| c.timezone.clone())
            .unwrap_or_else(default_timezone),
        filter_wire: ctx.map(|c| c.filter_wire).unwrap_or_default(),
    }
}

/// Return the celulog config directory (~/.celulog).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".celulog")
}
