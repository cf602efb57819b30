//! Server configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional RON file (`--config server.ron`)
//! 3. environment variables (a `.env` file is loaded first when present)
//! 4. command-line flags
//!
//! ```ron
//! (
//!     bind: "127.0.0.1",
//!     port: 8080,
//!     static_dir: "public",
//!     formations: Some("formations.ron"),
//!     completion: (model: "gpt-4o-mini", timeout_secs: 10),
//! )
//! ```
//!
//! The API key is only ever read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pitch_core::templates::FormationLibrary;

use crate::advisor::{Advisor, AdvisorSettings, OpenRouterAdvisor};
use crate::error::ServerError;
use crate::relay::DEFAULT_RELAY_CAPACITY;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 10_000;

/// Default chat-completions endpoint.
pub const DEFAULT_COMPLETION_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default completion model.
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

/// Default completion timeout, in seconds.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 20;

/// Environment variable names.
pub mod env_keys {
    /// Listening port.
    pub const PORT: &str = "PORT";
    /// Completion API key.
    pub const API_KEY: &str = "OPENROUTER_KEY";
    /// Directory served for unmatched paths.
    pub const STATIC_DIR: &str = "PITCH_STATIC_DIR";
    /// Custom formation library file.
    pub const FORMATIONS: &str = "PITCH_FORMATIONS";
    /// Completion endpoint override.
    pub const COMPLETION_URL: &str = "PITCH_COMPLETION_URL";
    /// Completion model override.
    pub const COMPLETION_MODEL: &str = "PITCH_COMPLETION_MODEL";
}

/// Completion API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Chat-completions URL.
    pub endpoint: String,
    /// Model name.
    pub model: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Bearer token; `None` disables the advisor.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_URL.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            timeout_secs: DEFAULT_COMPLETION_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

/// Everything the server needs at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub bind: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Directory served for paths no route matches.
    pub static_dir: PathBuf,
    /// Custom formation library; the built-in one when `None`.
    pub formations: Option<PathBuf>,
    /// Events buffered per relay peer before it starts skipping.
    pub relay_capacity: usize,
    /// Completion API settings.
    pub completion: CompletionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("."),
            formations: None,
            relay_capacity: DEFAULT_RELAY_CAPACITY,
            completion: CompletionConfig::default(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--bind`
    pub bind: Option<IpAddr>,
    /// `--port`
    pub port: Option<u16>,
    /// `--static-dir`
    pub static_dir: Option<PathBuf>,
    /// `--formations`
    pub formations: Option<PathBuf>,
}

fn read_file(path: &Path) -> Result<String, ServerError> {
    std::fs::read_to_string(path).map_err(|source| ServerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    /// Defaults overlaid with a RON file.
    pub fn from_ron_file(path: &Path) -> Result<Self, ServerError> {
        Self::from_ron_str(path, &read_file(path)?)
    }

    /// Defaults overlaid with RON text; `path` is only used in errors.
    pub fn from_ron_str(path: &Path, text: &str) -> Result<Self, ServerError> {
        ron::from_str(text).map_err(|e| ServerError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Blank values are ignored; an unparsable `PORT` is logged and ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = non_empty(lookup(env_keys::PORT)) {
            match raw.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(
                    "{} ({:?}) is not a valid port. Keeping {}.",
                    env_keys::PORT,
                    raw,
                    self.port
                ),
            }
        }
        if let Some(dir) = non_empty(lookup(env_keys::STATIC_DIR)) {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(file) = non_empty(lookup(env_keys::FORMATIONS)) {
            self.formations = Some(PathBuf::from(file));
        }
        if let Some(url) = non_empty(lookup(env_keys::COMPLETION_URL)) {
            self.completion.endpoint = url;
        }
        if let Some(model) = non_empty(lookup(env_keys::COMPLETION_MODEL)) {
            self.completion.model = model;
        }
        if let Some(key) = non_empty(lookup(env_keys::API_KEY)) {
            self.completion.api_key = Some(key.trim().to_string());
        }
    }

    /// Overlay the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Overlay command-line flags.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(dir) = &overrides.static_dir {
            self.static_dir.clone_from(dir);
        }
        if let Some(file) = &overrides.formations {
            self.formations = Some(file.clone());
        }
    }

    /// Address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Load the formation library this config names.
    pub fn load_library(&self) -> Result<FormationLibrary, ServerError> {
        match &self.formations {
            None => Ok(FormationLibrary::builtin().clone()),
            Some(path) => {
                let text = read_file(path)?;
                let library = FormationLibrary::from_ron_str(&path.display().to_string(), &text)?;
                tracing::info!(
                    path = %path.display(),
                    templates = library.len(),
                    "Loaded formation library"
                );
                Ok(library)
            }
        }
    }

    /// Build the completion client, or `None` when no key is configured.
    pub fn advisor(&self) -> Result<Option<Arc<dyn Advisor>>, ServerError> {
        let Some(api_key) = self.completion.api_key.clone() else {
            return Ok(None);
        };
        let advisor = OpenRouterAdvisor::new(AdvisorSettings {
            endpoint: self.completion.endpoint.clone(),
            model: self.completion.model.clone(),
            api_key,
            timeout: Duration::from_secs(self.completion.timeout_secs),
        })?;
        Ok(Some(Arc::new(advisor)))
    }
}
