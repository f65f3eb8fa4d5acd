//! Configuration management

use std::{env, path::Path};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Cloud functions host of the production deployment
pub const DEFAULT_BASE_URL: &str = "https://us-central1-web-gestao-37a85.cloudfunctions.net";

/// Function that accepts agent envelopes
pub const DEFAULT_ROUTE: &str = "agentAPI";

/// Prefix of environment variables merged into the configuration
pub const ENV_PREFIX: &str = "GESTAO_AGENT_";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where requests are sent
    pub endpoint: EndpointConfig,
    /// Who requests are made for
    pub agent: AgentConfig,
}

/// Remote endpoint location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the cloud functions host
    pub base_url: String,
    /// Function route appended to `base_url`
    pub route: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            route: DEFAULT_ROUTE.to_string(),
        }
    }
}

impl EndpointConfig {
    /// Full URL requests are posted to
    pub fn url(&self) -> Result<Url> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Unsupported URL scheme '{}' (expected http or https)",
                base.scheme()
            )));
        }

        let route = self.route.trim().trim_start_matches('/');
        if route.is_empty() {
            return Err(Error::Config("Endpoint route must not be empty".to_string()));
        }
        base.join(route)
            .map_err(|e| Error::Config(format!("Invalid route '{}': {e}", self.route)))
    }
}

/// Identity sent with every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// User whose data the agent reads and writes
    pub user_id: String,

    /// Token forwarded in the envelope.
    /// Supports a literal value or `env:VAR_NAME`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AgentConfig {
    /// Resolve the token, expanding `env:VAR_NAME`.
    ///
    /// An unset variable resolves to no token.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        let token = self.token.as_deref()?;
        match token.strip_prefix("env:") {
            Some(var_name) => env::var(var_name).ok().filter(|v| !v.is_empty()),
            None => Some(token.to_string()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional YAML file and the
    /// environment (`GESTAO_AGENT_` prefix, `__` separates nested keys).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Check that requests can be built from this configuration
    pub fn validate(&self) -> Result<()> {
        if self.agent.user_id.trim().is_empty() {
            return Err(Error::Config(format!(
                "No user id configured (set agent.user_id, {ENV_PREFIX}AGENT__USER_ID or --user-id)"
            )));
        }
        self.endpoint.url()?;
        Ok(())
    }

    /// Copy safe to print: a literal token is masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(token) = copy.agent.token.as_mut() {
            if !token.starts_with("env:") {
                *token = "***".to_string();
            }
        }
        copy
    }
}
