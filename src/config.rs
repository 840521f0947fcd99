//! Gateway environment and merchant credentials.
//!
//! Every setting can be given as a command-line flag or through its `AZUL_*`
//! environment variable.

use clap::{Args, ValueEnum};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

const SANDBOX_URL: &str = "https://pruebas.azul.com.do/webservices/JSON/Default.aspx";
const PRODUCTION_URL: &str = "https://pagos.azul.com.do/webservices/JSON/Default.aspx";

static SANDBOX: LazyLock<Url> = LazyLock::new(|| Url::parse(SANDBOX_URL).expect("valid URL"));
static PRODUCTION: LazyLock<Url> =
    LazyLock::new(|| Url::parse(PRODUCTION_URL).expect("valid URL"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static Url {
        match self {
            Environment::Sandbox => &SANDBOX,
            Environment::Production => &PRODUCTION,
        }
    }
}

#[derive(Args, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Gateway environment to target
    #[arg(long, env = "AZUL_ENVIRONMENT", value_enum, default_value_t = Environment::Sandbox)]
    pub environment: Environment,

    /// Overrides the environment's endpoint
    #[arg(long, env = "AZUL_ENDPOINT")]
    pub endpoint: Option<Url>,

    /// Merchant identifier assigned by the gateway
    #[arg(long, env = "AZUL_STORE")]
    pub store: String,

    #[arg(long, env = "AZUL_CHANNEL", default_value = "EC")]
    pub channel: String,

    #[arg(long, env = "AZUL_AUTH1", hide_env_values = true)]
    pub auth1: String,

    #[arg(long, env = "AZUL_AUTH2", hide_env_values = true)]
    pub auth2: String,
}

impl GatewayConfig {
    pub const DEFAULT_CHANNEL: &'static str = "EC";

    pub fn new(
        store: impl Into<String>,
        auth1: impl Into<String>,
        auth2: impl Into<String>,
    ) -> Self {
        Self {
            environment: Environment::default(),
            endpoint: None,
            store: store.into(),
            channel: Self::DEFAULT_CHANNEL.to_string(),
            auth1: auth1.into(),
            auth2: auth2.into(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn endpoint(&self) -> Url {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.environment.base_url().clone())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint().as_str())
            .field("store", &self.store)
            .field("channel", &self.channel)
            .field("auth1", &"<redacted>")
            .field("auth2", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_follows_environment() {
        let config = GatewayConfig::new("39038540035", "testcert2", "testcert2");
        assert_eq!(config.endpoint().as_str(), SANDBOX_URL);

        let config = config.with_environment(Environment::Production);
        assert_eq!(config.endpoint().as_str(), PRODUCTION_URL);

        let custom = Url::parse("http://localhost:8080/json").unwrap();
        let config = config.with_endpoint(custom.clone());
        assert_eq!(config.endpoint(), custom);
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = GatewayConfig::new("39038540035", "secret-one", "secret-two");
        let debug = format!("{config:?}");
        assert!(debug.contains("39038540035"));
        assert!(!debug.contains("secret-one"));
        assert!(!debug.contains("secret-two"));
    }
}
