//! Configuration of the two binaries
//!
//! The responder is configured from the environment, the updater from a TOML
//! file:
//!
//! ```toml
//! public_ip_resolver = "https://ifconfig.io/ip"
//! check_interval_secs = 10
//!
//! [cloudflare]
//! token = "..."
//! zone = "example.com"
//! record = "home.example.com"
//! record_type = "A"
//! ```

use std::net::SocketAddr;
#[cfg(feature = "ddns")]
use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::ConnectingIpSource;
#[cfg(feature = "ddns")]
use crate::{Error, Result, cloudflare::RecordType};

/// Responder settings, read from `WHATISMYIP_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Where the client address comes from (`WHATISMYIP_IP_SOURCE`)
    #[serde(default)]
    pub ip_source: ConnectingIpSource,
    /// Address to listen on (`WHATISMYIP_LISTEN_ADDR`)
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    /// Prefix of the environment variables
    pub const ENV_PREFIX: &'static str = "WHATISMYIP_";

    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Fails on a variable that can't be parsed into its setting.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(Self::ENV_PREFIX).from_env()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip_source: ConnectingIpSource::default(),
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

/// Updater settings
#[cfg(feature = "ddns")]
#[derive(Debug, Clone, Deserialize)]
pub struct UpdaterConfig {
    /// URL answering with our public address in plain text
    #[serde(default = "default_resolver")]
    pub public_ip_resolver: String,
    /// Seconds between two checks
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
    /// The record to keep up to date
    pub cloudflare: CloudflareConfig,
}

/// Which record to keep up to date, and the credentials to do it
#[cfg(feature = "ddns")]
#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareConfig {
    /// API token with `Zone:Read` and `DNS:Edit` permissions
    #[serde(default)]
    pub token: String,
    /// Zone name, e.g. `example.com`
    #[serde(default)]
    pub zone: String,
    /// Record name, e.g. `home.example.com`
    #[serde(default)]
    pub record: String,
    /// Record type
    #[serde(default)]
    pub record_type: RecordType,
    /// API base URL, the public API if unset
    #[serde(default)]
    pub api_base_url: Option<String>,
}

#[cfg(feature = "ddns")]
fn default_resolver() -> String {
    crate::resolver::DEFAULT_RESOLVER.to_string()
}

#[cfg(feature = "ddns")]
const fn default_check_interval() -> u64 {
    10
}

#[cfg(feature = "ddns")]
impl UpdaterConfig {
    /// Reads and validates the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or parsed, or if [`Self::validate`]
    /// rejects it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Checks that every required setting is present.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("token", &self.cloudflare.token),
            ("zone", &self.cloudflare.zone),
            ("record", &self.cloudflare.record),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(Error::Config(format!("cloudflare {name} is missing")));
        }
        if self.check_interval_secs == 0 {
            return Err(Error::Config("check_interval_secs must be positive".into()));
        }
        Ok(())
    }

    /// Time between two checks
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

#[cfg(feature = "ddns")]
impl std::str::FromStr for UpdaterConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(s).map_err(|err| Error::Config(err.to_string()))?;
        if config.public_ip_resolver.is_empty() {
            config.public_ip_resolver = default_resolver();
        }
        config.validate()?;
        Ok(config)
    }
}
