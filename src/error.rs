use std::net::IpAddr;

use thiserror::Error;

use crate::cloudflare::{ApiMessage, RecordType};

/// Errors of the outbound IP resolver, the Cloudflare client and the updater
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent, or its response could not be read
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The resolver answered with something that isn't an IP address
    #[error("Invalid IP: {0}")]
    InvalidIp(String),
    /// No active zone carries the given name
    #[error("no zone found for domain {0}")]
    ZoneNotFound(String),
    /// No DNS record of the wanted type carries the given name
    #[error("no record found for name {0}")]
    RecordNotFound(String),
    /// The API answered with `success: false`
    #[error("cloudflare api error: {}", join(.0))]
    Api(Vec<ApiMessage>),
    /// The API answered with `success: true` but no payload
    #[error("cloudflare api reported success but returned no result")]
    MissingResult,
    /// The address can't be stored in a record of the wanted type
    #[error("{ip} can't be stored in an {record_type} record")]
    AddressFamily {
        /// The resolved address
        ip: IpAddr,
        /// Type of the maintained record
        record_type: RecordType,
    },
    /// The configuration is unusable
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Reading the configuration failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether retrying the same call later may succeed, i.e. the network was
    /// unreachable rather than the request wrong
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_connect() || err.is_timeout())
    }
}

fn join(messages: &[ApiMessage]) -> String {
    if messages.is_empty() {
        return "no reason given".to_string();
    }
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A `Result` alias defaulting to [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;
