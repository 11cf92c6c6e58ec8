//! Finding out the public address of this host by asking a whatismyip-style
//! service, such as the responder in this crate

use std::{net::IpAddr, time::Duration};

use reqwest::Client;
use tracing::error;

use crate::{Error, Result, USER_AGENT};

/// Resolver used when none is configured
pub const DEFAULT_RESOLVER: &str = "https://ifconfig.io/ip";

/// How long a single lookup may take by default
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Builds a client suited for lookups: short timeout and no connection reuse,
/// so every lookup goes out over a fresh connection.
///
/// # Errors
///
/// Fails if the underlying HTTP client can't be built.
pub fn resolver_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .build()?)
}

/// Asks the resolver at `url` for our public address.
///
/// The answer may be surrounded by whitespace, a trailing newline included.
///
/// # Errors
///
/// [`Error::InvalidIp`] with the raw answer if it isn't an IP address, or
/// whatever went wrong talking to the resolver.
pub async fn outbound_ip(client: &Client, url: &str) -> Result<IpAddr> {
    let response = client.get(url).send().await.inspect_err(|err| {
        error!(%url, %err, "could not query the resolver");
    })?;
    let raw = response.text().await.inspect_err(|err| {
        error!(%url, %err, "could not read the resolver response");
    })?;
    raw.trim().parse::<IpAddr>().map_err(|_| {
        error!(%url, answer = %raw, "the resolver returned an invalid IP");
        Error::InvalidIp(raw)
    })
}
