use axum::Router;

use crate::{ConnectingIp, ConnectingIpSource};

/// What an absent client address renders as
///
/// The edge runtime's header lookup yields `null` for a missing header, and
/// the response has always carried that literal.
pub const ABSENT: &str = "null";

/// Formats the response body for a client address: the address verbatim
/// followed by a single newline
pub fn body(address: Option<&str>) -> String {
    format!("{}\n", address.unwrap_or(ABSENT))
}

/// Responds with the caller's address as `text/plain`
pub async fn what_is_my_ip(ConnectingIp(address): ConnectingIp) -> String {
    body(address.as_deref())
}

/// A router answering every request, whatever its method or path, with
/// [`what_is_my_ip`]
///
/// The address source defaults to `CF-Connecting-IP`; use [`app`] to pick
/// another one.
pub fn router() -> Router {
    Router::new().fallback(what_is_my_ip)
}

/// [`router`] reading the client address from `source`
pub fn app(source: ConnectingIpSource) -> Router {
    router().layer(source.into_extension())
}
