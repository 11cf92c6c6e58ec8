//! Tells callers which address they connect from
//!
//! Every request, whatever its method or path, is answered with `200 OK` and
//! a `text/plain` body holding the client address followed by a newline:
//!
//! ```text
//! $ curl https://ip.example.com/
//! 203.0.113.7
//! ```
//!
//! The address is read from a header the edge platform in front of the
//! service injects and clients can't forge, `CF-Connecting-IP` by default.
//! It is echoed as is, without parsing or reformatting. When the header is
//! missing, the body is `null\n`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::net::SocketAddr;
//!
//! use whatismyip::ConnectingIpSource;
//!
//! #[tokio::main]
//! async fn main() {
//!     // `ConnectInfo` when nothing sits in front of the service
//!     let app = whatismyip::app(ConnectingIpSource::CfConnectingIp);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(
//!         listener,
//!         app.into_make_service_with_connect_info::<SocketAddr>(),
//!     )
//!     .await
//!     .unwrap()
//! }
//! ```
//!
//! With the `ddns` feature the crate also carries the other side of the
//! exchange: a [`resolver`] asking such a service for the public address of
//! this host, and an [`updater`] keeping a Cloudflare DNS record pointed at
//! it.

mod headers;
mod responder;
mod source;

#[cfg(feature = "serde")]
pub mod config;

#[cfg(feature = "ddns")]
pub mod cloudflare;
#[cfg(feature = "ddns")]
mod error;
#[cfg(feature = "ddns")]
pub mod resolver;
#[cfg(feature = "ddns")]
pub mod updater;

#[cfg(all(test, feature = "ddns"))]
mod testing;

#[cfg(feature = "ddns")]
pub use error::{Error, Result};
pub use responder::{ABSENT, app, body, router, what_is_my_ip};
pub use source::{ConnectingIp, ConnectingIpSource, ParseConnectingIpSourceError};

/// Sent with every outgoing request
#[cfg(feature = "ddns")]
pub(crate) const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
