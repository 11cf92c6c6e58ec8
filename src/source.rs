use std::{convert::Infallible, error::Error, fmt, net::SocketAddr, str::FromStr};

use axum::{
    extract::{ConnectInfo, Extension, FromRequestParts},
    http::{Extensions, HeaderMap, HeaderValue, request::Parts},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::headers::{CfConnectingIp, FlyClientIp, TrueClientIp, TrustedHeader, XRealIp};

/// The connecting client address, exactly as the trusted source reported it
///
/// `None` means the source had nothing for this request. The value is never
/// parsed or validated, so whatever the platform attached is what you get.
///
/// The source is taken from a [`ConnectingIpSource`] request extension and
/// defaults to [`ConnectingIpSource::CfConnectingIp`] when none is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectingIp(pub Option<String>);

/// Where [`ConnectingIp`] reads the client address from
///
/// Pick the header the last proxy in front of you (the one you own, or the
/// one your edge platform provides) writes the connection address into, and
/// pass it to [`axum::routing::Router::layer`] via
/// [`ConnectingIpSource::into_extension`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ConnectingIpSource {
    /// The `CF-Connecting-IP` header
    #[default]
    CfConnectingIp,
    /// The `True-Client-IP` header
    TrueClientIp,
    /// The `Fly-Client-IP` header
    FlyClientIp,
    /// The `X-Real-Ip` header
    XRealIp,
    /// The peer address from [`axum::extract::ConnectInfo`]
    ConnectInfo,
}

impl ConnectingIpSource {
    /// Wraps `ConnectingIpSource` into the [`axum::extract::Extension`] for
    /// passing to [`axum::routing::Router::layer`]
    pub const fn into_extension(self) -> Extension<Self> {
        Extension(self)
    }
}

/// Returned when a string names no [`ConnectingIpSource`] variant
#[derive(Debug)]
pub struct ParseConnectingIpSourceError(String);

impl fmt::Display for ParseConnectingIpSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid ConnectingIpSource value {}", self.0)
    }
}

impl Error for ParseConnectingIpSourceError {}

impl FromStr for ConnectingIpSource {
    type Err = ParseConnectingIpSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CfConnectingIp" => Self::CfConnectingIp,
            "TrueClientIp" => Self::TrueClientIp,
            "FlyClientIp" => Self::FlyClientIp,
            "XRealIp" => Self::XRealIp,
            "ConnectInfo" => Self::ConnectInfo,
            _ => return Err(ParseConnectingIpSourceError(s.to_string())),
        })
    }
}

impl ConnectingIp {
    /// Reads the client address from the given request parts.
    pub fn from_parts(
        source: ConnectingIpSource,
        headers: &HeaderMap<HeaderValue>,
        extensions: &Extensions,
    ) -> Self {
        Self(match source {
            ConnectingIpSource::CfConnectingIp => CfConnectingIp::value_from_headers(headers),
            ConnectingIpSource::TrueClientIp => TrueClientIp::value_from_headers(headers),
            ConnectingIpSource::FlyClientIp => FlyClientIp::value_from_headers(headers),
            ConnectingIpSource::XRealIp => XRealIp::value_from_headers(headers),
            ConnectingIpSource::ConnectInfo => extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string()),
        })
    }
}

impl<S> FromRequestParts<S> for ConnectingIp
where
    S: Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let source = parts
            .extensions
            .get::<ConnectingIpSource>()
            .copied()
            .unwrap_or_default();
        Ok(Self::from_parts(source, &parts.headers, &parts.extensions))
    }
}
