use axum::http::HeaderMap;

pub(crate) const CF_CONNECTING_IP: &str = "CF-Connecting-IP";
pub(crate) const TRUE_CLIENT_IP: &str = "True-Client-IP";
pub(crate) const FLY_CLIENT_IP: &str = "Fly-Client-IP";
pub(crate) const X_REAL_IP: &str = "X-Real-Ip";

/// Header set by Cloudflare to the address of the connecting client
pub(crate) struct CfConnectingIp;

/// Header set by Akamai and Cloudflare Enterprise
pub(crate) struct TrueClientIp;

/// Header set by Fly.io
pub(crate) struct FlyClientIp;

/// Header commonly set by nginx
pub(crate) struct XRealIp;

/// A header injected by the platform in front of us, holding a single address
///
/// The value is returned as the platform wrote it: no parsing, no trimming.
pub(crate) trait TrustedHeader {
    const HEADER: &'static str;

    fn value_from_headers(headers: &HeaderMap) -> Option<String> {
        headers
            .get(Self::HEADER)
            .map(|hv| String::from_utf8_lossy(hv.as_bytes()).into_owned())
    }
}

impl TrustedHeader for CfConnectingIp {
    const HEADER: &'static str = CF_CONNECTING_IP;
}

impl TrustedHeader for TrueClientIp {
    const HEADER: &'static str = TRUE_CLIENT_IP;
}

impl TrustedHeader for FlyClientIp {
    const HEADER: &'static str = FLY_CLIENT_IP;
}

impl TrustedHeader for XRealIp {
    const HEADER: &'static str = X_REAL_IP;
}
