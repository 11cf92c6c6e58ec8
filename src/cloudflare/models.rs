use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The envelope every API v4 response is wrapped in
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// The payload; `null` when the call failed
    pub result: Option<T>,
    /// Whether the call succeeded
    pub success: bool,
    /// Reasons for a failure
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    /// Informational messages
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    /// Pagination of list results
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl<T> Envelope<T> {
    /// The payload of a successful call.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] with the reported reasons if the call failed, or
    /// [`Error::MissingResult`] if it succeeded without a payload.
    pub fn into_result(self) -> Result<T> {
        match (self.success, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(Error::MissingResult),
            (false, _) => Err(Error::Api(self.errors)),
        }
    }
}

/// An error or informational message returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiMessage {
    /// Numeric code
    pub code: u32,
    /// Human readable description
    pub message: String,
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Pagination details of a list call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultInfo {
    /// Current page, starting at 1
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Number of pages
    #[serde(default)]
    pub total_pages: u32,
    /// Items on this page
    pub count: u32,
    /// Items across all pages
    pub total_count: u32,
}

/// A DNS zone
#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    /// Zone identifier
    pub id: String,
    /// Domain name
    pub name: String,
    /// `active`, `pending`, ...
    pub status: String,
    /// Whether Cloudflare serves the zone as DNS only
    #[serde(default)]
    pub paused: bool,
    /// `full` or `partial`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Cloudflare name servers assigned to the zone
    #[serde(default)]
    pub name_servers: Vec<String>,
}

/// DNS record types the updater can keep in sync
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum RecordType {
    /// IPv4 address record
    #[default]
    A,
    /// IPv6 address record
    AAAA,
}

impl RecordType {
    /// The type name as the API spells it
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    /// Record identifier
    pub id: String,
    /// Identifier of the zone holding the record
    #[serde(default)]
    pub zone_id: String,
    /// Name of the zone holding the record
    #[serde(default)]
    pub zone_name: String,
    /// Fully qualified record name
    pub name: String,
    /// Record type, e.g. `A`
    #[serde(rename = "type")]
    pub kind: String,
    /// Record value; the address for `A` and `AAAA` records
    pub content: String,
    /// Whether the record may be proxied
    #[serde(default)]
    pub proxiable: bool,
    /// Whether traffic goes through Cloudflare
    #[serde(default)]
    pub proxied: bool,
    /// Time to live in seconds, 1 meaning automatic
    #[serde(default = "automatic_ttl")]
    pub ttl: u32,
    /// Whether the record is locked
    #[serde(default)]
    pub locked: bool,
    /// Free-form comment
    #[serde(default)]
    pub comment: Option<String>,
}

const fn automatic_ttl() -> u32 {
    1
}

/// Body of a record overwrite
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RecordUpdate<'a> {
    #[serde(rename = "type")]
    pub(crate) kind: &'a str,
    pub(crate) name: &'a str,
    pub(crate) content: &'a str,
    pub(crate) ttl: u32,
    pub(crate) proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) comment: Option<&'a str>,
}

impl<'a> From<&'a Record> for RecordUpdate<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            kind: &record.kind,
            name: &record.name,
            content: &record.content,
            ttl: record.ttl,
            proxied: record.proxied,
            comment: record.comment.as_deref(),
        }
    }
}
