//! A small Cloudflare API v4 client covering what a dynamic DNS updater needs

mod api;
mod models;

pub use api::{Api, DEFAULT_BASE_URL};
pub use models::{ApiMessage, Envelope, Record, RecordType, ResultInfo, Zone};
