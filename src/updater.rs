//! Keeping a DNS record pointed at this host's public address

use std::{future::Future, net::IpAddr, time::Duration};

use reqwest::Client;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{error, info, warn};

use crate::{
    Error, Result,
    cloudflare::{Api, Record, RecordType},
    config::UpdaterConfig,
    resolver::{self, resolver_client},
};

/// Pause between two attempts while the network is unreachable
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Periodically compares the public address of this host with a DNS record
/// and rewrites the record when they differ
#[derive(Debug)]
pub struct Updater {
    api: Api,
    resolver: Client,
    resolver_url: String,
    interval: Duration,
    zone_id: String,
    record_type: RecordType,
    record: Record,
    published: Option<IpAddr>,
}

impl Updater {
    /// Finds the zone and the record to maintain.
    ///
    /// Keeps retrying while the API is unreachable.
    ///
    /// # Errors
    ///
    /// Any other failure to find the zone or the record.
    pub async fn connect(config: &UpdaterConfig) -> Result<Self> {
        let api = match &config.cloudflare.api_base_url {
            Some(base_url) => Api::with_base_url(&config.cloudflare.token, base_url)?,
            None => Api::new(&config.cloudflare.token)?,
        };

        let zone = retry("zone lookup", || api.zone(&config.cloudflare.zone)).await?;
        let record = retry("record lookup", || {
            api.record(
                &zone.id,
                &config.cloudflare.record,
                config.cloudflare.record_type,
            )
        })
        .await?;

        let published = record.content.parse().ok();
        info!(record = %record.name, content = %record.content, "tracking record");

        Ok(Self {
            api,
            resolver: resolver_client(resolver::DEFAULT_TIMEOUT)?,
            resolver_url: config.public_ip_resolver.clone(),
            interval: config.check_interval(),
            zone_id: zone.id,
            record_type: config.cloudflare.record_type,
            record,
            published,
        })
    }

    /// The address the record currently points to, if it holds one
    pub fn published(&self) -> Option<IpAddr> {
        self.published
    }

    /// Looks up the public address and updates the record if it changed.
    ///
    /// Returns whether the record was updated.
    ///
    /// # Errors
    ///
    /// The lookup or the update failed, or the address doesn't fit the
    /// record type; the record is left as it was.
    pub async fn check(&mut self) -> Result<bool> {
        let current = resolver::outbound_ip(&self.resolver, &self.resolver_url).await?;
        if current.is_ipv4() != (self.record_type == RecordType::A) {
            return Err(Error::AddressFamily {
                ip: current,
                record_type: self.record_type,
            });
        }
        if self.published == Some(current) {
            info!(record = %self.record.name, ip = %current, "record is up to date");
            return Ok(false);
        }

        info!(record = %self.record.name, ip = %current, "updating record");
        let mut update = self.record.clone();
        update.content = current.to_string();
        self.record = self.api.update_record(&self.zone_id, &update).await?;
        self.published = Some(current);
        Ok(true)
    }

    /// Checks right away, then on every interval until `shutdown` resolves.
    ///
    /// Failed checks are logged and retried on the next tick. A check still
    /// in flight when `shutdown` resolves is abandoned.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {}
            }
            tokio::select! {
                () = &mut shutdown => break,
                result = self.check() => {
                    if let Err(err) = result {
                        error!(%err, "check failed");
                    }
                }
            }
        }
        info!("updater stopped");
    }
}

async fn retry<T, F, Fut>(what: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    loop {
        match call().await {
            Err(err) if err.is_transient() => {
                warn!(%err, "{what} failed, network unreachable, retrying");
                sleep(RETRY_DELAY).await;
            }
            result => return result,
        }
    }
}
