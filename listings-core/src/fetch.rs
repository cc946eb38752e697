use chrono::{NaiveDateTime, SubsecRound, Utc};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::feed::parse_feed;
use crate::listing::Listing;
use crate::sources::SourceEndpoint;

/// Fetches one source and normalizes its entries. Entries without a price
/// are skipped; only whole-source failures are errors.
pub async fn fetch_source(
    client: &Client,
    endpoint: &SourceEndpoint,
    config: &FetchConfig,
) -> Result<Vec<Listing>, FetchError> {
    let url = Url::parse(&endpoint.url)?;
    let body = fetch_with_retry(client, &url, config).await?;
    let entries = parse_feed(&body)?;

    let fetched_at = fetch_time();
    let listings: Vec<Listing> = entries
        .iter()
        .filter_map(|entry| Listing::from_entry(entry, fetched_at))
        .collect();

    debug!(
        area = %endpoint.area,
        entries = entries.len(),
        listings = listings.len(),
        "source parsed"
    );
    Ok(listings)
}

/// Fallback `posted` value, kept to microsecond precision.
fn fetch_time() -> NaiveDateTime {
    Utc::now().trunc_subsecs(6).naive_utc()
}

async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    config: &FetchConfig,
) -> Result<Vec<u8>, FetchError> {
    let mut attempt = 0u8;
    loop {
        match fetch_once(client, url, config).await {
            Ok(body) => return Ok(body),
            Err(err) if err.is_retryable() && attempt < config.retry_attempts => {
                attempt += 1;
                debug!(url = %url, attempt, error = %err, "retrying source");
                tokio::time::sleep(config.backoff(attempt)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn fetch_once(client: &Client, url: &Url, config: &FetchConfig) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url.clone())
        .timeout(config.request_timeout())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
