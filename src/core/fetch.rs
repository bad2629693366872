use crate::config::StoreConfig;
use crate::utils::error::{ContentError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// GET one collection document and parse it into its typed wire shape.
///
/// Transport errors and non-2xx statuses are retried up to the configured
/// attempt budget, waiting `retry_delay * attempt` between tries. A payload
/// that fails schema parsing is deterministic and fails immediately.
pub(crate) async fn fetch_collection<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    collection: &'static str,
    config: &StoreConfig,
) -> Result<T> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match try_fetch::<T>(client, url, collection, config).await {
            Ok(document) => {
                tracing::debug!(collection, attempt, "fetched collection document");
                return Ok(document);
            }
            Err(err @ ContentError::InvalidPayload { .. }) => {
                tracing::error!(collection, error = %err, "collection document failed validation");
                return Err(err);
            }
            Err(err) if attempt >= config.retry_attempts => {
                tracing::warn!(collection, attempts = attempt, error = %err, "fetch retries exhausted");
                return Err(err);
            }
            Err(err) => {
                let delay = config.retry_delay * attempt;
                tracing::debug!(
                    collection,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn try_fetch<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    collection: &'static str,
    config: &StoreConfig,
) -> Result<T> {
    let mut request = client.get(url);
    if let Some(timeout) = config.request_timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await?.error_for_status()?;
    let body = response.bytes().await?;

    serde_json::from_slice(&body).map_err(|source| ContentError::InvalidPayload {
        collection,
        source,
    })
}
