use crate::errors::AppError;
use crate::models::{PersonDetails, PersonDetailsRequest};
use reqwest::{header, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// How much of a raw upstream body is written to debug logs.
const LOGGED_BODY_CHARS: usize = 500;

/// Result of a successful people-details call.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found(PersonDetails),
    NotFound,
}

/// Client for the SwitchTransact people API.
#[derive(Clone)]
pub struct SwitchTransactClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    probe_timeout: Duration,
}

impl SwitchTransactClient {
    /// Creates a new `SwitchTransactClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The SwitchTransact API base URL, without trailing slash.
    /// * `api_key` - Sent verbatim in the `Authorization` header.
    /// * `timeout` - Upper bound for a people-details call.
    /// * `probe_timeout` - Upper bound for the status probe.
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::MissingConfiguration(format!(
                    "Failed to create SwitchTransact client: {}",
                    e
                ))
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
            probe_timeout,
        })
    }

    /// Looks up a person and their subscriptions by national ID number.
    ///
    /// Makes exactly one request; nothing is retried.
    ///
    /// # Returns
    ///
    /// * `Ok(LookupOutcome::Found)` - 200 with a non-empty `record` object.
    /// * `Ok(LookupOutcome::NotFound)` - 200 without a usable `record`.
    /// * `Err(AppError)` - every other response or transport failure.
    pub async fn fetch_person_details(&self, id_number: &str) -> Result<LookupOutcome, AppError> {
        let url = format!("{}/workflow/people/details", self.base_url);
        tracing::info!("Looking up ID number {} at SwitchTransact: {}", id_number, url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, &self.api_key)
            .json(&PersonDetailsRequest::new(id_number))
            .send()
            .await
            .map_err(AppError::from_transport)?;

        let status = response.status();
        tracing::info!("SwitchTransact responded with {}", status);

        match status {
            StatusCode::OK => {
                let body = response.text().await.map_err(AppError::from_transport)?;
                tracing::debug!(
                    "SwitchTransact response body (first {} chars): {}",
                    LOGGED_BODY_CHARS,
                    body.chars().take(LOGGED_BODY_CHARS).collect::<String>()
                );

                let payload: Value = serde_json::from_str(&body).map_err(|e| {
                    AppError::UpstreamFormat(format!("Failed to parse response: {}", e))
                })?;
                let details = PersonDetails::from_payload(payload).map_err(|e| {
                    AppError::UpstreamFormat(format!("Failed to read record: {}", e))
                })?;

                match details {
                    Some(details) => {
                        tracing::info!(
                            "✓ Client record found for {} ({} subscriptions)",
                            id_number,
                            details.subscriptions.len()
                        );
                        Ok(LookupOutcome::Found(details))
                    }
                    None => {
                        tracing::info!("No client record found for {}", id_number);
                        Ok(LookupOutcome::NotFound)
                    }
                }
            }
            StatusCode::UNAUTHORIZED => Err(AppError::UpstreamAuth),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let message = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| {
                        body.get("message")
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                    })
                    .filter(|m| !m.trim().is_empty());
                Err(AppError::UpstreamValidation(message))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(AppError::UpstreamRateLimited),
            status if status.is_server_error() => Err(AppError::UpstreamServer(status.as_u16())),
            status => Err(AppError::UnexpectedStatus(status.as_u16())),
        }
    }

    /// Lightweight reachability check against the bank lookup list.
    ///
    /// Only used to seed the status tracker at startup.
    pub async fn probe(&self) -> Result<(), AppError> {
        let url = format!("{}/lookups", self.base_url);
        tracing::info!("Probing SwitchTransact API status: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("type", "Bank")])
            .header(header::AUTHORIZATION, &self.api_key)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(AppError::from_transport)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(AppError::UpstreamAuth),
            StatusCode::TOO_MANY_REQUESTS => Err(AppError::UpstreamRateLimited),
            status if status.is_server_error() => Err(AppError::UpstreamServer(status.as_u16())),
            status => Err(AppError::UnexpectedStatus(status.as_u16())),
        }
    }
}
