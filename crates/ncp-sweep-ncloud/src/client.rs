//! Signed HTTP client for the NAVER Cloud API gateway

use crate::endpoints::ApiRequest;
use crate::error::{NcloudError, Result};
use crate::signer::{
    HEADER_ACCESS_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP, Signer, sign_path, timestamp_millis,
};
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One authenticated connection to the gateway.
pub struct NcloudClient {
    client: reqwest::Client,
    signer: Signer,
}

impl NcloudClient {
    pub fn new(signer: Signer) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, signer })
    }

    /// Send `request` and return the decoded JSON body.
    ///
    /// Anything other than HTTP 200 is an error carrying the raw body.
    /// An empty body decodes to `Value::Null`.
    pub async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = build_url(request)?;
        let timestamp = timestamp_millis();
        let signature = self
            .signer
            .sign(request.method.as_str(), sign_path(url.as_str()), &timestamp)?;

        debug!(method = %request.method, path = %sign_path(url.as_str()), "NCP request");

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(HEADER_TIMESTAMP, &timestamp)
            .header(HEADER_ACCESS_KEY, self.signer.access_key())
            .header(HEADER_SIGNATURE, signature)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != reqwest::StatusCode::OK {
            return Err(NcloudError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_body(&text)
    }
}

/// Full request URL with the query string encoded.
pub fn build_url(request: &ApiRequest) -> Result<Url> {
    let raw = format!("{}{}", request.service.base_url(), request.path);
    let mut url = Url::parse(&raw).map_err(|e| NcloudError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !request.params.is_empty() {
        url.query_pairs_mut().extend_pairs(&request.params);
    }
    Ok(url)
}

fn decode_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}
