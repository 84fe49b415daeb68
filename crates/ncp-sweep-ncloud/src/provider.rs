//! `ResourceApi` and `SubAccountApi` over the signed gateway client

use crate::client::NcloudClient;
use crate::endpoints::{ApiRequest, Service, list_endpoint, operation_request};
use async_trait::async_trait;
use ncp_sweep_cloud::catalog::strip_nulls;
use ncp_sweep_cloud::{
    CloudError, Operation, PasswordReset, PasswordResetOutcome, Resource, ResourceApi,
    ResourceKind, Result, SubAccountApi, SubAccountPage, SubAccountUpdate,
};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

const SUB_ACCOUNTS_PATH: &str = "/api/v1/sub-accounts";

/// NAVER Cloud provider bound to one root account's keys.
pub struct NcloudProvider {
    client: NcloudClient,
}

impl NcloudProvider {
    pub fn new(client: NcloudClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceApi for NcloudProvider {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        let endpoint = list_endpoint(kind);
        let body = self.client.send(&endpoint.request()).await?;
        let records = endpoint.extract(body)?;
        debug!(kind = kind.filter_key(), count = records.len(), "Listed resources");

        records
            .into_iter()
            .map(|record| Resource::from_json(kind, record).map_err(CloudError::from))
            .collect()
    }

    async fn execute(&self, operation: &Operation) -> Result<()> {
        let request = operation_request(operation)?;
        self.client.send(&request).await?;
        info!(%operation, "NCP call succeeded");
        Ok(())
    }
}

#[async_trait]
impl SubAccountApi for NcloudProvider {
    async fn list_sub_accounts(&self, page: u32, page_size: u32) -> Result<SubAccountPage> {
        let request = ApiRequest::get(Service::SubAccount, SUB_ACCOUNTS_PATH)
            .param("pageSize", page_size.to_string())
            .param("page", page.to_string());
        let body = self.client.send(&request).await?;
        Ok(sub_account_page(body)?)
    }

    async fn update_sub_account(&self, id: &str, update: &SubAccountUpdate) -> Result<()> {
        let path = format!("{}/{}", SUB_ACCOUNTS_PATH, id);
        let request = ApiRequest::get(Service::SubAccount, path)
            .with_method(Method::PUT)
            .with_body(serde_json::to_value(update)?);
        self.client.send(&request).await?;
        Ok(())
    }

    async fn reset_password(
        &self,
        id: &str,
        reset: &PasswordReset,
    ) -> Result<PasswordResetOutcome> {
        let request = ApiRequest::get(
            Service::SubAccount,
            format!("{}/{}/password", SUB_ACCOUNTS_PATH, id),
        )
        .with_method(Method::PUT)
        .with_body(serde_json::to_value(reset)?);
        let body = self.client.send(&request).await?;
        Ok(password_outcome(body)?)
    }
}

fn sub_account_page(mut body: Value) -> serde_json::Result<SubAccountPage> {
    strip_nulls(&mut body);
    serde_json::from_value(body)
}

/// A 200 with no body counts as success.
fn password_outcome(body: Value) -> serde_json::Result<PasswordResetOutcome> {
    match body {
        Value::Null => Ok(PasswordResetOutcome {
            success: true,
            generated_password: None,
        }),
        other => serde_json::from_value(other),
    }
}
