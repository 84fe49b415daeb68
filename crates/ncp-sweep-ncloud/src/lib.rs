//! NAVER Cloud Platform provider for ncp-sweep
//!
//! Implements the `ncp-sweep-cloud` provider traits over the NCP API
//! gateway: HMAC-signed requests, the classic `vX/v2` action endpoints for
//! compute, storage, network and database resources, the Kubernetes REST
//! endpoint, and the sub-account management API.
//!
//! # Example
//!
//! ```ignore
//! use ncp_sweep_cloud::{ApiFactory, RootAccount, collect};
//! use ncp_sweep_ncloud::NcloudFactory;
//!
//! let account = RootAccount::new("lab-01", "ACCESS_KEY", "SECRET_KEY");
//! let api = NcloudFactory.connect(&account)?;
//! let (inventory, errors) = collect(api.as_ref()).await;
//! println!("{}", inventory.summary_line());
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod provider;
pub mod signer;

pub use client::NcloudClient;
pub use error::{NcloudError, Result};
pub use provider::NcloudProvider;
pub use signer::Signer;

use ncp_sweep_cloud::{ApiFactory, CloudError, ProviderApi, RootAccount};
use std::sync::Arc;

/// Connects root accounts to the live NCP gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct NcloudFactory;

impl ApiFactory for NcloudFactory {
    fn connect(&self, account: &RootAccount) -> ncp_sweep_cloud::Result<Arc<dyn ProviderApi>> {
        if account.access_key.trim().is_empty() || account.secret_key.trim().is_empty() {
            return Err(CloudError::AuthenticationFailed(format!(
                "{}: access key and secret key are required",
                account.account_name
            )));
        }

        let signer = Signer::new(account.access_key.trim(), account.secret_key.trim());
        let client = NcloudClient::new(signer)?;
        Ok(Arc::new(NcloudProvider::new(client)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_requires_keys() {
        let account = RootAccount::new("lab-01", "", "secret");
        let err = NcloudFactory.connect(&account).err().unwrap();
        assert!(matches!(err, CloudError::AuthenticationFailed(_)));
        assert!(err.to_string().contains("lab-01"));
    }

    #[test]
    fn test_connect_with_keys() {
        let account = RootAccount::new("lab-01", "AK", "SK");
        assert!(NcloudFactory.connect(&account).is_ok());
    }
}
