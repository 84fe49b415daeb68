//! Provider traits
//!
//! The collector, the teardown pipeline and the batch runner only talk to
//! the cloud through these traits. `ncp-sweep-ncloud` implements them over
//! signed HTTP; tests implement them with recording fakes.

use crate::account::RootAccount;
use crate::catalog::{Resource, ResourceKind, Route};
use crate::error::Result;
use crate::subaccount::{PasswordReset, PasswordResetOutcome, SubAccountPage, SubAccountUpdate};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A single mutating call against the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Delete one resource by id.
    Delete { kind: ResourceKind, id: String },
    /// Delete several resources of one kind in a single call.
    DeleteMany { kind: ResourceKind, ids: Vec<String> },
    StopServers(Vec<String>),
    TerminateServers(Vec<String>),
    DisassociatePublicIp(String),
    RemoveRoute { route_table_no: String, route: Route },
}

impl Operation {
    /// Number of items this call acts on, as counted in the teardown tally.
    pub fn item_count(&self) -> usize {
        match self {
            Operation::DeleteMany { ids, .. }
            | Operation::StopServers(ids)
            | Operation::TerminateServers(ids) => ids.len(),
            _ => 1,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete { kind, id } => write!(f, "delete {} {}", kind.label(), id),
            Operation::DeleteMany { kind, ids } => {
                write!(f, "delete {} [{}]", kind.label(), ids.join(", "))
            }
            Operation::StopServers(ids) => write!(f, "stop servers [{}]", ids.join(", ")),
            Operation::TerminateServers(ids) => {
                write!(f, "terminate servers [{}]", ids.join(", "))
            }
            Operation::DisassociatePublicIp(id) => write!(f, "disassociate public IP {}", id),
            Operation::RemoveRoute {
                route_table_no,
                route,
            } => write!(
                f,
                "remove route {} -> {} from {}",
                route.destination_cidr_block, route.target_name, route_table_no
            ),
        }
    }
}

/// Listing and mutating cloud resources for one account.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// List every resource of `kind`, in the provider's order.
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>>;

    /// Issue one mutating call.
    async fn execute(&self, operation: &Operation) -> Result<()>;
}

/// Sub-account administration for one root account.
#[async_trait]
pub trait SubAccountApi: Send + Sync {
    /// Fetch one page, `page` starting at 0.
    async fn list_sub_accounts(&self, page: u32, page_size: u32) -> Result<SubAccountPage>;

    async fn update_sub_account(&self, id: &str, update: &SubAccountUpdate) -> Result<()>;

    async fn reset_password(&self, id: &str, request: &PasswordReset)
    -> Result<PasswordResetOutcome>;
}

/// Everything the batch runner needs from one authenticated account.
pub trait ProviderApi: ResourceApi + SubAccountApi {}

impl<T: ResourceApi + SubAccountApi> ProviderApi for T {}

/// Builds an authenticated provider handle per root account.
pub trait ApiFactory: Send + Sync {
    fn connect(&self, account: &RootAccount) -> Result<Arc<dyn ProviderApi>>;
}
