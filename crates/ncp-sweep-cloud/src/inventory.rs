//! Per-account resource inventory and the collector that fills it

use crate::api::ResourceApi;
use crate::catalog::{Resource, ResourceKind};
use crate::error::CloudError;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Snapshot of one account's resources, keyed by kind.
///
/// Every kind is always present; kinds with nothing listed hold an empty
/// sequence. Each sequence keeps the provider's listing order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInventory {
    items: BTreeMap<ResourceKind, Vec<Resource>>,
}

impl Default for ResourceInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceInventory {
    pub fn new() -> Self {
        let items = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, Vec::new()))
            .collect();
        Self { items }
    }

    /// Replace the sequence for `kind`.
    pub fn set(&mut self, kind: ResourceKind, resources: Vec<Resource>) {
        debug_assert!(resources.iter().all(|r| r.kind() == kind));
        self.items.insert(kind, resources);
    }

    /// Append one resource under its own kind.
    pub fn push(&mut self, resource: Resource) {
        self.items.entry(resource.kind()).or_default().push(resource);
    }

    pub fn get(&self, kind: ResourceKind) -> &[Resource] {
        self.items.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Keep only the resources of `kind` for which `keep` returns true.
    pub fn retain<F>(&mut self, kind: ResourceKind, keep: F)
    where
        F: FnMut(&Resource) -> bool,
    {
        if let Some(resources) = self.items.get_mut(&kind) {
            resources.retain(keep);
        }
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.get(kind).len()
    }

    pub fn total_count(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Iterate kinds in collection order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &[Resource])> {
        ResourceKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }

    /// One line like `Server 2, Block storage 3, VPC 1`, or `no resources`.
    pub fn summary_line(&self) -> String {
        let parts: Vec<String> = self
            .iter()
            .filter(|(_, resources)| !resources.is_empty())
            .map(|(kind, resources)| format!("{} {}", kind.label(), resources.len()))
            .collect();
        if parts.is_empty() {
            "no resources".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// A list call that failed for one kind.
#[derive(Debug)]
pub struct CollectError {
    pub kind: ResourceKind,
    pub error: CloudError,
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.error)
    }
}

/// List every kind from `api`.
///
/// A failed kind stays empty and is reported in the returned error list;
/// the remaining kinds are still fetched.
pub async fn collect<A>(api: &A) -> (ResourceInventory, Vec<CollectError>)
where
    A: ResourceApi + ?Sized,
{
    let mut inventory = ResourceInventory::new();
    let mut errors = Vec::new();

    for kind in ResourceKind::ALL {
        match api.list(kind).await {
            Ok(resources) => {
                debug!(kind = %kind, count = resources.len(), "Listed resources");
                inventory.set(kind, resources);
            }
            Err(error) => {
                warn!(kind = %kind, error = %error, "Failed to list resources");
                errors.push(CollectError { kind, error });
            }
        }
    }

    (inventory, errors)
}
