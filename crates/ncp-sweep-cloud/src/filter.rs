//! Include/exclude filtering of an inventory
//!
//! Matching is exact and case-sensitive against both the name and the id of
//! a resource, so a filter entry can name either.

use crate::catalog::{Resource, ResourceKind};
use crate::inventory::ResourceInventory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Filter block for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceFilter {
    /// A disabled kind is treated as absent.
    pub enabled: bool,
    /// Names or ids to keep; empty keeps everything.
    pub include: BTreeSet<String>,
    /// Names or ids to drop, applied after `include`.
    pub exclude: BTreeSet<String>,
}

impl Default for ResourceFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            include: BTreeSet::new(),
            exclude: BTreeSet::new(),
        }
    }
}

impl ResourceFilter {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn include<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(entries.into_iter().map(Into::into));
        self
    }

    pub fn exclude<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(entries.into_iter().map(Into::into));
        self
    }

    pub fn matches(&self, name: &str, id: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let listed = |set: &BTreeSet<String>| set.contains(name) || set.contains(id);
        if !self.include.is_empty() && !listed(&self.include) {
            return false;
        }
        !listed(&self.exclude)
    }
}

/// Filter blocks keyed by resource kind. Kinds without a block pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: BTreeMap<ResourceKind, ResourceFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ResourceKind, filter: ResourceFilter) -> Self {
        self.filters.insert(kind, filter);
        self
    }

    pub fn insert(&mut self, kind: ResourceKind, filter: ResourceFilter) {
        self.filters.insert(kind, filter);
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&ResourceFilter> {
        self.filters.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        match self.filters.get(&resource.kind()) {
            Some(filter) => filter.matches(resource.name(), resource.id()),
            None => true,
        }
    }

    /// Narrow every kind of `inventory` to the resources that match.
    pub fn apply(&self, inventory: &mut ResourceInventory) {
        for (kind, filter) in &self.filters {
            inventory.retain(*kind, |r| filter.matches(r.name(), r.id()));
        }
    }
}
