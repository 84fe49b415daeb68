use async_trait::async_trait;
use ncp_sweep_cloud::catalog::{
    AccessControlGroup, BlockStorage, LoadBalancer, NetworkAcl, PublicIp, RouteTable, Server,
    TargetGroup,
};
use ncp_sweep_cloud::{
    ApiFactory, Clock, CloudError, CommonCode, Operation, PasswordReset, PasswordResetOutcome,
    ProviderApi, Resource, ResourceApi, ResourceInventory, ResourceKind, Result, RootAccount,
    Route, SubAccount, SubAccountApi, SubAccountPage, SubAccountUpdate,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Something the code under test did, in the order it did it.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Call(Operation),
    Wait(Duration),
}

/// Shared, ordered record of provider calls and waits.
#[derive(Debug, Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<Event>>>);

#[allow(dead_code)]
impl Timeline {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Call(op) => Some(op),
                Event::Wait(_) => None,
            })
            .collect()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Wait(d) => Some(d),
                Event::Call(_) => None,
            })
            .collect()
    }

    /// Every id that appeared in any call.
    pub fn touched_ids(&self) -> Vec<String> {
        self.operations().iter().flat_map(ids_in).collect()
    }
}

pub fn ids_in(op: &Operation) -> Vec<String> {
    match op {
        Operation::Delete { id, .. } | Operation::DisassociatePublicIp(id) => vec![id.clone()],
        Operation::DeleteMany { ids, .. }
        | Operation::StopServers(ids)
        | Operation::TerminateServers(ids) => ids.clone(),
        Operation::RemoveRoute { route, .. } => vec![route.target_no.clone()],
    }
}

/// Records waits instead of sleeping.
pub struct RecordingClock {
    timeline: Timeline,
}

impl RecordingClock {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
        }
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.timeline.push(Event::Wait(duration));
    }
}

/// In-memory provider that records every mutating call.
#[derive(Default)]
pub struct FakeProvider {
    pub timeline: Timeline,
    resources: HashMap<ResourceKind, Vec<Resource>>,
    list_failures: HashSet<ResourceKind>,
    failing_ids: HashSet<String>,
    cancel_after: Option<(usize, CancellationToken)>,
    sub_accounts: Vec<SubAccount>,
    reported_total: Option<usize>,
    fail_sub_account_listing: bool,
    pub lists: Mutex<Vec<ResourceKind>>,
    pub pages: Mutex<Vec<u32>>,
    pub updates: Mutex<Vec<(String, SubAccountUpdate)>>,
    pub resets: Mutex<Vec<(String, PasswordReset)>>,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            ..Self::default()
        }
    }

    pub fn with(mut self, resource: Resource) -> Self {
        self.resources
            .entry(resource.kind())
            .or_default()
            .push(resource);
        self
    }

    pub fn fail_list(mut self, kind: ResourceKind) -> Self {
        self.list_failures.insert(kind);
        self
    }

    /// Calls that touch `id` fail.
    pub fn fail_id(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    /// Cancel `token` once `calls` mutating calls have been made.
    pub fn cancel_after(mut self, calls: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    pub fn with_sub_accounts(mut self, subs: Vec<SubAccount>) -> Self {
        self.sub_accounts = subs;
        self
    }

    /// Report this total regardless of how many sub-accounts exist.
    pub fn report_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
        self
    }

    pub fn fail_sub_account_listing(mut self) -> Self {
        self.fail_sub_account_listing = true;
        self
    }

    pub fn inventory(&self) -> ResourceInventory {
        let mut inventory = ResourceInventory::new();
        for (kind, resources) in &self.resources {
            inventory.set(*kind, resources.clone());
        }
        inventory
    }

    /// Kinds listed so far, in call order.
    pub fn list_calls(&self) -> Vec<ResourceKind> {
        self.lists.lock().unwrap().clone()
    }

    pub fn pages(&self) -> Vec<u32> {
        self.pages.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, SubAccountUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn resets(&self) -> Vec<(String, PasswordReset)> {
        self.resets.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceApi for FakeProvider {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        self.lists.lock().unwrap().push(kind);
        if self.list_failures.contains(&kind) {
            return Err(CloudError::HttpStatus {
                status: 500,
                body: format!("{} listing unavailable", kind.filter_key()),
            });
        }
        Ok(self.resources.get(&kind).cloned().unwrap_or_default())
    }

    async fn execute(&self, operation: &Operation) -> Result<()> {
        self.timeline.push(Event::Call(operation.clone()));

        if let Some((limit, token)) = &self.cancel_after {
            if self.timeline.operations().len() >= *limit {
                token.cancel();
            }
        }

        if ids_in(operation).iter().any(|id| self.failing_ids.contains(id)) {
            return Err(CloudError::ApiError("simulated failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SubAccountApi for FakeProvider {
    async fn list_sub_accounts(&self, page: u32, page_size: u32) -> Result<SubAccountPage> {
        self.pages.lock().unwrap().push(page);
        if self.fail_sub_account_listing {
            return Err(CloudError::HttpStatus {
                status: 401,
                body: "unauthorized".to_string(),
            });
        }
        let start = (page * page_size) as usize;
        let end = (start + page_size as usize).min(self.sub_accounts.len());
        let items = if start < end {
            self.sub_accounts[start..end].to_vec()
        } else {
            Vec::new()
        };
        Ok(SubAccountPage {
            items,
            total_items: self.reported_total.unwrap_or(self.sub_accounts.len()),
        })
    }

    async fn update_sub_account(&self, id: &str, update: &SubAccountUpdate) -> Result<()> {
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), update.clone()));
        if self.failing_ids.contains(id) {
            return Err(CloudError::ApiError("simulated failure".to_string()));
        }
        Ok(())
    }

    async fn reset_password(
        &self,
        id: &str,
        request: &PasswordReset,
    ) -> Result<PasswordResetOutcome> {
        self.resets
            .lock()
            .unwrap()
            .push((id.to_string(), request.clone()));
        Ok(PasswordResetOutcome {
            success: true,
            generated_password: request
                .need_password_generate
                .then(|| "Gen3rated!".to_string()),
        })
    }
}

/// Hands out pre-built fakes by account name.
#[derive(Default)]
pub struct FakeFactory {
    providers: HashMap<String, Arc<FakeProvider>>,
}

#[allow(dead_code)]
impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, account: &str, provider: FakeProvider) -> Self {
        self.providers
            .insert(account.to_string(), Arc::new(provider));
        self
    }

    pub fn provider(&self, account: &str) -> Arc<FakeProvider> {
        self.providers[account].clone()
    }
}

impl ApiFactory for FakeFactory {
    fn connect(&self, account: &RootAccount) -> Result<Arc<dyn ProviderApi>> {
        match self.providers.get(&account.account_name) {
            Some(provider) => Ok(provider.clone() as Arc<dyn ProviderApi>),
            None => Err(CloudError::AuthenticationFailed(format!(
                "no credentials for {}",
                account.account_name
            ))),
        }
    }
}

#[allow(dead_code)]
pub fn server(id: &str, status: &str) -> Resource {
    Resource::Server(Server {
        instance_no: id.to_string(),
        name: format!("srv-{}", id),
        status: CommonCode::new(status),
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn block_storage(id: &str, basic: bool) -> Resource {
    Resource::BlockStorage(BlockStorage {
        instance_no: id.to_string(),
        disk_detail_type: CommonCode::new(if basic { "BASIC" } else { "DATA" }),
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn load_balancer(id: &str) -> Resource {
    Resource::LoadBalancer(LoadBalancer {
        instance_no: id.to_string(),
        name: format!("lb-{}", id),
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn target_group(id: &str, load_balancer: &str) -> Resource {
    Resource::TargetGroup(TargetGroup {
        target_group_no: id.to_string(),
        name: format!("tg-{}", id),
        load_balancer_instance_nos: vec![load_balancer.to_string()],
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn acg(id: &str, is_default: bool) -> Resource {
    Resource::AccessControlGroup(AccessControlGroup {
        acg_no: id.to_string(),
        name: format!("acg-{}", id),
        is_default,
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn network_acl(id: &str, is_default: bool) -> Resource {
    Resource::NetworkAcl(NetworkAcl {
        network_acl_no: id.to_string(),
        name: format!("nacl-{}", id),
        is_default,
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn public_ip(id: &str, server: Option<&str>) -> Resource {
    Resource::PublicIp(PublicIp {
        instance_no: id.to_string(),
        address: format!("198.51.100.{}", id.len()),
        server_instance_no: server.unwrap_or_default().to_string(),
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn route(target_no: &str, target_type: &str) -> Route {
    Route {
        destination_cidr_block: "0.0.0.0/0".to_string(),
        target_name: format!("target-{}", target_no),
        target_no: target_no.to_string(),
        target_type: CommonCode::new(target_type),
    }
}

#[allow(dead_code)]
pub fn route_table(id: &str, routes: Vec<Route>) -> Resource {
    Resource::RouteTable(RouteTable {
        route_table_no: id.to_string(),
        name: format!("rt-{}", id),
        routes,
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn sub_account(id: &str, login: &str, active: bool) -> SubAccount {
    SubAccount {
        id: id.to_string(),
        login_id: login.to_string(),
        name: login.to_string(),
        active,
        ..Default::default()
    }
}
