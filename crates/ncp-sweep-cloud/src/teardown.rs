//! Ordered teardown of an account's resources
//!
//! Resources are deleted in a fixed sequence of phases so that nothing is
//! removed while something else still references it. Some phases are
//! followed by a wait because the provider finishes those deletions
//! asynchronously.
//!
//! Every call is independent: a failure is counted and reported, and the
//! pipeline moves on to the next item. There are no retries; running again
//! against a freshly collected inventory picks up whatever is left.

use crate::api::{Operation, ResourceApi};
use crate::catalog::{Resource, ResourceKind};
use crate::clock::{self, Cancelled, Clock, TokioClock};
use crate::error::CloudError;
use crate::inventory::ResourceInventory;
use crate::progress::ProgressSink;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Pauses between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownTimings {
    pub kubernetes: Duration,
    pub auto_scaling: Duration,
    pub database: Duration,
    pub server_stop: Duration,
    pub server_terminate: Duration,
    pub nat_gateway: Duration,
    /// Between detaching a public IP and deleting it.
    pub public_ip_detach: Duration,
}

impl Default for TeardownTimings {
    fn default() -> Self {
        Self {
            kubernetes: Duration::from_secs(60),
            auto_scaling: Duration::from_secs(60),
            database: Duration::from_secs(30),
            server_stop: Duration::from_secs(30),
            server_terminate: Duration::from_secs(30),
            nat_gateway: Duration::from_secs(20),
            public_ip_detach: Duration::from_secs(3),
        }
    }
}

impl TeardownTimings {
    /// No waiting at all.
    pub fn none() -> Self {
        Self {
            kubernetes: Duration::ZERO,
            auto_scaling: Duration::ZERO,
            database: Duration::ZERO,
            server_stop: Duration::ZERO,
            server_terminate: Duration::ZERO,
            nat_gateway: Duration::ZERO,
            public_ip_detach: Duration::ZERO,
        }
    }
}

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    KubernetesClusters,
    AutoScalingGroups,
    LaunchConfigurations,
    Databases,
    LoadBalancers,
    TargetGroups,
    Servers,
    BlockStorageSnapshots,
    BlockStorages,
    NasVolumeSnapshots,
    NasVolumes,
    NatGateways,
    VpcPeerings,
    Routes,
    PublicIps,
    AccessControlGroups,
    NetworkAcls,
    Subnets,
    Vpcs,
    InitScripts,
    LoginKeys,
    PlacementGroups,
}

impl Phase {
    pub const ORDER: [Phase; 22] = [
        Phase::KubernetesClusters,
        Phase::AutoScalingGroups,
        Phase::LaunchConfigurations,
        Phase::Databases,
        Phase::LoadBalancers,
        Phase::TargetGroups,
        Phase::Servers,
        Phase::BlockStorageSnapshots,
        Phase::BlockStorages,
        Phase::NasVolumeSnapshots,
        Phase::NasVolumes,
        Phase::NatGateways,
        Phase::VpcPeerings,
        Phase::Routes,
        Phase::PublicIps,
        Phase::AccessControlGroups,
        Phase::NetworkAcls,
        Phase::Subnets,
        Phase::Vpcs,
        Phase::InitScripts,
        Phase::LoginKeys,
        Phase::PlacementGroups,
    ];

    /// Kinds consumed by this phase.
    pub fn kinds(self) -> &'static [ResourceKind] {
        match self {
            Phase::KubernetesClusters => &[ResourceKind::KubernetesCluster],
            Phase::AutoScalingGroups => &[ResourceKind::AutoScalingGroup],
            Phase::LaunchConfigurations => &[ResourceKind::LaunchConfiguration],
            Phase::Databases => &ResourceKind::DATABASES,
            Phase::LoadBalancers => &[ResourceKind::LoadBalancer],
            Phase::TargetGroups => &[ResourceKind::TargetGroup],
            Phase::Servers => &[ResourceKind::Server],
            Phase::BlockStorageSnapshots => &[ResourceKind::BlockStorageSnapshot],
            Phase::BlockStorages => &[ResourceKind::BlockStorage],
            Phase::NasVolumeSnapshots => &[ResourceKind::NasVolumeSnapshot],
            Phase::NasVolumes => &[ResourceKind::NasVolume],
            Phase::NatGateways => &[ResourceKind::NatGateway],
            Phase::VpcPeerings => &[ResourceKind::VpcPeering],
            Phase::Routes => &[ResourceKind::RouteTable],
            Phase::PublicIps => &[ResourceKind::PublicIp],
            Phase::AccessControlGroups => &[ResourceKind::AccessControlGroup],
            Phase::NetworkAcls => &[ResourceKind::NetworkAcl],
            Phase::Subnets => &[ResourceKind::Subnet],
            Phase::Vpcs => &[ResourceKind::Vpc],
            Phase::InitScripts => &[ResourceKind::InitScript],
            Phase::LoginKeys => &[ResourceKind::LoginKey],
            Phase::PlacementGroups => &[ResourceKind::PlacementGroup],
        }
    }

    /// Position in [`Phase::ORDER`].
    pub fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|p| *p == self)
            .unwrap_or(Self::ORDER.len())
    }

    /// The phase that deletes `kind`.
    pub fn of(kind: ResourceKind) -> Option<Phase> {
        Self::ORDER.into_iter().find(|p| p.kinds().contains(&kind))
    }
}

/// Counters for one teardown run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownResult {
    pub succeeded: usize,
    pub failed: usize,
    /// The run stopped early on the cancellation token.
    pub cancelled: bool,
}

impl TeardownResult {
    pub fn attempts(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn merge(&mut self, other: &TeardownResult) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.cancelled |= other.cancelled;
    }
}

enum Outcome {
    Done,
    Failed(CloudError),
    DryRun,
}

struct RunState<'p> {
    progress: &'p dyn ProgressSink,
    result: TeardownResult,
}

impl RunState<'_> {
    async fn emit(&self, line: String) {
        self.progress.emit(line).await;
    }
}

/// Drives the phases against one account.
pub struct Teardown<'a, A: ?Sized> {
    api: &'a A,
    clock: &'a dyn Clock,
    timings: TeardownTimings,
    cancel: CancellationToken,
    dry_run: bool,
}

impl<'a, A> Teardown<'a, A>
where
    A: ResourceApi + ?Sized,
{
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            clock: &TokioClock,
            timings: TeardownTimings::default(),
            cancel: CancellationToken::new(),
            dry_run: false,
        }
    }

    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timings(mut self, timings: TeardownTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Report what would be called without calling anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run every phase in order and return the tally.
    pub async fn run(
        &self,
        inventory: &ResourceInventory,
        progress: &dyn ProgressSink,
    ) -> TeardownResult {
        let mut state = RunState {
            progress,
            result: TeardownResult::default(),
        };

        for phase in Phase::ORDER {
            if self.run_phase(phase, inventory, &mut state).await.is_err() {
                state.result.cancelled = true;
                info!(phase = ?phase, "Teardown cancelled");
                state
                    .emit("■ cancelled, remaining phases skipped".to_string())
                    .await;
                break;
            }
        }

        debug!(
            succeeded = state.result.succeeded,
            failed = state.result.failed,
            "Teardown finished"
        );
        state.result
    }

    async fn run_phase(
        &self,
        phase: Phase,
        inventory: &ResourceInventory,
        state: &mut RunState<'_>,
    ) -> Result<(), Cancelled> {
        let all = |kind| inventory.get(kind).iter().collect::<Vec<_>>();

        match phase {
            Phase::KubernetesClusters => {
                let n = self
                    .delete_each(
                        ResourceKind::KubernetesCluster,
                        all(ResourceKind::KubernetesCluster),
                        state,
                    )
                    .await?;
                self.settle(self.timings.kubernetes, n, "cluster deletion", state)
                    .await
            }
            Phase::AutoScalingGroups => {
                let n = self
                    .delete_each(
                        ResourceKind::AutoScalingGroup,
                        all(ResourceKind::AutoScalingGroup),
                        state,
                    )
                    .await?;
                self.settle(self.timings.auto_scaling, n, "scaled servers to terminate", state)
                    .await
            }
            Phase::Databases => {
                let mut attempted = 0;
                for kind in ResourceKind::DATABASES {
                    attempted += self.delete_each(kind, all(kind), state).await?;
                }
                self.settle(self.timings.database, attempted, "database deletion", state)
                    .await
            }
            Phase::Servers => self.teardown_servers(inventory, state).await,
            Phase::BlockStorageSnapshots => {
                let ids = ids_of(inventory.get(ResourceKind::BlockStorageSnapshot).iter());
                self.delete_bulk(ResourceKind::BlockStorageSnapshot, ids, state)
                    .await
                    .map(drop)
            }
            Phase::BlockStorages => {
                let ids = ids_of(inventory.get(ResourceKind::BlockStorage).iter().filter(
                    |r| !matches!(r, Resource::BlockStorage(bs) if bs.is_basic()),
                ));
                self.delete_bulk(ResourceKind::BlockStorage, ids, state)
                    .await
                    .map(drop)
            }
            Phase::NatGateways => {
                let n = self
                    .delete_each(ResourceKind::NatGateway, all(ResourceKind::NatGateway), state)
                    .await?;
                self.settle(self.timings.nat_gateway, n, "NAT gateway deletion", state)
                    .await
            }
            Phase::Routes => self.remove_routes(inventory, state).await,
            Phase::PublicIps => self.teardown_public_ips(inventory, state).await,
            Phase::AccessControlGroups => {
                let items = inventory
                    .get(ResourceKind::AccessControlGroup)
                    .iter()
                    .filter(|r| !matches!(r, Resource::AccessControlGroup(acg) if acg.is_default))
                    .collect();
                self.delete_each(ResourceKind::AccessControlGroup, items, state)
                    .await
                    .map(drop)
            }
            Phase::NetworkAcls => {
                let items = inventory
                    .get(ResourceKind::NetworkAcl)
                    .iter()
                    .filter(|r| !matches!(r, Resource::NetworkAcl(acl) if acl.is_default))
                    .collect();
                self.delete_each(ResourceKind::NetworkAcl, items, state)
                    .await
                    .map(drop)
            }
            Phase::InitScripts => {
                let ids = ids_of(inventory.get(ResourceKind::InitScript).iter());
                self.delete_bulk(ResourceKind::InitScript, ids, state)
                    .await
                    .map(drop)
            }
            Phase::LoginKeys => {
                let ids = ids_of(inventory.get(ResourceKind::LoginKey).iter());
                self.delete_bulk(ResourceKind::LoginKey, ids, state)
                    .await
                    .map(drop)
            }
            Phase::LaunchConfigurations
            | Phase::LoadBalancers
            | Phase::TargetGroups
            | Phase::NasVolumeSnapshots
            | Phase::NasVolumes
            | Phase::VpcPeerings
            | Phase::Subnets
            | Phase::Vpcs
            | Phase::PlacementGroups => {
                for &kind in phase.kinds() {
                    self.delete_each(kind, all(kind), state).await?;
                }
                Ok(())
            }
        }
    }

    /// Stop the running servers, then terminate all of them.
    async fn teardown_servers(
        &self,
        inventory: &ResourceInventory,
        state: &mut RunState<'_>,
    ) -> Result<(), Cancelled> {
        let servers: Vec<_> = inventory
            .get(ResourceKind::Server)
            .iter()
            .filter_map(|r| match r {
                Resource::Server(s) => Some(s),
                _ => None,
            })
            .collect();
        if servers.is_empty() {
            return Ok(());
        }
        self.header(ResourceKind::Server.label(), servers.len(), state)
            .await;

        let running: Vec<String> = servers
            .iter()
            .filter(|s| s.is_running())
            .map(|s| s.instance_no.clone())
            .collect();
        if !running.is_empty() {
            let count = running.len();
            let stop = Operation::StopServers(running);
            match self.call(&stop).await? {
                Outcome::Done => {
                    state
                        .emit(format!("  ✓ stop requested for {} running server(s)", count))
                        .await;
                }
                Outcome::Failed(e) => {
                    warn!(error = %e, "Server stop failed, terminating anyway");
                    state
                        .emit(format!("  ! stop failed, terminating anyway: {}", e))
                        .await;
                }
                Outcome::DryRun => state.emit(format!("  · would {}", stop)).await,
            }
            let issued = usize::from(!self.dry_run);
            self.settle(self.timings.server_stop, issued, "servers to stop", state)
                .await?;
        }

        let ids: Vec<String> = servers.iter().map(|s| s.instance_no.clone()).collect();
        let subject = format!("terminate [{}]", ids.join(", "));
        let attempted = self
            .record(&Operation::TerminateServers(ids), subject, state)
            .await?;
        self.settle(self.timings.server_terminate, usize::from(attempted), "servers to terminate", state)
            .await
    }

    /// Remove NAT gateway and VPC peering routes from every route table.
    async fn remove_routes(
        &self,
        inventory: &ResourceInventory,
        state: &mut RunState<'_>,
    ) -> Result<(), Cancelled> {
        let routes: Vec<_> = inventory
            .get(ResourceKind::RouteTable)
            .iter()
            .filter_map(|r| match r {
                Resource::RouteTable(table) => Some(table),
                _ => None,
            })
            .flat_map(|table| {
                table
                    .routes
                    .iter()
                    .filter(|route| route.is_removable())
                    .map(move |route| (table, route))
            })
            .collect();
        if routes.is_empty() {
            return Ok(());
        }
        self.header("Routes", routes.len(), state).await;

        for (table, route) in routes {
            let table_name = if table.name.is_empty() {
                &table.route_table_no
            } else {
                &table.name
            };
            let subject = format!(
                "route {} -> {} in {}",
                route.destination_cidr_block, route.target_name, table_name
            );
            let op = Operation::RemoveRoute {
                route_table_no: table.route_table_no.clone(),
                route: route.clone(),
            };
            self.record(&op, subject, state).await?;
        }
        Ok(())
    }

    /// Detach (best effort) and delete each public IP.
    async fn teardown_public_ips(
        &self,
        inventory: &ResourceInventory,
        state: &mut RunState<'_>,
    ) -> Result<(), Cancelled> {
        let ips = inventory.get(ResourceKind::PublicIp);
        if ips.is_empty() {
            return Ok(());
        }
        self.header(ResourceKind::PublicIp.label(), ips.len(), state)
            .await;

        for resource in ips {
            if let Resource::PublicIp(ip) = resource {
                if ip.is_associated() {
                    let detach = Operation::DisassociatePublicIp(ip.instance_no.clone());
                    match self.call(&detach).await? {
                        Outcome::Done => {
                            clock::wait(self.clock, &self.cancel, self.timings.public_ip_detach)
                                .await?;
                        }
                        Outcome::Failed(e) => {
                            warn!(id = %ip.instance_no, error = %e, "Public IP detach failed");
                            state
                                .emit(format!(
                                    "  ! detach {} failed, deleting anyway: {}",
                                    ip.address, e
                                ))
                                .await;
                        }
                        Outcome::DryRun => state.emit(format!("  · would {}", detach)).await,
                    }
                }
            }
            let op = Operation::Delete {
                kind: ResourceKind::PublicIp,
                id: resource.id().to_string(),
            };
            self.record(&op, resource.describe(), state).await?;
        }
        Ok(())
    }

    /// One delete call per item. Returns the number of calls issued.
    async fn delete_each(
        &self,
        kind: ResourceKind,
        items: Vec<&Resource>,
        state: &mut RunState<'_>,
    ) -> Result<usize, Cancelled> {
        if items.is_empty() {
            return Ok(0);
        }
        self.header(kind.label(), items.len(), state).await;

        let mut attempted = 0;
        for resource in items {
            let op = Operation::Delete {
                kind,
                id: resource.id().to_string(),
            };
            if self.record(&op, resource.describe(), state).await? {
                attempted += 1;
            }
        }
        Ok(attempted)
    }

    /// A single call for the whole kind, tallied per contained id.
    async fn delete_bulk(
        &self,
        kind: ResourceKind,
        ids: Vec<String>,
        state: &mut RunState<'_>,
    ) -> Result<usize, Cancelled> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.header(kind.label(), ids.len(), state).await;

        let subject = format!("{} [{}]", kind.label(), ids.join(", "));
        let count = ids.len();
        let attempted = self
            .record(&Operation::DeleteMany { kind, ids }, subject, state)
            .await?;
        Ok(if attempted { count } else { 0 })
    }

    /// Issue `op`, tally it and report the outcome. Returns whether a call
    /// was actually made.
    async fn record(
        &self,
        op: &Operation,
        subject: String,
        state: &mut RunState<'_>,
    ) -> Result<bool, Cancelled> {
        let count = op.item_count();
        match self.call(op).await? {
            Outcome::Done => {
                state.result.succeeded += count;
                state.emit(format!("  ✓ {}", subject)).await;
                Ok(true)
            }
            Outcome::Failed(e) => {
                state.result.failed += count;
                warn!(operation = %op, error = %e, "Teardown call failed");
                state.emit(format!("  ✗ {}: {}", subject, e)).await;
                Ok(true)
            }
            Outcome::DryRun => {
                state.emit(format!("  · would {}", op)).await;
                Ok(false)
            }
        }
    }

    async fn call(&self, op: &Operation) -> Result<Outcome, Cancelled> {
        if self.cancel.is_cancelled() {
            return Err(Cancelled);
        }
        if self.dry_run {
            return Ok(Outcome::DryRun);
        }
        debug!(operation = %op, "Calling provider");
        Ok(match self.api.execute(op).await {
            Ok(()) => Outcome::Done,
            Err(e) => Outcome::Failed(e),
        })
    }

    async fn header(&self, label: &str, count: usize, state: &RunState<'_>) {
        info!(phase = label, count, "Starting teardown phase");
        state.emit(format!("▶ {}: {}", label, count)).await;
    }

    /// Wait after a phase, but only if it issued at least one call.
    async fn settle(
        &self,
        duration: Duration,
        attempted: usize,
        reason: &str,
        state: &RunState<'_>,
    ) -> Result<(), Cancelled> {
        if attempted == 0 || duration.is_zero() {
            return Ok(());
        }
        state
            .emit(format!("  … waiting {}s for {}", duration.as_secs(), reason))
            .await;
        clock::wait(self.clock, &self.cancel, duration).await
    }
}

fn ids_of<'r>(resources: impl Iterator<Item = &'r Resource>) -> Vec<String> {
    resources.map(|r| r.id().to_string()).collect()
}
