//! Resource catalog
//!
//! Typed records for every resource kind ncp-sweep knows how to find and
//! delete, plus the [`ResourceKind`] tag that ties them to filter keys,
//! display labels and deletion prerequisites.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every resource kind handled by the collector and the teardown pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "servers")]
    Server,
    #[serde(rename = "block_storages")]
    BlockStorage,
    #[serde(rename = "block_storage_snapshots")]
    BlockStorageSnapshot,
    #[serde(rename = "public_ips")]
    PublicIp,
    #[serde(rename = "nas_volumes")]
    NasVolume,
    #[serde(rename = "nas_volume_snapshots")]
    NasVolumeSnapshot,
    #[serde(rename = "load_balancers")]
    LoadBalancer,
    #[serde(rename = "target_groups")]
    TargetGroup,
    #[serde(rename = "cloud_dbs")]
    CloudDb,
    #[serde(rename = "cloud_postgresqls")]
    CloudPostgresql,
    #[serde(rename = "cloud_mongodbs")]
    CloudMongoDb,
    #[serde(rename = "cloud_mariadbs")]
    CloudMariaDb,
    #[serde(rename = "cloud_mysqls")]
    CloudMysql,
    #[serde(rename = "cloud_redises")]
    CloudRedis,
    #[serde(rename = "vpcs")]
    Vpc,
    #[serde(rename = "subnets")]
    Subnet,
    #[serde(rename = "nat_gateways")]
    NatGateway,
    #[serde(rename = "vpc_peerings")]
    VpcPeering,
    #[serde(rename = "network_acls")]
    NetworkAcl,
    #[serde(rename = "route_tables")]
    RouteTable,
    #[serde(rename = "access_control_groups")]
    AccessControlGroup,
    #[serde(rename = "auto_scaling_groups")]
    AutoScalingGroup,
    #[serde(rename = "launch_configurations")]
    LaunchConfiguration,
    #[serde(rename = "nks_clusters")]
    KubernetesCluster,
    #[serde(rename = "init_scripts")]
    InitScript,
    #[serde(rename = "login_keys")]
    LoginKey,
    #[serde(rename = "placement_groups")]
    PlacementGroup,
}

impl ResourceKind {
    /// All kinds, in the order the inventory collector lists them.
    pub const ALL: [ResourceKind; 27] = [
        ResourceKind::Server,
        ResourceKind::BlockStorage,
        ResourceKind::BlockStorageSnapshot,
        ResourceKind::PublicIp,
        ResourceKind::NasVolume,
        ResourceKind::NasVolumeSnapshot,
        ResourceKind::LoadBalancer,
        ResourceKind::TargetGroup,
        ResourceKind::CloudDb,
        ResourceKind::CloudPostgresql,
        ResourceKind::CloudMongoDb,
        ResourceKind::CloudMariaDb,
        ResourceKind::CloudMysql,
        ResourceKind::CloudRedis,
        ResourceKind::Vpc,
        ResourceKind::Subnet,
        ResourceKind::NatGateway,
        ResourceKind::VpcPeering,
        ResourceKind::NetworkAcl,
        ResourceKind::RouteTable,
        ResourceKind::AccessControlGroup,
        ResourceKind::AutoScalingGroup,
        ResourceKind::LaunchConfiguration,
        ResourceKind::KubernetesCluster,
        ResourceKind::InitScript,
        ResourceKind::LoginKey,
        ResourceKind::PlacementGroup,
    ];

    /// The managed-database kinds, deleted together in one phase.
    pub const DATABASES: [ResourceKind; 6] = [
        ResourceKind::CloudDb,
        ResourceKind::CloudPostgresql,
        ResourceKind::CloudMongoDb,
        ResourceKind::CloudMariaDb,
        ResourceKind::CloudMysql,
        ResourceKind::CloudRedis,
    ];

    /// Key of this kind's block in the filter file.
    pub fn filter_key(self) -> &'static str {
        match self {
            ResourceKind::Server => "servers",
            ResourceKind::BlockStorage => "block_storages",
            ResourceKind::BlockStorageSnapshot => "block_storage_snapshots",
            ResourceKind::PublicIp => "public_ips",
            ResourceKind::NasVolume => "nas_volumes",
            ResourceKind::NasVolumeSnapshot => "nas_volume_snapshots",
            ResourceKind::LoadBalancer => "load_balancers",
            ResourceKind::TargetGroup => "target_groups",
            ResourceKind::CloudDb => "cloud_dbs",
            ResourceKind::CloudPostgresql => "cloud_postgresqls",
            ResourceKind::CloudMongoDb => "cloud_mongodbs",
            ResourceKind::CloudMariaDb => "cloud_mariadbs",
            ResourceKind::CloudMysql => "cloud_mysqls",
            ResourceKind::CloudRedis => "cloud_redises",
            ResourceKind::Vpc => "vpcs",
            ResourceKind::Subnet => "subnets",
            ResourceKind::NatGateway => "nat_gateways",
            ResourceKind::VpcPeering => "vpc_peerings",
            ResourceKind::NetworkAcl => "network_acls",
            ResourceKind::RouteTable => "route_tables",
            ResourceKind::AccessControlGroup => "access_control_groups",
            ResourceKind::AutoScalingGroup => "auto_scaling_groups",
            ResourceKind::LaunchConfiguration => "launch_configurations",
            ResourceKind::KubernetesCluster => "nks_clusters",
            ResourceKind::InitScript => "init_scripts",
            ResourceKind::LoginKey => "login_keys",
            ResourceKind::PlacementGroup => "placement_groups",
        }
    }

    /// Human readable label used in progress lines.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Server => "Server",
            ResourceKind::BlockStorage => "Block storage",
            ResourceKind::BlockStorageSnapshot => "Block storage snapshot",
            ResourceKind::PublicIp => "Public IP",
            ResourceKind::NasVolume => "NAS volume",
            ResourceKind::NasVolumeSnapshot => "NAS volume snapshot",
            ResourceKind::LoadBalancer => "Load balancer",
            ResourceKind::TargetGroup => "Target group",
            ResourceKind::CloudDb => "Cloud DB",
            ResourceKind::CloudPostgresql => "Cloud DB for PostgreSQL",
            ResourceKind::CloudMongoDb => "Cloud DB for MongoDB",
            ResourceKind::CloudMariaDb => "Cloud DB for MariaDB",
            ResourceKind::CloudMysql => "Cloud DB for MySQL",
            ResourceKind::CloudRedis => "Cloud DB for Redis",
            ResourceKind::Vpc => "VPC",
            ResourceKind::Subnet => "Subnet",
            ResourceKind::NatGateway => "NAT gateway",
            ResourceKind::VpcPeering => "VPC peering",
            ResourceKind::NetworkAcl => "Network ACL",
            ResourceKind::RouteTable => "Route table",
            ResourceKind::AccessControlGroup => "ACG",
            ResourceKind::AutoScalingGroup => "Auto scaling group",
            ResourceKind::LaunchConfiguration => "Launch configuration",
            ResourceKind::KubernetesCluster => "Kubernetes cluster",
            ResourceKind::InitScript => "Init script",
            ResourceKind::LoginKey => "Login key",
            ResourceKind::PlacementGroup => "Placement group",
        }
    }

    /// Look a kind up by its filter key.
    pub fn from_filter_key(key: &str) -> Option<ResourceKind> {
        Self::ALL.into_iter().find(|k| k.filter_key() == key)
    }

    pub fn is_database(self) -> bool {
        Self::DATABASES.contains(&self)
    }

    /// Containing resource, if the provider scopes this kind under another.
    pub fn parent(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Subnet
            | ResourceKind::NatGateway
            | ResourceKind::NetworkAcl
            | ResourceKind::RouteTable
            | ResourceKind::AccessControlGroup => Some(ResourceKind::Vpc),
            ResourceKind::BlockStorageSnapshot => Some(ResourceKind::BlockStorage),
            ResourceKind::NasVolumeSnapshot => Some(ResourceKind::NasVolume),
            ResourceKind::TargetGroup => Some(ResourceKind::LoadBalancer),
            ResourceKind::LaunchConfiguration => Some(ResourceKind::AutoScalingGroup),
            _ => None,
        }
    }

    /// Kinds that must already be gone before this kind can be deleted.
    pub fn prerequisites(self) -> &'static [ResourceKind] {
        use ResourceKind::*;
        match self {
            AutoScalingGroup => &[KubernetesCluster],
            LaunchConfiguration => &[AutoScalingGroup],
            TargetGroup => &[LoadBalancer],
            Server => &[KubernetesCluster, AutoScalingGroup],
            BlockStorage => &[BlockStorageSnapshot, Server],
            NasVolume => &[NasVolumeSnapshot],
            PublicIp => &[NatGateway],
            AccessControlGroup => &[Server, LoadBalancer, CloudDb, CloudPostgresql],
            NetworkAcl => &[Server],
            Subnet => &[
                Server,
                LoadBalancer,
                NatGateway,
                CloudDb,
                CloudPostgresql,
                CloudMongoDb,
                CloudMariaDb,
                CloudMysql,
                CloudRedis,
                KubernetesCluster,
            ],
            Vpc => &[
                Subnet,
                NatGateway,
                VpcPeering,
                RouteTable,
                NetworkAcl,
                AccessControlGroup,
            ],
            InitScript => &[Server],
            LoginKey => &[Server],
            PlacementGroup => &[Server],
            _ => &[],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Provider status/type code pair (`{"code": "RUN", "codeName": "Server run state"}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonCode {
    pub code: String,
    pub code_name: String,
}

impl CommonCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            code_name: String::new(),
        }
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

pub const SERVER_RUNNING: &str = "RUN";
pub const BASIC_DISK: &str = "BASIC";
pub const ROUTE_TARGET_NAT_GATEWAY: &str = "NATGW";
pub const ROUTE_TARGET_VPC_PEERING: &str = "VPCPEERING";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    #[serde(rename = "serverInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "serverName")]
    pub name: String,
    #[serde(rename = "serverInstanceStatus")]
    pub status: CommonCode,
    #[serde(rename = "publicIp")]
    pub public_ip: String,
    #[serde(rename = "privateIp")]
    pub private_ip: String,
    #[serde(rename = "cpuCount")]
    pub cpu_count: u32,
    #[serde(rename = "memorySize")]
    pub memory_size: u64,
}

impl Server {
    pub fn is_running(&self) -> bool {
        self.status.is(SERVER_RUNNING)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStorage {
    #[serde(rename = "blockStorageInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "blockStorageName")]
    pub name: String,
    #[serde(rename = "blockStorageInstanceStatus")]
    pub status: CommonCode,
    #[serde(rename = "blockStorageSize")]
    pub size: u64,
    #[serde(rename = "serverInstanceNo")]
    pub server_instance_no: String,
    #[serde(rename = "blockStorageType")]
    pub storage_type: CommonCode,
    #[serde(rename = "blockStorageDiskDetailType")]
    pub disk_detail_type: CommonCode,
}

impl BlockStorage {
    /// Boot disks go away with their server and are never deleted directly.
    pub fn is_basic(&self) -> bool {
        self.disk_detail_type.is(BASIC_DISK)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStorageSnapshot {
    #[serde(rename = "blockStorageSnapshotInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "blockStorageSnapshotName")]
    pub name: String,
    #[serde(rename = "blockStorageSnapshotInstanceStatus")]
    pub status: CommonCode,
    #[serde(rename = "originalBlockStorageInstanceNo")]
    pub block_storage_instance_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicIp {
    #[serde(rename = "publicIpInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "publicIp")]
    pub address: String,
    #[serde(rename = "publicIpInstanceStatus")]
    pub status: CommonCode,
    #[serde(rename = "serverInstanceNo")]
    pub server_instance_no: String,
    #[serde(rename = "serverName")]
    pub server_name: String,
}

impl PublicIp {
    pub fn is_associated(&self) -> bool {
        !self.server_instance_no.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NasVolume {
    #[serde(rename = "nasVolumeInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "volumeName")]
    pub name: String,
    #[serde(rename = "nasVolumeInstanceStatus")]
    pub status: CommonCode,
    #[serde(rename = "volumeAllotmentProtocolType")]
    pub protocol: CommonCode,
    #[serde(rename = "volumeTotalSize")]
    pub total_size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NasVolumeSnapshot {
    #[serde(rename = "nasVolumeSnapshotInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "nasVolumeSnapshotName")]
    pub name: String,
    #[serde(rename = "nasVolumeInstanceNo")]
    pub nas_volume_instance_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    #[serde(rename = "loadBalancerInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "loadBalancerName")]
    pub name: String,
    #[serde(rename = "loadBalancerInstanceStatus")]
    pub status: CommonCode,
    #[serde(rename = "loadBalancerType")]
    pub load_balancer_type: CommonCode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetGroup {
    #[serde(rename = "targetGroupNo")]
    pub target_group_no: String,
    #[serde(rename = "targetGroupName")]
    pub name: String,
    #[serde(rename = "targetGroupStatus")]
    pub status: CommonCode,
    #[serde(rename = "loadBalancerInstanceNoList")]
    pub load_balancer_instance_nos: Vec<String>,
}

/// Shared record for the six managed-database products.
///
/// Each product names its fields after itself (`cloudMysqlInstanceNo`,
/// `cloudRedisServiceName`, ...); the aliases fold them into one shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseInstance {
    #[serde(
        rename = "instanceNo",
        alias = "cloudDBInstanceNo",
        alias = "cloudPostgresqlInstanceNo",
        alias = "cloudMongoDbInstanceNo",
        alias = "cloudMariaDbInstanceNo",
        alias = "cloudMysqlInstanceNo",
        alias = "cloudRedisInstanceNo"
    )]
    pub instance_no: String,
    #[serde(
        rename = "serviceName",
        alias = "cloudDBServiceName",
        alias = "cloudPostgresqlServiceName",
        alias = "cloudMongoDbServiceName",
        alias = "cloudMariaDbServiceName",
        alias = "cloudMysqlServiceName",
        alias = "cloudRedisServiceName"
    )]
    pub service_name: String,
    #[serde(
        rename = "status",
        alias = "cloudDBInstanceStatus",
        alias = "cloudPostgresqlInstanceStatus",
        alias = "cloudMongoDbInstanceStatus",
        alias = "cloudMariaDbInstanceStatus",
        alias = "cloudMysqlInstanceStatus",
        alias = "cloudRedisInstanceStatus"
    )]
    pub status: CommonCode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vpc {
    #[serde(rename = "vpcNo")]
    pub vpc_no: String,
    #[serde(rename = "vpcName")]
    pub name: String,
    #[serde(rename = "vpcStatus")]
    pub status: CommonCode,
    #[serde(rename = "ipv4CidrBlock")]
    pub ipv4_cidr_block: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subnet {
    #[serde(rename = "subnetNo")]
    pub subnet_no: String,
    #[serde(rename = "subnetName")]
    pub name: String,
    #[serde(rename = "subnetStatus")]
    pub status: CommonCode,
    #[serde(rename = "vpcNo")]
    pub vpc_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatGateway {
    #[serde(rename = "natGatewayInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "natGatewayName")]
    pub name: String,
    #[serde(rename = "natGatewayInstanceStatus")]
    pub status: CommonCode,
    #[serde(rename = "vpcNo")]
    pub vpc_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VpcPeering {
    #[serde(rename = "vpcPeeringInstanceNo")]
    pub instance_no: String,
    #[serde(rename = "vpcPeeringName")]
    pub name: String,
    #[serde(rename = "vpcPeeringInstanceStatus")]
    pub status: CommonCode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAcl {
    #[serde(rename = "networkAclNo")]
    pub network_acl_no: String,
    #[serde(rename = "networkAclName")]
    pub name: String,
    #[serde(rename = "networkAclStatus")]
    pub status: CommonCode,
    #[serde(rename = "vpcNo")]
    pub vpc_no: String,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

/// One entry of a route table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    #[serde(rename = "destinationCidrBlock")]
    pub destination_cidr_block: String,
    #[serde(rename = "targetName")]
    pub target_name: String,
    #[serde(rename = "targetNo")]
    pub target_no: String,
    #[serde(rename = "targetTypeCode", alias = "targetType")]
    pub target_type: CommonCode,
}

impl Route {
    /// Routes this tool is allowed to remove: NAT gateway and VPC peering
    /// targets. Local and VPN routes stay with the provider.
    pub fn is_removable(&self) -> bool {
        self.target_type.is(ROUTE_TARGET_NAT_GATEWAY)
            || self.target_type.is(ROUTE_TARGET_VPC_PEERING)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    #[serde(rename = "routeTableNo")]
    pub route_table_no: String,
    #[serde(rename = "routeTableName")]
    pub name: String,
    #[serde(rename = "routeTableStatus")]
    pub status: CommonCode,
    #[serde(rename = "vpcNo")]
    pub vpc_no: String,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
    #[serde(rename = "routeList")]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessControlGroup {
    #[serde(rename = "accessControlGroupNo")]
    pub acg_no: String,
    #[serde(rename = "accessControlGroupName")]
    pub name: String,
    #[serde(rename = "accessControlGroupStatus")]
    pub status: CommonCode,
    #[serde(rename = "vpcNo")]
    pub vpc_no: String,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScalingGroup {
    #[serde(rename = "autoScalingGroupNo")]
    pub group_no: String,
    #[serde(rename = "autoScalingGroupName")]
    pub name: String,
    #[serde(rename = "launchConfigurationNo")]
    pub launch_configuration_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfiguration {
    #[serde(rename = "launchConfigurationNo")]
    pub launch_configuration_no: String,
    #[serde(rename = "launchConfigurationName")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesCluster {
    pub uuid: String,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitScript {
    #[serde(rename = "initScriptNo")]
    pub init_script_no: String,
    #[serde(rename = "initScriptName")]
    pub name: String,
}

/// Login keys are identified by name only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginKey {
    #[serde(rename = "keyName")]
    pub key_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementGroup {
    #[serde(rename = "placementGroupNo")]
    pub placement_group_no: String,
    #[serde(rename = "placementGroupName")]
    pub name: String,
}

/// A resource of any kind, as listed by the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Server(Server),
    BlockStorage(BlockStorage),
    BlockStorageSnapshot(BlockStorageSnapshot),
    PublicIp(PublicIp),
    NasVolume(NasVolume),
    NasVolumeSnapshot(NasVolumeSnapshot),
    LoadBalancer(LoadBalancer),
    TargetGroup(TargetGroup),
    CloudDb(DatabaseInstance),
    CloudPostgresql(DatabaseInstance),
    CloudMongoDb(DatabaseInstance),
    CloudMariaDb(DatabaseInstance),
    CloudMysql(DatabaseInstance),
    CloudRedis(DatabaseInstance),
    Vpc(Vpc),
    Subnet(Subnet),
    NatGateway(NatGateway),
    VpcPeering(VpcPeering),
    NetworkAcl(NetworkAcl),
    RouteTable(RouteTable),
    AccessControlGroup(AccessControlGroup),
    AutoScalingGroup(AutoScalingGroup),
    LaunchConfiguration(LaunchConfiguration),
    KubernetesCluster(KubernetesCluster),
    InitScript(InitScript),
    LoginKey(LoginKey),
    PlacementGroup(PlacementGroup),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Server(_) => ResourceKind::Server,
            Resource::BlockStorage(_) => ResourceKind::BlockStorage,
            Resource::BlockStorageSnapshot(_) => ResourceKind::BlockStorageSnapshot,
            Resource::PublicIp(_) => ResourceKind::PublicIp,
            Resource::NasVolume(_) => ResourceKind::NasVolume,
            Resource::NasVolumeSnapshot(_) => ResourceKind::NasVolumeSnapshot,
            Resource::LoadBalancer(_) => ResourceKind::LoadBalancer,
            Resource::TargetGroup(_) => ResourceKind::TargetGroup,
            Resource::CloudDb(_) => ResourceKind::CloudDb,
            Resource::CloudPostgresql(_) => ResourceKind::CloudPostgresql,
            Resource::CloudMongoDb(_) => ResourceKind::CloudMongoDb,
            Resource::CloudMariaDb(_) => ResourceKind::CloudMariaDb,
            Resource::CloudMysql(_) => ResourceKind::CloudMysql,
            Resource::CloudRedis(_) => ResourceKind::CloudRedis,
            Resource::Vpc(_) => ResourceKind::Vpc,
            Resource::Subnet(_) => ResourceKind::Subnet,
            Resource::NatGateway(_) => ResourceKind::NatGateway,
            Resource::VpcPeering(_) => ResourceKind::VpcPeering,
            Resource::NetworkAcl(_) => ResourceKind::NetworkAcl,
            Resource::RouteTable(_) => ResourceKind::RouteTable,
            Resource::AccessControlGroup(_) => ResourceKind::AccessControlGroup,
            Resource::AutoScalingGroup(_) => ResourceKind::AutoScalingGroup,
            Resource::LaunchConfiguration(_) => ResourceKind::LaunchConfiguration,
            Resource::KubernetesCluster(_) => ResourceKind::KubernetesCluster,
            Resource::InitScript(_) => ResourceKind::InitScript,
            Resource::LoginKey(_) => ResourceKind::LoginKey,
            Resource::PlacementGroup(_) => ResourceKind::PlacementGroup,
        }
    }

    /// Provider-assigned identifier used in delete calls.
    pub fn id(&self) -> &str {
        match self {
            Resource::Server(r) => &r.instance_no,
            Resource::BlockStorage(r) => &r.instance_no,
            Resource::BlockStorageSnapshot(r) => &r.instance_no,
            Resource::PublicIp(r) => &r.instance_no,
            Resource::NasVolume(r) => &r.instance_no,
            Resource::NasVolumeSnapshot(r) => &r.instance_no,
            Resource::LoadBalancer(r) => &r.instance_no,
            Resource::TargetGroup(r) => &r.target_group_no,
            Resource::CloudDb(r)
            | Resource::CloudPostgresql(r)
            | Resource::CloudMongoDb(r)
            | Resource::CloudMariaDb(r)
            | Resource::CloudMysql(r)
            | Resource::CloudRedis(r) => &r.instance_no,
            Resource::Vpc(r) => &r.vpc_no,
            Resource::Subnet(r) => &r.subnet_no,
            Resource::NatGateway(r) => &r.instance_no,
            Resource::VpcPeering(r) => &r.instance_no,
            Resource::NetworkAcl(r) => &r.network_acl_no,
            Resource::RouteTable(r) => &r.route_table_no,
            Resource::AccessControlGroup(r) => &r.acg_no,
            Resource::AutoScalingGroup(r) => &r.group_no,
            Resource::LaunchConfiguration(r) => &r.launch_configuration_no,
            Resource::KubernetesCluster(r) => &r.uuid,
            Resource::InitScript(r) => &r.init_script_no,
            Resource::LoginKey(r) => &r.key_name,
            Resource::PlacementGroup(r) => &r.placement_group_no,
        }
    }

    /// Display name; may be empty.
    pub fn name(&self) -> &str {
        match self {
            Resource::Server(r) => &r.name,
            Resource::BlockStorage(r) => &r.name,
            Resource::BlockStorageSnapshot(r) => &r.name,
            Resource::PublicIp(r) => &r.address,
            Resource::NasVolume(r) => &r.name,
            Resource::NasVolumeSnapshot(r) => &r.name,
            Resource::LoadBalancer(r) => &r.name,
            Resource::TargetGroup(r) => &r.name,
            Resource::CloudDb(r)
            | Resource::CloudPostgresql(r)
            | Resource::CloudMongoDb(r)
            | Resource::CloudMariaDb(r)
            | Resource::CloudMysql(r)
            | Resource::CloudRedis(r) => &r.service_name,
            Resource::Vpc(r) => &r.name,
            Resource::Subnet(r) => &r.name,
            Resource::NatGateway(r) => &r.name,
            Resource::VpcPeering(r) => &r.name,
            Resource::NetworkAcl(r) => &r.name,
            Resource::RouteTable(r) => &r.name,
            Resource::AccessControlGroup(r) => &r.name,
            Resource::AutoScalingGroup(r) => &r.name,
            Resource::LaunchConfiguration(r) => &r.name,
            Resource::KubernetesCluster(r) => &r.name,
            Resource::InitScript(r) => &r.name,
            Resource::LoginKey(r) => &r.key_name,
            Resource::PlacementGroup(r) => &r.name,
        }
    }

    /// `name (id)`, or just the id when the name is empty or identical.
    pub fn describe(&self) -> String {
        let (name, id) = (self.name(), self.id());
        if name.is_empty() || name == id {
            id.to_string()
        } else {
            format!("{} ({})", name, id)
        }
    }

    /// Wrap a JSON record listed for `kind` into the matching variant.
    ///
    /// Members the provider sends as `null` take the field's default.
    pub fn from_json(kind: ResourceKind, mut value: serde_json::Value) -> serde_json::Result<Self> {
        use serde_json::from_value;
        strip_nulls(&mut value);
        Ok(match kind {
            ResourceKind::Server => Resource::Server(from_value(value)?),
            ResourceKind::BlockStorage => Resource::BlockStorage(from_value(value)?),
            ResourceKind::BlockStorageSnapshot => {
                Resource::BlockStorageSnapshot(from_value(value)?)
            }
            ResourceKind::PublicIp => Resource::PublicIp(from_value(value)?),
            ResourceKind::NasVolume => Resource::NasVolume(from_value(value)?),
            ResourceKind::NasVolumeSnapshot => Resource::NasVolumeSnapshot(from_value(value)?),
            ResourceKind::LoadBalancer => Resource::LoadBalancer(from_value(value)?),
            ResourceKind::TargetGroup => Resource::TargetGroup(from_value(value)?),
            ResourceKind::CloudDb => Resource::CloudDb(from_value(value)?),
            ResourceKind::CloudPostgresql => Resource::CloudPostgresql(from_value(value)?),
            ResourceKind::CloudMongoDb => Resource::CloudMongoDb(from_value(value)?),
            ResourceKind::CloudMariaDb => Resource::CloudMariaDb(from_value(value)?),
            ResourceKind::CloudMysql => Resource::CloudMysql(from_value(value)?),
            ResourceKind::CloudRedis => Resource::CloudRedis(from_value(value)?),
            ResourceKind::Vpc => Resource::Vpc(from_value(value)?),
            ResourceKind::Subnet => Resource::Subnet(from_value(value)?),
            ResourceKind::NatGateway => Resource::NatGateway(from_value(value)?),
            ResourceKind::VpcPeering => Resource::VpcPeering(from_value(value)?),
            ResourceKind::NetworkAcl => Resource::NetworkAcl(from_value(value)?),
            ResourceKind::RouteTable => Resource::RouteTable(from_value(value)?),
            ResourceKind::AccessControlGroup => Resource::AccessControlGroup(from_value(value)?),
            ResourceKind::AutoScalingGroup => Resource::AutoScalingGroup(from_value(value)?),
            ResourceKind::LaunchConfiguration => {
                Resource::LaunchConfiguration(from_value(value)?)
            }
            ResourceKind::KubernetesCluster => Resource::KubernetesCluster(from_value(value)?),
            ResourceKind::InitScript => Resource::InitScript(from_value(value)?),
            ResourceKind::LoginKey => Resource::LoginKey(from_value(value)?),
            ResourceKind::PlacementGroup => Resource::PlacementGroup(from_value(value)?),
        })
    }
}

/// Drop `null` members from every object in `value`, recursively.
pub fn strip_nulls(value: &mut serde_json::Value) {
    use serde_json::Value;
    match value {
        Value::Object(members) => {
            members.retain(|_, member| !member.is_null());
            members.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
