//! Endpoint catalog
//!
//! Maps resource kinds and [`Operation`]s onto the gateway's services,
//! action names and query parameters. Nothing here touches the network.

use crate::error::{NcloudError, Result};
use ncp_sweep_cloud::{Operation, ResourceKind};
use reqwest::Method;
use serde_json::Value;

const SUB_ACCOUNT_API_BASE: &str = "https://subaccount.apigw.ntruss.com";
const NCLOUD_API_BASE: &str = "https://ncloud.apigw.ntruss.com";
const NKS_API_BASE: &str = "https://nks.apigw.ntruss.com/vnks/v2";

/// Gateway service a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    SubAccount,
    Server,
    Nas,
    LoadBalancer,
    CloudDb,
    Vpc,
    AutoScaling,
    Kubernetes,
    MongoDb,
    Postgresql,
    MariaDb,
    Mysql,
    Redis,
}

impl Service {
    pub fn base_url(self) -> String {
        let path = match self {
            Service::SubAccount => return SUB_ACCOUNT_API_BASE.to_string(),
            Service::Kubernetes => return NKS_API_BASE.to_string(),
            Service::Server => "vserver",
            Service::Nas => "vnas",
            Service::LoadBalancer => "vloadbalancer",
            Service::CloudDb => "clouddb",
            Service::Vpc => "vpc",
            Service::AutoScaling => "autoscaling",
            Service::MongoDb => "vmongodb",
            Service::Postgresql => "vpostgresql",
            Service::MariaDb => "vmariadb",
            Service::Mysql => "vmysql",
            Service::Redis => "vredis",
        };
        format!("{}/{}/v2", NCLOUD_API_BASE, path)
    }
}

/// A request ready to be signed and sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub service: Service,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(service: Service, path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            service,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    /// An `action` call on one of the classic `vX/v2` services, asking for JSON.
    pub fn action(service: Service, action: &str) -> Self {
        Self::get(service, format!("/{}", action)).param("responseFormatType", "json")
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// `prefix.1`, `prefix.2`, ... for each value.
    pub fn indexed(mut self, prefix: &str, values: &[String]) -> Self {
        for (i, value) in values.iter().enumerate() {
            self.params
                .push((format!("{}.{}", prefix, i + 1), value.clone()));
        }
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Where a kind's listing lives and how its records are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListEndpoint {
    pub service: Service,
    pub action: &'static str,
    pub list_key: &'static str,
}

impl ListEndpoint {
    const fn new(service: Service, action: &'static str, list_key: &'static str) -> Self {
        Self {
            service,
            action,
            list_key,
        }
    }

    pub fn request(&self) -> ApiRequest {
        match self.service {
            Service::Kubernetes => ApiRequest::get(self.service, format!("/{}", self.action)),
            _ => ApiRequest::action(self.service, self.action),
        }
    }

    /// Pull the record array out of a listing body.
    ///
    /// Classic services wrap it as `{"<action>Response": {"<listKey>": [...]}}`;
    /// the Kubernetes service returns `{"clusters": [...]}` directly.
    pub fn extract(&self, body: Value) -> Result<Vec<Value>> {
        let container = match self.service {
            Service::Kubernetes => body,
            _ => {
                let wrapper = format!("{}Response", self.action);
                match body {
                    Value::Object(mut map) => map.remove(&wrapper).ok_or_else(|| {
                        NcloudError::UnexpectedResponse(format!("missing {}", wrapper))
                    })?,
                    _ => {
                        return Err(NcloudError::UnexpectedResponse(format!(
                            "expected object with {}",
                            wrapper
                        )));
                    }
                }
            }
        };

        match container.get(self.list_key) {
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(NcloudError::UnexpectedResponse(format!(
                "{} is not a list: {}",
                self.list_key, other
            ))),
        }
    }
}

pub fn list_endpoint(kind: ResourceKind) -> ListEndpoint {
    use ResourceKind::*;
    match kind {
        Server => ListEndpoint::new(
            Service::Server,
            "getServerInstanceList",
            "serverInstanceList",
        ),
        BlockStorage => ListEndpoint::new(
            Service::Server,
            "getBlockStorageInstanceList",
            "blockStorageInstanceList",
        ),
        BlockStorageSnapshot => ListEndpoint::new(
            Service::Server,
            "getBlockStorageSnapshotInstanceList",
            "blockStorageSnapshotInstanceList",
        ),
        PublicIp => ListEndpoint::new(
            Service::Server,
            "getPublicIpInstanceList",
            "publicIpInstanceList",
        ),
        NasVolume => ListEndpoint::new(
            Service::Nas,
            "getNasVolumeInstanceList",
            "nasVolumeInstanceList",
        ),
        NasVolumeSnapshot => ListEndpoint::new(
            Service::Nas,
            "getNasVolumeSnapshotList",
            "nasVolumeSnapshotList",
        ),
        LoadBalancer => ListEndpoint::new(
            Service::LoadBalancer,
            "getLoadBalancerInstanceList",
            "loadBalancerInstanceList",
        ),
        TargetGroup => {
            ListEndpoint::new(Service::LoadBalancer, "getTargetGroupList", "targetGroupList")
        }
        CloudDb => ListEndpoint::new(
            Service::CloudDb,
            "getCloudDBInstanceList",
            "cloudDBInstanceList",
        ),
        CloudPostgresql => ListEndpoint::new(
            Service::Postgresql,
            "getCloudPostgresqlInstanceList",
            "cloudPostgresqlInstanceList",
        ),
        CloudMongoDb => ListEndpoint::new(
            Service::MongoDb,
            "getCloudMongoDbInstanceList",
            "cloudMongoDbInstanceList",
        ),
        CloudMariaDb => ListEndpoint::new(
            Service::MariaDb,
            "getCloudMariaDbInstanceList",
            "cloudMariaDbInstanceList",
        ),
        CloudMysql => ListEndpoint::new(
            Service::Mysql,
            "getCloudMysqlInstanceList",
            "cloudMysqlInstanceList",
        ),
        CloudRedis => ListEndpoint::new(
            Service::Redis,
            "getCloudRedisInstanceList",
            "cloudRedisInstanceList",
        ),
        Vpc => ListEndpoint::new(Service::Vpc, "getVpcList", "vpcList"),
        Subnet => ListEndpoint::new(Service::Vpc, "getSubnetList", "subnetList"),
        NatGateway => ListEndpoint::new(
            Service::Vpc,
            "getNatGatewayInstanceList",
            "natGatewayInstanceList",
        ),
        VpcPeering => ListEndpoint::new(
            Service::Vpc,
            "getVpcPeeringInstanceList",
            "vpcPeeringInstanceList",
        ),
        NetworkAcl => ListEndpoint::new(Service::Vpc, "getNetworkAclList", "networkAclList"),
        RouteTable => ListEndpoint::new(Service::Vpc, "getRouteTableList", "routeTableList"),
        AccessControlGroup => ListEndpoint::new(
            Service::Server,
            "getAccessControlGroupList",
            "accessControlGroupList",
        ),
        AutoScalingGroup => ListEndpoint::new(
            Service::AutoScaling,
            "getAutoScalingGroupList",
            "autoScalingGroupList",
        ),
        LaunchConfiguration => ListEndpoint::new(
            Service::AutoScaling,
            "getLaunchConfigurationList",
            "launchConfigurationList",
        ),
        KubernetesCluster => ListEndpoint::new(Service::Kubernetes, "clusters", "clusters"),
        InitScript => ListEndpoint::new(Service::Server, "getInitScriptList", "initScriptList"),
        LoginKey => ListEndpoint::new(Service::Server, "getLoginKeyList", "loginKeyList"),
        PlacementGroup => ListEndpoint::new(
            Service::Server,
            "getPlacementGroupList",
            "placementGroupList",
        ),
    }
}

/// Single-resource delete: `(service, action, id parameter)`.
fn delete_endpoint(kind: ResourceKind) -> Option<(Service, &'static str, &'static str)> {
    use ResourceKind::*;
    Some(match kind {
        PublicIp => (
            Service::Server,
            "deletePublicIpInstance",
            "publicIpInstanceNo",
        ),
        NasVolume => (Service::Nas, "deleteNasVolumeInstance", "nasVolumeInstanceNo"),
        NasVolumeSnapshot => (
            Service::Nas,
            "deleteNasVolumeSnapshot",
            "nasVolumeSnapshotInstanceNo",
        ),
        LoadBalancer => (
            Service::LoadBalancer,
            "deleteLoadBalancerInstances",
            "loadBalancerInstanceNoList.1",
        ),
        TargetGroup => (Service::LoadBalancer, "deleteTargetGroup", "targetGroupNo"),
        CloudDb => (
            Service::CloudDb,
            "deleteCloudDBServerInstance",
            "cloudDBInstanceNo",
        ),
        CloudPostgresql => (
            Service::Postgresql,
            "deleteCloudPostgresqlInstance",
            "cloudPostgresqlInstanceNo",
        ),
        CloudMongoDb => (
            Service::MongoDb,
            "deleteCloudMongoDbInstance",
            "cloudMongoDbInstanceNo",
        ),
        CloudMariaDb => (
            Service::MariaDb,
            "deleteCloudMariaDbInstance",
            "cloudMariaDbInstanceNo",
        ),
        CloudMysql => (
            Service::Mysql,
            "deleteCloudMysqlInstance",
            "cloudMysqlInstanceNo",
        ),
        CloudRedis => (
            Service::Redis,
            "deleteCloudRedisInstance",
            "cloudRedisInstanceNo",
        ),
        Vpc => (Service::Vpc, "deleteVpc", "vpcNo"),
        Subnet => (Service::Vpc, "deleteSubnet", "subnetNo"),
        NatGateway => (
            Service::Vpc,
            "deleteNatGatewayInstance",
            "natGatewayInstanceNo",
        ),
        VpcPeering => (
            Service::Vpc,
            "deleteVpcPeeringInstance",
            "vpcPeeringInstanceNo",
        ),
        NetworkAcl => (Service::Vpc, "deleteNetworkAcl", "networkAclNo"),
        AccessControlGroup => (
            Service::Server,
            "deleteAccessControlGroup",
            "accessControlGroupNo",
        ),
        AutoScalingGroup => (
            Service::AutoScaling,
            "deleteAutoScalingGroup",
            "autoScalingGroupNo",
        ),
        LaunchConfiguration => (
            Service::AutoScaling,
            "deleteLaunchConfiguration",
            "launchConfigurationNo",
        ),
        PlacementGroup => (Service::Server, "deletePlacementGroup", "placementGroupNo"),
        _ => return None,
    })
}

/// Bulk delete: `(service, action, list parameter prefix)`.
fn bulk_delete_endpoint(kind: ResourceKind) -> Option<(Service, &'static str, &'static str)> {
    use ResourceKind::*;
    Some(match kind {
        BlockStorage => (
            Service::Server,
            "deleteBlockStorageInstances",
            "blockStorageInstanceNoList",
        ),
        BlockStorageSnapshot => (
            Service::Server,
            "deleteBlockStorageSnapshotInstances",
            "blockStorageSnapshotInstanceNoList",
        ),
        InitScript => (Service::Server, "deleteInitScripts", "initScriptNoList"),
        LoginKey => (Service::Server, "deleteLoginKeys", "keyNameList"),
        _ => return None,
    })
}

/// Translate a mutating operation into the request that performs it.
pub fn operation_request(operation: &Operation) -> Result<ApiRequest> {
    let request = match operation {
        Operation::Delete {
            kind: ResourceKind::KubernetesCluster,
            id,
        } => ApiRequest::get(Service::Kubernetes, format!("/clusters/{}", id))
            .with_method(Method::DELETE),
        Operation::Delete { kind, id } => {
            let (service, action, param) = delete_endpoint(*kind).ok_or_else(|| {
                NcloudError::Unsupported {
                    kind: *kind,
                    operation: "delete".to_string(),
                }
            })?;
            ApiRequest::action(service, action).param(param, id.as_str())
        }
        Operation::DeleteMany { kind, ids } => {
            let (service, action, prefix) = bulk_delete_endpoint(*kind).ok_or_else(|| {
                NcloudError::Unsupported {
                    kind: *kind,
                    operation: "bulk delete".to_string(),
                }
            })?;
            ApiRequest::action(service, action).indexed(prefix, ids)
        }
        Operation::StopServers(ids) => ApiRequest::action(Service::Server, "stopServerInstances")
            .indexed("serverInstanceNoList", ids),
        Operation::TerminateServers(ids) => {
            ApiRequest::action(Service::Server, "terminateServerInstances")
                .indexed("serverInstanceNoList", ids)
        }
        Operation::DisassociatePublicIp(id) => {
            ApiRequest::action(Service::Server, "disassociatePublicIpFromServerInstance")
                .param("publicIpInstanceNo", id.as_str())
        }
        Operation::RemoveRoute {
            route_table_no,
            route,
        } => ApiRequest::action(Service::Vpc, "removeRoute")
            .param("routeTableNo", route_table_no.as_str())
            .param(
                "routeList.1.destinationCidrBlock",
                route.destination_cidr_block.as_str(),
            )
            .param("routeList.1.targetTypeCode", route.target_type.code.as_str())
            .param("routeList.1.targetNo", route.target_no.as_str())
            .param("routeList.1.targetName", route.target_name.as_str()),
    };
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncp_sweep_cloud::{CommonCode, Route};
    use serde_json::json;

    fn param<'a>(request: &'a ApiRequest, key: &str) -> Option<&'a str> {
        request
            .params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_base_urls() {
        assert_eq!(
            Service::Server.base_url(),
            "https://ncloud.apigw.ntruss.com/vserver/v2"
        );
        assert_eq!(
            Service::Redis.base_url(),
            "https://ncloud.apigw.ntruss.com/vredis/v2"
        );
        assert_eq!(
            Service::Kubernetes.base_url(),
            "https://nks.apigw.ntruss.com/vnks/v2"
        );
        assert_eq!(
            Service::SubAccount.base_url(),
            "https://subaccount.apigw.ntruss.com"
        );
    }

    #[test]
    fn test_every_kind_has_a_listing() {
        for kind in ResourceKind::ALL {
            let endpoint = list_endpoint(kind);
            assert!(!endpoint.action.is_empty(), "{:?}", kind);
            assert!(!endpoint.list_key.is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn test_list_request_asks_for_json() {
        let request = list_endpoint(ResourceKind::Vpc).request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/getVpcList");
        assert_eq!(param(&request, "responseFormatType"), Some("json"));

        let clusters = list_endpoint(ResourceKind::KubernetesCluster).request();
        assert_eq!(clusters.path, "/clusters");
        assert!(clusters.params.is_empty());
    }

    #[test]
    fn test_extract_wrapped_list() {
        let body = json!({
            "getServerInstanceListResponse": {
                "totalRows": 1,
                "serverInstanceList": [{"serverInstanceNo": "s1"}]
            }
        });
        let items = list_endpoint(ResourceKind::Server).extract(body).unwrap();
        assert_eq!(items, vec![json!({"serverInstanceNo": "s1"})]);
    }

    #[test]
    fn test_extract_missing_list_is_empty() {
        let body = json!({"getVpcListResponse": {"totalRows": 0}});
        let items = list_endpoint(ResourceKind::Vpc).extract(body).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_extract_missing_wrapper_is_error() {
        let body = json!({"responseError": {"returnCode": "800"}});
        let err = list_endpoint(ResourceKind::Vpc).extract(body).unwrap_err();
        assert!(err.to_string().contains("getVpcListResponse"));
    }

    #[test]
    fn test_extract_clusters() {
        let body = json!({"clusters": [{"uuid": "c-1", "name": "lab", "status": "RUNNING"}]});
        let items = list_endpoint(ResourceKind::KubernetesCluster)
            .extract(body)
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_single_delete_request() {
        let request = operation_request(&Operation::Delete {
            kind: ResourceKind::CloudDb,
            id: "77".into(),
        })
        .unwrap();
        assert_eq!(request.service, Service::CloudDb);
        assert_eq!(request.path, "/deleteCloudDBServerInstance");
        assert_eq!(param(&request, "cloudDBInstanceNo"), Some("77"));
    }

    #[test]
    fn test_load_balancer_delete_uses_list_param() {
        let request = operation_request(&Operation::Delete {
            kind: ResourceKind::LoadBalancer,
            id: "lb-9".into(),
        })
        .unwrap();
        assert_eq!(param(&request, "loadBalancerInstanceNoList.1"), Some("lb-9"));
    }

    #[test]
    fn test_bulk_delete_indexes_from_one() {
        let request = operation_request(&Operation::DeleteMany {
            kind: ResourceKind::LoginKey,
            ids: vec!["k-a".into(), "k-b".into()],
        })
        .unwrap();
        assert_eq!(request.path, "/deleteLoginKeys");
        assert_eq!(param(&request, "keyNameList.1"), Some("k-a"));
        assert_eq!(param(&request, "keyNameList.2"), Some("k-b"));
        assert_eq!(param(&request, "keyNameList.0"), None);
    }

    #[test]
    fn test_server_lifecycle_requests() {
        let stop = operation_request(&Operation::StopServers(vec!["s1".into()])).unwrap();
        assert_eq!(stop.path, "/stopServerInstances");
        assert_eq!(param(&stop, "serverInstanceNoList.1"), Some("s1"));

        let terminate =
            operation_request(&Operation::TerminateServers(vec!["s1".into(), "s2".into()]))
                .unwrap();
        assert_eq!(terminate.path, "/terminateServerInstances");
        assert_eq!(param(&terminate, "serverInstanceNoList.2"), Some("s2"));
    }

    #[test]
    fn test_remove_route_request() {
        let request = operation_request(&Operation::RemoveRoute {
            route_table_no: "rt-1".into(),
            route: Route {
                destination_cidr_block: "0.0.0.0/0".into(),
                target_name: "nat-a".into(),
                target_no: "42".into(),
                target_type: CommonCode::new("NATGW"),
            },
        })
        .unwrap();
        assert_eq!(request.service, Service::Vpc);
        assert_eq!(param(&request, "routeTableNo"), Some("rt-1"));
        assert_eq!(param(&request, "routeList.1.targetTypeCode"), Some("NATGW"));
        assert_eq!(param(&request, "routeList.1.targetNo"), Some("42"));
    }

    #[test]
    fn test_cluster_delete_uses_rest_path() {
        let request = operation_request(&Operation::Delete {
            kind: ResourceKind::KubernetesCluster,
            id: "c-1".into(),
        })
        .unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/clusters/c-1");
        assert!(request.params.is_empty());
    }

    #[test]
    fn test_unsupported_single_delete() {
        let err = operation_request(&Operation::Delete {
            kind: ResourceKind::Server,
            id: "s1".into(),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            NcloudError::Unsupported {
                kind: ResourceKind::Server,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Unsupported operation for Server: delete");
    }
}
