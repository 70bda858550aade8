//! Consul table schemas and generators.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::{integer, text, ColumnDefinition};
use crate::consul::models::{AgentCheck, AgentMember, AgentService};
use crate::consul::{rows, ConsulTransport};
use crate::error::OpsQueryError;
use crate::query::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsulTable {
    AgentChecks,
    AgentMembers,
    AgentServices,
    CatalogDatacenter,
    StatusLeader,
    StatusPeers,
}

impl ConsulTable {
    pub const ALL: [Self; 6] = [
        Self::AgentChecks,
        Self::AgentMembers,
        Self::AgentServices,
        Self::CatalogDatacenter,
        Self::StatusLeader,
        Self::StatusPeers,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AgentChecks => "consul_agent_checks",
            Self::AgentMembers => "consul_agent_members",
            Self::AgentServices => "consul_agent_services",
            Self::CatalogDatacenter => "consul_catalog_datacenter",
            Self::StatusLeader => "consul_status_leader",
            Self::StatusPeers => "consul_status_peers",
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::AgentChecks => "/v1/agent/checks",
            Self::AgentMembers => "/v1/agent/members",
            Self::AgentServices => "/v1/agent/services",
            Self::CatalogDatacenter => "/v1/catalog/datacenters",
            Self::StatusLeader => "/v1/status/leader",
            Self::StatusPeers => "/v1/status/peers",
        }
    }

    #[must_use]
    pub fn columns(self) -> Vec<ColumnDefinition> {
        match self {
            Self::AgentChecks => vec![
                text("Node"),
                text("CheckID"),
                text("Name"),
                text("Status"),
                text("Notes"),
                text("Output"),
                text("ServiceID"),
                text("ServiceName"),
                text("HTTP"),
                text("Header"),
                text("Method"),
                text("TLSSkipVerify"),
                text("TCP"),
                text("Interval"),
                text("Timeout"),
                text("DeregisterCriticalServiceAfter"),
            ],
            Self::AgentMembers => vec![
                text("Name"),
                text("Addr"),
                text("Tags"),
                integer("Port"),
                integer("Status"),
                integer("ProtocolMin"),
                integer("ProtocolMax"),
                integer("ProtocolCur"),
                integer("DelegateMin"),
                integer("DelegateMax"),
                integer("DelegateCur"),
            ],
            Self::AgentServices => vec![
                text("ID"),
                text("Service"),
                text("Tags"),
                text("Address"),
                integer("Port"),
                integer("EnableTagOverride"),
                integer("CreateIndex"),
                integer("ModifyIndex"),
            ],
            Self::CatalogDatacenter => vec![text("Datacenter")],
            Self::StatusLeader => vec![text("Leader")],
            Self::StatusPeers => vec![text("peer")],
        }
    }

    pub async fn rows(self, transport: &dyn ConsulTransport) -> Result<Vec<Row>, OpsQueryError> {
        let rows = match self {
            Self::AgentChecks => {
                let checks: BTreeMap<String, AgentCheck> = self.fetch(transport).await?;
                rows::check_rows(&checks)
            }
            Self::AgentMembers => {
                let members: Vec<AgentMember> = self.fetch(transport).await?;
                rows::member_rows(&members)
            }
            Self::AgentServices => {
                let services: BTreeMap<String, AgentService> = self.fetch(transport).await?;
                rows::service_rows(&services)
            }
            Self::CatalogDatacenter => {
                let dcs: Vec<String> = self.fetch(transport).await?;
                rows::single_column_rows("Datacenter", &dcs)
            }
            Self::StatusLeader => {
                let leader: String = self.fetch(transport).await?;
                rows::single_column_rows("Leader", &[leader])
            }
            Self::StatusPeers => {
                let peers: Vec<String> = self.fetch(transport).await?;
                rows::single_column_rows("peer", &peers)
            }
        };

        tracing::debug!(
            table = self.name(),
            rows = rows.len(),
            "consul table generated"
        );
        Ok(rows)
    }

    async fn fetch<T: DeserializeOwned>(
        self,
        transport: &dyn ConsulTransport,
    ) -> Result<T, OpsQueryError> {
        let body = transport.get(self.path()).await?;
        serde_json::from_slice(&body).map_err(|source| OpsQueryError::ConsulDecode {
            endpoint: format!("{}{}", transport.address(), self.path()),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;

    struct CannedAgent {
        bodies: HashMap<&'static str, &'static str>,
    }

    #[async_trait]
    impl ConsulTransport for CannedAgent {
        fn address(&self) -> &str {
            "http://consul.test:8500"
        }

        async fn get(&self, path: &str) -> Result<Bytes, OpsQueryError> {
            self.bodies
                .get(path)
                .map(|b| Bytes::from_static(b.as_bytes()))
                .ok_or_else(|| OpsQueryError::fetch(self.address(), path, "status 404"))
        }
    }

    fn agent(path: &'static str, body: &'static str) -> CannedAgent {
        CannedAgent {
            bodies: HashMap::from([(path, body)]),
        }
    }

    #[tokio::test]
    async fn leader_is_a_single_row() {
        let agent = agent("/v1/status/leader", r#""10.0.0.1:8300""#);
        let rows = ConsulTable::StatusLeader.rows(&agent).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Leader"], "10.0.0.1:8300");
    }

    #[tokio::test]
    async fn datacenters_one_row_each() {
        let agent = agent("/v1/catalog/datacenters", r#"["dc1","dc2"]"#);
        let rows = ConsulTable::CatalogDatacenter.rows(&agent).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Datacenter"], "dc1");
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let agent = agent("/v1/status/peers", "not json");
        let err = ConsulTable::StatusPeers.rows(&agent).await.unwrap_err();
        match err {
            OpsQueryError::ConsulDecode { endpoint, .. } => {
                assert_eq!(endpoint, "http://consul.test:8500/v1/status/peers");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let agent = agent("/v1/status/peers", "[]");
        let result = ConsulTable::AgentChecks.rows(&agent).await;
        assert!(matches!(result, Err(OpsQueryError::FetchFailure { .. })));
    }

    #[test]
    fn row_keys_match_columns() {
        let checks: BTreeMap<String, AgentCheck> =
            BTreeMap::from([("c".to_string(), AgentCheck::default())]);
        let row = &rows::check_rows(&checks)[0];
        let mut keys: Vec<&str> = row.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut columns: Vec<&str> = ConsulTable::AgentChecks
            .columns()
            .iter()
            .map(|c| c.name)
            .collect();
        columns.sort_unstable();
        assert_eq!(keys, columns);
    }
}
