//! Serde shapes for the Consul agent responses the tables read.
//!
//! Only consumed fields are declared; everything else in the agent's
//! JSON is ignored. Durations stay as raw JSON values because agents
//! send either Go duration strings or nanosecond integers.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentCheck {
    #[serde(rename = "Node")]
    pub node: String,
    #[serde(rename = "CheckID")]
    pub check_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Output")]
    pub output: String,
    #[serde(rename = "ServiceID")]
    pub service_id: String,
    #[serde(rename = "ServiceName")]
    pub service_name: String,
    #[serde(rename = "Definition")]
    pub definition: CheckDefinition,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckDefinition {
    #[serde(rename = "HTTP")]
    pub http: String,
    #[serde(rename = "Header")]
    pub header: Option<BTreeMap<String, Vec<String>>>,
    #[serde(rename = "Method")]
    pub method: String,
    #[serde(rename = "TLSSkipVerify")]
    pub tls_skip_verify: bool,
    #[serde(rename = "TCP")]
    pub tcp: String,
    #[serde(rename = "Interval")]
    pub interval: serde_json::Value,
    #[serde(rename = "Timeout")]
    pub timeout: serde_json::Value,
    #[serde(rename = "DeregisterCriticalServiceAfter")]
    pub deregister_critical_service_after: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AgentMember {
    pub name: String,
    pub addr: String,
    pub port: u16,
    pub tags: Option<BTreeMap<String, String>>,
    pub status: i64,
    pub protocol_min: u8,
    pub protocol_max: u8,
    pub protocol_cur: u8,
    pub delegate_min: u8,
    pub delegate_max: u8,
    pub delegate_cur: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentService {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Tags")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Port")]
    pub port: u16,
    #[serde(rename = "EnableTagOverride")]
    pub enable_tag_override: bool,
    #[serde(rename = "CreateIndex")]
    pub create_index: u64,
    #[serde(rename = "ModifyIndex")]
    pub modify_index: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_tolerates_missing_and_null_fields() {
        let json = r#"{"CheckID":"serfHealth","Name":"Serf Health Status","Status":"passing","Definition":{"Header":null}}"#;
        let check: AgentCheck = serde_json::from_str(json).unwrap();
        assert_eq!(check.check_id, "serfHealth");
        assert!(check.definition.header.is_none());
        assert!(check.definition.interval.is_null());
    }

    #[test]
    fn member_reads_pascal_case() {
        let json = r#"{"Name":"node1","Addr":"10.0.0.5","Port":8301,"Tags":{"role":"consul"},"Status":1,"ProtocolMin":1,"ProtocolMax":5,"ProtocolCur":2,"DelegateMin":2,"DelegateMax":5,"DelegateCur":4}"#;
        let member: AgentMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.port, 8301);
        assert_eq!(member.protocol_max, 5);
        assert_eq!(member.tags.unwrap()["role"], "consul");
    }

    #[test]
    fn service_with_null_tags() {
        let json = r#"{"ID":"web-1","Service":"web","Tags":null,"Port":80}"#;
        let svc: AgentService = serde_json::from_str(json).unwrap();
        assert!(svc.tags.is_none());
        assert!(!svc.enable_tag_override);
    }
}
