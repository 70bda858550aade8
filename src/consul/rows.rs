//! Flattening Consul responses into table rows.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::models::{AgentCheck, AgentMember, AgentService};
use crate::query::Row;

fn row<const N: usize>(fields: [(&str, String); N]) -> Row {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[must_use]
pub fn check_rows(checks: &BTreeMap<String, AgentCheck>) -> Vec<Row> {
    checks
        .values()
        .map(|check| {
            let def = &check.definition;
            row([
                ("Node", check.node.clone()),
                ("CheckID", check.check_id.clone()),
                ("Name", check.name.clone()),
                ("Status", check.status.clone()),
                ("Notes", check.notes.clone()),
                ("Output", check.output.clone()),
                ("ServiceID", check.service_id.clone()),
                ("ServiceName", check.service_name.clone()),
                ("HTTP", def.http.clone()),
                ("Header", header_text(def.header.as_ref())),
                ("Method", def.method.clone()),
                ("TLSSkipVerify", def.tls_skip_verify.to_string()),
                ("TCP", def.tcp.clone()),
                ("Interval", duration_text(&def.interval)),
                ("Timeout", duration_text(&def.timeout)),
                (
                    "DeregisterCriticalServiceAfter",
                    duration_text(&def.deregister_critical_service_after),
                ),
            ])
        })
        .collect()
}

#[must_use]
pub fn member_rows(members: &[AgentMember]) -> Vec<Row> {
    members
        .iter()
        .map(|m| {
            row([
                ("Name", m.name.clone()),
                ("Addr", m.addr.clone()),
                ("Tags", flat(m.tags.as_ref())),
                ("Port", m.port.to_string()),
                ("Status", m.status.to_string()),
                ("ProtocolMin", m.protocol_min.to_string()),
                ("ProtocolMax", m.protocol_max.to_string()),
                ("ProtocolCur", m.protocol_cur.to_string()),
                ("DelegateMin", m.delegate_min.to_string()),
                ("DelegateMax", m.delegate_max.to_string()),
                ("DelegateCur", m.delegate_cur.to_string()),
            ])
        })
        .collect()
}

#[must_use]
pub fn service_rows(services: &BTreeMap<String, AgentService>) -> Vec<Row> {
    services
        .values()
        .map(|s| {
            row([
                ("ID", s.id.clone()),
                ("Service", s.service.clone()),
                ("Tags", s.tags.as_deref().unwrap_or_default().join(",")),
                ("Address", s.address.clone()),
                ("Port", s.port.to_string()),
                ("EnableTagOverride", s.enable_tag_override.to_string()),
                ("CreateIndex", s.create_index.to_string()),
                ("ModifyIndex", s.modify_index.to_string()),
            ])
        })
        .collect()
}

/// One row per string, under `column`.
#[must_use]
pub fn single_column_rows(column: &str, values: &[String]) -> Vec<Row> {
    values.iter().map(|v| row([(column, v.clone())])).collect()
}

/// `k=v` pairs joined by `,`, in key order.
fn flat(tags: Option<&BTreeMap<String, String>>) -> String {
    let mut out = String::new();
    for (i, (k, v)) in tags.into_iter().flatten().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{k}={v}");
    }
    out
}

/// `name=v1|v2` pairs joined by `,`, in header-name order.
fn header_text(header: Option<&BTreeMap<String, Vec<String>>>) -> String {
    let mut out = String::new();
    for (i, (name, values)) in header.into_iter().flatten().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{name}={}", values.join("|"));
    }
    out
}

/// Render a Consul duration as Go duration text.
///
/// Agents send either an already-formatted string (`"10s"`) or a
/// nanosecond count. Absent values read as zero.
#[must_use]
pub fn duration_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => s.clone(),
        serde_json::Value::Number(n) => n.as_i64().map_or_else(|| n.to_string(), go_duration),
        _ => "0s".to_string(),
    }
}

const MICROSECOND: u64 = 1_000;
const MILLISECOND: u64 = 1_000_000;
const SECOND: u64 = 1_000_000_000;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

fn go_duration(ns: i64) -> String {
    if ns == 0 {
        return "0s".to_string();
    }
    let sign = if ns < 0 { "-" } else { "" };
    let ns = ns.unsigned_abs();

    if ns < MICROSECOND {
        return format!("{sign}{ns}ns");
    }
    if ns < MILLISECOND {
        return format!("{sign}{}µs", decimal(ns, MICROSECOND));
    }
    if ns < SECOND {
        return format!("{sign}{}ms", decimal(ns, MILLISECOND));
    }

    let mut out = sign.to_string();
    let hours = ns / HOUR;
    let minutes = (ns % HOUR) / MINUTE;
    if hours > 0 {
        let _ = write!(out, "{hours}h{minutes}m");
    } else if minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    let _ = write!(out, "{}s", decimal(ns % MINUTE, SECOND));
    out
}

/// `value / unit` with trailing zero decimals dropped.
fn decimal(value: u64, unit: u64) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn go_duration_matches_go_formatting() {
        assert_eq!(go_duration(0), "0s");
        assert_eq!(go_duration(500), "500ns");
        assert_eq!(go_duration(1_500), "1.5µs");
        assert_eq!(go_duration(250_000_000), "250ms");
        assert_eq!(go_duration(10 * SECOND as i64), "10s");
        assert_eq!(go_duration(1_500_000_000), "1.5s");
        assert_eq!(go_duration(90 * SECOND as i64), "1m30s");
        assert_eq!(go_duration(HOUR as i64), "1h0m0s");
        assert_eq!(go_duration(-(2 * SECOND as i64)), "-2s");
    }

    #[test]
    fn duration_text_accepts_strings_numbers_and_absence() {
        assert_eq!(duration_text(&json!("30s")), "30s");
        assert_eq!(duration_text(&json!(30_000_000_000_i64)), "30s");
        assert_eq!(duration_text(&json!("")), "0s");
        assert_eq!(duration_text(&serde_json::Value::Null), "0s");
    }

    #[test]
    fn check_row_flattens_definition() {
        let checks: BTreeMap<String, AgentCheck> = serde_json::from_value(json!({
            "service:web": {
                "Node": "node1",
                "CheckID": "service:web",
                "Name": "web health",
                "Status": "passing",
                "ServiceID": "web",
                "ServiceName": "web",
                "Definition": {
                    "HTTP": "http://localhost/health",
                    "Header": {"X-Probe": ["a", "b"], "Accept": ["text/plain"]},
                    "Method": "GET",
                    "TLSSkipVerify": true,
                    "Interval": "10s",
                    "Timeout": 1_000_000_000_i64
                }
            }
        }))
        .unwrap();

        let rows = check_rows(&checks);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), 16);
        assert_eq!(row["Node"], "node1");
        assert_eq!(row["Header"], "Accept=text/plain,X-Probe=a|b");
        assert_eq!(row["TLSSkipVerify"], "true");
        assert_eq!(row["Interval"], "10s");
        assert_eq!(row["Timeout"], "1s");
        assert_eq!(row["DeregisterCriticalServiceAfter"], "0s");
        assert_eq!(row["TCP"], "");
    }

    #[test]
    fn member_tags_are_flattened_in_key_order() {
        let members: Vec<AgentMember> = serde_json::from_value(json!([
            {"Name": "n1", "Addr": "10.0.0.1", "Port": 8301, "Status": 1,
             "Tags": {"role": "consul", "dc": "dc1"}}
        ]))
        .unwrap();
        let rows = member_rows(&members);
        assert_eq!(rows[0]["Tags"], "dc=dc1,role=consul");
        assert_eq!(rows[0]["Port"], "8301");
        assert_eq!(rows[0]["Status"], "1");
    }

    #[test]
    fn service_tags_are_joined() {
        let services: BTreeMap<String, AgentService> = serde_json::from_value(json!({
            "web-1": {"ID": "web-1", "Service": "web", "Tags": ["v1", "primary"],
                      "Port": 8080, "EnableTagOverride": false, "CreateIndex": 7, "ModifyIndex": 9},
            "db-1": {"ID": "db-1", "Service": "db", "Tags": null}
        }))
        .unwrap();
        let rows = service_rows(&services);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ID"], "db-1");
        assert_eq!(rows[0]["Tags"], "");
        assert_eq!(rows[1]["Tags"], "v1,primary");
        assert_eq!(rows[1]["ModifyIndex"], "9");
    }

    #[test]
    fn single_column_rows_one_per_value() {
        let rows = single_column_rows("peer", &["10.0.0.1:8300".into(), "10.0.0.2:8300".into()]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["peer"], "10.0.0.2:8300");
    }
}
