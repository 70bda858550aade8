//! Row extraction and endpoint resolution through the public query API.

use std::collections::BTreeSet;
use std::io;

use async_trait::async_trait;

use opsquery::error::OpsQueryError;
use opsquery::haproxy::CommandClient;
use opsquery::query::{
    kv, list_addresses, session, Extractor, FanOut, FanOutPolicy, NamedCaptureMatcher,
    QueryContext, SkipReason,
};

const SESSION_LINE: &str = "0x1: proto=tcpv4 src=127.0.0.1:49765 fe=psql be=psql srv=cockroach1 ts=08 age=8s calls=3 rq[f=40848202h,i=0,an=00h,rx=52s,wx=,ax=] rp[f=c0048202h,i=0,an=00h,rx=52s,wx=,ax=] s0=[7,8h,fd=8,ex=] exp=2s";

/// Replies with a fixed body per endpoint, or refuses.
struct Sockets(Vec<(&'static str, &'static str)>);

#[async_trait]
impl CommandClient for Sockets {
    async fn run_command(&self, endpoint: &str, _command: &str) -> io::Result<String> {
        self.0
            .iter()
            .find(|(e, _)| *e == endpoint)
            .map(|(_, body)| (*body).to_string())
            .ok_or_else(|| io::Error::from(io::ErrorKind::ConnectionRefused))
    }
}

fn endpoints(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn kv_block_yields_one_row_with_addr_and_keys() {
    let text = "Name: HAProxy\nVersion: 2.8.3\n\nPid: 42\n";
    let extraction = kv::extract(text, "lb1:9999");
    assert_eq!(extraction.rows.len(), 1);
    assert!(extraction.skipped.is_empty());

    let keys: BTreeSet<&str> = extraction.rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, BTreeSet::from(["addr", "Name", "Version", "Pid"]));
}

#[test]
fn kv_value_keeps_everything_after_first_colon() {
    let extraction = kv::extract("SslFrontendSessionReuse_pct: 12:30\n", "lb1:9999");
    assert_eq!(extraction.rows[0]["SslFrontendSessionReuse_pct"], "12:30");
}

#[test]
fn kv_line_without_separator_is_skipped() {
    let extraction = kv::extract("Pid: 1\ngarbage\nNbproc: 1\n", "lb1:9999");
    assert_eq!(extraction.rows[0].len(), 3);
    assert_eq!(extraction.skipped.len(), 1);
    assert_eq!(extraction.skipped[0].line_number, 2);
    assert_eq!(extraction.skipped[0].reason, SkipReason::MissingSeparator);
}

#[test]
fn session_sample_line_yields_listed_fields() {
    let extraction = session::extract(SESSION_LINE, "lb1:9999");
    let row = &extraction.rows[0];

    assert_eq!(row["id"], "0x1");
    assert_eq!(row["proto"], "tcpv4");
    assert_eq!(row["src"], "127.0.0.1:49765");
    assert_eq!(row["fe"], "psql");
    assert_eq!(row["be"], "psql");
    assert_eq!(row["srv"], "cockroach1");
    assert_eq!(row["ts"], "08");
    assert_eq!(row["age"], "8s");
    assert_eq!(row["calls"], "3");
    assert_eq!(row["rq_f"], "40848202h");
    assert_eq!(row["rq_wx"], "");
    assert_eq!(row["rp_i"], "0");
    assert_eq!(row["exp"], "2s");
    assert_eq!(row["addr"], "lb1:9999");
    assert_eq!(row.len(), 23);
}

#[test]
fn bad_session_lines_do_not_affect_siblings() {
    let text = format!("{SESSION_LINE}\nnot a session\n\n{SESSION_LINE}\n");
    let extraction = session::extract(&text, "lb1:9999");
    assert_eq!(extraction.rows.len(), 2);
    assert_eq!(extraction.skipped.len(), 1);
    assert_eq!(extraction.skipped[0].line_number, 2);
    assert_eq!(extraction.skipped[0].reason, SkipReason::GrammarMismatch);
}

#[test]
fn matcher_returns_named_groups_only() {
    let matcher = NamedCaptureMatcher::new(r"(?P<key>\w+)=(\d+)").unwrap();
    let fields = matcher.extract("  a=1 b=2");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["key"], "a");
    assert!(matcher.extract("nothing here").is_empty());
}

#[test]
fn no_addr_predicate_is_an_error() {
    let result = list_addresses(&QueryContext::default());
    assert!(matches!(
        result,
        Err(OpsQueryError::MissingAddressConstraint)
    ));
}

#[test]
fn addr_in_list_keeps_order_and_duplicates() {
    let ctx = QueryContext::with_equals("addr", ["b:1", "a:1", "b:1"]);
    assert_eq!(list_addresses(&ctx).unwrap(), vec!["b:1", "a:1", "b:1"]);
}

#[tokio::test]
async fn single_endpoint_query_end_to_end() {
    let client = Sockets(vec![("10.0.0.1:9999", "Pid: 1234\nUptime: 0d 0h1m\n")]);
    let ctx = QueryContext::with_equals("addr", ["10.0.0.1:9999"]);
    let addrs = list_addresses(&ctx).unwrap();

    let rows = FanOut::new(&client, FanOutPolicy::default())
        .run(&addrs, "show info", Extractor::KeyValue)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 3);
    assert_eq!(rows[0]["addr"], "10.0.0.1:9999");
    assert_eq!(rows[0]["Pid"], "1234");
    assert_eq!(rows[0]["Uptime"], "0d 0h1m");
}

#[tokio::test]
async fn multi_endpoint_query_returns_only_first_endpoints_rows() {
    let client = Sockets(vec![("lb1:9999", "Pid: 1\n"), ("lb2:9999", "Pid: 2\n")]);
    let addrs = endpoints(&["lb1:9999", "lb2:9999"]);
    let rows = FanOut::new(&client, FanOutPolicy::First)
        .run(&addrs, "show info", Extractor::KeyValue)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["addr"], "lb1:9999");
}

#[tokio::test]
async fn all_policy_concatenates_endpoints_in_order() {
    let client = Sockets(vec![("lb1:80", SESSION_LINE), ("lb2:80", SESSION_LINE)]);
    let addrs = endpoints(&["lb1:80", "lb2:80"]);
    let rows = FanOut::new(&client, FanOutPolicy::All)
        .run(&addrs, "show sess", Extractor::Sessions)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["addr"], "lb1:80");
    assert_eq!(rows[1]["addr"], "lb2:80");
}

#[tokio::test]
async fn fetch_failure_on_any_endpoint_returns_no_rows() {
    let client = Sockets(vec![("lb1:9999", "Pid: 1\n")]);
    let addrs = endpoints(&["lb1:9999", "lb2:9999"]);
    let err = FanOut::new(&client, FanOutPolicy::All)
        .run(&addrs, "show info", Extractor::KeyValue)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("show info"));
    match err {
        OpsQueryError::FetchFailure { endpoint, .. } => assert_eq!(endpoint, "lb2:9999"),
        other => panic!("expected fetch failure, got {other}"),
    }
}
