//! `show sess` extraction.
//!
//! HAProxy prints one stream per line:
//!
//! ```text
//! 0x7fc4ca7012d0: proto=tcpv4 src=127.0.0.1:49765 fe=psql be=psql srv=cockroach1 ts=08 age=8s calls=3 rq[f=40848202h,i=0,an=00h,rx=52s,wx=,ax=] rp[f=c0048202h,i=0,an=00h,rx=52s,wx=,ax=] s0=[7,8h,fd=8,ex=] s1=[7,18h,fd=9,ex=] exp=2s
//! ```
//!
//! Everything between the `rp[...]` block and `exp=` varies across
//! HAProxy versions and is not captured.

use std::sync::LazyLock;

use super::{content_lines, Extraction, NamedCaptureMatcher, SkipReason, SkippedLine, ADDR_FIELD};

pub const SESSION_PATTERN: &str = concat!(
    r"(?P<id>\w+): proto=(?P<proto>\S+) src=(?P<src>\S+) fe=(?P<fe>\S+) be=(?P<be>\S+) ",
    r"srv=(?P<srv>\S+) ts=(?P<ts>\S+) age=(?P<age>\S+) calls=(?P<calls>\S+) ",
    r"rq\[f=(?P<rq_f>[^,]*),i=(?P<rq_i>[^,]*),an=(?P<rq_an>[^,]*),",
    r"rx=(?P<rq_rx>[^,]*),wx=(?P<rq_wx>[^,]*),ax=(?P<rq_ax>[^\]]*)\] ",
    r"rp\[f=(?P<rp_f>[^,]*),i=(?P<rp_i>[^,]*),an=(?P<rp_an>[^,]*),",
    r"rx=(?P<rp_rx>[^,]*),wx=(?P<rp_wx>[^,]*),ax=(?P<rp_ax>[^\]]*)\] ",
    r".*exp=(?P<exp>\S*)",
);

static SESSION_GRAMMAR: LazyLock<NamedCaptureMatcher> =
    LazyLock::new(|| NamedCaptureMatcher::new(SESSION_PATTERN).expect("valid regex"));

/// The compiled `show sess` grammar.
pub fn grammar() -> &'static NamedCaptureMatcher {
    &SESSION_GRAMMAR
}

/// One row per session line, each tagged with `endpoint`.
///
/// Lines that do not fit the grammar are skipped without affecting the
/// rest of the snapshot.
#[must_use]
pub fn extract(text: &str, endpoint: &str) -> Extraction {
    let grammar = grammar();
    let mut out = Extraction::default();

    for (line_number, line) in content_lines(text) {
        let mut row = grammar.extract(line);
        if row.is_empty() {
            out.skipped.push(SkippedLine {
                line_number,
                reason: SkipReason::GrammarMismatch,
            });
            continue;
        }
        row.insert(ADDR_FIELD.to_string(), endpoint.to_string());
        out.rows.push(row);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TCP_LINE: &str = "0x1: proto=tcpv4 src=127.0.0.1:49765 fe=psql be=psql srv=cockroach1 ts=08 age=8s calls=3 rq[f=40848202h,i=0,an=00h,rx=52s,wx=,ax=] rp[f=c0048202h,i=0,an=00h,rx=52s,wx=,ax=] s0=[7,8h,fd=8,ex=] exp=2s";
    const CLI_LINE: &str = "0x7fc4ca6009f0: proto=unix_stream src=unix:1 fe=GLOBAL be=<NONE> srv=<none> ts=02 age=18s calls=1 rq[f=40c08202h,i=0,an=00h,rx=,wx=,ax=] rp[f=c0048202h,i=0,an=00h,rx=,wx=,ax=] s0=[7,ch,fd=7,ex=] s1=[7,4018h,fd=-1,ex=] exp=1m42s";

    #[test]
    fn grammar_names_every_session_field() {
        let names: Vec<_> = grammar().field_names().collect();
        assert_eq!(
            names,
            vec![
                "id", "proto", "src", "fe", "be", "srv", "ts", "age", "calls", "rq_f", "rq_i",
                "rq_an", "rq_rx", "rq_wx", "rq_ax", "rp_f", "rp_i", "rp_an", "rp_rx", "rp_wx",
                "rp_ax", "exp",
            ]
        );
    }

    #[test]
    fn parses_tcp_session() {
        let out = extract(TCP_LINE, "10.0.0.1:9999");
        assert_eq!(out.rows.len(), 1);
        let row = &out.rows[0];
        assert_eq!(row.len(), 23);
        assert_eq!(row["addr"], "10.0.0.1:9999");
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
        assert_eq!(row["rq_rx"], "52s");
        assert_eq!(row["rq_wx"], "");
        assert_eq!(row["rp_f"], "c0048202h");
        assert_eq!(row["rp_i"], "0");
        assert_eq!(row["exp"], "2s");
    }

    #[test]
    fn parses_cli_session_with_two_stream_interfaces() {
        let out = extract(CLI_LINE, "a");
        let row = &out.rows[0];
        assert_eq!(row["src"], "unix:1");
        assert_eq!(row["be"], "<NONE>");
        assert_eq!(row["rq_rx"], "");
        assert_eq!(row["exp"], "1m42s");
    }

    #[test]
    fn bad_line_does_not_affect_siblings() {
        let text = format!("{TCP_LINE}\nthis is not a session\n\n{CLI_LINE}\n");
        let out = extract(&text, "a");
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[0]["id"], "0x1");
        assert_eq!(out.rows[1]["id"], "0x7fc4ca6009f0");
        assert_eq!(
            out.skipped,
            vec![SkippedLine {
                line_number: 2,
                reason: SkipReason::GrammarMismatch
            }]
        );
    }

    #[test]
    fn every_buffer_sub_field_may_be_empty() {
        let line = "0x2: proto=tcpv6 src=[::1]:4000 fe=web be=web srv=s1 ts=00 age=0s calls=1 rq[f=,i=,an=,rx=,wx=,ax=] rp[f=,i=,an=,rx=,wx=,ax=] exp=";
        let out = extract(line, "a");
        let row = &out.rows[0];
        for field in ["rq_f", "rq_ax", "rp_f", "rp_ax", "exp"] {
            assert_eq!(row[field], "", "{field}");
        }
    }

    #[test]
    fn truncated_line_is_skipped() {
        let out = extract("0x3: proto=tcpv4 src=1.2.3.4:5 fe=a be=b", "a");
        assert!(out.rows.is_empty());
        assert_eq!(out.skipped.len(), 1);
    }

    #[test]
    fn empty_response_has_no_rows() {
        let out = extract("\n", "a");
        assert!(out.rows.is_empty());
        assert!(out.skipped.is_empty());
    }
}
