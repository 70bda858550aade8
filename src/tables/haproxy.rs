//! HAProxy table schemas.
//!
//! `show info` and `show activity` print one `key: value` snapshot per
//! process; `show sess` prints one line per stream. Every row carries
//! the `addr` it was read from.

use super::{integer, text, ColumnDefinition};

#[must_use]
pub fn info_columns() -> Vec<ColumnDefinition> {
    vec![
        text("addr"),
        text("date_now"),
        text("Name"),
        text("Version"),
        text("Release_date"),
        text("node"),
        text("Uptime"),
        integer("Nbproc"),
        integer("Process_num"),
        integer("Pid"),
        integer("Uptime_sec"),
        integer("Memmax_MB"),
        integer("PoolAlloc_MB"),
        integer("PoolUsed_MB"),
        integer("PoolFailed"),
        integer("Ulimit-n"),
        integer("Maxsock"),
        integer("Maxconn"),
        integer("Hard_maxconn"),
        integer("CurrConns"),
        integer("CumConns"),
        integer("CumReq"),
        integer("MaxSslConns"),
        integer("CurrSslConns"),
        integer("CumSslConns"),
        integer("Maxpipes"),
        integer("PipesUsed"),
        integer("PipesFree"),
        integer("ConnRate"),
        integer("ConnRateLimit"),
        integer("MaxConnRate"),
        integer("SessRate"),
        integer("SessRateLimit"),
        integer("MaxSessRate"),
        integer("SslRate"),
        integer("SslRateLimit"),
        integer("MaxSslRate"),
        integer("SslFrontendKeyRate"),
        integer("SslFrontendMaxKeyRate"),
        integer("SslFrontendSessionReuse_pct"),
        integer("SslBackendKeyRate"),
        integer("SslBackendMaxKeyRate"),
        integer("SslCacheLookups"),
        integer("SslCacheMisses"),
        integer("CompressBpsIn"),
        integer("CompressBpsOut"),
        integer("CompressBpsRateLim"),
        integer("ZlibMemUsage"),
        integer("MaxZlibMemUsage"),
        integer("Tasks"),
        integer("Run_queue"),
        integer("Idle_pct"),
    ]
}

#[must_use]
pub fn activity_columns() -> Vec<ColumnDefinition> {
    vec![
        text("addr"),
        text("date_now"),
        integer("thread_id"),
        integer("loops"),
        integer("wake_cache"),
        integer("wake_tasks"),
        integer("wake_applets"),
        integer("wake_signal"),
        integer("poll_exp"),
        integer("poll_drop"),
        integer("poll_dead"),
        integer("poll_skip"),
        integer("fd_skip"),
        integer("fd_lock"),
        integer("fd_del"),
        integer("conn_dead"),
        integer("stream"),
        integer("empty_rq"),
        integer("long_rq"),
    ]
}

#[must_use]
pub fn session_columns() -> Vec<ColumnDefinition> {
    vec![
        text("addr"),
        text("id"),
        text("proto"),
        text("src"),
        text("fe"),
        text("be"),
        text("srv"),
        text("ts"),
        text("age"),
        integer("calls"),
        text("rq_f"),
        text("rq_i"),
        text("rq_an"),
        text("rq_rx"),
        text("rq_wx"),
        text("rq_ax"),
        text("rp_f"),
        text("rp_i"),
        text("rp_an"),
        text("rp_rx"),
        text("rp_wx"),
        text("rp_ax"),
        text("exp"),
    ]
}
