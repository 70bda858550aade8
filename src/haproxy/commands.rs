//! Admin-socket commands consumed by the HAProxy tables.

pub const SHOW_INFO: &str = "show info";
pub const SHOW_ACTIVITY: &str = "show activity";
pub const SHOW_SESS: &str = "show sess";

/// Wire form of a command: HAProxy reads one command per line.
#[must_use]
pub fn framed(command: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(command.len() + 1);
    buf.extend_from_slice(command.trim_end_matches('\n').as_bytes());
    buf.push(b'\n');
    buf
}
