//! Serde data structures for the opsquery configuration file.
//!
//! Contains [`Config`] (the root), [`HaproxySettings`],
//! [`ConsulSettings`] and [`TableSettings`]. Every section is optional
//! and falls back to defaults; unknown fields are rejected.

use serde::{Deserialize, Serialize};

use crate::consul::DEFAULT_ADDRESS;
use crate::query::FanOutPolicy;

const fn default_timeout() -> u64 {
    5000
}

fn default_consul_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_default_fan_out(v: &FanOutPolicy) -> bool {
    *v == FanOutPolicy::default()
}

fn is_default_consul_address(v: &str) -> bool {
    v == DEFAULT_ADDRESS
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "HaproxySettings::is_default")]
    pub haproxy: HaproxySettings,

    #[serde(default, skip_serializing_if = "ConsulSettings::is_default")]
    pub consul: ConsulSettings,

    #[serde(default, skip_serializing_if = "TableSettings::is_default")]
    pub tables: TableSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HaproxySettings {
    /// Milliseconds allowed for one admin-socket exchange.
    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,

    #[serde(default, skip_serializing_if = "is_default_fan_out")]
    pub fan_out: FanOutPolicy,
}

impl Default for HaproxySettings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            fan_out: FanOutPolicy::default(),
        }
    }
}

impl HaproxySettings {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsulSettings {
    #[serde(
        default = "default_consul_address",
        skip_serializing_if = "is_default_consul_address"
    )]
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,
}

impl Default for ConsulSettings {
    fn default() -> Self {
        Self {
            address: default_consul_address(),
            token: None,
            timeout: default_timeout(),
        }
    }
}

impl ConsulSettings {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TableSettings {
    /// Tables to leave out of the catalogue.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<String>,
}

impl TableSettings {
    fn is_default(&self) -> bool {
        self.disabled.is_empty()
    }
}
