//! Query predicates and endpoint resolution.
//!
//! A [`QueryContext`] carries the column-level constraints of one
//! query, the way the host hands them over. HAProxy tables read their
//! targets from the `addr` column; [`list_addresses`] pulls those out.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ADDR_FIELD;
use crate::error::OpsQueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<=")]
    LessThanOrEquals,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEquals,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "GLOB")]
    Glob,
    #[serde(rename = "REGEXP")]
    Regexp,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Constraint {
    #[serde(rename = "op")]
    pub operator: Operator,
    #[serde(rename = "expr")]
    pub expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConstraintList {
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QueryContext {
    #[serde(default)]
    pub constraints: HashMap<String, ConstraintList>,
}

impl QueryContext {
    /// Context constraining `column` to any of `values`, i.e. `column IN (...)`.
    #[must_use]
    pub fn with_equals<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let constraints = values
            .into_iter()
            .map(|v| Constraint {
                operator: Operator::Equals,
                expression: v.into(),
            })
            .collect();
        let mut ctx = Self::default();
        ctx.constraints
            .insert(column.to_string(), ConstraintList { constraints });
        ctx
    }
}

/// Endpoints named by the query's `addr = ...` constraints, in order.
///
/// Only equality constraints name an endpoint; `IN (...)` reaches us as
/// several of them. Anything else on `addr` is ignored. There is no
/// fallback to a default socket: a query without a usable `addr`
/// constraint fails with [`OpsQueryError::MissingAddressConstraint`].
pub fn list_addresses(ctx: &QueryContext) -> Result<Vec<String>, OpsQueryError> {
    let Some(list) = ctx.constraints.get(ADDR_FIELD) else {
        return Err(OpsQueryError::MissingAddressConstraint);
    };

    let mut addresses = Vec::with_capacity(list.constraints.len());
    for constraint in &list.constraints {
        if constraint.operator == Operator::Equals {
            addresses.push(constraint.expression.clone());
        } else {
            tracing::debug!(
                operator = ?constraint.operator,
                expr = %constraint.expression,
                "ignoring non-equality addr constraint"
            );
        }
    }

    if addresses.is_empty() {
        return Err(OpsQueryError::MissingAddressConstraint);
    }
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_list_in_order() {
        let ctx = QueryContext::with_equals("addr", ["10.0.0.2:9999", "10.0.0.1:9999"]);
        assert_eq!(
            list_addresses(&ctx).unwrap(),
            vec!["10.0.0.2:9999", "10.0.0.1:9999"]
        );
    }

    #[test]
    fn missing_addr_constraint_is_an_error() {
        let ctx = QueryContext::with_equals("pid", ["1"]);
        assert!(matches!(
            list_addresses(&ctx),
            Err(OpsQueryError::MissingAddressConstraint)
        ));
        assert!(matches!(
            list_addresses(&QueryContext::default()),
            Err(OpsQueryError::MissingAddressConstraint)
        ));
    }

    #[test]
    fn empty_addr_constraint_list_is_an_error() {
        let ctx = QueryContext::with_equals("addr", Vec::<String>::new());
        assert!(matches!(
            list_addresses(&ctx),
            Err(OpsQueryError::MissingAddressConstraint)
        ));
    }

    #[test]
    fn non_equality_constraints_are_ignored() {
        let mut ctx = QueryContext::with_equals("addr", ["127.0.0.1:9999"]);
        let like = Constraint {
            operator: Operator::Like,
            expression: "%:9999".into(),
        };
        let addr = ctx.constraints.get_mut("addr").unwrap();
        addr.constraints.insert(0, like);
        assert_eq!(list_addresses(&ctx).unwrap(), vec!["127.0.0.1:9999"]);
    }

    #[test]
    fn only_like_on_addr_counts_as_missing() {
        let mut ctx = QueryContext::default();
        ctx.constraints.insert(
            "addr".into(),
            ConstraintList {
                constraints: vec![Constraint {
                    operator: Operator::Like,
                    expression: "%".into(),
                }],
            },
        );
        assert!(list_addresses(&ctx).is_err());
    }

    #[test]
    fn duplicates_are_kept() {
        let ctx = QueryContext::with_equals("addr", ["a:1", "a:1"]);
        assert_eq!(list_addresses(&ctx).unwrap().len(), 2);
    }

    #[test]
    fn deserializes_host_json() {
        let json = r#"{"constraints":{"addr":{"constraints":[{"op":"=","expr":"unix:///run/haproxy.sock"}]}}}"#;
        let ctx: QueryContext = serde_json::from_str(json).unwrap();
        assert_eq!(
            list_addresses(&ctx).unwrap(),
            vec!["unix:///run/haproxy.sock"]
        );
    }
}
