//! Structural field merge with set-valued union fields.
//!
//! Unlike [`resolve`](crate::resolve), this never looks at timestamps. The
//! remote record is laid over the local one field by field, and for each
//! configured union field that both sides hold as an array, the two arrays
//! are combined as a set instead of the remote value replacing the local one.

use crate::error::Result;
use crate::record::{as_record, Side};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

/// Field merged by union when no other set is configured.
pub const DEFAULT_UNION_FIELD: &str = "skills";

/// Names of the fields whose array values are unioned rather than replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnionFields(BTreeSet<String>);

impl UnionFields {
    /// No union fields: the merge becomes a plain overlay.
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, field: impl Into<String>) -> bool {
        self.0.insert(field.into())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for UnionFields {
    fn default() -> Self {
        Self::from_iter([DEFAULT_UNION_FIELD])
    }
}

impl<S: Into<String>> FromIterator<S> for UnionFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for UnionFields {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// Merge with the default union field (`skills`).
pub fn merge_member_data(local: &Value, remote: &Value) -> Result<Value> {
    merge_member_data_with(local, remote, &UnionFields::default())
}

/// Overlay `remote` onto `local`, unioning the arrays named in `union_fields`.
///
/// `remote` may be partial: fields it does not carry keep their local value.
/// Neither input is modified; the result is a new object.
pub fn merge_member_data_with(
    local: &Value,
    remote: &Value,
    union_fields: &UnionFields,
) -> Result<Value> {
    let local_fields = as_record(local, Side::Local)?;
    let remote_fields = as_record(remote, Side::Remote)?;

    let mut merged: Map<String, Value> = local_fields.clone();
    for (field, value) in remote_fields {
        merged.insert(field.clone(), value.clone());
    }

    for field in union_fields.iter() {
        if let (Some(Value::Array(ours)), Some(Value::Array(theirs))) =
            (local_fields.get(field), remote_fields.get(field))
        {
            let union = union_values(ours, theirs);
            tracing::trace!(
                field,
                local = ours.len(),
                remote = theirs.len(),
                merged = union.len(),
                "union merged"
            );
            merged.insert(field.to_string(), Value::Array(union));
        }
    }

    Ok(Value::Object(merged))
}

/// Deduplicated union of two arrays.
///
/// Elements keep the order of their first occurrence, scanning `local` and
/// then `remote`. Duplicates within one side collapse too.
pub fn union_values(local: &[Value], remote: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::with_capacity(local.len() + remote.len());
    let mut union = Vec::with_capacity(local.len() + remote.len());

    for value in local.iter().chain(remote) {
        if seen.insert(union_key(value)) {
            union.push(value.clone());
        }
    }

    union
}

/// Equality key for [`union_values`].
///
/// `Value` is not `Hash`, so elements are keyed by their compact encoding,
/// which is canonical for sorted maps. Integral floats are keyed as the
/// integer they equal, so `2` and `2.0` are one element.
fn union_key(value: &Value) -> String {
    match value {
        Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            integral_numbers(value).to_string()
        }
        _ => value.to_string(),
    }
}

fn integral_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(integral_numbers).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), integral_numbers(field)))
                .collect(),
        ),
        _ => value.clone(),
    }
}
