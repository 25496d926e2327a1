//! Whole-record last-write-wins resolution.
//!
//! Given a local and a remote version of the same entity, pick exactly one
//! of them. The winner is returned by reference and is never altered, so the
//! caller can tell which input won by identity as well as by the reported
//! [`ConflictResolution`].
//!
//! # Algorithm
//!
//! 1. Reject either input that is not a JSON object
//! 2. Read each side's timestamp field into a [`Recency`]
//! 3. Compare with [`Recency::decide`]: later wins, ties and double-unknown
//!    go to the remote

use crate::record::{as_record, Side, Versioned, DEFAULT_TIMESTAMP_FIELD};
use crate::{error::Result, Recency};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a conflict was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictResolution {
    /// Local record won
    LocalWins,
    /// Remote record won
    RemoteWins,
}

impl ConflictResolution {
    pub fn winner_side(&self) -> Side {
        match self {
            ConflictResolution::LocalWins => Side::Local,
            ConflictResolution::RemoteWins => Side::Remote,
        }
    }
}

/// The outcome of a resolution: the winning input and which side it was.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved<'a, T> {
    pub resolution: ConflictResolution,
    pub winner: &'a T,
}

impl<'a, T> Clone for Resolved<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Resolved<'a, T> {}

impl<'a, T> Resolved<'a, T> {
    fn pick(resolution: ConflictResolution, local: &'a T, remote: &'a T) -> Self {
        let winner = match resolution {
            ConflictResolution::LocalWins => local,
            ConflictResolution::RemoteWins => remote,
        };
        Self { resolution, winner }
    }
}

/// Resolve two JSON records by their `updatedAt` field.
///
/// Fails only if either side is not a JSON object.
pub fn resolve_conflict<'a>(local: &'a Value, remote: &'a Value) -> Result<&'a Value> {
    resolve_conflict_by(local, remote, DEFAULT_TIMESTAMP_FIELD).map(|resolved| resolved.winner)
}

/// Resolve two JSON records by an explicit timestamp field.
pub fn resolve_conflict_by<'a>(
    local: &'a Value,
    remote: &'a Value,
    timestamp_field: &str,
) -> Result<Resolved<'a, Value>> {
    let local_fields = as_record(local, Side::Local)?;
    let remote_fields = as_record(remote, Side::Remote)?;

    let local_recency = Recency::from_value(local_fields.get(timestamp_field));
    let remote_recency = Recency::from_value(remote_fields.get(timestamp_field));

    if !local_recency.is_known() {
        tracing::trace!(field = timestamp_field, side = %Side::Local, "unparseable timestamp");
    }
    if !remote_recency.is_known() {
        tracing::trace!(field = timestamp_field, side = %Side::Remote, "unparseable timestamp");
    }

    let resolution = Recency::decide(local_recency, remote_recency);
    Ok(Resolved::pick(resolution, local, remote))
}

/// Resolve two typed records. Infallible: the type already guarantees shape.
pub fn resolve_versioned<'a, T: Versioned>(local: &'a T, remote: &'a T) -> Resolved<'a, T> {
    let resolution = Recency::decide(local.recency(), remote.recency());
    Resolved::pick(resolution, local, remote)
}
