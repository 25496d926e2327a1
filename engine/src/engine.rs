//! The merge engine service.
//!
//! A [`MergeEngine`] bundles a [`MergeConfig`] with the two merge strategies.
//! It has no mutable state, so one instance can be shared by any number of
//! threads.
//!
//! The two strategies are independent. [`MergeEngine::resolve_conflict`]
//! picks one whole record by timestamp; [`MergeEngine::merge_member_data`]
//! overlays fields and unions sets without looking at timestamps. Callers
//! that want timestamp-aware scalars *and* unioned sets compose the two
//! themselves.

use crate::{error::Result, merge, resolve, MergeConfig, Recency, Resolved, Side};
use serde_json::Value;

/// Stateless conflict resolution and merge over JSON records.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    config: MergeConfig,
}

impl MergeEngine {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Pick the more recently written record; ties go to `remote`.
    pub fn resolve_conflict<'a>(&self, local: &'a Value, remote: &'a Value) -> Result<&'a Value> {
        self.resolve(local, remote).map(|resolved| resolved.winner)
    }

    /// Like [`resolve_conflict`](Self::resolve_conflict), also reporting
    /// which side won.
    pub fn resolve<'a>(&self, local: &'a Value, remote: &'a Value) -> Result<Resolved<'a, Value>> {
        let field = self.config.timestamp_field.as_str();
        let resolved = resolve::resolve_conflict_by(local, remote, field)?;

        tracing::debug!(
            field,
            resolution = ?resolved.resolution,
            local_known = Recency::from_value(local.get(field)).is_known(),
            remote_known = Recency::from_value(remote.get(field)).is_known(),
            "resolved conflict"
        );

        Ok(resolved)
    }

    /// Overlay `remote` onto `local`, unioning the configured set fields.
    pub fn merge_member_data(&self, local: &Value, remote: &Value) -> Result<Value> {
        let merged = merge::merge_member_data_with(local, remote, &self.config.union_fields)?;

        tracing::debug!(
            union_fields = ?self.config.union_fields,
            fields = merged.as_object().map_or(0, |fields| fields.len()),
            "merged member data"
        );

        Ok(merged)
    }

    /// Which side would win, without borrowing the records past the call.
    pub fn winner_side(&self, local: &Value, remote: &Value) -> Result<Side> {
        self.resolve(local, remote)
            .map(|resolved| resolved.resolution.winner_side())
    }
}

impl From<MergeConfig> for MergeEngine {
    fn from(config: MergeConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConflictResolution, Error, UnionFields, ValueKind};
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn default_engine_matches_free_functions() {
        let engine = MergeEngine::default();
        let local = json!({"updatedAt": "2026-01-01T00:00:00Z", "skills": ["guitar"]});
        let remote = json!({"updatedAt": "2026-01-02T00:00:00Z", "skills": ["vocals"]});

        assert_eq!(
            engine.resolve_conflict(&local, &remote).unwrap(),
            resolve::resolve_conflict(&local, &remote).unwrap()
        );
        assert_eq!(
            engine.merge_member_data(&local, &remote).unwrap(),
            merge::merge_member_data(&local, &remote).unwrap()
        );
    }

    #[test]
    fn concrete_sync_scenario() {
        let engine = MergeEngine::default();
        let local = json!({"updatedAt": "2026-01-01T00:00:00Z", "skills": ["guitar"]});
        let remote = json!({"updatedAt": "2026-01-02T00:00:00Z", "skills": ["vocals"]});

        let resolved = engine.resolve(&local, &remote).unwrap();
        assert_eq!(resolved.resolution, ConflictResolution::RemoteWins);
        assert!(std::ptr::eq(resolved.winner, &remote));

        assert_eq!(
            engine.merge_member_data(&local, &remote).unwrap(),
            json!({"updatedAt": "2026-01-02T00:00:00Z", "skills": ["guitar", "vocals"]})
        );
    }

    #[test]
    fn custom_timestamp_field() {
        let engine = MergeEngine::new(MergeConfig::default().with_timestamp_field("syncedAt"));
        let local = json!({"syncedAt": 3000, "updatedAt": 1000});
        let remote = json!({"syncedAt": 2000, "updatedAt": 4000});

        assert_eq!(engine.winner_side(&local, &remote).unwrap(), Side::Local);
    }

    #[test]
    fn unknown_timestamp_loses_to_known() {
        let engine = MergeEngine::default();
        let local = json!({"updatedAt": 1000, "v": 1});
        let remote = json!({"updatedAt": "never", "v": 2});

        let resolved = engine.resolve(&local, &remote).unwrap();
        assert_eq!(resolved.resolution, ConflictResolution::LocalWins);
        assert!(Recency::from_value(local.get("updatedAt")).is_known());
        assert!(!Recency::from_value(remote.get("updatedAt")).is_known());
    }

    #[test]
    fn custom_union_fields() {
        let engine = MergeEngine::new(
            MergeConfig::default().with_union_fields(UnionFields::from_iter(["roles"])),
        );
        let local = json!({"roles": ["admin"], "skills": ["a"]});
        let remote = json!({"roles": ["member"], "skills": ["b"]});

        let merged = engine.merge_member_data(&local, &remote).unwrap();
        assert_eq!(merged["roles"], json!(["admin", "member"]));
        assert_eq!(merged["skills"], json!(["b"]));
    }

    #[test]
    fn both_entry_points_validate() {
        let engine = MergeEngine::default();
        let record = json!({"v": 1});

        assert_eq!(
            engine.resolve_conflict(&json!(null), &record).unwrap_err(),
            Error::InvalidArgument {
                side: Side::Local,
                found: ValueKind::Null
            }
        );
        assert_eq!(
            engine.merge_member_data(&json!(42), &record).unwrap_err().side(),
            Side::Local
        );
        assert_eq!(
            engine.merge_member_data(&record, &json!(false)).unwrap_err().side(),
            Side::Remote
        );
    }

    #[test]
    fn shared_across_threads() {
        let engine = Arc::new(MergeEngine::default());
        let local = Arc::new(json!({"updatedAt": 1000, "skills": ["a"]}));
        let remote = Arc::new(json!({"updatedAt": 2000, "skills": ["b"]}));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let local = Arc::clone(&local);
                let remote = Arc::clone(&remote);
                thread::spawn(move || {
                    let side = engine.winner_side(&local, &remote).unwrap();
                    let merged = engine.merge_member_data(&local, &remote).unwrap();
                    (side, merged)
                })
            })
            .collect();

        for handle in handles {
            let (side, merged) = handle.join().unwrap();
            assert_eq!(side, Side::Remote);
            assert_eq!(merged["skills"], json!(["a", "b"]));
        }
    }
}
