//! # Syncmerge Engine
//!
//! Deterministic conflict resolution for offline-first records.
//!
//! When a client has been offline, it holds a *local* copy of an entity that
//! may have diverged from the *remote* (authoritative) copy. This crate
//! reconciles the two, with guaranteed determinism: the same inputs always
//! produce the same output.
//!
//! ## Design Principles
//!
//! - **No IO**: The engine has no knowledge of files, network, or platform
//! - **Pure**: Inputs are borrowed and never modified
//! - **Deterministic**: No hidden clock; only the timestamps in the records matter
//! - **Shareable**: No mutable state, safe to call from any number of threads
//!
//! ## Strategies
//!
//! ### Last-write-wins
//!
//! [`resolve_conflict`] returns whichever input carries the later
//! `updatedAt`. Ties go to the remote, and so does the case where neither
//! timestamp can be parsed. A missing timestamp counts as the Unix epoch.
//!
//! ### Structural merge
//!
//! [`merge_member_data`] lays the remote fields over the local ones and
//! unions set-valued fields (by default `skills`) that both sides carry as
//! arrays. It does not look at timestamps.
//!
//! The two strategies are independent; callers choose or combine them per
//! field type.
//!
//! ## Quick Start
//!
//! ```rust
//! use syncmerge_engine::{merge_member_data, resolve_conflict};
//! use serde_json::json;
//!
//! let local = json!({"updatedAt": "2026-01-01T00:00:00Z", "skills": ["guitar"]});
//! let remote = json!({"updatedAt": "2026-01-02T00:00:00Z", "skills": ["vocals"]});
//!
//! // Whole-record resolution: remote was written later
//! let winner = resolve_conflict(&local, &remote).unwrap();
//! assert_eq!(winner, &remote);
//!
//! // Field-level merge: remote fields overlay, skills are unioned
//! let merged = merge_member_data(&local, &remote).unwrap();
//! assert_eq!(
//!     merged,
//!     json!({"updatedAt": "2026-01-02T00:00:00Z", "skills": ["guitar", "vocals"]})
//! );
//! ```
//!
//! ## Configuration
//!
//! [`MergeEngine`] carries a [`MergeConfig`] naming the timestamp field and
//! the union fields:
//!
//! ```rust
//! use syncmerge_engine::{MergeConfig, MergeEngine, UnionFields};
//! use serde_json::json;
//!
//! let engine = MergeEngine::new(
//!     MergeConfig::default().with_union_fields(UnionFields::from_iter(["instruments"])),
//! );
//!
//! let merged = engine
//!     .merge_member_data(
//!         &json!({"instruments": ["bass"]}),
//!         &json!({"instruments": ["drums"]}),
//!     )
//!     .unwrap();
//! assert_eq!(merged["instruments"], json!(["bass", "drums"]));
//! ```
//!
//! ## FFI
//!
//! The [`ffi`] module provides C-compatible functions for use from other
//! languages. All records are exchanged as JSON strings.

pub mod config;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod merge;
pub mod record;
pub mod resolve;
pub mod timestamp;

// Re-export main types at crate root
pub use config::MergeConfig;
pub use engine::MergeEngine;
pub use error::Error;
pub use merge::{
    merge_member_data, merge_member_data_with, union_values, UnionFields, DEFAULT_UNION_FIELD,
};
pub use record::{as_record, Side, ValueKind, Versioned, VersionedRecord, DEFAULT_TIMESTAMP_FIELD};
pub use resolve::{
    resolve_conflict, resolve_conflict_by, resolve_versioned, ConflictResolution, Resolved,
};
pub use timestamp::Recency;
