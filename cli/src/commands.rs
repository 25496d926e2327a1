//! Command implementations.
//!
//! Each command reads its two records, runs them through a [`MergeEngine`]
//! and returns the JSON to print. Nothing here writes to stdout, which keeps
//! the commands testable without a process.

use crate::cli::{Cli, Command, MergeArgs, RecordPair, ResolveArgs};
use crate::config::{validate_field_name, Config};
use crate::error::{CliError, Result};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;
use syncmerge_engine::{MergeEngine, UnionFields};

const STDIN: &str = "-";

/// Run the parsed command and render its output.
pub fn run_command(cli: &Cli, config: &Config, stdin: &mut dyn Read) -> Result<String> {
    let output = match &cli.command {
        Command::Resolve(args) => cmd_resolve(args, config, stdin)?,
        Command::Merge(args) => cmd_merge(args, config, stdin)?,
    };

    let rendered = if cli.compact {
        serde_json::to_string(&output)
    } else {
        serde_json::to_string_pretty(&output)
    };
    rendered.map_err(CliError::Output)
}

fn cmd_resolve(args: &ResolveArgs, config: &Config, stdin: &mut dyn Read) -> Result<Value> {
    let (local, remote) = load_pair(&args.records, stdin)?;
    let engine = MergeEngine::new(config.merge_config());

    let resolved = engine.resolve(&local, &remote)?;
    tracing::info!(
        resolution = ?resolved.resolution,
        field = %config.timestamp_field,
        "resolved"
    );

    if args.explain {
        serde_json::to_value(resolved).map_err(CliError::Output)
    } else {
        Ok(resolved.winner.clone())
    }
}

fn cmd_merge(args: &MergeArgs, config: &Config, stdin: &mut dyn Read) -> Result<Value> {
    let (local, remote) = load_pair(&args.records, stdin)?;

    let mut merge_config = config.merge_config();
    if !args.union_fields.is_empty() {
        for name in &args.union_fields {
            validate_field_name(name)?;
        }
        merge_config = merge_config.with_union_fields(UnionFields::from_iter(&args.union_fields));
    }
    let engine = MergeEngine::new(merge_config);

    let merged = engine.merge_member_data(&local, &remote)?;
    tracing::info!(
        union_fields = ?engine.config().union_fields,
        "merged"
    );

    Ok(merged)
}

fn load_pair(records: &RecordPair, stdin: &mut dyn Read) -> Result<(Value, Value)> {
    if records.local.as_os_str() == STDIN && records.remote.as_os_str() == STDIN {
        return Err(CliError::StdinTwice);
    }
    let local = load_record(&records.local, stdin)?;
    let remote = load_record(&records.remote, stdin)?;
    Ok((local, remote))
}

fn load_record(path: &Path, stdin: &mut dyn Read) -> Result<Value> {
    let raw = if path.as_os_str() == STDIN {
        let mut buf = String::new();
        stdin.read_to_string(&mut buf).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        buf
    } else {
        fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };

    tracing::debug!(path = %path.display(), bytes = raw.len(), "loaded record");

    serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::{self, Write};
    use tempfile::{NamedTempFile, TempDir};

    fn write_record(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn run(args: &[&str], stdin: &str) -> Result<Value> {
        let cli = Cli::try_parse_from(std::iter::once("syncmerge").chain(args.iter().copied()))
            .unwrap();
        let config = Config::from_lookup(|_| None).unwrap();
        let output = run_command(&cli, &config, &mut stdin.as_bytes())?;
        Ok(serde_json::from_str(&output).unwrap())
    }

    fn path(file: &NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }

    #[test]
    fn resolve_prints_winner() {
        let local = write_record(&json!({"updatedAt": "2026-01-01T00:00:00Z", "v": 1}));
        let remote = write_record(&json!({"updatedAt": "2026-01-02T00:00:00Z", "v": 2}));

        let output = run(&["resolve", path(&local), path(&remote)], "").unwrap();
        assert_eq!(output, json!({"updatedAt": "2026-01-02T00:00:00Z", "v": 2}));
    }

    #[test]
    fn resolve_explain() {
        let local = write_record(&json!({"updatedAt": 2000, "v": 1}));
        let remote = write_record(&json!({"updatedAt": 1000, "v": 2}));

        let output = run(
            &["resolve", path(&local), path(&remote), "--explain", "--compact"],
            "",
        )
        .unwrap();
        assert_eq!(
            output,
            json!({"resolution": "localWins", "winner": {"updatedAt": 2000, "v": 1}})
        );
    }

    #[test]
    fn merge_reads_local_from_stdin() {
        let remote = write_record(&json!({"skills": ["vocals"], "name": "Remote"}));

        let output = run(
            &["merge", "-", path(&remote)],
            r#"{"skills": ["guitar"], "age": 30}"#,
        )
        .unwrap();
        assert_eq!(
            output,
            json!({"skills": ["guitar", "vocals"], "name": "Remote", "age": 30})
        );
    }

    #[test]
    fn merge_union_field_override() {
        let local = write_record(&json!({"skills": ["a"], "genres": ["folk"]}));
        let remote = write_record(&json!({"skills": ["b"], "genres": ["jazz"]}));

        let output = run(
            &["merge", path(&local), path(&remote), "--union-field", "genres"],
            "",
        )
        .unwrap();
        assert_eq!(output["genres"], json!(["folk", "jazz"]));
        assert_eq!(output["skills"], json!(["b"]));
    }

    #[test]
    fn merge_rejects_bad_union_field() {
        let local = write_record(&json!({}));
        let remote = write_record(&json!({}));

        let err = run(
            &["merge", path(&local), path(&remote), "--union-field", "a b"],
            "",
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn non_object_record_is_engine_error() {
        let local = write_record(&json!([1, 2, 3]));
        let remote = write_record(&json!({}));

        let err = run(&["merge", path(&local), path(&remote)], "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Engine error: invalid argument: local record must be an object, got array"
        );
    }

    #[test]
    fn invalid_json_names_the_file() {
        let mut local = NamedTempFile::new().unwrap();
        write!(local, "{{not json").unwrap();
        let remote = write_record(&json!({}));

        let err = run(&["resolve", path(&local), path(&remote)], "").unwrap_err();
        match err {
            CliError::Json { path: p, .. } => assert_eq!(p, local.path()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let remote = write_record(&json!({}));

        let err = run(
            &["resolve", missing.to_str().unwrap(), path(&remote)],
            "",
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn stdin_only_once() {
        let err = run(&["resolve", "-", "-"], "{}").unwrap_err();
        assert!(matches!(err, CliError::StdinTwice));
    }

    #[test]
    fn compact_output_is_single_line() {
        let local = write_record(&json!({"a": 1, "b": [1, 2]}));
        let remote = write_record(&json!({"c": 3}));
        let cli = Cli::try_parse_from([
            "syncmerge",
            "merge",
            path(&local),
            path(&remote),
            "--compact",
        ])
        .unwrap();
        let config = Config::from_lookup(|_| None).unwrap();

        let output = run_command(&cli, &config, &mut io::empty()).unwrap();
        assert!(!output.contains('\n'));
    }
}
