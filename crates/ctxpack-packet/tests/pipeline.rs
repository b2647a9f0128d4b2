//! End-to-end collector and replayer scenarios on real directory trees.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ctxpack_config::Config;
use ctxpack_packet::{RunMode, collect, format_record, replay};
use ctxpack_selectors::DEFAULT_EXCLUDED_EXTENSIONS;
use ctxpack_utils::error::CtxpackError;
use ctxpack_utils::report::{RecordingSink, ReportLevel};
use std::fs;
use tempfile::TempDir;

fn utf8_temp_dir() -> Result<(TempDir, Utf8PathBuf)> {
    let temp_dir = TempDir::new()?;
    let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, path))
}

fn write(root: &Utf8Path, relative: &str, content: impl AsRef<[u8]>) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn read(root: &Utf8Path, name: &str) -> Result<String> {
    Ok(fs::read_to_string(root.join(name))?)
}

#[test]
fn test_basic_collection_scenario() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "a.txt", "hello")?;
    write(&root, "b.png", [0x89, b'P', b'N', b'G'])?;
    write(&root, "node_modules/c.js", "ignored")?;
    write(&root, "d.txt", "")?;

    let mut sink = RecordingSink::new();
    let summary = collect(&Config::with_root(root.clone()), &mut sink)?;

    assert_eq!(
        read(&root, "project_context.txt")?,
        "--- Filename: a.txt ---\nhello\n\n---\n\n"
    );
    assert_eq!(read(&root, "file_names.txt")?, "a.txt\n");
    assert_eq!(summary.mode, RunMode::Collect);
    assert_eq!(summary.included, 1);
    assert_eq!(summary.failed, 0);
    // node_modules is pruned, never entered
    assert_eq!(summary.directories, 1);
    assert!(
        sink.events()
            .iter()
            .all(|e| !e.path.starts_with("node_modules"))
    );
    Ok(())
}

#[test]
fn test_replay_scenario_with_missing_entry() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "a.txt", "x")?;
    write(&root, "file_names.txt", "a.txt\nmissing.txt\n")?;

    let mut sink = RecordingSink::new();
    let summary = replay(&Config::with_root(root.clone()), &mut sink)?;

    assert_eq!(
        read(&root, "filtered_project_context.txt")?,
        "--- Filename: a.txt ---\nx\n\n---\n\n"
    );
    assert_eq!(summary.included, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(sink.paths_at(ReportLevel::Error), vec!["missing.txt"]);
    assert_eq!(sink.events()[1].message, "file does not exist");
    Ok(())
}

#[test]
fn test_collect_is_idempotent() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "src/main.rs", "fn main() {}\n")?;
    write(&root, "src/lib/mod.rs", "pub mod x;\n")?;
    write(&root, "notes.md", "# notes\r\nwindows line endings\r\n")?;
    write(&root, "Makefile", "all:\n\ttrue\n")?;

    let config = Config::with_root(root.clone());
    let first = collect(&config, &mut RecordingSink::new())?;
    let first_aggregate = fs::read(root.join("project_context.txt"))?;
    let first_names = fs::read(root.join("file_names.txt"))?;

    let second = collect(&config, &mut RecordingSink::new())?;

    assert_eq!(fs::read(root.join("project_context.txt"))?, first_aggregate);
    assert_eq!(fs::read(root.join("file_names.txt"))?, first_names);
    assert_eq!(first.blake3, second.blake3);
    assert_eq!(first.bytes, first_aggregate.len() as u64);
    Ok(())
}

#[test]
fn test_replay_of_collection_is_byte_identical() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "a.py", "print('a')\n")?;
    write(&root, "pkg/b.py", "B = 1")?;
    write(&root, "pkg/deep/c.toml", "[c]\nkey = \"v\"\n")?;
    write(&root, "empty.txt", "   ")?;

    let config = Config::with_root(root.clone());
    let collected = collect(&config, &mut RecordingSink::new())?;
    let replayed = replay(&config, &mut RecordingSink::new())?;

    assert_eq!(
        fs::read(root.join("filtered_project_context.txt"))?,
        fs::read(root.join("project_context.txt"))?
    );
    assert_eq!(collected.blake3, replayed.blake3);
    assert_eq!(replayed.mode, RunMode::Replay);
    assert_eq!(replayed.included, 3);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_trailing_whitespace_names_do_not_survive_replay() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "a.txt", "kept")?;
    write(&root, "sp.txt ", "spaced")?;

    let config = Config::with_root(root.clone());
    let mut collect_sink = RecordingSink::new();
    collect(&config, &mut collect_sink)?;
    assert_eq!(
        collect_sink.paths_at(ReportLevel::Included),
        vec!["a.txt", "sp.txt "]
    );

    // path-list lines are trimmed, so the name no longer resolves
    let mut replay_sink = RecordingSink::new();
    let replayed = replay(&config, &mut replay_sink)?;
    assert_eq!(replay_sink.paths_at(ReportLevel::Included), vec!["a.txt"]);
    assert_eq!(replay_sink.paths_at(ReportLevel::Error), vec!["sp.txt"]);
    assert_eq!(replayed.failed, 1);
    Ok(())
}

#[test]
fn test_excluded_directory_pruned_at_any_depth() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "app/web/node_modules/pkg/index.js", "module.exports = 1")?;
    write(&root, "app/web/index.js", "require('pkg')")?;
    write(&root, "app/.git/config", "[core]")?;
    write(&root, "app/__pycache__/m.txt", "cached")?;

    let mut sink = RecordingSink::new();
    collect(&Config::with_root(root.clone()), &mut sink)?;

    assert_eq!(read(&root, "file_names.txt")?, "app/web/index.js\n");
    Ok(())
}

#[test]
fn test_excluded_extensions_never_collected() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    for (i, ext) in DEFAULT_EXCLUDED_EXTENSIONS.iter().enumerate() {
        write(&root, &format!("f{i}{}", ext.to_uppercase()), "text")?;
    }
    write(&root, "keep.txt", "kept")?;

    let summary = collect(&Config::with_root(root.clone()), &mut RecordingSink::new())?;

    assert_eq!(read(&root, "file_names.txt")?, "keep.txt\n");
    assert_eq!(summary.included, 1);
    let aggregate = read(&root, "project_context.txt")?;
    for ext in DEFAULT_EXCLUDED_EXTENSIONS {
        assert!(!aggregate.contains(&format!("{} ---", ext.to_uppercase())));
    }
    Ok(())
}

#[test]
fn test_artifacts_never_contain_themselves() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "a.txt", "hello")?;
    let config = Config::with_root(root.clone());

    collect(&config, &mut RecordingSink::new())?;
    replay(&config, &mut RecordingSink::new())?;
    collect(&config, &mut RecordingSink::new())?;

    let aggregate = read(&root, "project_context.txt")?;
    assert!(!aggregate.contains("--- Filename: project_context.txt ---"));
    assert!(!aggregate.contains("--- Filename: file_names.txt ---"));
    assert!(!aggregate.contains("--- Filename: filtered_project_context.txt ---"));
    assert_eq!(aggregate, format_record("a.txt", "hello"));
    Ok(())
}

#[test]
fn test_invalid_utf8_content_is_decoded_permissively() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "latin1.txt", b"caf\xe9\n")?;

    let mut config = Config::with_root(root.clone());
    collect(&config, &mut RecordingSink::new())?;
    assert_eq!(
        read(&root, "project_context.txt")?,
        format_record("latin1.txt", "caf\n")
    );

    config.decode = ctxpack_utils::decode::DecodePolicy::Replace;
    collect(&config, &mut RecordingSink::new())?;
    assert_eq!(
        read(&root, "project_context.txt")?,
        format_record("latin1.txt", "caf\u{FFFD}\n")
    );
    Ok(())
}

#[test]
fn test_whitespace_only_files_skipped_by_both_pipelines() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "blank.txt", "\n\n\t  \r\n")?;
    write(&root, "real.txt", "content")?;
    let config = Config::with_root(root.clone());

    collect(&config, &mut RecordingSink::new())?;
    assert_eq!(read(&root, "file_names.txt")?, "real.txt\n");

    write(&root, "file_names.txt", "blank.txt\nreal.txt\n")?;
    let mut sink = RecordingSink::new();
    let summary = replay(&config, &mut sink)?;
    assert_eq!(sink.paths_at(ReportLevel::Skipped), vec!["blank.txt"]);
    assert_eq!(summary.included, 1);
    Ok(())
}

#[test]
fn test_missing_root_is_precondition_failure() -> Result<()> {
    let (_temp_dir, dir) = utf8_temp_dir()?;
    let config = Config::with_root(dir.join("nope"));

    let err = collect(&config, &mut RecordingSink::new()).unwrap_err();
    assert!(matches!(err, CtxpackError::RootNotDirectory { .. }));

    let err = replay(&config, &mut RecordingSink::new()).unwrap_err();
    assert!(matches!(err, CtxpackError::RootNotDirectory { .. }));

    // root exists but nothing was collected yet
    let config = Config::with_root(dir.clone());
    let err = replay(&config, &mut RecordingSink::new()).unwrap_err();
    assert!(matches!(err, CtxpackError::PathListMissing { .. }));
    assert!(!dir.join("filtered_project_context.txt").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_reported_and_run_continues() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "a_locked.txt", "secret")?;
    write(&root, "b_open.txt", "open")?;
    let locked = root.join("a_locked.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // root ignores permission bits; nothing to observe there
    if fs::read(&locked).is_ok() {
        return Ok(());
    }

    let mut sink = RecordingSink::new();
    let summary = collect(&Config::with_root(root.clone()), &mut sink)?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;

    assert_eq!(summary.failed, 1);
    assert_eq!(sink.paths_at(ReportLevel::Error), vec!["a_locked.txt"]);
    assert_eq!(read(&root, "file_names.txt")?, "b_open.txt\n");
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_output_io_failure_aborts() -> Result<()> {
    let (_temp_dir, root) = utf8_temp_dir()?;
    write(&root, "a.txt", "x")?;
    // a directory where the aggregate should go cannot be opened for writing
    fs::create_dir(root.join("project_context.txt"))?;

    let err = collect(&Config::with_root(root), &mut RecordingSink::new()).unwrap_err();
    assert!(matches!(err, CtxpackError::OutputIo { .. }));
    assert_eq!(err.to_exit_code().as_i32(), 4);
    Ok(())
}
