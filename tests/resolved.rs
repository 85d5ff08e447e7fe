#![cfg(unix)]

use std::path::{Path, PathBuf};

use restricted_fs::{
    AccessContext, AccessPolicy, Decision, Denial, EngineConfig, Strategy, Strictness,
};

fn config(working: &Path, access: AccessPolicy) -> EngineConfig {
    EngineConfig {
        working_directory: working.to_path_buf(),
        output_directory: None,
        output_fallback_directory: None,
        access,
    }
}

fn context(working: &Path, strategy: Strategy, access: AccessPolicy) -> AccessContext {
    AccessContext::new(config(working, access), strategy, Strictness::Ambient).expect("context")
}

#[test]
fn symlink_escape_splits_the_strategies() {
    let work = tempfile::tempdir().expect("tempdir");
    let outside = tempfile::tempdir().expect("tempdir");
    std::fs::write(outside.path().join("target.txt"), "secret").expect("write");
    std::os::unix::fs::symlink(
        outside.path().join("target.txt"),
        work.path().join("link.txt"),
    )
    .expect("symlink");

    let lexical = context(work.path(), Strategy::Lexical, AccessPolicy::default());
    assert!(lexical
        .readable_file(Path::new("link.txt"))
        .expect("decision")
        .is_allowed());

    let resolved = context(work.path(), Strategy::Resolved, AccessPolicy::default());
    let decision = resolved
        .readable_file(Path::new("link.txt"))
        .expect("decision");
    assert_eq!(decision, Decision::Denied(Denial::Location));
}

#[test]
fn parent_references_are_fine_when_the_target_resolves_inside() {
    let work = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(work.path().join("sub")).expect("mkdir");
    std::fs::write(work.path().join("inside.txt"), "ok").expect("write");

    let resolved = context(work.path(), Strategy::Resolved, AccessPolicy::default());
    assert!(resolved
        .readable_file(Path::new("sub/../inside.txt"))
        .expect("decision")
        .is_allowed());

    let lexical = context(work.path(), Strategy::Lexical, AccessPolicy::default());
    let decision = lexical
        .readable_file(Path::new("sub/../inside.txt"))
        .expect("decision");
    assert_eq!(decision, Decision::Denied(Denial::ParentTraversal));
}

#[test]
fn dotfile_check_sees_through_symlinks_both_ways() {
    let work = tempfile::tempdir().expect("tempdir");
    std::fs::write(work.path().join(".hidden"), "x").expect("write");
    std::fs::write(work.path().join("visible.txt"), "x").expect("write");
    std::os::unix::fs::symlink(work.path().join(".hidden"), work.path().join("alias.txt"))
        .expect("symlink");
    std::os::unix::fs::symlink(work.path().join("visible.txt"), work.path().join(".alias"))
        .expect("symlink");

    let ctx = context(work.path(), Strategy::Resolved, AccessPolicy::default());

    // Non-dot name resolving to a dotfile target.
    let decision = ctx.readable_file(Path::new("alias.txt")).expect("decision");
    assert_eq!(decision, Decision::Denied(Denial::Dotfile));

    // Dot name resolving to a non-dot target.
    let decision = ctx.readable_file(Path::new(".alias")).expect("decision");
    assert_eq!(decision, Decision::Denied(Denial::Dotfile));

    let permissive = context(
        work.path(),
        Strategy::Resolved,
        AccessPolicy {
            read_dotfiles: true,
            ..AccessPolicy::default()
        },
    );
    assert!(permissive
        .readable_file(Path::new("alias.txt"))
        .expect("decision")
        .is_allowed());
}

#[test]
fn prohibited_extension_check_sees_through_symlinks() {
    let work = tempfile::tempdir().expect("tempdir");
    std::fs::write(work.path().join("evil.bat"), "x").expect("write");
    std::os::unix::fs::symlink(work.path().join("evil.bat"), work.path().join("safe.txt"))
        .expect("symlink");

    let ctx = context(
        work.path(),
        Strategy::Resolved,
        AccessPolicy {
            prohibited_write_extensions: vec![".bat".to_string()],
            ..AccessPolicy::default()
        },
    );

    let decision = ctx.writable_file(Path::new("safe.txt")).expect("decision");
    assert_eq!(
        decision,
        Decision::Denied(Denial::Extension(".bat".to_string()))
    );
}

#[test]
fn dotfile_gating_applies_to_plain_paths() {
    let work = tempfile::tempdir().expect("tempdir");

    let ctx = context(work.path(), Strategy::Resolved, AccessPolicy::default());
    let decision = ctx.readable_file(Path::new(".env")).expect("decision");
    assert_eq!(decision, Decision::Denied(Denial::Dotfile));

    let permissive = context(
        work.path(),
        Strategy::Resolved,
        AccessPolicy {
            read_dotfiles: true,
            ..AccessPolicy::default()
        },
    );
    assert!(permissive
        .readable_file(Path::new(".env"))
        .expect("decision")
        .is_allowed());
}

#[test]
fn configured_output_directory_is_reachable() {
    let work = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let config = EngineConfig {
        working_directory: work.path().to_path_buf(),
        output_directory: Some(out.path().to_path_buf()),
        output_fallback_directory: None,
        access: AccessPolicy::default(),
    };
    let ctx =
        AccessContext::new(config, Strategy::Resolved, Strictness::Ambient).expect("context");

    let target: PathBuf = out.path().join("result.pdf");
    assert!(ctx.writable_file(&target).expect("decision").is_allowed());
}

#[test]
fn repeated_decisions_resolve_only_once() {
    let work = tempfile::tempdir().expect("tempdir");
    std::fs::write(work.path().join("doc.txt"), "x").expect("write");

    let ctx = context(work.path(), Strategy::Resolved, AccessPolicy::default());

    let first = ctx.readable_file(Path::new("doc.txt")).expect("decision");
    let after_first = ctx.resolution_count();
    assert!(after_first > 0);

    let second = ctx.readable_file(Path::new("doc.txt")).expect("decision");
    assert_eq!(first, second);
    assert_eq!(ctx.resolution_count(), after_first);
}

#[test]
fn read_anywhere_skips_resolution_for_directories() {
    let work = tempfile::tempdir().expect("tempdir");
    let ctx = context(
        work.path(),
        Strategy::Resolved,
        AccessPolicy {
            read_anywhere: true,
            ..AccessPolicy::default()
        },
    );

    assert!(ctx
        .readable_dir(Path::new("/nonexistent/anywhere"))
        .expect("decision")
        .is_allowed());
    assert_eq!(ctx.resolution_count(), 0);
}

#[test]
fn paranoid_roots_resolved_cover_configured_roots() {
    let work = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let config = EngineConfig {
        working_directory: work.path().to_path_buf(),
        output_directory: Some(out.path().to_path_buf()),
        output_fallback_directory: None,
        access: AccessPolicy::default(),
    };
    let ctx =
        AccessContext::new(config, Strategy::Resolved, Strictness::Ambient).expect("context");

    let resolved = ctx.paranoid_roots_resolved().expect("roots");
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0], std::fs::canonicalize(work.path()).expect("canonicalize"));
    assert_eq!(resolved[1], std::fs::canonicalize(out.path()).expect("canonicalize"));
}
