//! Tests for FileRelocator

use assert_fs::prelude::*;
use hoststate_core::{ErrorKind, FileRelocator, MoveAction, MoveRequest};
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
//     src present,  dest content, validate, expected
#[case(Some("XYZ"), None, false, MoveAction::Move)]
#[case(Some("XYZ"), None, true, MoveAction::Move)]
#[case(None, None, false, MoveAction::Noop)]
#[case(None, Some("XYZ"), true, MoveAction::Noop)]
#[case(Some("XYZ"), Some("ABC"), false, MoveAction::Noop)]
#[case(Some("XYZ"), Some("ABC"), true, MoveAction::Replace)]
#[case(Some("XYZ"), Some("XYZ"), true, MoveAction::RemoveSource)]
fn decision_table(
    #[case] src_content: Option<&str>,
    #[case] dest_content: Option<&str>,
    #[case] validate: bool,
    #[case] expected: MoveAction,
) {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src.txt");
    let dest = temp.child("out").child("dest.txt");
    if let Some(content) = src_content {
        src.write_str(content).unwrap();
    }
    if let Some(content) = dest_content {
        dest.write_str(content).unwrap();
    }

    let request = MoveRequest::new(src.path(), dest.path()).with_validate(validate);
    let report = FileRelocator::new().reconcile(&request, false).unwrap();

    assert_eq!(report.action, expected);
    assert_eq!(report.changed, expected.is_change());
    assert_eq!(report.msg, expected.message());
}

#[test]
fn basic_move() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src.txt");
    let dest = temp.child("deep").child("dir").child("dest.txt");
    src.write_str("XYZ").unwrap();

    let report = FileRelocator::new()
        .reconcile(&MoveRequest::new(src.path(), dest.path()), false)
        .unwrap();

    assert!(report.changed);
    src.assert(predicate::path::missing());
    dest.assert("XYZ");
}

#[test]
fn second_run_reports_unchanged() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src.txt");
    let dest = temp.child("dest.txt");
    src.write_str("XYZ").unwrap();
    let request = MoveRequest::new(src.path(), dest.path());
    let relocator = FileRelocator::new();

    assert!(relocator.reconcile(&request, false).unwrap().changed);
    let second = relocator.reconcile(&request, false).unwrap();

    assert!(!second.changed);
    assert_eq!(second.msg, "File already moved");
    dest.assert("XYZ");
}

#[test]
fn identical_content_removes_source_only() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src.txt");
    let dest = temp.child("dest.txt");
    src.write_str("same bytes").unwrap();
    dest.write_str("same bytes").unwrap();

    let report = FileRelocator::new()
        .reconcile(&MoveRequest::new(src.path(), dest.path()).with_validate(true), false)
        .unwrap();

    assert!(!report.changed);
    src.assert(predicate::path::missing());
    dest.assert("same bytes");
}

#[test]
fn divergent_content_replaces_destination() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src.txt");
    let dest = temp.child("dest.txt");
    src.write_str("new content").unwrap();
    dest.write_str("stale content").unwrap();

    let report = FileRelocator::new()
        .reconcile(&MoveRequest::new(src.path(), dest.path()).with_validate(true), false)
        .unwrap();

    assert!(report.changed);
    src.assert(predicate::path::missing());
    dest.assert("new content");
}

#[test]
fn both_present_without_validate_leaves_both() {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src.txt");
    let dest = temp.child("dest.txt");
    src.write_str("a").unwrap();
    dest.write_str("b").unwrap();

    let report = FileRelocator::new()
        .reconcile(&MoveRequest::new(src.path(), dest.path()), false)
        .unwrap();

    assert!(!report.changed);
    src.assert("a");
    dest.assert("b");
}

#[rstest]
#[case(None, false)]
#[case(Some("old"), true)]
#[case(Some("payload"), true)]
fn dry_run_never_mutates(#[case] dest_content: Option<&str>, #[case] validate: bool) {
    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src.txt");
    let dest = temp.child("dest.txt");
    src.write_str("payload").unwrap();
    if let Some(content) = dest_content {
        dest.write_str(content).unwrap();
    }
    let request = MoveRequest::new(src.path(), dest.path()).with_validate(validate);
    let relocator = FileRelocator::new();

    let dry = relocator.reconcile(&request, true).unwrap();

    src.assert("payload");
    match dest_content {
        Some(content) => dest.assert(content),
        None => dest.assert(predicate::path::missing()),
    };

    let real = relocator.reconcile(&request, false).unwrap();
    assert_eq!(dry, real);
}

#[test]
fn relative_paths_are_invalid() {
    let err = FileRelocator::new()
        .reconcile(&MoveRequest::new("src.txt", "/tmp/dest.txt"), false)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[cfg(unix)]
#[test]
fn rename_failure_names_both_paths() {
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    let is_root = std::process::Command::new("id")
        .arg("-u")
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim() == "0")
        .unwrap_or(false);
    if is_root {
        eprintln!("Skipping test: running as root bypasses permission checks");
        return;
    }

    let temp = assert_fs::TempDir::new().unwrap();
    let src = temp.child("src.txt");
    src.write_str("XYZ").unwrap();
    let locked = temp.child("locked");
    locked.create_dir_all().unwrap();
    fs::set_permissions(locked.path(), Permissions::from_mode(0o555)).unwrap();
    let dest = locked.child("dest.txt");

    let result = FileRelocator::new().reconcile(&MoveRequest::new(src.path(), dest.path()), false);

    let _ = fs::set_permissions(locked.path(), Permissions::from_mode(0o755));

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    let message = err.to_string();
    assert!(message.contains("src.txt"), "got: {message}");
    assert!(message.contains("dest.txt"), "got: {message}");
    src.assert("XYZ");
}
