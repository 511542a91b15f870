use crate::tests::{EnvGuard, setup_workspace};
use crate::workspace_dir;

use googletest::assert_that;
use googletest::prelude::eq;
use serial_test::serial;

#[test]
#[serial]
fn given_explicit_path_and_env_when_resolve_then_explicit_wins() {
    // Given
    let (temp, _env) = setup_workspace();
    let other = tempfile::TempDir::new().unwrap();
    let _ws = EnvGuard::set("IDMAP_WORKSPACE", other.path().to_str().unwrap());

    // When
    let dir = workspace_dir(Some(temp.path())).unwrap();

    // Then
    assert_that!(dir, eq(&temp.path().to_path_buf()));
}

#[test]
#[serial]
fn given_env_only_when_resolve_then_env_used() {
    // Given
    let (temp, _env) = setup_workspace();
    let _ws = EnvGuard::set("IDMAP_WORKSPACE", temp.path().to_str().unwrap());

    // When
    let dir = workspace_dir(None).unwrap();

    // Then
    assert_that!(dir, eq(&temp.path().to_path_buf()));
}

#[test]
#[serial]
fn given_blank_env_when_resolve_then_current_dir_used() {
    // Given
    let (_temp, _env) = setup_workspace();
    let _ws = EnvGuard::set("IDMAP_WORKSPACE", "  ");

    // When
    let dir = workspace_dir(None).unwrap();

    // Then
    assert_that!(dir, eq(&std::env::current_dir().unwrap()));
}

#[test]
#[serial]
fn given_relative_explicit_path_when_resolve_then_absolute() {
    // Given
    let (_temp, _env) = setup_workspace();

    // When
    let dir = workspace_dir(Some(std::path::Path::new("some/ws"))).unwrap();

    // Then
    assert!(dir.is_absolute());
    assert!(dir.ends_with("some/ws"));
}
