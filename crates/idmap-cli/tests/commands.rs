//! Commands dispatched against a temp workspace.

use idmap_cli::{Cli, CliError, Commands, Output, dispatch, load_config};
use idmap_config::Config;
use idmap_core::IdentityError;

use std::env;
use std::path::Path;

use clap::Parser;
use googletest::assert_that;
use googletest::prelude::{eq, ok};
use serial_test::serial;
use tempfile::TempDir;

const PROFILE: &str = "- **Name:** Test User
- **WhatsApp:** +1234567890
- **Telegram ID:** 123456789
";

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("USER.md"), PROFILE).unwrap();
    dir
}

fn run(workspace: &Path, args: &[&str]) -> Result<Output, CliError> {
    let cli = Cli::try_parse_from(std::iter::once("idmap").chain(args.iter().copied())).unwrap();
    dispatch(&cli.command, workspace, &Config::default())
}

fn text(workspace: &Path, args: &[&str]) -> String {
    run(workspace, args).unwrap().to_text()
}

#[test]
fn given_fresh_workspace_when_init_then_empty_map_and_owner_hint() {
    let ws = workspace();

    let output = run(ws.path(), &["init"]).unwrap();

    let Output::Initialized { path, owner_id } = output else {
        panic!("expected init output");
    };
    assert_that!(path, eq(&ws.path().join("data").join("identity-map.json")));
    assert_that!(owner_id.as_deref(), eq(Some("test")));
    assert_that!(text(ws.path(), &["list"]), eq("No identities"));
}

#[test]
fn given_existing_map_when_init_then_refused_unless_forced() {
    let ws = workspace();
    run(ws.path(), &["add", "--canonical", "alice", "--channel", "discord", "--user-id", "a#1"])
        .unwrap();

    let result = run(ws.path(), &["init"]);
    assert!(matches!(result, Err(CliError::AlreadyInitialized { .. })));
    assert_that!(text(ws.path(), &["channels", "--canonical", "alice"]), eq("discord:a#1"));

    run(ws.path(), &["init", "--force"]).unwrap();
    assert_that!(text(ws.path(), &["list"]), eq("No identities"));
}

#[test]
fn given_profile_when_resolve_owner_contacts_then_owner_listed() {
    let ws = workspace();

    assert_that!(
        text(ws.path(), &["resolve", "--channel", "whatsapp", "--user-id", "+1234567890"]),
        eq("test")
    );
    assert_that!(
        text(ws.path(), &["resolve", "--channel", "telegram", "--user-id", "123456789"]),
        eq("test")
    );

    assert_that!(
        text(ws.path(), &["list"]),
        eq("test [OWNER] (Test User)\n  telegram:123456789\n  whatsapp:+1234567890")
    );
    assert_that!(text(ws.path(), &["is-owner", "--canonical", "Test"]), eq("yes"));
}

#[test]
fn given_unknown_contact_when_resolve_then_stranger() {
    let ws = workspace();

    assert_that!(
        text(ws.path(), &["resolve", "--channel", "discord", "--user-id", "unknown#1234"]),
        eq("stranger:discord:unknown#1234")
    );
    assert!(!ws.path().join("data").exists());
}

#[test]
#[serial]
fn given_resolve_without_channel_when_dispatch_then_missing_argument() {
    let _channel = EnvGuard::remove("IDMAP_CHANNEL");
    let ws = workspace();

    let result = run(ws.path(), &["resolve", "--user-id", "1"]);

    assert!(matches!(result, Err(CliError::MissingArgument { .. })));
}

#[test]
fn given_add_then_remove_when_dispatch_then_remaining_channel_only() {
    let ws = workspace();
    run(ws.path(), &["add", "--canonical", "dave", "--channel", "telegram", "--user-id", "999999"])
        .unwrap();
    run(ws.path(), &["add", "--canonical", "dave", "--channel", "whatsapp", "--user-id", "+9999999999"])
        .unwrap();

    let removed = run(ws.path(), &["remove", "--canonical", "dave", "--channel", "telegram", "--user-id", "999999"]);

    assert_that!(
        removed,
        ok(eq(&Output::Removed {
            canonical_id: "dave".to_string(),
            channel_id: "telegram:999999".to_string(),
            removed: true,
        }))
    );
    assert_that!(
        text(ws.path(), &["channels", "--canonical", "dave"]),
        eq("whatsapp:+9999999999")
    );
    assert_that!(text(ws.path(), &["is-owner", "--canonical", "dave"]), eq("no"));
}

#[test]
fn given_display_name_when_add_then_sanitized_id_reported() {
    let ws = workspace();

    assert_that!(
        text(ws.path(), &[
            "add", "--canonical", "Alice!", "--channel", "discord", "--user-id", "alice#1234",
            "--display-name", "Alice Liddell",
        ]),
        eq("Added discord:alice#1234 to alice")
    );
    assert_that!(
        text(ws.path(), &["list"]),
        eq("alice (Alice Liddell)\n  discord:alice#1234")
    );
}

#[test]
fn given_unsanitizable_id_when_add_then_identity_error() {
    let ws = workspace();

    let result = run(ws.path(), &["add", "--canonical", "///", "--channel", "web", "--user-id", "x"]);

    assert!(matches!(
        result,
        Err(CliError::Identity(IdentityError::InvalidIdentifier { .. }))
    ));
}

#[test]
fn given_unknown_identity_when_channels_then_placeholder() {
    let ws = workspace();

    assert_that!(
        text(ws.path(), &["channels", "--canonical", "ghost"]),
        eq("No channels for ghost")
    );
}

// =========================================================================
// Config loading
// =========================================================================

const IDMAP_ENV_VARS: [&str; 7] = [
    "IDMAP_WORKSPACE",
    "IDMAP_CONFIG_DIR",
    "IDMAP_STORE_ON_CORRUPT",
    "IDMAP_PROFILE_FILE",
    "IDMAP_LOG_LEVEL",
    "IDMAP_LOG_COLORED",
    "IDMAP_LOG_FILE",
];

struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

fn clean_env() -> Vec<EnvGuard> {
    IDMAP_ENV_VARS.iter().map(|key| EnvGuard::remove(key)).collect()
}

#[test]
#[serial]
fn given_workspace_flag_when_load_config_then_workspace_and_toml_used() {
    let _guards = clean_env();
    let ws = workspace();
    std::fs::create_dir_all(ws.path().join(".idmap")).unwrap();
    std::fs::write(
        ws.path().join(".idmap").join("config.toml"),
        "[store]\nprofile_file = \"docs/ME.md\"\n",
    )
    .unwrap();
    let cli = Cli::try_parse_from([
        "idmap",
        "list",
        "--workspace",
        ws.path().to_str().unwrap(),
    ])
    .unwrap();

    let (workspace, config) = load_config(&cli).unwrap();

    assert_that!(workspace, eq(&ws.path().to_path_buf()));
    assert_that!(config.store.profile_file.as_str(), eq("docs/ME.md"));
    assert!(matches!(cli.command, Commands::List));
}

#[test]
#[serial]
fn given_invalid_profile_path_when_load_config_then_config_error() {
    let _guards = clean_env();
    let ws = workspace();
    std::fs::create_dir_all(ws.path().join(".idmap")).unwrap();
    std::fs::write(
        ws.path().join(".idmap").join("config.toml"),
        "[store]\nprofile_file = \"../USER.md\"\n",
    )
    .unwrap();
    let cli = Cli::try_parse_from([
        "idmap",
        "list",
        "--workspace",
        ws.path().to_str().unwrap(),
    ])
    .unwrap();

    assert!(matches!(load_config(&cli), Err(CliError::Config(_))));
}
