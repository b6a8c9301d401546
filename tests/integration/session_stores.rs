use cmdroute::session::context::{SESSION_FILE, SESSION_MAX_AGE};
use cmdroute::{PersistedDict, SessionContext};
use serde_json::json;
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use crate::integration::support::values;

fn age_file(path: &std::path::Path, age: Duration) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - age)
        .unwrap();
}

#[test]
fn malformed_json_heals_to_empty_object() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("profile.json");
    fs::write(&path, "{\"subscriptions\": [").unwrap();

    let dict = PersistedDict::open(&path, None);

    assert!(dict.is_empty());
    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, json!({}));
}

#[test]
fn stale_session_file_is_expired() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cli.sess");
    fs::write(&path, "{\"x\": \"old\"}").unwrap();
    age_file(&path, Duration::from_secs(2 * 3600));

    let dict = PersistedDict::open(&path, Some(Duration::from_secs(3600)));

    assert!(dict.get("x").is_none());
    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, json!({}));
}

#[test]
fn session_context_expires_only_the_session_store() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let ctx = SessionContext::open(dir, values(dir, "", &[])).unwrap();
    ctx.account().write().set("user", json!("alice"));
    ctx.session().write().set("last_command", json!("vm create"));
    drop(ctx);

    age_file(&dir.join(SESSION_FILE), SESSION_MAX_AGE + Duration::from_secs(60));

    let ctx = SessionContext::open(dir, values(dir, "", &[])).unwrap();
    assert_eq!(ctx.account().read().get("user"), Some(&json!("alice")));
    assert!(ctx.session().read().is_empty());
}

#[test]
fn last_writer_wins_between_instances() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cli.json");
    let mut first = PersistedDict::open(&path, None);
    let mut second = PersistedDict::open(&path, None);

    first.set("a", json!(1));
    second.set("b", json!(2));

    let reloaded = PersistedDict::open(&path, None);
    assert_eq!(reloaded.get("b"), Some(&json!(2)));
    assert!(reloaded.get("a").is_none());
}
