//! Tests for the dbrepo binary

use std::process::Command;

use tempfile::TempDir;

use crate::common::shop_repository;

fn dbrepo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dbrepo"))
}

#[test]
fn test_read_then_show_and_parameters() {
    let repo = shop_repository();
    let store = TempDir::new().unwrap();

    let output = dbrepo()
        .arg("read")
        .arg("--repo")
        .arg(&repo.root)
        .arg("--store")
        .arg(store.path())
        .output()
        .expect("Failed to run dbrepo read");
    assert!(
        output.status.success(),
        "read failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("shop-database"), "stdout: {}", stdout);
    assert!(stdout.contains("Unclassified files: 1"), "stdout: {}", stdout);

    let output = dbrepo()
        .args(["show", "--app", "shop", "--kind", "table", "--name", "shot_order_ord"])
        .arg("--store")
        .arg(store.path())
        .output()
        .expect("Failed to run dbrepo show");
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["tableSuffix"], "ord");
    assert_eq!(
        shown["fields"]["fk_cus_ord_customer_id"]["camelCasedName"],
        "customerId"
    );

    let output = dbrepo()
        .args(["parameters", "--app", "shop"])
        .arg("--store")
        .arg(store.path())
        .output()
        .expect("Failed to run dbrepo parameters");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<ENV>"));
    assert!(stdout.contains("<SEED_NAME>"));
}

#[test]
fn test_show_unknown_app_fails() {
    let store = TempDir::new().unwrap();
    let output = dbrepo()
        .args(["show", "--app", "nobody"])
        .arg("--store")
        .arg(store.path())
        .output()
        .expect("Failed to run dbrepo show");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nobody-database"));
}
