use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let cart = common::write_cart_csv(&["steam:20, Steam $20, 20.00, 1,"]).unwrap();

    let mut cmd = Command::new(cargo_bin!("gamecart"));
    cmd.arg(cart.path())
        .args(["--confirm-after-secs", "0"])
        .arg("--db-path")
        .arg("some_db");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "falling back to in-memory storage",
        ))
        .stdout(predicate::str::contains(",paid,20,20,"));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let cart = common::write_cart_csv(&["steam:20, Steam $20, 20.00, 1,"]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("orders_db");

    let mut cmd = Command::new(cargo_bin!("gamecart"));
    cmd.arg(cart.path())
        .args(["--confirm-after-secs", "0"])
        .arg("--db-path")
        .arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("falling back").not())
        .stdout(predicate::str::contains(",paid,20,20,"));
}
