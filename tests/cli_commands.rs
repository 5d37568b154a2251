//! Behavioural tests for the `kroy` CLI subcommands.

#[path = "common/test_constants.rs"]
mod test_constants;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;

use test_constants::{E2_SHORT, E2_URL, E2_ZONAL, ZONE};

fn kroy() -> Command {
    let mut cmd = cargo_bin_cmd!("kroy");
    cmd.env_remove("KROY_DEFAULT_ZONE")
        .env_remove("KROY_DEFAULT_FAMILY")
        .env_remove("KROY_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn format_prints_zonal_identifier() {
    kroy()
        .args([
            "format",
            "--family",
            "e2",
            "--cores",
            "4",
            "--memory-mb",
            "8192",
            "--zone",
            ZONE,
        ])
        .assert()
        .success()
        .stdout(format!("{E2_ZONAL}\n"))
        .stderr("");
}

#[test]
fn format_without_zone_prints_short_type() {
    kroy()
        .args(["format", "--cores", "4", "--memory-gb", "8"])
        .assert()
        .success()
        .stdout(format!("{E2_SHORT}\n"));
}

#[test]
fn format_short_flag_drops_the_zone() {
    kroy()
        .args([
            "format",
            "--family",
            "n2",
            "--cores",
            "32",
            "--memory-mb",
            "262400",
            "--zone",
            ZONE,
            "--short",
        ])
        .assert()
        .success()
        .stdout("n2-custom-32-262400-ext\n");
}

#[test]
fn format_uses_zone_from_environment() {
    kroy()
        .env("KROY_DEFAULT_ZONE", ZONE)
        .args(["format", "--family", "e2-micro", "--memory-mb", "2048"])
        .assert()
        .success()
        .stdout("zones/us-central1-b/machineTypes/e2-custom-micro-2048\n");
}

#[test]
fn format_reports_validation_errors() {
    kroy()
        .args(["format", "--family", "n2d", "--cores", "6", "--memory-mb", "8192"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(contains("invalid number of cores requested: 6"));
}

#[test]
fn format_requires_a_memory_size() {
    kroy()
        .args(["format", "--cores", "4"])
        .assert()
        .failure()
        .stderr(contains("--memory-mb"));
}

#[test]
fn parse_prints_key_value_lines() {
    kroy()
        .args(["parse", E2_URL])
        .assert()
        .success()
        .stdout(
            contains(format!("zone={ZONE}\n"))
                .and(contains("family=E2\n"))
                .and(contains("core_count=4\n"))
                .and(contains("memory_mb=8192\n"))
                .and(contains("extra_memory=false\n"))
                .and(contains(format!("identifier={E2_ZONAL}\n")))
                .and(contains(format!("short_type={E2_SHORT}\n"))),
        );
}

#[test]
fn parse_prints_json() {
    let output = kroy()
        .args(["parse", "--json", "n2-custom-32-262400-ext"])
        .output()
        .expect("kroy should run");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["family"], "N2");
    assert_eq!(value["core_count"], 32);
    assert_eq!(value["memory_mb"], 262_400);
    assert_eq!(value["extra_memory"], true);
    assert!(value["zone"].is_null());
}

#[test]
fn parse_rejects_malformed_identifier() {
    kroy()
        .args(["parse", "zones/us-central1-b/e2-custom-4-8192"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("malformed machine type"));
}

#[test]
fn limits_lists_every_family() {
    kroy()
        .arg("limits")
        .assert()
        .success()
        .stdout(
            predicate::function(|out: &str| out.lines().count() == 7)
                .and(contains("N2D prefix=n2d-custom cores=2,4,8,16,32,48"))
                .and(contains("E2_MICRO prefix=e2-custom-micro cores=2 (shared)")),
        );
}

#[test]
fn limits_rejects_unknown_family() {
    kroy()
        .args(["limits", "--family", "t2a"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("unknown CPU family 't2a'"));
}

#[test]
fn invalid_configured_family_is_reported() {
    kroy()
        .env("KROY_DEFAULT_FAMILY", "t2a")
        .args(["limits"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("KROY_DEFAULT_FAMILY").and(contains("kroy.toml")));
}
