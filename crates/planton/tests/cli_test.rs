#![allow(deprecated)] // TODO: move from Command::cargo_bin to the cargo_bin_cmd! macro

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const VPC_MANIFEST: &str = r#"apiVersion: aws.project-planton.org/v1
kind: AwsVpc
metadata:
  name: main
spec:
  availabilityZones:
    - us-west-2a
    - us-west-2b
"#;

const CREDENTIAL_VARS: [&str; 10] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
    "AWS_REGION",
    "AWS_DEFAULT_REGION",
    "AWS_ACCOUNT_ID",
    "DIGITALOCEAN_TOKEN",
    "DIGITALOCEAN_ACCESS_TOKEN",
    "SPACES_ACCESS_KEY_ID",
    "SPACES_SECRET_ACCESS_KEY",
];

/// A planton command isolated from the user's config and credentials
fn planton(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("planton").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("PLANTON_CONFIG_PATH")
        .env_remove("PLANTON_STACK")
        .env_remove("RUST_LOG");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn write_manifest(dir: &Path) {
    fs::write(dir.join("vpc.yaml"), VPC_MANIFEST).unwrap();
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("planton").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("defaults"))
        .stdout(predicate::str::contains("describe"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("outputs"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("planton").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("planton"));
}

#[test]
fn test_up_help() {
    let mut cmd = Command::cargo_bin("planton").unwrap();
    cmd.arg("up")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--manifest"))
        .stdout(predicate::str::contains("--stack"))
        .stdout(predicate::str::contains("--aws-credential"));
}

#[test]
fn test_describe_lists_nested_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    planton(temp_dir.path())
        .args(["describe", "DigitalOceanKubernetesCluster"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spec.default_node_pool.size"));
}

#[test]
fn test_describe_unknown_kind() {
    let temp_dir = tempfile::tempdir().unwrap();
    planton(temp_dir.path())
        .args(["describe", "GcpBucket"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource kind: GcpBucket"));
}

#[test]
fn test_validate_manifest() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_manifest(temp_dir.path());

    planton(temp_dir.path())
        .args(["validate", "-f", "vpc.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AwsVpc main is valid"));
}

#[test]
fn test_validate_missing_manifest() {
    let temp_dir = tempfile::tempdir().unwrap();
    planton(temp_dir.path())
        .args(["validate", "-f", "missing.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest not found"));
}

#[test]
fn test_defaults_fill_unset_fields() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_manifest(temp_dir.path());

    planton(temp_dir.path())
        .args(["defaults", "-f", "vpc.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vpcCidr: 10.0.0.0/16"))
        .stdout(predicate::str::contains("subnetSize: 24"));
}

#[test]
fn test_defaults_keep_overridden_values() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_manifest(temp_dir.path());

    planton(temp_dir.path())
        .args(["defaults", "-f", "vpc.yaml", "--set", "spec.vpcCidr=10.8.0.0/16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vpcCidr: 10.8.0.0/16"))
        .stdout(predicate::str::contains("10.0.0.0/16").not());
}

#[test]
fn test_preview_up_outputs() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_manifest(temp_dir.path());

    planton(temp_dir.path())
        .args(["preview", "-f", "vpc.yaml", "--stack", "network"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ vpc (aws:ec2/vpc:Vpc)"))
        .stdout(predicate::str::contains("to create"));
    assert!(!temp_dir.path().join(".planton/stacks/network.json").exists());

    planton(temp_dir.path())
        .args(["up", "-f", "vpc.yaml", "--stack", "network"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stack network recorded"))
        .stdout(predicate::str::contains("vpc_cidr"));
    assert!(temp_dir.path().join(".planton/stacks/network.json").exists());

    planton(temp_dir.path())
        .args(["preview", "-f", "vpc.yaml", "--stack", "network"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes."));

    planton(temp_dir.path())
        .args(["outputs", "--stack", "network"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vpc_cidr"))
        .stdout(predicate::str::contains("10.0.0.0/16"));
}

#[test]
fn test_preview_reports_changed_keys() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_manifest(temp_dir.path());

    planton(temp_dir.path())
        .args(["up", "-f", "vpc.yaml"])
        .assert()
        .success();

    planton(temp_dir.path())
        .args(["preview", "-f", "vpc.yaml", "--set", "spec.vpcCidr=10.8.0.0/16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("~ vpc (aws:ec2/vpc:Vpc)"))
        .stdout(predicate::str::contains("cidrBlock"));
}

#[test]
fn test_default_stack_from_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_manifest(temp_dir.path());
    fs::write(
        temp_dir.path().join("planton.yaml"),
        "defaultStack: staging\nbackendDir: state\n",
    )
    .unwrap();

    planton(temp_dir.path())
        .args(["up", "-f", "vpc.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stack staging recorded"));
    assert!(temp_dir.path().join("state/stacks/staging.json").exists());
}
