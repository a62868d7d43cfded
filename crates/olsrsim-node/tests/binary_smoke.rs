//! Smoke tests for the `olsrsim-node` binary.

use std::fs;
use std::process::Command;

fn write_inputs(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let tf = dir.join("topology.txt");
    let nf = dir.join("nodes.txt");
    fs::write(&tf, "0 UP 0 1\n0 UP 1 0\n").unwrap();
    fs::write(&nf, "0 1 \"(0 -> 1)\" 15\n1 0 \"(1 -> 0)\" 20\n").unwrap();
    (tf, nf)
}

#[test]
fn binary_runs_a_short_simulation_to_completion() {
    let bin = env!("CARGO_BIN_EXE_olsrsim-node");
    let dir = tempfile::tempdir().unwrap();
    let (tf, nf) = write_inputs(dir.path());
    let log_dir = dir.path().join("log");

    let output = Command::new(bin)
        .args([
            "--tf",
            tf.to_str().unwrap(),
            "--nf",
            nf.to_str().unwrap(),
            "-t",
            "10",
            "--rt",
            "60",
            "--log-dir",
            log_dir.to_str().unwrap(),
        ])
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to spawn olsrsim-node");

    assert!(
        output.status.success(),
        "expected exit code 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    // All three per-node files exist for both nodes.
    for name in [
        "0_in.txt",
        "0_out.txt",
        "0_received.txt",
        "1_in.txt",
        "1_out.txt",
        "1_received.txt",
    ] {
        assert!(log_dir.join(name).exists(), "missing {name}");
    }

    // Over a perfect two-way link the payloads arrive.
    let received0 = fs::read_to_string(log_dir.join("0_received.txt")).unwrap();
    let received1 = fs::read_to_string(log_dir.join("1_received.txt")).unwrap();
    assert!(received1.contains("(0 -> 1)"), "node 1 got: {received1:?}");
    assert!(received0.contains("(1 -> 0)"), "node 0 got: {received0:?}");

    // The out logs carry canonical HELLO lines.
    let out0 = fs::read_to_string(log_dir.join("0_out.txt")).unwrap();
    assert!(out0.starts_with("* 0 HELLO UNIDIR"));
}

#[test]
fn unsorted_topology_aborts_startup() {
    let bin = env!("CARGO_BIN_EXE_olsrsim-node");
    let dir = tempfile::tempdir().unwrap();
    let tf = dir.path().join("topology.txt");
    let nf = dir.path().join("nodes.txt");
    fs::write(&tf, "5 UP 0 1\n3 UP 1 0\n").unwrap();
    fs::write(&nf, "0 1 \"x\" 5\n").unwrap();

    let output = Command::new(bin)
        .args(["--tf", tf.to_str().unwrap(), "--nf", nf.to_str().unwrap()])
        .output()
        .expect("failed to spawn olsrsim-node");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("non-decreasing"), "stderr: {stderr}");
}

#[test]
fn malformed_node_config_aborts_startup() {
    let bin = env!("CARGO_BIN_EXE_olsrsim-node");
    let dir = tempfile::tempdir().unwrap();
    let tf = dir.path().join("topology.txt");
    let nf = dir.path().join("nodes.txt");
    fs::write(&tf, "0 UP 0 1\n").unwrap();
    fs::write(&nf, "0 1 no-quotes 5\n").unwrap();

    let output = Command::new(bin)
        .args(["--tf", tf.to_str().unwrap(), "--nf", nf.to_str().unwrap()])
        .output()
        .expect("failed to spawn olsrsim-node");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_required_arguments_print_usage() {
    let bin = env!("CARGO_BIN_EXE_olsrsim-node");

    let output = Command::new(bin)
        .output()
        .expect("failed to spawn olsrsim-node");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}
