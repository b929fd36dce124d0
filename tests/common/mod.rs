//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use std::process::{Child, Output, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Helper to get a tendo command isolated from the user's config
pub fn tendo() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tendo"));
    cmd.env("HOME", "/nonexistent-tendo-home")
        .env("XDG_CONFIG_HOME", "/nonexistent-tendo-home/.config")
        .env_remove("TENDO_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Spawn a long-running tendo process with captured output
pub fn spawn_tendo(args: &[&str]) -> Child {
    std::process::Command::new(cargo::cargo_bin!("tendo"))
        .args(args)
        .env("HOME", "/nonexistent-tendo-home")
        .env("XDG_CONFIG_HOME", "/nonexistent-tendo-home/.config")
        .env_remove("TENDO_CONFIG")
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap()
}

/// Wait for a spawned process, killing it if it outlives `timeout`
pub fn wait_with_timeout(mut child: Child, timeout: Duration) -> Output {
    let start = Instant::now();
    while child.try_wait().unwrap().is_none() {
        if start.elapsed() > timeout {
            child.kill().unwrap();
            let output = child.wait_with_output().unwrap();
            panic!(
                "process did not exit within {:?}\nstdout: {}\nstderr: {}",
                timeout,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    child.wait_with_output().unwrap()
}

/// Write a file into the temp dir and return its path
pub fn write_file(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Two-segment result in the viewer shape
///
/// Backbone spans x 0..0.04 and z 0..0.16.
pub fn sample_result() -> &'static str {
    r#"{
  "segments": [
    [[0, 0, 0], [0, 0, 0.05], [0, 0, 0.1]],
    [[0, 0, 0.1], [0.02, 0, 0.14], [0.04, 0, 0.16]]
  ],
  "tendonAnalysis": {
    "actuation_commands": {
      "10": {"length_change_m": 0.001, "pull_direction": "release", "magnitude": 0.001},
      "2": {"length_change_m": 0.0, "pull_direction": "hold", "magnitude": 0.0},
      "1": {"length_change_m": -0.002, "pull_direction": "pull", "magnitude": 0.002}
    },
    "coupling_data": {
      "positions": [[0, 0, 0], [0, 0, 0.1], [0.04, 0, 0.16]],
      "orientations": []
    },
    "tendon_analysis": {
      "routing_points": [
        [[0.01, 0, 0], [-0.005, 0.0087, 0], [-0.005, -0.0087, 0]],
        [[0.01, 0, 0.1], [-0.005, 0.0087, 0.1], [-0.005, -0.0087, 0.1]]
      ]
    },
    "model_type": "pcc"
  }
}"#
}

/// Service response wrapped in the standard envelope
pub fn sample_envelope() -> &'static str {
    r#"{
  "success": true,
  "message": "Robot computation completed successfully",
  "timestamp": "2025-06-01T12:00:00Z",
  "data": {
    "robot_positions": [[[0, 0, 0], [0, 0, 2]], [[0, 0, 2], [0, 1, 4]]],
    "actuation_commands": {
      "1": {"length_change_m": -0.001, "pull_direction": "pull"}
    },
    "model_type": "pcc"
  }
}"#
}

/// Kinematics-only response body
pub fn sample_points() -> &'static str {
    r#"{"points": [[[0, 0, 0], [0, 0, 0.07]], [[0, 0, 0.07], [0.03, 0, 0.1]]]}"#
}

/// Tendon analysis response without backbone positions
pub fn sample_analysis() -> &'static str {
    r#"{
  "success": true,
  "message": "Tendon analysis completed successfully",
  "data": {
    "coupling_data": {"positions": [[0, 0, 0], [0, 0, 0.07]], "orientations": []},
    "tendon_analysis": {},
    "actuation_commands": {
      "2": {"length_change_m": 0.003, "pull_direction": "release", "magnitude": 0.003},
      "1": {"length_change_m": -0.003, "pull_direction": "pull", "magnitude": 0.003}
    },
    "tendon_config": {"count": 3, "radius": 0.03, "coupling_offset": 0.0}
  }
}"#
}

/// Design in degrees and millimeters
pub fn sample_design() -> &'static str {
    r#"units:
  angle: deg
  length: mm
bending_angles: [90, 0]
rotation_angles: [0, 180]
backbone_lengths: [70, 70]
coupling_lengths: [30, 30, 30]
discretization_steps: 10
tendon_config:
  count: 3
  radius: 30
"#
}

/// Parse stdout of a successful command as JSON
pub fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
