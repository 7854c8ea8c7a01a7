use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// A config path unique to one test, so runs never touch `~/.automate`.
fn scratch_config(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("automate-cli-{}-{}", name, std::process::id()))
        .join("config.json")
}

fn automate(config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("automate").unwrap();
    cmd.env("AUTOMATE_CONFIG", config);
    cmd.env_remove("AUTOMATE_FRAME_TOLERANCE");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_exits_zero() {
    Command::cargo_bin("automate")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate"));
}

#[test]
fn test_plan_with_keyboard() {
    let config = scratch_config("plan");
    automate(&config)
        .args(["plan", "--container", "0,0,100,200", "--keyboard", "0,150,100,100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("region:    (0, 0) 100x150"))
        .stdout(predicate::str::contains("0.5000,0.7125 -> 0.5000,0.0375"));
}

#[test]
fn test_plan_obscured_container_fails() {
    let config = scratch_config("plan-obscured");
    automate(&config)
        .args(["plan", "--container", "0,160,100,200", "--keyboard", "0,150,100,250"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hidden behind the keyboard"));
}

#[test]
fn test_simulate_reveals_target_json() {
    let config = scratch_config("simulate");
    let assert = automate(&config)
        .args([
            "-f",
            "json",
            "simulate",
            "--viewport",
            "0,88,375,600",
            "--content-height",
            "3000",
            "--target",
            "0,2400,375,60",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["revealed"], true);
    assert!(report["swipes"].as_u64().unwrap() > 0);
    let y = report["frame"]["y"].as_f64().unwrap();
    assert!((88.0..=628.0).contains(&y), "frame y {y} outside viewport");
}

#[test]
fn test_simulate_unreachable_target_fails() {
    let config = scratch_config("simulate-fail");
    automate(&config)
        .args([
            "simulate",
            "--viewport",
            "0,0,300,400",
            "--content-height",
            "3000",
            "--target",
            "0,1000,300,500",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to reveal element"));
}

#[test]
fn test_out_of_range_flags_are_rejected() {
    let config = scratch_config("flags");
    automate(&config)
        .args(["plan", "--container", "0,0,100,200", "--swipe-length=-0.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("swipe_length"));

    let simulate = [
        "simulate",
        "--viewport",
        "0,0,300,400",
        "--content-height",
        "3000",
        "--target",
        "0,2000,300,60",
    ];
    automate(&config)
        .args(simulate)
        .args(["--tolerance", "NaN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame_tolerance"));

    automate(&config)
        .args(simulate)
        .env("AUTOMATE_FRAME_TOLERANCE", "NaN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame_tolerance"));
}

#[test]
fn test_out_of_range_config_file_falls_back_to_defaults() {
    let config = scratch_config("bad-config");
    std::fs::create_dir_all(config.parent().unwrap()).unwrap();
    std::fs::write(&config, r#"{"swipe_length": -0.9}"#).unwrap();

    automate(&config)
        .args(["plan", "--container", "0,0,100,200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.5000,0.9500 -> 0.5000,0.0500"))
        .stderr(predicate::str::contains("ignoring config file"));

    let _ = std::fs::remove_dir_all(config.parent().unwrap());
}

#[test]
fn test_config_set_and_show() {
    let config = scratch_config("config");

    automate(&config)
        .args(["config", "set", "frame_tolerance", "0.5"])
        .assert()
        .success();

    automate(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("frame_tolerance = 0.5"));

    automate(&config)
        .args(["config", "set", "swipe_speed", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));

    let _ = std::fs::remove_dir_all(config.parent().unwrap());
}
