//! Runs the binary against presets and TOML configs.

use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_energy-tracker"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

#[test]
fn household_preset_prints_report_and_exports_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("report.csv");
    let csv_arg = csv_path.to_string_lossy().to_string();

    let output = run(&[
        "--preset",
        "household",
        "--log-level",
        "error",
        "--export",
        &csv_arg,
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["Lamp", "Fan", "Refrigerator", "Television"] {
        assert!(stdout.contains(name), "missing {name} in:\n{stdout}");
    }
    assert!(stdout.contains("Estimated cost:"));

    let csv = fs::read_to_string(&csv_path).expect("csv should be written");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "device,wattage_w,status,running_s,energy_wh");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("Lamp,10,OFF,0,"));
}

#[test]
fn toml_config_devices_and_rate_are_used() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("tracker.toml");
    fs::write(
        &config_path,
        r#"
[tariff]
rate_per_kwh = 2000.0

[logging]
level = "error"

[[devices]]
name = "Kettle"
wattage_w = 2000.0
"#,
    )
    .expect("write config");

    let output = run(&["--config", &config_path.to_string_lossy()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Kettle"));
    assert!(stdout.contains("2000 per kWh"));
}

#[test]
fn negative_rate_override_is_rejected() {
    let output = run(&["--preset", "household", "--rate=-5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tariff.rate_per_kwh"), "stderr: {stderr}");
}

#[test]
fn unknown_preset_fails() {
    let output = run(&["--preset", "office"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_config_field_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("bad.toml");
    fs::write(&config_path, "[tariff]\nrate = 10\n").expect("write config");

    let output = run(&["--config", &config_path.to_string_lossy()]);
    assert!(!output.status.success());
}
