use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn valid_schedule_json() -> &'static str {
    r#"
{
  "helltide": [
    { "startTime": "2024-06-01T10:00:00Z", "zone": "kehj" },
    { "startTime": "2024-06-01T12:15:00Z", "zone": "hawe" }
  ],
  "legion": [
    { "startTime": "2024-06-01T10:25:00Z" }
  ],
  "world_boss": [
    { "startTime": "2024-06-01T11:53:00.000000Z", "boss": "Ashava" }
  ]
}
"#
}

#[test]
fn diagnostics_reports_upcoming_events() {
    let dir = tempdir().expect("tempdir");
    let schedule = dir.path().join("schedule.json");
    fs::write(&schedule, valid_schedule_json()).expect("write json");

    let mut cmd = cargo_bin_cmd!("d4timers");
    cmd.arg("--diagnostics")
        .arg("--schedule")
        .arg(schedule)
        .arg("--at")
        .arg("2024-06-01T09:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Helltide: upcoming, starts in 1:00:00"))
        .stdout(predicate::str::contains("Legion: upcoming, starts in 1:25:00"))
        .stdout(predicate::str::contains("World boss: Ashava spawns in 2:53:00"));
}

#[test]
fn diagnostics_reports_active_helltide() {
    let dir = tempdir().expect("tempdir");
    let schedule = dir.path().join("schedule.json");
    fs::write(&schedule, valid_schedule_json()).expect("write json");

    let mut cmd = cargo_bin_cmd!("d4timers");
    cmd.arg("--diagnostics")
        .arg("--schedule")
        .arg(schedule)
        .arg("--at")
        .arg("2024-06-01T10:30:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Helltide: active, 0:30:00 remaining"));
}

#[test]
fn diagnostics_flags_exhausted_world_boss_schedule() {
    let dir = tempdir().expect("tempdir");
    let schedule = dir.path().join("schedule.json");
    fs::write(&schedule, valid_schedule_json()).expect("write json");

    let mut cmd = cargo_bin_cmd!("d4timers");
    cmd.arg("--diagnostics")
        .arg("--schedule")
        .arg(schedule)
        .arg("--at")
        .arg("2024-06-02T00:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "World boss: schedule exhausted, refetch required",
        ));
}

#[test]
fn malformed_record_is_skipped_with_notice() {
    let dir = tempdir().expect("tempdir");
    let schedule = dir.path().join("schedule.json");
    fs::write(
        &schedule,
        r#"
{
  "helltide": [
    { "startTime": "not-a-date" },
    { "startTime": "2024-06-01T10:00:00Z" }
  ],
  "legion": [],
  "world_boss": []
}
"#,
    )
    .expect("write json");

    let mut cmd = cargo_bin_cmd!("d4timers");
    cmd.arg("--diagnostics")
        .arg("--schedule")
        .arg(schedule)
        .arg("--at")
        .arg("2024-06-01T09:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped 1 malformed record(s)"))
        .stdout(predicate::str::contains("Helltide: upcoming, starts in 1:00:00"));
}

#[test]
fn malformed_json_fails_with_clear_error() {
    let dir = tempdir().expect("tempdir");
    let schedule = dir.path().join("schedule.json");
    fs::write(&schedule, "{ not-valid-json ").expect("write invalid json");

    let mut cmd = cargo_bin_cmd!("d4timers");
    cmd.arg("--diagnostics")
        .arg("--schedule")
        .arg(schedule)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn zero_tick_interval_is_rejected() {
    let mut cmd = cargo_bin_cmd!("d4timers");
    cmd.arg("--tick-ms")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tick-ms must be greater than zero"));
}

#[test]
fn out_of_range_opacity_is_rejected() {
    let mut cmd = cargo_bin_cmd!("d4timers");
    cmd.arg("--opacity")
        .arg("1.5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--opacity must be between"));
}

#[test]
fn invalid_reference_time_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let schedule = dir.path().join("schedule.json");
    fs::write(&schedule, valid_schedule_json()).expect("write json");

    let mut cmd = cargo_bin_cmd!("d4timers");
    cmd.arg("--diagnostics")
        .arg("--schedule")
        .arg(schedule)
        .arg("--at")
        .arg("yesterday")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --at value"));
}
